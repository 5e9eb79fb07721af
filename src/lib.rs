/*

Course layout as scanned:

  Course/                 level 0
    01 Intro/             level 1
      001 Welcome.mp4
    02 Basics/
      css/                never entered
      extra/              level 2, deepest by default
        bonus.mp4

*/

pub mod file;
pub mod model;
pub mod probe;
pub mod render;
pub mod scan;
pub mod settings;
pub mod sink;
pub mod store;
pub mod time;

pub use model::{Directory, FileOrder, MediaFile};
pub use probe::{DurationProbe, FfmpegProbe};
pub use scan::{ScanOptions, scan};
pub use store::StructureStore;
