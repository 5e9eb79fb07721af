use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use course_notes::model::{Directory, mark_watched, sort_files};
use course_notes::probe::FfmpegProbe;
use course_notes::render::note_title;
use course_notes::scan::scan;
use course_notes::settings::Settings;
use course_notes::sink::{ConsoleSink, FileSink, NoteSink, emit_report};
use course_notes::store::StructureStore;

#[derive(Parser, Debug)]
#[command(
    name = "course-notes",
    version,
    about = "Builds a markdown note with watch times for a folder of course videos"
)]
#[command(group(ArgGroup::new("source").required(true).args(["load", "new"])))]
#[command(group(ArgGroup::new("output").required(true).args(["console", "file"])))]
struct Cli {
    /// Load the course structure saved by an earlier --new run
    #[arg(short, long)]
    load: bool,
    /// Scan the course folder and save a new course structure
    #[arg(short, long)]
    new: bool,

    /// Print the note to stdout
    #[arg(short, long)]
    console: bool,
    /// Write the note to "<folder name> @Notes.md"
    #[arg(short, long)]
    file: bool,

    /// Course folder
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Deepest folder level to scan (root is 0)
    #[arg(long)]
    depth: Option<usize>,
    /// Config file (default: $XDG_CONFIG_HOME/course-notes/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also print watched/total progress per folder
    #[arg(long)]
    stats: bool,
    /// Mark a file as watched by its file name (repeatable); the structure is saved again
    #[arg(long = "mark-watched", value_name = "TITLE")]
    mark_watched: Vec<String>,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "course_notes=debug"
    } else {
        "course_notes=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_structure(cli: &Cli, settings: &Settings, store: &StructureStore) -> Result<Vec<Directory>> {
    if cli.load {
        return store.load();
    }

    let probe = FfmpegProbe::new(&settings.probe.decoder, settings.probe.timeout)?;
    probe.ensure_available()?;

    let directories = scan(
        Directory::root(&cli.root)?,
        &settings.scan.options(),
        &probe,
    )?;
    store.save(&directories)?;
    Ok(directories)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(depth) = cli.depth {
        settings.scan.max_depth = depth;
    }

    let store = StructureStore::new(&settings.store.path);
    let title = note_title(&cli.root);

    let mut directories = build_structure(&cli, &settings, &store)?;

    if !cli.mark_watched.is_empty() {
        let changed = mark_watched(&mut directories, &cli.mark_watched);
        log::info!("Marked {changed} files as watched");
        store.save(&directories)?;
    }

    for directory in &mut directories {
        sort_files(directory, settings.scan.file_order)?;
    }

    let sink: Box<dyn NoteSink> = if cli.console {
        Box::new(ConsoleSink)
    } else {
        Box::new(FileSink::new(Path::new("."), &title))
    };
    if let Some(table) = emit_report(sink.as_ref(), &title, &directories, cli.stats)? {
        print!("{table}");
    }
    Ok(())
}
