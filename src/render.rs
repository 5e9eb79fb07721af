use std::fmt::Write;
use std::path::Path;

use anyhow::Result;

use crate::model::Directory;
use crate::time::{parse_duration, time_stats_line, total_time_string};

const LEGEND: &str = "Заметки: {} - загуглить, [] - переписать, (ХЗ) - не уверен, \
({...} - тема1, тема2, ...) - поразмышлять на эти темы, ({/* */} - что-то) - комментарий \n\
Фразы:\n\
Слова: \n\
Заменить: \n\n\n\n";

const TRAILER: &str = "## Сделать: \n## Другое: \n\nTags: #note #programming";

const FALLBACK_TITLE: &str = "course";

/// "<course folder> @Notes", also used as the report file name.
///
/// `.` and `..` resolve to the real folder name; a root without one (`/`)
/// becomes "course @Notes" so the title never contains a path separator.
pub fn note_title(root: &Path) -> String {
    let root = std::fs::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf());
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty() && n != "." && n != "..")
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());
    format!("{name} @Notes")
}

/// Markdown note with one section per directory and a running time per file.
pub fn render_note(title: &str, directories: &[Directory]) -> Result<String> {
    let mut text = String::new();
    writeln!(text, "# {title}\n")?;
    text.push_str(LEGEND);

    let mut total_minutes = 0;
    for directory in directories {
        let directory_minutes = directory.duration_minutes()?;
        total_minutes += directory_minutes;

        writeln!(
            text,
            "## {:^97}\t {}\n",
            directory.title,
            total_time_string(directory_minutes)
        )?;
        for file in &directory.files {
            let minutes = parse_duration(&file.duration)?;
            writeln!(
                text,
                "### {:-^96}\t {}",
                file.title,
                total_time_string(minutes)
            )?;
        }
        text.push('\n');
    }

    writeln!(
        text,
        "## Общее время: {:^50}\n",
        total_time_string(total_minutes)
    )?;
    text.push_str(TRAILER);
    Ok(text)
}

/// One watched/total line per directory, then the course total.
pub fn render_progress_table(directories: &[Directory]) -> Result<String> {
    let mut text = String::new();
    let mut total_minutes = 0;
    let mut total_watched = 0;

    for directory in directories {
        let mut watched_minutes = 0;
        let mut directory_minutes = 0;
        for file in &directory.files {
            let minutes = parse_duration(&file.duration)?;
            directory_minutes += minutes;
            if file.watched {
                watched_minutes += minutes;
            }
        }

        total_minutes += directory_minutes;
        total_watched += watched_minutes;

        writeln!(
            text,
            "{:<90} {}",
            directory.title,
            time_stats_line(watched_minutes, directory_minutes)?
        )?;
    }

    writeln!(text, "{:^60}", time_stats_line(total_watched, total_minutes)?)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaFile;

    fn media(title: &str, duration: &str, watched: bool) -> MediaFile {
        MediaFile {
            duration: duration.into(),
            title: title.into(),
            path: format!("/course/{title}").into(),
            watched,
        }
    }

    fn intro() -> Directory {
        let mut dir = Directory::new("/course/Intro", "Intro");
        dir.files.push(media("a.mp4", "00:10:00.000", false));
        dir
    }

    #[test]
    fn note_has_centered_headers_and_file_lines() {
        let note = render_note("Course @Notes", &[intro()]).unwrap();

        assert!(note.starts_with("# Course @Notes\n\nЗаметки: "));
        let header = format!("## {:^97}\t 10м\n\n", "Intro");
        assert!(note.contains(&header));
        let file_line = format!("### {}a.mp4{}\t 10м\n\n", "-".repeat(45), "-".repeat(46));
        assert!(note.contains(&file_line));
        assert!(note.contains(&format!("## Общее время: {:^50}\n\n", "10м")));
        assert!(note.ends_with("Tags: #note #programming"));
    }

    #[test]
    fn note_sums_directories_in_scan_order() {
        let mut second = Directory::new("/course/Next", "Next");
        second.files.push(media("z.mp4", "01:00:00.0", false));
        second.files.push(media("b.mp4", "00:05:00.0", false));
        second.files.push(media("broken.mp4", "", false));

        let note = render_note("t", &[intro(), second]).unwrap();
        let z = note.find("z.mp4").unwrap();
        let b = note.find("b.mp4").unwrap();
        assert!(z < b);
        assert!(note.contains(&format!("## {:^97}\t 1ч 5м\n", "Next")));
        assert!(note.contains(&format!("## Общее время: {:^50}", "1ч 15м")));
    }

    #[test]
    fn note_propagates_malformed_durations() {
        let mut dir = intro();
        dir.files.push(media("bad.mp4", "garbage", false));
        assert!(render_note("t", &[dir]).is_err());
    }

    #[test]
    fn progress_table_shows_watched_share() {
        let mut dir = intro();
        dir.files[0].watched = true;
        dir.files.push(media("b.mp4", "00:20:00.000", false));

        let table = render_progress_table(&[dir]).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("{:<90} 10м/30м", "Intro")));
        assert!(lines[0].ends_with("33.33%"));
        assert!(lines[1].contains("33.33%"));
    }

    #[test]
    fn progress_table_fails_on_zero_minute_directory() {
        let mut dir = Directory::new("/course/Empty", "Empty");
        dir.files.push(media("x.mp4", "", false));
        let err = render_progress_table(&[dir]).unwrap_err();
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn note_title_uses_folder_name() {
        assert_eq!(note_title(Path::new("/courses/Rust Basics")), "Rust Basics @Notes");
    }

    #[test]
    fn note_title_resolves_relative_components() {
        let tmp = tempfile::tempdir().unwrap();
        let course = tmp.path().join("Rust Basics");
        std::fs::create_dir_all(course.join("01 Intro")).unwrap();

        let title = note_title(&course.join("01 Intro").join(".."));
        assert_eq!(title, "Rust Basics @Notes");
        assert_eq!(note_title(&course.join(".")), "Rust Basics @Notes");
    }

    #[test]
    fn note_title_of_filesystem_root_has_no_separator() {
        let title = note_title(Path::new("/"));
        assert_eq!(title, "course @Notes");
        assert!(!title.contains('/'));
    }
}
