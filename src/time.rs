use anyhow::{Context, Result};

use crate::model::MediaFile;

fn parse_field(duration: &str, range: std::ops::Range<usize>) -> Result<u32> {
    let field = duration
        .get(range.clone())
        .with_context(|| format!("Malformed duration \"{duration}\": too short"))?;
    field.parse::<u32>().with_context(|| {
        format!(
            "Malformed duration \"{duration}\": \"{field}\" at {}..{} is not a number",
            range.start, range.end
        )
    })
}

/// Converts "HH:MM:SS.ms" to whole minutes. Seconds and anything after them are dropped.
pub fn parse_duration(duration: &str) -> Result<u32> {
    if duration.is_empty() {
        return Ok(0);
    }
    let hours = parse_field(duration, 0..2)?;
    let minutes = parse_field(duration, 3..5)?;
    Ok(hours * 60 + minutes)
}

pub fn hours_and_minutes(total_minutes: u32) -> (u32, u32) {
    (total_minutes / 60, total_minutes % 60)
}

/// "1ч 5м", "1ч", "5м", or "" for zero.
pub fn total_time_string(total_minutes: u32) -> String {
    let (hours, minutes) = hours_and_minutes(total_minutes);
    let mut parts = Vec::with_capacity(2);
    if hours != 0 {
        parts.push(format!("{hours}ч"));
    }
    if minutes != 0 {
        parts.push(format!("{minutes}м"));
    }
    parts.join(" ")
}

/// Three columns: raw minutes, hours/minutes watched of total, percent watched.
///
/// A group with no measurable duration is an error, there is no 0% fallback.
pub fn time_stats_line(watched_minutes: u32, total_minutes: u32) -> Result<String> {
    if total_minutes == 0 {
        anyhow::bail!("division by zero: cannot compute watched share of a 0 minute group");
    }
    let percent = f64::from(watched_minutes) / f64::from(total_minutes) * 100.0;

    let minutes_of_minutes = format!("{watched_minutes}м/{total_minutes}м");
    let (wh, wm) = hours_and_minutes(watched_minutes);
    let (th, tm) = hours_and_minutes(total_minutes);
    let hours_of_hours = format!("{wh}ч {wm}м / {th}ч:{tm}м");

    Ok(format!(
        "{minutes_of_minutes:<10} | {hours_of_hours:^20} | {percent:>10.2}%"
    ))
}

pub fn files_duration_minutes(files: &[MediaFile]) -> Result<u32> {
    files.iter().map(|f| parse_duration(&f.duration)).sum()
}
