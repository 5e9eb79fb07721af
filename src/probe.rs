use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use wait_timeout::ChildExt;

/// Something that can tell how long a media file plays.
///
/// Returns the raw "HH:MM:SS.ms" text, or an empty string when the length
/// could not be determined.
pub trait DurationProbe {
    fn duration(&self, path: &Path) -> String;
}

/// Runs `ffmpeg -i <file>` and reads the `Duration: ...,` line it prints.
pub struct FfmpegProbe {
    program: PathBuf,
    timeout: Duration,
    pattern: Regex,
}

impl FfmpegProbe {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        // "Duration: N/A," does not match, so a hit always starts with HH:MM
        let pattern = Regex::new(r"Duration: (\d{2}:\d{2}:[^,]*),")?;
        Ok(Self {
            program: program.into(),
            timeout,
            pattern,
        })
    }

    /// Fails when the decoder cannot be started at all.
    pub fn ensure_available(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .with_context(|| {
                format!("Media decoder not available: {}", self.program.display())
            })?;

        if !output.status.success() {
            anyhow::bail!(
                "Media decoder {} -version exited with status: {}",
                self.program.display(),
                output.status
            );
        }
        log::debug!("Using media decoder {}", self.program.display());
        Ok(())
    }

    pub fn extract_duration(&self, output: &str) -> String {
        self.pattern
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }

    /// Combined stdout + stderr of one decoder run.
    fn run(&self, path: &Path) -> Result<String> {
        let mut child = Command::new(&self.program)
            .arg("-hide_banner")
            .arg("-i")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = thread::spawn(move || drain(stdout));
        let stderr_reader = thread::spawn(move || drain(stderr));

        match child.wait_timeout(self.timeout).context("wait failed")? {
            // ffmpeg exits non-zero when no output file is given, the status is irrelevant
            Some(_) => {}
            None => {
                child.kill().ok();
                child.wait().ok();
                anyhow::bail!("timed out after {}s", self.timeout.as_secs_f32());
            }
        }

        let mut combined = stdout_reader.join().unwrap_or_default();
        combined.push_str(&stderr_reader.join().unwrap_or_default());
        Ok(combined)
    }
}

fn drain(pipe: Option<impl Read>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).ok();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

impl DurationProbe for FfmpegProbe {
    fn duration(&self, path: &Path) -> String {
        match self.run(path) {
            Ok(output) => {
                let duration = self.extract_duration(&output);
                if duration.is_empty() {
                    log::warn!("No duration found for {}", path.display());
                }
                duration
            }
            Err(e) => {
                log::warn!("Probing {} failed: {e:#}", path.display());
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(program: &str) -> FfmpegProbe {
        FfmpegProbe::new(program, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn extract_duration_takes_text_up_to_comma() {
        let p = probe("ffmpeg");
        let output = "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'a.mp4':\n  \
                      Duration: 00:10:04.53, start: 0.000000, bitrate: 1203 kb/s\n";
        assert_eq!(p.extract_duration(output), "00:10:04.53");
    }

    #[test]
    fn extract_duration_is_empty_without_match() {
        let p = probe("ffmpeg");
        assert_eq!(p.extract_duration(""), "");
        assert_eq!(p.extract_duration("a.txt: Invalid data found"), "");
        assert_eq!(p.extract_duration("  Duration: N/A, bitrate: N/A"), "");
    }

    #[test]
    fn missing_decoder_is_reported() {
        let p = probe("/nonexistent/bin/ffmpeg-for-tests");
        assert!(p.ensure_available().is_err());
        assert_eq!(p.duration(Path::new("/tmp/a.mp4")), "");
    }

    #[cfg(unix)]
    #[test]
    fn runs_decoder_and_honours_timeout() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();

        let talker = dir.path().join("talker.sh");
        std::fs::write(
            &talker,
            "#!/bin/sh\necho \"  Duration: 01:02:03.04, start: 0.0\" >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&talker, std::fs::Permissions::from_mode(0o755)).unwrap();

        let sleeper = dir.path().join("sleeper.sh");
        std::fs::write(&sleeper, "#!/bin/sh\nexec sleep 5\n").unwrap();
        std::fs::set_permissions(&sleeper, std::fs::Permissions::from_mode(0o755)).unwrap();

        let p = FfmpegProbe::new(&talker, Duration::from_secs(5)).unwrap();
        assert_eq!(p.duration(Path::new("whatever.mp4")), "01:02:03.04");

        let p = FfmpegProbe::new(&sleeper, Duration::from_millis(200)).unwrap();
        let started = std::time::Instant::now();
        assert_eq!(p.duration(Path::new("whatever.mp4")), "");
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
