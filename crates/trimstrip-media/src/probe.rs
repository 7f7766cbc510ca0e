//! Source duration probing through ffprobe.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::{debug, warn};
use trimstrip_core::{Result, TrimStripError};

/// Reports the total duration of a video source.
pub trait DurationProbe: Send + Sync {
    /// Duration of `source` in microseconds.
    fn probe_duration_micros(&self, source: &Path) -> Result<u64>;
}

/// [`DurationProbe`] that runs the `ffprobe` binary found by ffmpeg-sidecar.
#[derive(Debug, Clone)]
pub struct FfprobeDurationProbe {
    binary: PathBuf,
}

impl Default for FfprobeDurationProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeDurationProbe {
    /// Use the ffprobe next to the sidecar-managed ffmpeg (or on `PATH`).
    pub fn new() -> Self {
        Self::with_binary(ffmpeg_sidecar::ffprobe::ffprobe_path())
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Command-line arguments for a duration query on `source`.
    pub fn args(source: &Path) -> Vec<String> {
        vec![
            "-v".into(),
            "error".into(),
            "-show_entries".into(),
            "format=duration".into(),
            "-of".into(),
            "json".into(),
            source.to_string_lossy().into_owned(),
        ]
    }
}

impl DurationProbe for FfprobeDurationProbe {
    fn probe_duration_micros(&self, source: &Path) -> Result<u64> {
        if !source.exists() {
            return Err(TrimStripError::SourceUnreadable(format!(
                "File not found: {}",
                source.display()
            )));
        }

        let output = Command::new(&self.binary)
            .args(Self::args(source))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                TrimStripError::SourceUnreadable(format!(
                    "Failed to run {}: {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                source = %source.display(),
                status = %output.status,
                "ffprobe failed"
            );
            return Err(TrimStripError::SourceUnreadable(format!(
                "{}: {}",
                source.display(),
                stderr.trim()
            )));
        }

        let micros = parse_duration_json(&output.stdout)?;
        debug!(source = %source.display(), micros, "Probed duration");
        Ok(micros)
    }
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    duration: Option<String>,
}

/// Extract the container duration from `ffprobe -of json` output.
pub fn parse_duration_json(data: &[u8]) -> Result<u64> {
    let parsed: ProbeOutput = serde_json::from_slice(data)
        .map_err(|e| TrimStripError::Serialization(format!("Invalid ffprobe output: {}", e)))?;

    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| TrimStripError::SourceUnreadable("Source has no duration".into()))?;

    let seconds: f64 = raw.trim().parse().map_err(|_| {
        TrimStripError::SourceUnreadable(format!("Unparseable duration '{}'", raw))
    })?;
    seconds_to_micros(seconds)
}

/// Convert fractional seconds to whole microseconds.
pub fn seconds_to_micros(seconds: f64) -> Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TrimStripError::SourceUnreadable(format!(
            "Invalid duration {seconds}"
        )));
    }
    Ok((seconds * 1_000_000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_json() {
        let json = br#"{ "format": { "duration": "12.345678" } }"#;
        assert_eq!(parse_duration_json(json).unwrap(), 12_345_678);
    }

    #[test]
    fn test_parse_missing_duration() {
        let err = parse_duration_json(br#"{ "format": {} }"#).unwrap_err();
        assert!(matches!(err, TrimStripError::SourceUnreadable(_)));

        let err = parse_duration_json(br#"{}"#).unwrap_err();
        assert!(matches!(err, TrimStripError::SourceUnreadable(_)));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_duration_json(b"not json").unwrap_err();
        assert!(matches!(err, TrimStripError::Serialization(_)));

        let err = parse_duration_json(br#"{ "format": { "duration": "N/A" } }"#).unwrap_err();
        assert!(matches!(err, TrimStripError::SourceUnreadable(_)));
    }

    #[test]
    fn test_seconds_to_micros_rejects_negative() {
        assert!(seconds_to_micros(-1.0).is_err());
        assert!(seconds_to_micros(f64::NAN).is_err());
        assert_eq!(seconds_to_micros(0.0).unwrap(), 0);
    }

    #[test]
    fn test_args_end_with_source() {
        let args = FfprobeDurationProbe::args(Path::new("/tmp/clip.mp4"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/clip.mp4"));
        assert!(args.iter().any(|a| a == "format=duration"));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let probe = FfprobeDurationProbe::with_binary("ffprobe");
        let err = probe
            .probe_duration_micros(Path::new("/definitely/not/here.mp4"))
            .unwrap_err();
        assert!(matches!(err, TrimStripError::SourceUnreadable(_)));
    }
}
