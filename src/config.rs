use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ExtractError, Result};

pub const DEFAULT_MAX_INPUT_BYTES: usize = 1 << 20;

/// Settings for the file-facing side of the tool. The engine itself is
/// not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Larger documents are rejected before parsing
    pub max_input_bytes: usize,
    /// IANA zone written into event records and ICS
    pub timezone: String,
    pub calendar_id: String,
    pub term_start: Option<NaiveDate>,
    /// Last day of classes; becomes the recurrence UNTIL
    pub term_end: Option<NaiveDate>,
    pub output_dir: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            timezone: "America/Los_Angeles".into(),
            calendar_id: "primary".into(),
            term_start: None,
            term_end: None,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ExtractConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_input_bytes == 0 {
            return Err(ExtractError::Config {
                message: "max_input_bytes must be positive".into(),
            });
        }
        if self.timezone.trim().is_empty() {
            return Err(ExtractError::Config {
                message: "timezone must not be empty".into(),
            });
        }
        if let (Some(start), Some(end)) = (self.term_start, self.term_end)
            && end < start
        {
            return Err(ExtractError::Config {
                message: format!("term_end {end} is before term_start {start}"),
            });
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` command-line date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ExtractError::InvalidDate {
        value: value.to_string(),
    })
}

fn check_size(path: &Path, size: u64, limit: usize) -> Result<()> {
    if size > limit as u64 {
        return Err(ExtractError::InputTooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    Ok(())
}

fn into_text(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| ExtractError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

/// Read one syllabus text file, or stdin when `path` is `-`, enforcing
/// the size cap before any parsing happens.
pub fn read_syllabus(path: &Path, config: &ExtractConfig) -> Result<String> {
    let limit = config.max_input_bytes;

    if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin()
            .take(limit as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| ExtractError::io(path, e))?;
        check_size(path, bytes.len() as u64, limit)?;
        return into_text(path, bytes);
    }

    let size = std::fs::metadata(path)
        .map_err(|e| ExtractError::io(path, e))?
        .len();
    check_size(path, size, limit)?;
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;
    into_text(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = ExtractConfig::default();
        assert_eq!(c.max_input_bytes, 1_048_576);
        assert_eq!(c.timezone, "America/Los_Angeles");
        assert_eq!(c.calendar_id, "primary");
        assert_eq!(c.output_dir, PathBuf::from("output"));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let c: ExtractConfig =
            serde_json::from_str(r#"{"timezone": "America/New_York", "term_start": "2024-09-03"}"#).unwrap();
        assert_eq!(c.timezone, "America/New_York");
        assert_eq!(c.term_start, NaiveDate::from_ymd_opt(2024, 9, 3));
        assert_eq!(c.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn test_inverted_term_rejected() {
        let c = ExtractConfig {
            term_start: NaiveDate::from_ymd_opt(2024, 12, 1),
            term_end: NaiveDate::from_ymd_opt(2024, 9, 1),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ExtractError::Config { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"calendar_id": "physics", "max_input_bytes": 10}}"#).unwrap();
        let c = ExtractConfig::load(f.path()).unwrap();
        assert_eq!(c.calendar_id, "physics");
        assert_eq!(c.max_input_bytes, 10);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-09-03").unwrap(), NaiveDate::from_ymd_opt(2024, 9, 3).unwrap());
        assert!(matches!(parse_date("09/03/2024"), Err(ExtractError::InvalidDate { .. })));
    }

    // ── read_syllabus ────────────────────────────────────────────────

    #[test]
    fn test_read_syllabus_size_cap() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"Meets: MWF 10-11am").unwrap();
        let small = ExtractConfig {
            max_input_bytes: 5,
            ..Default::default()
        };
        assert!(matches!(read_syllabus(f.path(), &small), Err(ExtractError::InputTooLarge { .. })));
        assert_eq!(read_syllabus(f.path(), &ExtractConfig::default()).unwrap(), "Meets: MWF 10-11am");
    }

    #[test]
    fn test_read_syllabus_rejects_binary() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();
        assert!(matches!(
            read_syllabus(f.path(), &ExtractConfig::default()),
            Err(ExtractError::NotUtf8 { .. })
        ));
    }

    #[test]
    fn test_read_syllabus_missing_file() {
        let err = read_syllabus(Path::new("/nonexistent/syllabus.txt"), &ExtractConfig::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
