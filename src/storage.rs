use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Week;
use crate::planner::WeekPlanner;

const WEEKS_MARKER: &str = "\n=== WEEKS ===\n";
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML header: {0}")]
    TomlDecode(toml::de::Error),
    #[error("failed to encode TOML header: {0}")]
    TomlEncode(toml::ser::Error),
    #[error("failed to parse week record on line {line}: {source}")]
    JsonDecode {
        line: usize,
        source: serde_json::Error,
    },
    #[error("failed to encode week record: {0}")]
    JsonEncode(serde_json::Error),
    #[error("invalid planner file: {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlannerHeader {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    cursor: usize,
}

/// Reads a planner file. `Ok(None)` when the file is missing or blank.
pub fn load_planner(path: &Path, autosave_delay: Duration) -> Result<Option<WeekPlanner>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StorageError::Io(err)),
    };

    if raw.trim().is_empty() {
        return Ok(None);
    }

    let (header_blob, weeks_blob) = raw.split_once(WEEKS_MARKER).unwrap_or((raw.as_str(), ""));

    let header: PlannerHeader = toml::from_str(header_blob).map_err(StorageError::TomlDecode)?;
    if header.schema_version != SCHEMA_VERSION {
        return Err(StorageError::InvalidData(format!(
            "unsupported schema version {}",
            header.schema_version
        )));
    }

    let mut weeks: Vec<Week> = Vec::new();
    for (index, line) in weeks_blob.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut week: Week = serde_json::from_str(line).map_err(|source| StorageError::JsonDecode {
            line: index + 1,
            source,
        })?;
        week.validate()
            .map_err(|reason| StorageError::InvalidData(format!("line {}: {reason}", index + 1)))?;
        weeks.push(week);
    }

    let week_count = weeks.len();
    let planner = WeekPlanner::restore(weeks, header.cursor, autosave_delay)
        .ok_or_else(|| StorageError::InvalidData("planner file contains no weeks".to_string()))?;
    info!(path = %path.display(), weeks = week_count, "loaded planner");
    Ok(Some(planner))
}

/// Writes the stored weeks; live edits that have not been saved are not included.
pub fn save_planner(path: &Path, planner: &WeekPlanner) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let header = PlannerHeader {
        schema_version: SCHEMA_VERSION,
        saved_at: Utc::now(),
        cursor: planner.cursor(),
    };
    let header = toml::to_string_pretty(&header).map_err(StorageError::TomlEncode)?;
    let mut file = fs::File::create(path)?;
    file.write_all(header.as_bytes())?;
    file.write_all(WEEKS_MARKER.as_bytes())?;

    for week in planner.weeks() {
        let line = serde_json::to_string(week).map_err(StorageError::JsonEncode)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
    }

    debug!(path = %path.display(), weeks = planner.weeks().len(), "wrote planner");
    Ok(())
}
