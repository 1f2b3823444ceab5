use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV: &str = "WEEKPLAN_LOG";

/// Sends tracing output to `path` so the terminal dashboard stays clean.
pub fn init(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent)?;
		}
	}

	let file = OpenOptions::new().create(true).append(true).open(path)?;
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

	fmt()
		.with_env_filter(filter)
		.with_writer(Mutex::new(file))
		.with_ansi(false)
		.with_target(false)
		.try_init()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::init;

	#[test]
	fn creates_log_file_under_missing_directory() {
		let dir = std::env::temp_dir().join(format!("weekplan_logging_{}", std::process::id()));
		let path = dir.join("nested").join("weekplan.log");

		let result = init(&path);
		let exists = path.exists();
		let _ = fs::remove_dir_all(&dir);

		assert!(result.is_ok());
		assert!(exists);
	}
}
