use std::env;
use std::fs;
use std::path::PathBuf;

const PLANNER_FILE: &str = "planner.weekplan";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "weekplan.log";
const APP_DIR: &str = "weekplan";

pub fn resolve_planner_path(cli_path: Option<PathBuf>) -> PathBuf {
	if let Some(path) = cli_path {
		return absolutize(path);
	}

	if let Some(path) = non_empty_var("WEEKPLAN_FILE") {
		return absolutize(path);
	}

	state_dir().join(PLANNER_FILE)
}

pub fn config_path() -> PathBuf {
	if let Some(path) = non_empty_var("WEEKPLAN_CONFIG") {
		return path;
	}

	if let Some(path) = non_empty_var("XDG_CONFIG_HOME") {
		return path.join(APP_DIR).join(CONFIG_FILE);
	}

	#[cfg(target_os = "windows")]
	{
		if let Some(path) = non_empty_var("APPDATA") {
			return path.join(APP_DIR).join(CONFIG_FILE);
		}
	}

	if let Some(path) = non_empty_var("HOME") {
		return path.join(".config").join(APP_DIR).join(CONFIG_FILE);
	}

	PathBuf::from(format!(".{APP_DIR}")).join(CONFIG_FILE)
}

pub fn log_path() -> PathBuf {
	state_dir().join(LOG_FILE)
}

pub fn state_dir() -> PathBuf {
	if let Some(path) = non_empty_var("WEEKPLAN_STATE_DIR") {
		return path;
	}

	#[cfg(target_os = "windows")]
	{
		if let Some(path) = non_empty_var("LOCALAPPDATA") {
			return path.join(APP_DIR);
		}
	}

	if let Some(path) = non_empty_var("XDG_STATE_HOME") {
		return path.join(APP_DIR);
	}

	if let Some(path) = non_empty_var("HOME") {
		return path.join(".local").join("state").join(APP_DIR);
	}

	PathBuf::from(format!(".{APP_DIR}"))
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
	env::var_os(name)
		.filter(|value| !value.is_empty())
		.map(PathBuf::from)
}

fn absolutize(path: PathBuf) -> PathBuf {
	let path = if path.is_absolute() {
		path
	} else if let Ok(cwd) = env::current_dir() {
		cwd.join(path)
	} else {
		path
	};

	if path.exists() {
		fs::canonicalize(&path).unwrap_or(path)
	} else {
		path
	}
}

#[cfg(test)]
mod tests {
	use std::env;
	use std::path::PathBuf;

	use super::{config_path, resolve_planner_path};

	#[test]
	fn explicit_path_wins_and_is_absolute() {
		let path = resolve_planner_path(Some(PathBuf::from("plans/mine.weekplan")));
		assert!(path.is_absolute());
		assert!(path.ends_with("plans/mine.weekplan"));
	}

	#[test]
	fn default_path_lives_in_state_dir() {
		let dir = env::temp_dir().join(format!("weekplan_state_{}", std::process::id()));
		// SAFETY: only this test reads or writes these variables.
		unsafe {
			env::remove_var("WEEKPLAN_FILE");
			env::set_var("WEEKPLAN_STATE_DIR", &dir);
		}

		let path = resolve_planner_path(None);
		unsafe {
			env::remove_var("WEEKPLAN_STATE_DIR");
		}
		assert_eq!(path, dir.join("planner.weekplan"));
	}

	#[test]
	fn config_override_is_used_as_is() {
		let file = env::temp_dir().join(format!("weekplan_config_{}.toml", std::process::id()));
		// SAFETY: only this test reads or writes this variable.
		unsafe {
			env::set_var("WEEKPLAN_CONFIG", &file);
		}

		let path = config_path();
		unsafe {
			env::remove_var("WEEKPLAN_CONFIG");
		}
		assert_eq!(path, file);
	}
}
