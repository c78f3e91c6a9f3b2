use crate::config::parser::parse_config_file;
use crate::config::types::LoadedConfig;
use crate::error::{Result, RetextError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".retext.toml";

/// Environment variable that, if truthy, skips the ~/.retext.toml fallback.
pub const NO_USER_CONFIG_ENV: &str = "RETEXT_NO_USER_CONFIG";

/// Find and load the config that applies to `start_dir`.
///
/// The lookup order is:
/// 1. `.retext.toml` in `start_dir`, then in each parent directory
/// 2. ~/.retext.toml (unless `RETEXT_NO_USER_CONFIG` is truthy)
///
/// The first file found wins; configs are not merged.
pub fn discover_config(start_dir: &Path) -> Result<Option<LoadedConfig>> {
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if config_path.is_file() {
			return load_config_file(&config_path).map(Some);
		}
		current_dir = dir.parent();
	}

	load_user_config()
}

/// Load an explicitly named config file.
pub fn load_config_file(path: &Path) -> Result<LoadedConfig> {
	if !path.exists() {
		return Err(RetextError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	debug!(path = %path.display(), "loading config");
	let config = parse_config_file(path)?;
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
	})
}

/// Load `--config` if given, otherwise discover from `cwd`.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Option<LoadedConfig>> {
	match explicit {
		Some(path) => load_config_file(path).map(Some),
		None => discover_config(cwd),
	}
}

/// Load the user's ~/.retext.toml if it exists and isn't disabled.
fn load_user_config() -> Result<Option<LoadedConfig>> {
	if is_env_truthy(NO_USER_CONFIG_ENV) {
		return Ok(None);
	}

	let Some(home_dir) = dirs::home_dir() else {
		return Ok(None);
	};
	let user_config_path = home_dir.join(CONFIG_FILE_NAME);

	if user_config_path.is_file() {
		load_config_file(&user_config_path).map(Some)
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RetextError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
