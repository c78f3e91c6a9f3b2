//! Built-in rule sets, written in the same TOML format as `.retext.toml`.

use crate::config::parser::parse_config_str;
use crate::config::types::Config;
use crate::error::{Result, RetextError};
use std::path::PathBuf;

/// A named, built-in configuration.
#[derive(Debug)]
pub struct Preset {
	pub name: &'static str,
	pub description: &'static str,
	source: &'static str,
}

impl Preset {
	/// Parse the preset into a config.
	pub fn config(&self) -> Result<Config> {
		parse_config_str(self.source, &PathBuf::from(format!("<preset:{}>", self.name)))
	}
}

const API_URL: &str = r#"
extensions = ["ts", "tsx"]

# Quoted dev API URL -> template literal on the configured base URL.
# Each rule matches the whole literal, so quotes of the other kinds inside it
# are left alone. Literals containing a backtick are skipped.
[[rules]]
pattern = { regex = "'http://localhost:3001/api([^'`\\r\\n]*)'" }
replacement = "`$${config.apiUrl}${1}`"

[[rules]]
pattern = { regex = "\"http://localhost:3001/api([^\"`\\r\\n]*)\"" }
replacement = "`$${config.apiUrl}${1}`"

[[rules]]
pattern = "`http://localhost:3001/api"
replacement = "`${config.apiUrl}"

# Repair a template opened by a prefix-only rewrite but still closed with `'`.
# Only applies when no backtick follows on the same line.
[[rules]]
pattern = { regex = "(?m)`\\$\\{config\\.apiUrl\\}([^'\"`\\r\\n]*)'([^`\\n]*)$" }
replacement = "`$${config.apiUrl}${1}`${2}"

[import]
line = "import { config } from '@/config'"
trigger = "config.apiUrl"
line-prefix = "import "
"#;

static PRESETS: &[Preset] = &[Preset {
	name: "api-url",
	description: "Replace http://localhost:3001/api literals with `${config.apiUrl}` and import config",
	source: API_URL,
}];

/// All built-in presets.
pub fn presets() -> &'static [Preset] {
	PRESETS
}

/// Look up a preset by name.
pub fn find_preset(name: &str) -> Result<&'static Preset> {
	PRESETS
		.iter()
		.find(|p| p.name == name)
		.ok_or_else(|| RetextError::UnknownPreset {
			name: name.to_string(),
		})
}
