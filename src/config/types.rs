use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::RetextError;

/// Top-level configuration from a `.retext.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Built-in rule set to start from. Its rules run before `rules`.
	#[serde(default)]
	pub preset: Option<String>,

	/// Default targets when none are given on the command line.
	/// Relative paths are resolved against the config file's directory.
	#[serde(default)]
	pub paths: Vec<PathBuf>,

	/// File extensions (without the dot) kept when walking directories.
	/// Empty means every file.
	#[serde(default)]
	pub extensions: Vec<String>,

	/// Descend into subdirectories when walking directories.
	#[serde(default)]
	pub recursive: bool,

	/// Rewrite rules, applied in order.
	#[serde(default)]
	pub rules: Vec<RuleSpec>,

	/// Line to insert when the rewritten text needs it.
	#[serde(default)]
	pub import: Option<ImportSpec>,
}

/// A pattern as written in config: a bare string is a literal,
/// `{ regex = "..." }` is a regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
	Literal(String),
	Regex { regex: String },
}

/// A rewrite rule as written in config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleSpec {
	/// What to match (mutually exclusive with `sed`).
	pub pattern: Option<PatternSpec>,

	/// Replacement for `pattern`. Regex patterns may use `$1` / `${name}`.
	pub replacement: Option<String>,

	/// Sed-style substitution: "s/pattern/replacement/flags".
	pub sed: Option<String>,
}

/// The `[import]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ImportSpec {
	/// The line to insert.
	pub line: String,

	/// Insert only when this occurs in the rewritten text.
	pub trigger: PatternSpec,

	/// Skip insertion when this occurs. Defaults to `line` itself.
	#[serde(default)]
	pub presence: Option<PatternSpec>,

	/// Import-like lines start with this after trimming indentation.
	#[serde(default)]
	pub line_prefix: Option<String>,

	/// Import-like lines match this regex.
	#[serde(default)]
	pub line_regex: Option<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl LoadedConfig {
	/// Directory that relative `paths` entries are resolved against.
	pub fn base_dir(&self) -> &Path {
		self.path.parent().unwrap_or_else(|| Path::new("."))
	}

	/// `paths` resolved against the config file's directory.
	pub fn resolved_paths(&self) -> Vec<PathBuf> {
		let base = self.base_dir();
		self.config.paths.iter().map(|p| base.join(p)).collect()
	}
}

impl fmt::Display for PatternSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PatternSpec::Literal(text) => write!(f, "{text:?}"),
			PatternSpec::Regex { regex } => write!(f, "regex {regex:?}"),
		}
	}
}

impl RuleSpec {
	/// Validate that exactly one way of describing the rule is used.
	pub fn validate(&self) -> Result<(), RetextError> {
		match (&self.pattern, &self.sed) {
			(Some(_), Some(_)) => Err(RetextError::MutuallyExclusive {
				option1: "pattern".to_string(),
				option2: "sed".to_string(),
			}),
			(None, None) => Err(RetextError::MissingField {
				field: "pattern",
				context: "rule",
			}),
			(Some(_), None) if self.replacement.is_none() => Err(RetextError::MissingField {
				field: "replacement",
				context: "rule",
			}),
			(None, Some(_)) if self.replacement.is_some() => Err(RetextError::MutuallyExclusive {
				option1: "sed".to_string(),
				option2: "replacement".to_string(),
			}),
			_ => Ok(()),
		}
	}
}

impl ImportSpec {
	/// Validate the import table.
	pub fn validate(&self) -> Result<(), RetextError> {
		if self.line.trim().is_empty() {
			return Err(RetextError::MissingField {
				field: "line",
				context: "[import]",
			});
		}

		if self.line_prefix.is_some() && self.line_regex.is_some() {
			return Err(RetextError::MutuallyExclusive {
				option1: "line-prefix".to_string(),
				option2: "line-regex".to_string(),
			});
		}

		Ok(())
	}
}

impl Config {
	/// Validate all rules and the import table in this config.
	pub fn validate(&self) -> Result<(), RetextError> {
		for rule in &self.rules {
			rule.validate()?;
		}
		if let Some(ref import) = self.import {
			import.validate()?;
		}
		Ok(())
	}
}
