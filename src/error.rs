use std::path::PathBuf;

/// Library-level structured errors for retext.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RetextError {
	#[error("Invalid pattern: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution `{input}`: {reason}")]
	InvalidSubstitution { input: String, reason: String },

	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Missing field `{field}` in {context}")]
	MissingField {
		field: &'static str,
		context: &'static str,
	},

	#[error("Unknown preset: {name}")]
	UnknownPreset { name: String },

	#[error("Failed to read {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write {path}")]
	FileWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to walk directory: {path}")]
	WalkError {
		path: PathBuf,
		#[source]
		source: walkdir::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RetextError.
pub type Result<T> = std::result::Result<T, RetextError>;
