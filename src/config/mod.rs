//! Configuration loading and parsing for retext.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Config file discovery
//! - Built-in presets
//! - Compiling a config into a `Rewriter`

pub mod compile;
pub mod discovery;
pub mod parser;
pub mod presets;
pub mod template;
pub mod types;

pub use compile::{apply_preset, build_rewriter};
pub use discovery::{
	CONFIG_FILE_NAME, NO_USER_CONFIG_ENV, discover_config, load_config_file, resolve_config,
	user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use presets::{Preset, find_preset, presets};
pub use template::generate_init_template;
pub use types::{Config, ImportSpec, LoadedConfig, PatternSpec, RuleSpec};
