use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use retext_cli::config::{
	CONFIG_FILE_NAME, Config, LoadedConfig, RuleSpec, apply_preset, build_rewriter,
	generate_init_template, presets, resolve_config, user_config_path,
};
use retext_cli::driver::{Mode, ProcessOptions, TargetOptions, collect_targets, process_files};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "RETEXT_LOG";

#[derive(Parser)]
#[command(name = "retext")]
#[command(
	author,
	version,
	about = "CLI tool for idempotent rule-based rewrites of source files"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Files or directories to rewrite (defaults to `paths` from the config)
	paths: Vec<PathBuf>,

	/// Use this config file instead of discovering .retext.toml
	#[arg(short, long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Use a built-in preset (see `retext presets`)
	#[arg(short, long, value_name = "NAME", global = true)]
	preset: Option<String>,

	/// Only pick up files with this extension when walking directories
	#[arg(short = 'e', long = "ext", value_name = "EXT")]
	extensions: Vec<String>,

	/// Descend into subdirectories
	#[arg(short, long)]
	recursive: bool,

	/// Don't write anything; exit non-zero if any file would change
	#[arg(long)]
	check: bool,

	/// Print a unified diff for each changed file
	#[arg(long)]
	diff: bool,

	/// Create a template .retext.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .retext.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Log rule and file details to stderr
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: Option<ConfigAction>,
	},
	/// List built-in presets
	Presets,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective configuration and where it came from
	Show,
	/// Check the configuration and compile its patterns without touching files
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	// Handle subcommands
	if let Some(ref command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				Some(ConfigAction::Show) => handle_config_show(&cli),
				Some(ConfigAction::Validate) => handle_config_validate(&cli),
				None => handle_missing_config_action(),
			},
			Commands::Presets => handle_presets(),
		};
	}

	handle_rewrite(&cli)
}

fn init_logging(verbose: bool) {
	let default_directive = if verbose { "retext_cli=debug,retext=debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.init();
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

/// Load the config file (if any) and fold in the selected preset.
fn load_effective_config(cli: &Cli) -> Result<(Option<LoadedConfig>, Config)> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let loaded =
		resolve_config(cli.config.as_deref(), &cwd).context("Failed to load configuration")?;

	if let Some(ref l) = loaded {
		info!(path = %l.path.display(), "using config");
	}

	let base = loaded
		.as_ref()
		.map(|l| l.config.clone())
		.unwrap_or_default();
	let effective =
		apply_preset(&base, cli.preset.as_deref()).context("Failed to apply preset")?;

	Ok((loaded, effective))
}

fn handle_rewrite(cli: &Cli) -> Result<ExitCode> {
	let (loaded, config) = load_effective_config(cli)?;

	if config.rules.is_empty() && config.import.is_none() {
		anyhow::bail!(
			"No rules configured. Pass --preset, --config, or create {CONFIG_FILE_NAME} with --init."
		);
	}

	// Compile everything before touching any file.
	let rewriter = build_rewriter(&config).context("Invalid rule configuration")?;

	let targets = if !cli.paths.is_empty() {
		cli.paths.clone()
	} else if let Some(ref l) = loaded
		&& !l.config.paths.is_empty()
	{
		l.resolved_paths()
	} else {
		anyhow::bail!("No paths given and none configured in {CONFIG_FILE_NAME}.");
	};

	let target_options = TargetOptions {
		extensions: if cli.extensions.is_empty() {
			config.extensions.clone()
		} else {
			cli.extensions.clone()
		},
		recursive: cli.recursive || config.recursive,
	};
	let files =
		collect_targets(&targets, &target_options).context("Failed to collect target files")?;

	info!(
		files = files.len(),
		rules = rewriter.rules().len(),
		"processing"
	);

	let options = ProcessOptions {
		mode: if cli.check { Mode::Check } else { Mode::Write },
		diff: cli.diff,
	};

	let report = process_files(&files, &rewriter, &options, |path, result| match result {
		Ok(outcome) => {
			if let Some(ref diff) = outcome.diff {
				print!("{diff}");
			}
			println!("{}: {}", outcome.status.label(), path.display());
		}
		Err(e) => eprintln!("Failed: {}: {}", path.display(), error_chain(e)),
	});

	println!("\n{}", report.summary());

	if !report.is_success() || (cli.check && report.changed() > 0) {
		Ok(ExitCode::FAILURE)
	} else {
		Ok(ExitCode::SUCCESS)
	}
}

fn handle_config_show(cli: &Cli) -> Result<ExitCode> {
	let (loaded, config) = load_effective_config(cli)?;

	match loaded {
		Some(ref l) => println!("# Source: {}", l.path.display()),
		None => println!("No configuration files found."),
	}
	if let Some(ref preset) = config.preset {
		println!("# preset: {}", preset);
	}
	if let Some(ref l) = loaded {
		for path in l.resolved_paths() {
			println!("# path: {}", path.display());
		}
	}
	if !config.extensions.is_empty() {
		println!("# extensions: {}", config.extensions.join(", "));
	}
	println!("# recursive: {}", config.recursive);
	println!("# rules: {}", config.rules.len());
	println!();

	for (i, rule) in config.rules.iter().enumerate() {
		println!("  Rule {}:", i + 1);
		print_rule(rule);
		println!();
	}

	if let Some(ref import) = config.import {
		println!("  Import:");
		println!("    line: {}", import.line);
		println!("    trigger: {}", import.trigger);
		match import.presence {
			Some(ref presence) => println!("    presence: {}", presence),
			None => println!("    presence: (the line itself)"),
		}
		if let Some(ref regex) = import.line_regex {
			println!("    line-regex: {}", regex);
		} else {
			let prefix = import.line_prefix.as_deref().unwrap_or("import ");
			println!("    line-prefix: {:?}", prefix);
		}
		println!();
	}

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!(
			"User config: {} ({})",
			user_path.display(),
			if user_path.is_file() { "exists" } else { "not found" }
		);
	}

	Ok(ExitCode::SUCCESS)
}

fn print_rule(rule: &RuleSpec) {
	if let Some(ref pattern) = rule.pattern {
		println!("    pattern: {}", pattern);
	}
	if let Some(ref replacement) = rule.replacement {
		println!("    replacement: {:?}", replacement);
	}
	if let Some(ref sed) = rule.sed {
		println!("    sed: {}", sed);
	}
}

fn handle_config_validate(cli: &Cli) -> Result<ExitCode> {
	let (loaded, config) = load_effective_config(cli)?;

	if loaded.is_none() && config.preset.is_none() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	let rewriter = build_rewriter(&config).context("Invalid rule configuration")?;

	let source = loaded
		.as_ref()
		.map(|l| l.path.display().to_string())
		.or_else(|| config.preset.as_ref().map(|p| format!("preset {p}")))
		.unwrap_or_default();
	println!(
		"{}: valid ({} rules, import {})",
		source,
		rewriter.rules().len(),
		if rewriter.import().is_some() { "configured" } else { "none" }
	);

	Ok(ExitCode::SUCCESS)
}

fn handle_missing_config_action() -> Result<ExitCode> {
	if Path::new("config").exists() {
		anyhow::bail!(
			"`config` is a subcommand. To rewrite the path named config, pass it as ./config"
		);
	}
	anyhow::bail!("Missing action: use `config show` or `config validate`.");
}

fn handle_presets() -> Result<ExitCode> {
	if Path::new("presets").exists() {
		eprintln!(
			"note: `presets` is a subcommand. To rewrite the path named presets, pass it as ./presets"
		);
	}
	for preset in presets() {
		println!("{:<12} {}", preset.name, preset.description);
	}
	Ok(ExitCode::SUCCESS)
}

/// Render an error with its `source()` chain on one line.
fn error_chain(error: &dyn std::error::Error) -> String {
	let mut message = error.to_string();
	let mut source = error.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
