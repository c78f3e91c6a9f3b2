use crate::config::presets::find_preset;
use crate::config::types::{Config, ImportSpec, PatternSpec, RuleSpec};
use crate::error::{Result, RetextError};
use crate::rules::{ImportDirective, ImportLineClassifier, Pattern, Rewriter, Rule};
use tracing::debug;

impl PatternSpec {
	/// Compile into a match pattern.
	pub fn compile(&self) -> Result<Pattern> {
		match self {
			PatternSpec::Literal(text) => Ok(Pattern::literal(text.as_str())),
			PatternSpec::Regex { regex } => Pattern::regex(regex),
		}
	}
}

impl RuleSpec {
	/// Compile into a rule. Assumes `validate` has passed.
	pub fn compile(&self) -> Result<Rule> {
		if let Some(ref sed) = self.sed {
			return Rule::sed(sed);
		}

		let pattern = self.pattern.as_ref().ok_or(RetextError::MissingField {
			field: "pattern",
			context: "rule",
		})?;
		let replacement = self.replacement.clone().ok_or(RetextError::MissingField {
			field: "replacement",
			context: "rule",
		})?;

		Ok(Rule {
			pattern: pattern.compile()?,
			replacement,
		})
	}
}

impl ImportSpec {
	/// Compile into an import directive.
	pub fn compile(&self) -> Result<ImportDirective> {
		let mut directive = ImportDirective::new(self.line.as_str(), self.trigger.compile()?);

		if let Some(ref presence) = self.presence {
			directive = directive.with_presence(presence.compile()?);
		}

		if let Some(ref regex) = self.line_regex {
			directive =
				directive.with_classifier(ImportLineClassifier::Pattern(Pattern::regex(regex)?));
		} else if let Some(ref prefix) = self.line_prefix {
			directive = directive.with_classifier(ImportLineClassifier::Prefix(prefix.clone()));
		}

		Ok(directive)
	}
}

/// Fold a preset into `config`.
///
/// `preset_override` (from `--preset`) takes precedence over the config's own
/// `preset` key. Preset rules run first; the config's `[import]` and
/// non-empty `extensions` replace the preset's.
pub fn apply_preset(config: &Config, preset_override: Option<&str>) -> Result<Config> {
	let Some(name) = preset_override.or(config.preset.as_deref()) else {
		return Ok(config.clone());
	};

	let preset = find_preset(name)?;
	let base = preset.config()?;
	debug!(preset = name, rules = base.rules.len(), "applying preset");

	let mut rules = base.rules;
	rules.extend(config.rules.iter().cloned());

	Ok(Config {
		preset: Some(name.to_string()),
		paths: config.paths.clone(),
		extensions: if config.extensions.is_empty() {
			base.extensions
		} else {
			config.extensions.clone()
		},
		recursive: config.recursive || base.recursive,
		rules,
		import: config.import.clone().or(base.import),
	})
}

/// Compile every pattern in `config` into a rewriter.
///
/// Any malformed pattern fails here, before a single file is read.
pub fn build_rewriter(config: &Config) -> Result<Rewriter> {
	let rules = config
		.rules
		.iter()
		.map(RuleSpec::compile)
		.collect::<Result<Vec<_>>>()?;

	let import = config.import.as_ref().map(ImportSpec::compile).transpose()?;

	Ok(Rewriter::new(rules, import))
}
