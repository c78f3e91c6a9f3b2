use crate::error::Result;
use crate::rules::import::ImportDirective;
use crate::rules::pattern::Pattern;
use crate::rules::substitution::Substitution;
use std::borrow::Cow;
use tracing::debug;

/// A pattern and the template that replaces each of its matches.
#[derive(Debug, Clone)]
pub struct Rule {
	pub pattern: Pattern,
	pub replacement: String,
}

impl Rule {
	/// A rule replacing a literal substring verbatim.
	pub fn literal(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
		Rule {
			pattern: Pattern::literal(pattern),
			replacement: replacement.into(),
		}
	}

	/// A regex rule; `replacement` may reference the pattern's capture groups.
	pub fn regex(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
		Ok(Rule {
			pattern: Pattern::regex(pattern)?,
			replacement: replacement.into(),
		})
	}

	/// A rule from sed-style `s/pattern/replacement/flags` syntax.
	pub fn sed(input: &str) -> Result<Self> {
		let sub = Substitution::parse(input)?;
		Ok(Rule {
			pattern: sub.pattern,
			replacement: sub.replacement,
		})
	}

	/// Replace every non-overlapping match in one left-to-right pass.
	pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
		self.pattern.replace_all(text, &self.replacement)
	}
}

/// Applies an ordered rule list, then an optional import directive.
///
/// Construction is where patterns are compiled and can fail; rewriting itself
/// never fails and never touches the file system.
#[derive(Debug, Default)]
pub struct Rewriter {
	rules: Vec<Rule>,
	import: Option<ImportDirective>,
}

impl Rewriter {
	pub fn new(rules: Vec<Rule>, import: Option<ImportDirective>) -> Self {
		Rewriter { rules, import }
	}

	pub fn rules(&self) -> &[Rule] {
		&self.rules
	}

	pub fn import(&self) -> Option<&ImportDirective> {
		self.import.as_ref()
	}

	/// Rewrite `text`. Output is identical to the input when nothing applies.
	pub fn rewrite(&self, text: &str) -> String {
		rewrite(text, &self.rules, self.import.as_ref())
	}
}

/// Apply `rules` in order, each to the output of the previous one, then insert
/// the import line if its trigger matches and it is not already present.
pub fn rewrite(text: &str, rules: &[Rule], import: Option<&ImportDirective>) -> String {
	let mut current = text.to_string();

	for (i, rule) in rules.iter().enumerate() {
		let next = match rule.apply(&current) {
			Cow::Borrowed(_) => continue,
			Cow::Owned(next) => next,
		};
		debug!(
			rule = i,
			pattern = %rule.pattern,
			matches = rule.pattern.count_matches(&current),
			"rule applied"
		);
		current = next;
	}

	if let Some(directive) = import
		&& let Some(next) = directive.apply(&current)
	{
		debug!(line = %directive.line, "import inserted");
		current = next;
	}

	current
}
