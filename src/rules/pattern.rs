use crate::error::{Result, RetextError};
use regex::Regex;
use std::borrow::Cow;
use std::fmt;

/// A compiled match pattern: either a literal substring or a regex.
#[derive(Debug, Clone)]
pub enum Pattern {
	/// Matches the exact substring.
	Literal(String),

	/// Matches a regular expression.
	Regex(Regex),
}

impl Pattern {
	/// Build a literal pattern.
	pub fn literal(text: impl Into<String>) -> Self {
		Pattern::Literal(text.into())
	}

	/// Compile a regex pattern.
	pub fn regex(pattern: &str) -> Result<Self> {
		compile_regex(pattern).map(Pattern::Regex)
	}

	/// Whether the pattern occurs anywhere in `text`.
	pub fn is_match(&self, text: &str) -> bool {
		match self {
			Pattern::Literal(needle) => !needle.is_empty() && text.contains(needle.as_str()),
			Pattern::Regex(regex) => regex.is_match(text),
		}
	}

	/// Number of non-overlapping matches in `text`.
	pub fn count_matches(&self, text: &str) -> usize {
		match self {
			Pattern::Literal(needle) if needle.is_empty() => 0,
			Pattern::Literal(needle) => text.matches(needle.as_str()).count(),
			Pattern::Regex(regex) => regex.find_iter(text).count(),
		}
	}

	/// Replace every non-overlapping match, scanning left to right.
	///
	/// Literal patterns substitute `replacement` verbatim. Regex patterns expand
	/// `$1` / `${name}` group references from their own captures.
	pub fn replace_all<'t>(&self, text: &'t str, replacement: &str) -> Cow<'t, str> {
		match self {
			Pattern::Literal(needle) if needle.is_empty() || !text.contains(needle.as_str()) => {
				Cow::Borrowed(text)
			}
			Pattern::Literal(needle) => Cow::Owned(text.replace(needle.as_str(), replacement)),
			Pattern::Regex(regex) => regex.replace_all(text, replacement),
		}
	}
}

impl fmt::Display for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Pattern::Literal(needle) => write!(f, "{needle:?}"),
			Pattern::Regex(regex) => write!(f, "/{}/", regex.as_str()),
		}
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| RetextError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})
}
