use crate::error::{Result, RetextError};
use crate::rules::pattern::{Pattern, compile_regex};

/// A parsed sed-style substitution: `s/pattern/replacement/flags`.
///
/// Any character after the leading `s` is the delimiter. Every match is
/// replaced, so `g` is accepted but changes nothing; `i` makes the pattern
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct Substitution {
	/// The compiled pattern.
	pub pattern: Pattern,

	/// The replacement template.
	pub replacement: String,
}

impl Substitution {
	/// Parse a substitution string.
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| RetextError::InvalidSubstitution {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		let Some(rest) = input.strip_prefix('s') else {
			return Err(invalid("must start with 's'"));
		};

		let mut chars = rest.chars();
		let delimiter = chars.next().ok_or_else(|| invalid("too short"))?;
		if delimiter.is_alphanumeric() || delimiter == '\\' || delimiter.is_whitespace() {
			return Err(invalid("delimiter must be punctuation"));
		}

		let parts = split_by_delimiter(chars.as_str(), delimiter);
		if parts.len() < 3 {
			return Err(invalid("must have pattern, replacement and closing delimiter"));
		}
		if parts.len() > 3 {
			return Err(invalid("unescaped delimiter in pattern or replacement"));
		}

		let mut case_insensitive = false;
		for flag in parts[2].chars() {
			match flag {
				'g' => {}
				'i' => case_insensitive = true,
				other => return Err(invalid(&format!("unknown flag '{other}'"))),
			}
		}

		if parts[0].is_empty() {
			return Err(invalid("empty pattern"));
		}

		let pattern_str = if case_insensitive {
			format!("(?i){}", parts[0])
		} else {
			parts[0].clone()
		};

		Ok(Substitution {
			pattern: Pattern::Regex(compile_regex(&pattern_str)?),
			replacement: parts[1].clone(),
		})
	}
}

/// Split a string by a delimiter, respecting backslash escapes of the delimiter.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '\\' && chars.peek() == Some(&delimiter) {
			current.push(delimiter);
			chars.next();
		} else if c == delimiter {
			parts.push(std::mem::take(&mut current));
		} else {
			current.push(c);
		}
	}

	parts.push(current);
	parts
}
