use crate::rules::pattern::Pattern;
use std::fmt;

/// Decides whether a line of a document is an import-like line.
///
/// The inserted directive goes right after the last line for which this
/// returns true. Closures `Fn(&str) -> bool` implement it directly.
pub trait LineClassifier: Send + Sync {
	fn is_import(&self, line: &str) -> bool;
}

impl<F> LineClassifier for F
where
	F: Fn(&str) -> bool + Send + Sync,
{
	fn is_import(&self, line: &str) -> bool {
		self(line)
	}
}

/// Built-in classifiers that can be described in a config file.
#[derive(Debug, Clone)]
pub enum ImportLineClassifier {
	/// The line, with leading whitespace trimmed, starts with the prefix.
	Prefix(String),

	/// The pattern matches somewhere in the line.
	Pattern(Pattern),
}

impl Default for ImportLineClassifier {
	fn default() -> Self {
		ImportLineClassifier::Prefix("import ".to_string())
	}
}

impl LineClassifier for ImportLineClassifier {
	fn is_import(&self, line: &str) -> bool {
		match self {
			ImportLineClassifier::Prefix(prefix) => line.trim_start().starts_with(prefix.as_str()),
			ImportLineClassifier::Pattern(pattern) => pattern.is_match(line),
		}
	}
}

/// A line that must be present whenever `trigger` occurs in a document.
pub struct ImportDirective {
	/// The line to insert, without a line terminator.
	pub line: String,

	/// Insertion happens only when this matches the rewritten text.
	pub trigger: Pattern,

	/// When this matches, the directive is considered already present.
	pub presence: Pattern,

	/// Locates the insertion point.
	pub classifier: Box<dyn LineClassifier>,
}

impl ImportDirective {
	/// A directive whose presence check is the line itself, placed after the
	/// last line starting with `import `.
	pub fn new(line: impl Into<String>, trigger: Pattern) -> Self {
		let line = line.into();
		ImportDirective {
			presence: Pattern::literal(line.clone()),
			line,
			trigger,
			classifier: Box::new(ImportLineClassifier::default()),
		}
	}

	pub fn with_presence(mut self, presence: Pattern) -> Self {
		self.presence = presence;
		self
	}

	pub fn with_classifier(mut self, classifier: impl LineClassifier + 'static) -> Self {
		self.classifier = Box::new(classifier);
		self
	}

	/// Whether `text` needs the directive inserted.
	pub fn is_needed(&self, text: &str) -> bool {
		self.trigger.is_match(text) && !self.presence.is_match(text)
	}

	/// Insert the directive if it is needed; otherwise return `None`.
	pub fn apply(&self, text: &str) -> Option<String> {
		if self.is_needed(text) {
			Some(insert_line(text, &self.line, self.classifier.as_ref()))
		} else {
			None
		}
	}
}

impl fmt::Debug for ImportDirective {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ImportDirective")
			.field("line", &self.line)
			.field("trigger", &self.trigger)
			.field("presence", &self.presence)
			.finish_non_exhaustive()
	}
}

/// Insert `line` after the last line accepted by `classifier`, or at the top.
///
/// Every other byte of `text` is preserved. The new line is terminated with
/// `\r\n` if the document uses CRLF anywhere, `\n` otherwise.
pub fn insert_line(text: &str, line: &str, classifier: &dyn LineClassifier) -> String {
	let eol = if text.contains("\r\n") { "\r\n" } else { "\n" };

	// Byte offset just past the last import-like line, and whether it was terminated.
	let mut anchor: Option<(usize, bool)> = None;
	let mut offset = 0;
	for raw in text.split_inclusive('\n') {
		offset += raw.len();
		let content = raw.strip_suffix('\n').unwrap_or(raw);
		let content = content.strip_suffix('\r').unwrap_or(content);
		if classifier.is_import(content) {
			anchor = Some((offset, raw.ends_with('\n')));
		}
	}

	let mut out = String::with_capacity(text.len() + line.len() + 2 * eol.len());
	match anchor {
		None => {
			out.push_str(line);
			out.push_str(eol);
			out.push_str(text);
		}
		Some((end, true)) => {
			out.push_str(&text[..end]);
			out.push_str(line);
			out.push_str(eol);
			out.push_str(&text[end..]);
		}
		Some((_, false)) => {
			out.push_str(text);
			out.push_str(eol);
			out.push_str(line);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	const IMPORT: &str = "import { config } from '@/config'";

	fn directive() -> ImportDirective {
		ImportDirective::new(IMPORT, Pattern::literal("config.apiUrl"))
	}

	#[test]
	fn test_prefix_classifier_trims_indentation() {
		let classifier = ImportLineClassifier::default();
		assert!(classifier.is_import("import a from 'b'"));
		assert!(classifier.is_import("    import a from 'b'"));
		assert!(!classifier.is_import("// import a from 'b'"));
		assert!(!classifier.is_import("const imported = 1"));
	}

	#[test]
	fn test_closure_classifier() {
		let classifier = |line: &str| line.starts_with("use ");
		assert!(classifier.is_import("use std::fs;"));
		assert!(!classifier.is_import("fn main() {}"));
	}

	#[test]
	fn test_insert_after_last_import() {
		let text = "import a from 'a'\nimport b from 'b'\nimport c from 'c'\n\nconst x = 1\n";
		let out = insert_line(text, IMPORT, &ImportLineClassifier::default());
		assert_eq!(
			out,
			format!("import a from 'a'\nimport b from 'b'\nimport c from 'c'\n{IMPORT}\n\nconst x = 1\n")
		);
	}

	#[test]
	fn test_insert_uses_last_import_even_if_not_contiguous() {
		let text = "import a from 'a'\nconst x = 1\nimport b from 'b'\nconst y = 2";
		let out = insert_line(text, IMPORT, &ImportLineClassifier::default());
		assert_eq!(
			out,
			format!("import a from 'a'\nconst x = 1\nimport b from 'b'\n{IMPORT}\nconst y = 2")
		);
	}

	#[test]
	fn test_insert_at_top_without_imports() {
		let text = "const x = 1\n";
		let out = insert_line(text, IMPORT, &ImportLineClassifier::default());
		assert_eq!(out, format!("{IMPORT}\nconst x = 1\n"));
	}

	#[test]
	fn test_insert_into_empty_text() {
		let out = insert_line("", IMPORT, &ImportLineClassifier::default());
		assert_eq!(out, format!("{IMPORT}\n"));
	}

	#[test]
	fn test_insert_when_import_is_last_line_without_newline() {
		let out = insert_line("import a from 'a'", IMPORT, &ImportLineClassifier::default());
		assert_eq!(out, format!("import a from 'a'\n{IMPORT}"));
	}

	#[test]
	fn test_insert_preserves_crlf() {
		let text = "import a from 'a'\r\nconst x = 1\r\n";
		let out = insert_line(text, IMPORT, &ImportLineClassifier::default());
		assert_eq!(out, format!("import a from 'a'\r\n{IMPORT}\r\nconst x = 1\r\n"));
	}

	#[test]
	fn test_insert_at_top_preserves_crlf() {
		let text = "const x = 1\r\n";
		let out = insert_line(text, IMPORT, &ImportLineClassifier::default());
		assert_eq!(out, format!("{IMPORT}\r\nconst x = 1\r\n"));
	}

	#[test]
	fn test_insert_after_unterminated_last_line_in_crlf_file() {
		let text = "const x = 1\r\nimport a from 'a'";
		let out = insert_line(text, IMPORT, &ImportLineClassifier::default());
		assert_eq!(out, format!("const x = 1\r\nimport a from 'a'\r\n{IMPORT}"));
	}

	#[test]
	fn test_insert_follows_document_line_ending() {
		// The anchor line is LF-terminated but the file is otherwise CRLF.
		let text = "import a from 'a'\nconst x = 1\r\n";
		let out = insert_line(text, IMPORT, &ImportLineClassifier::default());
		assert_eq!(out, format!("import a from 'a'\n{IMPORT}\r\nconst x = 1\r\n"));
	}

	#[test]
	fn test_directive_not_needed_without_trigger() {
		assert!(directive().apply("const x = 1").is_none());
	}

	#[test]
	fn test_directive_not_needed_when_present() {
		let text = format!("{IMPORT}\nconst u = `${{config.apiUrl}}/x`");
		assert!(directive().apply(&text).is_none());
	}

	#[test]
	fn test_directive_detects_own_insertion() {
		let d = directive();
		let once = d.apply("const u = `${config.apiUrl}/x`").unwrap();
		assert!(d.apply(&once).is_none());
	}

	#[test]
	fn test_custom_presence() {
		let d = directive().with_presence(Pattern::regex(r"import \{[^}]*\bconfig\b").unwrap());
		let text = "import { api, config } from '@/config'\nconfig.apiUrl";
		assert!(d.apply(text).is_none());
	}

	#[test]
	fn test_regex_classifier() {
		let d = directive().with_classifier(ImportLineClassifier::Pattern(
			Pattern::regex(r"^\s*(import|export) .* from ").unwrap(),
		));
		let text = "import a from 'a'\nexport * from 'b'\nconfig.apiUrl";
		let out = d.apply(text).unwrap();
		assert_eq!(out, format!("import a from 'a'\nexport * from 'b'\n{IMPORT}\nconfig.apiUrl"));
	}
}
