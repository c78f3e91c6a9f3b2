use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Render a unified diff between the old and new contents of `path`.
pub fn unified_diff(path: &Path, before: &str, after: &str) -> String {
	let name = path.display().to_string();
	TextDiff::from_lines(before, after)
		.unified_diff()
		.context_radius(3)
		.header(&format!("a/{name}"), &format!("b/{name}"))
		.to_string()
}

/// Count inserted and deleted lines between two texts.
pub fn line_changes(before: &str, after: &str) -> (usize, usize) {
	let diff = TextDiff::from_lines(before, after);
	let mut inserted = 0;
	let mut deleted = 0;

	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Insert => inserted += 1,
			ChangeTag::Delete => deleted += 1,
			ChangeTag::Equal => {}
		}
	}

	(inserted, deleted)
}
