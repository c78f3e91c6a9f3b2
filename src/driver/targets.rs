use crate::error::{Result, RetextError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How directories given as targets are expanded into files.
#[derive(Debug, Clone, Default)]
pub struct TargetOptions {
	/// Extensions (without the dot) to keep. Empty keeps every file.
	pub extensions: Vec<String>,

	/// Descend into subdirectories.
	pub recursive: bool,
}

impl TargetOptions {
	fn accepts(&self, path: &Path) -> bool {
		if self.extensions.is_empty() {
			return true;
		}
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| {
				self.extensions
					.iter()
					.any(|want| want.trim_start_matches('.') == ext)
			})
	}
}

/// Expand `paths` into a sorted, deduplicated list of files.
///
/// Paths that are not directories are always kept. Directories are walked (one level
/// unless `recursive`), keeping files with an accepted extension and skipping
/// hidden entries such as `.git`.
pub fn collect_targets(paths: &[PathBuf], options: &TargetOptions) -> Result<Vec<PathBuf>> {
	let mut files = BTreeSet::new();

	for path in paths {
		if path.is_dir() {
			walk_dir(path, options, &mut files)?;
		} else {
			// Missing paths are kept and surface as per-file read failures.
			files.insert(path.clone());
		}
	}

	Ok(files.into_iter().collect())
}

fn walk_dir(dir: &Path, options: &TargetOptions, files: &mut BTreeSet<PathBuf>) -> Result<()> {
	let max_depth = if options.recursive { usize::MAX } else { 1 };

	let walker = WalkDir::new(dir)
		.max_depth(max_depth)
		.sort_by_file_name()
		.into_iter()
		.filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

	for entry in walker {
		let entry = entry.map_err(|source| RetextError::WalkError {
			path: dir.to_path_buf(),
			source,
		})?;
		if entry.file_type().is_file() && options.accepts(entry.path()) {
			files.insert(entry.into_path());
		}
	}

	Ok(())
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
	name.to_str().is_some_and(|s| s.starts_with('.'))
}
