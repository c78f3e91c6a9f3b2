//! File-set processing for retext.
//!
//! This module handles:
//! - Expanding target paths into files
//! - Read, rewrite, and write-on-change for each file
//! - Per-file outcomes and a batch summary
//!
//! All file-system access lives here; `rules` never touches the disk.

pub mod diff;
pub mod targets;

pub use diff::{line_changes, unified_diff};
pub use targets::{TargetOptions, collect_targets};

use crate::error::{Result, RetextError};
use crate::rules::Rewriter;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whether changed files are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// Write files whose content changed.
	#[default]
	Write,

	/// Never write; only report what would change.
	Check,
}

/// Options for a processing run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
	pub mode: Mode,

	/// Render a unified diff for each changed file.
	pub diff: bool,
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
	/// Content changed and was written.
	Updated,

	/// Content would change (check mode).
	WouldUpdate,

	/// Rewriting produced identical content; nothing was written.
	Unchanged,
}

impl FileStatus {
	/// Label used in status lines.
	pub fn label(&self) -> &'static str {
		match self {
			FileStatus::Updated => "Updated",
			FileStatus::WouldUpdate => "Would update",
			FileStatus::Unchanged => "Unchanged",
		}
	}

	pub fn is_change(&self) -> bool {
		!matches!(self, FileStatus::Unchanged)
	}
}

/// Result of processing one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
	pub path: PathBuf,
	pub status: FileStatus,

	/// Unified diff, when requested and the file changed.
	pub diff: Option<String>,
}

/// Read `path`, rewrite it, and write it back only if the content changed.
///
/// The new content is computed in full before anything is written, and the
/// write replaces the file in one rename.
pub fn process_file(path: &Path, rewriter: &Rewriter, options: &ProcessOptions) -> Result<FileOutcome> {
	let before = fs::read_to_string(path).map_err(|source| RetextError::FileRead {
		path: path.to_path_buf(),
		source,
	})?;

	let after = rewriter.rewrite(&before);

	if after == before {
		debug!(path = %path.display(), "no changes");
		return Ok(FileOutcome {
			path: path.to_path_buf(),
			status: FileStatus::Unchanged,
			diff: None,
		});
	}

	let (inserted, deleted) = line_changes(&before, &after);
	debug!(path = %path.display(), inserted, deleted, "content changed");

	let diff = options.diff.then(|| unified_diff(path, &before, &after));

	let status = match options.mode {
		Mode::Check => FileStatus::WouldUpdate,
		Mode::Write => {
			write_replace(path, &after).map_err(|source| RetextError::FileWrite {
				path: path.to_path_buf(),
				source,
			})?;
			FileStatus::Updated
		}
	};

	Ok(FileOutcome {
		path: path.to_path_buf(),
		status,
		diff,
	})
}

/// Replace `path` with `contents` via a temp file in the same directory,
/// keeping the original permissions.
///
/// Symlinks are resolved first so the link stays and its target is updated.
fn write_replace(path: &Path, contents: &str) -> std::io::Result<()> {
	let target = fs::canonicalize(path)?;
	let dir = target.parent().unwrap_or_else(|| Path::new("."));
	let permissions = fs::metadata(&target)?.permissions();

	let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
	tmp.write_all(contents.as_bytes())?;
	tmp.as_file().sync_all()?;
	fs::set_permissions(tmp.path(), permissions)?;
	tmp.persist(&target).map_err(|e| e.error)?;

	Ok(())
}

/// Outcomes of a batch run.
#[derive(Debug, Default)]
pub struct Report {
	pub mode: Mode,
	pub outcomes: Vec<FileOutcome>,
	pub failures: Vec<(PathBuf, RetextError)>,
}

impl Report {
	pub fn changed(&self) -> usize {
		self.outcomes.iter().filter(|o| o.status.is_change()).count()
	}

	pub fn unchanged(&self) -> usize {
		self.outcomes.len() - self.changed()
	}

	pub fn failed(&self) -> usize {
		self.failures.len()
	}

	/// True when every file was read and (if needed) written.
	pub fn is_success(&self) -> bool {
		self.failures.is_empty()
	}

	/// One-line summary, e.g. `3 updated, 9 unchanged, 0 failed`.
	pub fn summary(&self) -> String {
		let verb = match self.mode {
			Mode::Write => "updated",
			Mode::Check => "would update",
		};
		format!(
			"{} {}, {} unchanged, {} failed",
			self.changed(),
			verb,
			self.unchanged(),
			self.failed()
		)
	}
}

/// Process every file in `paths`, continuing past per-file failures.
///
/// `on_file` is called once per file, in order, as soon as its result is known.
pub fn process_files<F>(
	paths: &[PathBuf],
	rewriter: &Rewriter,
	options: &ProcessOptions,
	mut on_file: F,
) -> Report
where
	F: FnMut(&Path, &Result<FileOutcome>),
{
	let mut report = Report {
		mode: options.mode,
		..Default::default()
	};

	for path in paths {
		let result = process_file(path, rewriter, options);
		on_file(path, &result);

		match result {
			Ok(outcome) => report.outcomes.push(outcome),
			Err(e) => {
				warn!(path = %path.display(), error = %e, "file failed");
				report.failures.push((path.clone(), e));
			}
		}
	}

	report
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rules::{ImportDirective, Pattern, Rule};

	const IMPORT: &str = "import { config } from '@/config'";

	fn rewriter() -> Rewriter {
		Rewriter::new(
			vec![Rule::literal("'http://localhost:3001/api", "`${config.apiUrl}")],
			Some(ImportDirective::new(IMPORT, Pattern::literal("config.apiUrl"))),
		)
	}

	#[test]
	fn test_process_file_updates() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("users.ts");
		fs::write(&path, "import a from 'a'\nget('http://localhost:3001/api/users')\n").unwrap();

		let outcome = process_file(&path, &rewriter(), &ProcessOptions::default()).unwrap();
		assert_eq!(outcome.status, FileStatus::Updated);
		assert!(outcome.diff.is_none());

		let content = fs::read_to_string(&path).unwrap();
		assert_eq!(
			content,
			format!("import a from 'a'\n{IMPORT}\nget(`${{config.apiUrl}}/users')\n")
		);
	}

	#[cfg(unix)]
	#[test]
	fn test_process_file_unchanged_is_not_written() {
		use std::os::unix::fs::MetadataExt;

		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("fipe.ts");
		fs::write(&path, "const FIPE = 'https://parallelum.com.br'\n").unwrap();
		let inode = fs::metadata(&path).unwrap().ino();

		let outcome = process_file(&path, &rewriter(), &ProcessOptions::default()).unwrap();
		assert_eq!(outcome.status, FileStatus::Unchanged);
		// A write replaces the file, so the inode would change.
		assert_eq!(fs::metadata(&path).unwrap().ino(), inode);
	}

	#[test]
	fn test_check_mode_does_not_write() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("boxes.ts");
		let original = "get('http://localhost:3001/api/boxes')\n";
		fs::write(&path, original).unwrap();

		let options = ProcessOptions {
			mode: Mode::Check,
			diff: true,
		};
		let outcome = process_file(&path, &rewriter(), &options).unwrap();
		assert_eq!(outcome.status, FileStatus::WouldUpdate);
		assert!(outcome.diff.unwrap().contains("+get(`${config.apiUrl}/boxes')"));
		assert_eq!(fs::read_to_string(&path).unwrap(), original);
	}

	#[cfg(unix)]
	#[test]
	fn test_write_keeps_permissions() {
		use std::os::unix::fs::PermissionsExt;

		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("run.sh");
		fs::write(&path, "curl 'http://localhost:3001/api/health'\n").unwrap();
		fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

		process_file(&path, &rewriter(), &ProcessOptions::default()).unwrap();
		let mode = fs::metadata(&path).unwrap().permissions().mode();
		assert_eq!(mode & 0o777, 0o755);
	}

	#[cfg(unix)]
	#[test]
	fn test_write_through_symlink_updates_target() {
		let temp_dir = tempfile::tempdir().unwrap();
		let real = temp_dir.path().join("real.ts");
		let link = temp_dir.path().join("link.ts");
		fs::write(&real, "get('http://localhost:3001/api/x')\n").unwrap();
		std::os::unix::fs::symlink(&real, &link).unwrap();

		let outcome = process_file(&link, &rewriter(), &ProcessOptions::default()).unwrap();
		assert_eq!(outcome.status, FileStatus::Updated);

		assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
		assert_eq!(
			fs::read_to_string(&real).unwrap(),
			format!("{IMPORT}\nget(`${{config.apiUrl}}/x')\n")
		);
	}

	#[test]
	fn test_read_failure() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("missing.ts");
		let result = process_file(&path, &rewriter(), &ProcessOptions::default());
		assert!(matches!(result, Err(RetextError::FileRead { .. })));
	}

	#[test]
	fn test_invalid_utf8_is_read_failure() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("binary.ts");
		fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
		let result = process_file(&path, &rewriter(), &ProcessOptions::default());
		assert!(matches!(result, Err(RetextError::FileRead { .. })));
	}

	#[test]
	fn test_batch_continues_after_failure() {
		let temp_dir = tempfile::tempdir().unwrap();
		let good = temp_dir.path().join("a.ts");
		let missing = temp_dir.path().join("b.ts");
		let same = temp_dir.path().join("c.ts");
		fs::write(&good, "get('http://localhost:3001/api/a')\n").unwrap();
		fs::write(&same, "const x = 1\n").unwrap();

		let mut seen = Vec::new();
		let report = process_files(
			&[good.clone(), missing.clone(), same.clone()],
			&rewriter(),
			&ProcessOptions::default(),
			|path, result| seen.push((path.to_path_buf(), result.is_ok())),
		);

		assert_eq!(
			seen,
			vec![(good, true), (missing.clone(), false), (same, true)]
		);
		assert_eq!(report.changed(), 1);
		assert_eq!(report.unchanged(), 1);
		assert_eq!(report.failed(), 1);
		assert_eq!(report.failures[0].0, missing);
		assert!(!report.is_success());
		assert_eq!(report.summary(), "1 updated, 1 unchanged, 1 failed");
	}

	#[test]
	fn test_check_summary_wording() {
		let report = Report {
			mode: Mode::Check,
			..Default::default()
		};
		assert_eq!(report.summary(), "0 would update, 0 unchanged, 0 failed");
		assert!(report.is_success());
	}
}
