//! Text rewriting rules for retext.
//!
//! This module handles:
//! - Literal and regex match patterns
//! - Sed-like substitution parsing
//! - Conditional import-line insertion
//! - The pure `rewrite` core that ties them together

pub mod import;
pub mod pattern;
pub mod rewriter;
pub mod substitution;

pub use import::{ImportDirective, ImportLineClassifier, LineClassifier, insert_line};
pub use pattern::Pattern;
pub use rewriter::{Rewriter, Rule, rewrite};
pub use substitution::Substitution;
