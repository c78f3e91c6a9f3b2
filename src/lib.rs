//! Retext - CLI tool for idempotent rule-based rewrites of source files.
//!
//! This library provides the core functionality for retext, including:
//! - A pure text rewriter: ordered literal/regex rules plus conditional import insertion
//! - Configuration file parsing, discovery, and built-in presets
//! - A file-set driver that writes files back only when their content changes
//!
//! # Example
//!
//! ```
//! use retext_cli::rules::{ImportDirective, Pattern, Rewriter, Rule};
//!
//! let rewriter = Rewriter::new(
//!     vec![Rule::literal("'http://localhost:3001/api", "`${config.apiUrl}")],
//!     Some(ImportDirective::new(
//!         "import { config } from '@/config'",
//!         Pattern::literal("config.apiUrl"),
//!     )),
//! );
//!
//! let out = rewriter.rewrite("const base = 'http://localhost:3001/api/users'\n");
//! assert_eq!(
//!     out,
//!     "import { config } from '@/config'\nconst base = `${config.apiUrl}/users'\n"
//! );
//! assert_eq!(rewriter.rewrite(&out), out);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod rules;

pub use error::{Result, RetextError};
