//! # folio-scan
//!
//! Turns a git repository into suggested portfolio fields. A scan shallow-
//! clones the repository into a temp directory, then reads:
//!
//! - the README: description, live URL, highlights, "what I learned" bullets
//! - `package.json` / `package-lock.json`: dependencies and tech hints
//! - the file tree: extension counts, Docker files, a screenshot candidate
//!
//! Missing or malformed content never fails a scan; it leaves the matching
//! report fields empty. Only git and filesystem failures are errors.
//!
//! [`update::update_project_from_repo`] feeds a scan into the project catalog.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod manifest;
pub mod readme;
pub mod repo;
pub mod tech;
pub mod types;
pub mod update;

pub use error::ScanError;
pub use repo::{scan_checkout, RepoScanner};
pub use types::{RepoSignals, ScanReport};
pub use update::{update_project_from_repo, UpdateRequest, UpdateSummary};
