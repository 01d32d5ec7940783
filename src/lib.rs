//! # fpm - File Part Matcher
//!
//! fpm indexes every file name under a directory by its *parts*: the
//! lowercase alphanumeric runs of its relative path, with trailing digits
//! dropped. `trip/Beach01.JPG` is filed under `trip`, `beach` and `jpg`.
//! Typing a few letters narrows the part list; picking a part lists the
//! files that contain it.
//!
//! ## Architecture
//!
//! - [`index`] - Directory scan and the part → files posting lists
//! - [`query`] - Query modes, part filtering, lateral scopes and file sorting
//! - [`session`] - The stateful browsing API the front ends drive
//! - [`launch`] - Opening files and folders with the platform handler
//! - [`output`] - Plain and JSON output for the command line
//! - [`tui`] - Interactive terminal UI (feature `interactive`)
//! - [`utils`] - Tokenizer and progress reporting
//!
//! ## Quick Start
//!
//! ```no_run
//! use fpm::index::{build_index, ScanConfig};
//! use fpm::query::{filter_parts, parse_part_query, Scope};
//!
//! let (index, summary) = build_index("/photos".as_ref(), &ScanConfig::default()).unwrap();
//! println!("{} parts among {} files", summary.part_count, summary.file_count);
//!
//! let query = parse_part_query("bea");
//! for part in filter_parts(&index, &Scope::Global, &query) {
//!     for file in index.files_for_part(part) {
//!         println!("{part}: {}", file.relative_path);
//!     }
//! }
//! ```

pub mod error;
pub mod index;
pub mod launch;
pub mod output;
pub mod query;
pub mod session;
#[cfg(feature = "interactive")]
pub mod tui;
pub mod utils;

pub use error::{MatchError, Result};
