//! Utility functions shared by the indexer and the query engine.
//!
//! ## Modules
//!
//! - [`tokenizer`] - Path to part extraction
//! - [`progress`] - Scan spinner (no-op without the `progress` feature)
//!
//! ```no_run
//! use fpm::utils::extract_parts;
//!
//! let parts = extract_parts("Holiday/IMG_0042.JPG");
//! // Returns: ["holiday", "img", "jpg"]
//! ```

pub mod progress;
pub mod tokenizer;

pub use progress::ScanProgress;
pub use tokenizer::*;
