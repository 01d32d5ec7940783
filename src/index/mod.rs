pub mod build;
pub mod part_index;
pub mod types;

pub use build::{build_index, build_index_cancellable};
pub use part_index::PartIndex;
pub use types::*;
