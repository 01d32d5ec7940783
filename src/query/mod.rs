pub mod executor;
pub mod parser;

pub use executor::{
    files_for_part, filter_parts, parts_for_file, sort_file_ids, sort_files, FileSort, LateralScope, Scope,
};
pub use parser::{parse_part_query, PartQuery, QueryMode, SCOPE_MARKER};
