/// Marker that restricts a query to the lateral scope
pub const SCOPE_MARKER: char = '>';

/// How query text is matched against parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// Parts starting with the text (`text*`)
    Prefix,
    /// Parts containing the text anywhere (`*text*`), written with a leading space
    Substring,
    /// Prefix match limited to the active scope, written with a leading `>`
    ScopedPrefix,
}

/// Parsed part query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartQuery {
    pub mode: QueryMode,
    /// Lowercased text with the mode prefix removed
    pub text: String,
}

impl PartQuery {
    pub fn prefix(text: &str) -> Self {
        Self {
            mode: QueryMode::Prefix,
            text: text.to_lowercase(),
        }
    }

    /// True when the query matches every part it is run against.
    pub fn is_match_all(&self) -> bool {
        self.text.is_empty()
    }

    /// True for queries that only make sense inside a lateral scope.
    pub fn is_scoped(&self) -> bool {
        self.mode == QueryMode::ScopedPrefix
    }
}

/// Parse raw query text into a mode and normalized search text.
///
/// - `""` or `"ph"` is a prefix query
/// - `" oto"` (leading whitespace) is a substring query for `oto`
/// - `">ph"` is a prefix query restricted to the active scope
pub fn parse_part_query(input: &str) -> PartQuery {
    let lowered = input.to_lowercase();

    match lowered.chars().next() {
        Some(ch) if ch.is_whitespace() => PartQuery {
            mode: QueryMode::Substring,
            text: lowered.trim_start().to_string(),
        },
        Some(SCOPE_MARKER) => PartQuery {
            mode: QueryMode::ScopedPrefix,
            text: lowered[SCOPE_MARKER.len_utf8()..].to_string(),
        },
        _ => PartQuery {
            mode: QueryMode::Prefix,
            text: lowered,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_prefix_match_all() {
        let q = parse_part_query("");
        assert_eq!(q.mode, QueryMode::Prefix);
        assert!(q.is_match_all());
    }

    #[test]
    fn test_plain_prefix_lowercased() {
        let q = parse_part_query("PhOto");
        assert_eq!(q, PartQuery::prefix("photo"));
    }

    #[test]
    fn test_leading_space_is_substring() {
        let q = parse_part_query(" oto");
        assert_eq!(q.mode, QueryMode::Substring);
        assert_eq!(q.text, "oto");
    }

    #[test]
    fn test_leading_tab_and_spaces_stripped() {
        let q = parse_part_query("\t  OTO");
        assert_eq!(q.mode, QueryMode::Substring);
        assert_eq!(q.text, "oto");
    }

    #[test]
    fn test_whitespace_only_is_substring_match_all() {
        let q = parse_part_query("   ");
        assert_eq!(q.mode, QueryMode::Substring);
        assert!(q.is_match_all());
    }

    #[test]
    fn test_scope_marker() {
        let q = parse_part_query(">Ph");
        assert_eq!(q.mode, QueryMode::ScopedPrefix);
        assert_eq!(q.text, "ph");
        assert!(q.is_scoped());
    }

    #[test]
    fn test_bare_scope_marker_matches_all() {
        let q = parse_part_query(">");
        assert_eq!(q.mode, QueryMode::ScopedPrefix);
        assert!(q.is_match_all());
    }

    #[test]
    fn test_marker_only_at_start() {
        let q = parse_part_query("a>b");
        assert_eq!(q.mode, QueryMode::Prefix);
        assert_eq!(q.text, "a>b");
    }

    #[test]
    fn test_trailing_whitespace_kept() {
        let q = parse_part_query("ph ");
        assert_eq!(q.mode, QueryMode::Prefix);
        assert_eq!(q.text, "ph ");
    }
}
