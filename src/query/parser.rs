use nom::{IResult, Parser, bytes::complete::take_while};

/// Characters interpreted as search flags while they form the prefix of the
/// input. `<` is reserved for planet search and currently has no effect.
pub const FLAG_CHARS: &str = "!-#.*<";

/// Result of parsing one raw search term: a set of flags plus the free-text
/// label used for substring matching. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Raw label text; lowercased at match time, not here.
    pub label: String,
    /// Search every loaded map instead of only the current one.
    pub all_maps: bool,
    /// Include planet locations. Not reachable from the flag alphabet; the
    /// host decides whether to enable it.
    pub world_map: bool,
    /// Include pawns on the selected maps.
    pub pawns: bool,
    /// Restrict pawn results to the player faction.
    pub colony_only: bool,
    /// Include haulable items on the selected maps.
    pub items: bool,
    /// Match everything visible, bypassing label and colony filters.
    pub match_all: bool,
    /// Diagnostic copy of the extracted label.
    pub debug_label: String,
}

fn flag_prefix(input: &str) -> IResult<&str, &str> {
    take_while(|c| FLAG_CHARS.contains(c)).parse(input)
}

/// Parse a raw search term. Total: any input, including the empty string,
/// yields a well-formed query.
///
/// Flag recognition is prefix-only. The first character outside the flag
/// alphabet starts the label, and everything from there on is label text
/// verbatim, flag characters included.
pub fn parse_query(raw: &str) -> ParsedQuery {
    // take_while cannot fail; fall back to "no flags" to stay total anyway.
    let (label, flags) = flag_prefix(raw).unwrap_or((raw, ""));

    let mut query = ParsedQuery {
        label: label.to_string(),
        debug_label: label.to_string(),
        ..ParsedQuery::default()
    };

    for c in flags.chars() {
        match c {
            '!' => query.all_maps = true,
            '-' => query.pawns = true,
            '#' => query.colony_only = true,
            '.' => query.items = true,
            '*' => query.match_all = true,
            // Reserved flag characters are consumed without effect.
            _ => {}
        }
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let query = parse_query("");
        assert_eq!(query, ParsedQuery::default());
    }

    #[test]
    fn test_label_only() {
        let query = parse_query("steel");
        assert_eq!(query.label, "steel");
        assert!(!query.pawns);
        assert!(!query.items);
        assert!(!query.all_maps);
        assert!(!query.colony_only);
        assert!(!query.match_all);
    }

    #[test]
    fn test_each_flag() {
        assert!(parse_query("!").all_maps);
        assert!(parse_query("-").pawns);
        assert!(parse_query("#").colony_only);
        assert!(parse_query(".").items);
        assert!(parse_query("*").match_all);
    }

    #[test]
    fn test_match_all_has_empty_label() {
        let query = parse_query("*");
        assert!(query.match_all);
        assert_eq!(query.label, "");
    }

    #[test]
    fn test_combined_flags_with_label() {
        let query = parse_query("-.foo");
        assert!(query.pawns);
        assert!(query.items);
        assert!(!query.all_maps);
        assert_eq!(query.label, "foo");
        assert_eq!(query.debug_label, "foo");
    }

    #[test]
    fn test_flags_are_order_insensitive() {
        let a = parse_query("-.#joe");
        let b = parse_query("#.-joe");
        assert_eq!(a, b);
    }

    #[test]
    fn test_flag_recognition_is_prefix_only() {
        let query = parse_query("foo-.");
        assert!(!query.pawns);
        assert!(!query.items);
        assert_eq!(query.label, "foo-.");
    }

    #[test]
    fn test_label_phase_is_never_reentered() {
        let query = parse_query("-a-b.c");
        assert!(query.pawns);
        assert!(!query.items);
        assert_eq!(query.label, "a-b.c");
    }

    #[test]
    fn test_label_keeps_whitespace_and_case() {
        let query = parse_query("-. Trader Joe ");
        assert!(query.pawns);
        assert!(query.items);
        assert_eq!(query.label, " Trader Joe ");
    }

    #[test]
    fn test_reserved_flag_is_consumed_silently() {
        let query = parse_query("<-foo");
        assert!(!query.world_map);
        assert!(query.pawns);
        assert_eq!(query.label, "foo");
    }

    #[test]
    fn test_all_flag_input_has_empty_label() {
        let query = parse_query("!-#.*");
        assert!(query.all_maps);
        assert!(query.pawns);
        assert!(query.colony_only);
        assert!(query.items);
        assert!(query.match_all);
        assert_eq!(query.label, "");
    }

    #[test]
    fn test_repeated_flags_are_idempotent() {
        let query = parse_query("--..joe");
        assert!(query.pawns);
        assert!(query.items);
        assert_eq!(query.label, "joe");
    }

    #[test]
    fn test_unicode_label() {
        let query = parse_query("-.雪だるま");
        assert!(query.pawns);
        assert_eq!(query.label, "雪だるま");
    }
}
