//! Menu input parsing
//!
//! All menu indices are 1-based exactly as displayed. Tokens are validated
//! before anything is committed: a bad token invalidates the whole line so
//! a partially-applied selection can never exist.

use std::io::BufRead;

use crate::error::{VenueError, VenueResult};

/// Upper bound on index digit length; anything longer is rejected before
/// parsing rather than overflowing
pub const MAX_INDEX_DIGITS: usize = 9;

/// A parsed selection line for a multi-pick menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The literal token `all` (case-insensitive): keep everything
    All,
    /// 1-based indices in input order, duplicates preserved
    Indices(Vec<usize>),
}

/// Read one trimmed line, treating EOF as an error rather than looping
pub fn read_line<R: BufRead>(input: &mut R) -> VenueResult<String> {
    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| VenueError::Io(format!("Failed to read input: {}", e)))?;
    if bytes == 0 {
        return Err(VenueError::Io("input stream closed".to_string()));
    }
    Ok(line.trim().to_string())
}

/// Parse a single 1-based index against a displayed count
pub fn parse_index(token: &str, max: usize) -> VenueResult<usize> {
    let token = token.trim();
    if token.is_empty()
        || token.len() > MAX_INDEX_DIGITS
        || !token.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(VenueError::InputFormat(format!(
            "expected a number between 1 and {}, got '{}'",
            max, token
        )));
    }

    // Digit-only and length-bounded, so this cannot fail or overflow
    let index: usize = token
        .parse()
        .map_err(|_| VenueError::InputFormat(format!("invalid number '{}'", token)))?;

    if index == 0 || index > max {
        return Err(VenueError::IndexOutOfRange { index, max });
    }
    Ok(index)
}

/// Parse a selection line: `all` or a comma-separated list of indices
///
/// Every token is validated; the first bad one rejects the entire line.
pub fn parse_selection(line: &str, max: usize) -> VenueResult<Selection> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }
    if line.is_empty() {
        return Err(VenueError::InputFormat(
            "expected 'all' or a comma-separated list of numbers".to_string(),
        ));
    }

    let mut indices = Vec::new();
    for token in line.split(',') {
        indices.push(parse_index(token, max)?);
    }
    Ok(Selection::Indices(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_trims() {
        let mut input = Cursor::new("  2  \n");
        assert_eq!(read_line(&mut input).unwrap(), "2");
    }

    #[test]
    fn test_read_line_eof_is_error() {
        let mut input = Cursor::new("");
        assert!(matches!(read_line(&mut input), Err(VenueError::Io(_))));
    }

    #[test]
    fn test_parse_index_valid() {
        assert_eq!(parse_index("1", 5).unwrap(), 1);
        assert_eq!(parse_index("5", 5).unwrap(), 5);
    }

    #[test]
    fn test_parse_index_zero_out_of_range() {
        assert!(matches!(
            parse_index("0", 5),
            Err(VenueError::IndexOutOfRange { index: 0, max: 5 })
        ));
    }

    #[test]
    fn test_parse_index_beyond_max() {
        assert!(matches!(
            parse_index("6", 5),
            Err(VenueError::IndexOutOfRange { index: 6, max: 5 })
        ));
    }

    #[test]
    fn test_parse_index_non_digit_is_format_error() {
        assert!(matches!(
            parse_index("two", 5),
            Err(VenueError::InputFormat(_))
        ));
        assert!(matches!(
            parse_index("-1", 5),
            Err(VenueError::InputFormat(_))
        ));
        assert!(matches!(
            parse_index("1.5", 5),
            Err(VenueError::InputFormat(_))
        ));
    }

    #[test]
    fn test_parse_index_digit_bound() {
        let long = "1".repeat(MAX_INDEX_DIGITS + 1);
        assert!(matches!(
            parse_index(&long, usize::MAX),
            Err(VenueError::InputFormat(_))
        ));
    }

    #[test]
    fn test_parse_selection_all_case_insensitive() {
        assert_eq!(parse_selection("all", 3).unwrap(), Selection::All);
        assert_eq!(parse_selection("ALL", 3).unwrap(), Selection::All);
        assert_eq!(parse_selection(" All ", 3).unwrap(), Selection::All);
    }

    #[test]
    fn test_parse_selection_list() {
        assert_eq!(
            parse_selection("1, 3,2", 3).unwrap(),
            Selection::Indices(vec![1, 3, 2])
        );
    }

    #[test]
    fn test_parse_selection_preserves_duplicates() {
        assert_eq!(
            parse_selection("1,1", 3).unwrap(),
            Selection::Indices(vec![1, 1])
        );
    }

    #[test]
    fn test_parse_selection_rejects_whole_line() {
        assert!(matches!(
            parse_selection("1,9", 3),
            Err(VenueError::IndexOutOfRange { index: 9, max: 3 })
        ));
        assert!(matches!(
            parse_selection("1,x", 3),
            Err(VenueError::InputFormat(_))
        ));
        assert!(matches!(
            parse_selection("", 3),
            Err(VenueError::InputFormat(_))
        ));
    }
}
