//! Sort expression parsing
//!
//! Accepts `column [asc|desc]` terms separated by commas, e.g.
//! `"created_at desc, name"`. The direction defaults to ascending and is
//! case-insensitive. Column names are only checked for shape; whether the
//! column exists is left to storage.

/// One `ORDER BY` term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn direction(&self) -> &'static str {
        if self.descending {
            "DESC"
        } else {
            "ASC"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort term '{0}'")]
pub struct SortError(pub String);

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits a sort expression into keys
///
/// Blank input and blank terms (e.g. a trailing comma) produce no keys.
pub fn parse_sort(expression: &str) -> Result<Vec<SortKey>, SortError> {
    let mut keys = Vec::new();

    for term in expression.split(',') {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }

        let mut parts = term.split_whitespace();
        let column = parts.next().unwrap_or_default();
        let descending = match parts.next() {
            None => false,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => false,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => true,
            Some(_) => return Err(SortError(term.to_string())),
        };

        if !is_identifier(column) || parts.next().is_some() {
            return Err(SortError(term.to_string()));
        }

        keys.push(SortKey {
            column: column.to_string(),
            descending,
        });
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(column: &str, descending: bool) -> SortKey {
        SortKey {
            column: column.to_string(),
            descending,
        }
    }

    #[test]
    fn test_parse_default_sort() {
        assert_eq!(parse_sort("created_at desc").unwrap(), vec![key("created_at", true)]);
    }

    #[test]
    fn test_parse_multiple_terms() {
        assert_eq!(
            parse_sort("price ASC, name,created_at DeSc").unwrap(),
            vec![key("price", false), key("name", false), key("created_at", true)]
        );
    }

    #[test]
    fn test_parse_blank() {
        assert!(parse_sort("").unwrap().is_empty());
        assert!(parse_sort("  , ").unwrap().is_empty());
        assert_eq!(parse_sort("name,").unwrap(), vec![key("name", false)]);
    }

    #[test]
    fn test_unknown_column_is_accepted() {
        assert_eq!(parse_sort("no_such_column").unwrap(), vec![key("no_such_column", false)]);
    }

    #[test]
    fn test_rejects_injection_and_bad_direction() {
        assert!(parse_sort("name; DROP TABLE users").is_err());
        assert!(parse_sort("name sideways").is_err());
        assert!(parse_sort("name asc extra").is_err());
        assert!(parse_sort("1name").is_err());
        assert!(parse_sort("\"name\"").is_err());
    }
}
