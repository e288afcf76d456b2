//! Read/write classification of SQL statements.
//!
//! Classification looks at the first whitespace-delimited word only; anything
//! that is not a known read keyword is treated as a write so it always takes
//! the stricter execution path.

/// Whether a statement reads data or mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Read,
    Write,
}

impl QueryKind {
    pub fn is_read(self) -> bool {
        matches!(self, QueryKind::Read)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Read => "read",
            QueryKind::Write => "write",
        }
    }
}

const READ_KEYWORDS: [&str; 4] = ["select", "show", "describe", "explain"];

/// Classify a SQL statement by its leading keyword.
///
/// Empty and whitespace-only input classifies as [`QueryKind::Write`]; callers
/// are expected to reject empty queries before execution regardless.
pub fn classify(query: &str) -> QueryKind {
    let first = match query.split_whitespace().next() {
        Some(word) => word.to_ascii_lowercase(),
        None => return QueryKind::Write,
    };

    if READ_KEYWORDS.contains(&first.as_str()) {
        QueryKind::Read
    } else {
        QueryKind::Write
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_read() {
        assert_eq!(classify("SELECT * FROM actor"), QueryKind::Read);
    }

    #[test]
    fn read_keywords_any_case_and_leading_whitespace() {
        for query in [
            "select 1",
            "  SELECT 1",
            "\tShOw TABLES",
            "\n describe actor",
            "EXPLAIN SELECT * FROM actor",
        ] {
            assert_eq!(classify(query), QueryKind::Read, "query: {query:?}");
        }
    }

    #[test]
    fn writes_are_everything_else() {
        for query in [
            "INSERT INTO actor (first_name) VALUES ('X')",
            "update actor set first_name = 'X' where actor_id = 1",
            "DELETE FROM actor WHERE actor_id = 1",
            "CREATE TABLE t (id INT)",
            "selectx 1",
        ] {
            assert_eq!(classify(query), QueryKind::Write, "query: {query:?}");
        }
    }

    #[test]
    fn empty_defaults_to_write() {
        assert_eq!(classify(""), QueryKind::Write);
        assert_eq!(classify("   \t\n"), QueryKind::Write);
    }
}
