//! Proxy-side statement guard.
//!
//! The Gatekeeper in front of this service already filters destructive SQL,
//! but the proxy does not assume that filtering happened. Statements matching
//! the denylist are rejected with 403 before any routing takes place.

use super::error::ProxyError;

/// Lowercased fragments that terminate a request regardless of strategy.
pub const FORBIDDEN_FRAGMENTS: [&str; 3] = ["drop table", "truncate", "shutdown"];

/// Reject statements containing a forbidden fragment.
pub fn check_statement(query: &str) -> Result<(), ProxyError> {
    let lowered = query.to_lowercase();
    for fragment in FORBIDDEN_FRAGMENTS {
        if lowered.contains(fragment) {
            return Err(ProxyError::Forbidden { fragment });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_statements_pass() {
        assert!(check_statement("SELECT * FROM actor LIMIT 1").is_ok());
        assert!(check_statement("UPDATE actor SET first_name = 'X' WHERE actor_id = 1").is_ok());
        assert!(check_statement("INSERT INTO actor (first_name) VALUES ('Y')").is_ok());
    }

    #[test]
    fn forbidden_fragments_rejected_any_case() {
        for query in [
            "DROP TABLE actor",
            "drop table actor",
            "TRUNCATE actor",
            "SHUTDOWN",
            "select 1; shutdown",
        ] {
            assert!(check_statement(query).is_err(), "query: {query:?}");
        }
    }

    #[test]
    fn fragment_is_reported() {
        let err = check_statement("truncate payment").unwrap_err();
        match err {
            ProxyError::Forbidden { fragment } => assert_eq!(fragment, "truncate"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
