//! Entity id helpers. All rows are keyed by UUID v4; the database
//! mints them on insert.

use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Parses an id from its string form, mapping failures to a client error.
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| CoreError::invalid_id(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_round_trip() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        let err = parse_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, CoreError::InvalidId(_)));
    }
}
