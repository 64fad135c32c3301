//! Newline-delimited JSON formatting
//!
//! The catalog's JSON SerDe reads one object per line, so records are written
//! compact and joined with `\n` (no trailing newline).

use crate::error::Result;
use serde::Serialize;
use tracing::error;

/// Serialize every record onto its own line
pub fn try_to_ndjson<T: Serialize>(records: &[T]) -> Result<String> {
    let lines = records
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(lines.join("\n"))
}

/// Like [`try_to_ndjson`], but a serialization failure yields an empty string
pub fn to_ndjson<T: Serialize>(records: &[T]) -> String {
    match try_to_ndjson(records) {
        Ok(body) => body,
        Err(e) => {
            error!("Error converting to line-delimited JSON: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[test]
    fn test_lines_parse_back_to_records() {
        let records = vec![
            json!({"PlayerID": 1, "FirstName": "Patrick", "LastName": "Mahomes"}),
            json!({"PlayerID": 2, "College": "Line\nBreak", "Weight": 230}),
            json!({"PlayerID": 3, "BirthDate": null}),
        ];

        let body = to_ndjson(&records);
        let parsed: Vec<Value> =
            body.split('\n').map(|l| serde_json::from_str(l).unwrap()).collect();

        assert_eq!(parsed, records);
    }

    #[test]
    fn test_one_line_per_record_without_trailing_newline() {
        let records = vec![json!({"a": 1}), json!({"b": 2})];

        let body = to_ndjson(&records);
        assert_eq!(body, "{\"a\":1}\n{\"b\":2}");
    }

    #[test]
    fn test_empty_input_is_empty_body() {
        let records: Vec<Value> = Vec::new();
        assert_eq!(to_ndjson(&records), "");
    }

    #[test]
    fn test_unserializable_input_yields_empty_string() {
        // JSON object keys must be strings
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple key");
        let records = vec![bad];

        assert_eq!(to_ndjson(&records), "");
        assert!(try_to_ndjson(&records).is_err());
    }
}
