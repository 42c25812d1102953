//! Removal of the interstitial flag from page data responses.

use serde_json::{Map, Value};

/// Field that makes the browser show the "continue to external site" page.
pub const INTERSTITIAL_FIELD: &str = "requireInterstitial";

/// Parse a JSON object, drop `field` if present, and re-serialize.
///
/// Anything other than a JSON object is an error. Key order is not preserved.
pub fn strip_field(body: &[u8], field: &str) -> Result<Vec<u8>, serde_json::Error> {
    let mut object: Map<String, Value> = serde_json::from_slice(body)?;
    object.remove(field);
    serde_json::to_vec(&object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_removes_field_keeps_others() {
        let body = br#"{"spaceName":"Blog","requireInterstitial":true,"nested":{"requireInterstitial":1}}"#;
        let stripped = strip_field(body, INTERSTITIAL_FIELD).unwrap();
        let out: Value = serde_json::from_slice(&stripped).unwrap();

        assert_eq!(
            out,
            json!({"spaceName": "Blog", "nested": {"requireInterstitial": 1}})
        );
    }

    #[test]
    fn test_idempotent() {
        let body = br#"{"requireInterstitial":false,"a":[1,2,3]}"#;
        let once = strip_field(body, INTERSTITIAL_FIELD).unwrap();
        let twice = strip_field(&once, INTERSTITIAL_FIELD).unwrap();

        let once: Value = serde_json::from_slice(&once).unwrap();
        let twice: Value = serde_json::from_slice(&twice).unwrap();
        assert_eq!(once, twice);
        assert!(once.get(INTERSTITIAL_FIELD).is_none());
    }

    #[test]
    fn test_key_order_does_not_matter() {
        for body in [
            br#"{"requireInterstitial":true,"z":1,"a":2}"#.as_slice(),
            br#"{"z":1,"a":2,"requireInterstitial":true}"#.as_slice(),
            br#"{"a":2,"requireInterstitial":true,"z":1}"#.as_slice(),
        ] {
            let stripped = strip_field(body, INTERSTITIAL_FIELD).unwrap();
            let out: Value = serde_json::from_slice(&stripped).unwrap();
            assert_eq!(out, json!({"a": 2, "z": 1}));
        }
    }

    #[test]
    fn test_absent_field_is_fine() {
        let out = strip_field(br#"{"a":1}"#, INTERSTITIAL_FIELD).unwrap();
        assert_eq!(out, br#"{"a":1}"#);
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(strip_field(b"[1,2]", INTERSTITIAL_FIELD).is_err());
        assert!(strip_field(b"<html>", INTERSTITIAL_FIELD).is_err());
    }
}
