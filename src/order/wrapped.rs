//! Records that may arrive bare or nested one level under a type key.
//!
//! `{"label": "Tax", ...}` and `{"adjustment": {"label": "Tax", ...}}` carry
//! the same adjustment. The choice is made per record, so one list can mix
//! both encodings.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

/// A record type that may be nested under `WRAPPER_KEY`
pub trait Wrapped: DeserializeOwned {
    const WRAPPER_KEY: &'static str;
}

/// Return the record stored under `key`, or the record itself when the key is absent
pub fn unwrap_record(record: Value, key: &str) -> Value {
    match record {
        Value::Object(mut map) => match map.remove(key) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Deserialize a list of possibly-wrapped records; null reads as empty
pub(crate) fn deserialize_unwrapped<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Wrapped,
{
    let records = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    records
        .into_iter()
        .map(|record| {
            serde_json::from_value(unwrap_record(record, T::WRAPPER_KEY)).map_err(D::Error::custom)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_nested_record() {
        let record = json!({"adjustment": {"label": "Tax", "amount": "1.00"}});
        assert_eq!(
            unwrap_record(record, "adjustment"),
            json!({"label": "Tax", "amount": "1.00"})
        );
    }

    #[test]
    fn test_bare_record_is_unchanged() {
        let record = json!({"label": "Tax", "amount": "1.00"});
        assert_eq!(unwrap_record(record.clone(), "adjustment"), record);
    }

    #[test]
    fn test_other_key_is_not_unwrapped() {
        let record = json!({"line_item": {"quantity": 1}});
        assert_eq!(unwrap_record(record.clone(), "adjustment"), record);
    }

    #[test]
    fn test_non_object_passes_through() {
        assert_eq!(unwrap_record(json!("text"), "adjustment"), json!("text"));
    }
}
