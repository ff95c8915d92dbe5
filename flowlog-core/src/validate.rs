//! Payload validation
//!
//! Validation is a total function from a raw JSON payload to either a typed
//! write or a [`ValidationError`]. It has no side effects, so callers run it
//! to completion before touching any store.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::dto::log::{LogBatch, LogRecord};

/// Client input that cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("invalid log payload: {0}")]
    Schema(String),

    #[error("batch must contain at least one userID")]
    EmptyBatch,

    #[error("batch of {size} userIDs exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("{0} cannot be empty")]
    EmptyIdentifier(&'static str),

    #[error("invalid cursor")]
    InvalidCursor,

    #[error("limit must be greater than 0")]
    InvalidLimit,
}

/// Parse a request body as JSON
pub fn parse_json(body: &[u8]) -> Result<Value, ValidationError> {
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedJson(e.to_string()))
}

/// Validate a single-entry payload: `{userID, timestamp, direction, storage}`
pub fn validate_single(payload: &Value) -> Result<LogRecord, ValidationError> {
    decode(payload)
}

/// Validate a batch payload: `{userIDs, timestamp, direction, storage}`
///
/// Every userID must be a string and there must be at least one; otherwise
/// the whole batch is rejected.
pub fn validate_batch(payload: &Value) -> Result<LogBatch, ValidationError> {
    let batch: LogBatch = decode(payload)?;

    if batch.user_ids.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    Ok(batch)
}

/// Reject empty path identifiers
pub fn validate_ids(service_id: &str, run_id: &str) -> Result<(), ValidationError> {
    validate_service_id(service_id)?;

    if run_id.is_empty() {
        return Err(ValidationError::EmptyIdentifier("runID"));
    }

    Ok(())
}

pub fn validate_service_id(service_id: &str) -> Result<(), ValidationError> {
    if service_id.is_empty() {
        return Err(ValidationError::EmptyIdentifier("serviceID"));
    }

    Ok(())
}

fn decode<'a, T: Deserialize<'a>>(payload: &'a Value) -> Result<T, ValidationError> {
    if !payload.is_object() {
        return Err(ValidationError::NotAnObject);
    }

    T::deserialize(payload).map_err(|e| ValidationError::Schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::log::Direction;
    use serde_json::json;

    fn valid_log() -> Value {
        json!({
            "userID": "u1",
            "timestamp": 1000,
            "direction": "in",
            "storage": "s1",
        })
    }

    fn valid_batch() -> Value {
        json!({
            "userIDs": ["u1", "u2"],
            "timestamp": 1000,
            "direction": "out",
            "storage": "s1",
        })
    }

    #[test]
    fn test_single_valid() {
        let record = validate_single(&valid_log()).unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.timestamp, 1000);
        assert_eq!(record.direction, Direction::In);
        assert_eq!(record.storage, "s1");
    }

    #[test]
    fn test_single_empty_object_rejected() {
        let result = validate_single(&json!({}));
        assert!(matches!(result, Err(ValidationError::Schema(_))));
    }

    #[test]
    fn test_single_missing_field_rejected() {
        let mut payload = valid_log();
        payload.as_object_mut().unwrap().remove("storage");

        match validate_single(&payload) {
            Err(ValidationError::Schema(msg)) => assert!(msg.contains("storage")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_unknown_field_rejected() {
        let mut payload = valid_log();
        payload["extra"] = json!(true);
        assert!(matches!(
            validate_single(&payload),
            Err(ValidationError::Schema(_))
        ));
    }

    #[test]
    fn test_single_rejects_batch_shape() {
        assert!(validate_single(&valid_batch()).is_err());
    }

    #[test]
    fn test_invalid_direction_rejected() {
        let mut payload = valid_log();
        payload["direction"] = json!("sideways");
        assert!(matches!(
            validate_single(&payload),
            Err(ValidationError::Schema(_))
        ));
    }

    #[test]
    fn test_timestamp_must_be_non_negative_integer() {
        for bad in [json!(-1), json!(1.5), json!("1000"), json!(null)] {
            let mut payload = valid_log();
            payload["timestamp"] = bad.clone();
            assert!(
                validate_single(&payload).is_err(),
                "timestamp {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut payload = valid_log();
        payload["userID"] = json!(7);
        assert!(validate_single(&payload).is_err());
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(
            validate_single(&json!([1, 2, 3])),
            Err(ValidationError::NotAnObject)
        );
        assert_eq!(
            validate_batch(&json!("text")),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn test_batch_valid() {
        let batch = validate_batch(&valid_batch()).unwrap();
        assert_eq!(batch.user_ids, vec!["u1", "u2"]);
        assert_eq!(batch.direction, Direction::Out);
    }

    #[test]
    fn test_batch_empty_user_ids_rejected() {
        let mut payload = valid_batch();
        payload["userIDs"] = json!([]);
        assert_eq!(validate_batch(&payload), Err(ValidationError::EmptyBatch));
    }

    #[test]
    fn test_batch_non_string_user_id_rejected() {
        let mut payload = valid_batch();
        payload["userIDs"] = json!(["u1", {"something": "invalid"}]);
        assert!(matches!(
            validate_batch(&payload),
            Err(ValidationError::Schema(_))
        ));
    }

    #[test]
    fn test_batch_rejects_single_shape() {
        assert!(validate_batch(&valid_log()).is_err());
    }

    #[test]
    fn test_parse_json_malformed() {
        assert!(matches!(
            parse_json(b"{not json"),
            Err(ValidationError::MalformedJson(_))
        ));
        assert_eq!(parse_json(b"{}").unwrap(), json!({}));
    }

    #[test]
    fn test_validate_ids() {
        assert!(validate_ids("svc", "run").is_ok());
        assert_eq!(
            validate_ids("", "run"),
            Err(ValidationError::EmptyIdentifier("serviceID"))
        );
        assert_eq!(
            validate_ids("svc", ""),
            Err(ValidationError::EmptyIdentifier("runID"))
        );
    }
}
