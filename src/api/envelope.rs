use serde::Deserialize;
use serde_json::Value;

use super::ApiError;

/// Uniform backend response wrapper: `{isSuccess, result, message?}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub is_success: bool,
    #[serde(default = "none_result")]
    pub result: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn none_result<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    fn backend_message(message: Option<String>) -> ApiError {
        ApiError::Backend(message.unwrap_or_else(|| "request rejected by backend".to_string()))
    }

    /// Payload of a successful response; a missing `result` is a decode error.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.is_success {
            return Err(Self::backend_message(self.message));
        }
        self.result
            .ok_or_else(|| ApiError::Decode("envelope missing result".to_string()))
    }

    /// Payload that is allowed to be absent (e.g. nothing saved yet).
    pub fn into_optional(self) -> Result<Option<T>, ApiError> {
        if !self.is_success {
            return Err(Self::backend_message(self.message));
        }
        Ok(self.result)
    }
}

impl Envelope<Value> {
    /// Success/failure only; the payload is ignored.
    pub fn ack(self) -> Result<(), ApiError> {
        if self.is_success {
            Ok(())
        } else {
            Err(Self::backend_message(self.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_unwraps_result() {
        let env: Envelope<i64> =
            serde_json::from_value(json!({"isSuccess": true, "result": 7})).unwrap();
        assert_eq!(env.into_result().unwrap(), 7);
    }

    #[test]
    fn failure_surfaces_backend_message() {
        let env: Envelope<i64> =
            serde_json::from_value(json!({"isSuccess": false, "message": "sold out"})).unwrap();
        match env.into_result() {
            Err(ApiError::Backend(msg)) => assert_eq!(msg, "sold out"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn optional_tolerates_null_result() {
        let env: Envelope<i64> =
            serde_json::from_value(json!({"isSuccess": true, "result": null})).unwrap();
        assert_eq!(env.into_optional().unwrap(), None);
    }

    #[test]
    fn ack_ignores_payload() {
        let env: Envelope<Value> =
            serde_json::from_value(json!({"isSuccess": true, "result": {"any": "thing"}}))
                .unwrap();
        assert!(env.ack().is_ok());
    }
}
