use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Envelope every endpoint answers with: `{status_code, message, payload}`.
/// `payload` is an entity, a list, or a short placeholder string on error.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub payload: T,
}

pub fn envelope<T: Serialize>(status: StatusCode, payload: T, message: impl Into<String>) -> Response {
    (
        status,
        Json(Envelope {
            status_code: status.as_u16(),
            message: message.into(),
            payload,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_status_message_and_payload() {
        let body = Envelope {
            status_code: 200,
            message: "Get all pipelines".to_string(),
            payload: vec!["a", "b"],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status_code"], 200);
        assert_eq!(json["message"], "Get all pipelines");
        assert_eq!(json["payload"][1], "b");
    }
}
