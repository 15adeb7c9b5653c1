//! Backend collaborator: login/registration and solve-log sync.
//!
//! Every call returns an [`ApiResponse`]; transport and decode failures are
//! folded into `success: false` responses instead of errors.

pub mod client;
pub mod worker;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::engine::stats::StatsSummary;
use crate::session::solve::SolveRecord;
use crate::store::schema::UserProfile;

pub const CONNECT_FAILED: &str = "Unable to connect to server";
pub const INVALID_RESPONSE: &str = "Invalid response from server";

#[derive(Debug, Error)]
pub enum SyncError {
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("network support is disabled in this build")]
    Disabled,
}

impl SyncError {
    /// The message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            SyncError::Decode(_) => INVALID_RESPONSE,
            _ => CONNECT_FAILED,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            data: None,
        }
    }

    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub fn decode(body: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(body)?)
    }
}

impl<T> From<Result<ApiResponse<T>, SyncError>> for ApiResponse<T> {
    fn from(result: Result<ApiResponse<T>, SyncError>) -> Self {
        match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "backend call failed");
                ApiResponse::failure(e.user_message())
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub user: UserProfile,
}

/// The remote service the timer talks to.
pub trait Backend: Send + 'static {
    fn login(&self, credentials: &Credentials) -> ApiResponse<LoginData>;
    fn register(&self, registration: &Registration) -> ApiResponse<Value>;
    fn fetch_stats(&self, token: &str) -> ApiResponse<StatsSummary>;
    fn append_logs(&self, token: &str, logs: &[SolveRecord]) -> ApiResponse<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_login_response() {
        let body = r#"{"success":true,"message":"Welcome","data":{"token":"t1","user":{"name":"Ada","username":"ada"}}}"#;
        let response = ApiResponse::<LoginData>::decode(body).unwrap();
        assert!(response.success);
        assert_eq!(response.message_or_empty(), "Welcome");
        let data = response.data.unwrap();
        assert_eq!(data.token, "t1");
        assert_eq!(data.user.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_decode_failure_payload_without_data() {
        let body = r#"{"success":false,"message":"Invalid credentials"}"#;
        let response = ApiResponse::<LoginData>::decode(body).unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
    }

    #[test]
    fn test_non_json_body_normalizes_to_invalid_response() {
        let response =
            ApiResponse::from(ApiResponse::<StatsSummary>::decode("<html>502 Bad Gateway</html>"));
        assert!(!response.success);
        assert_eq!(response.message_or_empty(), INVALID_RESPONSE);
        assert!(response.data.is_none());
    }

    #[test]
    fn test_transport_failure_message() {
        let result: Result<ApiResponse<Value>, SyncError> = Err(SyncError::Disabled);
        let response = ApiResponse::from(result);
        assert!(!response.success);
        assert_eq!(response.message_or_empty(), CONNECT_FAILED);
    }

    #[test]
    fn test_stats_payload_decodes() {
        let body = r#"{"success":true,"data":{"best":8.12,"worst":20.5,"avg5":11.2,"avg12":null}}"#;
        let response = ApiResponse::<StatsSummary>::decode(body).unwrap();
        let stats = response.data.unwrap();
        assert_eq!(stats.best, Some(8.12));
        assert_eq!(stats.avg12, None);
    }
}
