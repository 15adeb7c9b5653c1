use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::engine::stats::StatsSummary;
use crate::session::solve::SolveRecord;
use crate::sync::{ApiResponse, Backend, Credentials, LoginData, Registration, SyncError};

const LOGIN_PATH: &str = "/user/auth/login";
const REGISTER_PATH: &str = "/user/auth/register";
const STATS_PATH: &str = "/user/stats";
const LOGS_PATH: &str = "/user/logs";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
}

#[derive(Serialize)]
struct LogsBody<'a> {
    logs: &'a [SolveRecord],
}

/// JSON-over-HTTP client for the cube timer backend.
pub struct ApiClient {
    base_url: String,
    #[cfg(feature = "network")]
    http: reqwest::blocking::Client,
}

impl ApiClient {
    #[cfg(feature = "network")]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(base_url: &str, _timeout: Duration) -> Result<Self, SyncError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        verb: Verb,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResponse<T> {
        ApiResponse::<T>::from(self.try_send::<B, T>(verb, path, token, body))
    }

    #[cfg(feature = "network")]
    fn try_send<B: Serialize, T: DeserializeOwned>(
        &self,
        verb: Verb,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, SyncError> {
        let url = self.url(path);
        let mut request = match verb {
            Verb::Get => self.http.get(&url),
            Verb::Post => self.http.post(&url),
        }
        .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        tracing::debug!(%url, status = %response.status(), "backend responded");
        // Error statuses still carry a {success, message} body.
        let text = response.text()?;
        ApiResponse::decode(&text)
    }

    #[cfg(not(feature = "network"))]
    fn try_send<B: Serialize, T: DeserializeOwned>(
        &self,
        _verb: Verb,
        _path: &str,
        _token: Option<&str>,
        _body: Option<&B>,
    ) -> Result<ApiResponse<T>, SyncError> {
        Err(SyncError::Disabled)
    }
}

impl Backend for ApiClient {
    fn login(&self, credentials: &Credentials) -> ApiResponse<LoginData> {
        self.send(Verb::Post, LOGIN_PATH, None, Some(credentials))
    }

    fn register(&self, registration: &Registration) -> ApiResponse<Value> {
        self.send(Verb::Post, REGISTER_PATH, None, Some(registration))
    }

    fn fetch_stats(&self, token: &str) -> ApiResponse<StatsSummary> {
        self.send::<(), _>(Verb::Get, STATS_PATH, Some(token), None)
    }

    fn append_logs(&self, token: &str, logs: &[SolveRecord]) -> ApiResponse<Value> {
        self.send(Verb::Post, LOGS_PATH, Some(token), Some(&LogsBody { logs }))
    }
}
