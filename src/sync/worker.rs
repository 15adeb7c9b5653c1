use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use serde_json::Value;

use crate::engine::stats::StatsSummary;
use crate::session::solve::SolveRecord;
use crate::sync::{ApiResponse, Backend, Credentials, LoginData, Registration};

#[derive(Clone, Debug)]
pub enum SyncJob {
    Login(Credentials),
    Register(Registration),
    FetchStats { token: String },
    AppendLogs { token: String, records: Vec<SolveRecord> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SyncEvent {
    LoginFinished(ApiResponse<LoginData>),
    RegisterFinished(ApiResponse<Value>),
    StatsRefreshed(StatsSummary),
    StatsUnavailable(String),
}

/// Runs backend calls off the UI thread. Results come back through the
/// `notify` callback, which posts them into the UI event channel.
pub struct SyncWorker {
    jobs: Option<mpsc::Sender<SyncJob>>,
    handle: Option<JoinHandle<()>>,
}

impl SyncWorker {
    pub fn spawn<B, F>(backend: B, notify: F) -> Self
    where
        B: Backend,
        F: Fn(SyncEvent) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SyncJob>();
        let handle = thread::spawn(move || {
            for job in rx {
                run_job(&backend, job, &notify);
            }
        });
        Self {
            jobs: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue a job. Returns false if the worker thread has gone away.
    pub fn submit(&self, job: SyncJob) -> bool {
        match self.jobs {
            Some(ref tx) => tx.send(job).is_ok(),
            None => false,
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once queued jobs finish.
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_job<B: Backend, F: Fn(SyncEvent)>(backend: &B, job: SyncJob, notify: &F) {
    match job {
        SyncJob::Login(credentials) => {
            let response = backend.login(&credentials);
            tracing::info!(success = response.success, "login request finished");
            notify(SyncEvent::LoginFinished(response));
        }
        SyncJob::Register(registration) => {
            let response = backend.register(&registration);
            tracing::info!(success = response.success, "register request finished");
            notify(SyncEvent::RegisterFinished(response));
        }
        SyncJob::FetchStats { token } => refresh_stats(backend, &token, notify),
        SyncJob::AppendLogs { token, records } => {
            let response = backend.append_logs(&token, &records);
            if response.success {
                tracing::debug!(count = records.len(), "solve logs appended");
            } else {
                tracing::warn!(
                    count = records.len(),
                    message = response.message_or_empty(),
                    "solve log append failed"
                );
            }
            refresh_stats(backend, &token, notify);
        }
    }
}

fn refresh_stats<B: Backend, F: Fn(SyncEvent)>(backend: &B, token: &str, notify: &F) {
    let response = backend.fetch_stats(token);
    match response.data {
        Some(summary) if response.success => notify(SyncEvent::StatsRefreshed(summary)),
        _ => {
            let message = response.message.unwrap_or_default();
            tracing::warn!(%message, "stats refresh failed");
            notify(SyncEvent::StatsUnavailable(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::store::schema::UserProfile;

    #[derive(Clone, Default)]
    struct FakeBackend {
        calls: Arc<Mutex<Vec<String>>>,
        fail_stats: bool,
    }

    impl FakeBackend {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Backend for FakeBackend {
        fn login(&self, credentials: &Credentials) -> ApiResponse<LoginData> {
            self.record(format!("login:{}", credentials.username));
            ApiResponse {
                success: true,
                message: Some("Logged in".to_string()),
                data: Some(LoginData {
                    token: "tok".to_string(),
                    user: UserProfile::default(),
                }),
            }
        }

        fn register(&self, registration: &Registration) -> ApiResponse<Value> {
            self.record(format!("register:{}", registration.username));
            ApiResponse::failure("Username taken")
        }

        fn fetch_stats(&self, token: &str) -> ApiResponse<StatsSummary> {
            self.record(format!("stats:{token}"));
            if self.fail_stats {
                return ApiResponse::failure(crate::sync::CONNECT_FAILED);
            }
            ApiResponse {
                success: true,
                message: None,
                data: Some(StatsSummary {
                    best: Some(3.47),
                    ..Default::default()
                }),
            }
        }

        fn append_logs(&self, token: &str, logs: &[SolveRecord]) -> ApiResponse<Value> {
            self.record(format!("logs:{token}:{}", logs.len()));
            ApiResponse {
                success: true,
                message: None,
                data: None,
            }
        }
    }

    fn spawn(backend: FakeBackend) -> (SyncWorker, mpsc::Receiver<SyncEvent>) {
        let (tx, rx) = mpsc::channel();
        let worker = SyncWorker::spawn(backend, move |ev| {
            let _ = tx.send(ev);
        });
        (worker, rx)
    }

    #[test]
    fn test_append_then_refresh_stats() {
        let backend = FakeBackend::default();
        let calls = backend.calls.clone();
        let (worker, rx) = spawn(backend);

        assert!(worker.submit(SyncJob::AppendLogs {
            token: "tok".to_string(),
            records: vec![SolveRecord::new("3x3", "R U", 3.47)],
        }));

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            event,
            SyncEvent::StatsRefreshed(StatsSummary {
                best: Some(3.47),
                ..Default::default()
            })
        );
        drop(worker);
        assert_eq!(*calls.lock().unwrap(), vec!["logs:tok:1", "stats:tok"]);
    }

    #[test]
    fn test_stats_failure_reports_unavailable() {
        let backend = FakeBackend {
            fail_stats: true,
            ..Default::default()
        };
        let (worker, rx) = spawn(backend);
        worker.submit(SyncJob::FetchStats {
            token: "tok".to_string(),
        });
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            event,
            SyncEvent::StatsUnavailable(crate::sync::CONNECT_FAILED.to_string())
        );
    }

    #[test]
    fn test_login_and_register_results_are_forwarded() {
        let (worker, rx) = spawn(FakeBackend::default());
        worker.submit(SyncJob::Login(Credentials {
            username: "ada".to_string(),
            password: "pw".to_string(),
        }));
        worker.submit(SyncJob::Register(Registration {
            name: "Ada".to_string(),
            username: "ada".to_string(),
            password: "pw".to_string(),
        }));

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            SyncEvent::LoginFinished(response) => {
                assert!(response.success);
                assert_eq!(response.data.unwrap().token, "tok");
            }
            other => panic!("unexpected event {other:?}"),
        }
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            SyncEvent::RegisterFinished(response) => {
                assert!(!response.success);
                assert_eq!(response.message_or_empty(), "Username taken");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_drop_joins_after_queued_jobs() {
        let backend = FakeBackend::default();
        let calls = backend.calls.clone();
        let (worker, _rx) = spawn(backend);
        worker.submit(SyncJob::FetchStats {
            token: "a".to_string(),
        });
        worker.submit(SyncJob::FetchStats {
            token: "b".to_string(),
        });
        drop(worker);
        assert_eq!(*calls.lock().unwrap(), vec!["stats:a", "stats:b"]);
    }
}
