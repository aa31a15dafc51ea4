#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tiny_http::{Method, Response, Server};

/// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .try_init();
}

/// A scripted WinAppDriver stand-in.
///
/// Serves just enough of the wire protocol to exercise the bootstrap retry
/// loop and the teardown path, and counts the requests it sees so tests can
/// assert on exact attempt budgets.
pub struct MockDriver {
    pub base_url: String,
    pub session_requests: Arc<AtomicUsize>,
    pub close_app_requests: Arc<AtomicUsize>,
    pub delete_requests: Arc<AtomicUsize>,
    server: Arc<Server>,
}

impl MockDriver {
    /// Start a mock that rejects the first `fail_sessions` session-creation
    /// requests with a transient error. With `fail_cleanup`, the app-close and
    /// session-delete commands fail too.
    pub fn start(fail_sessions: usize, fail_cleanup: bool) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("failed to bind mock driver"));
        let port = server.server_addr().to_ip().unwrap().port();

        let session_requests = Arc::new(AtomicUsize::new(0));
        let close_app_requests = Arc::new(AtomicUsize::new(0));
        let delete_requests = Arc::new(AtomicUsize::new(0));

        let server_clone = server.clone();
        let sessions = session_requests.clone();
        let closes = close_app_requests.clone();
        let deletes = delete_requests.clone();

        thread::spawn(move || {
            for request in server_clone.incoming_requests() {
                let url = request.url().to_string();
                let method = request.method().clone();

                let (code, body) = if method == Method::Post && url.ends_with("/session") {
                    let attempt = sessions.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt <= fail_sessions {
                        (
                            500,
                            r#"{"status":13,"value":{"message":"connection refused: server still starting"}}"#,
                        )
                    } else {
                        (200, r#"{"sessionId":"sess-1","status":0,"value":{}}"#)
                    }
                } else if method == Method::Post && url.ends_with("/appium/app/close") {
                    closes.fetch_add(1, Ordering::SeqCst);
                    if fail_cleanup {
                        (500, r#"{"status":13,"value":{"message":"app already gone"}}"#)
                    } else {
                        (200, r#"{"sessionId":"sess-1","status":0,"value":null}"#)
                    }
                } else if method == Method::Delete {
                    deletes.fetch_add(1, Ordering::SeqCst);
                    if fail_cleanup {
                        (500, r#"{"status":13,"value":{"message":"no such session"}}"#)
                    } else {
                        (200, r#"{"sessionId":"sess-1","status":0,"value":null}"#)
                    }
                } else {
                    (404, r#"{"status":9,"value":{"message":"unknown command"}}"#)
                };

                let header: tiny_http::Header = "Content-Type: application/json".parse().unwrap();
                let response = Response::from_string(body)
                    .with_status_code(code)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}/wd/hub"),
            session_requests,
            close_app_requests,
            delete_requests,
            server,
        }
    }

    pub fn session_attempts(&self) -> usize {
        self.session_requests.load(Ordering::SeqCst)
    }

    pub fn close_app_count(&self) -> usize {
        self.close_app_requests.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.delete_requests.load(Ordering::SeqCst)
    }
}
