use std::io::Read as _;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::Value;
use tiny_http::Method;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum StubOutcome {
    Ok,
    Fail { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct BackendStubConfig {
    pub token: String,
    pub snapshot: Value,
    pub move_outcome: StubOutcome,
    pub remove_outcome: StubOutcome,
    pub add_outcome: StubOutcome,
    pub login_outcome: StubOutcome,
}

impl Default for BackendStubConfig {
    fn default() -> Self {
        Self {
            token: "secret-token".to_owned(),
            snapshot: serde_json::json!({
                "want_to_read": [],
                "reading": [],
                "read": [],
            }),
            move_outcome: StubOutcome::Ok,
            remove_outcome: StubOutcome::Ok,
            add_outcome: StubOutcome::Ok,
            login_outcome: StubOutcome::Ok,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

pub struct BackendStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackendStub {
    pub fn spawn(config: BackendStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start backend stub");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
        let recorded = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let method = request.method().to_string();
                let path = request.url().to_string();
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.to_string());

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                recorded.lock().unwrap().push(RecordedRequest {
                    method,
                    path: path.clone(),
                    authorization: authorization.clone(),
                    body: serde_json::from_str(&body).unwrap_or(Value::Null),
                });

                // Auth endpoints are the only unauthenticated ones.
                if request.method() == &Method::Post && path == "/api/authRoutes/login" {
                    match &config.login_outcome {
                        StubOutcome::Ok => respond_json(
                            request,
                            200,
                            &serde_json::json!({"token": config.token}).to_string(),
                        ),
                        StubOutcome::Fail { status, body } => {
                            respond_json(request, *status, body);
                        }
                    }
                    continue;
                }
                if request.method() == &Method::Post && path == "/api/authRoutes/signup" {
                    respond_json(
                        request,
                        200,
                        &serde_json::json!({"success": true}).to_string(),
                    );
                    continue;
                }

                let expected = format!("Bearer {}", config.token);
                if authorization.as_deref() != Some(expected.as_str()) {
                    respond_json(
                        request,
                        401,
                        &serde_json::json!({"error": "invalid token"}).to_string(),
                    );
                    continue;
                }

                match (request.method().clone(), path.as_str()) {
                    (Method::Get, "/api/readingList") => {
                        respond_json(request, 200, &config.snapshot.to_string());
                    }
                    (Method::Put, "/api/readingList/move") => {
                        respond_outcome(request, &config.move_outcome);
                    }
                    (Method::Post, "/api/readingList/add") => {
                        respond_outcome(request, &config.add_outcome);
                    }
                    (Method::Delete, p) if p.starts_with("/api/readingList/") => {
                        respond_outcome(request, &config.remove_outcome);
                    }
                    _ => respond_json(
                        request,
                        404,
                        &serde_json::json!({"error": "not found"}).to_string(),
                    ),
                }
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for BackendStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond_json(request: tiny_http::Request, status: u16, body: &str) {
    let mut response = tiny_http::Response::from_string(body).with_status_code(status);
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("build header");
    response = response.with_header(header);
    let _ = request.respond(response);
}

fn respond_outcome(request: tiny_http::Request, outcome: &StubOutcome) {
    match outcome {
        StubOutcome::Ok => respond_json(
            request,
            200,
            &serde_json::json!({"success": true}).to_string(),
        ),
        StubOutcome::Fail { status, body } => respond_json(request, *status, body),
    }
}
