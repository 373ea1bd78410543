//! In-process notebook server double for client tests.
//!
//! Runs an axum router on its own tokio runtime thread, records every request
//! and answers with whatever the test's responder returns. The blocking client
//! under test must not run inside a tokio runtime, hence the separate thread.

use std::sync::{Arc, Mutex, mpsc};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use codec::Value;

#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn decoded_body(&self) -> Value {
        codec::decode(&self.body).expect("request body should be msgpack")
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> (StatusCode, Vec<u8>) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

pub(crate) struct MockServer {
    pub host: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockServer {
    pub fn start(responder: impl Fn(&Recorded) -> (StatusCode, Vec<u8>) + Send + Sync + 'static) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: Arc::clone(&requests),
            responder: Arc::new(responder),
        };
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock server");
                addr_tx
                    .send(listener.local_addr().expect("mock addr"))
                    .expect("send mock addr");
                let app = Router::new().fallback(record).with_state(state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("mock server");
            });
        });

        let addr = addr_rx.recv().expect("mock server address");
        Self {
            host: addr.to_string(),
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Reply to every request with a fixed status and msgpack-encoded body.
    pub fn replying(status: StatusCode, body: &Value) -> Self {
        let bytes = codec::encode(body).expect("encode canned body");
        Self::start(move |_| (status, bytes.clone()))
    }

    /// Reply to every request with a fixed status and raw body bytes.
    pub fn replying_raw(status: StatusCode, body: &[u8]) -> Self {
        let bytes = body.to_vec();
        Self::start(move |_| (status, bytes.clone()))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn only_request(&self) -> Recorded {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.remove(0)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], Vec<u8>) {
    let recorded = Recorded {
        method,
        path: uri.path().to_owned(),
        headers,
        body: body.to_vec(),
    };
    let (status, reply) = (state.responder)(&recorded);
    state.requests.lock().expect("requests lock").push(recorded);
    (
        status,
        [(header::CONTENT_TYPE, "application/x-msgpack")],
        reply,
    )
}
