use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::Value;
use tokio::net::TcpListener;

/// What the stub server saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A local HTTP server that answers every request with one canned response.
pub struct MockProviderServer {
    pub base_url: String,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockProviderServer {
    pub async fn start(status: StatusCode, response: Value) -> Self {
        let seen: Arc<Mutex<Vec<SeenRequest>>> = Arc::default();
        let recorded = seen.clone();

        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| {
            let recorded = recorded.clone();
            let response = response.clone();
            async move {
                recorded.lock().unwrap().push(SeenRequest {
                    path: uri.path().to_string(),
                    headers,
                    body,
                });
                (status, Json(response)).into_response()
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
        }
    }
}

/// Base URL of a localhost port nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
