use super::*;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use shared::domain::SimulationParameters;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
    reply: Arc<(StatusCode, String)>,
}

async fn handle_simulate(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, String) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    state.reply.as_ref().clone()
}

async fn spawn_simulator_server(
    status: StatusCode,
    body: String,
) -> (String, oneshot::Receiver<Value>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        reply: Arc::new((status, body)),
    };
    let app = Router::new()
        .route("/api/simulator", post(handle_simulate))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn request() -> SimulationRequest {
    SimulationRequest::new(&SimulationParameters::new("1", "2", "0", "0"), 0, 2000)
}

#[test]
fn endpoint_is_joined_below_server_path() {
    assert_eq!(
        simulator_endpoint("http://127.0.0.1:5000").expect("url").as_str(),
        "http://127.0.0.1:5000/api/simulator"
    );
    assert_eq!(
        simulator_endpoint("https://example.org/viewer").expect("url").as_str(),
        "https://example.org/viewer/api/simulator"
    );
    assert!(simulator_endpoint("not a url").is_err());
}

#[tokio::test]
async fn posts_data_envelope_and_decodes_response() {
    let reply = json!({
        "s": 2, "p": 15, "d": 1, "f": 1,
        "total_combs": 30,
        "range_start": 0,
        "range_end": 2000,
        "rows": [["\u{2191}", 0, 0.5]],
        "terms": [[1, 0.5, 1, 2, "P", [1.5, 0.5]]],
    });
    let (server_url, payload_rx) = spawn_simulator_server(StatusCode::OK, reply.to_string()).await;
    let transport = HttpTransport::new(&server_url).expect("transport");

    let response = transport.simulate(&request()).await.expect("simulate");

    let payload = payload_rx.await.expect("payload");
    assert_eq!(
        payload,
        json!({"data": {"s": "1", "p": "2", "d": "0", "f": "0", "range_start": 0, "range_end": 2000}})
    );
    assert_eq!(response.total_combinations(), 30);
    assert_eq!(response.rows.len(), 1);
    assert_eq!(response.terms[0].sub_terms.len(), 2);
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let (server_url, _payload_rx) =
        spawn_simulator_server(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()).await;
    let transport = HttpTransport::new(&server_url).expect("transport");

    let err = transport.simulate(&request()).await.expect_err("must fail");
    assert_eq!(
        err,
        QueryError::Status {
            status: 500,
            body: "boom".to_string()
        }
    );
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let (server_url, _payload_rx) =
        spawn_simulator_server(StatusCode::OK, "{\"rows\": 5}".to_string()).await;
    let transport = HttpTransport::new(&server_url).expect("transport");

    let err = transport.simulate(&request()).await.expect_err("must fail");
    assert!(matches!(err, QueryError::Malformed(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let transport = HttpTransport::new(&format!("http://{addr}")).expect("transport");

    let err = transport.simulate(&request()).await.expect_err("must fail");
    assert!(matches!(err, QueryError::Transport(_)), "unexpected error: {err}");
}
