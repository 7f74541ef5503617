use super::*;

use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Fake remote service that replays a scripted list of responses and records
/// what it observed from the client.
#[derive(Clone)]
struct ScriptedService {
    seen_bodies: Arc<Mutex<Vec<Value>>>,
    seen_auth: Arc<Mutex<Vec<Option<String>>>>,
    replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
}

impl ScriptedService {
    fn new(replies: Vec<(StatusCode, Value)>) -> Self {
        Self {
            seen_bodies: Arc::new(Mutex::new(Vec::new())),
            seen_auth: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(
                replies
                    .into_iter()
                    .map(|(status, body)| (status, body.to_string()))
                    .collect(),
            )),
        }
    }

    async fn session_ids_seen(&self) -> Vec<Option<String>> {
        self.seen_bodies
            .lock()
            .await
            .iter()
            .map(|body| {
                body.get("session_id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect()
    }
}

async fn scripted_ask(
    State(state): State<ScriptedService>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.seen_bodies.lock().await.push(body);
    state.seen_auth.lock().await.push(
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    );
    state
        .replies
        .lock()
        .await
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, "script exhausted".into()))
}

async fn spawn_scripted(state: ScriptedService) -> String {
    let router = Router::new()
        .route("/ask", post(scripted_ask))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn live_config(api_url: String) -> AskConfig {
    AskConfig::new(api_url)
}

#[tokio::test]
async fn session_id_is_generated_once_and_reused() {
    let state = ScriptedService::new(vec![
        (StatusCode::OK, json!({"answer": "first"})),
        (StatusCode::OK, json!({"answer": "second"})),
    ]);
    let api_url = spawn_scripted(state.clone()).await;
    let client = AskClient::new(live_config(api_url));

    assert!(client.session_id().await.is_none());
    client.ask("q1", AskOptions::default()).await.expect("q1");
    client.ask("q2", AskOptions::default()).await.expect("q2");

    let seen = state.session_ids_seen().await;
    assert_eq!(seen.len(), 2);
    let first = seen[0].clone().expect("session on first call");
    assert_eq!(seen[1].as_deref(), Some(first.as_str()));
    assert_eq!(client.session_id().await.as_deref(), Some(first.as_str()));
}

#[tokio::test]
async fn server_rotated_session_id_is_adopted() {
    let state = ScriptedService::new(vec![
        (
            StatusCode::OK,
            json!({"answer": "first", "session_id": "rotated-by-server"}),
        ),
        (StatusCode::OK, json!({"answer": "second"})),
    ]);
    let api_url = spawn_scripted(state.clone()).await;
    let client = AskClient::new(live_config(api_url));

    client.ask("q1", AskOptions::default()).await.expect("q1");
    assert_eq!(
        client.session_id().await.as_deref(),
        Some("rotated-by-server")
    );

    client.ask("q2", AskOptions::default()).await.expect("q2");
    let seen = state.session_ids_seen().await;
    assert_eq!(seen[1].as_deref(), Some("rotated-by-server"));
}

#[tokio::test]
async fn externally_injected_session_id_is_used() {
    let state = ScriptedService::new(vec![(StatusCode::OK, json!({"answer": "ok"}))]);
    let api_url = spawn_scripted(state.clone()).await;
    let client = AskClient::new(live_config(api_url));

    client.set_session_id("restored-session").await;
    client.ask("q", AskOptions::default()).await.expect("q");

    let seen = state.session_ids_seen().await;
    assert_eq!(seen[0].as_deref(), Some("restored-session"));
}

#[tokio::test]
async fn timeout_beats_a_slow_server() {
    async fn slow_ask() -> Json<Value> {
        time::sleep(Duration::from_millis(500)).await;
        Json(json!({"answer": "too late"}))
    }
    let router = Router::new().route("/ask", post(slow_ask));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    let client = AskClient::new(live_config(format!("http://{addr}")));
    let err = client
        .ask(
            "q",
            AskOptions {
                timeout: Some(Duration::from_millis(50)),
                ..Default::default()
            },
        )
        .await
        .expect_err("must time out");
    assert!(matches!(err, AskError::TimedOut), "got {err:?}");
}

#[tokio::test]
async fn pre_cancelled_token_surfaces_cancelled() {
    // No server needed: the biased select checks cancellation first.
    let client = AskClient::new(live_config("http://127.0.0.1:9".to_string()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .ask(
            "q",
            AskOptions {
                cancel: Some(cancel),
                ..Default::default()
            },
        )
        .await
        .expect_err("must be cancelled");
    assert!(matches!(err, AskError::Cancelled), "got {err:?}");
}

#[tokio::test]
async fn cancellation_mid_flight_wins_over_a_slow_server() {
    async fn slow_ask() -> Json<Value> {
        time::sleep(Duration::from_secs(5)).await;
        Json(json!({"answer": "too late"}))
    }
    let router = Router::new().route("/ask", post(slow_ask));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    let client = AskClient::new(live_config(format!("http://{addr}")));
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = client
        .ask(
            "q",
            AskOptions {
                cancel: Some(cancel),
                ..Default::default()
            },
        )
        .await
        .expect_err("must be cancelled");
    assert!(matches!(err, AskError::Cancelled), "got {err:?}");
}

#[tokio::test]
async fn server_error_message_is_surfaced_verbatim() {
    let state = ScriptedService::new(vec![(
        StatusCode::BAD_GATEWAY,
        json!({"error": "upstream answering service unavailable"}),
    )]);
    let api_url = spawn_scripted(state).await;
    let client = AskClient::new(live_config(api_url));

    let err = client
        .ask("q", AskOptions::default())
        .await
        .expect_err("must fail");
    match err {
        AskError::RequestFailed { message } => {
            assert_eq!(message, "upstream answering service unavailable");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_http_status() {
    async fn broken_ask() -> (StatusCode, String) {
        (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>".into())
    }
    let router = Router::new().route("/ask", post(broken_ask));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    let client = AskClient::new(live_config(format!("http://{addr}")));
    let err = client
        .ask("q", AskOptions::default())
        .await
        .expect_err("must fail");
    match err {
        AskError::RequestFailed { message } => assert_eq!(message, "HTTP 500"),
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_its_own_failure() {
    async fn junk_ask() -> String {
        "not json at all".to_string()
    }
    let router = Router::new().route("/ask", post(junk_ask));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    let client = AskClient::new(live_config(format!("http://{addr}")));
    let err = client
        .ask("q", AskOptions::default())
        .await
        .expect_err("must fail");
    assert!(matches!(err, AskError::MalformedResponse { .. }), "got {err:?}");
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    // Bind then drop the listener so the port is known-dead.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = AskClient::new(live_config(format!("http://{addr}")));
    let err = client
        .ask("q", AskOptions::default())
        .await
        .expect_err("must fail");
    assert!(matches!(err, AskError::Network { .. }), "got {err:?}");
}

#[tokio::test]
async fn bearer_header_is_attached_only_when_configured() {
    let state = ScriptedService::new(vec![
        (StatusCode::OK, json!({"answer": "ok"})),
        (StatusCode::OK, json!({"answer": "ok"})),
    ]);
    let api_url = spawn_scripted(state.clone()).await;

    let mut config = live_config(api_url.clone());
    config.bearer_token = Some("secret-token".to_string());
    AskClient::new(config)
        .ask("q", AskOptions::default())
        .await
        .expect("authorized ask");

    AskClient::new(live_config(api_url))
        .ask("q", AskOptions::default())
        .await
        .expect("anonymous ask");

    let auth = state.seen_auth.lock().await.clone();
    assert_eq!(auth[0].as_deref(), Some("Bearer secret-token"));
    assert_eq!(auth[1], None);
}

#[tokio::test]
async fn request_carries_context_and_query() {
    let state = ScriptedService::new(vec![(StatusCode::OK, json!({"answer": "ok"}))]);
    let api_url = spawn_scripted(state.clone()).await;

    let mut config = live_config(api_url);
    config.dapp = "demo-dapp".to_string();
    config.lang = "pl".to_string();
    AskClient::new(config)
        .ask("Czy to bezpieczne?", AskOptions::default())
        .await
        .expect("ask");

    let bodies = state.seen_bodies.lock().await;
    assert_eq!(bodies[0]["query"], "Czy to bezpieczne?");
    assert_eq!(bodies[0]["context"]["dapp"], "demo-dapp");
    assert_eq!(bodies[0]["context"]["lang"], "pl");
}

#[tokio::test(start_paused = true)]
async fn mock_mode_still_honors_the_timeout() {
    let mut config = AskConfig::new("unused");
    config.mock = true;
    let client = AskClient::new(config);

    // The simulated delay is at least 800 ms, so a 100 ms deadline fires
    // first and must read as a timeout, not a server failure.
    let err = client
        .ask(
            "hello",
            AskOptions {
                timeout: Some(Duration::from_millis(100)),
                ..Default::default()
            },
        )
        .await
        .expect_err("must time out");
    assert!(matches!(err, AskError::TimedOut), "got {err:?}");
}

#[tokio::test(start_paused = true)]
async fn lifecycle_events_fire_around_a_mock_ask() {
    let events: Arc<StdMutex<Vec<PanelEvent>>> = Arc::new(StdMutex::new(Vec::new()));
    let sink_events = events.clone();

    let mut config = AskConfig::new("unused");
    config.mock = true;
    config.on_event = Some(Arc::new(move |event: &PanelEvent| {
        sink_events.lock().expect("sink lock").push(event.clone());
    }));

    let client = AskClient::new(config);
    client.ask("hello", AskOptions::default()).await.expect("ask");

    let events = events.lock().expect("events lock");
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], PanelEvent::Sent { query } if query == "hello"));
    assert!(matches!(&events[1], PanelEvent::Response { .. }));
}

#[tokio::test(start_paused = true)]
async fn failure_events_carry_the_taxonomy_kind() {
    let events: Arc<StdMutex<Vec<PanelEvent>>> = Arc::new(StdMutex::new(Vec::new()));
    let sink_events = events.clone();

    let mut config = AskConfig::new("unused");
    config.mock = true;
    config.on_event = Some(Arc::new(move |event: &PanelEvent| {
        sink_events.lock().expect("sink lock").push(event.clone());
    }));

    let client = AskClient::new(config);
    let _ = client
        .ask(
            "hello",
            AskOptions {
                timeout: Some(Duration::from_millis(1)),
                ..Default::default()
            },
        )
        .await;

    let events = events.lock().expect("events lock");
    assert!(
        matches!(&events[1], PanelEvent::Failed { kind, .. } if kind == "timed_out"),
        "got {:?}",
        events[1]
    );
}
