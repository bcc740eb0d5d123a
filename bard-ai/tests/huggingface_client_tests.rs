//! Hugging Face Inference Client Tests
//!
//! Runs the client against a local axum server standing in for the inference API.
//!
//! Covers:
//! - Request shape (bearer token, model path, text-generation parameters)
//! - Response shapes (array and object)
//! - HTTP status → ProviderErrorKind mapping
//! - Transport failures

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bard_ai::providers::{
    GenerationParams, HfInferenceClient, LyricsProvider, MusicProvider, ProviderErrorKind,
    VocalsProvider,
};
use bard_common::config::{InferenceConfig, ModelConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const TOKEN: &str = "hf_test_token";

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn handle_model(
    State(state): State<MockState>,
    Path(model): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push((model.clone(), body));

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Invalid credentials in Authorization header")
            .into_response();
    }

    match model.as_str() {
        "lyrics/array" => Json(json!([{"generated_text": "  Verse 1:\nhello world\n"}])).into_response(),
        "lyrics/object" => Json(json!({"generated_text": "single object"})).into_response(),
        "lyrics/garbage" => (StatusCode::OK, "not json").into_response(),
        "tts/model" => (StatusCode::OK, vec![1u8, 2, 3, 4]).into_response(),
        "music/model" => (StatusCode::OK, vec![9u8; 16]).into_response(),
        "music/empty" => (StatusCode::OK, Vec::<u8>::new()).into_response(),
        "gated/model" => (StatusCode::FORBIDDEN, "gated").into_response(),
        "busy/model" => (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
        "loading/model" => (StatusCode::SERVICE_UNAVAILABLE, "Model is currently loading").into_response(),
        _ => (StatusCode::NOT_FOUND, "Model not found").into_response(),
    }
}

/// Start the mock inference API; returns its base URL
async fn start_mock() -> (String, MockState) {
    let state = MockState::default();
    let app = Router::new()
        .route("/models/*model", post(handle_model))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn client(base_url: &str, token: &str, lyrics: &str, vocals: &str, music: &str) -> HfInferenceClient {
    let inference = InferenceConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        api_token: None,
    };
    let models = ModelConfig {
        lyrics: lyrics.to_string(),
        vocals: vocals.to_string(),
        music: music.to_string(),
    };
    HfInferenceClient::new(&inference, &models, token.to_string()).unwrap()
}

#[tokio::test]
async fn test_text_generation_request_and_array_response() {
    let (url, state) = start_mock().await;
    let client = client(&url, TOKEN, "lyrics/array", "tts/model", "music/model");

    let params = GenerationParams {
        max_length: 123,
        temperature: 0.4,
        top_p: 0.9,
        repetition_penalty: 1.1,
    };
    let text = client.generate_lyrics("write a song", &params).await.unwrap();
    assert_eq!(text, "  Verse 1:\nhello world\n");

    let requests = state.requests.lock().unwrap();
    let (model, body) = &requests[0];
    assert_eq!(model, "lyrics/array");
    assert_eq!(body["inputs"], "<think>\nwrite a song");
    assert_eq!(body["parameters"]["max_new_tokens"], 123);
    assert_eq!(body["parameters"]["return_full_text"], false);
    assert_eq!(body["parameters"]["do_sample"], true);
    assert!((body["parameters"]["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
}

#[tokio::test]
async fn test_text_generation_object_response() {
    let (url, _state) = start_mock().await;
    let client = client(&url, TOKEN, "lyrics/object", "tts/model", "music/model");

    let text = client
        .generate_lyrics("prompt", &GenerationParams::default())
        .await
        .unwrap();
    assert_eq!(text, "single object");
}

#[tokio::test]
async fn test_unparseable_response_is_invalid_response() {
    let (url, _state) = start_mock().await;
    let client = client(&url, TOKEN, "lyrics/garbage", "tts/model", "music/model");

    let err = client
        .generate_lyrics("prompt", &GenerationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::InvalidResponse);
}

#[tokio::test]
async fn test_audio_endpoints_return_raw_bytes() {
    let (url, state) = start_mock().await;
    let client = client(&url, TOKEN, "lyrics/array", "tts/model", "music/model");

    let vocals = client.synthesize_line("hello there").await.unwrap();
    assert_eq!(vocals.as_bytes(), &[1, 2, 3, 4]);

    let music = client.generate_music("pop instrumental").await.unwrap();
    assert_eq!(music.len(), 16);

    let requests = state.requests.lock().unwrap();
    assert_eq!(requests[0].1, json!({"inputs": "hello there"}));
    assert_eq!(requests[1].1, json!({"inputs": "pop instrumental"}));
}

#[tokio::test]
async fn test_empty_audio_is_empty_error() {
    let (url, _state) = start_mock().await;
    let client = client(&url, TOKEN, "lyrics/array", "tts/model", "music/empty");

    let err = client.generate_music("anything").await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Empty);
}

#[tokio::test]
async fn test_status_mapping() {
    let (url, _state) = start_mock().await;

    let bad_token = client(&url, "wrong", "lyrics/array", "tts/model", "music/model");
    let err = bad_token
        .generate_lyrics("p", &GenerationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Authentication);

    for (model, expected) in [
        ("gated/model", ProviderErrorKind::Authentication),
        ("missing/model", ProviderErrorKind::ModelAccess),
        ("busy/model", ProviderErrorKind::RateLimited),
        ("loading/model", ProviderErrorKind::Api(503)),
    ] {
        let c = client(&url, TOKEN, model, "tts/model", model);
        let err = c.generate_music("p").await.unwrap_err();
        assert_eq!(err.kind, expected, "model {}", model);
    }

    let c = client(&url, TOKEN, "loading/model", "tts/model", "music/model");
    let err = c
        .generate_lyrics("p", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(err.message.contains("currently loading"));
}

#[tokio::test]
async fn test_connection_refused_is_transport() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(
        &format!("http://{}", addr),
        TOKEN,
        "lyrics/array",
        "tts/model",
        "music/model",
    );
    let err = client.synthesize_line("hello").await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Transport);
}
