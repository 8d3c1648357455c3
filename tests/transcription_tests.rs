use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use colloquy::audio::{OpenAiTranscriber, Transcriber};
use colloquy::error::ColloquyError;

#[tokio::test]
async fn posts_multipart_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("name=\"model\""))
        .and(body_string_contains("whisper-1"))
        .and(body_string_contains("filename=\"audio.wav\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hello world"})))
        .expect(1)
        .mount(&server)
        .await;

    let transcriber = OpenAiTranscriber::new_with_base_url("test-key", server.uri());
    let text = transcriber
        .transcribe(b"RIFFfakewav", "audio/wav")
        .await
        .expect("transcription should succeed");

    assert_eq!(text, "hello world");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary=colloquy-"));
}

#[tokio::test]
async fn missing_text_is_empty_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"duration": 0.4})))
        .mount(&server)
        .await;

    let text = OpenAiTranscriber::new_with_base_url("test-key", server.uri())
        .with_model("whisper-large")
        .transcribe(b"OggS", "audio/ogg")
        .await
        .unwrap();

    assert_eq!(text, "");
}

#[tokio::test]
async fn error_status_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "invalid key", "type": "auth", "code": "invalid_api_key"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = OpenAiTranscriber::new_with_base_url("bad", server.uri())
        .transcribe(b"ID3", "audio/mpeg")
        .await
        .unwrap_err();

    assert!(matches!(err, ColloquyError::Api { status: 401, ref message } if message == "invalid key"));
}

#[tokio::test]
async fn unsupported_mime_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = OpenAiTranscriber::new_with_base_url("test-key", server.uri())
        .transcribe(b"%PDF", "application/pdf")
        .await
        .unwrap_err();

    assert!(matches!(err, ColloquyError::InvalidArgument(_)));
}
