pub mod lectures;
pub mod transcribe;

use actix_web::web;

use crate::health;

/// Register every route. Shared between `main` and the handler tests so
/// both exercise the same routing table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::home))
        .route("/transcribe", web::post().to(transcribe::transcribe))
        .route("/history", web::get().to(lectures::history))
        .route("/lecture/{id}", web::get().to(lectures::get_lecture))
        .route("/lecture/{id}", web::delete().to(lectures::delete_lecture));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::middleware::AccessGate;
    use crate::state::AppState;
    use crate::storage::Storage;
    use crate::transcription::{SpeechToText, TranscriptionError};
    use actix_web::{test, web, App};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Arc;

    /// Gateway double: returns a canned transcript, or a canned API error.
    struct FakeGateway {
        transcript: Result<String, String>,
    }

    impl FakeGateway {
        fn returning(text: &str) -> Arc<Self> {
            Arc::new(Self { transcript: Ok(text.to_string()) })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self { transcript: Err(message.to_string()) })
        }
    }

    #[async_trait]
    impl SpeechToText for FakeGateway {
        async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
            // The staged temp file must exist when the gateway runs.
            assert!(audio_path.exists());
            match &self.transcript {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(TranscriptionError::Api {
                    status: 400,
                    message: message.clone(),
                }),
            }
        }
    }

    fn test_state(gateway: Arc<dyn SpeechToText>, access_code: Option<&str>) -> (tempfile::TempDir, web::Data<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path().join("test.db"));
        storage.init().unwrap();

        let mut config = AppConfig::default();
        config.server.access_code = access_code.map(str::to_string);

        (dir, web::Data::new(AppState::new(config, storage, gateway)))
    }

    fn multipart_body(field_name: &str, filename: &str, data: &[u8]) -> (String, Vec<u8>) {
        let boundary = "-----test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\nContent-Type: audio/mpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .wrap(AccessGate)
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_home_is_open_and_constant() {
        let (_dir, state) = test_state(FakeGateway::returning(""), Some("secret"));
        let app = test_app!(state);

        // No access code supplied; home is exempt from the gate.
        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn test_transcribe_end_to_end() {
        let transcript = "The war changed economies forever.";
        let (_dir, state) = test_state(FakeGateway::returning(transcript), None);
        let app = test_app!(state.clone());

        let (content_type, body) = multipart_body("file", "lecture.mp3", b"fake-audio");
        let req = test::TestRequest::post()
            .uri("/transcribe")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["filename"], "lecture.mp3");
        assert_eq!(body["transcript"], transcript);
        // Under the summary limit, so stored unchanged.
        assert_eq!(body["summary"], transcript);
        assert_eq!(body["category"], "History");
        assert_eq!(body["key_points"][0]["point"], "The war changed economies forever");
        assert_eq!(body["key_points"][0]["importance"], "normal");

        // The record was persisted before the response was produced.
        let records = state.storage.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transcript, transcript);
    }

    #[actix_web::test]
    async fn test_transcribe_without_file_is_400() {
        let (_dir, state) = test_state(FakeGateway::returning("unused"), None);
        let app = test_app!(state);

        let (content_type, body) = multipart_body("notfile", "lecture.mp3", b"fake-audio");
        let req = test::TestRequest::post()
            .uri("/transcribe")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "validation_error");
    }

    #[actix_web::test]
    async fn test_transcribe_gateway_failure_forwards_message() {
        let (_dir, state) = test_state(FakeGateway::failing("audio format not supported"), None);
        let app = test_app!(state.clone());

        let (content_type, body) = multipart_body("file", "lecture.mp3", b"fake-audio");
        let req = test::TestRequest::post()
            .uri("/transcribe")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "gateway_error");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("audio format not supported"));

        // Nothing persisted on failure.
        assert!(state.storage.list_all().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_transcribe_persistence_failure_is_500() {
        let transcript = "A transcript that will have nowhere to go.";
        let (_dir, state) = test_state(FakeGateway::returning(transcript), None);

        // Break storage after init so the insert fails while the
        // transcription itself succeeds.
        let conn = rusqlite::Connection::open(state.storage.db_path()).unwrap();
        conn.execute("DROP TABLE transcriptions", []).unwrap();

        let app = test_app!(state);

        let (content_type, body) = multipart_body("file", "lecture.mp3", b"fake-audio");
        let req = test::TestRequest::post()
            .uri("/transcribe")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "internal_error");
    }

    #[actix_web::test]
    async fn test_history_lists_most_recent_first() {
        let (_dir, state) = test_state(FakeGateway::returning(""), None);
        state.storage.insert("first.mp3", "the quadratic equation", "s1").unwrap();
        state.storage.insert("second.mp3", "nothing in particular", "s2").unwrap();
        let app = test_app!(state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/history").to_request()).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["filename"], "second.mp3");
        assert_eq!(entries[0]["category"], "General");
        assert_eq!(entries[1]["filename"], "first.mp3");
        assert_eq!(entries[1]["category"], "Mathematics");
        // Transcript and key points are omitted from the listing.
        assert!(entries[0].get("transcript").is_none());
        assert!(entries[0].get("key_points").is_none());
    }

    #[actix_web::test]
    async fn test_get_lecture_returns_full_record() {
        let (_dir, state) = test_state(FakeGateway::returning(""), None);
        let id = state
            .storage
            .insert("cells.mp3", "The cell divides. Evolution follows.", "summary")
            .unwrap();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri(&format!("/lecture/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], id);
        assert_eq!(body["category"], "Science");
        assert_eq!(body["key_points"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_get_unknown_lecture_is_404() {
        let (_dir, state) = test_state(FakeGateway::returning(""), None);
        state.storage.insert("exists.mp3", "t", "s").unwrap();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/lecture/9999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["type"], "not_found");
    }

    #[actix_web::test]
    async fn test_delete_lecture_reports_deleted_even_when_absent() {
        let (_dir, state) = test_state(FakeGateway::returning(""), None);
        let id = state.storage.insert("gone.mp3", "t", "s").unwrap();
        let app = test_app!(state.clone());

        let req = test::TestRequest::delete().uri(&format!("/lecture/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "deleted");
        assert_eq!(body["id"], id);
        assert!(state.storage.get_by_id(id).unwrap().is_none());

        // Deleting the same id again still reports success.
        let req = test::TestRequest::delete().uri(&format!("/lecture/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "deleted");
    }

    #[actix_web::test]
    async fn test_access_gate_blocks_and_admits() {
        let (_dir, state) = test_state(FakeGateway::returning(""), Some("secret"));
        let app = test_app!(state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/history").to_request()).await;
        assert_eq!(resp.status(), 401);

        let req = test::TestRequest::get()
            .uri("/history")
            .insert_header(("X-Access-Code", "wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let req = test::TestRequest::get()
            .uri("/history")
            .insert_header(("X-Access-Code", "secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_gate_disabled_when_no_code_configured() {
        let (_dir, state) = test_state(FakeGateway::returning(""), None);
        let app = test_app!(state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/history").to_request()).await;
        assert!(resp.status().is_success());
    }
}
