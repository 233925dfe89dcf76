use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use studydesk::server::{AppState, router};
use studydesk::storage::{StoreLayout, StoreName};
use tempfile::TempDir;

struct TestServer {
    base: String,
    client: reqwest::Client,
    dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = TempDir::new().unwrap();
        let state = Arc::new(AppState::open(&StoreLayout::new(dir.path())).unwrap());
        let app = router(state, None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            dir,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(format!("{}{}", self.base, path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.delete(format!("{}{}", self.base, path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }
}

fn sample_question(text: &str) -> Value {
    json!({
        "question": text,
        "optionA": "3",
        "optionB": "4",
        "optionC": "5",
        "optionD": "6",
        "correctAnswer": "B"
    })
}

#[tokio::test]
async fn test_messages_roundtrip() {
    let server = TestServer::start().await;

    let (status, created) = server.post("/api/messages", json!({"text": "hello"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["sender"], "user");
    assert!(created["id"].as_i64().unwrap() > 0);
    assert!(created["timestamp"].is_string());

    server.post("/api/messages", json!({"text": "reply", "sender": "bot"})).await;

    let (status, list) = server.get("/api/messages").await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<_> = list.as_array().unwrap().iter().map(|m| m["text"].clone()).collect();
    assert_eq!(texts, vec![json!("hello"), json!("reply")]);
}

#[tokio::test]
async fn test_missing_text_is_client_error() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/api/messages", json!({"text": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field(s): text");

    let (_, list) = server.get("/api/messages").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(format!("{}/api/files", server.base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_files_and_folders() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/api/files", json!({"name": "a.pdf", "path": "/a.pdf"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field(s): type");

    let (_, first) = server
        .post("/api/files", json!({"name": "a.pdf", "type": "pdf", "path": "/a.pdf"}))
        .await;
    let (_, second) = server
        .post("/api/files", json!({"name": "b.png", "type": "image", "size": "2.0 KB", "path": "/b.png"}))
        .await;
    assert_eq!(first["size"], "");
    assert!(first["createdAt"].is_string());

    let (_, files) = server.get("/api/files").await;
    let names: Vec<_> = files.as_array().unwrap().iter().map(|f| f["name"].clone()).collect();
    assert_eq!(names, vec![json!("b.png"), json!("a.pdf")]);

    let id = second["id"].as_i64().unwrap();
    for _ in 0..2 {
        let (status, body) = server.delete(&format!("/api/files/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    let (_, files) = server.get("/api/files").await;
    assert_eq!(files.as_array().unwrap().len(), 1);

    let (status, folder) = server.post("/api/folders", json!({"name": "Notes", "path": "/notes"})).await;
    assert_eq!(status, StatusCode::OK);
    for _ in 0..2 {
        let (status, body) = server.delete(&format!("/api/folders/{}", folder["id"])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }
    let (_, folders) = server.get("/api/folders").await;
    assert!(folders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chapter_question_scenario() {
    let server = TestServer::start().await;

    let (status, chapter) = server
        .post("/api/chapters", json!({"title": "Algebra", "subjectId": 1}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chapter["totalQuestions"], 0);
    assert_eq!(chapter["difficulty"], "medium");
    let id = chapter["id"].as_i64().unwrap();

    let (status, body) = server
        .post("/api/chapters", json!({"title": "Algebra", "subjectId": 2}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Chapter with this title already exists");

    let (status, bulk) = server
        .post(
            "/api/questions/bulk",
            json!({"chapterId": id, "questions": [sample_question("2+2?")]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bulk["success"], true);
    assert_eq!(bulk["created_count"], 1);
    assert_eq!(bulk["questions"][0]["explanation"], "No explanation provided");

    let (_, chapters) = server.get("/api/chapters").await;
    let chapters = chapters.as_array().unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0]["totalQuestions"], 1);

    let (_, by_subject) = server.get("/api/subjects/1/chapters").await;
    assert_eq!(by_subject.as_array().unwrap().len(), 1);

    let (_, questions) = server.get(&format!("/api/questions/chapter/{}", id)).await;
    assert_eq!(questions[0]["question"], "2+2?");
    assert_eq!(questions[0]["chapterId"], id);

    for _ in 0..2 {
        let (status, body) = server.delete(&format!("/api/chapters/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    let (_, questions) = server.get(&format!("/api/questions/chapter/{}", id)).await;
    assert!(questions.as_array().unwrap().is_empty());
    let (_, chapters) = server.get("/api/chapters").await;
    assert!(chapters.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_requires_chapter_and_questions() {
    let server = TestServer::start().await;

    let (status, body) = server
        .post("/api/questions/bulk", json!({"questions": [sample_question("q")]}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "chapterId and questions are required");

    let (status, _) = server
        .post("/api/questions/bulk", json!({"chapterId": 1, "questions": []}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.post("/api/chapters", json!({"title": "Physics"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storage_failure_is_generic_server_error() {
    let server = TestServer::start().await;
    let files_db = StoreLayout::new(server.dir.path()).path(StoreName::Files);
    std::fs::write(&files_db, vec![0xAB; 4096]).unwrap();

    let resp = server.client.get(format!("{}/api/files", server.base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = resp.text().await.unwrap();
    assert!(!text.contains("rusqlite"));
    assert!(!text.contains("Storage error"));
    assert!(!text.contains("not a database"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body, json!({"error": "Failed to get files"}));

    let (status, _) = server.get("/api/folders").await;
    assert_eq!(status, StatusCode::OK);
}
