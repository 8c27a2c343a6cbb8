use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use tempfile::TempDir;

use hirouen::ApiConfig;
use hirouen::client::ApiClient;
use hirouen::upload::{BatchOutcome, PendingFile, Uploader};

#[derive(Debug, Clone)]
struct ReceivedUpload {
    field: String,
    file_name: String,
    bytes: Vec<u8>,
}

#[derive(Clone, Default)]
struct UploadSink {
    received: Arc<Mutex<Vec<ReceivedUpload>>>,
    /// File names the mock rejects with a 500.
    reject: Arc<Vec<String>>,
}

async fn upload_handler(State(sink): State<UploadSink>, mut multipart: Multipart) -> StatusCode {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let received = ReceivedUpload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        let rejected = sink.reject.contains(&received.file_name);
        sink.received.lock().unwrap().push(received);
        if rejected {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }
    StatusCode::OK
}

async fn serve_upload_sink(reject: Vec<String>) -> (String, UploadSink) {
    let sink = UploadSink {
        received: Arc::new(Mutex::new(Vec::new())),
        reject: Arc::new(reject),
    };
    let app = Router::new()
        .route("/photos", post(upload_handler))
        .with_state(sink.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), sink)
}

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        ..ApiConfig::default()
    })
    .unwrap()
}

async fn selection(dir: &TempDir, names: &[&str]) -> Vec<PendingFile> {
    let mut files = Vec::new();
    for name in names {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("bytes of {}", name)).unwrap();
        files.push(PendingFile::from_path(&path).await.unwrap());
    }
    files
}

#[tokio::test]
async fn a_clean_batch_clears_the_selection() {
    let (base_url, sink) = serve_upload_sink(Vec::new()).await;
    let dir = TempDir::new().unwrap();

    let mut uploader = Uploader::new(client_for(&base_url));
    uploader
        .queue_mut()
        .add_selection(selection(&dir, &["a.jpg", "b.jpg", "c.jpg"]).await);

    let outcome = uploader.upload_all().await;
    assert_eq!(outcome, BatchOutcome::AllUploaded { count: 3 });
    assert_eq!(outcome.message(), "All 3 files uploaded successfully!");
    assert!(uploader.queue().is_empty());

    let received = sink.received.lock().unwrap();
    assert_eq!(received.len(), 3);
    // One file per request, in selection order, under the expected field.
    for (upload, name) in received.iter().zip(["a.jpg", "b.jpg", "c.jpg"]) {
        assert_eq!(upload.field, "photos");
        assert_eq!(upload.file_name, name);
        assert_eq!(upload.bytes, format!("bytes of {}", name).into_bytes());
    }
}

#[tokio::test]
async fn a_partial_failure_keeps_the_whole_selection() {
    let (base_url, sink) = serve_upload_sink(vec!["b.jpg".to_string()]).await;
    let dir = TempDir::new().unwrap();

    let mut uploader = Uploader::new(client_for(&base_url));
    uploader
        .queue_mut()
        .add_selection(selection(&dir, &["a.jpg", "b.jpg", "c.jpg"]).await);

    let outcome = uploader.upload_all().await;
    assert_eq!(
        outcome,
        BatchOutcome::Partial {
            succeeded: 2,
            failed: 1
        }
    );
    assert_eq!(
        outcome.message(),
        "2 uploaded, 1 failed. Please retry the failed files."
    );

    // Succeeded items are retained alongside the failed one.
    assert_eq!(uploader.queue().len(), 3);
    assert_eq!(sink.received.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn an_all_failed_batch_reports_generically() {
    let reject = vec!["a.jpg".to_string(), "b.jpg".to_string()];
    let (base_url, _sink) = serve_upload_sink(reject).await;
    let dir = TempDir::new().unwrap();

    let mut uploader = Uploader::new(client_for(&base_url));
    uploader
        .queue_mut()
        .add_selection(selection(&dir, &["a.jpg", "b.jpg"]).await);

    let outcome = uploader.upload_all().await;
    assert_eq!(outcome, BatchOutcome::AllFailed);
    assert_eq!(outcome.message(), "Upload failed. Please try again in a moment.");
    assert_eq!(uploader.queue().len(), 2);
}

#[tokio::test]
async fn an_empty_submit_sends_nothing() {
    let (base_url, sink) = serve_upload_sink(Vec::new()).await;

    let mut uploader = Uploader::new(client_for(&base_url));
    let outcome = uploader.upload_all().await;

    assert_eq!(outcome, BatchOutcome::NothingSelected);
    assert_eq!(outcome.message(), "Select at least one file before uploading.");
    assert!(sink.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn an_unreachable_server_fails_every_item() {
    // Nothing is listening here.
    let client = client_for("http://127.0.0.1:9");
    let dir = TempDir::new().unwrap();

    let mut uploader = Uploader::new(client);
    uploader
        .queue_mut()
        .add_selection(selection(&dir, &["a.jpg"]).await);

    let outcome = uploader.upload_all().await;
    assert_eq!(outcome, BatchOutcome::AllFailed);
    assert_eq!(uploader.queue().len(), 1);
}

#[tokio::test]
async fn guessed_mime_types_ride_along() {
    let dir = TempDir::new().unwrap();
    let files = selection(&dir, &["a.jpg", "clip.mp4", "notes.txt"]).await;
    assert_eq!(files[0].mime, "image/jpeg");
    assert_eq!(files[1].mime, "video/mp4");
    assert_eq!(files[2].mime, "text/plain");
}
