#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response};
use axum::Router;
use docgen_server::{router, AppState};
use docgen_store_local::JsonFileStore;
use docgen_template::PlaceholderDictionary;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;
pub const BOUNDARY: &str = "docgen-test-boundary";

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

/// A test app over a fresh data directory.
pub struct TestApp {
    pub router: Router,
    pub data_dir: TempDir,
}

pub async fn build_test_app() -> TestApp {
    let data_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::open(data_dir.path()).await.unwrap());
    let state = AppState::new(store, PlaceholderDictionary::korean());
    TestApp {
        router: router(state, MAX_UPLOAD_BYTES),
        data_dir,
    }
}

/// A `.docx` package with one paragraph per entry; each paragraph is split
/// into one run per fragment.
pub fn docx(paragraphs: &[&[&str]]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|fragments| {
            let runs: String = fragments
                .iter()
                .map(|f| format!(r#"<w:r><w:t xml:space="preserve">{f}</w:t></w:r>"#))
                .collect();
            format!("<w:p>{runs}</w:p>")
        })
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}"><w:body>{body}</w:body></w:document>"#
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

pub fn part_text(data: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

/// `multipart/form-data` body with a `file` part and optional `documentType`.
pub fn multipart_body(file_name: &str, data: &[u8], document_type: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(document_type) = document_type {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"documentType\"\r\n\r\n{document_type}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_json(app: &TestApp, method: Method, uri: &str, json: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn upload(
    app: &TestApp,
    file_name: &str,
    data: &[u8],
    document_type: Option<&str>,
) -> Response<Body> {
    let body = multipart_body(file_name, data, document_type);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/templates/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
