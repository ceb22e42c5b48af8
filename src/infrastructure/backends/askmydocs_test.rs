use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use mockito::Matcher;
use serde_json::json;
use test_utils::pdf_fixture;
use test_utils::query_response_fixture;
use test_utils::upload_response_fixture;

use super::error_detail;
use super::AskMyDocs;
use crate::domain::models::Answer;
use crate::domain::models::Backend;
use crate::domain::models::Citation;
use crate::domain::models::ClientError;
use crate::domain::models::DocumentUpload;
use crate::domain::models::UploadReceipt;

impl AskMyDocs {
    fn with_url(url: String) -> AskMyDocs {
        return AskMyDocs::new(&url, 200, 2000, 3);
    }
}

fn document() -> DocumentUpload {
    return DocumentUpload {
        file_name: "policy.pdf".to_string(),
        bytes: pdf_fixture().to_vec(),
    };
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"message":"Welcome to AskMyDocs API. Go to /docs for documentation."}"#)
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.health_check().await;

    assert!(res.is_ok());
    mock.assert();
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/").with_status(500).create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.health_check().await;

    assert!(res.is_err());
    mock.assert();
}

#[tokio::test]
async fn it_fails_health_checks_without_url() {
    let backend = AskMyDocs::new("", 200, 0, 3);
    let res = backend.health_check().await;

    assert!(res.is_err());
}

#[tokio::test]
async fn it_uploads_documents() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::Regex(
            r#"name="file"; filename="policy.pdf""#.to_string(),
        ))
        .with_status(200)
        .with_body(upload_response_fixture())
        .expect(1)
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.upload(document()).await;
    mock.assert();

    assert_eq!(
        res,
        Ok(UploadReceipt {
            filename: "policy.pdf".to_string(),
            chunks: Some(42),
            status: "success".to_string(),
        })
    );

    return Ok(());
}

#[tokio::test]
async fn it_accepts_status_only_upload_bodies() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(201)
        .with_body(r#"{"status":"processing"}"#)
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let receipt = backend.upload(document()).await.unwrap();
    mock.assert();

    assert_eq!(receipt.status, "processing");
    assert_eq!(receipt.chunks, None);
}

#[tokio::test]
async fn it_fails_uploads_with_backend_detail() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(500)
        .with_body(r#"{"detail":"parse error"}"#)
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.upload(document()).await;
    mock.assert();

    assert_eq!(res, Err(ClientError::BackendError("parse error".to_string())));
}

#[tokio::test]
async fn it_fails_uploads_without_detail() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.upload(document()).await;
    mock.assert();

    assert_eq!(res, Err(ClientError::GenericFailure));
}

#[tokio::test]
async fn it_accepts_plain_text_upload_bodies() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_body("Document uploaded\n")
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.upload(document()).await;
    mock.assert();

    assert_eq!(
        res,
        Ok(UploadReceipt {
            filename: "".to_string(),
            chunks: None,
            status: "Document uploaded".to_string(),
        })
    );
}

#[tokio::test]
async fn it_fails_uploads_on_network_errors() {
    let backend = AskMyDocs::with_url("http://127.0.0.1:1".to_string());
    let res = backend.upload(document()).await;

    assert!(matches!(res, Err(ClientError::NetworkFailure(_))));
}

#[tokio::test]
async fn it_queries_with_citations() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .match_body(Matcher::Json(json!({
            "query": "What does the policy cover?",
            "top_k": 3
        })))
        .with_status(200)
        .with_body(query_response_fixture())
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.query("What does the policy cover?").await;
    mock.assert();

    assert_eq!(
        res,
        Ok(Answer {
            text: "Coverage includes X.".to_string(),
            sources: vec![Citation::new("policy.pdf", "3.2")],
        })
    );

    return Ok(());
}

#[tokio::test]
async fn it_keeps_citation_order() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(
            json!({
                "answer": "Medical and baggage are covered.",
                "sources": [
                    {"source": "policy.pdf", "section": "2.1"},
                    {"source": "policy.pdf", "section": "7.4"},
                    {"source": "policy.pdf", "section": "1.0"}
                ]
            })
            .to_string(),
        )
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let answer = backend.query("What is covered?").await.unwrap();
    mock.assert();

    let sections = answer
        .sources
        .iter()
        .map(|citation| return citation.section.to_string())
        .collect::<Vec<String>>();
    assert_eq!(sections, vec!["2.1", "7.4", "1.0"]);
}

#[tokio::test]
async fn it_queries_with_empty_sources() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(r#"{"answer":"Yes, skiing is covered.","sources":[]}"#)
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let answer = backend.query("Is skiing covered?").await.unwrap();
    mock.assert();

    assert_eq!(answer.text, "Yes, skiing is covered.");
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn it_fails_queries_with_backend_detail() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(500)
        .with_body(r#"{"detail":"Vector store is empty"}"#)
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.query("Is skiing covered?").await;
    mock.assert();

    assert_eq!(
        res,
        Err(ClientError::BackendError("Vector store is empty".to_string()))
    );
}

#[tokio::test]
async fn it_fails_queries_on_validation_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(422)
        .with_body(r#"{"detail":[{"loc":["body","query"],"msg":"field required"}]}"#)
        .create();

    let backend = AskMyDocs::with_url(server.url());
    let res = backend.query("Is skiing covered?").await;
    mock.assert();

    assert_eq!(res, Err(ClientError::GenericFailure));
}

#[tokio::test]
async fn it_times_out_queries() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_chunked_body(|writer| {
            thread::sleep(Duration::from_millis(500));
            return writer.write_all(br#"{"answer":"Too slow","sources":[]}"#);
        })
        .create();

    let backend = AskMyDocs::new(&server.url(), 200, 50, 3);
    let res = backend.query("Is skiing covered?").await;
    drop(mock);

    assert!(matches!(res, Err(ClientError::NetworkFailure(_))));
}

#[tokio::test]
async fn it_times_out_uploads() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_chunked_body(|writer| {
            thread::sleep(Duration::from_millis(500));
            return writer.write_all(upload_response_fixture().as_bytes());
        })
        .create();

    let backend = AskMyDocs::new(&server.url(), 200, 50, 3);
    let res = backend.upload(document()).await;
    drop(mock);

    assert!(matches!(res, Err(ClientError::NetworkFailure(_))));
}

#[tokio::test]
async fn it_times_out_reading_error_bodies() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/query")
        .with_status(500)
        .with_chunked_body(|writer| {
            thread::sleep(Duration::from_millis(500));
            return writer.write_all(br#"{"detail":"parse error"}"#);
        })
        .create();

    let backend = AskMyDocs::new(&server.url(), 200, 50, 3);
    let res = backend.query("Is skiing covered?").await;
    drop(mock);

    assert!(matches!(res, Err(ClientError::NetworkFailure(_))));
}

#[test]
fn it_extracts_error_details() {
    assert_eq!(
        error_detail(r#"{"detail":"parse error"}"#),
        Some("parse error".to_string())
    );
    assert_eq!(
        error_detail(r#"{"error":"LLMError","details":"rate limited"}"#),
        Some("LLMError: rate limited".to_string())
    );
    assert_eq!(
        error_detail(r#"{"error":"DocumentProcessingError"}"#),
        Some("DocumentProcessingError".to_string())
    );
    assert_eq!(error_detail(r#"{"detail":""}"#), None);
    assert_eq!(error_detail(r#"{"detail":{"code":1}}"#), None);
    assert_eq!(error_detail(r#"{}"#), None);
    assert_eq!(error_detail("Internal Server Error"), None);
}
