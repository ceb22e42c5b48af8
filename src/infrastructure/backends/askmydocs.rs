#[cfg(test)]
#[path = "askmydocs_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Answer;
use crate::domain::models::Backend;
use crate::domain::models::Citation;
use crate::domain::models::ClientError;
use crate::domain::models::DocumentUpload;
use crate::domain::models::UploadReceipt;

/// Multipart field the upload endpoint reads the document from.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct QueryRequest {
    query: String,
    top_k: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DocumentSource {
    source: String,
    section: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct QueryResponse {
    answer: String,
    #[serde(default)]
    sources: Vec<DocumentSource>,
}

/// Covers both `{"detail": ...}` from raised HTTP errors and the
/// `{"error": ..., "details": ...}` error schema.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    detail: Option<serde_json::Value>,
    error: Option<String>,
    details: Option<String>,
}

fn error_detail(body: &str) -> Option<String> {
    let res = serde_json::from_str::<ErrorResponse>(body).ok()?;

    if let Some(serde_json::Value::String(detail)) = res.detail {
        if !detail.trim().is_empty() {
            return Some(detail);
        }
    }

    if let Some(error) = res.error {
        if error.trim().is_empty() {
            return None;
        }
        if let Some(details) = res.details {
            return Some(format!("{error}: {details}"));
        }
        return Some(error);
    }

    return None;
}

fn convert_err(err: reqwest::Error) -> ClientError {
    tracing::error!(error = ?err, "Request to AskMyDocs failed");
    return ClientError::NetworkFailure(err.to_string());
}

async fn failure(res: reqwest::Response) -> ClientError {
    let status = res.status().as_u16();
    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => return convert_err(err),
    };
    tracing::error!(status = status, body = body, "AskMyDocs returned an error");

    match error_detail(&body) {
        Some(detail) => return ClientError::BackendError(detail),
        None => return ClientError::GenericFailure,
    }
}

pub struct AskMyDocs {
    url: String,
    health_check_timeout: u64,
    request_timeout: u64,
    top_k: u32,
}

impl Default for AskMyDocs {
    fn default() -> AskMyDocs {
        return AskMyDocs::new(
            &Config::get(ConfigKey::ApiURL),
            Config::get(ConfigKey::BackendHealthCheckTimeout)
                .parse::<u64>()
                .unwrap_or(1000),
            Config::get(ConfigKey::RequestTimeout)
                .parse::<u64>()
                .unwrap_or(0),
            Config::get(ConfigKey::TopK).parse::<u32>().unwrap_or(3),
        );
    }
}

impl AskMyDocs {
    /// Timeouts are in milliseconds. A `request_timeout` of 0 waits forever.
    pub fn new(url: &str, health_check_timeout: u64, request_timeout: u64, top_k: u32) -> AskMyDocs {
        return AskMyDocs {
            url: url.trim_end_matches('/').to_string(),
            health_check_timeout,
            request_timeout,
            top_k,
        };
    }

    fn with_timeout(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.request_timeout == 0 {
            return req;
        }

        return req.timeout(Duration::from_millis(self.request_timeout));
    }
}

#[async_trait]
impl Backend for AskMyDocs {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("AskMyDocs API URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(format!("{url}/", url = self.url))
            .timeout(Duration::from_millis(self.health_check_timeout))
            .send()
            .await;

        let status = match res {
            Ok(res) => res.status().as_u16(),
            Err(err) => {
                tracing::error!(error = ?err, "AskMyDocs is not reachable");
                bail!("AskMyDocs is not reachable at {}", self.url);
            }
        };
        if status >= 400 {
            tracing::error!(status = status, "AskMyDocs health check failed");
            bail!("AskMyDocs health check failed with status {status}");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn upload(&self, document: DocumentUpload) -> Result<UploadReceipt, ClientError> {
        let part = multipart::Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str("application/pdf")
            .map_err(convert_err)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let res = self
            .with_timeout(
                reqwest::Client::new()
                    .post(format!("{url}/api/upload", url = self.url))
                    .multipart(form),
            )
            .send()
            .await
            .map_err(convert_err)?;

        if !res.status().is_success() {
            return Err(failure(res).await);
        }

        // Any 2xx means the document was accepted, whatever the body says.
        let body = res.text().await.map_err(convert_err)?;
        let receipt = serde_json::from_str::<UploadReceipt>(&body).unwrap_or_else(|err| {
            tracing::warn!(error = ?err, body = body, "Upload response is not a receipt");
            return UploadReceipt {
                status: body.trim().to_string(),
                ..Default::default()
            };
        });

        return Ok(receipt);
    }

    #[allow(clippy::implicit_return)]
    async fn query(&self, question: &str) -> Result<Answer, ClientError> {
        let req = QueryRequest {
            query: question.to_string(),
            top_k: self.top_k,
        };

        let res = self
            .with_timeout(
                reqwest::Client::new()
                    .post(format!("{url}/api/query", url = self.url))
                    .json(&req),
            )
            .send()
            .await
            .map_err(convert_err)?;

        if !res.status().is_success() {
            return Err(failure(res).await);
        }

        let text = res.text().await.map_err(convert_err)?;
        let body = serde_json::from_str::<QueryResponse>(&text).map_err(|err| {
            tracing::error!(error = ?err, body = text, "Malformed query response");
            return ClientError::GenericFailure;
        })?;
        tracing::debug!(body = ?body, "Query response");

        return Ok(Answer {
            text: body.answer,
            sources: body
                .sources
                .iter()
                .map(|source| return Citation::new(&source.source, &source.section))
                .collect(),
        });
    }
}
