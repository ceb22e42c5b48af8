use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Answer;
use super::ClientError;

/// File contents read from disk, ready to send to the upload endpoint.
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Success body of the upload endpoint. Only `status` is guaranteed to be
/// meaningful.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub chunks: Option<u64>,
    #[serde(default)]
    pub status: String,
}

#[async_trait]
pub trait Backend {
    /// Used at startup to verify the backend is reachable before the user
    /// starts uploading.
    async fn health_check(&self) -> Result<()>;

    /// Sends a document for ingestion. Exactly one request is made, with no
    /// retry.
    async fn upload(&self, document: DocumentUpload) -> Result<UploadReceipt, ClientError>;

    /// Asks a question against the ingested document. Exactly one request is
    /// made, with no retry.
    async fn query(&self, question: &str) -> Result<Answer, ClientError>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
