#[cfg(test)]
#[path = "upload_manager_test.rs"]
mod tests;

use crate::domain::models::ClientError;
use crate::domain::models::DocumentFile;
use crate::domain::models::UploadReceipt;
use crate::domain::models::UploadState;

/// Owns the lifecycle of the single document tracked by a session.
#[derive(Default)]
pub struct UploadManager {
    state: UploadState,
}

impl UploadManager {
    pub fn state(&self) -> &UploadState {
        return &self.state;
    }

    pub fn is_busy(&self) -> bool {
        return self.state.is_uploading();
    }

    pub fn is_document_ready(&self) -> bool {
        return self.state.is_succeeded();
    }

    /// Starts an upload of `file`. On `Ok` the caller must issue exactly one
    /// upload request for the returned file. On `Err` no request may be issued.
    ///
    /// A submit while another upload is in flight is rejected and leaves the
    /// in-flight upload untouched. Any other submit replaces the previous
    /// terminal state.
    pub fn submit(&mut self, file: DocumentFile) -> Result<DocumentFile, ClientError> {
        if self.is_busy() {
            tracing::warn!(
                file_name = file.file_name,
                "Upload rejected, another upload is in flight"
            );
            return Err(ClientError::UploadInProgress);
        }

        if !file.is_pdf() {
            let err = ClientError::InvalidFileType(file.file_name.to_string());
            tracing::warn!(file_name = file.file_name, "Upload rejected, not a PDF");
            self.state = UploadState::Failed(file.file_name.to_string(), err.upload_message());
            return Err(err);
        }

        tracing::info!(file_name = file.file_name, "Uploading document");
        self.state = UploadState::Uploading(file.file_name.to_string());

        return Ok(file);
    }

    /// Applies the backend outcome for `file_name`. Outcomes that don't belong
    /// to the in-flight upload are dropped and `false` is returned.
    pub fn complete(
        &mut self,
        file_name: &str,
        result: Result<UploadReceipt, ClientError>,
    ) -> bool {
        if self.state != UploadState::Uploading(file_name.to_string()) {
            tracing::debug!(file_name = file_name, "Dropping stale upload response");
            return false;
        }

        match result {
            Ok(receipt) => {
                tracing::info!(
                    file_name = file_name,
                    chunks = receipt.chunks,
                    status = receipt.status,
                    "Document uploaded"
                );
                self.state = UploadState::Succeeded(file_name.to_string());
            }
            Err(err) => {
                tracing::error!(file_name = file_name, error = ?err, "Document upload failed");
                self.state = UploadState::Failed(file_name.to_string(), err.upload_message());
            }
        }

        return true;
    }
}
