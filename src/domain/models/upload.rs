#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;

use std::path;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading(String),
    Succeeded(String),
    Failed(String, String),
}

impl UploadState {
    pub fn file_name(&self) -> Option<&str> {
        match self {
            UploadState::Idle => return None,
            UploadState::Uploading(file_name)
            | UploadState::Succeeded(file_name)
            | UploadState::Failed(file_name, _) => return Some(file_name),
        }
    }

    pub fn is_uploading(&self) -> bool {
        return matches!(self, UploadState::Uploading(_));
    }

    pub fn is_succeeded(&self) -> bool {
        return matches!(self, UploadState::Succeeded(_));
    }

    pub fn status_text(&self) -> String {
        match self {
            UploadState::Idle => {
                return "No document yet. Upload a PDF to start asking questions.".to_string();
            }
            UploadState::Uploading(file_name) => return format!("Uploading {file_name}..."),
            UploadState::Succeeded(file_name) => {
                return format!("Successfully uploaded {file_name}, processing document...");
            }
            UploadState::Failed(_, message) => return format!("Error: {message}"),
        }
    }
}

/// A local file picked for upload. Only the name is inspected until the
/// upload is actually sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentFile {
    pub path: path::PathBuf,
    pub file_name: String,
}

impl DocumentFile {
    pub fn new(path_str: &str) -> DocumentFile {
        let trimmed = path_str.trim();
        let path = path::PathBuf::from(trimmed);
        let file_name = path
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .unwrap_or_else(|| return trimmed.to_string());

        return DocumentFile { path, file_name };
    }

    /// Case-sensitive on purpose, `POLICY.PDF` is rejected.
    pub fn is_pdf(&self) -> bool {
        return self.file_name.ends_with(".pdf");
    }
}
