use std::env;
use std::fs;
use std::path;
use std::process;

/// Smallest document the backend's PDF loader accepts. Only the bytes reach
/// the wire in tests, nothing parses them client side.
pub fn pdf_fixture() -> &'static [u8] {
    return br#"%PDF-1.4
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj
2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >> endobj
trailer << /Root 1 0 R >>
%%EOF
"#;
}

/// Writes `contents` to a file named `name` inside a directory unique to the
/// calling test, returning its path.
pub fn write_fixture(test_name: &str, name: &str, contents: &[u8]) -> path::PathBuf {
    let dir = env::temp_dir()
        .join("askmydocs-tests")
        .join(format!("{}-{test_name}", process::id()));
    fs::create_dir_all(&dir).unwrap();

    let file_path = dir.join(name);
    fs::write(&file_path, contents).unwrap();
    return file_path;
}

pub fn write_pdf_fixture(test_name: &str, name: &str) -> path::PathBuf {
    return write_fixture(test_name, name, pdf_fixture());
}

pub fn query_response_fixture() -> &'static str {
    return r#"{"answer":"Coverage includes X.","sources":[{"source":"policy.pdf","section":"3.2"}]}"#;
}

pub fn upload_response_fixture() -> &'static str {
    return r#"{"filename":"policy.pdf","chunks":42,"status":"success"}"#;
}
