use tui_textarea::Input;

use super::Answer;
use super::ClientError;
use super::UploadReceipt;

#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<UploadReceipt, ClientError>,
}

#[derive(Debug)]
pub struct QueryOutcome {
    pub turn_id: u64,
    pub result: Result<Answer, ClientError>,
}

#[derive(Debug)]
pub enum Event {
    BackendQueryResponse(QueryOutcome),
    BackendUploadResponse(UploadOutcome),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
