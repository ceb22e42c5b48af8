use super::DocumentFile;
use super::Question;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    BackendAbort(),
    BackendQuery(Question),
    BackendUpload(DocumentFile),
}
