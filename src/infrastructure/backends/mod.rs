pub mod askmydocs;

use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> BackendBox {
        return Box::<askmydocs::AskMyDocs>::default();
    }
}
