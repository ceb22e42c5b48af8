#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeType {
    Normal,
    Error,
}

/// One-line feedback shown under the upload status. Notices never enter the
/// conversation transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    ntype: NoticeType,
}

impl Notice {
    pub fn new(text: &str) -> Notice {
        return Notice {
            text: text.to_string(),
            ntype: NoticeType::Normal,
        };
    }

    pub fn new_with_type(ntype: NoticeType, text: &str) -> Notice {
        return Notice {
            text: text.to_string(),
            ntype,
        };
    }

    pub fn notice_type(&self) -> NoticeType {
        return self.ntype;
    }
}
