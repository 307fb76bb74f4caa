//! Recording notice sink.

use std::sync::Mutex;

use sharedrop_core::traits::{Notice, NoticeLevel, NoticeSink};

/// A [`NoticeSink`] that keeps every notice it receives, in order.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Messages of every notice received so far.
    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }

    /// Messages of the notices at `level`.
    pub fn messages_at(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    /// Number of notices received.
    pub fn len(&self) -> usize {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no notice has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every notice.
    pub fn clear(&self) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
