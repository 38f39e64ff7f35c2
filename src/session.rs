//! 解析セッション
//!
//! 1回の解析（アップロード → 解析 → 結果表示 → フォローアップ会話）の状態を持つ。
//! 新しい解析を始めるとセッションIDが変わり、古いリクエストの応答は
//! 後から届いても反映しない。

use crate::client::UploadReference;
use skin_scan_common::{Conversation, NormalizedResult};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// リクエスト発行時のセッションID（応答の反映可否の判定用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket(Uuid);

#[derive(Debug)]
pub struct AnalysisSession {
    id: Uuid,
    upload: Option<UploadReference>,
    result: Option<Arc<NormalizedResult>>,
    conversation: Conversation,
    analyzing: bool,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            upload: None,
            result: None,
            conversation: Conversation::new(),
            analyzing: false,
        }
    }

    /// 現在のセッションのチケット
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket(self.id)
    }

    /// 新しい解析を開始（前の結果・会話・アップロードは破棄）
    pub fn begin(&mut self) -> SessionTicket {
        self.id = Uuid::new_v4();
        self.upload = None;
        self.result = None;
        self.conversation = Conversation::new();
        self.analyzing = true;
        debug!(session = %self.id, "analysis session started");
        self.ticket()
    }

    /// 同じ画像で再解析（アップロード参照は維持）
    pub fn begin_retry(&mut self) -> SessionTicket {
        self.id = Uuid::new_v4();
        self.result = None;
        self.conversation = Conversation::new();
        self.analyzing = true;
        self.ticket()
    }

    pub fn is_current(&self, ticket: SessionTicket) -> bool {
        ticket.0 == self.id
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// アップロード結果を反映（古いチケットなら破棄して false）
    pub fn apply_upload(&mut self, ticket: SessionTicket, upload: UploadReference) -> bool {
        if !self.is_current(ticket) {
            warn!(stored = %upload.stored_name, "discarding upload from a previous session");
            return false;
        }
        self.upload = Some(upload);
        true
    }

    /// 解析結果を反映（古いチケットなら破棄して false）
    pub fn apply_result(&mut self, ticket: SessionTicket, result: NormalizedResult) -> bool {
        if !self.is_current(ticket) {
            warn!(condition = %result.condition_name, "discarding stale analysis result");
            return false;
        }
        self.result = Some(Arc::new(result));
        self.analyzing = false;
        true
    }

    /// 解析失敗を反映
    pub fn apply_failure(&mut self, ticket: SessionTicket) {
        if self.is_current(ticket) {
            self.analyzing = false;
        }
    }

    /// 利用者がリセットした
    pub fn reset(&mut self) {
        self.begin();
        self.analyzing = false;
    }

    pub fn last_upload(&self) -> Option<&UploadReference> {
        self.upload.as_ref()
    }

    pub fn result(&self) -> Option<Arc<NormalizedResult>> {
        self.result.clone()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skin_scan_common::{normalize, RawPrediction};
    use std::path::PathBuf;

    fn result(label: &str) -> NormalizedResult {
        normalize(RawPrediction {
            primary_condition: label.to_string(),
            confidence: 65.0,
            ..Default::default()
        })
    }

    fn upload(name: &str) -> UploadReference {
        UploadReference {
            stored_name: name.to_string(),
            local_path: PathBuf::from(name),
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = AnalysisSession::new();
        assert!(session.result().is_none());
        assert!(session.last_upload().is_none());
        assert!(!session.is_analyzing());
    }

    #[test]
    fn test_apply_with_current_ticket() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin();
        assert!(session.is_analyzing());

        assert!(session.apply_upload(ticket, upload("rash_1.jpg")));
        assert!(session.apply_result(ticket, result("eczema")));

        assert_eq!(session.last_upload().unwrap().stored_name, "rash_1.jpg");
        assert_eq!(session.result().unwrap().condition_name, "eczema");
        assert!(!session.is_analyzing());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut session = AnalysisSession::new();
        let old = session.begin();
        let new = session.begin();
        assert_ne!(old, new);

        assert!(session.apply_result(new, result("psoriasis")));
        assert!(!session.apply_result(old, result("acne")));

        assert_eq!(session.result().unwrap().condition_name, "psoriasis");
    }

    #[test]
    fn test_stale_upload_is_discarded() {
        let mut session = AnalysisSession::new();
        let old = session.begin();
        session.begin();

        assert!(!session.apply_upload(old, upload("old.jpg")));
        assert!(session.last_upload().is_none());
    }

    #[test]
    fn test_begin_clears_previous_state() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin();
        session.apply_upload(ticket, upload("a.jpg"));
        session.apply_result(ticket, result("eczema"));
        session.conversation_mut().submit("hello there").unwrap();

        session.begin();
        assert!(session.result().is_none());
        assert!(session.last_upload().is_none());
        assert!(session.conversation().is_empty());
    }

    #[test]
    fn test_retry_keeps_upload() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin();
        session.apply_upload(ticket, upload("a.jpg"));

        let retry = session.begin_retry();
        assert_ne!(ticket, retry);
        assert_eq!(session.last_upload().unwrap().stored_name, "a.jpg");
    }

    #[test]
    fn test_stale_failure_does_not_clear_analyzing() {
        let mut session = AnalysisSession::new();
        let old = session.begin();
        session.begin();

        session.apply_failure(old);
        assert!(session.is_analyzing());
    }

    #[test]
    fn test_reset() {
        let mut session = AnalysisSession::new();
        session.begin();
        session.reset();
        assert!(!session.is_analyzing());
        assert!(session.result().is_none());
    }
}
