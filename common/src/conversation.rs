//! フォローアップ会話の状態管理
//!
//! 状態遷移: Idle → Sending → (Answered | Failed) → Sending ...
//! - Sending 中は新しい送信を受け付けない
//! - 失敗時は固定のお詫び文を回答として追加し、次の送信まで Failed のまま
//! - 回答・失敗の反映は Sending 中のみ（質問のない回答は追加しない）

use crate::error::{Error, Result};
use crate::responder::CHAT_APOLOGY;
use crate::types::{ConversationTurn, Role};

/// 会話の送信状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Sending,
    Answered,
    Failed,
}

/// 1回の解析に紐づく会話（追記のみ）
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
    state: ChatState,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            state: ChatState::Idle,
        }
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// 送信可能か（送信中でなければ可）
    pub fn can_submit(&self) -> bool {
        self.state != ChatState::Sending
    }

    /// 質問を送信中として記録
    ///
    /// 戻り値は送信前までの履歴（リモート応答へ渡す用）
    pub fn submit(&mut self, message: &str) -> Result<Vec<ConversationTurn>> {
        if !self.can_submit() {
            return Err(Error::ChatBusy);
        }
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let history = self.turns.clone();
        self.turns.push(ConversationTurn::new(Role::User, message));
        self.state = ChatState::Sending;
        Ok(history)
    }

    /// 回答を受け取った
    pub fn resolve(&mut self, answer: impl Into<String>) -> Result<()> {
        self.ensure_sending()?;
        self.turns.push(ConversationTurn::new(Role::Assistant, answer));
        self.state = ChatState::Answered;
        Ok(())
    }

    /// 失敗: お詫び文を回答として追加し Failed にする
    pub fn fail(&mut self) -> Result<&'static str> {
        self.ensure_sending()?;
        self.turns.push(ConversationTurn::new(Role::Assistant, CHAT_APOLOGY));
        self.state = ChatState::Failed;
        Ok(CHAT_APOLOGY)
    }

    fn ensure_sending(&self) -> Result<()> {
        if self.state == ChatState::Sending {
            Ok(())
        } else {
            Err(Error::NotSending)
        }
    }
}
