//! フォローアップ質問への応答
//!
//! 設定で方式を切り替える:
//! - Remote: バックエンドの /chat に転送
//! - Local : 解析結果からキーワード判定で回答（skin_scan_common::respond_locally）
//!
//! リモートの失敗は利用者には固定のお詫び文として見せ、詳細はログにのみ出す。

use crate::client::BackendClient;
use crate::config::ChatStrategy;
use crate::error::Result;
use skin_scan_common::{respond_locally, Conversation, ConversationTurn, NormalizedResult};
use tracing::error;

#[derive(Debug, Clone)]
pub enum Responder {
    Remote(BackendClient),
    Local,
}

impl Responder {
    pub fn new(strategy: ChatStrategy, client: &BackendClient) -> Self {
        match strategy {
            ChatStrategy::Remote => Responder::Remote(client.clone()),
            ChatStrategy::Local => Responder::Local,
        }
    }

    pub fn strategy(&self) -> ChatStrategy {
        match self {
            Responder::Remote(_) => ChatStrategy::Remote,
            Responder::Local => ChatStrategy::Local,
        }
    }

    /// 回答を生成（失敗はそのまま返す）
    pub async fn answer(
        &self,
        question: &str,
        history: &[ConversationTurn],
        result: &NormalizedResult,
    ) -> Result<String> {
        match self {
            Responder::Remote(client) => client.chat(question, history, result).await,
            Responder::Local => Ok(respond_locally(question, result)),
        }
    }

    /// 会話を進めながら回答する
    ///
    /// 送信中の再送信・空の質問はエラー。回答の失敗はお詫び文に置き換えて Ok を返す。
    pub async fn ask(
        &self,
        conversation: &mut Conversation,
        question: &str,
        result: &NormalizedResult,
    ) -> Result<String> {
        let history = conversation.submit(question)?;
        let question = question.trim();

        match self.answer(question, &history, result).await {
            Ok(answer) => {
                conversation.resolve(answer.clone())?;
                Ok(answer)
            }
            Err(e) => {
                error!(error = %e, "follow-up answer failed");
                Ok(conversation.fail()?.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skin_scan_common::{normalize, ChatState, RawPrediction, Role, CHAT_APOLOGY};

    fn result() -> NormalizedResult {
        normalize(RawPrediction {
            primary_condition: "contact_dermatitis".to_string(),
            confidence: 74.0,
            explanation: "Recommendations:\n- Avoid the suspected irritant\n- Use a gentle moisturizer".to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_local_ask_records_turns() {
        let responder = Responder::Local;
        let mut conversation = Conversation::new();

        let answer = responder
            .ask(&mut conversation, "What do you recommend?", &result())
            .await
            .unwrap();

        assert!(answer.contains("1. Avoid the suspected irritant"));
        assert!(answer.contains("2. Use a gentle moisturizer"));
        assert_eq!(conversation.state(), ChatState::Answered);
        assert_eq!(conversation.turns().len(), 2);
        assert_eq!(conversation.turns()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_remote_failure_substitutes_apology() {
        // 接続できないポートへ送る
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        let responder = Responder::new(ChatStrategy::Remote, &client);
        let mut conversation = Conversation::new();

        let answer = responder
            .ask(&mut conversation, "Is it contagious?", &result())
            .await
            .unwrap();

        assert_eq!(answer, CHAT_APOLOGY);
        assert_eq!(conversation.state(), ChatState::Failed);
        assert!(conversation.can_submit());
    }

    #[tokio::test]
    async fn test_ask_while_sending_is_rejected() {
        let responder = Responder::Local;
        let mut conversation = Conversation::new();
        conversation.submit("pending question").unwrap();

        let err = responder
            .ask(&mut conversation, "another question", &result())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ClientError::Common(skin_scan_common::Error::ChatBusy)
        ));
    }

    #[test]
    fn test_strategy_selection() {
        let client = BackendClient::new("http://localhost:5000").unwrap();
        assert_eq!(Responder::new(ChatStrategy::Remote, &client).strategy(), ChatStrategy::Remote);
        assert_eq!(Responder::new(ChatStrategy::Local, &client).strategy(), ChatStrategy::Local);
    }
}
