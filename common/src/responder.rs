//! ローカル応答（キーワード判定）
//!
//! チャット用のリモートエンドポイントが無い構成で使う。
//! 質問をキーワードで5分類し、保持している NormalizedResult から回答文を組み立てる。
//! バックエンドの生データは参照しない。

use crate::types::NormalizedResult;

/// リモート応答が失敗したときに利用者へ見せる固定文
pub const CHAT_APOLOGY: &str = "I'm sorry, I couldn't process your question right now. Please try again in a moment.";

/// 質問の分類（判定順 = 優先順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCategory {
    Recommendations,
    Severity,
    Professional,
    Observations,
    General,
}

/// 分類ごとのキーワード（上から順に判定し、最初に一致したものを採用）
const CATEGORY_KEYWORDS: &[(QuestionCategory, &[&str])] = &[
    (QuestionCategory::Recommendations, &["recommend", "what should", "how to"]),
    (QuestionCategory::Severity, &["severe", "serious", "bad"]),
    (QuestionCategory::Professional, &["doctor", "professional", "medical"]),
    (QuestionCategory::Observations, &["symptom", "observe", "characteristic"]),
];

/// 質問を分類する（大文字小文字を区別しない部分一致）
pub fn classify_question(question: &str) -> QuestionCategory {
    let lower = question.to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(QuestionCategory::General)
}

/// 質問に対するローカル回答を生成
///
/// 戻り値は常に空でない文字列。
pub fn respond_locally(question: &str, result: &NormalizedResult) -> String {
    let condition = &result.condition_name;
    let severity = result.severity;

    match classify_question(question) {
        QuestionCategory::Recommendations => {
            if result.recommendations.is_empty() {
                format!(
                    "I don't have specific recommendations for {}. Please consult a healthcare professional for personalized advice.",
                    condition
                )
            } else {
                format!(
                    "Here are the recommendations for {}:\n{}",
                    condition,
                    numbered(&result.recommendations)
                )
            }
        }
        QuestionCategory::Severity => {
            let guidance = if result.seek_professional_help {
                "Based on this, we recommend consulting a healthcare professional for proper diagnosis and treatment."
            } else {
                "This does not appear to require urgent care, but monitor the area and see a healthcare professional if it worsens or does not improve."
            };
            format!(
                "The analysis rated {} as {} severity. {}",
                condition, severity, guidance
            )
        }
        QuestionCategory::Professional => {
            if result.seek_professional_help {
                format!(
                    "Yes. Based on the analysis of {} ({} severity), we recommend consulting a healthcare professional for proper diagnosis and treatment.",
                    condition, severity
                )
            } else {
                format!(
                    "Professional care does not appear to be urgent for {} ({} severity). If the condition persists, spreads or gets worse, please see a healthcare professional.",
                    condition, severity
                )
            }
        }
        QuestionCategory::Observations => {
            if result.key_observations.is_empty() {
                format!("No specific observations were recorded for {}.", condition)
            } else {
                format!(
                    "Key observations from the analysis of {}:\n{}",
                    condition,
                    numbered(&result.key_observations)
                )
            }
        }
        QuestionCategory::General => {
            let mut answer = format!(
                "You asked: \"{}\". Based on the analysis, the condition appears to be {} with {} severity.",
                question.trim(),
                condition,
                severity
            );
            let top: Vec<String> = result.recommendations.iter().take(2).cloned().collect();
            if !top.is_empty() {
                answer.push_str("\nSome recommendations:\n");
                answer.push_str(&numbered(&top));
            }
            answer.push_str("\nFor personalized advice, please consult a healthcare professional.");
            answer
        }
    }
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}
