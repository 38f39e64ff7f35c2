//! 解析結果の正規化
//!
//! /analyze の生の推論結果（RawPrediction）から、画面表示用の
//! NormalizedResult を組み立てる。
//!
//! ## 処理フロー
//! 1. 確信度から重症度・受診推奨を決定（閾値は固定）
//! 2. 説明文から所見・推奨事項を抽出（parser）
//! 3. 抽出できなかった場合はフォールバック文を使用
//!
//! どんな入力でも失敗しない（全域関数）。

use crate::parser::{extract_section, Section};
use crate::types::{humanize_label, NormalizedResult, RawContext, RawPrediction, SeverityTier};

/// この確信度以上で Severe
pub const SEVERE_THRESHOLD: f64 = 80.0;
/// この確信度以上で Moderate
pub const MODERATE_THRESHOLD: f64 = 60.0;
/// この確信度以上で受診を推奨
pub const PROFESSIONAL_HELP_THRESHOLD: f64 = 70.0;

/// 所見・推奨事項の最大件数
pub const MAX_ITEMS: usize = 5;

pub const DISCLAIMER: &str = "This analysis is for informational purposes only and is not a substitute for professional medical advice, diagnosis, or treatment. Always consult with a qualified healthcare provider.";

/// 説明文が空のときの推奨事項
pub const GENERIC_RECOMMENDATIONS: [&str; 2] = [
    "Consult with a healthcare professional for proper diagnosis",
    "Follow medical advice for treatment",
];

const UNKNOWN_CONDITION: &str = "Unknown condition";

/// 確信度から重症度を決定
pub fn severity_for(confidence: f64) -> SeverityTier {
    if confidence >= SEVERE_THRESHOLD {
        SeverityTier::Severe
    } else if confidence >= MODERATE_THRESHOLD {
        SeverityTier::Moderate
    } else {
        SeverityTier::Mild
    }
}

/// 確信度から受診推奨を決定
pub fn needs_professional_help(confidence: f64) -> bool {
    confidence >= PROFESSIONAL_HELP_THRESHOLD
}

/// 生の推論結果を正規化する
///
/// # Arguments
/// * `raw` - /analyze の推論結果
///
/// # Returns
/// 正規化結果（常に成功）
pub fn normalize(raw: RawPrediction) -> NormalizedResult {
    let confidence = sanitize_confidence(raw.confidence);

    let condition_name = if raw.primary_condition.trim().is_empty() {
        UNKNOWN_CONDITION.to_string()
    } else {
        humanize_label(&raw.primary_condition)
    };

    let mut key_observations = extract_section(&raw.explanation, Section::Symptoms);
    if key_observations.is_empty() {
        key_observations = fallback_observations(&raw, &condition_name, confidence);
    }
    key_observations.truncate(MAX_ITEMS);

    let mut recommendations = extract_section(&raw.explanation, Section::Recommendations);
    if recommendations.is_empty() {
        recommendations = fallback_recommendations(&raw.explanation);
    }
    recommendations.truncate(MAX_ITEMS);

    NormalizedResult {
        condition_name,
        severity: severity_for(confidence),
        seek_professional_help: needs_professional_help(confidence),
        key_observations,
        recommendations,
        disclaimer: DISCLAIMER.to_string(),
        raw_context: RawContext {
            confidence,
            predictions: raw.predictions,
            explanation: raw.explanation,
            explanation_available: raw.explanation_available,
            simulated: raw.simulated,
        },
    }
}

/// NaN・範囲外を 0〜100 に収める
fn sanitize_confidence(confidence: f64) -> f64 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn fallback_observations(raw: &RawPrediction, condition_name: &str, confidence: f64) -> Vec<String> {
    let mut observations = vec![
        format!("Detected condition: {}", condition_name),
        format!("Confidence level: {}%", confidence),
    ];

    let alternates: Vec<String> = raw
        .alternates()
        .take(2)
        .map(|p| humanize_label(&p.condition))
        .collect();
    if !alternates.is_empty() {
        observations.push(format!("Alternative possibilities: {}", alternates.join(", ")));
    }

    observations
}

fn fallback_recommendations(explanation: &str) -> Vec<String> {
    let explanation = explanation.trim();
    if explanation.is_empty() {
        GENERIC_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
    } else {
        vec![explanation.to_string()]
    }
}
