//! 説明文パーサー
//!
//! バックエンドの自然文の説明（ai_explanation）から
//! 「Symptoms」「Recommendations」見出しのセクションを抜き出し、
//! 箇条書きの項目に分解する。
//!
//! モデルの文章フォーマット次第で結果が変わるベストエフォートの処理。
//! 何も取れなかった場合の扱いは normalizer 側のフォールバックが担う。

use lazy_static::lazy_static;
use regex::Regex;

/// これより短い項目はノイズとして捨てる（文字数）
pub const MIN_ITEM_CHARS: usize = 10;

lazy_static! {
    /// 行頭の見出し（構成は heading_pattern を参照）
    static ref HEADING_RE: Regex = Regex::new(&heading_pattern()).unwrap();
    /// 空行（段落区切り）
    static ref BLANK_LINE_RE: Regex = Regex::new(r"\n[ \t]*\n").unwrap();
    /// 行内の箇条書き記号: " - foo - bar", " 1. foo 2. bar"
    static ref INLINE_MARKER_RE: Regex = Regex::new(r"[ \t][-*][ \t]|[ \t]\d+[.)][ \t]").unwrap();
    /// 項目先頭の記号
    static ref LEADING_MARKER_RE: Regex = Regex::new(r"^\s*(?:[-*•]+|\d+[.)])\s*").unwrap();
}

/// 見出し判定の正規表現を組み立てる
///
/// - 箇条書き・番号付きの行は、記号の直後が見出し語のときだけ見出しとみなす
///   （"- Monitor your symptoms" は推奨事項の1項目）
/// - 区切りの ": / -" は直後が空白か行末のときだけ（"symptom-relief" は見出しではない）
/// - 記号なしの行は "Symptoms include ..." のような導入文も見出しとして扱う
fn heading_pattern() -> String {
    let kw = r"(symptoms?|recommendations?)\b";
    let sep = r"(?:[ \t]+[a-z]+){0,3}[ \t*_]*[:\-–—][*_]*(?:[ \t]+|$)";
    let eol = r"[ \t*_]*$";
    let intro = r"[ \t]+(?:may[ \t]+)?(?:include[sd]?|involve[sd]?)\b[ \t]*:?";

    let branches = [
        // "- Symptoms:", "2. Recommendations"
        format!(r"(?:[-*•+]|\d+[.)])[ \t]+[*_]*{kw}(?:{sep}|{eol})"),
        // "## Key Symptoms", "> Recommendations"
        format!(r"[>#]+[ \t]*[*_]*(?:[a-z]+[ \t]+){{0,2}}{kw}(?:{sep}|{eol}|{intro})"),
        // "Symptoms:", "**Recommendations:**", "Symptoms include ..."
        format!(r"[*_]*{kw}(?:{sep}|{eol}|{intro})"),
        // "Key symptoms:", "**Key Symptoms**"
        format!(r"[*_]*(?:[a-z]+[ \t]+){{1,2}}{kw}(?:{sep}|[*_]+[ \t]*$|{intro})"),
    ];

    let alternatives: Vec<String> = branches.iter().map(|b| format!("(?:{})", b)).collect();
    format!(r"(?im)^[ \t]*(?:{})", alternatives.join("|"))
}

/// 見出しの一致から見出し語を取り出す（どの分岐で一致したかは問わない）
fn heading_word<'t>(cap: &regex::Captures<'t>) -> Option<&'t str> {
    cap.iter().skip(1).flatten().next().map(|m| m.as_str())
}

/// 抽出対象のセクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Symptoms,
    Recommendations,
}

impl Section {
    fn matches(&self, heading_word: &str) -> bool {
        let word = heading_word.to_ascii_lowercase();
        match self {
            Section::Symptoms => word.starts_with("symptom"),
            Section::Recommendations => word.starts_with("recommendation"),
        }
    }
}

/// 説明文から指定セクションの項目を抽出
///
/// セクションの範囲は見出しの直後から、次の空行・次の見出し・文末のいずれか早い方まで。
/// 見出しが無い場合は空のVecを返す。
///
/// # Examples
/// ```
/// use skin_scan_common::parser::{extract_section, Section};
///
/// let text = "Symptoms:\n- Red, raised patches on the elbows\n\nRecommendations: keep the skin moisturized daily";
/// assert_eq!(extract_section(text, Section::Symptoms), vec!["Red, raised patches on the elbows"]);
/// assert_eq!(extract_section(text, Section::Recommendations), vec!["keep the skin moisturized daily"]);
/// ```
pub fn extract_section(text: &str, section: Section) -> Vec<String> {
    let text = text.replace("\r\n", "\n");

    match section_block(&text, section) {
        Some(block) => split_items(block),
        None => Vec::new(),
    }
}

/// セクション本文（未分割）を返す
fn section_block(text: &str, section: Section) -> Option<&str> {
    let heading = HEADING_RE
        .captures_iter(text)
        .find(|cap| heading_word(cap).is_some_and(|word| section.matches(word)))?;
    let heading_end = heading.get(0)?.end();

    // 見出し直後の空白・改行は読み飛ばす
    let rest = &text[heading_end..];
    let start = heading_end + (rest.len() - rest.trim_start().len());

    let mut end = text.len();
    if let Some(next) = HEADING_RE.find_at(text, start) {
        end = end.min(next.start());
    }
    if let Some(blank) = BLANK_LINE_RE.find_at(text, start) {
        end = end.min(blank.start());
    }

    Some(&text[start..end.max(start)])
}

/// ブロックを項目に分解（改行・•・行内の -,*,番号で区切る）
pub fn split_items(block: &str) -> Vec<String> {
    block
        .lines()
        .flat_map(|line| line.split('•'))
        .flat_map(|piece| INLINE_MARKER_RE.split(piece).collect::<Vec<_>>())
        .map(clean_item)
        .filter(|item| item.chars().count() >= MIN_ITEM_CHARS)
        .collect()
}

fn clean_item(raw: &str) -> String {
    let stripped = LEADING_MARKER_RE.replace(raw, "");
    stripped
        .replace("**", "")
        .replace("__", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // 見出し検出テスト
    // =============================================

    #[test]
    fn test_extract_plain_headings() {
        let text = "Symptoms:\n- Itchy red patches on the inner elbow\n- Dry, flaky skin around the patches\n\nRecommendations:\n1. Apply a fragrance-free moisturizer\n2. Avoid hot showers and harsh soaps";

        let symptoms = extract_section(text, Section::Symptoms);
        assert_eq!(
            symptoms,
            vec!["Itchy red patches on the inner elbow", "Dry, flaky skin around the patches"]
        );

        let recs = extract_section(text, Section::Recommendations);
        assert_eq!(
            recs,
            vec!["Apply a fragrance-free moisturizer", "Avoid hot showers and harsh soaps"]
        );
    }

    #[test]
    fn test_extract_case_insensitive_singular() {
        let text = "SYMPTOM - scaly plaques on the scalp";
        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["scaly plaques on the scalp"]
        );
    }

    #[test]
    fn test_extract_markdown_headings() {
        let text = "## Key Symptoms\n* Ring-shaped rash with a clear center\n\n**Recommendations:**\n• Keep the area clean and dry • Use an antifungal cream for two weeks";

        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["Ring-shaped rash with a clear center"]
        );
        assert_eq!(
            extract_section(text, Section::Recommendations),
            vec!["Keep the area clean and dry", "Use an antifungal cream for two weeks"]
        );
    }

    #[test]
    fn test_block_ends_at_next_heading_without_blank_line() {
        let text = "Symptoms: small fluid-filled blisters\nRecommendations: do not scratch the blisters";

        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["small fluid-filled blisters"]
        );
        assert_eq!(
            extract_section(text, Section::Recommendations),
            vec!["do not scratch the blisters"]
        );
    }

    #[test]
    fn test_block_ends_at_blank_line() {
        let text = "Symptoms: redness along the jawline\n\nThis paragraph is unrelated prose text.";
        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["redness along the jawline"]
        );
    }

    #[test]
    fn test_word_in_prose_is_not_heading() {
        let text = "The symptoms you describe are consistent with mild eczema.";
        assert!(extract_section(text, Section::Symptoms).is_empty());
    }

    #[test]
    fn test_no_heading_returns_empty() {
        assert!(extract_section("", Section::Symptoms).is_empty());
        assert!(extract_section("Just a general explanation.", Section::Recommendations).is_empty());
    }

    #[test]
    fn test_heading_followed_by_blank_line() {
        let text = "Recommendations:\n\n- Wear loose cotton clothing daily";
        assert_eq!(
            extract_section(text, Section::Recommendations),
            vec!["Wear loose cotton clothing daily"]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Symptoms:\r\n- Peeling skin between the toes\r\n\r\nOther text";
        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["Peeling skin between the toes"]
        );
    }

    #[test]
    fn test_list_item_mentioning_symptoms_is_not_heading() {
        let text = "Recommendations:\n- Keep the area clean and dry\n- Monitor your symptoms\n- See a doctor if it spreads quickly";

        assert_eq!(
            extract_section(text, Section::Recommendations),
            vec![
                "Keep the area clean and dry",
                "Monitor your symptoms",
                "See a doctor if it spreads quickly"
            ]
        );
        assert!(extract_section(text, Section::Symptoms).is_empty());
    }

    #[test]
    fn test_numbered_item_mentioning_symptoms_is_not_heading() {
        let text = "Recommendations:\n1. Track your symptoms in a diary\n2. Monitor your symptoms\n3. Avoid scratching the affected area";

        assert_eq!(extract_section(text, Section::Recommendations).len(), 3);
        assert!(extract_section(text, Section::Symptoms).is_empty());
    }

    #[test]
    fn test_hyphenated_word_is_not_heading() {
        let text = "Recommendations:\n- Use symptom-relief cream twice daily\n- Avoid hot showers and harsh soaps";

        assert_eq!(
            extract_section(text, Section::Recommendations),
            vec!["Use symptom-relief cream twice daily", "Avoid hot showers and harsh soaps"]
        );
        assert!(extract_section(text, Section::Symptoms).is_empty());
    }

    #[test]
    fn test_bullet_heading_is_still_heading() {
        let text = "- Symptoms:\n  redness around the hairline\n\n- Recommendations: wash with a gentle shampoo";

        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["redness around the hairline"]
        );
        assert_eq!(
            extract_section(text, Section::Recommendations),
            vec!["wash with a gentle shampoo"]
        );
    }

    #[test]
    fn test_heading_without_separator_introducing_list() {
        let text = "Symptoms include itching and redness on the elbows";
        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["itching and redness on the elbows"]
        );
    }

    #[test]
    fn test_bold_heading_with_prose_words() {
        let text = "**Key Symptoms**\nSmall red bumps around hair follicles";
        assert_eq!(
            extract_section(text, Section::Symptoms),
            vec!["Small red bumps around hair follicles"]
        );
    }

    // =============================================
    // 項目分解テスト
    // =============================================

    #[test]
    fn test_split_items_drops_short_noise() {
        let items = split_items("- ok\n- itching\n- persistent itching at night");
        assert_eq!(items, vec!["persistent itching at night"]);
    }

    #[test]
    fn test_split_items_keeps_exactly_ten_chars() {
        // "0123456789" はちょうど10文字
        let items = split_items("- 0123456789\n- 012345678");
        assert_eq!(items, vec!["0123456789"]);
    }

    #[test]
    fn test_split_items_numbered_inline() {
        let items = split_items("1. Wash gently with lukewarm water 2. Pat the skin dry afterwards");
        assert_eq!(
            items,
            vec!["Wash gently with lukewarm water", "Pat the skin dry afterwards"]
        );
    }

    #[test]
    fn test_split_items_keeps_hyphenated_words() {
        let items = split_items("- Use a fragrance-free, non-comedogenic cleanser");
        assert_eq!(items, vec!["Use a fragrance-free, non-comedogenic cleanser"]);
    }

    #[test]
    fn test_split_items_keeps_decimals() {
        let items = split_items("- Apply 0.5% hydrocortisone cream sparingly");
        assert_eq!(items, vec!["Apply 0.5% hydrocortisone cream sparingly"]);
    }
}
