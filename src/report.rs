//! 解析結果のテキスト表示

use skin_scan_common::NormalizedResult;
use std::fmt::Write;

pub fn render(result: &NormalizedResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Identified condition: {}", result.condition_name);
    let _ = writeln!(out, "Severity level:       {}", result.severity);
    let _ = writeln!(out, "Confidence:           {}%", result.raw_context.confidence);

    if result.seek_professional_help {
        let _ = writeln!(
            out,
            "\nMedical attention recommended: consult a healthcare professional for proper diagnosis and treatment."
        );
    } else {
        let _ = writeln!(
            out,
            "\nNo urgent care indicated: monitor the area and consult a professional if it worsens."
        );
    }

    let _ = writeln!(out, "\nKey observations:");
    for item in &result.key_observations {
        let _ = writeln!(out, "  - {}", item);
    }

    let _ = writeln!(out, "\nRecommendations:");
    for (i, item) in result.recommendations.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, item);
    }

    if result.raw_context.simulated {
        let _ = writeln!(out, "\n(Note: the server returned simulated results, not a real model inference.)");
    }

    let _ = write!(out, "\n{}", result.disclaimer);
    out
}
