//! Font weight resolution
//!
//! Weight is taken from the first source that provides one: an explicit
//! weight utility class, the element's default, the inline declaration,
//! the computed value, then 400.

use poster_model::{Diagnostics, SourceNode, TraceEvent};

pub const NORMAL_WEIGHT: u16 = 400;
pub const BOLD_WEIGHT: u16 = 700;

const BOLD_BY_DEFAULT: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "strong", "b", "th"];

/// Convert a CSS weight (`bold`, `600`, `semibold`) into a number in 1..=1000.
pub fn normalize_weight(value: &str) -> Option<u16> {
    let value = value.trim().to_ascii_lowercase();
    if let Ok(n) = value.parse::<f32>() {
        return (1.0..=1000.0).contains(&n).then(|| n.round() as u16);
    }
    let weight = match value.replace(['-', '_', ' '], "").as_str() {
        "thin" | "hairline" => 100,
        "extralight" | "ultralight" => 200,
        "light" | "lighter" => 300,
        "normal" | "regular" | "book" => 400,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" | "bolder" => 700,
        "extrabold" | "ultrabold" => 800,
        "black" | "heavy" => 900,
        _ => return None,
    };
    Some(weight)
}

/// Weight named by a utility class such as `font-bold` or `fw-600`
fn class_weight(node: &SourceNode) -> Option<u16> {
    node.classes.iter().find_map(|class| {
        if let Some(n) = class.strip_prefix("fw-") {
            return normalize_weight(n);
        }
        // `font-heading` and friends name families and normalize to None
        class.strip_prefix("font-").and_then(normalize_weight)
    })
}

fn element_weight(node: &SourceNode) -> Option<u16> {
    BOLD_BY_DEFAULT.contains(&node.tag.as_str()).then_some(BOLD_WEIGHT)
}

/// Resolve the numeric weight of `node` and report where it came from.
pub fn resolve_weight(node: &SourceNode, diagnostics: &Diagnostics) -> u16 {
    let (source, weight) = class_weight(node)
        .map(|w| ("class", w))
        .or_else(|| element_weight(node).map(|w| ("element", w)))
        .or_else(|| {
            node.inline
                .font_weight
                .as_deref()
                .and_then(normalize_weight)
                .map(|w| ("inline", w))
        })
        .or_else(|| {
            node.computed
                .font_weight
                .as_deref()
                .and_then(normalize_weight)
                .map(|w| ("computed", w))
        })
        .unwrap_or(("default", NORMAL_WEIGHT));

    diagnostics.emit(TraceEvent::FontWeight {
        node: node.id,
        source,
        weight,
    });
    weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use poster_model::{BoxRect, ComputedStyle, InlineStyle, NodeKind};

    fn node(tag: &str) -> SourceNode {
        SourceNode::new(tag, NodeKind::TextLeaf, BoxRect::new(0.0, 0.0, 10.0, 10.0)).with_text("x")
    }

    fn weight_of(node: &SourceNode) -> u16 {
        resolve_weight(node, &Diagnostics::new())
    }

    #[test]
    fn test_normalize_weight() {
        assert_eq!(normalize_weight("bold"), Some(700));
        assert_eq!(normalize_weight(" 600 "), Some(600));
        assert_eq!(normalize_weight("Semi-Bold"), Some(600));
        assert_eq!(normalize_weight("black"), Some(900));
        assert_eq!(normalize_weight("0"), None);
        assert_eq!(normalize_weight("heavyish"), None);
    }

    #[test]
    fn test_class_beats_element_default() {
        let n = node("h1").with_class("font-light");
        assert_eq!(weight_of(&n), 300);
        assert_eq!(weight_of(&node("p").with_class("fw-800")), 800);
        assert_eq!(weight_of(&node("p").with_class("font-600")), 600);
    }

    #[test]
    fn test_family_classes_are_not_weights() {
        assert_eq!(weight_of(&node("p").with_class("font-heading")), NORMAL_WEIGHT);
    }

    #[test]
    fn test_element_default_beats_declarations() {
        let n = node("strong").with_inline(InlineStyle {
            font_weight: Some("300".into()),
            ..Default::default()
        });
        assert_eq!(weight_of(&n), BOLD_WEIGHT);
    }

    #[test]
    fn test_inline_then_computed_then_default() {
        let computed = ComputedStyle {
            font_weight: Some("500".into()),
            ..Default::default()
        };
        let inline = InlineStyle {
            font_weight: Some("bold".into()),
            ..Default::default()
        };
        assert_eq!(weight_of(&node("p").with_computed(computed.clone()).with_inline(inline)), 700);
        assert_eq!(weight_of(&node("p").with_computed(computed)), 500);
        assert_eq!(weight_of(&node("p")), NORMAL_WEIGHT);
    }
}
