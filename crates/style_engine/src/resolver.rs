//! StyleResolver - one node in, one ResolvedStyle out

use crate::font_chain::{resolve_family, FontContext};
use crate::weight::resolve_weight;
use crate::{
    BorderSide, Color, FlexAlign, LayoutMode, ObjectFit, ResolvedStyle, TextAlign, TextTransform,
    WhiteSpace,
};
use poster_model::{Diagnostics, Edges, SourceNode, TraceEvent};

/// Classes that pin a node's width and therefore forbid reflow
const NO_WRAP_CLASSES: &[&str] = &["no-wrap", "nowrap", "fixed-width", "text-nowrap"];

/// Computes effective styles for snapshot nodes.
///
/// The resolver is stateless between calls; the same node always yields
/// the same [`ResolvedStyle`].
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    fonts: FontContext,
    diagnostics: Diagnostics,
}

impl StyleResolver {
    pub fn new(fonts: FontContext, diagnostics: Diagnostics) -> Self {
        Self { fonts, diagnostics }
    }

    pub fn font_context(&self) -> &FontContext {
        &self.fonts
    }

    pub fn resolve(&self, node: &SourceNode) -> ResolvedStyle {
        let computed = &node.computed;
        let (font_family, step) = resolve_family(node, &self.fonts, &self.diagnostics);
        let font_weight = resolve_weight(node, &self.diagnostics);
        tracing::debug!(node = %node.id, family = %font_family, step, weight = font_weight, "resolved font");

        let color = match computed.color.as_deref() {
            Some(value) => self.parse_color(node, value).unwrap_or(Color::BLACK),
            None => Color::BLACK,
        };

        let background = computed
            .background_color
            .as_deref()
            .and_then(|value| self.parse_color(node, value))
            .filter(|c| !c.is_transparent());

        ResolvedStyle {
            font_family,
            font_size: computed.font_size.max(0.0),
            font_weight,
            line_height: computed.line_height.filter(|lh| *lh > 0.0),
            color,
            text_align: TextAlign::from_css(computed.text_align.as_deref()),
            text_transform: TextTransform::from_css(computed.text_transform.as_deref()),
            background,
            borders: self.resolve_borders(node, color),
            padding: computed.padding.map(|v| v.max(0.0)),
            margin: computed.margin,
            white_space: whitespace_mode(node),
            layout: layout_mode(node),
            object_fit: ObjectFit::from_css(computed.object_fit.as_deref()),
        }
    }

    fn parse_color(&self, node: &SourceNode, value: &str) -> Option<Color> {
        match Color::parse(value) {
            Ok(color) => Some(color),
            Err(_) => {
                self.diagnostics.emit(TraceEvent::UnparsedColor {
                    node: node.id,
                    value: value.to_string(),
                });
                None
            }
        }
    }

    fn resolve_borders(&self, node: &SourceNode, current_color: Color) -> Edges<Option<BorderSide>> {
        let computed = &node.computed;
        let side = |width: f32, style: &Option<String>, color: &Option<String>| {
            let hidden = matches!(
                style.as_deref().map(str::trim),
                Some("none") | Some("hidden")
            );
            if width <= 0.0 || hidden {
                return None;
            }
            let color = match color.as_deref() {
                Some(value) if !value.trim().eq_ignore_ascii_case("currentcolor") => {
                    self.parse_color(node, value)?
                }
                _ => current_color,
            };
            (!color.is_transparent()).then_some(BorderSide { width, color })
        };
        let (w, s, c) = (&computed.border_width, &computed.border_style, &computed.border_color);
        Edges {
            top: side(w.top, &s.top, &c.top),
            right: side(w.right, &s.right, &c.right),
            bottom: side(w.bottom, &s.bottom, &c.bottom),
            left: side(w.left, &s.left, &c.left),
        }
    }
}

fn whitespace_mode(node: &SourceNode) -> WhiteSpace {
    if NO_WRAP_CLASSES.iter().any(|c| node.has_class(c)) || node.attribute("data-nowrap").is_some() {
        return WhiteSpace::NoWrap;
    }
    let value = node
        .inline
        .white_space
        .as_deref()
        .or(node.computed.white_space.as_deref())
        .map(|v| v.trim().to_ascii_lowercase());
    match value.as_deref() {
        Some("nowrap") => WhiteSpace::NoWrap,
        Some("pre") => WhiteSpace::Pre,
        Some("pre-wrap") | Some("pre-line") | Some("break-spaces") => WhiteSpace::PreWrap,
        _ => WhiteSpace::Wrap,
    }
}

fn layout_mode(node: &SourceNode) -> LayoutMode {
    let computed = &node.computed;
    match computed.display.as_deref().map(str::trim) {
        Some("flex") | Some("inline-flex") => LayoutMode::Flex {
            column: computed
                .flex_direction
                .as_deref()
                .is_some_and(|d| d.trim().starts_with("column")),
            main: FlexAlign::from_css(computed.justify_content.as_deref()),
            cross: FlexAlign::from_css(computed.align_items.as_deref()),
        },
        _ => LayoutMode::Block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poster_model::{BoxRect, ComputedStyle, InlineStyle, NodeKind};
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn leaf(text: &str) -> SourceNode {
        SourceNode::new("p", NodeKind::TextLeaf, BoxRect::new(0.0, 0.0, 200.0, 40.0)).with_text(text)
    }

    #[test]
    fn test_defaults() {
        let style = StyleResolver::default().resolve(&leaf("Some body text for the poster."));
        assert_eq!(style.font_size, 16.0);
        assert_eq!(style.font_weight, 400);
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(style.background, None);
        assert_eq!(style.white_space, WhiteSpace::Wrap);
        assert_eq!(style.layout, LayoutMode::Block);
        assert!(style.borders.top.is_none() && style.borders.left.is_none());
    }

    #[test]
    fn test_colors_and_backgrounds() {
        let computed = ComputedStyle {
            color: Some("rgb(10, 20, 30)".into()),
            background_color: Some("rgba(0, 0, 0, 0)".into()),
            ..Default::default()
        };
        let style = StyleResolver::default().resolve(&leaf("x").with_computed(computed));
        assert_eq!(style.color, Color::rgb(10, 20, 30));
        assert_eq!(style.background, None);

        let computed = ComputedStyle::default().with_background("#336699");
        let style = StyleResolver::default().resolve(&leaf("x").with_computed(computed));
        assert_eq!(style.background, Some(Color::rgb(0x33, 0x66, 0x99)));
    }

    #[test]
    fn test_unparsed_color_is_reported() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let diagnostics = {
            let events = events.clone();
            Diagnostics::with_callback(move |e| {
                if let TraceEvent::UnparsedColor { value, .. } = e {
                    events.lock().unwrap().push(value.clone());
                }
            })
        };
        let computed = ComputedStyle {
            color: Some("color(display-p3 1 0 0)".into()),
            ..Default::default()
        };
        let style = StyleResolver::new(FontContext::default(), diagnostics)
            .resolve(&leaf("x").with_computed(computed));
        assert_eq!(style.color, Color::BLACK);
        assert_eq!(*events.lock().unwrap(), vec!["color(display-p3 1 0 0)".to_string()]);
    }

    #[test]
    fn test_independent_borders() {
        let mut computed = ComputedStyle {
            color: Some("#ff0000".into()),
            ..Default::default()
        };
        computed.border_width = Edges { top: 2.0, right: 0.0, bottom: 4.0, left: 1.0 };
        computed.border_style = Edges {
            top: Some("solid".into()),
            right: Some("solid".into()),
            bottom: Some("dashed".into()),
            left: Some("none".into()),
        };
        computed.border_color.bottom = Some("#0000ff".into());

        let style = StyleResolver::default().resolve(&leaf("x").with_computed(computed));
        assert_eq!(
            style.borders.top,
            Some(BorderSide { width: 2.0, color: Color::rgb(255, 0, 0) })
        );
        assert_eq!(style.borders.right, None);
        assert_eq!(
            style.borders.bottom,
            Some(BorderSide { width: 4.0, color: Color::rgb(0, 0, 255) })
        );
        assert_eq!(style.borders.left, None);
    }

    #[test]
    fn test_no_wrap_signals() {
        let resolver = StyleResolver::default();
        assert_eq!(resolver.resolve(&leaf("x").with_class("fixed-width")).white_space, WhiteSpace::NoWrap);
        assert_eq!(
            resolver.resolve(&leaf("x").with_attribute("data-nowrap", "")).white_space,
            WhiteSpace::NoWrap
        );
        let inline = InlineStyle {
            white_space: Some("nowrap".into()),
            ..Default::default()
        };
        assert_eq!(resolver.resolve(&leaf("x").with_inline(inline)).white_space, WhiteSpace::NoWrap);
        let computed = ComputedStyle {
            white_space: Some("pre-wrap".into()),
            ..Default::default()
        };
        assert_eq!(resolver.resolve(&leaf("x").with_computed(computed)).white_space, WhiteSpace::PreWrap);
    }

    #[test]
    fn test_pre_does_not_wrap() {
        let resolver = StyleResolver::default();
        let white_space = |value: &str| {
            let computed = ComputedStyle {
                white_space: Some(value.into()),
                ..Default::default()
            };
            resolver.resolve(&leaf("x").with_computed(computed)).white_space
        };
        assert_eq!(white_space("pre"), WhiteSpace::Pre);
        assert_eq!(white_space(" PRE "), WhiteSpace::Pre);
        assert_eq!(white_space("pre-line"), WhiteSpace::PreWrap);
        assert_eq!(white_space("break-spaces"), WhiteSpace::PreWrap);
        assert_eq!(white_space("normal"), WhiteSpace::Wrap);
    }

    #[test]
    fn test_flex_layout() {
        let computed = ComputedStyle {
            display: Some("flex".into()),
            justify_content: Some("center".into()),
            align_items: Some("center".into()),
            ..Default::default()
        };
        let style = StyleResolver::default().resolve(&leaf("x").with_computed(computed));
        assert!(style.layout.centers_vertically());
        assert!(style.layout.centers_horizontally());
    }

    proptest! {
        #[test]
        fn prop_resolution_is_deterministic(
            text in "[a-zA-Z0-9 .]{0,60}",
            size in 1.0f32..200.0,
            weight in prop::sample::select(vec!["normal", "bold", "300", "900", "bogus"]),
            class in prop::sample::select(vec!["", "title", "font-heading", "caption", "fw-600"]),
        ) {
            let mut node = leaf(&text).with_computed(ComputedStyle {
                font_weight: Some(weight.to_string()),
                ..ComputedStyle::default().with_font_size(size)
            });
            if !class.is_empty() {
                node = node.with_class(class);
            }
            let resolver = StyleResolver::default();
            prop_assert_eq!(resolver.resolve(&node), resolver.resolve(&node));
        }
    }
}
