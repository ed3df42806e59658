//! TextLayoutEngine
//!
//! Greedy word wrapping plus line placement inside a node's content box:
//!
//! 1. Split text into words (authored breaks kept for `pre` and `pre-wrap`)
//! 2. Fill lines greedily with measured widths; long words overflow
//! 3. Place baselines for block flow or flex centering
//! 4. Place each line horizontally by alignment

use poster_model::{BoxRect, Edges};
use serde::{Deserialize, Serialize};
use style_engine::{LayoutMode, TextAlign, WhiteSpace};
use text_engine::{FontSpec, TextMeasurer};

/// Tunable constants of text layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextLayoutConfig {
    /// Texts shorter than this many characters never wrap
    pub short_text_threshold: usize,
    /// Per-line baseline shift for flex-centered text, in em
    pub baseline_correction_em: f32,
    /// Line height for `line-height: normal` when no face metrics are
    /// available, in em
    pub line_height_factor: f32,
}

impl Default for TextLayoutConfig {
    fn default() -> Self {
        Self {
            short_text_threshold: 10,
            baseline_correction_em: 0.35,
            line_height_factor: 1.2,
        }
    }
}

/// Everything needed to lay out one node's text, in destination pixels
#[derive(Debug, Clone)]
pub struct TextRequest<'a> {
    pub text: &'a str,
    pub font: FontSpec,
    /// Border box of the node
    pub frame: BoxRect,
    pub padding: Edges<f32>,
    /// Line height; `None` is `line-height: normal`
    pub line_height: Option<f32>,
    pub align: TextAlign,
    pub layout: LayoutMode,
    pub white_space: WhiteSpace,
    /// Space reserved in front of the text for a list bullet
    pub bullet_offset: f32,
}

/// One placed line
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Left edge of the line's ink start
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
}

impl PlacedLine {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Result of laying out one text block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    pub lines: Vec<PlacedLine>,
    pub line_height: f32,
}

/// Wraps and positions text runs
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayoutEngine {
    config: TextLayoutConfig,
}

impl TextLayoutEngine {
    pub fn new(config: TextLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TextLayoutConfig {
        &self.config
    }

    /// Resolved line height in pixels.
    ///
    /// `line-height: normal` is the face's ascent + descent + line gap;
    /// estimated text uses the configured factor instead.
    pub fn line_height(&self, explicit: Option<f32>, font: &FontSpec, measurer: &dyn TextMeasurer) -> f32 {
        explicit.unwrap_or_else(|| {
            measurer
                .line_metrics(font)
                .map(|metrics| metrics.height())
                .filter(|height| *height > 0.0)
                .unwrap_or(font.size * self.config.line_height_factor)
        })
    }

    /// Break `text` into lines no wider than `max_width` where possible
    pub fn wrap(
        &self,
        text: &str,
        max_width: f32,
        font: &FontSpec,
        white_space: WhiteSpace,
        measurer: &dyn TextMeasurer,
    ) -> Vec<String> {
        match white_space {
            WhiteSpace::Pre if text.is_empty() => Vec::new(),
            WhiteSpace::Pre => text
                .split('\n')
                .map(|segment| segment.trim_end_matches('\r').to_string())
                .collect(),
            WhiteSpace::PreWrap => text
                .split('\n')
                .flat_map(|segment| {
                    let lines = self.wrap_collapsed(segment, max_width, font, measurer);
                    if lines.is_empty() {
                        vec![String::new()]
                    } else {
                        lines
                    }
                })
                .collect(),
            WhiteSpace::NoWrap => {
                let line = collapse(text);
                if line.is_empty() {
                    Vec::new()
                } else {
                    vec![line]
                }
            }
            WhiteSpace::Wrap => self.wrap_collapsed(text, max_width, font, measurer),
        }
    }

    fn wrap_collapsed(
        &self,
        text: &str,
        max_width: f32,
        font: &FontSpec,
        measurer: &dyn TextMeasurer,
    ) -> Vec<String> {
        let collapsed = collapse(text);
        if collapsed.is_empty() {
            return Vec::new();
        }
        if collapsed.chars().count() < self.config.short_text_threshold || !collapsed.contains(' ') {
            return vec![collapsed];
        }

        let mut lines = Vec::new();
        let mut current = String::new();
        for word in collapsed.split(' ') {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if measurer.measure(&candidate, font) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Wrap and place the text of one node
    pub fn layout(&self, request: &TextRequest<'_>, measurer: &dyn TextMeasurer) -> TextLayout {
        let frame = &request.frame;
        let padding = &request.padding;
        let content = frame.inset(padding);
        let available = (content.width - request.bullet_offset).max(0.0);

        let texts = self.wrap(request.text, available, &request.font, request.white_space, measurer);
        let line_height = self.line_height(request.line_height, &request.font, measurer);
        if texts.is_empty() {
            return TextLayout {
                lines: Vec::new(),
                line_height,
            };
        }

        let align = if request.layout.centers_horizontally() {
            TextAlign::Center
        } else {
            request.align
        };

        let n = texts.len() as f32;
        let centered_top = content.y + (content.height - n * line_height) / 2.0;
        let correction = request.font.size * self.config.baseline_correction_em;

        let lines = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let i = i as f32;
                let baseline = if request.layout.centers_vertically() {
                    centered_top + i * line_height + line_height / 2.0 + correction
                } else {
                    content.y + (i + 1.0) * line_height
                };
                let width = measurer.measure(&text, &request.font);
                let x = match align {
                    TextAlign::Start => content.x + request.bullet_offset,
                    TextAlign::Center => content.center_x() - width / 2.0,
                    TextAlign::End => frame.right() - padding.right - width,
                };
                PlacedLine { text, x, baseline, width }
            })
            .collect();

        TextLayout { lines, line_height }
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use style_engine::FlexAlign;
    use text_engine::LineMetrics;

    /// Every character is `advance` em wide
    struct MonoMeasurer {
        advance: f32,
    }

    impl TextMeasurer for MonoMeasurer {
        fn measure(&self, text: &str, font: &FontSpec) -> f32 {
            text.chars().count() as f32 * self.advance * font.size
        }

        fn line_metrics(&self, font: &FontSpec) -> Option<LineMetrics> {
            Some(LineMetrics {
                ascent: font.size * 0.8,
                descent: font.size * 0.2,
                line_gap: font.size * 0.1,
            })
        }
    }

    const MONO: MonoMeasurer = MonoMeasurer { advance: 0.5 };

    fn font() -> FontSpec {
        FontSpec::new("Mono", 400, 10.0)
    }

    fn request(text: &str, frame: BoxRect) -> TextRequest<'_> {
        TextRequest {
            text,
            font: font(),
            frame,
            padding: Edges::default(),
            line_height: Some(12.0),
            align: TextAlign::Start,
            layout: LayoutMode::Block,
            white_space: WhiteSpace::Wrap,
            bullet_offset: 0.0,
        }
    }

    #[test]
    fn test_greedy_wrap() {
        let engine = TextLayoutEngine::default();
        // 5px per char: "alpha beta" = 50, "gamma delta" = 55
        let lines = engine.wrap("alpha beta gamma delta", 52.0, &font(), WhiteSpace::Wrap, &MONO);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn test_long_word_overflows_unsplit() {
        let engine = TextLayoutEngine::default();
        let lines = engine.wrap("a supercalifragilistic word", 30.0, &font(), WhiteSpace::Wrap, &MONO);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "word"]);
        let single = engine.wrap("supercalifragilistic", 10.0, &font(), WhiteSpace::Wrap, &MONO);
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_short_text_never_wraps() {
        let engine = TextLayoutEngine::default();
        assert_eq!(engine.wrap("Fig. 1 a", 5.0, &font(), WhiteSpace::Wrap, &MONO).len(), 1);
        let strict = TextLayoutEngine::new(TextLayoutConfig {
            short_text_threshold: 0,
            ..Default::default()
        });
        assert_eq!(strict.wrap("Fig. 1 a", 5.0, &font(), WhiteSpace::Wrap, &MONO).len(), 3);
    }

    /// Estimates widths only, like a measurer without a loaded face
    struct EstimatingMeasurer;

    impl TextMeasurer for EstimatingMeasurer {
        fn measure(&self, text: &str, font: &FontSpec) -> f32 {
            MONO.measure(text, font)
        }

        fn line_metrics(&self, _font: &FontSpec) -> Option<LineMetrics> {
            None
        }
    }

    #[test]
    fn test_pre_wrap_keeps_breaks_and_wraps() {
        let engine = TextLayoutEngine::default();
        let lines = engine.wrap("first\n\nthird line", 500.0, &font(), WhiteSpace::PreWrap, &MONO);
        assert_eq!(lines, vec!["first", "", "third line"]);
        // 5px per char: "alpha beta gamma" does not fit in 60px
        let wrapped = engine.wrap("intro\nalpha beta gamma", 60.0, &font(), WhiteSpace::PreWrap, &MONO);
        assert_eq!(wrapped, vec!["intro", "alpha beta", "gamma"]);
    }

    #[test]
    fn test_pre_keeps_breaks_without_wrapping() {
        let engine = TextLayoutEngine::default();
        let lines = engine.wrap("intro\nalpha  beta gamma delta\r\n", 20.0, &font(), WhiteSpace::Pre, &MONO);
        assert_eq!(lines, vec!["intro", "alpha  beta gamma delta", ""]);
    }

    #[test]
    fn test_normal_line_height_from_face_metrics() {
        let engine = TextLayoutEngine::default();
        let mut req = request("alpha beta gamma", BoxRect::new(0.0, 0.0, 70.0, 100.0));
        req.line_height = None;
        // ascent 8 + descent 2 + gap 1
        let layout = engine.layout(&req, &MONO);
        assert!((layout.line_height - 11.0).abs() < 1e-4);
        assert!((layout.lines[0].baseline - 11.0).abs() < 1e-4);

        let estimated = engine.layout(&req, &EstimatingMeasurer);
        assert!((estimated.line_height - 12.0).abs() < 1e-4);
        // an explicit line height wins over both
        assert_eq!(engine.line_height(Some(30.0), &font(), &MONO), 30.0);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let engine = TextLayoutEngine::default();
        assert!(engine.wrap("   ", 10.0, &font(), WhiteSpace::Wrap, &MONO).is_empty());
        let layout = engine.layout(&request("", BoxRect::new(0.0, 0.0, 100.0, 100.0)), &MONO);
        assert!(layout.lines.is_empty());
    }

    #[test]
    fn test_block_baselines() {
        let engine = TextLayoutEngine::default();
        let mut req = request("alpha beta gamma", BoxRect::new(10.0, 20.0, 70.0, 100.0));
        req.padding = Edges::uniform(5.0);
        let layout = engine.layout(&req, &MONO);
        let baselines: Vec<f32> = layout.lines.iter().map(|l| l.baseline).collect();
        assert_eq!(baselines, vec![37.0, 49.0]);
        assert!(layout.lines.iter().all(|l| l.x == 15.0));
    }

    #[test]
    fn test_flex_centered_block() {
        let engine = TextLayoutEngine::default();
        let mut req = request("alpha beta gamma", BoxRect::new(0.0, 0.0, 60.0, 100.0));
        req.layout = LayoutMode::Flex {
            column: false,
            main: FlexAlign::Center,
            cross: FlexAlign::Center,
        };
        let layout = engine.layout(&req, &MONO);
        assert_eq!(layout.lines.len(), 2);
        // block of 24px centered in 100px starts at 38
        assert_eq!(layout.lines[0].baseline, 38.0 + 6.0 + 3.5);
        assert_eq!(layout.lines[1].baseline, 38.0 + 12.0 + 6.0 + 3.5);
        // flex centering overrides start alignment
        assert!(layout.lines.iter().all(|l| (l.center_x() - 30.0).abs() < 1e-4));
    }

    #[test]
    fn test_end_alignment_and_bullet_offset() {
        let engine = TextLayoutEngine::default();
        let mut req = request("alpha beta", BoxRect::new(0.0, 0.0, 200.0, 40.0));
        req.padding = Edges { top: 0.0, right: 8.0, bottom: 0.0, left: 4.0 };
        req.align = TextAlign::End;
        let line = &engine.layout(&req, &MONO).lines[0];
        assert_eq!(line.x + line.width, 192.0);

        req.align = TextAlign::Start;
        req.bullet_offset = 10.0;
        assert_eq!(engine.layout(&req, &MONO).lines[0].x, 14.0);
    }

    #[test]
    fn test_hello_world_centered() {
        let engine = TextLayoutEngine::default();
        // "Hello World" = 55px, each word = 25px
        let mut req = request("Hello World", BoxRect::new(100.0, 50.0, 40.0, 60.0));
        req.align = TextAlign::Center;
        let layout = engine.layout(&req, &MONO);
        assert_eq!(layout.lines.len(), 2);
        for line in &layout.lines {
            assert!((line.center_x() - 120.0).abs() < 1e-4);
        }
    }

    proptest! {
        #[test]
        fn prop_wrapped_lines_fit(
            words in prop::collection::vec("[a-z]{1,8}", 2..20),
            width in 45.0f32..300.0,
        ) {
            let text = words.join(" ");
            prop_assume!(text.chars().count() >= 10);
            prop_assume!(MONO.measure(&text, &font()) > width);
            let engine = TextLayoutEngine::default();
            let lines = engine.wrap(&text, width, &font(), WhiteSpace::Wrap, &MONO);
            prop_assert!(lines.len() >= 2);
            for line in &lines {
                prop_assert!(MONO.measure(line, &font()) <= width);
            }
            prop_assert_eq!(lines.join(" "), text);
        }

        #[test]
        fn prop_no_wrap_is_one_line(text in "[a-z]{1,8}( [a-z]{1,8}){0,12}", width in 0.0f32..100.0) {
            let engine = TextLayoutEngine::default();
            let lines = engine.wrap(&text, width, &font(), WhiteSpace::NoWrap, &MONO);
            prop_assert_eq!(lines.len(), 1);
        }
    }
}
