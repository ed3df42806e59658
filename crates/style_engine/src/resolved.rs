//! Effective style record produced for each node

use crate::Color;
use poster_model::Edges;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    pub fn from_css(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("center") | Some("-webkit-center") => Self::Center,
            Some("right") | Some("end") | Some("-webkit-right") => Self::End,
            _ => Self::Start,
        }
    }
}

/// Case transformation applied before layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    pub fn from_css(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("uppercase") => Self::Uppercase,
            Some("lowercase") => Self::Lowercase,
            Some("capitalize") => Self::Capitalize,
            _ => Self::None,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::None => text.to_string(),
            Self::Uppercase => text.to_uppercase(),
            Self::Lowercase => text.to_lowercase(),
            Self::Capitalize => text
                .split_word_bounds()
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) if first.is_alphabetic() => {
                            first.to_uppercase().chain(chars).collect::<String>()
                        }
                        _ => word.to_string(),
                    }
                })
                .collect(),
        }
    }
}

/// How text inside the node may break across lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WhiteSpace {
    /// Collapse whitespace and wrap at spaces
    #[default]
    Wrap,
    /// Never wrap; the text stays on one line
    NoWrap,
    /// Keep authored line breaks and spacing; never wrap
    Pre,
    /// Keep authored line breaks; wrap each segment
    PreWrap,
}

/// Alignment along a flex axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlexAlign {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    Stretch,
}

impl FlexAlign {
    pub fn from_css(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("center") | Some("safe center") => Self::Center,
            Some("flex-end") | Some("end") | Some("right") => Self::End,
            Some("space-between") | Some("space-around") | Some("space-evenly") => Self::SpaceBetween,
            Some("stretch") | Some("normal") => Self::Stretch,
            _ => Self::Start,
        }
    }
}

/// Layout mode of the node's own box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Block,
    Flex {
        /// True for `flex-direction: column`
        column: bool,
        /// `justify-content` (main axis)
        main: FlexAlign,
        /// `align-items` (cross axis)
        cross: FlexAlign,
    },
}

impl LayoutMode {
    /// Content is centered along the vertical axis
    pub fn centers_vertically(&self) -> bool {
        match self {
            Self::Block => false,
            Self::Flex { column: false, cross, .. } => *cross == FlexAlign::Center,
            Self::Flex { column: true, main, .. } => *main == FlexAlign::Center,
        }
    }

    /// Content is centered along the horizontal axis
    pub fn centers_horizontally(&self) -> bool {
        match self {
            Self::Block => false,
            Self::Flex { column: false, main, .. } => *main == FlexAlign::Center,
            Self::Flex { column: true, cross, .. } => *cross == FlexAlign::Center,
        }
    }
}

/// How an image fills its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectFit {
    #[default]
    Fill,
    Contain,
    Cover,
}

impl ObjectFit {
    pub fn from_css(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("contain") | Some("scale-down") => Self::Contain,
            Some("cover") => Self::Cover,
            _ => Self::Fill,
        }
    }
}

/// One visible border edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSide {
    /// Width in source pixels
    pub width: f32,
    pub color: Color,
}

/// The effective style of a single node.
///
/// Lengths are in source (on-screen) pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    /// Explicit line height; `None` means derive from font size
    pub line_height: Option<f32>,
    pub color: Color,
    pub text_align: TextAlign,
    pub text_transform: TextTransform,
    /// `None` when absent or fully transparent
    pub background: Option<Color>,
    /// `None` for sides that do not paint
    pub borders: Edges<Option<BorderSide>>,
    pub padding: Edges<f32>,
    pub margin: Edges<f32>,
    pub white_space: WhiteSpace,
    pub layout: LayoutMode,
    pub object_fit: ObjectFit,
}
