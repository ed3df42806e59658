//! Raw style inputs captured with each snapshot node
//!
//! Nothing here is interpreted: values are kept exactly as the host
//! reported them so the style resolver can apply its own precedence rules.

use crate::Edges;
use serde::{Deserialize, Serialize};

/// Declarations set directly on the element (its `style` attribute)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineStyle {
    /// Literal family name or a `var(--key)` reference
    #[serde(default)]
    pub font_family: Option<String>,
    /// Named (`bold`) or numeric (`600`) weight
    #[serde(default)]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub white_space: Option<String>,
}

/// Browser-computed values for one element, in on-screen CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub font_weight: Option<String>,
    /// Used line height in pixels; `None` for `normal`
    #[serde(default)]
    pub line_height: Option<f32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub text_align: Option<String>,
    #[serde(default)]
    pub text_transform: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub border_width: Edges<f32>,
    #[serde(default)]
    pub border_color: Edges<Option<String>>,
    #[serde(default)]
    pub border_style: Edges<Option<String>>,
    #[serde(default)]
    pub padding: Edges<f32>,
    #[serde(default)]
    pub margin: Edges<f32>,
    #[serde(default)]
    pub white_space: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub flex_direction: Option<String>,
    #[serde(default)]
    pub justify_content: Option<String>,
    #[serde(default)]
    pub align_items: Option<String>,
    #[serde(default)]
    pub list_style_type: Option<String>,
    #[serde(default)]
    pub object_fit: Option<String>,
}

fn default_font_size() -> f32 {
    16.0
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: default_font_size(),
            font_weight: None,
            line_height: None,
            color: None,
            text_align: None,
            text_transform: None,
            background_color: None,
            border_width: Edges::default(),
            border_color: Edges::default(),
            border_style: Edges::default(),
            padding: Edges::default(),
            margin: Edges::default(),
            white_space: None,
            display: None,
            flex_direction: None,
            justify_content: None,
            align_items: None,
            list_style_type: None,
            object_fit: None,
        }
    }
}

impl ComputedStyle {
    /// Builder-style setter used heavily by tests and fixtures
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_padding(mut self, padding: Edges<f32>) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_text_align(mut self, align: &str) -> Self {
        self.text_align = Some(align.to_string());
        self
    }

    pub fn with_background(mut self, color: &str) -> Self {
        self.background_color = Some(color.to_string());
        self
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(display.to_string());
        self
    }
}
