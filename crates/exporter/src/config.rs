//! Export settings
//!
//! Every empirical constant of the export pipeline lives here so it can be
//! tuned from a JSON file without a rebuild.

use layout_engine::TextLayoutConfig;
use print_pdf::PdfOptions;
use raster::{CrossOriginMode, PRINT_DPI};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use style_engine::{FontContext, FontRoles};
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// Raster density of the A0 surface
    pub dpi: u32,
    pub image_timeout_ms: u64,
    /// Pause between font preparation and painting
    pub settle_delay_ms: u64,
    pub short_text_threshold: usize,
    pub baseline_correction_em: f32,
    pub line_height_factor: f32,
    pub heading_font: String,
    pub body_font: String,
    pub fallback_font: String,
    /// Texts up to this length are treated as captions by font resolution
    pub caption_max_chars: usize,
    /// `--key` (without dashes) to family
    pub font_variables: HashMap<String, String>,
    /// Base URL of the poster document; decides which images are same-origin
    pub document_origin: Option<String>,
    pub cross_origin_mode: CrossOriginMode,
    pub pdf: PdfOptions,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let layout = TextLayoutConfig::default();
        let fonts = FontContext::default();
        Self {
            dpi: PRINT_DPI,
            image_timeout_ms: 3000,
            settle_delay_ms: 50,
            short_text_threshold: layout.short_text_threshold,
            baseline_correction_em: layout.baseline_correction_em,
            line_height_factor: layout.line_height_factor,
            heading_font: fonts.roles.heading,
            body_font: fonts.roles.body,
            fallback_font: fonts.fallback,
            caption_max_chars: fonts.caption_max_chars,
            font_variables: HashMap::new(),
            document_origin: None,
            cross_origin_mode: CrossOriginMode::default(),
            pdf: PdfOptions::default(),
        }
    }
}

impl ExportSettings {
    /// Load settings from a JSON file.
    ///
    /// A missing file yields defaults; so does a file that fails to parse,
    /// after logging a warning.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };
        Ok(Self::from_json(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            Self::default()
        }))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn text_layout(&self) -> TextLayoutConfig {
        TextLayoutConfig {
            short_text_threshold: self.short_text_threshold,
            baseline_correction_em: self.baseline_correction_em,
            line_height_factor: self.line_height_factor,
        }
    }

    pub fn font_context(&self) -> FontContext {
        FontContext {
            variables: self.font_variables.clone(),
            roles: FontRoles {
                heading: self.heading_font.clone(),
                body: self.body_font.clone(),
            },
            fallback: self.fallback_font.clone(),
            caption_max_chars: self.caption_max_chars,
        }
    }

    /// Parsed document origin; an unparseable value is ignored with a warning
    pub fn origin_url(&self) -> Option<Url> {
        let origin = self.document_origin.as_deref()?;
        match Url::parse(origin) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(origin, error = %e, "Ignoring invalid document origin");
                None
            }
        }
    }
}
