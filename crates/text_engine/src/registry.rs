//! Font Registry
//!
//! Prepares every (family, weight) pair an export needs before painting
//! starts. A face that cannot be loaded never aborts the export: the
//! registry substitutes the fallback family, or leaves the request to the
//! estimating shaper, and records what happened in a
//! [`FontSubstitutionSummary`].

use crate::{FontKey, FontLoader, LoadedFace, TextError};
use poster_model::{Diagnostics, TraceEvent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Why a requested face was replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstitutionReason {
    /// The family is not installed or not registered
    NotInstalled,
    /// The font file exists but could not be read or parsed
    InvalidFontData,
    /// The loader matched a different family
    FamilyMismatch,
    /// Neither the family nor the fallback could be loaded
    NoUsableFace,
}

impl fmt::Display for SubstitutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotInstalled => "not installed",
            Self::InvalidFontData => "invalid font data",
            Self::FamilyMismatch => "matched a different family",
            Self::NoUsableFace => "no usable face",
        };
        f.write_str(text)
    }
}

impl From<&TextError> for SubstitutionReason {
    fn from(err: &TextError) -> Self {
        match err {
            TextError::FontNotFound(_) => Self::NotInstalled,
            _ => Self::InvalidFontData,
        }
    }
}

/// Record of one font substitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSubstitutionRecord {
    pub requested_font: String,
    /// Family actually used; `None` when text falls back to estimated metrics
    pub actual_font: Option<String>,
    pub requested_weight: u16,
    pub reason: SubstitutionReason,
    pub occurrence_count: usize,
}

/// Summary of all font substitutions made for one export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSubstitutionSummary {
    pub substitutions: Vec<FontSubstitutionRecord>,
    pub total_substituted: usize,
    pub total_found: usize,
}

impl FontSubstitutionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_substitution(
        &mut self,
        requested: &str,
        actual: Option<&str>,
        weight: u16,
        reason: SubstitutionReason,
    ) {
        for record in &mut self.substitutions {
            if record.requested_font == requested
                && record.actual_font.as_deref() == actual
                && record.requested_weight == weight
            {
                record.occurrence_count += 1;
                return;
            }
        }

        self.substitutions.push(FontSubstitutionRecord {
            requested_font: requested.to_string(),
            actual_font: actual.map(str::to_string),
            requested_weight: weight,
            reason,
            occurrence_count: 1,
        });
        self.total_substituted += 1;
    }

    pub fn add_found(&mut self) {
        self.total_found += 1;
    }

    pub fn has_substitutions(&self) -> bool {
        !self.substitutions.is_empty()
    }

    /// Get a human-readable summary
    pub fn summary_text(&self) -> String {
        if self.substitutions.is_empty() {
            return "All fonts found.".to_string();
        }

        let mut lines = vec![format!("{} font(s) substituted:", self.substitutions.len())];
        for record in &self.substitutions {
            lines.push(format!(
                "  {} {} -> {} ({})",
                record.requested_font,
                record.requested_weight,
                record.actual_font.as_deref().unwrap_or("estimated metrics"),
                record.reason
            ));
        }
        lines.join("\n")
    }
}

/// Faces prepared for one export
pub struct FontRegistry {
    loader: Arc<dyn FontLoader>,
    fallback: String,
    faces: HashMap<FontKey, Arc<LoadedFace>>,
    summary: FontSubstitutionSummary,
    diagnostics: Diagnostics,
}

impl FontRegistry {
    pub fn new(loader: Arc<dyn FontLoader>, fallback: impl Into<String>) -> Self {
        Self {
            loader,
            fallback: fallback.into(),
            faces: HashMap::new(),
            summary: FontSubstitutionSummary::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn fallback_family(&self) -> &str {
        &self.fallback
    }

    /// Load every requested face, substituting where needed.
    ///
    /// Requests are processed in sorted order so the outcome does not
    /// depend on tree order.
    pub fn prepare<I, S>(&mut self, requests: I)
    where
        I: IntoIterator<Item = (S, u16)>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<(String, u16)> = requests
            .into_iter()
            .map(|(family, weight)| (family.as_ref().trim().to_string(), weight))
            .collect();

        for (family, weight) in unique {
            let key = FontKey::new(&family, weight);
            if self.faces.contains_key(&key) {
                continue;
            }
            self.prepare_one(&family, weight, key);
        }
        tracing::debug!(
            faces = self.faces.len(),
            substituted = self.summary.total_substituted,
            "fonts prepared"
        );
    }

    fn prepare_one(&mut self, family: &str, weight: u16, key: FontKey) {
        let reason = match self.loader.load(family, weight) {
            Ok(face) if FontKey::new(&face.family, weight).family == key.family => {
                self.faces.insert(key, Arc::new(face));
                self.summary.add_found();
                return;
            }
            Ok(face) => {
                let actual = face.family.clone();
                self.faces.insert(key, Arc::new(face));
                self.record(family, Some(&actual), weight, SubstitutionReason::FamilyMismatch);
                return;
            }
            Err(err) => {
                tracing::debug!(family, weight, error = %err, "font load failed");
                SubstitutionReason::from(&err)
            }
        };

        match self.loader.load(&self.fallback, weight) {
            Ok(face) => {
                let actual = face.family.clone();
                self.faces.insert(key, Arc::new(face));
                self.record(family, Some(&actual), weight, reason);
            }
            Err(err) => {
                tracing::debug!(fallback = %self.fallback, weight, error = %err, "fallback font load failed");
                self.record(family, None, weight, SubstitutionReason::NoUsableFace);
            }
        }
    }

    fn record(&mut self, family: &str, actual: Option<&str>, weight: u16, reason: SubstitutionReason) {
        tracing::warn!(
            family,
            weight,
            substitute = actual.unwrap_or("estimated metrics"),
            %reason,
            "font substituted"
        );
        self.diagnostics.emit(TraceEvent::FontSubstituted {
            family: family.to_string(),
            weight,
            substitute: actual.unwrap_or("estimated metrics").to_string(),
            reason: reason.to_string(),
        });
        self.summary.add_substitution(family, actual, weight, reason);
    }

    /// Best prepared face for a request.
    ///
    /// Tries the exact key, then the nearest weight of the same family,
    /// then the nearest weight of the fallback family.
    pub fn face(&self, family: &str, weight: u16) -> Option<&Arc<LoadedFace>> {
        let key = FontKey::new(family, weight);
        self.faces
            .get(&key)
            .or_else(|| self.nearest(&key.family, weight))
            .or_else(|| self.nearest(&FontKey::new(&self.fallback, weight).family, weight))
    }

    fn nearest(&self, family: &str, weight: u16) -> Option<&Arc<LoadedFace>> {
        self.faces
            .iter()
            .filter(|(key, _)| key.family == family)
            .min_by_key(|(key, _)| (key.weight.abs_diff(weight), key.weight))
            .map(|(_, face)| face)
    }

    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    pub fn summary(&self) -> &FontSubstitutionSummary {
        &self.summary
    }
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("fallback", &self.fallback)
            .field("faces", &self.faces.len())
            .field("summary", &self.summary)
            .finish()
    }
}
