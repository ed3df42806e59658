//! Paint statistics gathered over one export

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintStats {
    pub nodes_painted: usize,
    pub backgrounds_painted: usize,
    pub borders_painted: usize,
    pub lines_laid_out: usize,
    /// Lines whose glyphs reached the surface
    pub lines_painted: usize,
    pub bullets_painted: usize,
    pub images_drawn: usize,
    /// Images replaced by the placeholder
    pub images_degraded: usize,
    /// Opaque cross-origin images drawn
    pub images_tainted: usize,
}
