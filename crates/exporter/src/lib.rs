//! Poster print export
//!
//! Entry point of the print export: rasterizes the subtree under a target
//! element onto an A0 surface at print resolution and wraps it in a
//! one-page PDF.
//!
//! The flow of [`Exporter::export_document`]:
//!
//! 1. locate the target and check it has area
//! 2. map the source box onto the surface
//! 3. prepare every font the subtree resolves to, then settle
//! 4. walk the subtree painting each node
//! 5. read back and encode the surface

mod config;
mod encoder;
mod error;

pub use config::*;
pub use encoder::*;
pub use error::*;

use layout_engine::{ScaleMapper, TextLayoutEngine};
use poster_model::{Diagnostics, NodeId, Orientation, PageSize, PosterTree};
use raster::{
    HttpImageFetcher, ImageCompositor, ImageFetcher, PaintPipeline, PaintStats, SurfaceFactory,
    TextPainter, TreeWalker,
};
use serde::Serialize;
use std::sync::Arc;
use style_engine::StyleResolver;
use text_engine::{FontLoader, FontRegistry, FontSubstitutionSummary, SystemFontLoader};

/// Statistics gathered during one export
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub paint: PaintStats,
    pub fonts: FontSubstitutionSummary,
}

/// A successfully produced print document
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub orientation: Orientation,
    pub page_size: PageSize,
    /// Surface size in pixels
    pub pixel_size: (u32, u32),
    pub stats: ExportStats,
}

/// Runs print exports with a fixed configuration
pub struct Exporter {
    settings: ExportSettings,
    fonts: Arc<dyn FontLoader>,
    images: Arc<dyn ImageFetcher>,
    diagnostics: Diagnostics,
}

impl Exporter {
    /// Exporter using installed system fonts and HTTP image fetching
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            fonts: Arc::new(SystemFontLoader::new()),
            images: Arc::new(HttpImageFetcher::new()),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_font_loader(mut self, loader: Arc<dyn FontLoader>) -> Self {
        self.fonts = loader;
        self
    }

    pub fn with_image_fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.images = fetcher;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Export the subtree under the element with id `target_element_id`
    pub async fn export_document(
        &self,
        tree: &PosterTree,
        target_element_id: &str,
        orientation: Orientation,
    ) -> Result<ExportedDocument> {
        let target = tree
            .find_element(target_element_id)
            .map_err(|e| ExportError::Precondition(e.to_string()))?;
        let source = tree
            .node(target)
            .map_err(|e| ExportError::Precondition(e.to_string()))?
            .rect;

        let factory = SurfaceFactory::new(self.settings.dpi);
        let (width, height) = factory.dimensions(orientation);
        let scale = ScaleMapper::new(self.diagnostics.clone())
            .map(&source, width, height)
            .map_err(|e| ExportError::Precondition(e.to_string()))?;
        tracing::info!(
            target = target_element_id,
            %orientation,
            width,
            height,
            scale_x = scale.scale_x,
            scale_y = scale.scale_y,
            "Starting print export"
        );

        let resolver = StyleResolver::new(self.settings.font_context(), self.diagnostics.clone());
        let registry = self.prepare_fonts(tree, target, &resolver);
        tokio::time::sleep(self.settings.settle_delay()).await;

        let mut surface = factory
            .create(orientation)
            .map_err(|e| ExportError::Encoding(e.to_string()))?;

        let mut compositor = ImageCompositor::new(Arc::clone(&self.images))
            .with_timeout(self.settings.image_timeout())
            .with_mode(self.settings.cross_origin_mode)
            .with_diagnostics(self.diagnostics.clone());
        if let Some(origin) = self.settings.origin_url() {
            compositor = compositor.with_document_origin(origin);
        }

        let mut pipeline = PaintPipeline::new(
            tree,
            &resolver,
            &compositor,
            TextPainter::new(&registry),
            scale,
        )
        .with_text_layout(TextLayoutEngine::new(self.settings.text_layout()));
        TreeWalker::new()
            .walk(&mut pipeline, &mut surface, target)
            .await
            .map_err(|e| ExportError::Encoding(e.to_string()))?;

        let stats = ExportStats {
            paint: pipeline.into_stats(),
            fonts: registry.summary().clone(),
        };
        if stats.fonts.has_substitutions() {
            tracing::warn!("{}", stats.fonts.summary_text());
        }

        let bytes = DocumentEncoder::new(self.settings.pdf.clone()).encode(surface, orientation)?;
        tracing::info!(
            bytes = bytes.len(),
            nodes = stats.paint.nodes_painted,
            images_degraded = stats.paint.images_degraded,
            "Print export finished"
        );

        Ok(ExportedDocument {
            bytes,
            orientation,
            page_size: PageSize::a0(orientation),
            pixel_size: (width, height),
            stats,
        })
    }

    /// Load every (family, weight) the subtree resolves to
    fn prepare_fonts(&self, tree: &PosterTree, target: NodeId, resolver: &StyleResolver) -> FontRegistry {
        let requests: Vec<(String, u16)> = tree
            .descendants(target)
            .into_iter()
            .filter_map(|id| tree.get(id))
            .map(|node| {
                let style = resolver.resolve(node);
                (style.font_family, style.font_weight)
            })
            .collect();

        let mut registry = FontRegistry::new(Arc::clone(&self.fonts), self.settings.fallback_font.clone())
            .with_diagnostics(self.diagnostics.clone());
        registry.prepare(requests);
        registry
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("settings", &self.settings)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}
