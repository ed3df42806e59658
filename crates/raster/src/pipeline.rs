//! PaintPipeline
//!
//! Paints one node in box-model order:
//!
//! 1. background
//! 2. the four border sides
//! 3. image content (or its placeholder)
//! 4. the bullet of a leaf list item
//! 5. the node's own text
//!
//! Children are painted afterwards by the walker, so a parent never
//! overdraws them.

use crate::compositor::paint_placeholder;
use crate::{ImageCompositor, ImageOutcome, PaintStats, RasterSurface, Result, TextPainter};
use layout_engine::{
    BulletKind, ListContext, ListContextResolver, ScaleContext, TextLayout, TextLayoutEngine,
    TextRequest,
};
use poster_model::{BoxRect, Edges, NodeId, NodeKind, PosterTree, SourceNode};
use style_engine::{ResolvedStyle, StyleResolver};
use text_engine::FontSpec;

/// Per-export painter shared by every node
pub struct PaintPipeline<'a> {
    tree: &'a PosterTree,
    resolver: &'a StyleResolver,
    compositor: &'a ImageCompositor,
    scale: ScaleContext,
    layout: TextLayoutEngine,
    lists: ListContextResolver,
    text: TextPainter<'a>,
    stats: PaintStats,
}

impl<'a> PaintPipeline<'a> {
    pub fn new(
        tree: &'a PosterTree,
        resolver: &'a StyleResolver,
        compositor: &'a ImageCompositor,
        text: TextPainter<'a>,
        scale: ScaleContext,
    ) -> Self {
        Self {
            tree,
            resolver,
            compositor,
            scale,
            layout: TextLayoutEngine::default(),
            lists: ListContextResolver::default(),
            text,
            stats: PaintStats::default(),
        }
    }

    pub fn with_text_layout(mut self, layout: TextLayoutEngine) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_list_resolver(mut self, lists: ListContextResolver) -> Self {
        self.lists = lists;
        self
    }

    pub fn tree(&self) -> &'a PosterTree {
        self.tree
    }

    pub fn stats(&self) -> &PaintStats {
        &self.stats
    }

    pub fn into_stats(self) -> PaintStats {
        self.stats
    }

    /// Paint `id` itself (not its children)
    pub async fn paint_node(&mut self, surface: &mut RasterSurface, id: NodeId) -> Result<()> {
        let tree = self.tree;
        let node = tree.node(id)?;
        let style = self.resolver.resolve(node);
        let frame = self.scale.map_rect(&node.rect);

        self.paint_background(surface, &frame, &style);
        self.paint_borders(surface, &frame, &style);

        if node.kind == NodeKind::Image {
            self.paint_image(surface, node, &frame, &style).await;
        }

        if !node.has_children() {
            let list = self.lists.resolve(tree, id, style.font_size);
            let font = FontSpec::new(
                style.font_family.clone(),
                style.font_weight,
                style.font_size * self.scale.font_scale(),
            );
            let padding = self.scale_padding(&style.padding);
            let layout = self.layout_text(node, &style, &font, &frame, &padding, &list);

            if list.is_list_item {
                let baseline = layout
                    .as_ref()
                    .and_then(|l| l.lines.first())
                    .map(|line| line.baseline)
                    .unwrap_or_else(|| frame.y + padding.top + self.line_height(&style, &font));
                self.paint_bullet(surface, &list, &font, frame.x + padding.left, baseline, &style);
            }

            if let Some(layout) = layout {
                self.paint_lines(surface, &layout, &font, &style);
            }
        }

        self.stats.nodes_painted += 1;
        Ok(())
    }

    fn line_height(&self, style: &ResolvedStyle, font: &FontSpec) -> f32 {
        let explicit = style.line_height.map(|lh| lh * self.scale.font_scale());
        self.layout.line_height(explicit, font, &self.text.measurer())
    }

    /// Horizontal edges scale with x, vertical edges with y
    fn scale_padding(&self, padding: &Edges<f32>) -> Edges<f32> {
        Edges {
            top: padding.top * self.scale.scale_y,
            right: padding.right * self.scale.scale_x,
            bottom: padding.bottom * self.scale.scale_y,
            left: padding.left * self.scale.scale_x,
        }
    }

    fn paint_background(&mut self, surface: &mut RasterSurface, frame: &BoxRect, style: &ResolvedStyle) {
        if let Some(color) = style.background {
            surface.fill_rect(frame, color);
            self.stats.backgrounds_painted += 1;
        }
    }

    fn paint_borders(&mut self, surface: &mut RasterSurface, frame: &BoxRect, style: &ResolvedStyle) {
        let borders = &style.borders;
        let (sx, sy) = (self.scale.scale_x, self.scale.scale_y);
        let sides = [
            borders.top.map(|b| {
                let h = b.width * sy;
                (BoxRect::new(frame.x, frame.y, frame.width, h), b.color)
            }),
            borders.right.map(|b| {
                let w = b.width * sx;
                (BoxRect::new(frame.right() - w, frame.y, w, frame.height), b.color)
            }),
            borders.bottom.map(|b| {
                let h = b.width * sy;
                (BoxRect::new(frame.x, frame.bottom() - h, frame.width, h), b.color)
            }),
            borders.left.map(|b| {
                let w = b.width * sx;
                (BoxRect::new(frame.x, frame.y, w, frame.height), b.color)
            }),
        ];
        for (rect, color) in sides.into_iter().flatten() {
            surface.fill_rect(&rect, color);
            self.stats.borders_painted += 1;
        }
    }

    async fn paint_image(
        &mut self,
        surface: &mut RasterSurface,
        node: &SourceNode,
        frame: &BoxRect,
        style: &ResolvedStyle,
    ) {
        let outcome = match node.image_src.as_deref().map(str::trim) {
            Some(src) if !src.is_empty() => {
                self.compositor
                    .composite(surface, node.id, src, frame, style.object_fit)
                    .await
            }
            _ => ImageOutcome::Placeholder {
                reason: "image has no source".to_string(),
            },
        };

        match outcome {
            ImageOutcome::Drawn => self.stats.images_drawn += 1,
            ImageOutcome::Tainted => self.stats.images_tainted += 1,
            ImageOutcome::Placeholder { .. } => {
                paint_placeholder(surface, frame, self.scale.font_scale(), &mut self.text);
                self.stats.images_degraded += 1;
            }
        }
    }

    fn layout_text(
        &self,
        node: &SourceNode,
        style: &ResolvedStyle,
        font: &FontSpec,
        frame: &BoxRect,
        padding: &Edges<f32>,
        list: &ListContext,
    ) -> Option<TextLayout> {
        let text = style.text_transform.apply(node.text_content()?);
        let request = TextRequest {
            text: &text,
            font: font.clone(),
            frame: *frame,
            padding: *padding,
            line_height: style.line_height.map(|lh| lh * self.scale.font_scale()),
            align: style.text_align,
            layout: style.layout,
            white_space: style.white_space,
            bullet_offset: list.reserved_width * self.scale.font_scale(),
        };
        Some(self.layout.layout(&request, &self.text.measurer()))
    }

    fn paint_bullet(
        &mut self,
        surface: &mut RasterSurface,
        list: &ListContext,
        font: &FontSpec,
        x: f32,
        baseline: f32,
        style: &ResolvedStyle,
    ) {
        let drawn = match list.bullet_kind {
            BulletKind::Disc => {
                let radius = font.size * 0.18;
                surface.fill_circle(x + font.size * 0.35, baseline - font.size * 0.3, radius, style.color);
                true
            }
            BulletKind::Decimal => match list.bullet_text() {
                Some(label) => self.text.draw_line(surface, &label, font, x, baseline, style.color),
                None => false,
            },
        };
        if drawn {
            self.stats.bullets_painted += 1;
        }
    }

    fn paint_lines(&mut self, surface: &mut RasterSurface, layout: &TextLayout, font: &FontSpec, style: &ResolvedStyle) {
        for line in &layout.lines {
            self.stats.lines_laid_out += 1;
            if self
                .text
                .draw_line(surface, &line.text, font, line.x, line.baseline, style.color)
            {
                self.stats.lines_painted += 1;
            }
        }
    }
}

impl std::fmt::Debug for PaintPipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintPipeline")
            .field("scale", &self.scale)
            .field("stats", &self.stats)
            .finish()
    }
}
