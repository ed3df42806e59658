//! TreeWalker
//!
//! Depth-first pre-order traversal driving the paint pipeline. Each node
//! is painted fully (including any image wait) before its first child,
//! and siblings are visited in source order.

use crate::{PaintPipeline, RasterSurface, Result};
use poster_model::NodeId;

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalker;

impl TreeWalker {
    pub fn new() -> Self {
        Self
    }

    /// Paint the subtree rooted at `root`; returns the visit order
    pub async fn walk(
        &self,
        pipeline: &mut PaintPipeline<'_>,
        surface: &mut RasterSurface,
        root: NodeId,
    ) -> Result<Vec<NodeId>> {
        let tree = pipeline.tree();
        let mut visited = Vec::with_capacity(tree.len());
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            pipeline.paint_node(surface, id).await?;
            visited.push(id);
            stack.extend(tree.node(id)?.children.iter().rev().copied());
        }

        tracing::debug!(nodes = visited.len(), "tree painted");
        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FetchFuture, FetchRequest, ImageCompositor, ImageFetcher, TextPainter};
    use layout_engine::ScaleMapper;
    use poster_model::{BoxRect, ComputedStyle, Edges, NodeKind, PosterTree, SourceNode};
    use std::sync::Arc;
    use style_engine::StyleResolver;
    use crate::test_fonts::{fixture_registry, ink_bounds};
    use text_engine::{FontRegistry, MemoryFontLoader};

    struct NoNetwork;

    impl ImageFetcher for NoNetwork {
        fn fetch<'a>(&'a self, request: &'a FetchRequest) -> FetchFuture<'a> {
            let url = request.url.to_string();
            Box::pin(async move { Err(crate::RasterError::Fetch(url)) })
        }
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> BoxRect {
        BoxRect::new(x, y, w, h)
    }

    /// root(red bg) > [panel(blue bg, 2px green top border) > [text], list > [a, b], image]
    fn poster() -> PosterTree {
        let mut tree = PosterTree::new(
            SourceNode::new("div", NodeKind::Container, rect(0.0, 0.0, 100.0, 100.0))
                .with_computed(ComputedStyle::default().with_background("#ff0000")),
        );
        let root = tree.root();
        let mut panel_style = ComputedStyle::default().with_background("#0000ff");
        panel_style.border_width = Edges { top: 2.0, ..Default::default() };
        panel_style.border_style.top = Some("solid".into());
        panel_style.border_color.top = Some("#00ff00".into());
        let panel = tree
            .add_child(root, SourceNode::new("div", NodeKind::StyledBox, rect(10.0, 10.0, 40.0, 40.0)).with_computed(panel_style))
            .unwrap();
        tree.add_child(
            panel,
            SourceNode::new("p", NodeKind::TextLeaf, rect(10.0, 20.0, 40.0, 20.0)).with_text("Hello poster world"),
        )
        .unwrap();
        let list = tree
            .add_child(root, SourceNode::new("ul", NodeKind::Container, rect(60.0, 10.0, 30.0, 30.0)))
            .unwrap();
        for text in ["first", "second"] {
            tree.add_child(list, SourceNode::new("li", NodeKind::ListItem, rect(60.0, 10.0, 30.0, 10.0)).with_text(text))
                .unwrap();
        }
        tree.add_child(
            root,
            SourceNode::new("img", NodeKind::Image, rect(60.0, 60.0, 30.0, 30.0))
                .with_image_src("https://elsewhere.example/photo.png"),
        )
        .unwrap();
        tree
    }

    /// root > [caption, ol > [li, li]], text at 6px
    fn numbered_poster() -> PosterTree {
        let small = || ComputedStyle::default().with_font_size(6.0);
        let mut tree = PosterTree::new(SourceNode::new("div", NodeKind::Container, rect(0.0, 0.0, 100.0, 100.0)));
        let root = tree.root();
        tree.add_child(
            root,
            SourceNode::new("p", NodeKind::TextLeaf, rect(5.0, 5.0, 90.0, 30.0))
                .with_text("Hello poster world")
                .with_computed(small()),
        )
        .unwrap();
        let list = tree
            .add_child(root, SourceNode::new("ol", NodeKind::Container, rect(5.0, 50.0, 90.0, 35.0)))
            .unwrap();
        for (text, y) in [("first", 50.0), ("second", 70.0)] {
            tree.add_child(
                list,
                SourceNode::new("li", NodeKind::ListItem, rect(5.0, y, 90.0, 15.0))
                    .with_text(text)
                    .with_computed(small()),
            )
            .unwrap();
        }
        tree
    }

    async fn paint(tree: &PosterTree) -> (RasterSurface, Vec<NodeId>, crate::PaintStats) {
        let registry = FontRegistry::new(Arc::new(MemoryFontLoader::new()), "Arial");
        paint_with(tree, &registry).await
    }

    async fn paint_with(tree: &PosterTree, registry: &FontRegistry) -> (RasterSurface, Vec<NodeId>, crate::PaintStats) {
        let resolver = StyleResolver::default();
        let compositor = ImageCompositor::new(Arc::new(NoNetwork));
        let mut surface = RasterSurface::new(200, 200).unwrap();
        let root_rect = tree.node(tree.root()).unwrap().rect;
        let scale = ScaleMapper::default().map(&root_rect, 200, 200).unwrap();
        let mut pipeline = PaintPipeline::new(tree, &resolver, &compositor, TextPainter::new(registry), scale);
        let order = TreeWalker::new()
            .walk(&mut pipeline, &mut surface, tree.root())
            .await
            .unwrap();
        (surface, order, pipeline.into_stats())
    }

    #[tokio::test]
    async fn test_pre_order_visits_every_node_once() {
        let tree = poster();
        let (_, order, stats) = paint(&tree).await;
        let expected: Vec<NodeId> = tree.descendants(tree.root());
        assert_eq!(order, expected);
        assert_eq!(order.iter().map(|id| id.index()).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(stats.nodes_painted, 7);
    }

    #[tokio::test]
    async fn test_children_paint_over_parents() {
        let tree = poster();
        let (surface, _, stats) = paint(&tree).await;
        // root red shows outside the panel
        assert_eq!(surface.pixel(5, 5), Some([255, 0, 0, 255]));
        // panel blue over root red (scale 2)
        assert_eq!(surface.pixel(40, 90), Some([0, 0, 255, 255]));
        // top border 2px * 2 = 4 rows of green
        assert_eq!(surface.pixel(40, 21), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(40, 25), Some([0, 0, 255, 255]));
        assert_eq!(stats.backgrounds_painted, 2);
        assert_eq!(stats.borders_painted, 1);
    }

    #[tokio::test]
    async fn test_leaf_content_is_laid_out() {
        let tree = poster();
        let (_, _, stats) = paint(&tree).await;
        // the paragraph plus one line per list item
        assert!(stats.lines_laid_out >= 3);
        // no faces are loaded, so no glyphs reach the surface
        assert_eq!(stats.lines_painted, 0);
        assert_eq!(stats.bullets_painted, 2);
    }

    #[tokio::test]
    async fn test_failed_image_degrades() {
        let tree = poster();
        let (surface, _, stats) = paint(&tree).await;
        assert_eq!(stats.images_degraded, 1);
        assert_eq!(stats.images_drawn, 0);
        assert_eq!(surface.pixel(150, 150), Some([0xEE, 0xEE, 0xEE, 255]));
        assert!(!surface.is_tainted());
    }

    #[tokio::test]
    async fn test_fixture_face_paints_lines_and_numbers() {
        let registry = fixture_registry();
        let tree = numbered_poster();
        let (surface, _, stats) = paint_with(&tree, &registry).await;

        assert_eq!(stats.lines_laid_out, 3);
        assert_eq!(stats.lines_painted, 3);
        assert_eq!(stats.bullets_painted, 2);
        // scale 2: the caption box maps to (10, 10, 180, 60)
        assert!(ink_bounds(&surface, &rect(10.0, 10.0, 180.0, 60.0)).is_some());
        // list items map to y 100..130 and 140..170
        assert!(ink_bounds(&surface, &rect(10.0, 100.0, 180.0, 30.0)).is_some());
        assert!(ink_bounds(&surface, &rect(10.0, 140.0, 180.0, 30.0)).is_some());
        // the gap between caption and list stays clean
        assert_eq!(ink_bounds(&surface, &rect(0.0, 72.0, 200.0, 26.0)), None);
    }

    #[tokio::test]
    async fn test_number_starts_at_padding_edge() {
        let registry = fixture_registry();
        let tree = numbered_poster();
        let (surface, _, _) = paint_with(&tree, &registry).await;

        // the first item's frame starts at x = 10; "1." is drawn there
        let (left, _, right, _) = ink_bounds(&surface, &rect(0.0, 100.0, 200.0, 30.0)).unwrap();
        assert!((10..=14).contains(&left), "number starts at {}", left);
        assert!(right > 40, "item text ends at {}", right);
    }
}
