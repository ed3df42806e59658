//! ListContextResolver
//!
//! Decides whether a node is a list item, how deeply it is nested and
//! which bullet it gets.

use poster_model::{NodeId, NodeKind, PosterTree, SourceNode};
use serde::{Deserialize, Serialize};

const LIST_CONTAINER_TAGS: &[&str] = &["ul", "ol", "menu"];

/// Glyph drawn before a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletKind {
    #[default]
    Disc,
    Decimal,
}

impl BulletKind {
    /// Kind named by a `list-style-type` value, if it names one
    pub fn from_list_style(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disc" | "circle" | "square" => Some(Self::Disc),
            "decimal" | "decimal-leading-zero" | "lower-roman" | "upper-roman"
            | "lower-alpha" | "upper-alpha" | "lower-latin" | "upper-latin" => Some(Self::Decimal),
            _ => None,
        }
    }
}

/// List membership of one node. All fields are zero for non-items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ListContext {
    pub is_list_item: bool,
    pub bullet_kind: BulletKind,
    /// Number of enclosing list containers (at least 1 for items)
    pub indent_level: u32,
    /// 1-based position among sibling items
    pub number: u32,
    /// Horizontal space reserved for the bullet, in source pixels
    pub reserved_width: f32,
}

impl ListContext {
    pub fn none() -> Self {
        Self::default()
    }

    /// Text of the bullet glyph
    pub fn bullet_text(&self) -> Option<String> {
        if !self.is_list_item {
            return None;
        }
        Some(match self.bullet_kind {
            BulletKind::Disc => "\u{2022}".to_string(),
            BulletKind::Decimal => format!("{}.", self.number),
        })
    }
}

/// Resolves [`ListContext`]s against the snapshot tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListContextResolver {
    /// Reserved width for disc bullets, in em
    pub disc_width_em: f32,
    /// Reserved width for numbers, in em
    pub decimal_width_em: f32,
}

impl Default for ListContextResolver {
    fn default() -> Self {
        Self {
            disc_width_em: 1.0,
            decimal_width_em: 1.6,
        }
    }
}

fn is_list_container(node: &SourceNode) -> bool {
    LIST_CONTAINER_TAGS.contains(&node.tag.as_str()) || node.attribute("role") == Some("list")
}

impl ListContextResolver {
    /// Resolve the list context of `id`; `font_size` is the node's source font size.
    pub fn resolve(&self, tree: &PosterTree, id: NodeId, font_size: f32) -> ListContext {
        let Some(node) = tree.get(id) else {
            return ListContext::none();
        };
        if node.kind != NodeKind::ListItem {
            return ListContext::none();
        }

        let containers: Vec<&SourceNode> = tree
            .ancestors(id)
            .filter(|n| is_list_container(n))
            .collect();
        let Some(nearest) = containers.first() else {
            return ListContext::none();
        };

        let bullet_kind = nearest
            .computed
            .list_style_type
            .as_deref()
            .and_then(BulletKind::from_list_style)
            .unwrap_or(if nearest.tag == "ol" {
                BulletKind::Decimal
            } else {
                BulletKind::Disc
            });

        let position = tree
            .position_among_siblings(id, |n| n.kind == NodeKind::ListItem)
            .unwrap_or(1) as u32;
        let start = nearest
            .attribute("start")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(1);
        let number = (start - 1 + position as i64).max(0) as u32;

        let em = match bullet_kind {
            BulletKind::Disc => self.disc_width_em,
            BulletKind::Decimal => self.decimal_width_em,
        };

        ListContext {
            is_list_item: true,
            bullet_kind,
            indent_level: (containers.len() as u32).max(1),
            number,
            reserved_width: em * font_size,
        }
    }
}
