//! Snapshot node types

use crate::{BoxRect, ComputedStyle, InlineStyle, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The element categories the rasterizer knows how to paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Generic block or flex container
    Container,
    /// Element whose only content is text
    TextLeaf,
    /// Bitmap image
    Image,
    /// Item of a bulleted or numbered list
    ListItem,
    /// Decorative box (background and borders only)
    StyledBox,
}

/// One element of the styled tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    /// Arena position; reassigned when the snapshot is loaded
    #[serde(default = "placeholder_id")]
    pub id: NodeId,
    /// Parent node (filled in when the snapshot is loaded)
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Host element id, used to locate the export target
    #[serde(default)]
    pub element_id: Option<String>,
    /// Lowercase tag name (`div`, `h1`, `ul`, `li`, `img`, ...)
    pub tag: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Border box in on-screen pixels
    pub rect: BoxRect,
    #[serde(default)]
    pub inline: InlineStyle,
    #[serde(default)]
    pub computed: ComputedStyle,
    #[serde(default)]
    pub text: Option<String>,
    /// Resolved image URL for image nodes
    #[serde(default)]
    pub image_src: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

fn placeholder_id() -> NodeId {
    NodeId(0)
}

impl SourceNode {
    /// Create a detached node; the tree assigns its id on insertion
    pub fn new(tag: impl Into<String>, kind: NodeKind, rect: BoxRect) -> Self {
        Self {
            id: placeholder_id(),
            parent: None,
            element_id: None,
            tag: tag.into().to_ascii_lowercase(),
            kind,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            rect,
            inline: InlineStyle::default(),
            computed: ComputedStyle::default(),
            text: None,
            image_src: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_element_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_image_src(mut self, src: impl Into<String>) -> Self {
        self.image_src = Some(src.into());
        self
    }

    pub fn with_inline(mut self, inline: InlineStyle) -> Self {
        self.inline = inline;
        self
    }

    pub fn with_computed(mut self, computed: ComputedStyle) -> Self {
        self.computed = computed;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content, if present and not only whitespace
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Whether this node has element children of its own
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
