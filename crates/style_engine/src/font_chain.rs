//! Font-family precedence chain
//!
//! Family resolution tries an ordered list of pure rules and stops at the
//! first one that yields a family:
//!
//! 1. `inline-literal`: a literal family set directly on the node
//! 2. `named-variable`: a `var(--key)` reference looked up in the variable table
//! 3. `class-convention`: a `font-<key>` class naming a variable key
//! 4. `contextual`: numeric, heading-like and caption-like text map to a role
//! 5. `fallback`: the configured fallback family

use poster_model::{Diagnostics, SourceNode, TraceEvent};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Families assigned to the two typographic roles of a poster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRoles {
    pub heading: String,
    pub body: String,
}

impl Default for FontRoles {
    fn default() -> Self {
        Self {
            heading: "Montserrat".to_string(),
            body: "Open Sans".to_string(),
        }
    }
}

/// Caller-supplied inputs to font resolution
#[derive(Debug, Clone, PartialEq)]
pub struct FontContext {
    /// Variable key (without leading dashes) to concrete family
    pub variables: HashMap<String, String>,
    pub roles: FontRoles,
    pub fallback: String,
    /// Texts up to this many characters count as caption-like
    pub caption_max_chars: usize,
}

impl Default for FontContext {
    fn default() -> Self {
        Self {
            variables: HashMap::new(),
            roles: FontRoles::default(),
            fallback: "Arial".to_string(),
            caption_max_chars: 40,
        }
    }
}

/// A single precedence rule
pub type FontRule = fn(&SourceNode, &FontContext) -> Option<String>;

/// The chain, in precedence order
pub const FONT_CHAIN: &[(&'static str, FontRule)] = &[
    ("inline-literal", inline_literal),
    ("named-variable", named_variable),
    ("class-convention", class_convention),
    ("contextual", contextual),
    ("fallback", fallback),
];

/// Run the chain for `node`, reporting every attempted step.
///
/// Returns the chosen family and the name of the step that produced it.
pub fn resolve_family(
    node: &SourceNode,
    ctx: &FontContext,
    diagnostics: &Diagnostics,
) -> (String, &'static str) {
    for &(step, rule) in FONT_CHAIN {
        let result = rule(node, ctx);
        diagnostics.emit(TraceEvent::FontStep {
            node: node.id,
            step,
            result: result.clone(),
        });
        if let Some(family) = result {
            return (family, step);
        }
    }
    // The fallback rule always answers; this keeps the function total.
    (ctx.fallback.clone(), "fallback")
}

const GENERIC_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "default"];

/// First family of a CSS `font-family` list, without quotes
fn first_family(value: &str) -> Option<String> {
    let first = value.split(',').next()?.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if first.is_empty() || GENERIC_KEYWORDS.contains(&first.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(first.to_string())
    }
}

fn var_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"var\(\s*--([A-Za-z0-9_-]+)").ok()).as_ref()
}

fn variable_key(value: &str) -> Option<String> {
    var_regex()?.captures(value).map(|caps| caps[1].to_string())
}

fn inline_literal(node: &SourceNode, _ctx: &FontContext) -> Option<String> {
    let value = node.inline.font_family.as_deref()?;
    if value.contains("var(") {
        return None;
    }
    first_family(value)
}

fn named_variable(node: &SourceNode, ctx: &FontContext) -> Option<String> {
    [node.inline.font_family.as_deref(), node.computed.font_family.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(variable_key)
        .find_map(|key| ctx.variables.get(&key).cloned())
}

fn class_convention(node: &SourceNode, ctx: &FontContext) -> Option<String> {
    node.classes
        .iter()
        .filter_map(|class| class.strip_prefix("font-"))
        .find_map(|key| {
            ctx.variables
                .get(key)
                .or_else(|| ctx.variables.get(&format!("{key}-font")))
                .cloned()
        })
}

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "header"];
const HEADING_MARKERS: &[&str] = &["title", "header", "heading", "institution", "affiliation"];
const CAPTION_MARKERS: &[&str] = &["caption", "label", "credit"];

fn contextual(node: &SourceNode, ctx: &FontContext) -> Option<String> {
    let text = node.text_content()?.trim();

    if is_numeric_text(text) {
        return Some(ctx.roles.heading.clone());
    }

    let marked = |markers: &[&str]| {
        node.classes
            .iter()
            .any(|c| markers.iter().any(|m| c.to_ascii_lowercase().contains(m)))
    };

    if HEADING_TAGS.contains(&node.tag.as_str()) || marked(HEADING_MARKERS) {
        return Some(ctx.roles.heading.clone());
    }

    let short = text.chars().count() <= ctx.caption_max_chars && !text.ends_with('.');
    if node.tag == "figcaption" || marked(CAPTION_MARKERS) || short {
        return Some(ctx.roles.body.clone());
    }

    None
}

/// Text made of digits plus numeric punctuation (`42`, `3.5%`, `+1 000`)
fn is_numeric_text(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || ".,%+-/:x×".contains(c))
}

fn fallback(_node: &SourceNode, ctx: &FontContext) -> Option<String> {
    Some(ctx.fallback.clone())
}
