//! Page content stream
//!
//! Only the operators needed to place a full-page image:
//! `q`/`Q` (save/restore), `cm` (transform) and `Do` (paint XObject).

use std::fmt::Write;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    ops: String,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.ops.push_str("q\n");
        self
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.ops.push_str("Q\n");
        self
    }

    /// Concatenate `[a b c d e f]` onto the current transformation matrix
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        let _ = writeln!(
            self.ops,
            "{} {} {} {} {} {} cm",
            number(a),
            number(b),
            number(c),
            number(d),
            number(e),
            number(f)
        );
        self
    }

    /// Paint a named XObject from the page resources
    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        let _ = writeln!(self.ops, "/{} Do", name);
        self
    }

    /// Paint an image XObject stretched over `width` x `height` points at the origin
    pub fn draw_full_page_image(&mut self, name: &str, width: f64, height: f64) -> &mut Self {
        self.save_state()
            .transform(width, 0.0, 0.0, height, 0.0, 0.0)
            .draw_xobject(name)
            .restore_state()
    }

    pub fn as_str(&self) -> &str {
        &self.ops
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.ops.into_bytes()
    }
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.3}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
