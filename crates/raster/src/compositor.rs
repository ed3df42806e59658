//! ImageCompositor
//!
//! Draws image nodes onto the surface across the trust boundary:
//!
//! - `data:` URLs, local files and same-origin URLs are trusted and drawn
//! - cross-origin URLs are re-fetched in CORS mode and drawn only when the
//!   server approves the document origin
//! - anything that fails, is refused, or exceeds the timeout becomes a
//!   placeholder, and the export carries on
//!
//! [`CrossOriginMode::DrawOpaque`] skips the CORS check and draws the
//! opaque bitmap, which taints the surface.

use crate::{RasterError, RasterSurface, Result, TextPainter};
use base64::Engine;
use poster_model::{BoxRect, Diagnostics, NodeId, TraceEvent};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use style_engine::{Color, ObjectFit};
use text_engine::{FontSpec, TextMeasurer};
use tiny_skia::{Pixmap, Transform};
use url::Url;

pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(3);

/// How cross-origin images are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrossOriginMode {
    /// Only draw images whose CORS re-fetch was approved
    #[default]
    SafeFallback,
    /// Draw opaque cross-origin bitmaps and taint the surface
    DrawOpaque,
}

/// How a fetch is performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMode {
    SameOrigin,
    /// Send `Origin` and require an approving `Access-Control-Allow-Origin`
    Cors { origin: String },
    /// Opaque fetch; the response is never approved
    NoCors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    pub mode: FetchMode,
}

/// Bytes returned by a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// Whether the response may be read back by the document
    pub cors_approved: bool,
}

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<FetchedImage>> + Send + 'a>>;

/// Network access for image bytes
pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> FetchFuture<'a>;
}

/// Fetches images over HTTP(S) with reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch<'a>(&'a self, request: &'a FetchRequest) -> FetchFuture<'a> {
        Box::pin(async move {
            let mut builder = self.client.get(request.url.clone());
            if let FetchMode::Cors { origin } = &request.mode {
                builder = builder.header(reqwest::header::ORIGIN, origin.as_str());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| RasterError::Fetch(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(RasterError::Fetch(format!("HTTP {} for {}", status, request.url)));
            }

            let cors_approved = match &request.mode {
                FetchMode::SameOrigin => true,
                FetchMode::NoCors => false,
                FetchMode::Cors { origin } => response
                    .headers()
                    .get(reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN)
                    .and_then(|v| v.to_str().ok())
                    .map(str::trim)
                    .is_some_and(|allowed| allowed == "*" || allowed == origin),
            };

            let bytes = response
                .bytes()
                .await
                .map_err(|e| RasterError::Fetch(e.to_string()))?
                .to_vec();
            Ok(FetchedImage {
                bytes,
                cors_approved,
            })
        })
    }
}

/// Where an image reference points, after resolution against the document
#[derive(Debug, Clone, PartialEq)]
enum ImageRef {
    Inline(Vec<u8>),
    File(PathBuf),
    SameOrigin(Url),
    CrossOrigin(Url),
}

/// What happened to one image node
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// Trusted bytes were drawn
    Drawn,
    /// An opaque cross-origin bitmap was drawn and the surface is tainted
    Tainted,
    /// The placeholder was drawn instead
    Placeholder { reason: String },
}

impl ImageOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ImageOutcome::Drawn => "drawn",
            ImageOutcome::Tainted => "tainted",
            ImageOutcome::Placeholder { .. } => "placeholder",
        }
    }
}

/// Decode bytes into a premultiplied pixmap
pub fn decode_image(bytes: &[u8]) -> Result<Pixmap> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| RasterError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RasterError::Decode(format!("image has no area ({} x {})", width, height)))?;
    for (src, dst) in rgba.as_raw().chunks_exact(4).zip(pixmap.data_mut().chunks_exact_mut(4)) {
        let a = src[3];
        dst[0] = premultiply(src[0], a);
        dst[1] = premultiply(src[1], a);
        dst[2] = premultiply(src[2], a);
        dst[3] = a;
    }
    Ok(pixmap)
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}

/// Image-to-page transform for an object-fit mode
pub fn fit_transform(image_w: f32, image_h: f32, dest: &BoxRect, fit: ObjectFit) -> Transform {
    let sx = dest.width / image_w;
    let sy = dest.height / image_h;
    let (sx, sy) = match fit {
        ObjectFit::Fill => (sx, sy),
        ObjectFit::Contain => (sx.min(sy), sx.min(sy)),
        ObjectFit::Cover => (sx.max(sy), sx.max(sy)),
    };
    let tx = dest.x + (dest.width - image_w * sx) / 2.0;
    let ty = dest.y + (dest.height - image_h * sy) / 2.0;
    Transform::from_row(sx, 0.0, 0.0, sy, tx, ty)
}

/// Parse a `data:` URL into its payload bytes
fn parse_data_url(src: &str) -> Result<Vec<u8>> {
    let (header, payload) = src
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| RasterError::UnsupportedSource("malformed data URL".into()))?;
    if header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .map_err(|e| RasterError::Decode(e.to_string()))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

pub const PLACEHOLDER_FILL: Color = Color::rgb(0xEE, 0xEE, 0xEE);
pub const PLACEHOLDER_BORDER: Color = Color::rgb(0xBB, 0xBB, 0xBB);
pub const PLACEHOLDER_LABEL: Color = Color::rgb(0x88, 0x88, 0x88);
const PLACEHOLDER_LABEL_TEXT: &str = "Image";

/// Paint the neutral stand-in for an image that could not be drawn.
///
/// `unit` is the destination size of one source pixel; it sets the border
/// width and the label size. The label is skipped when no face is loaded.
pub fn paint_placeholder(surface: &mut RasterSurface, frame: &BoxRect, unit: f32, text: &mut TextPainter<'_>) {
    surface.fill_rect(frame, PLACEHOLDER_FILL);

    let stroke = unit.max(1.0).min(frame.width / 2.0).min(frame.height / 2.0);
    surface.fill_rect(&BoxRect::new(frame.x, frame.y, frame.width, stroke), PLACEHOLDER_BORDER);
    surface.fill_rect(
        &BoxRect::new(frame.x, frame.bottom() - stroke, frame.width, stroke),
        PLACEHOLDER_BORDER,
    );
    surface.fill_rect(&BoxRect::new(frame.x, frame.y, stroke, frame.height), PLACEHOLDER_BORDER);
    surface.fill_rect(
        &BoxRect::new(frame.right() - stroke, frame.y, stroke, frame.height),
        PLACEHOLDER_BORDER,
    );

    let size = (14.0 * unit).min(frame.height * 0.5);
    if size < 1.0 {
        return;
    }
    let font = FontSpec::new(text.registry().fallback_family(), 400, size);
    let width = text.measurer().measure(PLACEHOLDER_LABEL_TEXT, &font);
    if width > frame.width {
        return;
    }
    text.draw_line(
        surface,
        PLACEHOLDER_LABEL_TEXT,
        &font,
        frame.center_x() - width / 2.0,
        frame.center_y() + size * 0.35,
        PLACEHOLDER_LABEL,
    );
}

/// Composites image nodes
pub struct ImageCompositor {
    fetcher: Arc<dyn ImageFetcher>,
    document_origin: Option<Url>,
    timeout: Duration,
    mode: CrossOriginMode,
    diagnostics: Diagnostics,
}

impl ImageCompositor {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            fetcher,
            document_origin: None,
            timeout: DEFAULT_IMAGE_TIMEOUT,
            mode: CrossOriginMode::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Origin relative references resolve against and same-origin is judged by
    pub fn with_document_origin(mut self, origin: Url) -> Self {
        self.document_origin = Some(origin);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mode(mut self, mode: CrossOriginMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    fn classify(&self, src: &str) -> Result<ImageRef> {
        let src = src.trim();
        if src.starts_with("data:") {
            return parse_data_url(src).map(ImageRef::Inline);
        }

        let url = match Url::parse(src) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .document_origin
                .as_ref()
                .ok_or_else(|| {
                    RasterError::UnsupportedSource(format!("relative reference `{}` without a document origin", src))
                })?
                .join(src)
                .map_err(|e| RasterError::UnsupportedSource(e.to_string()))?,
            Err(e) => return Err(RasterError::UnsupportedSource(e.to_string())),
        };

        match url.scheme() {
            "file" => url
                .to_file_path()
                .map(ImageRef::File)
                .map_err(|_| RasterError::UnsupportedSource(url.to_string())),
            "http" | "https" => {
                let same_origin = self
                    .document_origin
                    .as_ref()
                    .is_some_and(|doc| doc.origin() == url.origin());
                Ok(if same_origin {
                    ImageRef::SameOrigin(url)
                } else {
                    ImageRef::CrossOrigin(url)
                })
            }
            other => Err(RasterError::UnsupportedSource(format!("scheme `{}`", other))),
        }
    }

    fn origin_header(&self) -> String {
        self.document_origin
            .as_ref()
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|| "null".to_string())
    }

    async fn fetch_with_timeout(&self, request: FetchRequest) -> Result<FetchedImage> {
        match tokio::time::timeout(self.timeout, self.fetcher.fetch(&request)).await {
            Ok(result) => result,
            Err(_) => Err(RasterError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Load the bitmap for `src`; the flag is true when drawing it taints the surface
    async fn load(&self, src: &str) -> Result<(Pixmap, bool)> {
        let (bytes, taints) = match self.classify(src)? {
            ImageRef::Inline(bytes) => (bytes, false),
            ImageRef::File(path) => {
                let read = tokio::time::timeout(self.timeout, tokio::fs::read(&path))
                    .await
                    .map_err(|_| RasterError::Timeout(self.timeout.as_millis() as u64))??;
                (read, false)
            }
            ImageRef::SameOrigin(url) => {
                let request = FetchRequest {
                    url,
                    mode: FetchMode::SameOrigin,
                };
                (self.fetch_with_timeout(request).await?.bytes, false)
            }
            ImageRef::CrossOrigin(url) => match self.mode {
                CrossOriginMode::SafeFallback => {
                    let request = FetchRequest {
                        url: url.clone(),
                        mode: FetchMode::Cors {
                            origin: self.origin_header(),
                        },
                    };
                    let fetched = self.fetch_with_timeout(request).await?;
                    if !fetched.cors_approved {
                        return Err(RasterError::NotApproved(url.to_string()));
                    }
                    (fetched.bytes, false)
                }
                CrossOriginMode::DrawOpaque => {
                    let request = FetchRequest {
                        url,
                        mode: FetchMode::NoCors,
                    };
                    let fetched = self.fetch_with_timeout(request).await?;
                    let taints = !fetched.cors_approved;
                    (fetched.bytes, taints)
                }
            },
        };
        Ok((decode_image(&bytes)?, taints))
    }

    /// Draw the image for `node` into `dest`.
    ///
    /// Never fails: problems are returned as [`ImageOutcome::Placeholder`]
    /// and the caller paints the placeholder.
    pub async fn composite(
        &self,
        surface: &mut RasterSurface,
        node: NodeId,
        src: &str,
        dest: &BoxRect,
        fit: ObjectFit,
    ) -> ImageOutcome {
        let outcome = match self.load(src).await {
            Ok((pixmap, taints)) => {
                let transform = fit_transform(pixmap.width() as f32, pixmap.height() as f32, dest, fit);
                surface.draw_image(pixmap.as_ref(), transform, dest);
                if taints {
                    surface.mark_tainted();
                    tracing::warn!(%node, src, "opaque cross-origin image drawn; surface is tainted");
                    ImageOutcome::Tainted
                } else {
                    ImageOutcome::Drawn
                }
            }
            Err(err) => {
                tracing::warn!(%node, src, error = %err, "image replaced by placeholder");
                ImageOutcome::Placeholder {
                    reason: err.to_string(),
                }
            }
        };

        let detail = match &outcome {
            ImageOutcome::Placeholder { reason } => Some(reason.clone()),
            _ => None,
        };
        self.diagnostics.emit(TraceEvent::ImageComposited {
            node,
            outcome: outcome.label(),
            detail,
        });
        outcome
    }
}

impl std::fmt::Debug for ImageCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCompositor")
            .field("document_origin", &self.document_origin)
            .field("timeout", &self.timeout)
            .field("mode", &self.mode)
            .finish()
    }
}
