//! Injectable diagnostics sink
//!
//! Resolution steps across the export pipeline report what they decided as
//! [`TraceEvent`]s. Callers that want to inspect those decisions (tests, a
//! debug panel) install a callback; every event is also forwarded to
//! `tracing` at trace level.

use crate::NodeId;
use std::fmt;
use std::sync::Arc;

/// A structured record of one pipeline decision
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// One step of the font-family precedence chain was tried
    FontStep {
        node: NodeId,
        step: &'static str,
        result: Option<String>,
    },
    /// A font weight was chosen
    FontWeight {
        node: NodeId,
        source: &'static str,
        weight: u16,
    },
    /// A colour value could not be parsed
    UnparsedColor { node: NodeId, value: String },
    /// A requested font face was not available
    FontSubstituted {
        family: String,
        weight: u16,
        substitute: String,
        reason: String,
    },
    /// Outcome of compositing an image node
    ImageComposited {
        node: NodeId,
        outcome: &'static str,
        detail: Option<String>,
    },
    /// Destination and source aspect ratios disagree
    ScaleMismatch { scale_x: f32, scale_y: f32 },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::FontStep { node, step, result } => {
                write!(f, "{node}: font step `{step}` -> {result:?}")
            }
            TraceEvent::FontWeight { node, source, weight } => {
                write!(f, "{node}: weight {weight} from {source}")
            }
            TraceEvent::UnparsedColor { node, value } => {
                write!(f, "{node}: unparsed colour `{value}`")
            }
            TraceEvent::FontSubstituted { family, weight, substitute, reason } => {
                write!(f, "font {family} {weight} replaced by {substitute}: {reason}")
            }
            TraceEvent::ImageComposited { node, outcome, detail } => match detail {
                Some(detail) => write!(f, "{node}: image {outcome} ({detail})"),
                None => write!(f, "{node}: image {outcome}"),
            },
            TraceEvent::ScaleMismatch { scale_x, scale_y } => {
                write!(f, "non-uniform scale {scale_x} x {scale_y}")
            }
        }
    }
}

type TraceCallback = Arc<dyn Fn(&TraceEvent) + Send + Sync>;

/// Cloneable handle to an optional trace callback
#[derive(Clone, Default)]
pub struct Diagnostics {
    callback: Option<TraceCallback>,
}

impl Diagnostics {
    /// A sink that only forwards to `tracing`
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that also invokes `callback` for each event
    pub fn with_callback(callback: impl Fn(&TraceEvent) + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    pub fn emit(&self, event: TraceEvent) {
        tracing::trace!(target: "poster::diagnostics", "{}", event);
        if let Some(callback) = &self.callback {
            callback(&event);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_callback_receives_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            Diagnostics::with_callback(move |e| seen.lock().unwrap().push(e.clone()))
        };

        sink.emit(TraceEvent::ScaleMismatch { scale_x: 1.0, scale_y: 2.0 });
        sink.clone().emit(TraceEvent::UnparsedColor {
            node: NodeId(3),
            value: "blurple".into(),
        });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].to_string().contains("blurple"));
    }

    #[test]
    fn test_default_sink_is_silent() {
        Diagnostics::new().emit(TraceEvent::ScaleMismatch { scale_x: 1.0, scale_y: 1.0 });
    }
}
