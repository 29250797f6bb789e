//! The boundary between layouts and whatever draws them.

use canopy_layout::{Geometry, LayoutKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One adapter's geometry, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Adapter that produced the geometry.
    pub kind: LayoutKind,
    /// Positioned nodes.
    pub geometry: Geometry,
    /// Node the user interacted with, for enter/exit animation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Reading or building the inventory.
    Load,
    /// Selecting or running a layout.
    Layout,
    /// Toggling or zooming.
    Interaction,
}

impl Stage {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Layout => "layout",
            Self::Interaction => "interaction",
        }
    }
}

/// A user-visible failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Where it happened.
    pub stage: Stage,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic for an error at `stage`.
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage.as_str(), self.message)
    }
}

/// A drawing surface.
///
/// The sink owns animation and event capture; it only ever receives
/// complete frames, so a failed layout never leaves it half-drawn.
pub trait RenderSink {
    /// Draw a frame, replacing the previous one.
    fn present(&mut self, frame: &Frame);

    /// Show a failure. The last presented frame stays on screen.
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Sink that records everything it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    frames: Vec<Frame>,
    diagnostics: Vec<Diagnostic>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in presentation order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Diagnostics in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The frame currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Take the recorded frames, clearing them.
    pub fn take_frames(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.diagnostics.is_empty()
    }

    /// Clear all recordings.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.diagnostics.clear();
    }
}

impl RenderSink for RecordingSink {
    fn present(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

/// Sink that only logs; used by headless tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn present(&mut self, frame: &Frame) {
        tracing::debug!(
            layout = %frame.kind,
            nodes = frame.geometry.node_count(),
            origin = frame.origin.as_deref().unwrap_or(""),
            "frame"
        );
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        tracing::warn!(stage = diagnostic.stage.as_str(), "{}", diagnostic.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_layout::TreemapGeometry;
    use canopy_core::Size;

    fn frame() -> Frame {
        Frame {
            kind: LayoutKind::Treemap,
            geometry: Geometry::Treemap(TreemapGeometry {
                cells: Vec::new(),
                size: Size::new(10.0, 10.0),
            }),
            origin: None,
        }
    }

    #[test]
    fn test_recording_sink_records_in_order() {
        let mut sink = RecordingSink::new();
        assert!(sink.is_empty());
        sink.present(&frame());
        sink.report(&Diagnostic::new(Stage::Layout, "boom"));
        assert_eq!(sink.frames().len(), 1);
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.current(), Some(&frame()));

        let taken = sink.take_frames();
        assert_eq!(taken.len(), 1);
        assert!(sink.current().is_none());
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(Stage::Load, "no root record");
        assert_eq!(d.to_string(), "load failed: no root record");
    }

    #[test]
    fn test_frame_serializes_without_empty_origin() {
        let json = serde_json::to_value(frame()).unwrap();
        assert_eq!(json["kind"], "treemap");
        assert_eq!(json["geometry"]["layout"], "treemap");
        assert!(json.get("origin").is_none());
    }
}
