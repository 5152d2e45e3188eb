//! Freehand signature capture.
//!
//! Accumulates pointer/touch movement into connected strokes on an owned
//! [`Surface`] and snapshots the surface as a PNG artifact when a stroke ends.

use image::Rgba;
use tracing::{debug, warn};

use crate::Result;
use crate::artifact::{ArtifactFormat, EncodedImageArtifact};
use crate::input::{InputAdapter, InputEvent, InputPhase, Point, RawInput};
use crate::surface::Surface;

/// Pen color (#5D4037).
pub const STROKE_COLOR: Rgba<u8> = Rgba([0x5D, 0x40, 0x37, 255]);

/// Pen width in pixels.
pub const STROKE_WIDTH: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CaptureState {
    Idle,
    Drawing { last: Point },
}

/// An interactive signature pad.
///
/// `begin` while a stroke is already active is ignored; the active stroke
/// keeps its origin.
#[derive(Debug)]
pub struct StrokeCapture {
    surface: Surface,
    adapter: InputAdapter,
    state: CaptureState,
    has_content: bool,
}

impl StrokeCapture {
    /// Create a pad of the given size whose top-left corner sits at `origin`
    /// in client coordinates.
    pub fn new(width: u32, height: u32, origin: Point) -> Result<Self> {
        Ok(Self {
            surface: Surface::acquire(width, height)?,
            adapter: InputAdapter::new(origin),
            state: CaptureState::Idle,
            has_content: false,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing { .. })
    }

    /// Whether anything has been drawn since the last clear.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Update the on-screen origin after the host layout moves the pad.
    pub fn set_origin(&mut self, origin: Point) {
        self.adapter.set_origin(origin);
    }

    pub fn begin(&mut self, point: Point) {
        if self.is_drawing() {
            debug!(x = point.x, y = point.y, "Stroke already active, ignoring begin");
            return;
        }
        self.state = CaptureState::Drawing { last: point };
    }

    /// Append a segment from the last point to `point`. No-op while idle.
    pub fn extend(&mut self, point: Point) {
        let CaptureState::Drawing { last } = self.state else {
            return;
        };
        self.surface
            .stroke_segment(last.into(), point.into(), STROKE_WIDTH, STROKE_COLOR);
        self.state = CaptureState::Drawing { last: point };
        self.has_content = true;
    }

    /// Close the active stroke and snapshot the pad.
    ///
    /// Returns `None` when nothing has been drawn since the last clear.
    pub fn end(&mut self) -> Result<Option<EncodedImageArtifact>> {
        self.state = CaptureState::Idle;
        if !self.has_content {
            return Ok(None);
        }
        self.surface.encode(ArtifactFormat::Png, None).map(Some)
    }

    /// Erase the pad. The previous artifact is no longer current, so this
    /// always yields `None` for the caller to store.
    pub fn clear(&mut self) -> Option<EncodedImageArtifact> {
        self.surface.clear();
        self.state = CaptureState::Idle;
        self.has_content = false;
        debug!("Signature pad cleared");
        None
    }

    /// Feed a normalized event. Returns the snapshot produced by a stroke
    /// ending, if any.
    pub fn handle(&mut self, event: InputEvent) -> Result<Option<EncodedImageArtifact>> {
        match (event.phase, event.position) {
            (InputPhase::Start, Some(p)) => self.begin(p),
            (InputPhase::Move, Some(p)) => self.extend(p),
            (InputPhase::End | InputPhase::Leave, _) => return self.end(),
            (phase, None) => {
                warn!(?phase, modality = ?event.modality, "Input event without position dropped");
            }
        }
        Ok(None)
    }

    /// Normalize a raw host event against the pad origin, then handle it.
    pub fn handle_raw(&mut self, raw: &RawInput) -> Result<Option<EncodedImageArtifact>> {
        let event = self.adapter.normalize(raw);
        self.handle(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modality;
    use crate::surface::TRANSPARENT;

    fn pad() -> StrokeCapture {
        StrokeCapture::new(200, 100, Point::default()).unwrap()
    }

    #[test]
    fn end_without_strokes_returns_none() {
        let mut pad = pad();
        assert!(pad.end().unwrap().is_none());
        pad.begin(Point::new(5.0, 5.0));
        assert!(pad.end().unwrap().is_none());
    }

    #[test]
    fn straight_stroke_is_visible_in_artifact() {
        let mut pad = pad();
        pad.begin(Point::new(10.0, 10.0));
        pad.extend(Point::new(100.0, 10.0));
        let artifact = pad.end().unwrap().expect("stroke drawn");

        assert_eq!(artifact.format(), ArtifactFormat::Png);
        assert_eq!(artifact.dimensions(), pad.dimensions());
        let img = artifact.decode().unwrap().to_rgba8();
        assert_ne!(*img.get_pixel(50, 10), TRANSPARENT);
        assert_eq!(*img.get_pixel(50, 10), STROKE_COLOR);
        assert_eq!(*img.get_pixel(50, 50), TRANSPARENT);
    }

    #[test]
    fn clear_then_end_returns_none() {
        let mut pad = pad();
        pad.begin(Point::new(0.0, 0.0));
        pad.extend(Point::new(50.0, 50.0));
        assert!(pad.end().unwrap().is_some());

        assert!(pad.clear().is_none());
        assert!(!pad.has_content());
        assert!(pad.end().unwrap().is_none());
    }

    #[test]
    fn clear_mid_stroke_returns_to_idle() {
        let mut pad = pad();
        pad.begin(Point::new(0.0, 0.0));
        pad.extend(Point::new(10.0, 0.0));
        pad.clear();
        assert!(!pad.is_drawing());
        pad.extend(Point::new(20.0, 20.0));
        assert!(!pad.has_content());
    }

    #[test]
    fn end_twice_yields_same_content() {
        let mut pad = pad();
        pad.begin(Point::new(20.0, 20.0));
        pad.extend(Point::new(60.0, 80.0));
        let first = pad.end().unwrap().unwrap();
        let second = pad.end().unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn artifact_is_a_snapshot() {
        let mut pad = pad();
        pad.begin(Point::new(10.0, 10.0));
        pad.extend(Point::new(30.0, 10.0));
        let snapshot = pad.end().unwrap().unwrap();

        pad.begin(Point::new(10.0, 90.0));
        pad.extend(Point::new(150.0, 90.0));
        let later = pad.end().unwrap().unwrap();

        assert_ne!(snapshot, later);
        let img = snapshot.decode().unwrap().to_rgba8();
        assert_eq!(*img.get_pixel(100, 90), TRANSPARENT);
    }

    #[test]
    fn extend_while_idle_draws_nothing() {
        let mut pad = pad();
        pad.extend(Point::new(40.0, 40.0));
        assert!(!pad.has_content());
        assert_eq!(pad.surface().pixel(40, 40), Some(TRANSPARENT));
    }

    #[test]
    fn second_begin_keeps_active_stroke() {
        let mut pad = pad();
        pad.begin(Point::new(10.0, 50.0));
        pad.begin(Point::new(190.0, 50.0));
        pad.extend(Point::new(30.0, 50.0));

        assert_eq!(pad.surface().pixel(20, 50), Some(STROKE_COLOR));
        assert_eq!(pad.surface().pixel(100, 50), Some(TRANSPARENT));
    }

    #[test]
    fn direction_change_joins_without_gap() {
        let mut pad = pad();
        pad.begin(Point::new(10.0, 10.0));
        pad.extend(Point::new(50.0, 10.0));
        pad.extend(Point::new(50.0, 60.0));
        for (x, y) in [(49, 10), (50, 10), (50, 11), (50, 30)] {
            assert_eq!(pad.surface().pixel(x, y), Some(STROKE_COLOR), "gap at ({x}, {y})");
        }
    }

    #[test]
    fn raw_touch_and_mouse_streams_are_offset_by_origin() {
        let mut pad = StrokeCapture::new(200, 100, Point::new(100.0, 200.0)).unwrap();
        let stream = [
            RawInput::Touch {
                phase: InputPhase::Start,
                touches: vec![Point::new(110.0, 220.0)],
            },
            RawInput::Touch {
                phase: InputPhase::Move,
                touches: vec![Point::new(160.0, 220.0)],
            },
        ];
        for raw in &stream {
            assert!(pad.handle_raw(raw).unwrap().is_none());
        }
        let artifact = pad
            .handle_raw(&RawInput::Touch {
                phase: InputPhase::End,
                touches: vec![],
            })
            .unwrap()
            .expect("touch stroke drawn");

        let img = artifact.decode().unwrap().to_rgba8();
        assert_eq!(*img.get_pixel(30, 20), STROKE_COLOR);
        assert!(!pad.is_drawing());

        pad.handle_raw(&RawInput::Mouse {
            phase: InputPhase::Start,
            client_x: 110.0,
            client_y: 280.0,
        })
        .unwrap();
        pad.handle_raw(&RawInput::Mouse {
            phase: InputPhase::Move,
            client_x: 160.0,
            client_y: 280.0,
        })
        .unwrap();
        assert_eq!(pad.surface().pixel(30, 80), Some(STROKE_COLOR));
    }

    #[test]
    fn leave_ends_the_stroke() {
        let mut pad = pad();
        pad.begin(Point::new(1.0, 1.0));
        pad.extend(Point::new(5.0, 5.0));
        let out = pad
            .handle(InputEvent {
                phase: InputPhase::Leave,
                position: None,
                modality: Modality::Pointer,
            })
            .unwrap();
        assert!(out.is_some());
        assert!(!pad.is_drawing());
    }

    #[test]
    fn stray_far_off_point_marks_only_the_visible_part() {
        let mut pad = StrokeCapture::new(50, 50, Point::default()).unwrap();
        pad.begin(Point::new(10.0, 1.0));
        pad.extend(Point::new(3.0e9, 1.0));
        assert!(pad.has_content());
        assert_eq!(pad.surface().pixel(49, 1), Some(STROKE_COLOR));
        assert!(pad.end().unwrap().is_some());
    }

    #[test]
    fn set_origin_applies_to_later_raw_events() {
        let mut pad = StrokeCapture::new(100, 100, Point::new(500.0, 500.0)).unwrap();
        pad.set_origin(Point::new(0.0, 0.0));
        for (phase, x) in [(InputPhase::Start, 10.0), (InputPhase::Move, 40.0)] {
            pad.handle_raw(&RawInput::Mouse {
                phase,
                client_x: x,
                client_y: 20.0,
            })
            .unwrap();
        }
        assert_eq!(pad.surface().pixel(25, 20), Some(STROKE_COLOR));
    }

    #[test]
    fn new_rejects_zero_sized_pad() {
        assert!(StrokeCapture::new(0, 100, Point::default()).is_err());
    }
}
