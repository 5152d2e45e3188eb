//! Pointer and touch input normalization.
//!
//! Mouse events report a single client position, touch events a list of
//! contacts. [`InputAdapter`] folds both into one [`InputEvent`] in the
//! surface's local coordinate space.

use serde::{Deserialize, Serialize};

/// A position in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Which device produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Pointer,
    Touch,
}

/// Where in an interaction an event falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPhase {
    /// Button pressed or finger down.
    Start,
    Move,
    /// Button released or finger lifted.
    End,
    /// Pointer left the surface mid-stroke.
    Leave,
}

/// Raw event as the host UI reports it, in client (viewport) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawInput {
    Mouse {
        phase: InputPhase,
        client_x: f32,
        client_y: f32,
    },
    Touch {
        phase: InputPhase,
        /// Active contacts; only the first one draws. Empty on touch end.
        #[serde(default)]
        touches: Vec<Point>,
    },
}

impl RawInput {
    pub fn phase(&self) -> InputPhase {
        match self {
            Self::Mouse { phase, .. } | Self::Touch { phase, .. } => *phase,
        }
    }
}

/// A normalized event consumed by the capture surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub phase: InputPhase,
    /// Local position; `None` when the source carried no position.
    pub position: Option<Point>,
    pub modality: Modality,
}

/// Translates client coordinates into surface-local ones.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputAdapter {
    origin: Point,
}

impl InputAdapter {
    /// `origin` is the surface's top-left corner in client coordinates.
    pub fn new(origin: Point) -> Self {
        Self { origin }
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.origin.x, client.y - self.origin.y)
    }

    pub fn normalize(&self, raw: &RawInput) -> InputEvent {
        match raw {
            RawInput::Mouse {
                phase,
                client_x,
                client_y,
            } => InputEvent {
                phase: *phase,
                position: Some(self.to_local(Point::new(*client_x, *client_y))),
                modality: Modality::Pointer,
            },
            RawInput::Touch { phase, touches } => InputEvent {
                phase: *phase,
                position: touches.first().map(|t| self.to_local(*t)),
                modality: Modality::Touch,
            },
        }
    }
}
