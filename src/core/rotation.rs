//! Globe orientation: auto-rotation and pointer dragging

use super::settings::RotationSettings;

/// Orientation of the globe in degrees
#[derive(Clone, Debug)]
pub struct GlobeRotation {
    x: f64,
    y: f64,
    dragging: bool,
    last_pointer: (f64, f64),
    step_deg: f64,
    drag_factor: f64,
    min_x: f64,
    max_x: f64,
}

impl GlobeRotation {
    pub fn new(settings: &RotationSettings) -> Self {
        Self {
            x: settings.initial_x,
            y: 0.0,
            dragging: false,
            last_pointer: (0.0, 0.0),
            step_deg: settings.step_deg,
            drag_factor: settings.drag_factor,
            min_x: settings.min_x,
            max_x: settings.max_x,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// One auto-rotation step. Returns false (no change) while dragging.
    pub fn tick(&mut self) -> bool {
        if self.dragging {
            return false;
        }
        self.y = wrap_degrees(self.y + self.step_deg);
        true
    }

    pub fn begin_drag(&mut self, pointer_x: f64, pointer_y: f64) {
        self.dragging = true;
        self.last_pointer = (pointer_x, pointer_y);
    }

    /// Follow the pointer. Returns false when no drag is in progress.
    pub fn drag_to(&mut self, pointer_x: f64, pointer_y: f64) -> bool {
        if !self.dragging {
            return false;
        }
        let (last_x, last_y) = self.last_pointer;
        self.y = wrap_degrees(self.y + (pointer_x - last_x) * self.drag_factor);
        self.x = (self.x - (pointer_y - last_y) * self.drag_factor).clamp(self.min_x, self.max_x);
        self.last_pointer = (pointer_x, pointer_y);
        true
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// CSS transform for the current orientation
    pub fn transform(&self) -> String {
        format!("rotateX({}deg) rotateY({}deg)", self.x, self.y)
    }
}

/// Normalise an angle into [0, 360)
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
