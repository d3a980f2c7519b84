use crate::color::{clamp_saturation, wrap_hue, ColorState};

/// Snapshot captured when a drag begins, live for one continuous gesture.
///
/// Updates are computed against the origin rather than the previous
/// event, so gesture handling is purely positional: replaying the same
/// pointer position always yields the same color.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    origin_x: f64,
    origin_y: f64,
    origin_hue: u16,
    origin_saturation: u8,
}

/// Maps drag gestures onto hue/saturation changes.
///
/// Horizontal travel across the full viewport sweeps the hue through all
/// 360 degrees; vertical travel across the full viewport sweeps the
/// saturation through all 100 points (upward drag raises it). Mouse and
/// touch input feed the same three calls.
#[derive(Debug)]
pub struct ColorPicker {
    viewport: (f64, f64),
    session: Option<DragSession>,
}

impl ColorPicker {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let mut picker = Self {
            viewport: (1.0, 1.0),
            session: None,
        };
        picker.set_viewport(viewport_width, viewport_height);
        picker
    }

    /// Updates the viewport the deltas are normalised against. Zero or
    /// negative dimensions are floored to one pixel so a mid-resize
    /// event can never divide by zero.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width.max(1.0), height.max(1.0));
    }

    /// Captures the pointer origin and the current color into a session.
    pub fn begin_drag(&mut self, x: f64, y: f64, current: ColorState) {
        self.session = Some(DragSession {
            origin_x: x,
            origin_y: y,
            origin_hue: current.hue,
            origin_saturation: current.saturation,
        });
    }

    /// Computes the color for the current pointer position, or `None`
    /// when no drag is live.
    pub fn update_drag(&mut self, x: f64, y: f64) -> Option<ColorState> {
        let session = self.session?;
        let (width, height) = self.viewport;
        let delta_x = x - session.origin_x;
        let delta_y = y - session.origin_y;

        let hue = f64::from(session.origin_hue) + delta_x / width * 360.0;
        let saturation = f64::from(session.origin_saturation) - delta_y / height * 100.0;

        Some(ColorState {
            hue: wrap_hue(hue),
            saturation: clamp_saturation(saturation),
        })
    }

    /// Discards the session. No snapping, no settle animation.
    pub fn end_drag(&mut self) {
        self.session = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 800.0;
    const HEIGHT: f64 = 600.0;

    fn picker_with(state: ColorState) -> ColorPicker {
        let mut picker = ColorPicker::new(WIDTH, HEIGHT);
        picker.begin_drag(100.0, 100.0, state);
        picker
    }

    #[test]
    fn horizontal_drag_follows_hue_formula() {
        let start = ColorState {
            hue: 280,
            saturation: 70,
        };
        let mut picker = picker_with(start);

        for delta_x in [-800.0, -400.0, -33.0, 0.0, 57.0, 400.0, 800.0, 1600.0] {
            let state = picker
                .update_drag(100.0 + delta_x, 100.0)
                .expect("drag is live");
            let expected = (280.0 + delta_x / WIDTH * 360.0).rem_euclid(360.0);
            let expected = (expected.round() as u16) % 360;
            assert_eq!(state.hue, expected, "delta_x = {delta_x}");
            assert!(state.hue < 360);
            assert_eq!(state.saturation, 70);
        }
    }

    #[test]
    fn leftward_drag_wraps_through_zero() {
        let start = ColorState {
            hue: 280,
            saturation: 70,
        };
        let mut picker = picker_with(start);
        // Half the viewport to the left subtracts 180 degrees.
        let state = picker.update_drag(100.0 - 400.0, 100.0).unwrap();
        assert_eq!(state.hue, 100);
    }

    #[test]
    fn vertical_drag_follows_saturation_formula() {
        let start = ColorState {
            hue: 10,
            saturation: 50,
        };
        let mut picker = picker_with(start);

        for delta_y in [-1200.0, -300.0, 0.0, 150.0, 600.0, 1200.0] {
            let state = picker
                .update_drag(100.0, 100.0 + delta_y)
                .expect("drag is live");
            let expected = (50.0 - delta_y / HEIGHT * 100.0).clamp(0.0, 100.0);
            assert_eq!(state.saturation, expected.round() as u8, "delta_y = {delta_y}");
            assert_eq!(state.hue, 10);
        }
    }

    #[test]
    fn saturation_pins_at_bounds() {
        let start = ColorState {
            hue: 0,
            saturation: 90,
        };
        let mut picker = picker_with(start);
        assert_eq!(picker.update_drag(100.0, -5000.0).unwrap().saturation, 100);
        assert_eq!(picker.update_drag(100.0, 5000.0).unwrap().saturation, 0);
    }

    #[test]
    fn updates_are_positional_not_cumulative() {
        let start = ColorState {
            hue: 40,
            saturation: 60,
        };
        let mut picker = picker_with(start);
        let first = picker.update_drag(300.0, 100.0).unwrap();
        picker.update_drag(700.0, 100.0).unwrap();
        let back = picker.update_drag(300.0, 100.0).unwrap();
        assert_eq!(first, back);
    }

    #[test]
    fn update_without_session_is_none() {
        let mut picker = ColorPicker::new(WIDTH, HEIGHT);
        assert!(picker.update_drag(10.0, 10.0).is_none());

        picker.begin_drag(0.0, 0.0, ColorState::default());
        assert!(picker.is_dragging());
        picker.end_drag();
        assert!(!picker.is_dragging());
        assert!(picker.update_drag(10.0, 10.0).is_none());
    }

    #[test]
    fn degenerate_viewport_does_not_divide_by_zero() {
        let mut picker = ColorPicker::new(0.0, 0.0);
        picker.begin_drag(0.0, 0.0, ColorState::default());
        let state = picker.update_drag(1.0, 1.0).unwrap();
        assert!(state.hue < 360);
        assert!(state.saturation <= 100);
    }
}
