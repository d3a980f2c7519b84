use std::fmt;
use std::time::Duration;

use winit::dpi::PhysicalSize;

/// Which built-in background shader to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Animated noise overlay composited onto the picked theme color.
    Grain,
    /// Holographic marble spheres over a pastel field; ignores the theme.
    Marble,
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Grain => f.write_str("grain"),
            Background::Marble => f.write_str("marble"),
        }
    }
}

/// Sphere grid dimensions for the marble background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarbleGrid {
    rows: u32,
    cols: u32,
}

impl MarbleGrid {
    /// Builds a grid, flooring either dimension to one so a degenerate
    /// request still renders something.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }
}

impl Default for MarbleGrid {
    fn default() -> Self {
        Self { rows: 4, cols: 8 }
    }
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Background variant to render.
    pub background: Background,
    /// Optional FPS cap; `None` renders once per presented frame.
    pub target_fps: Option<f32>,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Sphere layout for the marble background.
    pub marble_grid: MarbleGrid,
    /// Length of the fade-in that gates the first paint.
    pub reveal: Duration,
    /// Ceiling on the device pixel ratio used for the backing surface.
    pub max_pixel_ratio: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 800),
            background: Background::Grain,
            target_fps: None,
            antialiasing: Antialiasing::default(),
            marble_grid: MarbleGrid::default(),
            reveal: Duration::from_millis(300),
            max_pixel_ratio: 2.0,
        }
    }
}

/// Backing-surface size for a window, with the device pixel ratio capped.
///
/// High-density displays above the cap render at the capped density and
/// scale up on present; everything below renders 1:1 with the window's
/// physical pixels. Returns the pixel dimensions plus the effective
/// (capped) ratio relative to logical pixels.
pub(crate) fn backing_size(
    physical: PhysicalSize<u32>,
    scale_factor: f64,
    max_pixel_ratio: f64,
) -> (PhysicalSize<u32>, f64) {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let capped = scale.min(max_pixel_ratio.max(1.0));
    let ratio = capped / scale;
    let width = (f64::from(physical.width) * ratio).round().max(1.0) as u32;
    let height = (f64::from(physical.height) * ratio).round().max(1.0) as u32;
    (PhysicalSize::new(width, height), capped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_size_is_identity_below_the_cap() {
        let (size, ratio) = backing_size(PhysicalSize::new(1280, 800), 1.0, 2.0);
        assert_eq!(size, PhysicalSize::new(1280, 800));
        assert!((ratio - 1.0).abs() < f64::EPSILON);

        let (size, ratio) = backing_size(PhysicalSize::new(1920, 1080), 1.5, 2.0);
        assert_eq!(size, PhysicalSize::new(1920, 1080));
        assert!((ratio - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn backing_size_caps_dense_displays() {
        // Logical 800x600 at a 3x display: backing lands on logical * 2.
        let (size, ratio) = backing_size(PhysicalSize::new(2400, 1800), 3.0, 2.0);
        assert_eq!(size, PhysicalSize::new(1600, 1200));
        assert!((ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn backing_size_never_collapses_to_zero() {
        let (size, _) = backing_size(PhysicalSize::new(0, 0), 3.0, 2.0);
        assert_eq!(size, PhysicalSize::new(1, 1));
    }

    #[test]
    fn marble_grid_floors_degenerate_dimensions() {
        let grid = MarbleGrid::new(0, 0);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.cols(), 1);
        assert_eq!(MarbleGrid::default(), MarbleGrid::new(4, 8));
    }
}
