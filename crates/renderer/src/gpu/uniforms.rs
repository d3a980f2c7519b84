use bytemuck::{Pod, Zeroable};

use crate::params::GrainParams;
use crate::types::MarbleGrid;

/// CPU mirror of the `Scene` uniform block declared in
/// `shaders::FRAGMENT_PRELUDE`. All fields are vec4-shaped so the std140
/// layout has no hidden padding.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct SceneUniforms {
    /// x, y: surface size in pixels; z: capped pixel ratio; w: seconds.
    resolution: [f32; 4],
    /// r, g, b: theme background; a: reveal level.
    base_color: [f32; 4],
    /// x, y: pointer position in surface pixels; z: 1.0 while dragging.
    drag: [f32; 4],
    /// x: grain block scale; y: grain intensity; z: session seed.
    grain: [f32; 4],
    /// x: marble columns; y: marble rows.
    grid: [f32; 4],
}

unsafe impl Zeroable for SceneUniforms {}
unsafe impl Pod for SceneUniforms {}

impl SceneUniforms {
    pub fn new(
        width: u32,
        height: u32,
        pixel_ratio: f32,
        grain: GrainParams,
        grid: MarbleGrid,
    ) -> Self {
        Self {
            resolution: [width as f32, height as f32, pixel_ratio, 0.0],
            base_color: [0.0, 0.0, 0.0, 0.0],
            drag: [0.0; 4],
            grain: [grain.scale, grain.intensity, grain.seed, 0.0],
            grid: [grid.cols() as f32, grid.rows() as f32, 0.0, 0.0],
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.resolution[0] = width;
        self.resolution[1] = height;
        self.resolution[2] = pixel_ratio;
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.resolution[3] = seconds;
    }

    pub fn set_base_color(&mut self, rgb: [f32; 3], reveal: f32) {
        self.base_color = [rgb[0], rgb[1], rgb[2], reveal];
    }

    pub fn set_drag(&mut self, position: Option<(f32, f32)>) {
        match position {
            Some((x, y)) => self.drag = [x, y, 1.0, 0.0],
            None => self.drag[2] = 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GrainParams {
        GrainParams {
            scale: 4.0,
            intensity: 0.2,
            seed: 17.0,
        }
    }

    #[test]
    fn block_size_matches_five_vec4s() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 5 * 16);
    }

    fn as_floats(uniforms: SceneUniforms) -> [f32; 20] {
        bytemuck::cast(uniforms)
    }

    #[test]
    fn drag_flag_tracks_session_state() {
        let mut uniforms = SceneUniforms::new(800, 600, 1.0, params(), MarbleGrid::default());
        uniforms.set_drag(Some((120.0, 40.0)));
        assert_eq!(&as_floats(uniforms)[8..11], &[120.0, 40.0, 1.0]);

        uniforms.set_drag(None);
        // Last position is retained; only the active flag drops.
        assert_eq!(&as_floats(uniforms)[8..11], &[120.0, 40.0, 0.0]);
    }

    #[test]
    fn grid_is_published_cols_then_rows() {
        let uniforms = SceneUniforms::new(800, 600, 2.0, params(), MarbleGrid::new(3, 7));
        assert_eq!(&as_floats(uniforms)[16..18], &[7.0, 3.0]);
    }
}
