use rand::Rng;

/// Per-session look of the grain layer.
///
/// Drawn uniformly at random once at startup and held until the process
/// exits, so every launch has its own texture while a single session
/// stays visually coherent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GrainParams {
    /// Pixel size of each grain block (1 = per-pixel speckle).
    pub scale: f32,
    /// Strength of the grain term mixed into the gray field.
    pub intensity: f32,
    /// Phase offset decorrelating the wave field between sessions.
    pub seed: f32,
}

impl GrainParams {
    pub fn sample(rng: &mut impl Rng) -> Self {
        Self {
            scale: rng.gen_range(1.0..11.0),
            intensity: rng.gen_range(0.15..0.30),
            seed: rng.gen_range(0.0..100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sampled_params_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let params = GrainParams::sample(&mut rng);
            assert!((1.0..11.0).contains(&params.scale));
            assert!((0.15..0.30).contains(&params.intensity));
            assert!((0.0..100.0).contains(&params.seed));
        }
    }

    #[test]
    fn different_seeds_draw_different_sessions() {
        let a = GrainParams::sample(&mut StdRng::seed_from_u64(1));
        let b = GrainParams::sample(&mut StdRng::seed_from_u64(2));
        assert_ne!(a, b);
    }
}
