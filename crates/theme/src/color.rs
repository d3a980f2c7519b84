use std::fmt;

/// Hue applied on first launch, before any saved color exists.
pub const DEFAULT_HUE: u16 = 280;
/// Saturation applied on first launch.
pub const DEFAULT_SATURATION: u8 = 70;

/// The two scalars the whole theme derives from.
///
/// Invariant: `hue` is always in `[0, 360)` and `saturation` in
/// `[0, 100]`. Every constructor and update path wraps the hue and
/// clamps the saturation, so holders never need to re-validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorState {
    pub hue: u16,
    pub saturation: u8,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            hue: DEFAULT_HUE,
            saturation: DEFAULT_SATURATION,
        }
    }
}

impl ColorState {
    /// Restores a state from persisted decimal strings.
    ///
    /// Absent or unparseable values fall back to the default for that
    /// component; finite out-of-range numbers are wrapped/clamped back
    /// into range. Never fails.
    pub fn from_persisted(hue: Option<&str>, saturation: Option<&str>) -> Self {
        let hue = hue
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map(wrap_hue)
            .unwrap_or(DEFAULT_HUE);
        let saturation = saturation
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .map(clamp_saturation)
            .unwrap_or(DEFAULT_SATURATION);
        Self { hue, saturation }
    }

    /// The page background: full-lightness-midpoint HSL of the picked pair.
    pub fn background(&self) -> Hsl {
        Hsl::new(self.hue, self.saturation, 50)
    }

    /// Text color: the complementary hue at fixed saturation/lightness so
    /// it stays readable on any background the picker can produce.
    pub fn text(&self) -> Hsl {
        Hsl::new((self.hue + 180) % 360, 100, 75)
    }

    /// Darker hover variant of [`ColorState::text`].
    pub fn text_hover(&self) -> Hsl {
        Hsl::new((self.hue + 180) % 360, 100, 45)
    }
}

/// Wraps an arbitrary hue into `[0, 360)` and rounds to the nearest
/// degree. Rounding happens before the final reduction so a value like
/// 359.7 lands on 0 rather than escaping the range as 360.
pub(crate) fn wrap_hue(value: f64) -> u16 {
    (value.rem_euclid(360.0).round() as u16) % 360
}

/// Clamps an arbitrary saturation into `[0, 100]`, rounded.
pub(crate) fn clamp_saturation(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

/// A CSS-style HSL triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue: hue % 360,
            saturation: saturation.min(100),
            lightness: lightness.min(100),
        }
    }

    fn channel(&self, n: f32) -> f32 {
        let s = f32::from(self.saturation) / 100.0;
        let l = f32::from(self.lightness) / 100.0;
        let a = s * l.min(1.0 - l);
        let k = (n + f32::from(self.hue) / 30.0) % 12.0;
        l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
    }

    /// Linear 0..1 RGB components, suitable for shader uniforms and
    /// clear colors.
    pub fn to_rgb(&self) -> [f32; 3] {
        [self.channel(0.0), self.channel(8.0), self.channel(4.0)]
    }

    /// `#rrggbb` form of the same color.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb();
        format!(
            "#{:02x}{:02x}{:02x}",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8
        )
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch_values() {
        let state = ColorState::default();
        assert_eq!(state.hue, 280);
        assert_eq!(state.saturation, 70);
    }

    #[test]
    fn complementary_text_hue() {
        let state = ColorState {
            hue: 280,
            saturation: 70,
        };
        assert_eq!(state.text(), Hsl::new(100, 100, 75));
        assert_eq!(state.text_hover(), Hsl::new(100, 100, 45));

        let wrapped = ColorState {
            hue: 300,
            saturation: 10,
        };
        assert_eq!(wrapped.text().hue, 120);
    }

    #[test]
    fn background_holds_lightness_at_midpoint() {
        let state = ColorState {
            hue: 12,
            saturation: 34,
        };
        assert_eq!(state.background(), Hsl::new(12, 34, 50));
    }

    #[test]
    fn from_persisted_round_trips_valid_values() {
        let state = ColorState::from_persisted(Some("210"), Some("40"));
        assert_eq!(state.hue, 210);
        assert_eq!(state.saturation, 40);
    }

    #[test]
    fn from_persisted_falls_back_on_garbage() {
        let state = ColorState::from_persisted(Some("not-a-number"), Some(""));
        assert_eq!(state, ColorState::default());

        let state = ColorState::from_persisted(None, None);
        assert_eq!(state, ColorState::default());

        let state = ColorState::from_persisted(Some("NaN"), Some("inf"));
        assert_eq!(state, ColorState::default());
    }

    #[test]
    fn from_persisted_wraps_and_clamps_out_of_range() {
        let state = ColorState::from_persisted(Some("400"), Some("150"));
        assert_eq!(state.hue, 40);
        assert_eq!(state.saturation, 100);

        let state = ColorState::from_persisted(Some("-90"), Some("-5"));
        assert_eq!(state.hue, 270);
        assert_eq!(state.saturation, 0);
    }

    #[test]
    fn wrap_hue_never_escapes_range() {
        for raw in [-720.5, -360.0, -0.4, 0.0, 359.4, 359.7, 360.0, 1234.9] {
            let hue = wrap_hue(raw);
            assert!(hue < 360, "hue {hue} from {raw} escaped [0, 360)");
        }
        assert_eq!(wrap_hue(359.7), 0);
    }

    #[test]
    fn hex_matches_known_colors() {
        assert_eq!(Hsl::new(0, 100, 50).to_hex(), "#ff0000");
        assert_eq!(Hsl::new(120, 100, 50).to_hex(), "#00ff00");
        assert_eq!(Hsl::new(0, 0, 100).to_hex(), "#ffffff");
        assert_eq!(Hsl::new(280, 70, 50).to_hex(), "#9d26d9");
    }

    #[test]
    fn rgb_stays_normalised() {
        for hue in (0..360).step_by(30) {
            let rgb = Hsl::new(hue as u16, 70, 50).to_rgb();
            for channel in rgb {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn display_is_css_syntax() {
        assert_eq!(Hsl::new(280, 70, 50).to_string(), "hsl(280, 70%, 50%)");
    }
}
