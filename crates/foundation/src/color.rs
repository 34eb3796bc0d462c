use serde::{Deserialize, Serialize};

/// HSL color with hue in degrees and saturation/lightness in percent.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue_deg: f64,
    pub saturation_pct: f64,
    pub lightness_pct: f64,
}

impl Hsl {
    pub const fn new(hue_deg: f64, saturation_pct: f64, lightness_pct: f64) -> Self {
        Self {
            hue_deg,
            saturation_pct,
            lightness_pct,
        }
    }
}

impl std::fmt::Display for Hsl {
    /// Formats as CSS `hsl(h, s%, l%)`.
    ///
    /// Percentages are clamped to `[0, 100]` the same way a CSS engine would.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let h = (self.hue_deg % 360.0 + 360.0) % 360.0;
        let s = self.saturation_pct.clamp(0.0, 100.0);
        let l = self.lightness_pct.clamp(0.0, 100.0);
        write!(f, "hsl({h}, {s}%, {l}%)")
    }
}

#[cfg(test)]
mod tests {
    use super::Hsl;

    #[test]
    fn formats_as_css() {
        assert_eq!(Hsl::new(216.0, 86.0, 65.0).to_string(), "hsl(216, 86%, 65%)");
    }

    #[test]
    fn css_output_clamps_lightness() {
        assert_eq!(Hsl::new(216.0, 86.0, -10.0).to_string(), "hsl(216, 86%, 0%)");
        assert_eq!(Hsl::new(-144.0, 86.0, 120.0).to_string(), "hsl(216, 86%, 100%)");
    }
}
