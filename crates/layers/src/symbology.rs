use foundation::color::Hsl;
use scene::index::ColorDomain;
use serde::{Deserialize, Serialize};

/// Lightness percentage returned for a degenerate (`min == max`) domain.
pub const DEGENERATE_LIGHTNESS: f64 = 50.0;

/// Linear position of `value` within `[min, max]`, in percent, clamped to `[0, 100]`.
pub fn lightness(value: f64, min: f64, max: f64) -> f64 {
    if min == max {
        return DEGENERATE_LIGHTNESS;
    }
    ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// Linear value → percentage scale over a fixed domain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorScale {
    pub domain: ColorDomain,
}

impl ColorScale {
    pub fn new(domain: ColorDomain) -> Self {
        Self { domain }
    }

    pub fn percentage(&self, value: f64) -> f64 {
        lightness(value, self.domain.min, self.domain.max)
    }
}

/// Fixed-hue fill ramp: higher values render darker.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillStyle {
    pub hue_deg: f64,
    pub saturation_pct: f64,
    /// Lightness of the domain minimum; the scale percentage is subtracted from it.
    pub lightness_offset_pct: f64,
}

impl FillStyle {
    pub const fn new(hue_deg: f64, saturation_pct: f64, lightness_offset_pct: f64) -> Self {
        Self {
            hue_deg,
            saturation_pct,
            lightness_offset_pct,
        }
    }

    pub fn fill(&self, scale: &ColorScale, value: f64) -> Hsl {
        Hsl::new(
            self.hue_deg,
            self.saturation_pct,
            self.lightness_offset_pct - scale.percentage(value),
        )
    }
}

impl Default for FillStyle {
    fn default() -> Self {
        Self::new(216.0, 86.0, 90.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorScale, FillStyle, lightness};
    use scene::index::ColorDomain;

    #[test]
    fn domain_ends_map_to_0_and_100() {
        assert_eq!(lightness(10.0, 10.0, 30.0), 0.0);
        assert_eq!(lightness(30.0, 10.0, 30.0), 100.0);
        assert_eq!(lightness(20.0, 10.0, 30.0), 50.0);
    }

    #[test]
    fn out_of_domain_values_clamp() {
        assert_eq!(lightness(40.0, 10.0, 30.0), 100.0);
        assert_eq!(lightness(-5.0, 10.0, 30.0), 0.0);
    }

    #[test]
    fn degenerate_domain_is_midpoint() {
        assert_eq!(lightness(7.0, 7.0, 7.0), 50.0);
        assert_eq!(lightness(100.0, 7.0, 7.0), 50.0);
    }

    #[test]
    fn fill_inverts_from_offset() {
        let style = FillStyle::default();
        let scale = ColorScale::new(ColorDomain::new(10.0, 30.0));
        assert_eq!(style.fill(&scale, 10.0).to_string(), "hsl(216, 86%, 90%)");
        assert_eq!(style.fill(&scale, 20.0).to_string(), "hsl(216, 86%, 40%)");
        // 90 - 100 is below the CSS range and renders at minimum lightness.
        assert_eq!(style.fill(&scale, 40.0).to_string(), "hsl(216, 86%, 0%)");
    }

    #[test]
    fn style_deserializes_with_defaults() {
        let style: FillStyle = serde_json::from_str(r#"{ "hue_deg": 120 }"#).unwrap();
        assert_eq!(style, FillStyle::new(120.0, 86.0, 90.0));
    }
}
