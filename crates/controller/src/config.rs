use layers::symbology::FillStyle;
use scene::binding::FeatureIds;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Equal-area conic for the continental US, with inset Alaska and Hawaii.
    #[default]
    AlbersUsa,
}

/// Parameters handed to the host's projection when it builds the path function.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub kind: ProjectionKind,
    pub scale: f64,
    /// Screen position of the projection origin; `None` centers it on the canvas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<[f64; 2]>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::AlbersUsa,
            scale: 1070.0,
            translate: None,
        }
    }
}

impl ProjectionConfig {
    pub fn translate_for(&self, canvas: CanvasSize) -> [f64; 2] {
        self.translate
            .unwrap_or([canvas.width / 2.0, canvas.height / 2.0])
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Horizontal distance from the pointer, in pixels.
    pub offset_x: f64,
    /// Subtracted from the tooltip height to get the upward shift from the pointer.
    pub height_correction: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: 5.0,
            height_correction: 60.0,
        }
    }
}

/// `keyCode`s for stepping through dates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub previous: u32,
    pub next: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous: 37,
            next: 39,
        }
    }
}

/// Identifiers of the surface elements the controller drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub map: String,
    pub filters: String,
    pub date_range: String,
    pub current_date: String,
    pub tooltip: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            map: "map".to_string(),
            filters: "filters".to_string(),
            date_range: "date-range".to_string(),
            current_date: "current-date".to_string(),
            tooltip: "tooltip".to_string(),
        }
    }
}

impl ElementIds {
    /// `(field, element id)` pairs for every element the controller needs.
    pub fn named(&self) -> [(&'static str, &str); 5] {
        [
            ("map", self.map.as_str()),
            ("filters", self.filters.as_str()),
            ("date_range", self.date_range.as_str()),
            ("current_date", self.current_date.as_str()),
            ("tooltip", self.tooltip.as_str()),
        ]
    }

    pub fn required(&self) -> [&str; 5] {
        self.named().map(|(_, id)| id)
    }
}

/// Fixed constants of one controller instance.
///
/// Defaults reproduce the stock map: a 960×500 Albers USA canvas at scale
/// 1070, a blue (216°, 86%) ramp starting at 90% lightness, arrow-key date
/// stepping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub canvas: CanvasSize,
    pub projection: ProjectionConfig,
    pub fill: FillStyle,
    pub transition_ms: u32,
    /// Whether feature ids must equal region ids. Off by default: features
    /// bind by position.
    pub feature_ids: FeatureIds,
    pub tooltip: TooltipConfig,
    pub keys: KeyBindings,
    pub elements: ElementIds,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            projection: ProjectionConfig::default(),
            fill: FillStyle::default(),
            transition_ms: 250,
            feature_ids: FeatureIds::Positional,
            tooltip: TooltipConfig::default(),
            keys: KeyBindings::default(),
            elements: ElementIds::default(),
        }
    }
}

impl MapConfig {
    /// Parses a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas must be positive, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !(self.projection.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "projection scale must be positive, got {}",
                self.projection.scale
            )));
        }
        if self.keys.previous == self.keys.next {
            return Err(ConfigError::Invalid(format!(
                "previous and next keys must differ, both are {}",
                self.keys.next
            )));
        }
        if let Some((field, _)) = self
            .elements
            .named()
            .into_iter()
            .find(|(_, id)| id.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "elements.{field} must not be empty"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasSize, MapConfig, ProjectionKind};
    use scene::binding::FeatureIds;
    use crate::error::ConfigError;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_stock_map() {
        let c = MapConfig::default();
        assert_eq!(c.canvas, CanvasSize { width: 960.0, height: 500.0 });
        assert_eq!(c.projection.kind, ProjectionKind::AlbersUsa);
        assert_eq!(c.projection.scale, 1070.0);
        assert_eq!(c.projection.translate_for(c.canvas), [480.0, 250.0]);
        assert_eq!(c.fill.hue_deg, 216.0);
        assert_eq!(c.fill.saturation_pct, 86.0);
        assert_eq!(c.fill.lightness_offset_pct, 90.0);
        assert_eq!((c.keys.previous, c.keys.next), (37, 39));
        assert_eq!(c.feature_ids, FeatureIds::Positional);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let c = MapConfig::from_json(r#"{ "transition_ms": 0, "keys": { "next": 68 } }"#).unwrap();
        assert_eq!(c.transition_ms, 0);
        assert_eq!(c.keys.previous, 37);
        assert_eq!(c.keys.next, 68);
        assert_eq!(c.elements, MapConfig::default().elements);
    }

    #[test]
    fn feature_id_matching_is_opt_in() {
        let c = MapConfig::from_json(r#"{ "feature_ids": "match_region" }"#).unwrap();
        assert_eq!(c.feature_ids, FeatureIds::MatchRegion);
    }

    #[test]
    fn json_round_trips() {
        let c = MapConfig::default();
        let back = MapConfig::from_json(&c.to_json().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            MapConfig::from_json(r#"{ "canvas": { "width": 0, "height": 500 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapConfig::from_json(r#"{ "keys": { "previous": 39, "next": 39 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapConfig::from_json(r#"{ "elements": { "tooltip": " " } }"#),
            Err(ConfigError::Invalid(_))
        ));
        let Err(ConfigError::Invalid(msg)) =
            MapConfig::from_json(r#"{ "elements": { "date_range": "" } }"#)
        else {
            panic!("expected an invalid config");
        };
        assert_eq!(msg, "elements.date_range must not be empty");
        assert!(matches!(
            MapConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
