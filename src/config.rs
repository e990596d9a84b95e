// Parameters of the constellation. Read once at startup (defaults ← JSON file ← CLI),
// then owned by the field, which exposes them through accessors for runtime tuning.

use crate::error::Error;
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How a point is painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PointShape {
    #[default]
    Circle,
    /// Square whose half-diagonal equals the point radius.
    Square,
}

impl PointShape {
    /// Case-insensitive. Anything unrecognised is drawn as a circle.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "SQUARE" => PointShape::Square,
            _ => PointShape::Circle,
        }
    }
}

impl FromStr for PointShape {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl From<String> for PointShape {
    fn from(s: String) -> Self {
        Self::parse_lenient(&s)
    }
}

impl From<PointShape> for String {
    fn from(shape: PointShape) -> Self {
        shape.to_string()
    }
}

impl fmt::Display for PointShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PointShape::Circle => "circle",
            PointShape::Square => "square",
        })
    }
}

/// What happens when a point steps past the edge of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Below zero wraps to `size + new`; above `size` lands on `size - new`
    /// (the overshoot, negated). Can leave a point outside for one frame.
    #[default]
    Legacy,
    /// Toroidal wrap into `[0, size)`.
    Wrap,
    /// Mirror back inside `[0, size)` and reverse the speed on that axis.
    Reflect,
}

impl BoundaryPolicy {
    pub fn next(self) -> Self {
        match self {
            BoundaryPolicy::Legacy => BoundaryPolicy::Wrap,
            BoundaryPolicy::Wrap => BoundaryPolicy::Reflect,
            BoundaryPolicy::Reflect => BoundaryPolicy::Legacy,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub background: Color,
    pub point_radius: i32,
    pub point_color: Color,
    pub point_count: usize,
    pub point_shape: PointShape,
    pub line_color: Color,
    pub speed_x_barrier: i32,
    pub speed_y_barrier: i32,
    /// Points closer than this (strictly) get a connecting line.
    pub distance_barrier: i32,
    pub parallax_same_direction: bool,
    pub touch_to_scatter: bool,
    pub boundary: BoundaryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x0B, 0x0E, 0x1A),
            point_radius: 6,
            point_color: Color::rgb(0xE8, 0xEC, 0xFF),
            point_count: 40,
            point_shape: PointShape::Circle,
            line_color: Color::rgb(0x4A, 0x5A, 0x9C),
            speed_x_barrier: 2,
            speed_y_barrier: 2,
            distance_barrier: 100,
            parallax_same_direction: false,
            touch_to_scatter: false,
            boundary: BoundaryPolicy::Legacy,
        }
    }
}

impl Config {
    /// Load a JSON config. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_parsing_is_case_insensitive_and_lenient() {
        assert_eq!(PointShape::parse_lenient("SQUARE"), PointShape::Square);
        assert_eq!(PointShape::parse_lenient("sQuArE"), PointShape::Square);
        assert_eq!(PointShape::parse_lenient("Circle"), PointShape::Circle);
        assert_eq!(PointShape::parse_lenient("triangle"), PointShape::Circle);
        assert_eq!(PointShape::parse_lenient(""), PointShape::Circle);
        assert_eq!("square".parse::<PointShape>().unwrap(), PointShape::Square);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(
            r##"{ "pointCount": 12, "pointShape": "Square", "lineColor": "#FF0000", "boundary": "reflect" }"##,
        )
        .unwrap();
        assert_eq!(cfg.point_count, 12);
        assert_eq!(cfg.point_shape, PointShape::Square);
        assert_eq!(cfg.line_color, Color(0xFF0000));
        assert_eq!(cfg.boundary, BoundaryPolicy::Reflect);
        assert_eq!(cfg.point_radius, 6);
        assert_eq!(cfg.distance_barrier, 100);
        assert!(!cfg.touch_to_scatter);
    }

    #[test]
    fn unknown_shape_in_file_falls_back_to_circle() {
        let cfg: Config = serde_json::from_str(r#"{ "pointShape": "triangle" }"#).unwrap();
        assert_eq!(cfg.point_shape, PointShape::Circle);
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() {
        let dir = std::env::temp_dir();
        let missing = dir.join("constellation-does-not-exist.json");
        assert!(matches!(Config::load(&missing), Err(Error::ConfigRead { .. })));

        let bad = dir.join(format!("constellation-bad-{}.json", std::process::id()));
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(Config::load(&bad), Err(Error::ConfigParse { .. })));
        let _ = std::fs::remove_file(&bad);
    }

    #[test]
    fn boundary_cycle_visits_every_policy() {
        let p = BoundaryPolicy::Legacy;
        assert_eq!(p.next(), BoundaryPolicy::Wrap);
        assert_eq!(p.next().next(), BoundaryPolicy::Reflect);
        assert_eq!(p.next().next().next(), BoundaryPolicy::Legacy);
    }
}
