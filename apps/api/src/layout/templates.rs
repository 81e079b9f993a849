//! Layout templates — the fixed placement slots behind every scene layout.
//!
//! # Rules
//! - A layout produces `min(count, template_size)` positions. Templates are
//!   truncated, never extrapolated: callers must not assume one slot per item.
//! - `side-by-side` has no fixed template. Two items get the large centered pair,
//!   any other count is spread evenly across the canvas, up to `MAX_SPREAD_SLOTS`.
//! - `x`/`y` are percentages of the canvas; `size` is in pixels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of scene layouts offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutType {
    #[serde(rename = "horizontal-row")]
    HorizontalRow,
    #[serde(rename = "vertical-stack")]
    VerticalStack,
    #[serde(rename = "grid-2x2")]
    Grid2x2,
    #[serde(rename = "grid-3x3")]
    Grid3x3,
    #[serde(rename = "centered-large")]
    CenteredLarge,
    #[serde(rename = "side-by-side")]
    SideBySide,
    #[serde(rename = "scattered")]
    Scattered,
    #[serde(rename = "editorial")]
    Editorial,
}

impl LayoutType {
    pub const ALL: [LayoutType; 8] = [
        LayoutType::HorizontalRow,
        LayoutType::VerticalStack,
        LayoutType::Grid2x2,
        LayoutType::Grid3x3,
        LayoutType::CenteredLarge,
        LayoutType::SideBySide,
        LayoutType::Scattered,
        LayoutType::Editorial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::HorizontalRow => "horizontal-row",
            LayoutType::VerticalStack => "vertical-stack",
            LayoutType::Grid2x2 => "grid-2x2",
            LayoutType::Grid3x3 => "grid-3x3",
            LayoutType::CenteredLarge => "centered-large",
            LayoutType::SideBySide => "side-by-side",
            LayoutType::Scattered => "scattered",
            LayoutType::Editorial => "editorial",
        }
    }

    /// Number of slots this layout can produce for `count` items.
    pub fn template_size(&self, count: usize) -> usize {
        match self {
            LayoutType::SideBySide => count.min(MAX_SPREAD_SLOTS),
            other => template_slots(*other).len(),
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("Unknown layout type: {0}")]
    UnknownLayout(String),
}

impl FromStr for LayoutType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutType::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| LayoutError::UnknownLayout(s.to_string()))
    }
}

/// A single placement slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPosition {
    /// Horizontal center, 0–100 (% of canvas width).
    pub x: f64,
    /// Vertical center, 0–100 (% of canvas height).
    pub y: f64,
    /// Rendered size in pixels.
    pub size: f64,
}

impl LayoutPosition {
    const fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }
}

/// Computed placement for one layout choice. Built on demand and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(rename = "type")]
    pub layout_type: LayoutType,
    pub positions: Vec<LayoutPosition>,
}

// ────────────────────────────────────────────────────────────────────────────
// Static template tables
// ────────────────────────────────────────────────────────────────────────────

const SIDE_BY_SIDE_SIZE: f64 = 100.0;
/// Ceiling for the side-by-side spread, matching the largest fixed template (grid-3x3).
pub const MAX_SPREAD_SLOTS: usize = 9;

static HORIZONTAL_ROW: [LayoutPosition; 4] = [
    LayoutPosition::new(20.0, 50.0, 80.0),
    LayoutPosition::new(40.0, 50.0, 80.0),
    LayoutPosition::new(60.0, 50.0, 80.0),
    LayoutPosition::new(80.0, 50.0, 80.0),
];

static VERTICAL_STACK: [LayoutPosition; 3] = [
    LayoutPosition::new(50.0, 25.0, 70.0),
    LayoutPosition::new(50.0, 50.0, 70.0),
    LayoutPosition::new(50.0, 75.0, 70.0),
];

static GRID_2X2: [LayoutPosition; 4] = [
    LayoutPosition::new(33.0, 33.0, 80.0),
    LayoutPosition::new(67.0, 33.0, 80.0),
    LayoutPosition::new(33.0, 67.0, 80.0),
    LayoutPosition::new(67.0, 67.0, 80.0),
];

#[rustfmt::skip]
static GRID_3X3: [LayoutPosition; 9] = [
    LayoutPosition::new(25.0, 25.0, 60.0), LayoutPosition::new(50.0, 25.0, 60.0), LayoutPosition::new(75.0, 25.0, 60.0),
    LayoutPosition::new(25.0, 50.0, 60.0), LayoutPosition::new(50.0, 50.0, 60.0), LayoutPosition::new(75.0, 50.0, 60.0),
    LayoutPosition::new(25.0, 75.0, 60.0), LayoutPosition::new(50.0, 75.0, 60.0), LayoutPosition::new(75.0, 75.0, 60.0),
];

static CENTERED_LARGE: [LayoutPosition; 1] = [LayoutPosition::new(50.0, 50.0, 200.0)];

static SCATTERED: [LayoutPosition; 5] = [
    LayoutPosition::new(25.0, 30.0, 80.0),
    LayoutPosition::new(70.0, 25.0, 70.0),
    LayoutPosition::new(50.0, 55.0, 90.0),
    LayoutPosition::new(30.0, 75.0, 70.0),
    LayoutPosition::new(75.0, 70.0, 80.0),
];

static EDITORIAL: [LayoutPosition; 3] = [
    LayoutPosition::new(30.0, 40.0, 150.0),
    LayoutPosition::new(72.0, 30.0, 80.0),
    LayoutPosition::new(72.0, 70.0, 80.0),
];

static SIDE_BY_SIDE_PAIR: [LayoutPosition; 2] = [
    LayoutPosition::new(35.0, 50.0, SIDE_BY_SIDE_SIZE),
    LayoutPosition::new(65.0, 50.0, SIDE_BY_SIDE_SIZE),
];

/// Fixed slots for every layout except the count-driven side-by-side spread.
fn template_slots(layout_type: LayoutType) -> &'static [LayoutPosition] {
    match layout_type {
        LayoutType::HorizontalRow => &HORIZONTAL_ROW,
        LayoutType::VerticalStack => &VERTICAL_STACK,
        LayoutType::Grid2x2 => &GRID_2X2,
        LayoutType::Grid3x3 => &GRID_3X3,
        LayoutType::CenteredLarge => &CENTERED_LARGE,
        LayoutType::SideBySide => &SIDE_BY_SIDE_PAIR,
        LayoutType::Scattered => &SCATTERED,
        LayoutType::Editorial => &EDITORIAL,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Computes the placement slots for `count` items in the given layout.
pub fn get_layout_config(layout_type: LayoutType, count: usize) -> LayoutConfig {
    let positions = match layout_type {
        LayoutType::SideBySide if count == 2 => SIDE_BY_SIDE_PAIR.to_vec(),
        LayoutType::SideBySide => spread_evenly(count.min(MAX_SPREAD_SLOTS)),
        other => template_slots(other).iter().take(count).copied().collect(),
    };

    LayoutConfig {
        layout_type,
        positions,
    }
}

fn spread_evenly(count: usize) -> Vec<LayoutPosition> {
    let step = 100.0 / (count as f64 + 1.0);
    (0..count)
        .map(|i| LayoutPosition::new(step * (i as f64 + 1.0), 50.0, SIDE_BY_SIDE_SIZE))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_count_is_min_of_count_and_template() {
        for layout in LayoutType::ALL {
            for count in 1..=9 {
                let config = get_layout_config(layout, count);
                assert_eq!(
                    config.positions.len(),
                    count.min(layout.template_size(count)),
                    "{layout} with {count} items"
                );
            }
        }
    }

    #[test]
    fn test_grid_2x2_truncates_instead_of_extrapolating() {
        let config = get_layout_config(LayoutType::Grid2x2, 7);
        assert_eq!(config.positions.len(), 4);
    }

    #[test]
    fn test_side_by_side_pair_exact() {
        let config = get_layout_config(LayoutType::SideBySide, 2);
        assert_eq!(
            config.positions,
            vec![
                LayoutPosition { x: 35.0, y: 50.0, size: 100.0 },
                LayoutPosition { x: 65.0, y: 50.0, size: 100.0 },
            ]
        );
    }

    #[test]
    fn test_side_by_side_other_counts_spread_evenly() {
        let config = get_layout_config(LayoutType::SideBySide, 3);
        let xs: Vec<f64> = config.positions.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![25.0, 50.0, 75.0]);
        assert!(config.positions.iter().all(|p| p.y == 50.0 && p.size == 100.0));

        let single = get_layout_config(LayoutType::SideBySide, 1);
        assert_eq!(single.positions, vec![LayoutPosition { x: 50.0, y: 50.0, size: 100.0 }]);
    }

    #[test]
    fn test_side_by_side_spread_is_capped() {
        let config = get_layout_config(LayoutType::SideBySide, 50);
        assert_eq!(config.positions.len(), MAX_SPREAD_SLOTS);
        assert_eq!(config.positions[0].x, 10.0);

        let huge = get_layout_config(LayoutType::SideBySide, usize::MAX);
        assert_eq!(huge.positions.len(), MAX_SPREAD_SLOTS);
        assert_eq!(LayoutType::SideBySide.template_size(usize::MAX), MAX_SPREAD_SLOTS);
    }

    #[test]
    fn test_grid_2x2_exact() {
        let config = get_layout_config(LayoutType::Grid2x2, 4);
        assert_eq!(
            config.positions,
            vec![
                LayoutPosition { x: 33.0, y: 33.0, size: 80.0 },
                LayoutPosition { x: 67.0, y: 33.0, size: 80.0 },
                LayoutPosition { x: 33.0, y: 67.0, size: 80.0 },
                LayoutPosition { x: 67.0, y: 67.0, size: 80.0 },
            ]
        );
    }

    #[test]
    fn test_same_inputs_same_output() {
        for layout in LayoutType::ALL {
            assert_eq!(get_layout_config(layout, 5), get_layout_config(layout, 5));
        }
    }

    #[test]
    fn test_zero_items_yields_no_positions() {
        for layout in LayoutType::ALL {
            assert!(get_layout_config(layout, 0).positions.is_empty());
        }
    }

    #[test]
    fn test_parse_round_trips_wire_names() {
        for layout in LayoutType::ALL {
            assert_eq!(layout.as_str().parse::<LayoutType>(), Ok(layout));
        }
    }

    #[test]
    fn test_parse_unknown_layout_fails() {
        assert_eq!(
            "mosaic".parse::<LayoutType>(),
            Err(LayoutError::UnknownLayout("mosaic".to_string()))
        );
    }

    #[test]
    fn test_serializes_type_field_with_wire_name() {
        let json = serde_json::to_value(get_layout_config(LayoutType::Grid3x3, 1)).unwrap();
        assert_eq!(json["type"], "grid-3x3");
        assert_eq!(json["positions"][0]["size"], 60.0);
    }
}
