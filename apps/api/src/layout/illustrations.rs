//! Applies a computed layout to the illustrations of a scene.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::templates::{get_layout_config, LayoutType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IllustrationKind {
    Icon,
    AiGenerated,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A positioned visual element within a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Illustration {
    pub id: String,
    pub kind: IllustrationKind,
    /// Icon name or image URL, depending on `kind`.
    pub source: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// Repositions `items` according to `layout_type`, pairing slots with items by index.
///
/// Items past the last slot keep their previous position, size and rotation.
pub fn apply_layout_to_illustrations(
    items: &[Illustration],
    layout_type: LayoutType,
) -> Vec<Illustration> {
    let config = get_layout_config(layout_type, items.len());

    if items.len() > config.positions.len() {
        debug!(
            "Layout {} has {} slots for {} illustrations; overflow keeps prior placement",
            layout_type,
            config.positions.len(),
            items.len()
        );
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match config.positions.get(i) {
            Some(slot) => Illustration {
                position: Point {
                    x: slot.x,
                    y: slot.y,
                },
                size: slot.size,
                rotation: 0.0,
                ..item.clone()
            },
            None => item.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn illustration(id: &str, x: f64, y: f64, rotation: f64) -> Illustration {
        Illustration {
            id: id.to_string(),
            kind: IllustrationKind::Icon,
            source: "rocket".to_string(),
            position: Point { x, y },
            size: 42.0,
            rotation,
        }
    }

    #[test]
    fn test_apply_assigns_slots_and_resets_rotation() {
        let items = vec![illustration("a", 1.0, 1.0, 15.0), illustration("b", 2.0, 2.0, -30.0)];
        let placed = apply_layout_to_illustrations(&items, LayoutType::SideBySide);

        assert_eq!(placed[0].position, Point { x: 35.0, y: 50.0 });
        assert_eq!(placed[1].position, Point { x: 65.0, y: 50.0 });
        assert!(placed.iter().all(|i| i.rotation == 0.0 && i.size == 100.0));
        assert_eq!(placed[0].id, "a");
        assert_eq!(placed[1].source, "rocket");
    }

    #[test]
    fn test_overflow_items_keep_prior_placement() {
        let items = vec![
            illustration("a", 1.0, 1.0, 10.0),
            illustration("b", 2.0, 2.0, 20.0),
        ];
        let placed = apply_layout_to_illustrations(&items, LayoutType::CenteredLarge);

        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].position, Point { x: 50.0, y: 50.0 });
        assert_eq!(placed[0].size, 200.0);
        assert_eq!(placed[1], items[1]);
    }

    #[test]
    fn test_empty_items() {
        assert!(apply_layout_to_illustrations(&[], LayoutType::Grid3x3).is_empty());
    }

    #[test]
    fn test_deserializes_camel_case_with_defaults() {
        let item: Illustration =
            serde_json::from_str(r#"{"id":"x","kind":"ai-generated","source":"https://img"}"#)
                .unwrap();
        assert_eq!(item.kind, IllustrationKind::AiGenerated);
        assert_eq!(item.position, Point::default());
        assert_eq!(item.rotation, 0.0);
    }
}
