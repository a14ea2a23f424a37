use eframe::egui::{pos2, Rect};

// ---------------------------------------------------------------------------
// Slice-and-dice treemap layout
// ---------------------------------------------------------------------------

/// One laid-out node.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub label: String,
    pub value: f64,
    pub rect: Rect,
}

/// Split `rect` among `items` proportionally to their values.
///
/// Cuts run across the longer side so tiles stay closer to square.
/// Non-positive values get no tile.
pub fn slice(rect: Rect, items: &[(String, f64)]) -> Vec<Tile> {
    let total: f64 = items.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let horizontal = rect.width() >= rect.height();
    let mut offset = 0.0_f32;
    let mut tiles = Vec::with_capacity(items.len());
    for (label, value) in items {
        if *value <= 0.0 {
            continue;
        }
        let frac = (*value / total) as f32;
        let tile = if horizontal {
            let w = rect.width() * frac;
            let x = rect.min.x + offset;
            offset += w;
            Rect::from_min_max(pos2(x, rect.min.y), pos2(x + w, rect.max.y))
        } else {
            let h = rect.height() * frac;
            let y = rect.min.y + offset;
            offset += h;
            Rect::from_min_max(pos2(rect.min.x, y), pos2(rect.max.x, y + h))
        };
        tiles.push(Tile {
            label: label.clone(),
            value: *value,
            rect: tile,
        });
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(vals: &[(&str, f64)]) -> Vec<(String, f64)> {
        vals.iter().map(|(l, v)| (l.to_string(), *v)).collect()
    }

    #[test]
    fn tiles_cover_rect_proportionally() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 50.0));
        let tiles = slice(rect, &items(&[("a", 3.0), ("b", 1.0)]));
        assert_eq!(tiles.len(), 2);
        assert!((tiles[0].rect.width() - 75.0).abs() < 1e-3);
        assert!((tiles[1].rect.max.x - 100.0).abs() < 1e-3);
        assert_eq!(tiles[1].rect.height(), 50.0);
    }

    #[test]
    fn tall_rect_cuts_vertically() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 40.0));
        let tiles = slice(rect, &items(&[("a", 1.0), ("b", 1.0)]));
        assert!((tiles[0].rect.height() - 20.0).abs() < 1e-3);
        assert_eq!(tiles[0].rect.width(), 10.0);
    }

    #[test]
    fn zero_values_are_skipped() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert!(slice(rect, &items(&[("a", 0.0)])).is_empty());
        assert_eq!(slice(rect, &items(&[("a", 0.0), ("b", 2.0)])).len(), 1);
    }
}
