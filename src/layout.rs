//! Canvas layout engine.
//!
//! Deterministic positioning for note cards (greedy masonry bin-packing) and
//! for the static category anchors placed around each pillar. No randomness,
//! no external state.

use serde::{Deserialize, Serialize};

use crate::taxonomy::Pillar;

/// A 2D point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Canvas width the pipeline packs new cards into
pub const CONTAINER_WIDTH: f64 = 5000.0;
/// Note card dimensions and spacing on the canvas
pub const CARD_WIDTH: f64 = 280.0;
pub const CARD_HEIGHT: f64 = 200.0;
pub const CARD_GAP: f64 = 40.0;

/// Radius of the category ring around each pillar anchor
const CATEGORY_RING_RADIUS: f64 = 600.0;

/// Pack `count` cards into columns, masonry-style, centered on the origin.
///
/// Each card goes into the currently shortest column (first wins ties), so
/// cards sharing a column never overlap vertically. Column x slots are fixed
/// so the grid is horizontally centered on 0; after placement the whole batch
/// is shifted so it is vertically centered on 0 as well.
///
/// Greedy shortest-column-first is a local optimum, not a globally optimal
/// packing.
pub fn masonry_layout(
    count: usize,
    container_width: f64,
    card_width: f64,
    card_height: f64,
    gap: f64,
) -> Vec<Point> {
    let cols = ((container_width / (card_width + gap)).floor() as usize).max(1);
    let mut col_heights = vec![0.0f64; cols];

    let total_grid_width = cols as f64 * (card_width + gap) - gap;
    let start_x = -total_grid_width / 2.0 + card_width / 2.0;

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        // Find the shortest column
        let mut shortest = 0;
        for j in 1..cols {
            if col_heights[j] < col_heights[shortest] {
                shortest = j;
            }
        }

        let x = start_x + shortest as f64 * (card_width + gap);
        let y = col_heights[shortest] + card_height / 2.0;

        col_heights[shortest] += card_height + gap;
        points.push(Point { x, y });
    }

    // Center vertically: shift all points so the grid is centered at y=0
    let max_height = col_heights.iter().cloned().fold(0.0f64, f64::max);
    let y_offset = -max_height / 2.0;
    for p in &mut points {
        p.y += y_offset;
    }

    points
}

/// Position a new card given the current number of notes on the canvas.
///
/// Recomputes the full layout for `existing + 1` cards and takes the newest
/// point. Earlier points are discarded; already-placed notes keep the
/// positions they were committed with.
pub fn position_for_new_note(existing: usize) -> Point {
    masonry_layout(existing + 1, CONTAINER_WIDTH, CARD_WIDTH, CARD_HEIGHT, CARD_GAP)
        .pop()
        .unwrap_or_default()
}

/// Static anchor for category `index` of `count` around its pillar.
///
/// Categories sit evenly on a circle of fixed radius around the pillar
/// anchor, at `angle = 2π · index / count`. Independent of note contents.
pub fn category_anchor(pillar: Pillar, index: usize, count: usize) -> Point {
    let center = pillar.anchor();
    let angle = 2.0 * std::f64::consts::PI * index as f64 / count.max(1) as f64;
    Point {
        x: center.x + CATEGORY_RING_RADIUS * angle.cos(),
        y: center.y + CATEGORY_RING_RADIUS * angle.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masonry_returns_exactly_n_points() {
        for n in [0usize, 1, 2, 7, 60] {
            let points = masonry_layout(n, 5000.0, 280.0, 180.0, 40.0);
            assert_eq!(points.len(), n);
        }
    }

    #[test]
    fn test_masonry_three_items_three_columns() {
        // columns = floor(1000 / 320) = 3, so one item per column
        let points = masonry_layout(3, 1000.0, 280.0, 180.0, 40.0);
        assert_eq!(points.len(), 3);

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_ne!(xs[0], xs[1]);
        assert_ne!(xs[1], xs[2]);
        assert_ne!(xs[0], xs[2]);

        // All in the first row, same height after centering
        assert!((points[0].y - points[1].y).abs() < 1e-9);
        assert!((points[1].y - points[2].y).abs() < 1e-9);
    }

    #[test]
    fn test_masonry_no_vertical_overlap_within_column() {
        let card_height = 180.0;
        let points = masonry_layout(20, 1000.0, 280.0, card_height, 40.0);

        // Group by column x; y order must match insertion order and spans
        // must not overlap
        let mut by_col: std::collections::HashMap<i64, Vec<f64>> = std::collections::HashMap::new();
        for p in &points {
            by_col.entry(p.x.round() as i64).or_default().push(p.y);
        }
        for ys in by_col.values() {
            for pair in ys.windows(2) {
                assert!(pair[1] > pair[0], "y-order must follow insertion order");
                assert!(pair[1] - pair[0] >= card_height, "cards overlap vertically");
            }
        }
    }

    #[test]
    fn test_masonry_is_deterministic() {
        let a = masonry_layout(15, 5000.0, 280.0, 200.0, 40.0);
        let b = masonry_layout(15, 5000.0, 280.0, 200.0, 40.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_masonry_narrow_container_single_column() {
        let points = masonry_layout(4, 100.0, 280.0, 180.0, 40.0);
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| (p.x - points[0].x).abs() < 1e-9));
    }

    #[test]
    fn test_masonry_batch_centered_vertically() {
        // 3 columns, 3 cards: one row, so the tallest column is
        // card_height + gap and every y is card_height/2 - (card_height+gap)/2
        let points = masonry_layout(3, 1000.0, 280.0, 180.0, 40.0);
        let expected_y = 180.0 / 2.0 - (180.0 + 40.0) / 2.0;
        for p in &points {
            assert!((p.y - expected_y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_category_anchor_on_ring() {
        for pillar in Pillar::ALL {
            let center = pillar.anchor();
            for index in 0..6 {
                let p = category_anchor(pillar, index, 6);
                let dist = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
                assert!((dist - 600.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_category_anchor_index_zero_is_east() {
        let p = category_anchor(Pillar::Wisdom, 0, 6);
        let center = Pillar::Wisdom.anchor();
        assert!((p.x - (center.x + 600.0)).abs() < 1e-9);
        assert!((p.y - center.y).abs() < 1e-9);
    }

    #[test]
    fn test_position_for_new_note_matches_full_layout() {
        let full = masonry_layout(8, CONTAINER_WIDTH, CARD_WIDTH, CARD_HEIGHT, CARD_GAP);
        assert_eq!(position_for_new_note(7), full[7]);
    }
}
