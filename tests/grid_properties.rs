//! Property tests for hex geometry, movement search, and the fixed-step clock

use std::time::Duration;

use proptest::prelude::*;

use hex_tactics::grid::{HexCoord, HexGrid, TerrainType};
use hex_tactics::render::FixedStep;

fn hex() -> impl Strategy<Value = HexCoord> {
    (-30i32..=30, -30i32..=30).prop_map(|(q, r)| HexCoord::new(q, r))
}

fn terrain() -> impl Strategy<Value = TerrainType> {
    prop::sample::select(TerrainType::all().to_vec())
}

proptest! {
    #[test]
    fn distance_is_a_metric(a in hex(), b in hex(), c in hex()) {
        prop_assert_eq!(a.distance(&b), b.distance(&a));
        prop_assert_eq!(a.distance(&a), 0);
        prop_assert!(a.distance(&c) <= a.distance(&b) + b.distance(&c));
    }

    #[test]
    fn line_steps_one_cell_at_a_time(a in hex(), b in hex()) {
        let n = a.distance(&b);
        let line = a.line_to(&b, n);
        prop_assert_eq!(line.len() as u32, n + 1);
        prop_assert_eq!(line[0], a);
        prop_assert_eq!(*line.last().unwrap(), b);
        for (i, cell) in line.iter().enumerate() {
            prop_assert_eq!(a.distance(cell), i as u32);
        }
        for pair in line.windows(2) {
            prop_assert_eq!(pair[0].distance(&pair[1]), 1);
        }
    }

    #[test]
    fn line_is_cut_at_max_range(a in hex(), b in hex(), max in 0u32..10) {
        let line = a.line_to(&b, max);
        prop_assert_eq!(line.len() as u32, a.distance(&b).min(max) + 1);
        prop_assert!(line.iter().all(|c| a.distance(c) <= max));
    }

    #[test]
    fn open_ground_reach_is_a_full_disk(origin in hex(), budget in 0u32..7) {
        let grid = HexGrid::new();
        let reachable = grid.reachable_set(origin, budget, |_| false);
        prop_assert_eq!(reachable.len() as u32, 3 * budget * (budget + 1) + 1);
        prop_assert_eq!(reachable.cost_to(origin), Some(0));
        for cell in reachable.iter() {
            prop_assert_eq!(reachable.cost_to(cell), Some(origin.distance(&cell)));
        }
    }

    #[test]
    fn reachable_costs_stay_within_budget(
        cells in prop::collection::vec(terrain(), 61),
        budget in 0u32..8,
    ) {
        let mut grid = HexGrid::new();
        let disk = HexCoord::default().hexes_in_range(4);
        for (hex, terrain) in disk.iter().zip(cells) {
            grid.set_terrain(*hex, terrain);
        }
        let origin = HexCoord::default();
        let reachable = grid.reachable_set(origin, budget, |hex| !grid.is_defined(hex));

        prop_assert!(reachable.contains(origin));
        for cell in reachable.iter() {
            let cost = reachable.cost_to(cell).unwrap();
            prop_assert!(cost <= budget);
            prop_assert!(grid.is_defined(cell));
            if cell != origin {
                prop_assert!(grid.terrain(cell).is_passable());
                let path = reachable.path_to(cell).unwrap();
                prop_assert_eq!(path[0], origin);
                prop_assert_eq!(*path.last().unwrap(), cell);
            }
        }
    }

    #[test]
    fn painter_order_is_back_to_front(cells in prop::collection::vec((hex(), terrain()), 0..40)) {
        let mut grid = HexGrid::new();
        for (hex, terrain) in &cells {
            grid.set_terrain(*hex, *terrain);
        }
        let sorted = grid.sorted_hexes();
        prop_assert_eq!(sorted.len(), grid.cell_count());
        for pair in sorted.windows(2) {
            prop_assert!((pair[0].0.r, pair[0].0.q) < (pair[1].0.r, pair[1].0.q));
        }
    }

    #[test]
    fn ground_pick_inverts_projection(h in hex(), zoom in 0.5f32..3.0, tilt in 0.3f32..1.0) {
        let mut grid = HexGrid::new();
        grid.projection_mut().zoom = zoom;
        grid.projection_mut().tilt = tilt;
        let pixel = grid.hex_to_pixel_3d(h, 0.0);
        prop_assert_eq!(grid.pixel_to_hex(pixel), h);
    }

    #[test]
    fn clock_steps_ignore_frame_split(frames in prop::collection::vec(0u64..50, 0..200)) {
        let mut split = FixedStep::from_step(Duration::from_millis(16));
        let mut whole = FixedStep::from_step(Duration::from_millis(16));

        let stepped: u32 = frames
            .iter()
            .map(|ms| split.advance_duration(Duration::from_millis(*ms)))
            .sum();
        let total: u64 = frames.iter().sum();
        prop_assert_eq!(stepped, whole.advance_duration(Duration::from_millis(total)));
        prop_assert_eq!(stepped as u64, total / 16);
    }
}
