//! Grid hot paths: movement search, line traces, painter order

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hex_tactics::grid::{HexCoord, HexGrid, TerrainType};

fn stage_grid() -> HexGrid {
    let mut grid = HexGrid::filled(HexCoord::default(), 8, TerrainType::Plain);
    for (i, hex) in HexCoord::default().hexes_in_range(8).into_iter().enumerate() {
        match i % 7 {
            0 => grid.set_terrain(hex, TerrainType::Forest),
            3 => grid.set_terrain(hex, TerrainType::Water),
            5 if hex.distance(&HexCoord::default()) > 2 => grid.set_terrain(hex, TerrainType::Wall),
            _ => {}
        }
    }
    grid
}

fn bench_reachable_set(c: &mut Criterion) {
    let grid = stage_grid();
    c.bench_function("reachable_set_budget_6", |b| {
        b.iter(|| {
            black_box(grid.reachable_set(black_box(HexCoord::default()), 6, |hex| !grid.is_defined(hex)))
        })
    });
}

fn bench_line(c: &mut Criterion) {
    let grid = stage_grid();
    c.bench_function("line_across_stage", |b| {
        b.iter(|| black_box(grid.line(black_box(HexCoord::new(-8, 3)), black_box(HexCoord::new(7, -2)), 16)))
    });
}

fn bench_sorted_hexes(c: &mut Criterion) {
    let grid = stage_grid();
    c.bench_function("sorted_hexes_radius_8", |b| b.iter(|| black_box(grid.sorted_hexes())));
}

criterion_group!(benches, bench_reachable_set, bench_line, bench_sorted_hexes);
criterion_main!(benches);
