//! Level layouts
//!
//! Each function proposes candidates through [`LevelBuilder::place`] and
//! stops once the builder is full. Grid patterns use fixed row counts;
//! curve patterns are bounded by `max_iterations`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::LevelBuilder;

/// Place the block at grid cell `(row, col)`
fn cell(b: &mut LevelBuilder<'_>, row: i32, col: i32) -> bool {
    let (x, y) = (b.col_x(col), b.row_y(row));
    b.place(x, y)
}

/// Walk `rows` full-width grid rows, placing cells `keep` accepts
fn grid(b: &mut LevelBuilder<'_>, rows: i32, keep: impl Fn(i32, i32) -> bool) {
    let cols = b.cols();
    for row in 0..rows {
        for col in 0..cols {
            if b.is_full() {
                return;
            }
            if keep(row, col) {
                cell(b, row, col);
            }
        }
    }
}

/// Place `count` blocks side by side from `start_x` on grid row `row`
fn run(b: &mut LevelBuilder<'_>, row: i32, start_x: f32, count: i32) {
    let y = b.row_y(row);
    let pitch = b.cell_w();
    for i in 0..count {
        if b.is_full() {
            return;
        }
        b.place(start_x + i as f32 * pitch, y);
    }
}

/// Place a block centered on `p`
fn centered(b: &mut LevelBuilder<'_>, p: Vec2) -> bool {
    let layout = b.layout();
    let (w, h) = (layout.block_width, layout.block_height);
    b.place(p.x - w / 2.0, p.y - h / 2.0)
}

/// Star outline: alternating outer and inner vertices
fn star(b: &mut LevelBuilder<'_>, center: Vec2, points: i32, outer: f32, inner: f32) {
    for i in 0..points * 2 {
        if b.is_full() {
            return;
        }
        let angle = i as f32 * PI / points as f32;
        let radius = if i % 2 == 0 { outer } else { inner };
        centered(b, center + Vec2::from_angle(angle) * radius);
    }
}

/// One circle of blocks spaced a cell apart
fn ring(b: &mut LevelBuilder<'_>, center: Vec2, radius: f32) {
    let count = (TAU * radius / b.cell_w()).floor() as i32;
    for i in 0..count.min(b.layout().max_iterations as i32) {
        if b.is_full() {
            return;
        }
        let angle = i as f32 / count as f32 * TAU;
        centered(b, center + Vec2::from_angle(angle) * radius);
    }
}

fn screen_center_x(b: &LevelBuilder<'_>) -> f32 {
    b.layout().width / 2.0
}

pub(super) fn pyramid(b: &mut LevelBuilder<'_>) {
    let (cols, pitch) = (b.cols(), b.cell_w());
    let (width, padding) = (b.layout().width, b.layout().block_padding);
    for row in 0..15 {
        let count = cols - row;
        if count <= 0 {
            break;
        }
        let start_x = (width - count as f32 * pitch + padding) / 2.0;
        run(b, row, start_x, count);
    }
}

pub(super) fn twin_pyramids(b: &mut LevelBuilder<'_>) {
    let (cols, pitch) = (b.cols(), b.cell_w());
    let mid = cols / 2;
    for row in 0..12 {
        let count = (cols - row * 2).min(cols / 2);
        if count <= 0 {
            break;
        }
        run(b, row, (mid - count) as f32 * pitch, count);
        run(b, row, mid as f32 * pitch, count);
    }
}

pub(super) fn circle(b: &mut LevelBuilder<'_>) {
    let layout = b.layout();
    let center = Vec2::new(layout.width / 2.0, layout.field_top + 200.0);
    let radius = (layout.width * 0.3).min(200.0);
    for i in 0..63 {
        if b.is_full() {
            return;
        }
        centered(b, center + Vec2::from_angle(i as f32 * 0.1) * radius);
    }

    // Fill the middle with a 10x8 block
    let (pitch, row_h) = (b.cell_w(), b.row_h());
    let origin = center - Vec2::new(5.0 * pitch, 4.0 * row_h);
    for row in 0..8 {
        for col in 0..10 {
            if b.is_full() {
                return;
            }
            b.place(origin.x + col as f32 * pitch, origin.y + row as f32 * row_h);
        }
    }
}

pub(super) fn zigzag(b: &mut LevelBuilder<'_>) {
    let (cols, pitch) = (b.cols(), b.cell_w());
    for row in 0..20 {
        let offset = (row % 4) as f32 * pitch * 2.0;
        run(b, row, offset, cols - 4);
    }
}

pub(super) fn star_grid(b: &mut LevelBuilder<'_>) {
    let center = Vec2::new(screen_center_x(b), b.layout().field_top + 150.0);
    star(b, center, 8, 150.0, 80.0);
    grid(b, 15, |row, col| (row + col) % 3 != 0);
}

pub(super) fn spiral(b: &mut LevelBuilder<'_>) {
    let layout = b.layout();
    let center = Vec2::new(layout.width / 2.0, layout.field_top + 100.0);
    let max_radius = layout.width.min(layout.height) * 0.4;
    let max_iterations = layout.max_iterations;

    let mut radius = 30.0;
    let mut angle = 0.0f32;
    let mut iterations = 0;
    while radius < max_radius && iterations < max_iterations && !b.is_full() {
        centered(b, center + Vec2::from_angle(angle) * radius);
        angle += 0.3;
        radius += 0.5;
        iterations += 1;
    }
}

pub(super) fn cross(b: &mut LevelBuilder<'_>) {
    let layout = b.layout();
    let (block_w, block_h) = (layout.block_width, layout.block_height);
    let center_x = layout.width / 2.0;
    let center_y = layout.field_top + 200.0;
    let (cols, pitch) = (b.cols(), b.cell_w());

    // Horizontal bar across the whole screen
    for col in 0..cols {
        if b.is_full() {
            return;
        }
        b.place(col as f32 * pitch, center_y);
    }
    // Vertical bar
    for row in 0..20 {
        if b.is_full() {
            return;
        }
        let y = b.row_y(row);
        if y != center_y {
            b.place(center_x - block_w / 2.0, y);
        }
    }
    // Surround, keeping a gap around both bars
    let row_y = |row: i32| layout.field_top + row as f32 * layout.row_height();
    grid(b, 15, |row, col| {
        let x = col as f32 * pitch;
        let y = row_y(row);
        let dx = (x - center_x).abs();
        let dy = (y - center_y).abs();
        (dx > block_w * 2.0 || dy > block_h * 2.0) && y != center_y && dx > block_w
    });
}

pub(super) fn checkerboard(b: &mut LevelBuilder<'_>) {
    grid(b, 18, |row, col| (row + col) % 2 == 0);
}

pub(super) fn triple_pyramid(b: &mut LevelBuilder<'_>) {
    let (cols, pitch) = (b.cols(), b.cell_w());
    let third = cols / 3;
    if third == 0 {
        return;
    }
    for row in 0..12 {
        let count = (third - row).max(1);
        let spare = (third - count) as f32 * pitch;
        run(b, row, spare, count);
        run(b, row, third as f32 * pitch + spare / 2.0, count);
        run(b, row, (third * 2) as f32 * pitch + spare, count);
    }
}

pub(super) fn diamonds(b: &mut LevelBuilder<'_>) {
    const SIZE: i32 = 10;
    let center_x = screen_center_x(b);
    let pitch = b.cell_w();
    // Second diamond sits three rows below the first
    for first_row in [0, SIZE * 2 + 3] {
        for row in 0..SIZE * 2 {
            let count = SIZE - (row - SIZE).abs();
            let start_x = center_x - count as f32 * pitch / 2.0;
            run(b, first_row + row, start_x, count);
        }
    }
}

pub(super) fn waves(b: &mut LevelBuilder<'_>) {
    let (cols, pitch) = (b.cols(), b.cell_w());
    let width = b.layout().width;
    let count = (cols as f32 * 0.8).floor() as i32;
    for row in 0..18 {
        let offset = (row as f32 * 0.5).sin() * cols as f32 * 0.1 * pitch;
        let start_x = (width - count as f32 * pitch) / 2.0 + offset;
        run(b, row, start_x, count);
    }
}

pub(super) fn maze(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| {
        let phase = (row * 3 + col * 2) % 5;
        phase != 0 && phase != 2
    });
}

pub(super) fn concentric_circles(b: &mut LevelBuilder<'_>) {
    let layout = b.layout();
    let center = Vec2::new(layout.width / 2.0, layout.field_top + 200.0);
    let max_radius = layout.width.min(layout.height) * 0.35;
    let step = layout.row_height() + 5.0;
    let max_iterations = layout.max_iterations;

    let mut radius = 40.0;
    let mut rings = 0;
    while radius < max_radius && rings < max_iterations && !b.is_full() {
        ring(b, center, radius);
        radius += step;
        rings += 1;
    }
}

pub(super) fn arrows(b: &mut LevelBuilder<'_>) {
    const ARROWS: i32 = 4;
    const ARROW_ROWS: i32 = 8;
    let (cols, pitch) = (b.cols(), b.cell_w());
    let arrow_w = cols / ARROWS;
    for arrow in 0..ARROWS {
        let arrow_x = (arrow * arrow_w) as f32 * pitch;
        for row in 0..ARROW_ROWS {
            let count = arrow_w - (row - ARROW_ROWS / 2).abs() * 2;
            if count > 0 {
                let start_x = arrow_x + (arrow_w - count) as f32 / 2.0 * pitch;
                run(b, row, start_x, count);
            }
        }
    }
    grid(b, 15, |row, col| row >= ARROW_ROWS && (row + col) % 3 == 0);
}

pub(super) fn boss(b: &mut LevelBuilder<'_>) {
    const INNER: f32 = 100.0;
    const GRID_ROWS: i32 = 18;
    let layout = b.layout();
    let center = Vec2::new(layout.width / 2.0, layout.field_top + 150.0);
    let (top, row_h, pitch) = (layout.field_top, layout.row_height(), layout.cell_width());

    star(b, center, 12, 180.0, INNER);
    grid(b, GRID_ROWS, |row, col| {
        let p = Vec2::new(col as f32 * pitch, top + row as f32 * row_h);
        p.distance(center) > INNER + 30.0
    });
    let cols = b.cols();
    grid(b, GRID_ROWS + 5, |row, col| {
        row >= GRID_ROWS && (col < 3 || col > cols - 4)
    });
}

pub(super) fn diamond_field(b: &mut LevelBuilder<'_>) {
    grid(b, 18, |row, col| {
        let (r, c) = (row.rem_euclid(6), col.rem_euclid(6));
        (r - 2).abs() + (c - 2).abs() <= 2
    });
}

pub(super) fn corner_squares(b: &mut LevelBuilder<'_>) {
    let cols = b.cols();
    let size = (cols / 4).max(2);
    let (mid_lo, mid_hi) = (cols / 2 - size / 2, cols / 2 + (size + 1) / 2);
    grid(b, 14, |row, col| {
        let corner = row < 6 && (col < size || col >= cols - size);
        let middle = (7..14).contains(&row) && (mid_lo..mid_hi).contains(&col);
        corner || middle
    });
}

pub(super) fn double_zigzag(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| {
        let tri = (col.rem_euclid(8) - 4).abs();
        let phase = row.rem_euclid(10);
        phase == tri || phase == 9 - tri
    });
}

pub(super) fn big_checkerboard(b: &mut LevelBuilder<'_>) {
    grid(b, 18, |row, col| (row / 2 + col / 2) % 2 == 0);
}

pub(super) fn crosses(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| {
        let (r, c) = (row.rem_euclid(5), col.rem_euclid(5));
        (c == 2 && (1..=3).contains(&r)) || (r == 2 && (1..=3).contains(&c))
    });
}

pub(super) fn triangles(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| {
        let band = row / 5;
        let r = row % 5;
        let spread = (col.rem_euclid(9) - 4).abs();
        if band % 2 == 0 { spread <= r } else { spread <= 4 - r }
    });
}

pub(super) fn vertical_stripes(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |_, col| col % 4 < 2);
}

pub(super) fn diagonal_stripes(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| (col - row).rem_euclid(4) < 2);
}

pub(super) fn concentric_rectangles(b: &mut LevelBuilder<'_>) {
    const ROWS: i32 = 18;
    let cols = b.cols();
    grid(b, ROWS, |row, col| {
        let depth = row.min(col).min(ROWS - 1 - row).min(cols - 1 - col);
        depth % 2 == 0
    });
}

pub(super) fn wave_stripes(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| {
        let shift = ((col as f32 * 0.5).sin() * 2.0).round() as i32;
        (row + shift).rem_euclid(4) < 2
    });
}

pub(super) fn thick_grid(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| row % 5 < 2 || col % 5 < 2);
}

pub(super) fn steps(b: &mut LevelBuilder<'_>) {
    let cols = b.cols();
    grid(b, 16, |row, col| {
        let reach = (row / 2 + 1) * 3;
        col < reach || col >= cols - reach
    });
}

pub(super) fn diamond_grid(b: &mut LevelBuilder<'_>) {
    grid(b, 20, |row, col| (col + row) % 6 == 0 || (col - row).rem_euclid(6) == 0);
}

pub(super) fn random_clusters(b: &mut LevelBuilder<'_>) {
    const ROWS: i32 = 18;
    let cols = b.cols();
    if cols == 0 {
        return;
    }
    let clusters = 12 + cols / 2;
    for _ in 0..clusters {
        let rng = b.rng();
        let center_row = rng.random_range(0..ROWS);
        let center_col = rng.random_range(0..cols);
        let radius: i32 = rng.random_range(1..=3);
        for row in center_row - radius..=center_row + radius {
            for col in center_col - radius..=center_col + radius {
                if b.is_full() {
                    return;
                }
                let inside = (row - center_row).abs() + (col - center_col).abs() <= radius;
                if inside && (0..ROWS).contains(&row) && (0..cols).contains(&col) {
                    cell(b, row, col);
                }
            }
        }
    }
}

pub(super) fn final_boss(b: &mut LevelBuilder<'_>) {
    const INNER: f32 = 110.0;
    let layout = b.layout();
    let center = Vec2::new(layout.width / 2.0, layout.field_top + 170.0);
    let (top, row_h, pitch) = (layout.field_top, layout.row_height(), layout.cell_width());

    star(b, center, 16, 200.0, INNER);
    ring(b, center, 260.0);
    grid(b, 20, |row, col| {
        let p = Vec2::new(col as f32 * pitch, top + row as f32 * row_h);
        p.distance(center) > INNER + 40.0 && (row + col) % 2 == 0
    });
    let cols = b.cols();
    grid(b, 24, |_, col| col < 2 || col >= cols - 2);
}

#[cfg(test)]
mod tests {
    use super::super::{LevelBuilder, LevelLayout};
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn build(pattern: fn(&mut LevelBuilder<'_>), target: usize) -> Vec<(f32, f32)> {
        let tuning = Tuning::for_screen(800.0, 600.0);
        let layout = LevelLayout::new(&tuning, 800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut builder = LevelBuilder::new(&layout, target, &mut rng);
        pattern(&mut builder);
        let (blocks, _) = builder.finish();
        blocks.iter().map(|b| (b.rect.x, b.rect.y)).collect()
    }

    #[test]
    fn test_checkerboard_alternates() {
        let cells = build(checkerboard, 1000);
        // 17 columns, rows 0..=15 fit above the clearance zone
        for (x, y) in &cells {
            let col = (*x / 45.0) as i32;
            let row = ((*y - 50.0) / 25.0) as i32;
            assert_eq!((row + col) % 2, 0);
        }
        assert!(!cells.is_empty());
    }

    #[test]
    fn test_cross_has_full_bar() {
        let cells = build(cross, 1000);
        let bar = cells.iter().filter(|(_, y)| *y == 250.0).count();
        assert_eq!(bar, 17);
    }

    #[test]
    fn test_twin_pyramids_mirror() {
        let cells = build(twin_pyramids, 1000);
        let first_row: Vec<f32> = cells.iter().filter(|(_, y)| *y == 50.0).map(|(x, _)| *x).collect();
        // min(17, 8) blocks on each side of column 8
        assert_eq!(first_row.len(), 16);
    }

    #[test]
    fn test_spiral_terminates_when_small_cap() {
        let tuning = Tuning {
            max_pattern_iterations: 10,
            ..Tuning::for_screen(800.0, 600.0)
        };
        let layout = LevelLayout::new(&tuning, 800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut builder = LevelBuilder::new(&layout, 1000, &mut rng);
        spiral(&mut builder);
        assert!(builder.len() <= 10);
    }

    #[test]
    fn test_target_stops_pattern() {
        assert_eq!(build(maze, 7).len(), 7);
        assert_eq!(build(random_clusters, 3).len(), 3);
    }
}
