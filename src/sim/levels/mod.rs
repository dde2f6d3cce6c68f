//! Procedural level generation
//!
//! Each level index maps to a [`Pattern`] in [`PATTERNS`]. A pattern only
//! proposes candidate block positions; [`LevelBuilder::place`] decides
//! whether a candidate is committed:
//! 1. coordinates are rounded to whole pixels
//! 2. candidates off-screen or above the field top are dropped
//! 3. candidates reaching into the paddle clearance zone are dropped
//! 4. candidates overlapping (with padding) an earlier block are dropped
//! 5. health is rolled from the row: the first `easy_rows` rows (3..=6,
//!    rolled once per level) get 1-2, the rest 1-3
//!
//! Generation stops at the level's target count or when the pattern runs
//! out of candidates, whichever comes first.

mod patterns;

use rand::{Rng, RngCore};

use super::geometry::Rect;
use super::state::Block;
use crate::tuning::Tuning;

/// Block palette (0xRRGGBB)
pub const BLOCK_COLORS: [u32; 10] = [
    0xff6b6b, 0x4ecdc4, 0x45b7d1, 0xf9ca24, 0xf0932b, 0xeb4d4b, 0x6c5ce7, 0xa29bfe, 0xfd79a8,
    0x00b894,
];

/// Number of blocks a level tries to place
pub fn target_block_count(level: u32) -> usize {
    300 + 100 * level.saturating_sub(1) as usize
}

/// Screen and block geometry a pattern lays out against
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub width: f32,
    pub height: f32,
    pub block_width: f32,
    pub block_height: f32,
    pub block_padding: f32,
    /// Top of the block field
    pub field_top: f32,
    /// Paddle's resting top edge
    pub paddle_y: f32,
    pub paddle_clearance: f32,
    pub overlap_padding: f32,
    /// Ceiling for iterative (spiral/ring) pattern loops
    pub max_iterations: u32,
}

impl LevelLayout {
    pub fn new(tuning: &Tuning, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            block_width: tuning.block_width,
            block_height: tuning.block_height,
            block_padding: tuning.block_padding,
            field_top: tuning.field_top,
            paddle_y: height - tuning.paddle_bottom_offset,
            paddle_clearance: tuning.paddle_clearance,
            overlap_padding: tuning.overlap_padding,
            max_iterations: tuning.max_pattern_iterations,
        }
    }

    /// Horizontal pitch of the block grid
    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.block_width + self.block_padding
    }

    /// Vertical pitch of the block grid
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.block_height + self.block_padding
    }

    /// Grid columns that fit across the screen
    pub fn columns(&self) -> i32 {
        (self.width / self.cell_width()).floor().max(0.0) as i32
    }

    /// Lowest y a block's bottom edge may reach
    pub fn clearance_limit(&self) -> f32 {
        self.paddle_y - self.paddle_clearance
    }
}

/// Accumulates blocks for one generation pass, enforcing the placement filter
pub struct LevelBuilder<'a> {
    layout: &'a LevelLayout,
    rng: &'a mut dyn RngCore,
    blocks: Vec<Block>,
    target: usize,
    easy_rows: i32,
    rejected: usize,
}

impl<'a> LevelBuilder<'a> {
    pub fn new(layout: &'a LevelLayout, target: usize, rng: &'a mut dyn RngCore) -> Self {
        let easy_rows = rng.random_range(3..=6);
        Self {
            layout,
            rng,
            blocks: Vec::with_capacity(target.min(1024)),
            target,
            easy_rows,
            rejected: 0,
        }
    }

    pub fn layout(&self) -> &'a LevelLayout {
        self.layout
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.layout.columns()
    }

    #[inline]
    pub fn cell_w(&self) -> f32 {
        self.layout.cell_width()
    }

    #[inline]
    pub fn row_h(&self) -> f32 {
        self.layout.row_height()
    }

    /// Left edge of grid column `col`
    #[inline]
    pub fn col_x(&self, col: i32) -> f32 {
        col as f32 * self.cell_w()
    }

    /// Top edge of grid row `row`
    #[inline]
    pub fn row_y(&self, row: i32) -> f32 {
        self.layout.field_top + row as f32 * self.row_h()
    }

    /// Target reached
    #[inline]
    pub fn is_full(&self) -> bool {
        self.blocks.len() >= self.target
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Place the block whose top-left corner is at `(x, y)` if it passes
    /// the filter. Returns whether it was committed.
    pub fn place(&mut self, x: f32, y: f32) -> bool {
        if self.is_full() {
            return false;
        }

        let layout = self.layout;
        let rect = Rect::new(x.round(), y.round(), layout.block_width, layout.block_height);

        let on_screen = rect.x.is_finite()
            && rect.y.is_finite()
            && rect.x >= 0.0
            && rect.right() <= layout.width
            && rect.y >= layout.field_top;
        let clear_of_paddle = rect.bottom() <= layout.clearance_limit();
        let overlaps = || {
            self.blocks
                .iter()
                .filter(|b| b.is_alive())
                .any(|b| b.rect.intersects_padded(&rect, layout.overlap_padding))
        };

        if !on_screen || !clear_of_paddle || overlaps() {
            self.rejected += 1;
            return false;
        }

        let row = ((rect.y - layout.field_top) / layout.row_height()).floor() as i32;
        let health = if row < self.easy_rows {
            self.rng.random_range(1..=2)
        } else {
            self.rng.random_range(1..=3)
        };
        let color = BLOCK_COLORS[self.rng.random_range(0..BLOCK_COLORS.len())];

        let id = self.blocks.len() as u32;
        self.blocks.push(Block::new(id, rect, health, color));
        true
    }

    fn finish(self) -> (Vec<Block>, usize) {
        (self.blocks, self.rejected)
    }
}

/// A named layout procedure
pub struct Pattern {
    pub name: &'static str,
    pub build: fn(&mut LevelBuilder<'_>),
}

/// Level index `n` uses `PATTERNS[n - 1]`
pub const PATTERNS: [Pattern; 30] = [
    Pattern { name: "pyramid", build: patterns::pyramid },
    Pattern { name: "twin pyramids", build: patterns::twin_pyramids },
    Pattern { name: "circle", build: patterns::circle },
    Pattern { name: "zig-zag", build: patterns::zigzag },
    Pattern { name: "star and grid", build: patterns::star_grid },
    Pattern { name: "spiral", build: patterns::spiral },
    Pattern { name: "cross", build: patterns::cross },
    Pattern { name: "checkerboard", build: patterns::checkerboard },
    Pattern { name: "triple pyramid", build: patterns::triple_pyramid },
    Pattern { name: "diamonds", build: patterns::diamonds },
    Pattern { name: "waves", build: patterns::waves },
    Pattern { name: "maze", build: patterns::maze },
    Pattern { name: "concentric circles", build: patterns::concentric_circles },
    Pattern { name: "arrows", build: patterns::arrows },
    Pattern { name: "boss", build: patterns::boss },
    Pattern { name: "diamond field", build: patterns::diamond_field },
    Pattern { name: "corner squares", build: patterns::corner_squares },
    Pattern { name: "double zig-zag", build: patterns::double_zigzag },
    Pattern { name: "big checkerboard", build: patterns::big_checkerboard },
    Pattern { name: "crosses", build: patterns::crosses },
    Pattern { name: "triangles", build: patterns::triangles },
    Pattern { name: "vertical stripes", build: patterns::vertical_stripes },
    Pattern { name: "diagonal stripes", build: patterns::diagonal_stripes },
    Pattern { name: "concentric rectangles", build: patterns::concentric_rectangles },
    Pattern { name: "wave stripes", build: patterns::wave_stripes },
    Pattern { name: "thick grid", build: patterns::thick_grid },
    Pattern { name: "steps", build: patterns::steps },
    Pattern { name: "diamond grid", build: patterns::diamond_grid },
    Pattern { name: "random clusters", build: patterns::random_clusters },
    Pattern { name: "final boss", build: patterns::final_boss },
];

/// Pattern for a 1-based level index. Indices past the table wrap around.
pub fn pattern_for(level: u32) -> &'static Pattern {
    let index = level.max(1) as usize - 1;
    &PATTERNS[index % PATTERNS.len()]
}

/// Generate the block field for `level`
pub fn generate(level: u32, layout: &LevelLayout, rng: &mut dyn RngCore) -> Vec<Block> {
    let pattern = pattern_for(level);
    let target = target_block_count(level);
    let mut builder = LevelBuilder::new(layout, target, rng);
    (pattern.build)(&mut builder);
    if builder.is_empty() {
        log::warn!(
            "Level {} ({}): no room for blocks on a {}x{} screen",
            level,
            pattern.name,
            layout.width,
            layout.height
        );
    }
    let (blocks, rejected) = builder.finish();
    log::debug!(
        "Level {} ({}): placed {}/{} blocks, rejected {} candidates",
        level,
        pattern.name,
        blocks.len(),
        target,
        rejected
    );
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::BTreeMap;

    fn layout(width: f32, height: f32) -> LevelLayout {
        LevelLayout::new(&Tuning::for_screen(width, height), width, height)
    }

    fn assert_valid(blocks: &[Block], layout: &LevelLayout, level: u32) {
        assert!(blocks.len() <= target_block_count(level));
        for (i, a) in blocks.iter().enumerate() {
            assert!((1..=3).contains(&a.health), "level {level}: health {}", a.health);
            assert!(!a.destroyed);
            assert!(a.rect.x >= 0.0 && a.rect.right() <= layout.width);
            assert!(a.rect.y >= layout.field_top);
            assert!(
                a.rect.bottom() <= layout.paddle_y - layout.paddle_clearance,
                "level {level}: block bottom {} inside paddle clearance",
                a.rect.bottom()
            );
            assert_eq!(a.rect.x, a.rect.x.round());
            assert_eq!(a.rect.y, a.rect.y.round());
            for b in &blocks[i + 1..] {
                assert!(
                    !a.rect.intersects(&b.rect),
                    "level {level}: blocks {} and {} overlap",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn test_target_block_count() {
        assert_eq!(target_block_count(1), 300);
        assert_eq!(target_block_count(2), 400);
        assert_eq!(target_block_count(5), 700);
        assert_eq!(target_block_count(30), 3200);
    }

    #[test]
    fn test_registry_covers_every_level() {
        assert_eq!(PATTERNS.len(), 30);
        assert_eq!(pattern_for(1).name, "pyramid");
        assert_eq!(pattern_for(15).name, "boss");
        assert_eq!(pattern_for(30).name, "final boss");
        // Out of range indices still resolve
        assert_eq!(pattern_for(0).name, "pyramid");
        assert_eq!(pattern_for(31).name, "pyramid");
    }

    #[test]
    fn test_level_one_is_a_pyramid() {
        let layout = layout(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let blocks = generate(1, &layout, &mut rng);
        assert_valid(&blocks, &layout, 1);

        let mut rows: BTreeMap<i32, usize> = BTreeMap::new();
        for block in &blocks {
            *rows.entry(block.rect.y as i32).or_default() += 1;
        }
        let counts: Vec<usize> = rows.values().copied().collect();
        // 17 columns fit at 45px pitch; 15 rows shrink by one each
        assert_eq!(counts.len(), 15);
        assert_eq!(counts[0], 17);
        assert!(counts.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(blocks.len(), counts.iter().sum::<usize>());
    }

    #[test]
    fn test_pyramid_caps_at_target() {
        // A very wide screen could fit far more than 300 pyramid blocks
        let layout = layout(4000.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(2);
        let blocks = generate(1, &layout, &mut rng);
        assert_eq!(blocks.len(), 300);
        assert_valid(&blocks, &layout, 1);
    }

    #[test]
    fn test_easy_rows_only_roll_low_health() {
        let layout = layout(800.0, 600.0);
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let blocks = generate(8, &layout, &mut rng);
            let first_rows_end = layout.field_top + 3.0 * layout.row_height();
            for block in blocks.iter().filter(|b| b.rect.y < first_rows_end) {
                assert!(block.health <= 2);
            }
        }
    }

    #[test]
    fn test_generation_is_reproducible_with_seeded_rng() {
        let layout = layout(1024.0, 768.0);
        for level in [3, 11, 29] {
            let a = generate(level, &layout, &mut Pcg32::seed_from_u64(99));
            let b = generate(level, &layout, &mut Pcg32::seed_from_u64(99));
            assert_eq!(a.len(), b.len());
            let healths_a: Vec<u8> = a.iter().map(|b| b.health).collect();
            let healths_b: Vec<u8> = b.iter().map(|b| b.health).collect();
            assert_eq!(healths_a, healths_b);
        }
    }

    #[test]
    fn test_every_level_is_valid_on_common_screens() {
        for (width, height) in [(800.0, 600.0), (360.0, 640.0), (1920.0, 1080.0)] {
            let layout = layout(width, height);
            for level in 1..=30 {
                let mut rng = Pcg32::seed_from_u64(level as u64);
                let blocks = generate(level, &layout, &mut rng);
                assert!(!blocks.is_empty(), "level {level} empty on {width}x{height}");
                assert_valid(&blocks, &layout, level);
            }
        }
    }

    #[test]
    fn test_degenerate_screens_terminate() {
        // Tiny, huge and lopsided screens must all return (possibly empty)
        for (width, height) in [(10.0, 10.0), (200.0, 120.0), (10_000.0, 10_000.0), (5000.0, 300.0)] {
            let layout = layout(width, height);
            for level in 1..=30 {
                let mut rng = Pcg32::seed_from_u64(7);
                let blocks = generate(level, &layout, &mut rng);
                assert_valid(&blocks, &layout, level);
            }
        }
    }

    #[test]
    fn test_rejects_overlap_and_clearance() {
        let layout = layout(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut builder = LevelBuilder::new(&layout, 10, &mut rng);
        assert!(builder.place(100.4, 60.0));
        // Same spot after rounding
        assert!(!builder.place(100.0, 60.0));
        // Partially overlapping
        assert!(!builder.place(120.0, 70.0));
        // Off the right edge
        assert!(!builder.place(790.0, 60.0));
        // Bottom edge inside the clearance zone above the paddle (560 - 80)
        assert!(!builder.place(300.0, 470.0));
        assert!(builder.place(300.0, 460.0));
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_builder_stops_at_target() {
        let layout = layout(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut builder = LevelBuilder::new(&layout, 2, &mut rng);
        assert!(builder.place(0.0, 50.0));
        assert!(builder.place(45.0, 50.0));
        assert!(builder.is_full());
        assert!(!builder.place(90.0, 50.0));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn generated_levels_never_overlap(
            level in 1u32..=30,
            width in 300.0f32..2200.0,
            height in 300.0f32..1400.0,
            seed in any::<u64>(),
        ) {
            let layout = layout(width, height);
            let mut rng = Pcg32::seed_from_u64(seed);
            let blocks = generate(level, &layout, &mut rng);
            assert_valid(&blocks, &layout, level);
        }
    }
}
