/// Procedural board generation.
///
/// Each level is laid out fresh: a bordered floor grid, then walls, food
/// and enemies scattered over the interior band so that no two placements
/// share a cell. Uniqueness comes from `PositionPool`: every interior cell
/// goes in once, and each draw removes the cell it returns.
///
/// Counts: walls and food are drawn uniformly from configured inclusive
/// ranges; the enemy count is the strict rule `floor(log2(level))`
/// (level 1 → 0, levels 2–3 → 1, 4–7 → 2, ...). Requesting more
/// placements than the pool holds is a hard generation error, never a
/// silent clamp.

use rand::Rng;

use crate::config::BoardConfig;
use crate::domain::grid::{Board, Cell};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("random position pool exhausted")]
    ExhaustedPool,

    #[error("cannot place {requested} {category}: only {free} interior cells remain")]
    Overcrowded {
        category: &'static str,
        requested: usize,
        free: usize,
    },
}

/// Unique random interior cells. Refilled per generation pass, consumed
/// monotonically: a taken cell is never re-added within the same pass.
#[derive(Clone, Debug, Default)]
pub struct PositionPool {
    cells: Vec<Cell>,
}

impl PositionPool {
    /// Clear and refill with every interior cell of a `columns × rows`
    /// board. Order is irrelevant; only uniqueness and exhaustion matter.
    pub fn initialize(&mut self, columns: i32, rows: i32) {
        self.cells.clear();
        self.cells.extend(Board::new(columns, rows).interior_cells());
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remove and return a uniformly random remaining cell.
    pub fn take_random<R: Rng>(&mut self, rng: &mut R) -> Result<Cell, GenerateError> {
        if self.cells.is_empty() {
            return Err(GenerateError::ExhaustedPool);
        }
        let index = rng.gen_range(0..self.cells.len());
        Ok(self.cells.swap_remove(index))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlacedKind {
    Wall,
    Food,
    Soda,
    Enemy,
    Exit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub kind: PlacedKind,
    pub cell: Cell,
}

/// Everything the world (and renderer) needs to realize a level: the
/// board dimensions plus one entry per placed entity. Emitted once per
/// level and never mutated afterward.
#[derive(Clone, Debug)]
pub struct LevelDescriptor {
    pub columns: i32,
    pub rows: i32,
    pub player_start: Cell,
    pub placements: Vec<Placement>,
}

/// Number of enemies for a level: `floor(log2(level))`.
pub fn enemy_count(level: u32) -> u32 {
    if level == 0 { 0 } else { level.ilog2() }
}

pub fn generate<R: Rng>(
    level: u32,
    cfg: &BoardConfig,
    rng: &mut R,
) -> Result<LevelDescriptor, GenerateError> {
    let mut pool = PositionPool::default();
    pool.initialize(cfg.columns, cfg.rows);

    let mut placements = Vec::new();

    let wall_count = rng.gen_range(cfg.wall_min..=cfg.wall_max);
    scatter(&mut pool, rng, wall_count, "walls", &mut placements, |_| PlacedKind::Wall)?;

    let food_count = rng.gen_range(cfg.food_min..=cfg.food_max);
    scatter(&mut pool, rng, food_count, "food", &mut placements, |rng| {
        // Original behavior: the collectible variant is a random prefab pick.
        if rng.gen_bool(0.5) { PlacedKind::Food } else { PlacedKind::Soda }
    })?;

    let enemies = enemy_count(level) as usize;
    scatter(&mut pool, rng, enemies, "enemies", &mut placements, |_| PlacedKind::Enemy)?;

    // The exit is a fixed cell in the outer playable ring, outside the
    // interior band the pool covers, so it cannot collide with any of the
    // placements above. Same for the player start at the opposite corner.
    placements.push(Placement {
        kind: PlacedKind::Exit,
        cell: Cell::new(cfg.columns - 1, cfg.rows - 1),
    });

    Ok(LevelDescriptor {
        columns: cfg.columns,
        rows: cfg.rows,
        player_start: Cell::new(0, 0),
        placements,
    })
}

fn scatter<R: Rng>(
    pool: &mut PositionPool,
    rng: &mut R,
    count: usize,
    category: &'static str,
    out: &mut Vec<Placement>,
    mut kind: impl FnMut(&mut R) -> PlacedKind,
) -> Result<(), GenerateError> {
    if count > pool.len() {
        return Err(GenerateError::Overcrowded {
            category,
            requested: count,
            free: pool.len(),
        });
    }
    for _ in 0..count {
        let cell = pool.take_random(rng)?;
        out.push(Placement { kind: kind(rng), cell });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn test_config() -> BoardConfig {
        BoardConfig {
            columns: 8,
            rows: 8,
            wall_min: 5,
            wall_max: 9,
            food_min: 1,
            food_max: 5,
            seed: None,
        }
    }

    #[test]
    fn enemy_count_follows_log2_rule() {
        for (level, expected) in [(1, 0), (2, 1), (3, 1), (4, 2), (7, 2), (8, 3)] {
            assert_eq!(enemy_count(level), expected, "level {level}");
        }
    }

    #[test]
    fn pool_yields_every_interior_cell_once_then_exhausts() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pool = PositionPool::default();
        pool.initialize(8, 8);

        let mut seen = HashSet::new();
        for _ in 0..36 {
            let cell = pool.take_random(&mut rng).unwrap();
            assert!(cell.x >= 1 && cell.x <= 6 && cell.y >= 1 && cell.y <= 6);
            assert!(seen.insert(cell), "cell {cell:?} returned twice");
        }
        assert!(pool.is_empty());
        assert_eq!(pool.take_random(&mut rng), Err(GenerateError::ExhaustedPool));
    }

    #[test]
    fn pool_reinitialize_starts_a_fresh_pass() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut pool = PositionPool::default();
        pool.initialize(5, 5);
        assert_eq!(pool.len(), 9);
        let _ = pool.take_random(&mut rng).unwrap();
        pool.initialize(5, 5);
        assert_eq!(pool.len(), 9);
    }

    #[test]
    fn placements_never_share_a_cell() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let descriptor = generate(8, &test_config(), &mut rng).unwrap();
            let mut seen = HashSet::new();
            for p in &descriptor.placements {
                assert!(seen.insert(p.cell), "seed {seed}: {:?} collides", p);
            }
        }
    }

    #[test]
    fn exit_sits_at_the_far_corner() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let descriptor = generate(1, &test_config(), &mut rng).unwrap();
        let exits: Vec<_> = descriptor
            .placements
            .iter()
            .filter(|p| p.kind == PlacedKind::Exit)
            .collect();
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].cell, Cell::new(7, 7));
        assert_eq!(descriptor.player_start, Cell::new(0, 0));
    }

    #[test]
    fn level_one_has_no_enemies() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let descriptor = generate(1, &test_config(), &mut rng).unwrap();
        assert!(!descriptor.placements.iter().any(|p| p.kind == PlacedKind::Enemy));
    }

    #[test]
    fn overcrowded_request_is_an_error_not_a_clamp() {
        let cfg = BoardConfig {
            columns: 4,
            rows: 4,
            wall_min: 10, // only (4-2)^2 = 4 interior cells
            wall_max: 10,
            food_min: 0,
            food_max: 0,
            seed: None,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        match generate(1, &cfg, &mut rng) {
            Err(GenerateError::Overcrowded { category, requested, free }) => {
                assert_eq!(category, "walls");
                assert_eq!(requested, 10);
                assert_eq!(free, 4);
            }
            other => panic!("expected Overcrowded, got {other:?}"),
        }
    }
}
