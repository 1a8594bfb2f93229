/// Grid primitives: integer cells, continuous positions, and the bordered
/// board the generator lays out.
///
/// The board has a logical `columns × rows` playable area at `[0, columns-1]
/// × [0, rows-1]` plus a one-cell outer-wall ring, so the visual extent is
/// `[-1, columns] × [-1, rows]`. Entity placement only ever uses the
/// interior band `[1, columns-2] × [1, rows-2]`; the outermost playable
/// ring is reserved for the player spawn and the exit.

/// An integer grid coordinate. Actors at rest always sit exactly on a cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Cell { x: self.x + dx, y: self.y + dy }
    }

    /// Continuous position of this cell's center.
    pub fn to_vec2(self) -> Vec2 {
        Vec2 { x: self.x as f32, y: self.y as f32 }
    }
}

/// Squared distance below which an interpolated move counts as arrived.
pub const ARRIVAL_EPSILON_SQ: f32 = 1e-6;

/// Continuous 2D position, used only while a move interpolates between
/// two cells.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn sqr_distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Step toward `target` by at most `max_step`, never overshooting.
    pub fn move_towards(self, target: Vec2, max_step: f32) -> Vec2 {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq <= max_step * max_step || dist_sq < ARRIVAL_EPSILON_SQ {
            return target;
        }
        let dist = dist_sq.sqrt();
        Vec2 {
            x: self.x + dx / dist * max_step,
            y: self.y + dy / dist * max_step,
        }
    }

    /// Nearest cell to this position.
    pub fn to_cell(self) -> Cell {
        Cell {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
        }
    }
}

/// Static board tiles. These are scenery: the outer-wall ring blocks
/// movement, floor does not. Destructible inner walls are entities, not
/// tiles (they come and go within a level).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardTile {
    Floor,
    OuterWall,
}

/// The generated board: immutable for a level's lifetime.
#[derive(Clone, Debug)]
pub struct Board {
    pub columns: i32,
    pub rows: i32,
}

impl Board {
    pub fn new(columns: i32, rows: i32) -> Self {
        Board { columns, rows }
    }

    /// Tile at a coordinate. Everything on or beyond the border ring is
    /// outer wall, which also makes out-of-range queries safe.
    pub fn tile(&self, cell: Cell) -> BoardTile {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.columns || cell.y >= self.rows {
            BoardTile::OuterWall
        } else {
            BoardTile::Floor
        }
    }

    /// Is this cell inside the playable area?
    pub fn contains(&self, cell: Cell) -> bool {
        self.tile(cell) == BoardTile::Floor
    }

    /// Number of interior cells eligible for random placement.
    pub fn interior_cell_count(&self) -> usize {
        let w = (self.columns - 2).max(0) as usize;
        let h = (self.rows - 2).max(0) as usize;
        w * h
    }

    /// Iterate the interior band `[1, columns-2] × [1, rows-2]`.
    pub fn interior_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (1..self.columns - 1)
            .flat_map(move |x| (1..self.rows - 1).map(move |y| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_ring_is_outer_wall() {
        let board = Board::new(8, 8);
        assert_eq!(board.tile(Cell::new(-1, -1)), BoardTile::OuterWall);
        assert_eq!(board.tile(Cell::new(8, 3)), BoardTile::OuterWall);
        assert_eq!(board.tile(Cell::new(3, 8)), BoardTile::OuterWall);
        assert_eq!(board.tile(Cell::new(0, 0)), BoardTile::Floor);
        assert_eq!(board.tile(Cell::new(7, 7)), BoardTile::Floor);
    }

    #[test]
    fn interior_band_excludes_outer_playable_ring() {
        let board = Board::new(8, 8);
        let interior: Vec<Cell> = board.interior_cells().collect();
        assert_eq!(interior.len(), 36); // (8-2)^2
        assert_eq!(interior.len(), board.interior_cell_count());
        assert!(interior.iter().all(|c| c.x >= 1 && c.x <= 6 && c.y >= 1 && c.y <= 6));
        // Exit corner and player spawn are not in the band
        assert!(!interior.contains(&Cell::new(7, 7)));
        assert!(!interior.contains(&Cell::new(0, 0)));
    }

    #[test]
    fn move_towards_reaches_target_without_overshoot() {
        let mut pos = Vec2 { x: 0.0, y: 0.0 };
        let target = Vec2 { x: 1.0, y: 0.0 };
        for _ in 0..4 {
            pos = pos.move_towards(target, 0.3);
        }
        assert_eq!(pos, target);
        assert!(pos.sqr_distance(target) < ARRIVAL_EPSILON_SQ);
    }
}
