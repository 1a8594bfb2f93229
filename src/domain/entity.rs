/// Entities: Player, Enemy, destructible walls, pickups.
///
/// Actors carry a continuous position alongside their logical cell. The
/// two agree whenever the actor is at rest; during an interpolated move the
/// logical cell is already the destination (occupancy is claimed up front)
/// while the continuous position catches up over `Flight` ticks.

use super::grid::{Cell, Vec2, ARRIVAL_EPSILON_SQ};

/// Movement direction. Board coordinates follow the logical layout:
/// `Up` increases y (toward the exit corner); the renderer flips rows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Up => (0, 1),
            MoveDir::Down => (0, -1),
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
        }
    }
}

/// An in-flight interpolated move: the time-sliced replacement for the
/// original's movement coroutine. One record per actor, polled once per
/// simulation tick; cleared on arrival or on level restart.
#[derive(Clone, Copy, Debug)]
pub struct Flight {
    pub target: Cell,
    /// Cells advanced per tick (1 / move duration).
    step: f32,
}

impl Flight {
    pub fn new(target: Cell, move_duration_ticks: u32) -> Self {
        Flight {
            target,
            step: 1.0 / move_duration_ticks.max(1) as f32,
        }
    }

    /// Advance one tick. Returns the new position and whether the flight
    /// finished (squared remaining distance under epsilon, snapped exact).
    pub fn advance(&self, pos: Vec2) -> (Vec2, bool) {
        let end = self.target.to_vec2();
        let next = pos.move_towards(end, self.step);
        let done = next.sqr_distance(end) < ARRIVAL_EPSILON_SQ;
        (if done { end } else { next }, done)
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub cell: Cell,
    pub pos: Vec2,
    pub food: i32,
    /// Cleared when the exit is reached: no further move attempts.
    pub enabled: bool,
    /// Cleared exactly once when food runs out.
    pub alive: bool,
    pub flight: Option<Flight>,
}

impl Player {
    pub fn new(cell: Cell, food: i32) -> Self {
        Player {
            cell,
            pos: cell.to_vec2(),
            food,
            enabled: true,
            alive: true,
            flight: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: usize,
    pub cell: Cell,
    pub pos: Vec2,
    pub damage: i32,
    /// Set at spawn: the first turn opportunity is a settle tick.
    pub skip_turn: bool,
    pub flight: Option<Flight>,
}

impl Enemy {
    pub fn new(id: usize, cell: Cell, damage: i32) -> Self {
        Enemy {
            id,
            cell,
            pos: cell.to_vec2(),
            damage,
            skip_turn: true,
            flight: None,
        }
    }
}

/// A destructible inner wall. The player chops it down over several turns.
#[derive(Clone, Debug)]
pub struct WallBlock {
    pub cell: Cell,
    pub integrity: i32,
}

impl WallBlock {
    pub fn new(cell: Cell, integrity: i32) -> Self {
        WallBlock { cell, integrity }
    }

    /// Apply chop damage. Returns true once integrity is gone and the
    /// wall should be removed from the board.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        self.integrity -= amount;
        self.integrity <= 0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PickupKind {
    Food,
    Soda,
}

/// A food or soda pickup. Deactivated (not removed) on collection, the
/// way the original disabled the game object.
#[derive(Clone, Debug)]
pub struct Pickup {
    pub cell: Cell,
    pub kind: PickupKind,
    pub value: i32,
    pub active: bool,
}

impl Pickup {
    pub fn new(cell: Cell, kind: PickupKind, value: i32) -> Self {
        Pickup { cell, kind, value, active: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_completes_at_destination() {
        let flight = Flight::new(Cell::new(3, 2), 4);
        let mut pos = Cell::new(2, 2).to_vec2();
        let mut ticks = 0;
        loop {
            let (next, done) = flight.advance(pos);
            pos = next;
            ticks += 1;
            if done {
                break;
            }
            assert!(ticks < 16, "flight never completed");
        }
        assert_eq!(pos, Cell::new(3, 2).to_vec2());
        assert_eq!(ticks, 4);
    }

    #[test]
    fn zero_length_flight_completes_immediately() {
        let flight = Flight::new(Cell::new(2, 2), 4);
        let (pos, done) = flight.advance(Cell::new(2, 2).to_vec2());
        assert!(done);
        assert_eq!(pos, Cell::new(2, 2).to_vec2());
    }

    #[test]
    fn wall_destroyed_at_zero_integrity() {
        let mut wall = WallBlock::new(Cell::new(4, 4), 3);
        assert!(!wall.apply_damage(1));
        assert!(!wall.apply_damage(1));
        assert!(wall.apply_damage(1));
    }

    #[test]
    fn enemy_spawns_with_settle_tick() {
        let enemy = Enemy::new(0, Cell::new(5, 5), 10);
        assert!(enemy.skip_turn);
    }
}
