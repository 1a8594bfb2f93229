/// WorldState: the complete snapshot of a running game.
///
/// Owns everything the original kept in scene singletons — board, actors,
/// turn state, RNG — so the game loop passes one value around and there is
/// no hidden global coupling. A new world is built once per run; each day
/// (level) rebuilds the board and entities in place via `start_day`,
/// carrying only the player's food total across.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{BoardConfig, GameConfig, RulesConfig, SpeedConfig};
use crate::domain::entity::{Enemy, Pickup, PickupKind, Player, WallBlock};
use crate::domain::grid::{Board, BoardTile, Cell};
use crate::sim::board::{self, GenerateError, PlacedKind};
use crate::sim::motion::Blocker;
use crate::sim::turn::TurnCoordinator;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    /// "Day N" banner between levels.
    DayIntro,
    Playing,
    GameOver,
}

/// Whose occupancy probe is running; the prober never blocks itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Prober {
    Player,
    Enemy(usize),
}

pub struct WorldState {
    pub board: Board,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub walls: Vec<WallBlock>,
    pub pickups: Vec<Pickup>,
    pub exit: Cell,

    pub turn: TurnCoordinator,
    pub phase: Phase,
    pub day: u32,
    pub tick: u64,
    pub anim_tick: u32,

    /// Ticks until the next day starts, set when the exit is reached.
    pub exit_countdown: Option<u32>,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,

    // ── Config + RNG (owned, passed by reference into generation) ──
    pub board_cfg: BoardConfig,
    pub rules: RulesConfig,
    pub speed: SpeedConfig,
    pub rng: ChaCha8Rng,
}

impl WorldState {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.board.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        WorldState {
            board: Board::new(config.board.columns, config.board.rows),
            player: Player::new(Cell::new(0, 0), config.rules.starting_food),
            enemies: vec![],
            walls: vec![],
            pickups: vec![],
            exit: Cell::new(config.board.columns - 1, config.board.rows - 1),
            turn: TurnCoordinator::new(),
            phase: Phase::Title,
            day: 0,
            tick: 0,
            anim_tick: 0,
            exit_countdown: None,
            message: String::new(),
            message_timer: 0,
            board_cfg: config.board.clone(),
            rules: config.rules.clone(),
            speed: config.speed.clone(),
            rng,
        }
    }

    /// Generate and enter a new day. `carried_food` is the run state the
    /// lifecycle manager threads between levels (a single integer).
    pub fn start_day(&mut self, day: u32, carried_food: i32) -> Result<(), GenerateError> {
        let descriptor = board::generate(day, &self.board_cfg, &mut self.rng)?;

        self.board = Board::new(descriptor.columns, descriptor.rows);
        self.player = Player::new(descriptor.player_start, carried_food);
        self.enemies.clear();
        self.walls.clear();
        self.pickups.clear();

        for placement in &descriptor.placements {
            match placement.kind {
                PlacedKind::Wall => {
                    self.walls
                        .push(WallBlock::new(placement.cell, self.rules.wall_integrity));
                }
                PlacedKind::Food => {
                    self.pickups.push(Pickup::new(
                        placement.cell,
                        PickupKind::Food,
                        self.rules.points_per_food,
                    ));
                }
                PlacedKind::Soda => {
                    self.pickups.push(Pickup::new(
                        placement.cell,
                        PickupKind::Soda,
                        self.rules.points_per_soda,
                    ));
                }
                PlacedKind::Enemy => {
                    // Two enemy tiers, alternating like the original's
                    // prefab pair: odd spawns hit harder.
                    let id = self.enemies.len();
                    let damage = if id % 2 == 1 {
                        self.rules.enemy_damage_heavy
                    } else {
                        self.rules.enemy_damage
                    };
                    self.enemies.push(Enemy::new(id, placement.cell, damage));
                }
                PlacedKind::Exit => self.exit = placement.cell,
            }
        }

        self.cancel_flights();
        self.day = day;
        self.phase = Phase::DayIntro;
        self.anim_tick = 0;
        self.message.clear();
        self.message_timer = 0;
        Ok(())
    }

    /// Cancel every in-flight interpolation and reset turn state. No
    /// partial-move state survives a restart.
    pub fn cancel_flights(&mut self) {
        self.player.flight = None;
        self.player.pos = self.player.cell.to_vec2();
        for enemy in &mut self.enemies {
            enemy.flight = None;
            enemy.pos = enemy.cell.to_vec2();
        }
        self.turn.reset();
        self.exit_countdown = None;
    }

    /// Nearest blocking-layer obstruction at `cell`, for a one-cell probe
    /// by `prober`. Pickups and the exit are overlap triggers, not
    /// blockers; destroyed walls are gone from the list entirely.
    pub fn blocker_at(&self, cell: Cell, prober: Prober) -> Option<Blocker> {
        if self.board.tile(cell) == BoardTile::OuterWall {
            return Some(Blocker::OuterWall);
        }
        if let Some(index) = self.walls.iter().position(|w| w.cell == cell) {
            return Some(Blocker::Wall(index));
        }
        for (index, enemy) in self.enemies.iter().enumerate() {
            if prober == Prober::Enemy(index) {
                continue;
            }
            if enemy.cell == cell {
                return Some(Blocker::Enemy(index));
            }
        }
        if prober != Prober::Player && self.player.cell == cell {
            return Some(Blocker::Player);
        }
        None
    }

    /// Is any actor's interpolated move still in flight?
    pub fn any_flight_active(&self) -> bool {
        self.player.flight.is_some() || self.enemies.iter().any(|e| e.flight.is_some())
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_day_populates_from_descriptor() {
        let mut config = crate::config::GameConfig::load();
        config.board.seed = Some(42);
        let mut world = WorldState::new(&config);
        world.start_day(4, 75).unwrap();

        assert_eq!(world.day, 4);
        assert_eq!(world.phase, Phase::DayIntro);
        assert_eq!(world.player.food, 75);
        assert_eq!(world.player.cell, Cell::new(0, 0));
        assert_eq!(world.exit, Cell::new(7, 7));
        assert_eq!(world.enemies.len(), 2); // floor(log2(4))
        assert!(world.walls.len() >= 5 && world.walls.len() <= 9);
        assert!(!world.pickups.is_empty() && world.pickups.len() <= 5);
    }

    #[test]
    fn enemy_damage_alternates_tiers() {
        let mut config = crate::config::GameConfig::load();
        config.board.seed = Some(9);
        let mut world = WorldState::new(&config);
        world.start_day(8, 100).unwrap(); // 3 enemies
        assert_eq!(world.enemies[0].damage, world.rules.enemy_damage);
        assert_eq!(world.enemies[1].damage, world.rules.enemy_damage_heavy);
        assert_eq!(world.enemies[2].damage, world.rules.enemy_damage);
    }

    #[test]
    fn blocker_probe_skips_the_prober_itself() {
        let mut config = crate::config::GameConfig::load();
        config.board.seed = Some(5);
        let mut world = WorldState::new(&config);
        world.start_day(2, 100).unwrap();

        let enemy_cell = world.enemies[0].cell;
        assert_eq!(world.blocker_at(enemy_cell, Prober::Enemy(0)), None);
        assert_eq!(
            world.blocker_at(enemy_cell, Prober::Player),
            Some(Blocker::Enemy(0))
        );
        assert_eq!(
            world.blocker_at(world.player.cell, Prober::Enemy(0)),
            Some(Blocker::Player)
        );
        assert_eq!(world.blocker_at(world.player.cell, Prober::Player), None);
        assert_eq!(
            world.blocker_at(Cell::new(-1, 0), Prober::Player),
            Some(Blocker::OuterWall)
        );
    }

    #[test]
    fn cancel_flights_resets_partial_moves() {
        let mut config = crate::config::GameConfig::load();
        config.board.seed = Some(1);
        let mut world = WorldState::new(&config);
        world.start_day(2, 100).unwrap();

        world.player.cell = Cell::new(1, 0);
        world.player.flight =
            Some(crate::domain::entity::Flight::new(Cell::new(1, 0), 4));
        world.turn.end_player_cycle();

        world.cancel_flights();
        assert!(world.player.flight.is_none());
        assert_eq!(world.player.pos, Cell::new(1, 0).to_vec2());
        assert_eq!(world.turn.side(), crate::sim::turn::Side::Player);
        assert!(world.exit_countdown.is_none());
    }
}
