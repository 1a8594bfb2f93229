/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Message timer
///   2. Exit countdown (day rollover)
///   3. In-flight interpolations (player arrival resolves overlaps)
///   4. Turn dispatch: the active side's one move-attempt cycle
///
/// The countdown runs before flight resolution so that the tick on which
/// the player lands on the exit does not already consume a countdown tick.
///
/// Turn cycles resolve instantly (probe + policy), but the committed move
/// plays out as a `Flight` over the following ticks. Enemy opportunities
/// are held back while any flight is active, so actors resolve strictly
/// one after another even though their motion is smooth.

use crate::domain::ai;
use crate::domain::entity::MoveDir;
use crate::domain::grid::Cell;
use crate::sim::event::GameEvent;
use crate::sim::motion::{self, Capability, Interaction, MoveOutcome};
use crate::sim::turn::Side;
use crate::sim::world::{Phase, Prober, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: Option<MoveDir>) -> Vec<GameEvent> {
    if world.phase != Phase::Playing {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;
    world.anim_tick = world.anim_tick.wrapping_add(1);

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 {
            world.message.clear();
        }
    }

    resolve_exit_countdown(world, &mut events);
    resolve_flights(world, &mut events);
    resolve_turns(world, input, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// In-flight moves
// ══════════════════════════════════════════════════════════════

fn resolve_flights(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if let Some(flight) = world.player.flight {
        let (pos, done) = flight.advance(world.player.pos);
        world.player.pos = pos;
        if done {
            world.player.flight = None;
            resolve_player_overlaps(world, events);
        }
    }

    for i in 0..world.enemies.len() {
        if let Some(flight) = world.enemies[i].flight {
            let (pos, done) = flight.advance(world.enemies[i].pos);
            world.enemies[i].pos = pos;
            if done {
                world.enemies[i].flight = None;
            }
        }
    }
}

/// Overlap triggers fire when the player comes to rest on a cell: pickups
/// and the exit are not part of the blocking layer, so the line probe
/// never sees them.
fn resolve_player_overlaps(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let cell = world.player.cell;

    if let Some(index) = world
        .pickups
        .iter()
        .position(|p| p.active && p.cell == cell)
    {
        let value = world.pickups[index].value;
        world.pickups[index].active = false;
        world.player.food += value;
        let total = world.player.food;
        world.set_message(&format!("+{value} Food: {total}"), 40);
        match world.pickups[index].kind {
            crate::domain::entity::PickupKind::Food => {
                events.push(GameEvent::FoodPicked { value, total });
            }
            crate::domain::entity::PickupKind::Soda => {
                events.push(GameEvent::SodaPicked { value, total });
            }
        }
    }

    if cell == world.exit && world.exit_countdown.is_none() {
        world.player.enabled = false;
        world.exit_countdown = Some(world.rules.restart_delay_ticks);
        events.push(GameEvent::ExitReached);
    }
}

fn resolve_exit_countdown(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if let Some(remaining) = world.exit_countdown {
        if remaining == 0 {
            world.exit_countdown = None;
            events.push(GameEvent::DayComplete { day: world.day });
        } else {
            world.exit_countdown = Some(remaining - 1);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Turn dispatch
// ══════════════════════════════════════════════════════════════

fn resolve_turns(world: &mut WorldState, input: Option<MoveDir>, events: &mut Vec<GameEvent>) {
    match world.turn.side() {
        Side::Player => {
            // Input outside the player's turn never reaches here, and a
            // still-interpolating move swallows fresh input.
            if !world.player.alive || !world.player.enabled {
                return;
            }
            if world.player.flight.is_some() {
                return;
            }
            if let Some(dir) = input {
                player_cycle(world, dir, events);
            }
        }
        Side::Enemies => {
            // One opportunity per tick, in registration order, and only
            // once the previous actor has come to rest.
            if world.any_flight_active() {
                return;
            }
            let total = world.enemies.len();
            if let Some(index) = world.turn.next_enemy(total) {
                enemy_cycle(world, index, events);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Player policy
// ══════════════════════════════════════════════════════════════

fn player_cycle(world: &mut WorldState, dir: MoveDir, events: &mut Vec<GameEvent>) {
    // Every attempt costs food, before and regardless of the outcome.
    world.player.food -= world.rules.move_cost;
    let total = world.player.food;
    world.set_message(&format!("Food: {total}"), 40);

    let (dx, dy) = dir.delta();
    let destination = world.player.cell.offset(dx, dy);
    let hit = world.blocker_at(destination, Prober::Player);
    let move_ticks = world.speed.move_duration_ticks;

    let player = &mut world.player;
    let outcome = motion::attempt_move(
        &mut player.cell,
        &mut player.flight,
        (dx, dy),
        Capability::Wall,
        hit,
        move_ticks,
    );

    match outcome {
        MoveOutcome::Moved => events.push(GameEvent::PlayerMoved),
        MoveOutcome::Blocked(Some(Interaction::Wall(index))) => {
            chop_wall(world, index, events);
        }
        MoveOutcome::Blocked(_) | MoveOutcome::Ignored => {}
    }

    check_game_over(world, events);
    if world.phase == Phase::Playing {
        world.turn.end_player_cycle();
    }
}

fn chop_wall(world: &mut WorldState, index: usize, events: &mut Vec<GameEvent>) {
    let damage = world.rules.wall_damage;
    let cell = world.walls[index].cell;
    let destroyed = world.walls[index].apply_damage(damage);
    if destroyed {
        // The obstacle collaborator owns the wall's lifecycle; here it is
        // simply gone from the blocking layer.
        let _ = world.walls.remove(index);
    }
    events.push(GameEvent::WallChopped { cell, destroyed });
}

/// Food at or below zero ends the run. Fires exactly once: the `alive`
/// flag makes a second trigger a no-op.
fn check_game_over(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.player.alive && world.player.food <= 0 {
        world.player.alive = false;
        world.phase = Phase::GameOver;
        events.push(GameEvent::GameOver { days_survived: world.day });
    }
}

// ══════════════════════════════════════════════════════════════
// Enemy policy
// ══════════════════════════════════════════════════════════════

fn enemy_cycle(world: &mut WorldState, index: usize, events: &mut Vec<GameEvent>) {
    if world.enemies[index].skip_turn {
        // Settle tick: the opportunity right after spawning is skipped.
        world.enemies[index].skip_turn = false;
        return;
    }

    let (dx, dy) = ai::chase_direction(world.enemies[index].pos, world.player.pos);
    let destination = world.enemies[index].cell.offset(dx, dy);
    let hit = world.blocker_at(destination, Prober::Enemy(index));
    let move_ticks = world.speed.move_duration_ticks;

    let enemy = &mut world.enemies[index];
    let outcome = motion::attempt_move(
        &mut enemy.cell,
        &mut enemy.flight,
        (dx, dy),
        Capability::Player,
        hit,
        move_ticks,
    );

    if let MoveOutcome::Blocked(Some(Interaction::Player)) = outcome {
        let damage = world.enemies[index].damage;
        world.player.food -= damage;
        let total = world.player.food;
        world.set_message(&format!("-{damage} Food: {total}"), 40);
        events.push(GameEvent::EnemyAttacked { damage });
        check_game_over(world, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Enemy, Pickup, PickupKind, WallBlock};
    use crate::sim::world::WorldState;

    /// A world with a fixed layout: known board, no generated clutter.
    fn bare_world() -> WorldState {
        let mut config = crate::config::GameConfig::load();
        config.board.seed = Some(0);
        let mut world = WorldState::new(&config);
        world.start_day(1, 100).unwrap();
        world.walls.clear();
        world.pickups.clear();
        world.enemies.clear();
        world.phase = Phase::Playing;
        world
    }

    fn run_until_at_rest(world: &mut WorldState) -> Vec<GameEvent> {
        let mut events = vec![];
        let mut guard = 0;
        while world.any_flight_active() {
            events.extend(step(world, None));
            guard += 1;
            assert!(guard < 64, "flight never settled");
        }
        events
    }

    #[test]
    fn plain_move_costs_exactly_the_move_cost() {
        let mut world = bare_world();
        let before = world.player.food;

        let events = step(&mut world, Some(MoveDir::Right));
        assert!(matches!(events[..], [GameEvent::PlayerMoved]));
        assert_eq!(world.player.food, before - world.rules.move_cost);
        assert_eq!(world.player.cell, Cell::new(1, 0));
        assert_eq!(world.turn.side(), Side::Enemies);

        run_until_at_rest(&mut world);
        assert_eq!(world.player.pos, Cell::new(1, 0).to_vec2());
    }

    #[test]
    fn input_outside_player_turn_has_no_effect() {
        let mut world = bare_world();
        world.turn.end_player_cycle(); // enemies' turn, none registered
        let before = world.player.food;

        let events = step(&mut world, Some(MoveDir::Right));
        assert!(events.is_empty());
        assert_eq!(world.player.food, before);
        assert_eq!(world.player.cell, Cell::new(0, 0));
        // The empty enemy phase flips straight back.
        assert_eq!(world.turn.side(), Side::Player);
    }

    #[test]
    fn input_during_flight_is_swallowed() {
        let mut world = bare_world();
        let _ = step(&mut world, Some(MoveDir::Right));
        world.turn.reset(); // force player side while still in flight
        let before = world.player.food;

        let _ = step(&mut world, Some(MoveDir::Right));
        assert_eq!(world.player.food, before, "no second cycle mid-flight");
    }

    #[test]
    fn blocked_by_outer_wall_still_costs_and_flips_turn() {
        let mut world = bare_world();
        let before = world.player.food;

        let events = step(&mut world, Some(MoveDir::Down)); // off the board
        assert!(events.is_empty());
        assert_eq!(world.player.cell, Cell::new(0, 0));
        assert_eq!(world.player.food, before - world.rules.move_cost);
        assert_eq!(world.turn.side(), Side::Enemies);
    }

    #[test]
    fn chopping_destroys_a_wall_over_turns() {
        let mut world = bare_world();
        world.walls.push(WallBlock::new(Cell::new(1, 0), 2));

        let events = step(&mut world, Some(MoveDir::Right));
        assert!(matches!(
            events[..],
            [GameEvent::WallChopped { destroyed: false, .. }]
        ));
        assert_eq!(world.player.cell, Cell::new(0, 0));
        assert_eq!(world.walls[0].integrity, 1);

        // Empty enemy phase, then chop again.
        let _ = step(&mut world, None);
        let events = step(&mut world, Some(MoveDir::Right));
        assert!(matches!(
            events[..],
            [GameEvent::WallChopped { destroyed: true, .. }]
        ));
        assert!(world.walls.is_empty());
    }

    #[test]
    fn pickup_on_arrival_adds_food_and_deactivates() {
        let mut world = bare_world();
        world
            .pickups
            .push(Pickup::new(Cell::new(1, 0), PickupKind::Soda, 20));
        let before = world.player.food;

        let _ = step(&mut world, Some(MoveDir::Right));
        let events = run_until_at_rest(&mut world);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::SodaPicked { value: 20, .. })));
        assert_eq!(world.player.food, before - world.rules.move_cost + 20);
        assert!(!world.pickups[0].active);
    }

    #[test]
    fn exit_overlap_schedules_day_rollover_and_disables_player() {
        let mut world = bare_world();
        world.exit = Cell::new(1, 0);
        world.rules.restart_delay_ticks = 3;

        let _ = step(&mut world, Some(MoveDir::Right));
        let events = run_until_at_rest(&mut world);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ExitReached)));
        assert!(!world.player.enabled);
        assert_eq!(world.exit_countdown, Some(3));

        // Disabled player: further input is dead while the countdown runs.
        let mut complete = false;
        for _ in 0..8 {
            let events = step(&mut world, Some(MoveDir::Right));
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::DayComplete { day: 1 }))
            {
                complete = true;
                break;
            }
        }
        assert!(complete);
        assert_eq!(world.player.cell, Cell::new(1, 0));
    }

    #[test]
    fn enemy_skips_settle_tick_then_chases() {
        let mut world = bare_world();
        world.enemies.push(Enemy::new(0, Cell::new(3, 0), 10));

        // Player moves right; enemy's first opportunity is the settle tick.
        let _ = step(&mut world, Some(MoveDir::Right));
        run_until_at_rest(&mut world);
        let _ = step(&mut world, None); // settle: enemy stays put
        assert_eq!(world.enemies[0].cell, Cell::new(3, 0));
        let _ = step(&mut world, None); // phase flips back to player
        assert_eq!(world.turn.side(), Side::Player);

        // Next round the enemy steps toward the player along x.
        let _ = step(&mut world, Some(MoveDir::Up));
        run_until_at_rest(&mut world);
        let _ = step(&mut world, None);
        assert_eq!(world.enemies[0].cell, Cell::new(2, 0));
    }

    #[test]
    fn adjacent_enemy_attacks_instead_of_moving() {
        let mut world = bare_world();
        let mut enemy = Enemy::new(0, Cell::new(1, 0), 10);
        enemy.skip_turn = false;
        world.enemies.push(enemy);
        let before = world.player.food;

        // Burn the player turn against the outer wall, then let the enemy go.
        let _ = step(&mut world, Some(MoveDir::Down));
        let events = step(&mut world, None);
        assert!(matches!(events[..], [GameEvent::EnemyAttacked { damage: 10 }]));
        assert_eq!(world.enemies[0].cell, Cell::new(1, 0), "attacker stays put");
        assert_eq!(world.player.food, before - world.rules.move_cost - 10);
    }

    #[test]
    fn starving_ends_the_run_exactly_once() {
        let mut world = bare_world();
        world.player.food = 1;

        let events = step(&mut world, Some(MoveDir::Right));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { days_survived: 1 })));
        assert_eq!(world.phase, Phase::GameOver);
        assert!(!world.player.alive);

        // A second step is a no-op: the phase gate holds and no second
        // game-over fires.
        let events = step(&mut world, Some(MoveDir::Right));
        assert!(events.is_empty());
    }

    #[test]
    fn restart_cancels_in_flight_moves() {
        let mut world = bare_world();
        let _ = step(&mut world, Some(MoveDir::Right));
        assert!(world.player.flight.is_some());

        world.cancel_flights();
        assert!(!world.any_flight_active());
        assert_eq!(world.turn.side(), Side::Player);
        assert_eq!(world.player.pos, world.player.cell.to_vec2());
    }
}
