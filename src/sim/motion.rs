/// Shared move-attempt / collision-resolution primitive.
///
/// Any actor moves the same way: probe the destination cell one step away
/// against the blocking layer, and either commit an interpolated move
/// (`Flight`) or report what blocked it. Interaction dispatch is by
/// capability tag: the caller names the capability it can interact with,
/// and a blocked outcome carries a typed `Interaction` only when the
/// obstruction exposes that capability. No per-actor-pair special cases.
///
/// The caller performs the occupancy probe (`WorldState::blocker_at`) so
/// this stays a pure state transition over the actor's own cell and
/// flight slot.

use crate::domain::entity::Flight;
use crate::domain::grid::Cell;

/// What the occupancy probe can find in a destination cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Blocker {
    OuterWall,
    /// Index into the world's wall list.
    Wall(usize),
    /// Index into the world's enemy list.
    Enemy(usize),
    Player,
}

/// The interaction an actor is able to trigger when blocked.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Capability {
    Wall,
    Player,
}

/// Typed result of a capability match on the obstruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Interaction {
    Wall(usize),
    Player,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Move committed; an interpolated flight is now active.
    Moved,
    /// Obstructed. Carries the interaction when the obstruction matched
    /// the requested capability.
    Blocked(Option<Interaction>),
    /// Contract violation treated as a no-op: a prior flight is still
    /// interpolating, or the direction was diagonal.
    Ignored,
}

/// Attempt a one-cell move for the actor owning `cell` and `flight`.
///
/// `(dx, dy)` must be an axis-aligned unit vector or zero; callers zero
/// one axis before calling. `hit` is the nearest blocking-layer
/// obstruction at the destination, probed by the caller.
///
/// On commit the logical cell moves immediately (occupancy is claimed up
/// front) while the continuous position follows over the flight's ticks.
pub fn attempt_move(
    cell: &mut Cell,
    flight: &mut Option<Flight>,
    (dx, dy): (i32, i32),
    capability: Capability,
    hit: Option<Blocker>,
    move_duration_ticks: u32,
) -> MoveOutcome {
    debug_assert!(
        dx == 0 || dy == 0,
        "diagonal move attempt ({dx}, {dy}); callers must normalize"
    );
    debug_assert!((-1..=1).contains(&dx) && (-1..=1).contains(&dy));
    if flight.is_some() || (dx != 0 && dy != 0) {
        return MoveOutcome::Ignored;
    }

    match hit {
        None => {
            *cell = cell.offset(dx, dy);
            *flight = Some(Flight::new(*cell, move_duration_ticks));
            MoveOutcome::Moved
        }
        Some(Blocker::Wall(index)) if capability == Capability::Wall => {
            MoveOutcome::Blocked(Some(Interaction::Wall(index)))
        }
        Some(Blocker::Player) if capability == Capability::Player => {
            MoveOutcome::Blocked(Some(Interaction::Player))
        }
        Some(_) => MoveOutcome::Blocked(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_destination_commits_flight() {
        let mut cell = Cell::new(2, 2);
        let mut flight = None;
        let outcome = attempt_move(&mut cell, &mut flight, (1, 0), Capability::Wall, None, 4);
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(cell, Cell::new(3, 2));
        assert_eq!(flight.unwrap().target, Cell::new(3, 2));
    }

    #[test]
    fn blocked_leaves_position_unchanged() {
        let mut cell = Cell::new(2, 2);
        let mut flight = None;
        let outcome = attempt_move(
            &mut cell,
            &mut flight,
            (0, 1),
            Capability::Wall,
            Some(Blocker::OuterWall),
            4,
        );
        assert_eq!(outcome, MoveOutcome::Blocked(None));
        assert_eq!(cell, Cell::new(2, 2));
        assert!(flight.is_none());
    }

    #[test]
    fn matching_capability_yields_typed_interaction() {
        let mut cell = Cell::new(2, 2);
        let mut flight = None;
        let outcome = attempt_move(
            &mut cell,
            &mut flight,
            (1, 0),
            Capability::Wall,
            Some(Blocker::Wall(3)),
            4,
        );
        assert_eq!(outcome, MoveOutcome::Blocked(Some(Interaction::Wall(3))));

        let outcome = attempt_move(
            &mut cell,
            &mut flight,
            (1, 0),
            Capability::Player,
            Some(Blocker::Player),
            4,
        );
        assert_eq!(outcome, MoveOutcome::Blocked(Some(Interaction::Player)));
    }

    #[test]
    fn mismatched_capability_is_a_plain_block() {
        let mut cell = Cell::new(2, 2);
        let mut flight = None;
        // Player probing with the wall capability hits an enemy: no
        // interaction fires.
        let outcome = attempt_move(
            &mut cell,
            &mut flight,
            (1, 0),
            Capability::Wall,
            Some(Blocker::Enemy(0)),
            4,
        );
        assert_eq!(outcome, MoveOutcome::Blocked(None));
    }

    #[test]
    fn attempt_during_flight_is_ignored() {
        let mut cell = Cell::new(3, 2);
        let mut flight = Some(Flight::new(Cell::new(3, 2), 4));
        let outcome = attempt_move(&mut cell, &mut flight, (1, 0), Capability::Wall, None, 4);
        assert_eq!(outcome, MoveOutcome::Ignored);
        assert_eq!(cell, Cell::new(3, 2));
    }

    #[test]
    #[should_panic(expected = "diagonal")]
    fn diagonal_attempt_is_fatal_in_debug() {
        let mut cell = Cell::new(2, 2);
        let mut flight = None;
        let _ = attempt_move(&mut cell, &mut flight, (1, 1), Capability::Wall, None, 4);
    }
}
