/// Alternating-turn state for one level.
///
/// Owned by the world and passed by reference wherever turn gating is
/// needed — there is no global turn flag. The player's cycle completing
/// (moved or blocked, either way) hands the turn to the enemies; once
/// every registered enemy has had one opportunity, in registration order,
/// the turn returns to the player. Those are the only transitions.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Player,
    Enemies,
}

#[derive(Clone, Debug)]
pub struct TurnCoordinator {
    side: Side,
    /// Next enemy (by registration index) to get an opportunity.
    cursor: usize,
}

impl TurnCoordinator {
    pub fn new() -> Self {
        TurnCoordinator { side: Side::Player, cursor: 0 }
    }

    /// Back to the initial state. Called at level start and on restart.
    pub fn reset(&mut self) {
        self.side = Side::Player;
        self.cursor = 0;
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// The player's move-attempt cycle finished: enemies are up.
    pub fn end_player_cycle(&mut self) {
        debug_assert_eq!(self.side, Side::Player);
        self.side = Side::Enemies;
        self.cursor = 0;
    }

    /// Hand out the next enemy opportunity. Returns the enemy index, or
    /// flips back to the player once all `enemy_total` have gone (which
    /// is immediate when no enemies are registered).
    pub fn next_enemy(&mut self, enemy_total: usize) -> Option<usize> {
        debug_assert_eq!(self.side, Side::Enemies);
        if self.cursor < enemy_total {
            let index = self.cursor;
            self.cursor += 1;
            Some(index)
        } else {
            self.side = Side::Player;
            self.cursor = 0;
            None
        }
    }
}

impl Default for TurnCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
