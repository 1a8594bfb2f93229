/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and HUD flashes; the
/// core only decides when something happened, never how it is shown.

use crate::domain::grid::Cell;

#[derive(Clone, Debug)]
pub enum GameEvent {
    PlayerMoved,
    /// Player chopped a wall; `destroyed` once its integrity ran out.
    WallChopped { cell: Cell, destroyed: bool },
    FoodPicked { value: i32, total: i32 },
    SodaPicked { value: i32, total: i32 },
    /// An enemy landed a hit on the player.
    EnemyAttacked { damage: i32 },
    /// Player reached the exit; next level starts after the delay.
    ExitReached,
    DayComplete { day: u32 },
    GameOver { days_survived: u32 },
}
