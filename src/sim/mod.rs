pub mod board;
pub mod event;
pub mod motion;
pub mod step;
pub mod turn;
pub mod world;
