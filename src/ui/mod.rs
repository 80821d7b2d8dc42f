pub mod cards;
pub mod icons;
pub mod progress;

pub use cards::{render_board, render_tasks};
pub use progress::LaunchProgress;
