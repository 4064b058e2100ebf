pub mod judge;
pub mod score;
pub mod session;
pub mod snapshot;

pub use judge::{JudgeWindows, Judgment};
pub use score::SessionStats;
pub use session::{Game, GameState, SessionNote};
pub use snapshot::{GameSnapshot, NoteView};
