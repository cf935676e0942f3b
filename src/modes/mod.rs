pub mod game;
pub mod pose;
pub mod run;

pub use game::GameMode;
pub use pose::PoseMode;
pub use run::RunMode;
