pub mod feedback;
pub mod mode;
pub mod state;
pub mod stats;
