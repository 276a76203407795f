pub mod judge;
pub mod scheduler;
