pub mod beat;
pub mod clock;
