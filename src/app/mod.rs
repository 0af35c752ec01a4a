pub mod elements;
pub mod events;
pub mod state;
