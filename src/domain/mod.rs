pub mod bolt;
pub mod element;
pub mod geometry;
pub mod path;
