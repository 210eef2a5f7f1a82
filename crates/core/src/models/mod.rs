pub mod achievement;
pub mod item;
pub mod size;
