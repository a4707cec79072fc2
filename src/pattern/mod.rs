pub mod branch;
pub mod connector;
pub mod recolor;
