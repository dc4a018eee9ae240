pub mod plan;
pub mod tool;
pub mod types;
