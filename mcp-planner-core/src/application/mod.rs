pub mod agent;
pub mod client;
pub mod registry;
