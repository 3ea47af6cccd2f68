pub mod config;
pub mod distance;
pub mod drivers;
pub mod error;
pub mod factory;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod render;
pub mod robot;
