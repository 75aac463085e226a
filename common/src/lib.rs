pub mod config;
pub mod defaults;
pub mod games;
pub mod id_generator;
pub mod identifiers;
pub mod logger;

pub use identifiers::*;
