// Library root — exposes internals for integration tests and the binary.
// The binary entry point is src/main.rs.

pub mod bootstrap;
pub mod codegen;
pub mod core;
pub mod llm;
pub mod server;

pub use crate::bootstrap::logger;
pub use crate::core::{config, error};
