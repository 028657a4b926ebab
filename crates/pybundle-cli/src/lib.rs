//! pybundle library - expose modules for testing
//!
//! The binary in `main.rs` is a thin clap front end over these modules.

pub mod bundle;
pub mod commands;
pub mod common;
pub mod errors;
pub mod requirements;
pub mod toolchain;

pub use common::GlobalOpts;
pub use pybundle_config as config_manager;
pub use pybundle_logger as logger;
