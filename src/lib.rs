//! Matchday Bot - Main Library
//!
//! Thin binary-facing layer over the `matchday` library crate: re-exports
//! the core and hosts the helpers shared by executables.

// Re-export the core library for convenience
pub use matchday;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, ConfigType};
}
