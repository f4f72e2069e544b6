//! Configuration loading
//!
//! Host settings (secret name, rate limits, timeouts, retry and logging)
//! come from environment variables or a JSON/TOML file. Credentials are
//! resolved separately through a secret store.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
