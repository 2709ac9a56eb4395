//! Configuration loading, validation and env substitution.
//!
//! Config files: `roster.toml`, `roster.yaml` or `roster.json`,
//! searched in `./` then `~/.config/roster/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{
        apply_env_overrides, config_dir, discover_and_load, find_or_default_config_path,
        load_config, set_config_dir,
    },
    schema::{AuthConfig, RosterConfig, ServerConfig, StorageBackend, StorageConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
