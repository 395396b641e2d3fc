//! Configuration module for mschema.
//!
//! Handles the config file, environment variable expansion and defaults
//! for rendering, introspection and caching.

mod settings;

pub use settings::{
    expand_env_vars, CacheSettings, IntrospectSettings, RenderSettings, Settings, SettingsError,
};
