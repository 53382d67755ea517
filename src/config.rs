//! Configuration for protomarshal
//!
//! Centralized codec configuration with sensible defaults.

use crate::error::{ProtoError, Result};

/// Default upper bound for variable-length spans (64 KiB)
pub const DEFAULT_MAX_VARIABLE_LENGTH: usize = 64 * 1024;

/// Configuration for a [`Marshaller`](crate::Marshaller)
#[derive(Debug, Clone)]
pub struct CodecConfig {
    // -------------------------------------------------------------------------
    // Decode Configuration
    // -------------------------------------------------------------------------
    /// Build a parse tree alongside every decoded record
    pub capture_parse_tree: bool,

    /// Largest span a length-prefixed, separator-terminated or
    /// all-remaining field may occupy (in bytes)
    pub max_variable_length: usize,

    // -------------------------------------------------------------------------
    // Schema Configuration
    // -------------------------------------------------------------------------
    /// Cache resolved field plans per (record type, version)
    pub cache_plans: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            capture_parse_tree: false,
            max_variable_length: DEFAULT_MAX_VARIABLE_LENGTH,
            cache_plans: true,
        }
    }
}

impl CodecConfig {
    /// Create a new config builder
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }
}

/// Builder for CodecConfig
#[derive(Default)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    /// Build a parse tree on every decode
    pub fn capture_parse_tree(mut self, enabled: bool) -> Self {
        self.config.capture_parse_tree = enabled;
        self
    }

    /// Set the maximum variable-length span (in bytes)
    pub fn max_variable_length(mut self, bytes: usize) -> Self {
        self.config.max_variable_length = bytes;
        self
    }

    /// Enable or disable the resolved plan cache
    pub fn cache_plans(mut self, enabled: bool) -> Self {
        self.config.cache_plans = enabled;
        self
    }

    pub fn build(self) -> Result<CodecConfig> {
        if self.config.max_variable_length == 0 {
            return Err(ProtoError::Config(
                "max_variable_length must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}
