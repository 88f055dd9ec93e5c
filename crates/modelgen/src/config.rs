//! Configuration types for modelgen.
//!
//! This module provides configuration structures that control how schemas
//! are interpreted and how the generated source looks. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining naming and output settings.
//! - [`NamingConfig`] - Naming conventions that mark enumerations and simple attributes.
//! - [`OutputConfig`] - Controls the generated source, such as the imported module.
//!
//! # Example
//!
//! ```
//! # use modelgen::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.output().properties_module(), "properties");
//! ```

use serde::Deserialize;

use modelgen_parser::ElaborateConfig;

/// Top-level application configuration combining naming and output settings.
///
/// Groups [`NamingConfig`] and [`OutputConfig`] into a single configuration
/// root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Naming configuration section.
    #[serde(default)]
    naming: NamingConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified naming and output configurations.
    ///
    /// # Arguments
    ///
    /// * `naming` - Naming conventions for schema interpretation.
    /// * `output` - Generated source options.
    pub fn new(naming: NamingConfig, output: OutputConfig) -> Self {
        Self { naming, output }
    }

    /// Returns the naming configuration.
    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

fn default_enumeration_suffixes() -> Vec<String> {
    ElaborateConfig::default().enumeration_suffixes
}

fn default_simple_attribute_stereotype() -> String {
    ElaborateConfig::default().simple_attribute_stereotype
}

/// Naming conventions used to interpret the schema.
#[derive(Debug, Clone, Deserialize)]
pub struct NamingConfig {
    /// Class name suffixes marking enumerations.
    #[serde(default = "default_enumeration_suffixes")]
    enumeration_suffixes: Vec<String>,

    /// Stereotype marking classes folded into string attributes.
    #[serde(default = "default_simple_attribute_stereotype")]
    simple_attribute_stereotype: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        let ElaborateConfig {
            enumeration_suffixes,
            simple_attribute_stereotype,
        } = ElaborateConfig::default();
        Self {
            enumeration_suffixes,
            simple_attribute_stereotype,
        }
    }
}

impl NamingConfig {
    /// Creates a new [`NamingConfig`].
    ///
    /// # Arguments
    ///
    /// * `enumeration_suffixes` - Class name suffixes marking enumerations.
    /// * `simple_attribute_stereotype` - Stereotype marking simple attribute classes.
    pub fn new(enumeration_suffixes: Vec<String>, simple_attribute_stereotype: impl Into<String>) -> Self {
        Self {
            enumeration_suffixes,
            simple_attribute_stereotype: simple_attribute_stereotype.into(),
        }
    }

    /// Returns the enumeration suffixes.
    pub fn enumeration_suffixes(&self) -> &[String] {
        &self.enumeration_suffixes
    }

    /// Returns the simple attribute stereotype name.
    pub fn simple_attribute_stereotype(&self) -> &str {
        &self.simple_attribute_stereotype
    }

    /// The elaboration settings these conventions translate to.
    pub fn elaborate_config(&self) -> ElaborateConfig {
        ElaborateConfig::new(
            self.enumeration_suffixes.clone(),
            self.simple_attribute_stereotype.as_str(),
        )
    }
}

fn default_properties_module() -> String {
    "properties".to_string()
}

/// Options for the generated source.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Module the descriptor functions are imported from.
    #[serde(default = "default_properties_module")]
    properties_module: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            properties_module: default_properties_module(),
        }
    }
}

impl OutputConfig {
    /// Creates a new [`OutputConfig`].
    ///
    /// # Arguments
    ///
    /// * `properties_module` - Module the descriptor functions are imported from.
    pub fn new(properties_module: impl Into<String>) -> Self {
        Self {
            properties_module: properties_module.into(),
        }
    }

    /// Returns the module the descriptor functions are imported from.
    pub fn properties_module(&self) -> &str {
        &self.properties_module
    }
}
