//! # Bootstrap Configuration
//!
//! Application identity, API baseline and debug settings used when a session
//! negotiates with the driver. Loadable from TOML or RON through [`Config`].

use ash::vk;
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::vulkan::device::DeviceRequirements;
use crate::vulkan::driver::ApiVersion;

/// Validation layer requested in debug sessions
pub const KHRONOS_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// # Session Bootstrap Configuration
///
/// Everything the session controller needs besides the windowing extension
/// list, which comes from the windowing layer at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Engine name for Vulkan instance creation
    pub engine_name: String,
    /// Engine version (major, minor, patch)
    pub engine_version: (u32, u32, u32),
    /// Highest API version (major, minor) the instance may target
    pub api_baseline: (u32, u32),
    /// Whether to enable validation; `None` follows the build type
    pub enable_validation: Option<bool>,
    /// Validation layer requested when validation is enabled
    pub validation_layer: String,
    /// Device extensions a physical device must advertise
    pub required_device_extensions: Vec<String>,
    /// Fail session start when no device is suitable
    pub require_suitable_device: bool,
    /// Log level for the binary's logger
    pub log_level: String,
}

impl BootstrapConfig {
    /// Create a new configuration with defaults
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            application_version: (1, 0, 0),
            engine_name: "Doing it the hard way".to_string(),
            engine_version: (1, 0, 0),
            api_baseline: (1, 0),
            enable_validation: None, // Auto-detect based on build type
            validation_layer: KHRONOS_VALIDATION_LAYER.to_string(),
            required_device_extensions: DeviceRequirements::presentation().extensions().to_vec(),
            require_suitable_device: false,
            log_level: "info".to_string(),
        }
    }

    /// Set application version
    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.application_version = (major, minor, patch);
        self
    }

    /// Set engine name and version
    pub fn with_engine(mut self, name: impl Into<String>, major: u32, minor: u32, patch: u32) -> Self {
        self.engine_name = name.into();
        self.engine_version = (major, minor, patch);
        self
    }

    /// Set the API baseline
    pub fn with_api_baseline(mut self, major: u32, minor: u32) -> Self {
        self.api_baseline = (major, minor);
        self
    }

    /// Enable or disable validation layers
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = Some(enabled);
        self
    }

    /// Enables validation in debug builds and disables it in release builds
    pub fn with_auto_validation(mut self) -> Self {
        self.enable_validation = Some(cfg!(debug_assertions));
        self
    }

    /// Replace the required device extension list
    pub fn with_device_extensions(mut self, extensions: Vec<String>) -> Self {
        self.required_device_extensions = extensions;
        self
    }

    /// Treat a missing suitable device as a startup failure
    pub fn with_required_device(mut self, required: bool) -> Self {
        self.require_suitable_device = required;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Whether this session should request validation and a debug messenger
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }

    /// Baseline as a packed API version
    pub fn api_baseline(&self) -> ApiVersion {
        ApiVersion::new(0, self.api_baseline.0, self.api_baseline.1, 0)
    }

    /// Packed application version
    pub fn packed_application_version(&self) -> u32 {
        let (major, minor, patch) = self.application_version;
        vk::make_api_version(0, major, minor, patch)
    }

    /// Packed engine version
    pub fn packed_engine_version(&self) -> u32 {
        let (major, minor, patch) = self.engine_version;
        vk::make_api_version(0, major, minor, patch)
    }

    /// Device suitability requirements
    pub fn device_requirements(&self) -> DeviceRequirements {
        DeviceRequirements::new(self.required_device_extensions.clone())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid("Application name cannot be empty".to_string()));
        }

        if self.application_name.contains('\0') || self.engine_name.contains('\0') {
            return Err(ConfigError::Invalid("Names cannot contain NUL bytes".to_string()));
        }

        if self.api_baseline.0 == 0 {
            return Err(ConfigError::Invalid("API baseline must be at least 1.0".to_string()));
        }

        if self.validation_layer.is_empty() {
            return Err(ConfigError::Invalid("Validation layer name cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self::new("Vulkan Bootstrap Application")
    }
}

impl Config for BootstrapConfig {}
