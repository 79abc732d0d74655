//! Vulkan bootstrap error types

use ash::vk;
use std::fmt;
use thiserror::Error;

/// Which capability list a negotiation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    /// Instance-level extensions
    Extension,
    /// Instance-level layers
    Layer,
    /// Device-level extensions
    DeviceExtension,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension => write!(f, "Extension"),
            Self::Layer => write!(f, "Layer"),
            Self::DeviceExtension => write!(f, "Device extension"),
        }
    }
}

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// A requested extension or layer is not advertised by the driver
    #[error("{kind} \"{name}\" is not supported")]
    CapabilitiesUnsupported {
        /// Whether the missing item was an extension or a layer
        kind: CapabilityKind,
        /// The first requested name the driver does not advertise
        name: String,
    },

    /// The driver rejected a creation call
    #[error("Native creation failed: {0:?}")]
    NativeCreationFailed(vk::Result),

    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// The Vulkan loader library could not be opened
    #[error("Vulkan loader unavailable: {0}")]
    LoaderUnavailable(String),

    /// Enumeration succeeded but no device matched the suitability predicate
    #[error("No suitable GPU found")]
    NoSuitableDevice,

    /// A connection was destroyed while a debug channel still referenced it
    #[error("Connection destroyed with {dependents} debug channel(s) still attached")]
    LifecycleOrderViolation {
        /// Number of channels still holding the connection
        dependents: usize,
    },

    /// A name handed to the driver contained an interior NUL byte
    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_the_item() {
        let err = VulkanError::CapabilitiesUnsupported {
            kind: CapabilityKind::Layer,
            name: "VK_LAYER_KHRONOS_validation".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Layer \"VK_LAYER_KHRONOS_validation\" is not supported"
        );
    }

    #[test]
    fn test_native_failure_is_distinct_from_unsupported() {
        let err = VulkanError::NativeCreationFailed(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        assert!(matches!(err, VulkanError::NativeCreationFailed(_)));
        assert!(err.to_string().contains("ERROR_OUT_OF_HOST_MEMORY"));
    }
}
