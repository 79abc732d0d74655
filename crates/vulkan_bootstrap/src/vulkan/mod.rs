//! Vulkan bootstrap components
//!
//! Leaf-first: capability negotiation, the connection factory, the debug
//! channel and physical device selection. [`crate::session`] composes them.

pub mod ash_driver;
pub mod capabilities;
pub mod connection;
pub mod debug;
pub mod device;
pub mod driver;
pub mod error;

#[cfg(test)]
pub(crate) mod mock;

pub use ash_driver::{AshDriver, AshInstance, AshMessenger};
pub use capabilities::{negotiate, CapabilityReport, CapabilityRequest};
pub use connection::{create_connection, target_api_version, Connection, DEBUG_UTILS_EXTENSION};
pub use debug::DebugChannel;
pub use device::{is_suitable, select_physical_device, DeviceRequirements, PhysicalDeviceHandle};
pub use driver::{ApiVersion, DeviceProperties, DeviceType, Driver, InstanceDescriptor};
pub use error::{CapabilityKind, VulkanError, VulkanResult};
