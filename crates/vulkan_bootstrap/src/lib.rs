//! # Vulkan Bootstrap
//!
//! Session bootstrap for a Vulkan application: capability negotiation with the
//! driver, instance creation, a debug messenger bound to the instance, and
//! first-fit physical device selection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use vulkan_bootstrap::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BootstrapConfig::new("My App").with_auto_validation();
//!     let driver = Rc::new(AshDriver::load()?);
//!
//!     // Extensions the windowing layer needs, e.g. from GLFW
//!     let window_extensions = vec!["VK_KHR_surface".to_string()];
//!
//!     let session = Session::start(&driver, &config, &window_extensions)?;
//!     if let Some(device) = session.physical_device() {
//!         println!("Using {}", device.name());
//!     }
//!     session.shutdown()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod session;
pub mod vulkan;

#[cfg(test)]
mod tests;

pub use session::Session;
pub use vulkan::{VulkanError, VulkanResult};

/// Common imports for bootstrap users
pub mod prelude {
    pub use crate::{
        core::config::{BootstrapConfig, Config, ConfigError},
        session::Session,
        vulkan::{
            ApiVersion, AshDriver, CapabilityReport, CapabilityRequest, Connection, DebugChannel,
            DeviceProperties, DeviceRequirements, DeviceType, Driver, PhysicalDeviceHandle,
            VulkanError, VulkanResult,
        },
    };
}
