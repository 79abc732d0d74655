//! Session controller
//!
//! The composition root of the bootstrap: negotiate, create the connection,
//! attach the debug channel, select a physical device. A [`Session`] owns the
//! connection and the channel exclusively and tears them down in reverse
//! order. Each session is explicitly constructed; there is no global state.

use std::rc::Rc;

use crate::core::config::BootstrapConfig;
use crate::vulkan::connection::{create_connection, Connection};
use crate::vulkan::debug::DebugChannel;
use crate::vulkan::device::{select_physical_device, PhysicalDeviceHandle};
use crate::vulkan::driver::{ApiVersion, DeviceProperties, Driver};
use crate::vulkan::error::{VulkanError, VulkanResult};

struct SelectedDevice<D: Driver> {
    raw: D::PhysicalDevice,
    properties: DeviceProperties,
}

/// A started Vulkan session
///
/// Field order matters: the debug channel is dropped before the connection.
pub struct Session<D: Driver> {
    debug_channel: Option<DebugChannel<D>>,
    selected: Option<SelectedDevice<D>>,
    connection: Connection<D>,
    debug_enabled: bool,
}

impl<D: Driver> Session<D> {
    /// Run the bootstrap sequence
    ///
    /// `window_extensions` is whatever the windowing layer requires for surface
    /// creation. Fails if the connection cannot be created, or if no device is
    /// suitable and the configuration requires one; anything acquired before
    /// the failure is released.
    pub fn start(driver: &Rc<D>, config: &BootstrapConfig, window_extensions: &[String]) -> VulkanResult<Self> {
        let debug_enabled = config.validation_enabled();
        if debug_enabled {
            log::info!("Starting Vulkan session for \"{}\"", config.application_name);
        }

        let connection = create_connection(driver, config, window_extensions, debug_enabled).map_err(|e| {
            log::error!("Session startup failed: {}", e);
            e
        })?;

        let debug_channel = DebugChannel::attach(&connection, debug_enabled)?;

        let selected = select_physical_device(&connection, &config.device_requirements(), debug_enabled)?
            .map(|handle| SelectedDevice {
                raw: handle.raw(),
                properties: handle.properties().clone(),
            });

        if selected.is_none() {
            if config.require_suitable_device {
                log::error!("No suitable GPU found; aborting session startup");
                return Err(VulkanError::NoSuitableDevice);
            }
            log::warn!("No suitable GPU found; session started without a device");
        }

        Ok(Self {
            debug_channel,
            selected,
            connection,
            debug_enabled,
        })
    }

    /// The session's connection
    pub fn connection(&self) -> &Connection<D> {
        &self.connection
    }

    /// Whether validation and the debug channel were requested
    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Whether a debug channel is attached
    pub fn has_debug_channel(&self) -> bool {
        self.debug_channel.is_some()
    }

    /// API version the connection targets
    pub fn api_version(&self) -> ApiVersion {
        self.connection.api_version()
    }

    /// The selected physical device, if any was suitable
    pub fn physical_device(&self) -> Option<PhysicalDeviceHandle<'_, D>> {
        self.selected
            .as_ref()
            .map(|device| PhysicalDeviceHandle::new(device.raw, device.properties.clone()))
    }

    /// The selected physical device, or `NoSuitableDevice`
    pub fn require_physical_device(&self) -> VulkanResult<PhysicalDeviceHandle<'_, D>> {
        self.physical_device().ok_or(VulkanError::NoSuitableDevice)
    }

    /// Detach the debug channel, then destroy the connection
    pub fn shutdown(self) -> VulkanResult<()> {
        let Self {
            debug_channel,
            connection,
            ..
        } = self;

        if let Some(channel) = debug_channel {
            channel.detach();
        }
        connection.destroy()?;

        log::info!("Vulkan session shut down");
        Ok(())
    }
}
