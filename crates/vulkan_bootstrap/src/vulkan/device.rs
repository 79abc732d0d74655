//! Physical device enumeration and selection
//!
//! Physical devices are neither created nor destroyed here; they exist
//! independently of the program. Selection is first-fit: devices are visited in
//! the order the driver reports them and the first one advertising every
//! required device extension wins. There is no scoring across devices.

use ash::extensions::khr::Swapchain;
use std::fmt;
use std::marker::PhantomData;

use super::capabilities::first_unsupported;
use super::connection::Connection;
use super::driver::{DeviceProperties, Driver};
use super::error::{CapabilityKind, VulkanResult};

/// Device extensions a candidate must advertise to be accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRequirements {
    extensions: Vec<String>,
}

impl DeviceRequirements {
    /// Require exactly the given device extensions
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Presentation support, i.e. the swapchain extension
    pub fn presentation() -> Self {
        Self::new(vec![Swapchain::name().to_string_lossy().into_owned()])
    }

    /// Required extension names
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for DeviceRequirements {
    fn default() -> Self {
        Self::presentation()
    }
}

/// Borrowed reference to a physical device
///
/// Valid only while the connection it was enumerated from is alive.
pub struct PhysicalDeviceHandle<'c, D: Driver> {
    raw: D::PhysicalDevice,
    properties: DeviceProperties,
    _connection: PhantomData<&'c Connection<D>>,
}

impl<'c, D: Driver> PhysicalDeviceHandle<'c, D> {
    pub(crate) fn new(raw: D::PhysicalDevice, properties: DeviceProperties) -> Self {
        Self {
            raw,
            properties,
            _connection: PhantomData,
        }
    }

    /// Native physical device handle
    pub fn raw(&self) -> D::PhysicalDevice {
        self.raw
    }

    /// Properties captured at selection time
    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    /// Driver-reported device name
    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

impl<D: Driver> Clone for PhysicalDeviceHandle<'_, D> {
    fn clone(&self) -> Self {
        Self::new(self.raw, self.properties.clone())
    }
}

impl<D: Driver> fmt::Debug for PhysicalDeviceHandle<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalDeviceHandle")
            .field("raw", &self.raw)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Print out the properties of the given physical device
pub fn log_device_properties(properties: &DeviceProperties) {
    log::info!(
        "Device name: {}\nDevice type: {}",
        properties.name,
        properties.device_type
    );
}

/// Check whether `device` advertises every required extension
pub fn is_suitable<D: Driver>(
    connection: &Connection<D>,
    device: D::PhysicalDevice,
    requirements: &DeviceRequirements,
    verbose: bool,
) -> VulkanResult<bool> {
    if verbose {
        log::info!("Checking if device is suitable");
        let mut message = String::from("We are requesting device extensions:\n");
        for name in requirements.extensions() {
            message.push_str(&format!("\t\"{}\"\n", name));
        }
        log::info!("{}", message);
    }

    let available = connection.driver().device_extensions(connection.instance(), device)?;

    if verbose {
        let mut message = String::from("Device can support extensions:\n");
        for name in &available {
            message.push_str(&format!("\t\"{}\"\n", name));
        }
        log::info!("{}", message);
    }

    let missing = first_unsupported(
        requirements.extensions(),
        &available,
        CapabilityKind::DeviceExtension,
        verbose,
    );

    if verbose {
        if missing.is_none() {
            log::info!("Device can support the requested extensions!");
        } else {
            log::info!("Device can't support the requested extensions!");
        }
    }

    Ok(missing.is_none())
}

/// Choose the first suitable physical device
///
/// Zero devices, or no suitable device, yields `Ok(None)`; only failing
/// driver queries are errors.
pub fn select_physical_device<'c, D: Driver>(
    connection: &'c Connection<D>,
    requirements: &DeviceRequirements,
    verbose: bool,
) -> VulkanResult<Option<PhysicalDeviceHandle<'c, D>>> {
    if verbose {
        log::info!("Choosing Physical Device");
    }

    let driver = connection.driver();
    let devices = driver.physical_devices(connection.instance())?;

    if verbose {
        log::info!(
            "There are {} physical devices available on this system",
            devices.len()
        );
    }

    for device in devices {
        let properties = driver.device_properties(connection.instance(), device);
        if verbose {
            log_device_properties(&properties);
        }
        if is_suitable(connection, device, requirements, verbose)? {
            log::info!("Selected GPU: {}", properties.name);
            return Ok(Some(PhysicalDeviceHandle::new(device, properties)));
        }
    }

    Ok(None)
}
