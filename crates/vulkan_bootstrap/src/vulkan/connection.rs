//! Connection factory and the owning instance wrapper
//!
//! A [`Connection`] owns the native instance. The instance itself sits behind a
//! reference count shared with every [`DebugChannel`] attached to it, so the
//! driver's destroy call cannot run while a channel still references the
//! instance, whatever order the owners are dropped in.
//!
//! [`DebugChannel`]: super::debug::DebugChannel

use std::rc::Rc;

use super::capabilities::{negotiate, CapabilityRequest};
use super::driver::{ApiVersion, Driver, InstanceDescriptor};
use super::error::{VulkanError, VulkanResult};
use crate::core::config::BootstrapConfig;

/// Instance extension required to register a debug messenger
pub const DEBUG_UTILS_EXTENSION: &str = "VK_EXT_debug_utils";

/// Live native instance; destroyed when the last owner lets go
pub(crate) struct ConnectionInner<D: Driver> {
    pub(crate) driver: Rc<D>,
    pub(crate) instance: D::Instance,
}

impl<D: Driver> Drop for ConnectionInner<D> {
    fn drop(&mut self) {
        unsafe {
            self.driver.destroy_instance(&self.instance);
        }
        log::debug!("Vulkan instance destroyed");
    }
}

/// Owned connection to the driver
///
/// Move-only. Every device handle and debug channel derived from it is
/// released before the native instance is.
pub struct Connection<D: Driver> {
    inner: Rc<ConnectionInner<D>>,
    api_version: ApiVersion,
    extensions: Vec<String>,
    layers: Vec<String>,
}

impl<D: Driver> Connection<D> {
    /// The driver this connection was created through
    pub fn driver(&self) -> &D {
        &self.inner.driver
    }

    /// The native instance
    pub fn instance(&self) -> &D::Instance {
        &self.inner.instance
    }

    /// API version the instance was created with
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Instance extensions that were enabled
    pub fn enabled_extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Instance layers that were enabled
    pub fn enabled_layers(&self) -> &[String] {
        &self.layers
    }

    /// Whether the debug utils extension was negotiated for this instance
    pub fn has_debug_utils(&self) -> bool {
        self.extensions.iter().any(|ext| ext == DEBUG_UTILS_EXTENSION)
    }

    /// Number of debug channels still attached
    pub fn attached_channels(&self) -> usize {
        Rc::strong_count(&self.inner) - 1
    }

    pub(crate) fn share_inner(&self) -> Rc<ConnectionInner<D>> {
        Rc::clone(&self.inner)
    }

    /// Destroy the connection
    ///
    /// Fails with `LifecycleOrderViolation` when a debug channel is still
    /// attached. The native instance then outlives this call and is released
    /// only once the last channel is detached.
    pub fn destroy(self) -> VulkanResult<()> {
        let dependents = self.attached_channels();
        if dependents > 0 {
            log::error!(
                "Connection destroyed before {} attached debug channel(s); deferring instance destruction",
                dependents
            );
            return Err(VulkanError::LifecycleOrderViolation { dependents });
        }
        drop(self);
        Ok(())
    }
}

/// Clamp the driver's maximum version down to the configured baseline
///
/// The patch component is dropped first. A baseline above what the driver
/// supports is lowered to the driver maximum.
pub fn target_api_version(driver_max: ApiVersion, baseline: ApiVersion) -> ApiVersion {
    driver_max.without_patch().min(baseline)
}

/// Negotiate capabilities and create a connection
///
/// `window_extensions` is the opaque list the windowing layer needs. With
/// `debug_enabled` the debug utils extension and the configured validation
/// layer are requested as well. An unsatisfied negotiation aborts creation;
/// there is no reduced-capability fallback.
pub fn create_connection<D: Driver>(
    driver: &Rc<D>,
    config: &BootstrapConfig,
    window_extensions: &[String],
    debug_enabled: bool,
) -> VulkanResult<Connection<D>> {
    if debug_enabled {
        log::info!("Making an instance...");
    }

    let driver_max = driver.instance_version()?;
    if debug_enabled {
        log::info!("System can support vulkan {}", driver_max);
    }
    let api_version = target_api_version(driver_max, config.api_baseline());

    let mut extensions: Vec<String> = window_extensions.to_vec();
    if debug_enabled && !extensions.iter().any(|ext| ext == DEBUG_UTILS_EXTENSION) {
        extensions.push(DEBUG_UTILS_EXTENSION.to_string());
    }

    if debug_enabled {
        let mut message = String::from("extensions to be requested:\n");
        for name in &extensions {
            message.push_str(&format!("\t\"{}\"\n", name));
        }
        log::info!("{}", message);
    }

    let layers = if debug_enabled {
        vec![config.validation_layer.clone()]
    } else {
        vec![]
    };

    let request = CapabilityRequest::new(extensions, layers, debug_enabled);
    let report = negotiate(driver.as_ref(), &request)?;
    if !report.is_satisfied() {
        log::error!("Requested instance capabilities are not supported");
        report.into_result()?;
    }

    let descriptor = InstanceDescriptor {
        application_name: config.application_name.clone(),
        application_version: config.packed_application_version(),
        engine_name: config.engine_name.clone(),
        engine_version: config.packed_engine_version(),
        api_version,
        extensions: request.extensions().to_vec(),
        layers: request.layers().to_vec(),
    };

    let instance = driver.create_instance(&descriptor).map_err(|e| {
        log::error!("Failed to create Instance: {}", e);
        e
    })?;

    log::info!(
        "Vulkan instance created for \"{}\" (API {}.{})",
        descriptor.application_name,
        api_version.major(),
        api_version.minor()
    );

    Ok(Connection {
        inner: Rc::new(ConnectionInner {
            driver: Rc::clone(driver),
            instance,
        }),
        api_version,
        extensions: descriptor.extensions,
        layers: descriptor.layers,
    })
}
