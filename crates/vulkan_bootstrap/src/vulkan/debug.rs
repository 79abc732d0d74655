//! Debug messenger channel
//!
//! A [`DebugChannel`] routes driver validation messages into the `log` facade.
//! It holds a share of its connection's native instance, so the instance is
//! destroyed only after the messenger has been unregistered.

use ash::vk;
use std::ffi::CStr;
use std::rc::Rc;

use super::connection::{Connection, ConnectionInner};
use super::driver::Driver;
use super::error::VulkanResult;

/// Severities the messenger subscribes to
pub const DEBUG_SEVERITY: vk::DebugUtilsMessageSeverityFlagsEXT = vk::DebugUtilsMessageSeverityFlagsEXT::from_raw(
    vk::DebugUtilsMessageSeverityFlagsEXT::WARNING.as_raw() | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR.as_raw(),
);

/// Registered debug messenger tied to one connection
pub struct DebugChannel<D: Driver> {
    messenger: Option<D::Messenger>,
    connection: Rc<ConnectionInner<D>>,
}

impl<D: Driver> DebugChannel<D> {
    /// Register a messenger on `connection`
    ///
    /// Returns `None` when debugging is disabled or the connection was created
    /// without the debug utils extension.
    pub fn attach(connection: &Connection<D>, debug_enabled: bool) -> VulkanResult<Option<Self>> {
        if !debug_enabled || !connection.has_debug_utils() {
            return Ok(None);
        }

        let messenger = connection
            .driver()
            .create_debug_messenger(connection.instance(), DEBUG_SEVERITY)?;
        log::info!("Debug messenger attached");

        Ok(Some(Self {
            messenger: Some(messenger),
            connection: connection.share_inner(),
        }))
    }

    /// Unregister the messenger
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(messenger) = self.messenger.take() {
            unsafe {
                self.connection
                    .driver
                    .destroy_debug_messenger(&self.connection.instance, &messenger);
            }
            log::debug!("Debug messenger detached");
        }
    }
}

impl<D: Driver> Drop for DebugChannel<D> {
    fn drop(&mut self) {
        // The connection share is released after this, as a field drop
        self.release();
    }
}

/// Debug callback for validation layers
pub(crate) unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if callback_data.is_null() || (*callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();
    route_message(message_severity, message_type, &message);

    vk::FALSE
}

fn route_message(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    message: &str,
) {
    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("[Vulkan] {:?} - {}", message_type, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("[Vulkan] {:?} - {}", message_type, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
        log::info!("[Vulkan] {:?} - {}", message_type, message);
    } else {
        log::debug!("[Vulkan] {:?} - {}", message_type, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BootstrapConfig;
    use crate::vulkan::connection::create_connection;
    use crate::vulkan::mock::{DriverEvent, MockDriver};
    use std::ffi::CString;

    fn debug_connection(driver: &Rc<MockDriver>) -> Connection<MockDriver> {
        create_connection(driver, &BootstrapConfig::new("Debug Test"), &[], true).unwrap()
    }

    #[test]
    fn test_severity_covers_warning_and_error() {
        assert!(DEBUG_SEVERITY.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING));
        assert!(DEBUG_SEVERITY.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR));
    }

    #[test]
    fn test_not_attached_when_disabled() {
        let driver = Rc::new(MockDriver::with_debug_support());
        let connection = debug_connection(&driver);
        assert!(DebugChannel::attach(&connection, false).unwrap().is_none());
        assert_eq!(connection.attached_channels(), 0);
    }

    #[test]
    fn test_not_attached_without_debug_utils() {
        let driver = Rc::new(MockDriver::new());
        let connection =
            create_connection(&driver, &BootstrapConfig::new("Debug Test"), &[], false).unwrap();
        assert!(DebugChannel::attach(&connection, true).unwrap().is_none());
    }

    #[test]
    fn test_detach_precedes_instance_destruction() {
        let driver = Rc::new(MockDriver::with_debug_support());
        let connection = debug_connection(&driver);
        let channel = DebugChannel::attach(&connection, true).unwrap().unwrap();
        assert_eq!(connection.attached_channels(), 1);

        channel.detach();
        connection.destroy().unwrap();

        assert_eq!(
            driver.events(),
            vec![
                DriverEvent::InstanceCreated(1),
                DriverEvent::MessengerCreated(2),
                DriverEvent::MessengerDestroyed(2),
                DriverEvent::InstanceDestroyed(1),
            ]
        );
        driver.assert_teardown_order();
    }

    #[test]
    fn test_early_connection_destroy_is_a_violation() {
        let driver = Rc::new(MockDriver::with_debug_support());
        let connection = debug_connection(&driver);
        let channel = DebugChannel::attach(&connection, true).unwrap().unwrap();

        let result = connection.destroy();
        assert!(matches!(
            result,
            Err(crate::VulkanError::LifecycleOrderViolation { dependents: 1 })
        ));
        // Instance still alive until the channel goes away
        assert!(!driver.events().contains(&DriverEvent::InstanceDestroyed(1)));

        drop(channel);
        driver.assert_teardown_order();
        assert_eq!(driver.events().last(), Some(&DriverEvent::InstanceDestroyed(1)));
    }

    #[test]
    fn test_callback_ignores_null_data() {
        let result = unsafe {
            debug_callback(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
                vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
                std::ptr::null(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }

    #[test]
    fn test_callback_never_aborts_the_call() {
        let text = CString::new("validation message").unwrap();
        let data = vk::DebugUtilsMessengerCallbackDataEXT {
            p_message: text.as_ptr(),
            ..Default::default()
        };
        let result = unsafe {
            debug_callback(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                &data,
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }
}
