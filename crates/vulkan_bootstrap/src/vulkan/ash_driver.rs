//! Driver implementation backed by the system Vulkan loader through `ash`

use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry};
use std::ffi::{c_char, CStr, CString};

use super::debug::debug_callback;
use super::driver::{ApiVersion, DeviceProperties, Driver, InstanceDescriptor};
use super::error::{VulkanError, VulkanResult};

/// Loader entry point wrapper
pub struct AshDriver {
    entry: Entry,
}

/// Live instance together with its dispatch table
pub struct AshInstance {
    instance: ash::Instance,
}

/// Live messenger together with the extension loader that created it
pub struct AshMessenger {
    loader: DebugUtils,
    handle: vk::DebugUtilsMessengerEXT,
}

impl AshDriver {
    /// Load the system Vulkan library
    pub fn load() -> VulkanResult<Self> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| VulkanError::LoaderUnavailable(format!("Failed to load Vulkan: {:?}", e)))?;
        Ok(Self { entry })
    }

    /// Access the raw loader entry
    pub fn entry(&self) -> &Entry {
        &self.entry
    }
}

impl AshInstance {
    /// Access the raw instance
    pub fn raw(&self) -> &ash::Instance {
        &self.instance
    }
}

impl AshMessenger {
    /// Raw messenger handle
    pub fn handle(&self) -> vk::DebugUtilsMessengerEXT {
        self.handle
    }
}

/// Convert a fixed-size, NUL-terminated driver string
fn driver_string(raw: &[c_char]) -> String {
    unsafe { CStr::from_ptr(raw.as_ptr()) }.to_string_lossy().into_owned()
}

fn c_strings(names: &[String]) -> VulkanResult<Vec<CString>> {
    names
        .iter()
        .map(|name| CString::new(name.as_str()).map_err(|_| VulkanError::InvalidName(name.clone())))
        .collect()
}

impl Driver for AshDriver {
    type Instance = AshInstance;
    type Messenger = AshMessenger;
    type PhysicalDevice = vk::PhysicalDevice;

    fn instance_version(&self) -> VulkanResult<ApiVersion> {
        // Loaders older than 1.1 do not expose vkEnumerateInstanceVersion
        #[allow(unused_unsafe)]
        let version = unsafe { self.entry.try_enumerate_instance_version() }.map_err(VulkanError::Api)?;
        Ok(version.map_or(ApiVersion::V1_0, ApiVersion::from_raw))
    }

    fn instance_extensions(&self) -> VulkanResult<Vec<String>> {
        #[allow(unused_unsafe)]
        let properties = unsafe { self.entry.enumerate_instance_extension_properties(None) }
            .map_err(VulkanError::Api)?;
        Ok(properties.iter().map(|p| driver_string(&p.extension_name)).collect())
    }

    fn instance_layers(&self) -> VulkanResult<Vec<String>> {
        #[allow(unused_unsafe)]
        let properties = unsafe { self.entry.enumerate_instance_layer_properties() }
            .map_err(VulkanError::Api)?;
        Ok(properties.iter().map(|p| driver_string(&p.layer_name)).collect())
    }

    fn create_instance(&self, descriptor: &InstanceDescriptor) -> VulkanResult<Self::Instance> {
        let app_name = CString::new(descriptor.application_name.as_str())
            .map_err(|_| VulkanError::InvalidName(descriptor.application_name.clone()))?;
        let engine_name = CString::new(descriptor.engine_name.as_str())
            .map_err(|_| VulkanError::InvalidName(descriptor.engine_name.clone()))?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(descriptor.application_version)
            .engine_name(&engine_name)
            .engine_version(descriptor.engine_version)
            .api_version(descriptor.api_version.raw());

        let extension_names = c_strings(&descriptor.extensions)?;
        let extensions: Vec<*const c_char> = extension_names.iter().map(|ext| ext.as_ptr()).collect();

        let layer_names = c_strings(&descriptor.layers)?;
        let layers: Vec<*const c_char> = layer_names.iter().map(|name| name.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extensions)
            .enabled_layer_names(&layers);

        let instance = unsafe {
            self.entry
                .create_instance(&create_info, None)
                .map_err(VulkanError::NativeCreationFailed)?
        };

        Ok(AshInstance { instance })
    }

    unsafe fn destroy_instance(&self, instance: &Self::Instance) {
        instance.instance.destroy_instance(None);
    }

    fn create_debug_messenger(
        &self,
        instance: &Self::Instance,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> VulkanResult<Self::Messenger> {
        let loader = DebugUtils::new(&self.entry, &instance.instance);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(severity)
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let handle = unsafe {
            loader
                .create_debug_utils_messenger(&create_info, None)
                .map_err(VulkanError::NativeCreationFailed)?
        };

        Ok(AshMessenger { loader, handle })
    }

    unsafe fn destroy_debug_messenger(&self, _instance: &Self::Instance, messenger: &Self::Messenger) {
        messenger.loader.destroy_debug_utils_messenger(messenger.handle, None);
    }

    fn physical_devices(&self, instance: &Self::Instance) -> VulkanResult<Vec<Self::PhysicalDevice>> {
        unsafe { instance.instance.enumerate_physical_devices() }.map_err(VulkanError::Api)
    }

    fn device_properties(&self, instance: &Self::Instance, device: Self::PhysicalDevice) -> DeviceProperties {
        let properties = unsafe { instance.instance.get_physical_device_properties(device) };
        DeviceProperties {
            name: driver_string(&properties.device_name),
            device_type: properties.device_type.into(),
            api_version: ApiVersion::from_raw(properties.api_version),
        }
    }

    fn device_extensions(
        &self,
        instance: &Self::Instance,
        device: Self::PhysicalDevice,
    ) -> VulkanResult<Vec<String>> {
        let properties = unsafe { instance.instance.enumerate_device_extension_properties(device) }
            .map_err(VulkanError::Api)?;
        Ok(properties.iter().map(|p| driver_string(&p.extension_name)).collect())
    }
}
