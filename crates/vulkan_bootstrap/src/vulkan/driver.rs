//! Native driver boundary
//!
//! Everything the bootstrap asks of the Vulkan loader goes through the
//! [`Driver`] trait. The production implementation is [`AshDriver`]; tests use
//! an in-memory driver that records every create and destroy call.
//!
//! [`AshDriver`]: super::ash_driver::AshDriver

use ash::vk;
use std::fmt;

use super::error::VulkanResult;

/// Packed Vulkan API version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion(u32);

impl ApiVersion {
    /// Vulkan 1.0.0, the baseline every driver supports
    pub const V1_0: Self = Self(vk::API_VERSION_1_0);

    /// Build a version from its components
    pub const fn new(variant: u32, major: u32, minor: u32, patch: u32) -> Self {
        Self(vk::make_api_version(variant, major, minor, patch))
    }

    /// Wrap a packed version as reported by the driver
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The packed form handed to the driver
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Variant component
    pub const fn variant(self) -> u32 {
        vk::api_version_variant(self.0)
    }

    /// Major component
    pub const fn major(self) -> u32 {
        vk::api_version_major(self.0)
    }

    /// Minor component
    pub const fn minor(self) -> u32 {
        vk::api_version_minor(self.0)
    }

    /// Patch component
    pub const fn patch(self) -> u32 {
        vk::api_version_patch(self.0)
    }

    /// Same version with the patch component zeroed
    pub const fn without_patch(self) -> Self {
        Self(self.0 & !0xFFF)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Variant: {}, Major: {}, Minor: {}, Patch: {}",
            self.variant(),
            self.major(),
            self.minor(),
            self.patch()
        )
    }
}

/// Everything needed to create an instance once capabilities are approved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescriptor {
    /// Application name reported to the driver
    pub application_name: String,
    /// Packed application version
    pub application_version: u32,
    /// Engine name reported to the driver
    pub engine_name: String,
    /// Packed engine version
    pub engine_version: u32,
    /// Clamped API version the instance targets
    pub api_version: ApiVersion,
    /// Approved instance extensions
    pub extensions: Vec<String>,
    /// Approved instance layers
    pub layers: Vec<String>,
}

/// Physical device category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// CPU implementation
    Cpu,
    /// Dedicated GPU
    DiscreteGpu,
    /// GPU sharing memory with the host
    IntegratedGpu,
    /// GPU exposed through virtualization
    VirtualGpu,
    /// Anything else the driver reports
    Other,
}

impl From<vk::PhysicalDeviceType> for DeviceType {
    fn from(ty: vk::PhysicalDeviceType) -> Self {
        match ty {
            vk::PhysicalDeviceType::CPU => Self::Cpu,
            vk::PhysicalDeviceType::DISCRETE_GPU => Self::DiscreteGpu,
            vk::PhysicalDeviceType::INTEGRATED_GPU => Self::IntegratedGpu,
            vk::PhysicalDeviceType::VIRTUAL_GPU => Self::VirtualGpu,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cpu => "CPU",
            Self::DiscreteGpu => "Discrete GPU",
            Self::IntegratedGpu => "Integrated GPU",
            Self::VirtualGpu => "Virtual GPU",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

/// The subset of physical device properties used for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProperties {
    /// Driver-reported device name
    pub name: String,
    /// Device category
    pub device_type: DeviceType,
    /// Highest API version the device supports
    pub api_version: ApiVersion,
}

/// The native API boundary
///
/// Handles are associated types so the session logic is independent of the
/// loader. `destroy_*` calls must be made exactly once per created object, and
/// a messenger must be destroyed before the instance it was created from.
pub trait Driver {
    /// Live instance (with whatever dispatch table it needs)
    type Instance;
    /// Live debug messenger
    type Messenger;
    /// Non-owning physical device reference
    type PhysicalDevice: Copy + fmt::Debug;

    /// Highest instance version the loader supports
    fn instance_version(&self) -> VulkanResult<ApiVersion>;

    /// Names of every instance extension the driver advertises
    fn instance_extensions(&self) -> VulkanResult<Vec<String>>;

    /// Names of every instance layer the driver advertises
    fn instance_layers(&self) -> VulkanResult<Vec<String>>;

    /// Create an instance from an already-negotiated descriptor
    fn create_instance(&self, descriptor: &InstanceDescriptor) -> VulkanResult<Self::Instance>;

    /// Release an instance
    ///
    /// # Safety
    /// No messenger created from `instance` may still be alive.
    unsafe fn destroy_instance(&self, instance: &Self::Instance);

    /// Register a debug messenger for the given severities
    fn create_debug_messenger(
        &self,
        instance: &Self::Instance,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> VulkanResult<Self::Messenger>;

    /// Unregister a debug messenger
    ///
    /// # Safety
    /// `instance` must be the instance `messenger` was created from, still alive.
    unsafe fn destroy_debug_messenger(&self, instance: &Self::Instance, messenger: &Self::Messenger);

    /// Physical devices in driver-reported order
    fn physical_devices(&self, instance: &Self::Instance) -> VulkanResult<Vec<Self::PhysicalDevice>>;

    /// Properties of one physical device
    fn device_properties(&self, instance: &Self::Instance, device: Self::PhysicalDevice) -> DeviceProperties;

    /// Names of every device extension the device advertises
    fn device_extensions(
        &self,
        instance: &Self::Instance,
        device: Self::PhysicalDevice,
    ) -> VulkanResult<Vec<String>>;
}
