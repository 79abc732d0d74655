//! In-memory driver for tests
//!
//! Advertises configurable extension/layer sets and devices, and records every
//! create and destroy call so tests can check resource lifetimes.

use ash::vk;
use std::cell::{Cell, RefCell};

use super::driver::{ApiVersion, DeviceProperties, DeviceType, Driver, InstanceDescriptor};
use super::error::{VulkanError, VulkanResult};

/// One recorded driver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// Instance with the given id created
    InstanceCreated(u32),
    /// Instance with the given id destroyed
    InstanceDestroyed(u32),
    /// Messenger with the given id created
    MessengerCreated(u32),
    /// Messenger with the given id destroyed
    MessengerDestroyed(u32),
}

/// Device advertised by the mock driver
#[derive(Debug, Clone)]
pub struct MockDevice {
    pub name: String,
    pub device_type: DeviceType,
    pub extensions: Vec<String>,
}

#[derive(Debug)]
pub struct MockInstance {
    pub id: u32,
}

#[derive(Debug)]
pub struct MockMessenger {
    pub id: u32,
    pub instance: u32,
}

#[derive(Default)]
pub struct MockDriver {
    version: Option<ApiVersion>,
    extensions: Vec<String>,
    layers: Vec<String>,
    devices: Vec<MockDevice>,
    instance_failure: Option<vk::Result>,
    messenger_failure: Option<vk::Result>,
    next_id: Cell<u32>,
    events: RefCell<Vec<DriverEvent>>,
    live_messengers: RefCell<Vec<(u32, u32)>>,
    violations: RefCell<Vec<String>>,
    descriptors: RefCell<Vec<InstanceDescriptor>>,
    extension_queries: Cell<usize>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Driver advertising everything a debug session needs
    pub fn with_debug_support() -> Self {
        Self::new()
            .with_instance_extensions(&["VK_KHR_surface", "VK_EXT_debug_utils"])
            .with_instance_layers(&["VK_LAYER_KHRONOS_validation"])
    }

    pub fn with_instance_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_instance_extensions(mut self, names: &[&str]) -> Self {
        self.extensions = owned(names);
        self
    }

    pub fn with_instance_layers(mut self, names: &[&str]) -> Self {
        self.layers = owned(names);
        self
    }

    pub fn with_device(mut self, name: &str, device_type: DeviceType, extensions: &[&str]) -> Self {
        self.devices.push(MockDevice {
            name: name.to_string(),
            device_type,
            extensions: owned(extensions),
        });
        self
    }

    pub fn failing_instance_creation(mut self, result: vk::Result) -> Self {
        self.instance_failure = Some(result);
        self
    }

    pub fn failing_messenger_creation(mut self, result: vk::Result) -> Self {
        self.messenger_failure = Some(result);
        self
    }

    pub fn events(&self) -> Vec<DriverEvent> {
        self.events.borrow().clone()
    }

    pub fn created_descriptors(&self) -> Vec<InstanceDescriptor> {
        self.descriptors.borrow().clone()
    }

    /// How many times device extensions were enumerated
    pub fn device_extension_queries(&self) -> usize {
        self.extension_queries.get()
    }

    /// Every created object was destroyed exactly once
    pub fn all_released(&self) -> bool {
        let events = self.events.borrow();
        let count = |pred: fn(&DriverEvent) -> bool| events.iter().filter(|e| pred(e)).count();
        count(|e| matches!(e, DriverEvent::InstanceCreated(_)))
            == count(|e| matches!(e, DriverEvent::InstanceDestroyed(_)))
            && count(|e| matches!(e, DriverEvent::MessengerCreated(_)))
                == count(|e| matches!(e, DriverEvent::MessengerDestroyed(_)))
    }

    /// Panic if an instance was destroyed while one of its messengers lived,
    /// or if anything was destroyed twice
    pub fn assert_teardown_order(&self) {
        let violations = self.violations.borrow();
        assert!(violations.is_empty(), "lifetime violations: {:?}", *violations);
    }

    fn next_id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn record(&self, event: DriverEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Driver for MockDriver {
    type Instance = MockInstance;
    type Messenger = MockMessenger;
    type PhysicalDevice = usize;

    fn instance_version(&self) -> VulkanResult<ApiVersion> {
        Ok(self.version.unwrap_or(ApiVersion::new(0, 1, 3, 0)))
    }

    fn instance_extensions(&self) -> VulkanResult<Vec<String>> {
        Ok(self.extensions.clone())
    }

    fn instance_layers(&self) -> VulkanResult<Vec<String>> {
        Ok(self.layers.clone())
    }

    fn create_instance(&self, descriptor: &InstanceDescriptor) -> VulkanResult<Self::Instance> {
        if let Some(result) = self.instance_failure {
            return Err(VulkanError::NativeCreationFailed(result));
        }
        self.descriptors.borrow_mut().push(descriptor.clone());
        let id = self.next_id();
        self.record(DriverEvent::InstanceCreated(id));
        Ok(MockInstance { id })
    }

    unsafe fn destroy_instance(&self, instance: &Self::Instance) {
        if self.events().contains(&DriverEvent::InstanceDestroyed(instance.id)) {
            self.violations
                .borrow_mut()
                .push(format!("instance {} destroyed twice", instance.id));
        }
        let dependents = self
            .live_messengers
            .borrow()
            .iter()
            .filter(|(_, owner)| *owner == instance.id)
            .count();
        if dependents > 0 {
            self.violations.borrow_mut().push(format!(
                "instance {} destroyed with {} live messenger(s)",
                instance.id, dependents
            ));
        }
        self.record(DriverEvent::InstanceDestroyed(instance.id));
    }

    fn create_debug_messenger(
        &self,
        instance: &Self::Instance,
        _severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> VulkanResult<Self::Messenger> {
        if let Some(result) = self.messenger_failure {
            return Err(VulkanError::NativeCreationFailed(result));
        }
        let id = self.next_id();
        self.live_messengers.borrow_mut().push((id, instance.id));
        self.record(DriverEvent::MessengerCreated(id));
        Ok(MockMessenger {
            id,
            instance: instance.id,
        })
    }

    unsafe fn destroy_debug_messenger(&self, instance: &Self::Instance, messenger: &Self::Messenger) {
        if messenger.instance != instance.id {
            self.violations.borrow_mut().push(format!(
                "messenger {} destroyed through foreign instance {}",
                messenger.id, instance.id
            ));
        }
        let mut live = self.live_messengers.borrow_mut();
        match live.iter().position(|(id, _)| *id == messenger.id) {
            Some(index) => {
                live.remove(index);
            }
            None => self
                .violations
                .borrow_mut()
                .push(format!("messenger {} destroyed twice", messenger.id)),
        }
        drop(live);
        self.record(DriverEvent::MessengerDestroyed(messenger.id));
    }

    fn physical_devices(&self, _instance: &Self::Instance) -> VulkanResult<Vec<Self::PhysicalDevice>> {
        Ok((0..self.devices.len()).collect())
    }

    fn device_properties(&self, _instance: &Self::Instance, device: Self::PhysicalDevice) -> DeviceProperties {
        let device = &self.devices[device];
        DeviceProperties {
            name: device.name.clone(),
            device_type: device.device_type,
            api_version: ApiVersion::new(0, 1, 3, 0),
        }
    }

    fn device_extensions(
        &self,
        _instance: &Self::Instance,
        device: Self::PhysicalDevice,
    ) -> VulkanResult<Vec<String>> {
        self.extension_queries.set(self.extension_queries.get() + 1);
        Ok(self.devices[device].extensions.clone())
    }
}
