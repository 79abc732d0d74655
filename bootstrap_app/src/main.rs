//! Command-line entry point: start a Vulkan session, report the chosen GPU,
//! shut down.
//!
//! Usage: `vk_bootstrap [config.toml|config.ron]`

mod window;

use std::rc::Rc;

use thiserror::Error;
use vulkan_bootstrap::foundation::logging;
use vulkan_bootstrap::prelude::*;

#[derive(Error, Debug)]
enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Vulkan error: {0}")]
    Vulkan(#[from] VulkanError),

    #[cfg_attr(not(feature = "window"), allow(dead_code))]
    #[error("Window error: {0}")]
    Window(String),
}

fn load_config() -> Result<BootstrapConfig, AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => BootstrapConfig::load_from_file(&path)?,
        None => BootstrapConfig::new("Vulkan Bootstrap"),
    };
    config.validate()?;
    Ok(config)
}

fn run() -> Result<(), AppError> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);

    let window_extensions = window::required_instance_extensions()?;
    let driver = Rc::new(AshDriver::load()?);

    let session = Session::start(&driver, &config, &window_extensions)?;

    match session.physical_device() {
        Some(device) => {
            let properties = device.properties();
            log::info!(
                "Using {} ({}), Vulkan {}.{}",
                properties.name,
                properties.device_type,
                properties.api_version.major(),
                properties.api_version.minor()
            );
        }
        None => log::warn!("No physical device can present; rendering is unavailable"),
    }

    session.shutdown()?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
