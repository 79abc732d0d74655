//! Instance extensions required by the windowing layer

use crate::AppError;

/// Ask GLFW which instance extensions its Vulkan surface support needs
#[cfg(feature = "window")]
pub fn required_instance_extensions() -> Result<Vec<String>, AppError> {
    let glfw = glfw::init(glfw::fail_on_errors)
        .map_err(|e| AppError::Window(format!("GLFW initialization failed: {:?}", e)))?;

    if !glfw.vulkan_supported() {
        return Err(AppError::Window("GLFW reports no Vulkan support".to_string()));
    }

    let extensions = glfw
        .get_required_instance_extensions()
        .ok_or_else(|| AppError::Window("Failed to get required extensions".to_string()))?;
    log::debug!("GLFW requires instance extensions: {:?}", extensions);
    Ok(extensions)
}

/// Headless build: no surface, so no window extensions
#[cfg(not(feature = "window"))]
#[allow(clippy::unnecessary_wraps)]
pub fn required_instance_extensions() -> Result<Vec<String>, AppError> {
    log::debug!("Built without window support; requesting no surface extensions");
    Ok(Vec::new())
}
