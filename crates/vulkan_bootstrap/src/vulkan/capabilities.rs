//! Capability negotiation
//!
//! Checks a requested set of instance extensions and layers against what the
//! driver advertises. Matching is exact and case-sensitive. Negotiation fails
//! closed: a missing item is reported, never silently dropped, and it is up to
//! the caller to decide what an unsatisfied report means.

use super::driver::Driver;
use super::error::{CapabilityKind, VulkanError, VulkanResult};

/// Extensions and layers requested for one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRequest {
    extensions: Vec<String>,
    layers: Vec<String>,
    verbose: bool,
}

impl CapabilityRequest {
    /// Create a request; `verbose` enables per-item diagnostic logging
    pub fn new(extensions: Vec<String>, layers: Vec<String>, verbose: bool) -> Self {
        Self {
            extensions,
            layers,
            verbose,
        }
    }

    /// Requested extension names, in request order
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Requested layer names, in request order
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Whether diagnostics are enabled for this request
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Outcome of a negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityReport {
    /// First requested extension the driver does not advertise
    pub missing_extension: Option<String>,
    /// First requested layer the driver does not advertise
    pub missing_layer: Option<String>,
    /// Full advertised extension set, kept only when diagnostics are enabled
    pub advertised_extensions: Option<Vec<String>>,
    /// Full advertised layer set, kept only when diagnostics are enabled
    pub advertised_layers: Option<Vec<String>>,
}

impl CapabilityReport {
    /// Both the extension and the layer checks passed
    pub fn is_satisfied(&self) -> bool {
        self.missing_extension.is_none() && self.missing_layer.is_none()
    }

    /// Turn an unsatisfied report into `CapabilitiesUnsupported`
    pub fn into_result(self) -> VulkanResult<()> {
        if let Some(name) = self.missing_extension {
            return Err(VulkanError::CapabilitiesUnsupported {
                kind: CapabilityKind::Extension,
                name,
            });
        }
        if let Some(name) = self.missing_layer {
            return Err(VulkanError::CapabilitiesUnsupported {
                kind: CapabilityKind::Layer,
                name,
            });
        }
        Ok(())
    }
}

/// Query the driver and check `request` against its advertised sets
pub fn negotiate<D: Driver>(driver: &D, request: &CapabilityRequest) -> VulkanResult<CapabilityReport> {
    let advertised_extensions = driver.instance_extensions()?;
    let advertised_layers = driver.instance_layers()?;
    Ok(evaluate(request, advertised_extensions, advertised_layers))
}

/// Check `request` against already-enumerated driver sets
///
/// Extensions and layers are checked independently; each list short-circuits
/// on its first missing item.
pub fn evaluate(
    request: &CapabilityRequest,
    advertised_extensions: Vec<String>,
    advertised_layers: Vec<String>,
) -> CapabilityReport {
    let verbose = request.verbose;

    if verbose {
        log_advertised("Driver can support the following extensions", &advertised_extensions);
    }
    let missing_extension = first_unsupported(
        &request.extensions,
        &advertised_extensions,
        CapabilityKind::Extension,
        verbose,
    );

    if verbose {
        log_advertised("Driver can support the following layers", &advertised_layers);
    }
    let missing_layer = first_unsupported(&request.layers, &advertised_layers, CapabilityKind::Layer, verbose);

    CapabilityReport {
        missing_extension,
        missing_layer,
        advertised_extensions: verbose.then_some(advertised_extensions),
        advertised_layers: verbose.then_some(advertised_layers),
    }
}

/// Return the first requested name absent from `advertised`
///
/// Names after the first missing one are not checked. This is the matching
/// rule for both instance capabilities and device extensions.
pub fn first_unsupported<S: AsRef<str>>(
    requested: &[S],
    advertised: &[String],
    kind: CapabilityKind,
    verbose: bool,
) -> Option<String> {
    for name in requested {
        let name = name.as_ref();
        if advertised.iter().any(|candidate| candidate == name) {
            if verbose {
                log::info!("{} \"{}\" is supported!", kind, name);
            }
        } else {
            if verbose {
                log::info!("{} \"{}\" is not supported!", kind, name);
            }
            return Some(name.to_string());
        }
    }
    None
}

fn log_advertised(header: &str, names: &[String]) {
    let mut message = format!("{}:\n", header);
    for name in names {
        message.push('\t');
        message.push_str(name);
        message.push('\n');
    }
    log::info!("{}", message);
}
