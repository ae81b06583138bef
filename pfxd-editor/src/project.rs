//! Project files on disk.

use pfxd::{parse_project, LayerData, LayerStack, ProjectError};
use std::fs;
use std::path::Path;

/// Write the stack as a pretty-printed v2.0 document.
pub fn save_project(layers: &LayerStack, path: impl AsRef<Path>) -> Result<(), ProjectError> {
    let path = path.as_ref();
    let json = layers.export().to_json_pretty()?;
    fs::write(path, json)?;
    log::info!("saved {} layer(s) to {}", layers.len(), path.display());
    Ok(())
}

/// Read a v1.x or v2.0 document.
///
/// Fails only when the file cannot be read or is not JSON. Malformed fields
/// fall back to defaults, and the result may be empty for a v2.0 document
/// without layers.
pub fn load_project(path: impl AsRef<Path>) -> Result<Vec<LayerData>, ProjectError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let layers = parse_project(&text)?;
    log::info!("loaded {} layer(s) from {}", layers.len(), path.display());
    Ok(layers)
}
