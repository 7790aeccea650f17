use std::{fs, path::Path};

use crate::{GridError, GridModel, GridSpec};

/// Load a `GridSpec` from JSON on disk.
pub fn load_json(path: impl AsRef<Path>) -> Result<GridSpec, GridError> {
    let json = fs::read_to_string(path)?;
    let spec: GridSpec = serde_json::from_str(&json)?;
    Ok(spec)
}

/// Load a `GridSpec` from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<GridSpec, GridError> {
    let yaml = fs::read_to_string(path)?;
    let spec: GridSpec = serde_yaml::from_str(&yaml)?;
    Ok(spec)
}

/// Load a `GridSpec`, picking the parser from the file extension.
pub fn load_spec(path: impl AsRef<Path>) -> Result<GridSpec, GridError> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_json(path),
        Some("yaml" | "yml") => load_yaml(path),
        _ => Err(GridError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Load and compile a grid from a JSON file.
pub fn compile_json(path: impl AsRef<Path>, seed: u64) -> Result<GridModel, GridError> {
    load_json(path)?.compile(seed)
}

/// Load and compile a grid from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>, seed: u64) -> Result<GridModel, GridError> {
    load_yaml(path)?.compile(seed)
}

/// Serialize and write a `GridSpec` as pretty JSON.
pub fn save_json(path: impl AsRef<Path>, spec: &GridSpec) -> Result<(), GridError> {
    let json = serde_json::to_string_pretty(spec)?;
    fs::write(path, json)?;
    Ok(())
}

/// Serialize and write a `GridSpec` to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &GridSpec) -> Result<(), GridError> {
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(path, yaml)?;
    Ok(())
}
