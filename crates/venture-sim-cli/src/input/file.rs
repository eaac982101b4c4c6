use serde::de::DeserializeOwned;
use std::path::Path;
use std::{env, fs};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?;
    Ok(value)
}

fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("Not a readable file: {}", resolved.display()).into());
    }

    Ok(resolved)
}
