use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

/// Writes `value` as pretty JSON, creating parent directories as needed.
/// Returns the path written.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<PathBuf> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {:?}", parent))?;
        }
    }

    let formatted = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path).with_context(|| format!("Cannot create {:?}", path))?;
    file.write_all(formatted.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(path.to_path_buf())
}

pub fn read_json<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).with_context(|| format!("Cannot open {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("{:?} is not valid JSON", path))
}
