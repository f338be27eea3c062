use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Write `document` as pretty JSON unless a file already exists at `path`.
/// Returns true if the file was written.
pub fn write_if_absent<T: Serialize>(path: &Path, document: &T) -> Result<bool> {
    let json = serde_json::to_string_pretty(document)?;

    // create_new refuses to clobber a document someone edited by hand
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            info!("Wrote {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            debug!("{} already exists, leaving it untouched", path.display());
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
