use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::bulletin_error::BulletinError;

/// Read bulletin text from a file, or from stdin when `path` is `None` or `-`
pub fn read_bulletin(path: Option<&Path>) -> Result<String, BulletinError> {
    match path {
        Some(path) if path != Path::new("-") => {
            info!("Reading bulletin from {}", path.display());
            fs::read_to_string(path).map_err(|source| BulletinError::Read {
                path: path.display().to_string(),
                source,
            })
        }
        _ => {
            info!("Reading bulletin from stdin");
            read_bulletin_from(io::stdin().lock())
        }
    }
}

pub fn read_bulletin_from(mut reader: impl Read) -> Result<String, BulletinError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(BulletinError::Stream)?;
    debug!("Read {} bytes of bulletin text", text.len());
    Ok(text)
}
