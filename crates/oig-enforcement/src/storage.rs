//! Flat CSV table of enforcement actions, one file per collection run.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::EnforcementAction;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub fn output_file_name(year: i32, month: u32) -> String {
    format!("enforcement_actions_{}_{}.csv", year, month)
}

pub fn write_actions(path: &Path, actions: &[EnforcementAction]) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    for action in actions {
        writer.serialize(action)?;
    }
    writer.flush().map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Wrote {} rows to {}", actions.len(), path.display());
    Ok(())
}

pub fn read_actions(path: &Path) -> Result<Vec<EnforcementAction>, StorageError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
        _ => StorageError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let actions = reader
        .deserialize()
        .collect::<Result<Vec<EnforcementAction>, _>>()?;
    log::debug!("Read {} rows from {}", actions.len(), path.display());
    Ok(actions)
}
