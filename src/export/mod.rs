//! Serialization of generated block meshes.

pub mod block_mesh_dict;

use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::error::RodMeshResult;
use crate::rod::BlockMeshModel;

pub use block_mesh_dict::{BlockMeshDict, write_block_mesh_dict};

/// Writes `model` as a `blockMeshDict` at `path`, creating parent directories.
///
/// # Errors
/// Fails with [`io::ErrorKind::AlreadyExists`] when `path` exists and
/// `overwrite` is false, or with the underlying I/O error.
pub fn write_block_mesh_dict_file(
    path: &Path,
    model: &BlockMeshModel,
    overwrite: bool,
) -> RodMeshResult<()> {
    if path.exists() && !overwrite {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ),
        )
        .into());
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, write_block_mesh_dict(model))?;
    info!("wrote {}", path.display());
    Ok(())
}
