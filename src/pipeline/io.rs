//! File I/O boundary: read the source document, write the result.
//!
//! Output is written to a temp file next to the destination and renamed over
//! it, so a failed write never leaves a truncated file behind. The temp file
//! is deleted on drop if the rename does not happen. The written file gets
//! the mode a plain create would give it (`0o666` minus the umask), or keeps
//! the mode of the file it replaces.

use crate::error::MdConvError;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// Read a whole file as UTF-8 text.
///
/// # Errors
/// - [`MdConvError::FileNotFound`] when nothing exists at `path`
/// - [`MdConvError::FileReadError`] for permission problems, directories,
///   and content that is not valid UTF-8
pub fn read_text(path: &Path) -> Result<String, MdConvError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MdConvError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => MdConvError::FileReadError {
            path: path.to_path_buf(),
            reason: "permission denied".to_string(),
        },
        _ => MdConvError::FileReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|e| MdConvError::FileReadError {
        path: path.to_path_buf(),
        reason: format!(
            "not valid UTF-8 (invalid byte at offset {})",
            e.utf8_error().valid_up_to()
        ),
    })?;

    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Write `text` to `path`, creating missing parent directories and replacing
/// any existing file.
pub fn write_text(path: &Path, text: &str) -> Result<(), MdConvError> {
    let write_err = |source: std::io::Error| MdConvError::FileWriteError {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = temp_file_in(parent).map_err(write_err)?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Temp file in `dir` created with the same mode `File::create` would use.
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .prefix(".mdconv")
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().prefix(".mdconv").tempfile_in(dir)
}
