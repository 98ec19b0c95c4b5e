//! Filesystem helpers.

use eyre::{Result, WrapErr};
use std::{fs, io, path::Path};

/// Recursively create a directory and all of its parent if necessary.
pub fn mkdir_p(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("mkdir_p {}", path.display()))
}

/// Write a file atomically (using a tempfile + atomic rename).
///
/// Missing parent directories are created.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
    {
        mkdir_p(parent)?;
    }

    let mut tmp_path = path.to_path_buf();
    tmp_path.set_extension("part");

    fs::write(&tmp_path, data)
        .with_context(|| format!("write {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("rename to {}", path.display()))?;

    Ok(())
}

/// Reads a file, `None` if it doesn't exist.
pub fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("read {}", path.display()))
        },
    }
}

/// Removes a file, if it exists.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            Err(err).with_context(|| format!("remove {}", path.display()))
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, process};

    #[test]
    fn write_read_remove() {
        let dir = env::temp_dir()
            .join(format!("dramadeck-fs-{}", process::id()))
            .join("nested");
        let path = dir.join("data.json");

        assert_eq!(read_if_exists(&path).expect("read missing"), None);

        atomic_write(&path, b"[]").expect("write");
        assert_eq!(
            read_if_exists(&path).expect("read"),
            Some(b"[]".to_vec())
        );
        assert!(!path.with_extension("part").exists());

        remove_if_exists(&path).expect("remove");
        remove_if_exists(&path).expect("remove twice");
        assert_eq!(read_if_exists(&path).expect("read removed"), None);

        let _ = fs::remove_dir_all(dir.parent().expect("parent"));
    }
}
