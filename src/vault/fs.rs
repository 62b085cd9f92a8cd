use anyhow::Context;
use std::io::Write;
use std::path::Path;

pub const SECRET_FILE_MODE: u32 = 0o600;

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> anyhow::Result<String>;
    /// Replaces the whole file. Parent directories are created as needed.
    fn write(&self, path: &Path, contents: &str) -> anyhow::Result<()>;
    /// Deleting a missing file is not an error.
    fn remove(&self, path: &Path) -> anyhow::Result<()>;
    fn set_mode(&self, path: &Path, mode: u32) -> anyhow::Result<()>;
}

pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create directory {}", parent.display()))?;
            }
        }
        let tmp_path = path.with_extension("tmp");
        let written = write_private(&tmp_path, contents)
            .with_context(|| format!("write {}", tmp_path.display()))
            .and_then(|()| {
                std::fs::rename(&tmp_path, path)
                    .with_context(|| format!("persist {}", path.display()))
            });
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp_path);
        }
        written
    }

    fn remove(&self, path: &Path) -> anyhow::Result<()> {
        match std::fs::remove_file(path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("delete {}", path.display())),
        }
    }

    fn set_mode(&self, path: &Path, mode: u32) -> anyhow::Result<()> {
        restrict_mode(path, mode)
    }
}

/// Creates `path` owner-only before any byte of `contents` reaches it.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    // A leftover file from an interrupted write would keep its old mode.
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(SECRET_FILE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(unix)]
fn restrict_mode(path: &Path, mode: u32) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("chmod {:o} {}", mode, path.display()))
}

#[cfg(not(unix))]
fn restrict_mode(_path: &Path, _mode: u32) -> anyhow::Result<()> {
    Ok(())
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryFileSystem {
    files: std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, String>>,
    modes: std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, u32>>,
    writes: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MemoryFileSystem {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(&self, path: &Path, contents: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
    }

    pub(crate) fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub(crate) fn mode(&self, path: &Path) -> Option<u32> {
        self.modes.lock().unwrap().get(path).copied()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        self.contents(path)
            .ok_or_else(|| anyhow::anyhow!("file not found: {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.put(path, contents);
        Ok(())
    }

    fn remove(&self, path: &Path) -> anyhow::Result<()> {
        self.files.lock().unwrap().remove(path);
        self.modes.lock().unwrap().remove(path);
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: u32) -> anyhow::Result<()> {
        if !self.exists(path) {
            anyhow::bail!("file not found: {}", path.display());
        }
        self.modes.lock().unwrap().insert(path.to_path_buf(), mode);
        Ok(())
    }
}
