mod cache;
mod collection;
mod fs;
mod helpers;
mod record;
mod store;
mod types;

pub use cache::LastUsedCache;
pub use collection::KeyCollection;
pub use fs::{FileSystem, OsFileSystem};
pub(crate) use helpers::{
    default_data_dir, display_timestamp, format_timestamp, normalize_opt_string, project_dirs,
};
pub use store::KeyStore;
pub use types::{ApiKey, BaseUrl, KeyName};

#[cfg(test)]
pub(crate) use fs::MemoryFileSystem;
