mod env;
mod resolve;

pub use env::EnvNames;
pub use resolve::{resolve_key, ResolveRequest};
