mod env;
pub mod helpers;
pub mod json;
mod secret;

pub use env::{env_string, EnvReader, MissingEnvVars};
pub use secret::Secret;

/// The User-Agent sent with every outgoing request to Erply and Voog
pub const USER_AGENT: &str = concat!("voog-erply-sync/", env!("CARGO_PKG_VERSION"));
