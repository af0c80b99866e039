//! Platform abstraction layer
//!
//! Browser-only pieces that back the platform-independent core:
//! - Storage (LocalStorage on web)

#[cfg(target_arch = "wasm32")]
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
