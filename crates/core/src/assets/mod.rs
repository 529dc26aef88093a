//! Widget bundle storage using Apache OpenDAL.
//!
//! Widget bundles are the heavyweight content units behind deferred regions.
//! They live in vendor-agnostic object storage:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - Process memory (tests and demos)

mod error;
mod loader;
mod store;

pub use error::AssetError;
pub use loader::StoredContentLoader;
pub use store::{AssetStore, ContentUnit};
