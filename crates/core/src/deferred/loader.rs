//! Content loader capability.

use std::future::Future;

use async_trait::async_trait;

use super::error::LoadError;

/// Asynchronously produces one content unit, or fails.
///
/// Invoked with no arguments, at most once per mount.
#[async_trait]
pub trait ContentLoader: Send + Sync + 'static {
    /// Artifact produced on success.
    type Output: Send + Sync + 'static;

    /// Produce the artifact.
    async fn load(&self) -> Result<Self::Output, LoadError>;
}

/// Loader backed by an async closure.
pub struct FnLoader<F>(F);

/// Wrap an async closure as a [`ContentLoader`].
pub fn loader_fn<F, Fut, T>(f: F) -> FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    T: Send + Sync + 'static,
{
    FnLoader(f)
}

#[async_trait]
impl<F, Fut, T> ContentLoader for FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    T: Send + Sync + 'static,
{
    type Output = T;

    async fn load(&self) -> Result<T, LoadError> {
        (self.0)().await
    }
}
