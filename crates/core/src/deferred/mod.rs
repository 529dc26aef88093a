//! Deferred loading of heavyweight content behind a placeholder.
//!
//! A mount starts `Pending` and renders a placeholder. Its first render
//! spawns the loader on the context's runtime; the state then moves once to
//! `Ready` or `Failed`:
//!
//! ```text
//!            first render              loader Ok
//!   mount ───────────────▶ Pending ─────────────▶ Ready   (content view)
//!                             │
//!                             │ loader Err / panic / timeout
//!                             ▼
//!                          Failed                          (failure view)
//! ```
//!
//! Dropping the mount aborts the load; observers never see a late update.

mod error;
mod loader;
mod mount;
mod types;

#[cfg(test)]
mod tests;

pub use error::LoadError;
pub use loader::{ContentLoader, FnLoader, loader_fn};
pub use mount::DeferredContentLoader;
pub use types::{DisplayParams, LoadPhase, LoadState, RenderContext, View};
