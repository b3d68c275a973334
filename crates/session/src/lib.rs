//! PaperDesk Session Layer
//!
//! The client-resident state container (`Workspace`) that mediates every
//! UI-triggered mutation of paper, chat, library, and recency state, and
//! the `PaperStore` interface it persists through.
//!
//! Consistency policy: local state is a cache of server truth, mutated
//! optimistically. Background persistence is best-effort; failures are
//! logged and the local mutation stands. The one exception is the
//! library save, where the local append waits for the remote write so
//! the saved/unsaved indicator is never wrong.

mod remote;
mod store;
mod workspace;

pub use remote::RemoteStore;
pub use store::PaperStore;
pub use workspace::{BrowseState, Workspace};
