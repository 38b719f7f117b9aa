//! Emulated file-system change notifications.
//!
//! [`WatchRegistry`] holds file and directory subscriptions and delivers change
//! events in the order and scope a real OS watch API would: the exact file
//! watcher first, then the watcher on the immediate parent directory, then
//! every recursive watcher further up the tree.

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod registry;

pub use error::WatchError;
pub use event::{WatchEventKind, WatchKind};
pub use registry::{Subscription, WatchCloser, WatchRegistry};
