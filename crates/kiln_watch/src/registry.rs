//! The watch subscription registry and its notification walk.

use crate::error::WatchError;
use crate::event::{WatchEventKind, WatchKind};
use kiln_common::{ancestors, parent_dir};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

type FileCallback = Rc<dyn Fn(&str, WatchEventKind)>;
type DirectoryCallback = Rc<dyn Fn(&str)>;

struct FileEntry {
    id: u64,
    callback: FileCallback,
}

struct DirectoryEntry {
    id: u64,
    recursive: bool,
    callback: DirectoryCallback,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    files: HashMap<String, FileEntry>,
    directories: HashMap<String, DirectoryEntry>,
}

impl Inner {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// A callback selected for one notification, captured before any is invoked.
enum Delivery {
    File(FileCallback),
    Directory(DirectoryCallback),
}

/// Description of a live subscription, for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// The watched path.
    pub target: String,
    /// File or directory namespace.
    pub kind: WatchKind,
    /// Whether a directory watch covers all descendants.
    pub recursive: bool,
    /// Registry-unique id.
    pub id: u64,
}

/// Live file and directory subscriptions for one harness.
///
/// Cloning a registry yields another handle to the same subscriptions. The
/// registry is single-threaded; callbacks run synchronously inside
/// [`notify`](WatchRegistry::notify) and may register or close watchers
/// themselves without disturbing the delivery in progress.
#[derive(Clone, Default)]
pub struct WatchRegistry {
    inner: Rc<RefCell<Inner>>,
}

impl fmt::Debug for WatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("WatchRegistry")
            .field("files", &inner.files.len())
            .field("directories", &inner.directories.len())
            .finish()
    }
}

impl WatchRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `callback` to changes of the exact file `path`.
    ///
    /// Fails if `path` already has a file watcher.
    pub fn watch_file(
        &self,
        path: &str,
        callback: impl Fn(&str, WatchEventKind) + 'static,
    ) -> Result<WatchCloser, WatchError> {
        let mut inner = self.inner.borrow_mut();
        if inner.files.contains_key(path) {
            return Err(WatchError::DuplicateFileWatcher {
                path: path.to_string(),
            });
        }
        let id = inner.allocate_id();
        inner.files.insert(
            path.to_string(),
            FileEntry {
                id,
                callback: Rc::new(callback),
            },
        );
        debug!(path, id, "watch file");
        Ok(self.closer(WatchKind::File, path, id))
    }

    /// Subscribes `callback` to changes below the directory `path`.
    ///
    /// A non-recursive watcher only hears about direct children. Fails if
    /// `path` already has a directory watcher.
    pub fn watch_directory(
        &self,
        path: &str,
        callback: impl Fn(&str) + 'static,
        recursive: bool,
    ) -> Result<WatchCloser, WatchError> {
        let mut inner = self.inner.borrow_mut();
        if inner.directories.contains_key(path) {
            return Err(WatchError::DuplicateDirectoryWatcher {
                path: path.to_string(),
            });
        }
        let id = inner.allocate_id();
        inner.directories.insert(
            path.to_string(),
            DirectoryEntry {
                id,
                recursive,
                callback: Rc::new(callback),
            },
        );
        debug!(path, id, recursive, "watch directory");
        Ok(self.closer(WatchKind::Directory, path, id))
    }

    /// Delivers a change of `path` to every interested subscriber.
    ///
    /// Order: the file watcher on `path`, then the directory watcher on its
    /// immediate parent (recursive or not), then recursive directory
    /// watchers on each further ancestor up to the root. Returns the number
    /// of callbacks invoked.
    pub fn notify(&self, path: &str, kind: WatchEventKind) -> usize {
        let deliveries = self.collect(path);
        for delivery in &deliveries {
            match delivery {
                Delivery::File(callback) => {
                    debug!(path, %kind, "file change callback");
                    callback(path, kind);
                }
                Delivery::Directory(callback) => {
                    debug!(path, "directory change callback");
                    callback(path);
                }
            }
        }
        deliveries.len()
    }

    fn collect(&self, path: &str) -> Vec<Delivery> {
        let inner = self.inner.borrow();
        let mut deliveries = Vec::new();

        if let Some(entry) = inner.files.get(path) {
            deliveries.push(Delivery::File(Rc::clone(&entry.callback)));
        }

        let parent = parent_dir(path);
        if parent != path {
            if let Some(entry) = inner.directories.get(parent) {
                deliveries.push(Delivery::Directory(Rc::clone(&entry.callback)));
            }
            for dir in ancestors(parent) {
                if let Some(entry) = inner.directories.get(dir) {
                    if entry.recursive {
                        deliveries.push(Delivery::Directory(Rc::clone(&entry.callback)));
                    }
                }
            }
        }
        deliveries
    }

    /// Returns `true` if a file watcher is registered on `path`.
    pub fn is_watching_file(&self, path: &str) -> bool {
        self.inner.borrow().files.contains_key(path)
    }

    /// Returns `true` if a directory watcher is registered on `path`.
    pub fn is_watching_directory(&self, path: &str) -> bool {
        self.inner.borrow().directories.contains_key(path)
    }

    /// Returns the file watcher on `path`, if any.
    pub fn file_watcher(&self, path: &str) -> Option<Subscription> {
        self.inner.borrow().files.get(path).map(|entry| Subscription {
            target: path.to_string(),
            kind: WatchKind::File,
            recursive: false,
            id: entry.id,
        })
    }

    /// Returns the directory watcher on `path`, if any.
    pub fn directory_watcher(&self, path: &str) -> Option<Subscription> {
        self.inner
            .borrow()
            .directories
            .get(path)
            .map(|entry| Subscription {
                target: path.to_string(),
                kind: WatchKind::Directory,
                recursive: entry.recursive,
                id: entry.id,
            })
    }

    /// Lists every live subscription, files first, each group sorted by path.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        let inner = self.inner.borrow();
        let mut files: Vec<Subscription> = inner
            .files
            .iter()
            .map(|(path, entry)| Subscription {
                target: path.clone(),
                kind: WatchKind::File,
                recursive: false,
                id: entry.id,
            })
            .collect();
        files.sort_by(|a, b| a.target.cmp(&b.target));
        let mut directories: Vec<Subscription> = inner
            .directories
            .iter()
            .map(|(path, entry)| Subscription {
                target: path.clone(),
                kind: WatchKind::Directory,
                recursive: entry.recursive,
                id: entry.id,
            })
            .collect();
        directories.sort_by(|a, b| a.target.cmp(&b.target));
        files.extend(directories);
        files
    }

    /// Number of live file watchers.
    pub fn file_watcher_count(&self) -> usize {
        self.inner.borrow().files.len()
    }

    /// Number of live directory watchers.
    pub fn directory_watcher_count(&self) -> usize {
        self.inner.borrow().directories.len()
    }

    fn closer(&self, kind: WatchKind, path: &str, id: u64) -> WatchCloser {
        WatchCloser {
            registry: Rc::downgrade(&self.inner),
            kind,
            path: path.to_string(),
            id,
            closed: Cell::new(false),
        }
    }
}

/// Handle that ends one subscription.
///
/// Closing is idempotent and only ever removes the subscription it was
/// returned for: if the path has since been re-subscribed by someone else,
/// the newer subscription stays. Dropping a closer does not close it.
pub struct WatchCloser {
    registry: Weak<RefCell<Inner>>,
    kind: WatchKind,
    path: String,
    id: u64,
    closed: Cell<bool>,
}

impl fmt::Debug for WatchCloser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchCloser")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("id", &self.id)
            .field("closed", &self.closed.get())
            .finish()
    }
}

impl WatchCloser {
    /// The watched path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The subscription namespace.
    pub fn kind(&self) -> WatchKind {
        self.kind
    }

    /// Returns `true` once [`close`](WatchCloser::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Ends the subscription. Returns `true` if this call removed it.
    pub fn close(&self) -> bool {
        if self.closed.replace(true) {
            return false;
        }
        let Some(shared) = self.registry.upgrade() else {
            return false;
        };
        let mut inner = shared.borrow_mut();
        let removed = match self.kind {
            WatchKind::File => {
                if inner.files.get(&self.path).is_some_and(|e| e.id == self.id) {
                    inner.files.remove(&self.path).is_some()
                } else {
                    false
                }
            }
            WatchKind::Directory => {
                if inner
                    .directories
                    .get(&self.path)
                    .is_some_and(|e| e.id == self.id)
                {
                    inner.directories.remove(&self.path).is_some()
                } else {
                    false
                }
            }
        };
        debug!(path = %self.path, kind = %self.kind, id = self.id, removed, "watch closed");
        removed
    }
}
