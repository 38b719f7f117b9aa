//! Watch registry delivery order, duplicate rejection and closer semantics.

use kiln_watch::{WatchError, WatchEventKind, WatchKind, WatchRegistry};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn file_recorder(log: &Log, name: &'static str) -> impl Fn(&str, WatchEventKind) + 'static {
    let log = Rc::clone(log);
    move |path: &str, kind: WatchEventKind| log.borrow_mut().push(format!("{name} {kind} {path}"))
}

fn dir_recorder(log: &Log, name: &'static str) -> impl Fn(&str) + 'static {
    let log = Rc::clone(log);
    move |path: &str| log.borrow_mut().push(format!("{name} {path}"))
}

#[test]
fn file_then_parent_then_recursive_ancestors() {
    let registry = WatchRegistry::new();
    let log: Log = Rc::default();
    let _root = registry.watch_directory("/", dir_recorder(&log, "root"), true).unwrap();
    let _flat = registry.watch_directory("/src", dir_recorder(&log, "src"), false).unwrap();
    let _parent = registry
        .watch_directory("/src/m", dir_recorder(&log, "m"), false)
        .unwrap();
    let _file = registry
        .watch_file("/src/m/x.ts", file_recorder(&log, "file"))
        .unwrap();

    let delivered = registry.notify("/src/m/x.ts", WatchEventKind::Changed);
    assert_eq!(delivered, 3);
    assert_eq!(
        *log.borrow(),
        vec![
            "file Changed /src/m/x.ts",
            "m /src/m/x.ts",
            "root /src/m/x.ts",
        ]
    );
}

#[test]
fn duplicate_watchers_are_rejected() {
    let registry = WatchRegistry::new();
    let _file = registry.watch_file("/a.ts", |_: &str, _: WatchEventKind| {}).unwrap();
    let _dir = registry.watch_directory("/m", |_: &str| {}, true).unwrap();

    assert_eq!(
        registry
            .watch_file("/a.ts", |_: &str, _: WatchEventKind| {})
            .unwrap_err(),
        WatchError::DuplicateFileWatcher {
            path: "/a.ts".into()
        }
    );
    assert_eq!(
        registry.watch_directory("/m", |_: &str| {}, false).unwrap_err(),
        WatchError::DuplicateDirectoryWatcher { path: "/m".into() }
    );
    // A file and a directory watcher on the same path do not collide.
    assert!(registry.watch_directory("/a.ts", |_: &str| {}, false).is_ok());
}

#[test]
fn closer_is_idempotent_and_frees_the_path() {
    let registry = WatchRegistry::new();
    let closer = registry.watch_file("/a.ts", |_: &str, _: WatchEventKind| {}).unwrap();
    assert_eq!(closer.kind(), WatchKind::File);
    assert_eq!(closer.path(), "/a.ts");

    assert!(closer.close());
    assert!(!closer.close());
    assert!(closer.is_closed());
    assert!(!registry.is_watching_file("/a.ts"));

    let again = registry.watch_file("/a.ts", |_: &str, _: WatchEventKind| {}).unwrap();
    // The stale closer must not remove the new subscription.
    assert!(!closer.close());
    assert!(registry.is_watching_file("/a.ts"));
    assert!(again.close());
}

#[test]
fn callbacks_may_close_their_own_watcher() {
    let registry = WatchRegistry::new();
    let slot: Rc<RefCell<Option<kiln_watch::WatchCloser>>> = Rc::default();
    let inner = Rc::clone(&slot);
    let closer = registry
        .watch_file("/a.ts", move |_: &str, _: WatchEventKind| {
            if let Some(closer) = inner.borrow().as_ref() {
                closer.close();
            }
        })
        .unwrap();
    *slot.borrow_mut() = Some(closer);

    assert_eq!(registry.notify("/a.ts", WatchEventKind::Deleted), 1);
    assert!(!registry.is_watching_file("/a.ts"));
    assert_eq!(registry.notify("/a.ts", WatchEventKind::Created), 0);
}
