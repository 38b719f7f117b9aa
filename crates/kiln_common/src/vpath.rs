//! Helpers for `/`-separated virtual paths.
//!
//! The harness never touches a real filesystem, so paths are plain strings
//! with POSIX semantics. Paths are case-sensitive and compared byte-wise.

/// Returns the parent directory of `path`, following POSIX `dirname` rules.
///
/// The parent of a top-level entry is `/`, the parent of `/` is `/` itself,
/// and a relative path without separators has the parent `.`.
pub fn parent_dir(path: &str) -> &str {
    let trimmed = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        None => ".",
        Some(0) => "/",
        Some(idx) => &trimmed[..idx],
    }
}

/// Returns the final component of `path`.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Returns `true` if `path` starts at the virtual root.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Collapses `.` and `..` components and duplicate separators.
///
/// `..` above the root is dropped for absolute paths and kept for relative ones.
pub fn normalize(path: &str) -> String {
    let absolute = is_absolute(path);
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Resolves `relative` against the directory `dir`.
///
/// An absolute `relative` ignores `dir`. The result is normalized.
pub fn join(dir: &str, relative: &str) -> String {
    if is_absolute(relative) {
        normalize(relative)
    } else {
        normalize(&format!("{dir}/{relative}"))
    }
}

/// Iterates over the ancestors of `path`, nearest first, ending at the root.
///
/// The root (a directory whose parent is itself) is yielded once and the
/// walk stops there.
pub fn ancestors(path: &str) -> Ancestors<'_> {
    Ancestors {
        current: path,
        done: false,
    }
}

/// Iterator returned by [`ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    current: &'a str,
    done: bool,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }
        let parent = parent_dir(self.current);
        if parent == self.current {
            self.done = true;
            return None;
        }
        if parent_dir(parent) == parent {
            self.done = true;
        }
        self.current = parent;
        Some(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_nested_file() {
        assert_eq!(parent_dir("/m/sub/f.ts"), "/m/sub");
        assert_eq!(parent_dir("/m/sub"), "/m");
    }

    #[test]
    fn parent_of_top_level_and_root() {
        assert_eq!(parent_dir("/a.ts"), "/");
        assert_eq!(parent_dir("/"), "/");
    }

    #[test]
    fn parent_of_relative() {
        assert_eq!(parent_dir("a.ts"), ".");
        assert_eq!(parent_dir("."), ".");
        assert_eq!(parent_dir("src/a.ts"), "src");
    }

    #[test]
    fn parent_ignores_trailing_slash() {
        assert_eq!(parent_dir("/m/sub/"), "/m");
    }

    #[test]
    fn ancestors_walk_to_root() {
        let walk: Vec<&str> = ancestors("/m/sub/f.ts").collect();
        assert_eq!(walk, vec!["/m/sub", "/m", "/"]);
    }

    #[test]
    fn ancestors_of_root_is_empty() {
        assert_eq!(ancestors("/").count(), 0);
    }

    #[test]
    fn ancestors_of_relative_path_terminate() {
        let walk: Vec<&str> = ancestors("src/lib/a.ts").collect();
        assert_eq!(walk, vec!["src/lib", "src", "."]);
    }

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize("/m/./sub/../lib.d.ts"), "/m/lib.d.ts");
        assert_eq!(normalize("//a//b/"), "/a/b");
        assert_eq!(normalize("/../a"), "/a");
        assert_eq!(normalize("../a"), "../a");
        assert_eq!(normalize(""), ".");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn join_relative_and_absolute() {
        assert_eq!(join("/", "./module/b"), "/module/b");
        assert_eq!(join("/m", "./transitive_lib"), "/m/transitive_lib");
        assert_eq!(join("/m/sub", "../x"), "/m/x");
        assert_eq!(join("/m", "/abs/y"), "/abs/y");
    }

    #[test]
    fn file_name_and_absolute() {
        assert_eq!(file_name("/module/b.d.ts"), "b.d.ts");
        assert_eq!(file_name("b.ts"), "b.ts");
        assert!(is_absolute("/a.ts"));
        assert!(!is_absolute("a.ts"));
    }
}
