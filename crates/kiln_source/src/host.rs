//! The file-system capabilities a type-checking engine may ask of its host.
//!
//! Only `file_exists` and `read_file` are mandatory. The directory-oriented
//! capabilities are optional, and a host that cannot answer them reports
//! [`Capability::Unsupported`] instead of leaving the caller to crash on a
//! missing function.

/// The answer to an optional host query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    /// The host implements the query and produced this value.
    Supported(T),
    /// The host does not implement the query. Callers pick their own fallback.
    Unsupported,
}

impl<T> Capability<T> {
    /// Returns `true` if the host answered the query.
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported(_))
    }

    /// Returns the answer, or `fallback` if the host does not support the query.
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Capability::Supported(value) => value,
            Capability::Unsupported => fallback,
        }
    }
}

/// Read access to the files of the current round.
///
/// Reading a path that does not exist yields `None`, never an error.
pub trait FileSystemHost {
    /// Returns `true` if `path` exists in the current round.
    fn file_exists(&self, path: &str) -> bool;

    /// Returns the text at `path`, or `None` if absent.
    fn read_file(&self, path: &str) -> Option<&str>;

    /// Reports whether a directory exists.
    fn directory_exists(&self, _path: &str) -> Capability<bool> {
        Capability::Unsupported
    }

    /// Lists the subdirectories of a directory.
    fn get_directories(&self, _path: &str) -> Capability<Vec<String>> {
        Capability::Unsupported
    }

    /// Lists the files below a directory.
    fn read_directory(&self, _path: &str) -> Capability<Vec<String>> {
        Capability::Unsupported
    }

    /// Resolves symbolic links in `path`.
    fn realpath(&self, _path: &str) -> Capability<String> {
        Capability::Unsupported
    }
}
