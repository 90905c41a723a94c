use std::io;

/// Errors surfaced by the reader and the driver pipeline.
///
/// Each variant maps to the distinct process exit code reported by the
/// command line tool.
#[derive(Debug)]
pub enum MinerError {
    FileOpen { path: String, source: io::Error },
    FileRead { path: String, source: io::Error },
    FileWrite { path: String, source: io::Error },
    /// Minimum support was zero, negative, or not a number.
    Support(String),
    /// No items or transactions survive the support filter.
    NoItems,
    /// A record contained an empty item token (e.g. two adjacent commas).
    ItemExpected { path: String, record: usize },
    /// The same item occurred twice in one record.
    DuplicateItem { path: String, record: usize, item: String },
}

impl MinerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            MinerError::FileOpen { .. } => -2,
            MinerError::FileRead { .. } => -3,
            MinerError::FileWrite { .. } => -4,
            MinerError::Support(_) => -8,
            MinerError::NoItems => -9,
            MinerError::ItemExpected { .. } => -16,
            MinerError::DuplicateItem { .. } => -17,
        }
    }
}

impl std::fmt::Display for MinerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinerError::FileOpen { path, source } => {
                write!(f, "cannot open file {path}: {source}")
            }
            MinerError::FileRead { path, source } => {
                write!(f, "read error on file {path}: {source}")
            }
            MinerError::FileWrite { path, source } => {
                write!(f, "write error on file {path}: {source}")
            }
            MinerError::Support(s) => write!(f, "invalid minimal support {s}"),
            MinerError::NoItems => write!(f, "no items or transactions to work on"),
            MinerError::ItemExpected { path, record } => {
                write!(f, "file {path}, record {record}: item expected")
            }
            MinerError::DuplicateItem { path, record, item } => {
                write!(f, "file {path}, record {record}: duplicate item {item}")
            }
        }
    }
}

impl std::error::Error for MinerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MinerError::FileOpen { source, .. }
            | MinerError::FileRead { source, .. }
            | MinerError::FileWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}
