use std::fmt;

/// All errors the trainer can report.
#[derive(Debug)]
pub enum NetError {
    /// The network or training run was set up incorrectly; raised before any
    /// training work starts.
    Configuration(String),
    /// Two value sets disagree in size, e.g. a weight file and the live
    /// network it is loaded into, or a sample and the network's input layer.
    ShapeMismatch { expected: usize, found: usize },
    /// Training workers died while processing items; holds how many.
    WorkerLost(usize),
    /// An underlying I/O error.
    Io(std::io::Error),
    /// A JSON configuration file could not be read or written.
    Json(serde_json::Error),
}

impl NetError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "shape mismatch: expected {expected} values, found {found}"
            ),
            Self::WorkerLost(n) => write!(f, "{n} training worker(s) stopped unexpectedly"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for NetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, NetError>;
