/// Error types for XML to JSON conversion.
#[derive(Debug)]
pub enum Error {
    /// Malformed XML reported by the underlying reader
    Parse(quick_xml::Error),

    /// Failure writing to the JSON output sink, annotated with the
    /// slash-separated ancestor path of the element being emitted
    /// (e.g. `/catalog/book`)
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A tag name registered under two different grouping rules
    RuleConflict { tag: String },

    /// Structurally invalid input that the reader did not reject itself
    /// (bad attribute, unresolved entity, premature end of document)
    Malformed(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "XML parse error: {}", e),
            Error::Io { path, source } => {
                write!(f, "failed writing JSON while handling '{}': {}", path, source)
            }
            Error::RuleConflict { tag } => {
                write!(f, "conflicting grouping rules registered for tag '{}'", tag)
            }
            Error::Malformed(msg) => write!(f, "malformed document: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Io { source, .. } => Some(source),
            Error::RuleConflict { .. } => None,
            Error::Malformed(_) => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Parse(err)
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;
