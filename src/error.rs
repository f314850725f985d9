/// Result type alias for the generator
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the generator
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    SerializationError(String),
    /// A page could not be materialized by the page registry
    PageLoad { page: String, message: String },
    /// A recorded endpoint descriptor matches no declared method in the class hierarchy
    MethodNotFound {
        class: String,
        name: String,
        parameter_types: Vec<String>,
    },
    /// Two endpoints resolved to the same path and HTTP method
    DuplicateOperation {
        path: String,
        method: String,
        class: String,
    },
    /// The handler's event name does not map to a known HTTP method
    UnsupportedHttpMethod {
        class: String,
        method: String,
        event: String,
    },
    /// Component model metadata could not be decoded
    InvalidMetadata { class: String, message: String },
    SymbolNotFound(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::PageLoad { page, message } => {
                write!(f, "Unable to load page {}: {}", page, message)
            }
            Error::MethodNotFound {
                class,
                name,
                parameter_types,
            } => write!(
                f,
                "No method {}({}) declared in class {} or any of its supertypes",
                name,
                parameter_types.join(", "),
                class
            ),
            Error::DuplicateOperation {
                path,
                method,
                class,
            } => write!(
                f,
                "There are at least two different REST endpoints for path {} and HTTP method {} in class {}",
                path, method, class
            ),
            Error::UnsupportedHttpMethod {
                class,
                method,
                event,
            } => write!(
                f,
                "Method {}.{} handles event {} which is not an HTTP method",
                class, method, event
            ),
            Error::InvalidMetadata { class, message } => {
                write!(f, "Invalid component metadata for {}: {}", class, message)
            }
            Error::SymbolNotFound(symbol) => write!(f, "Symbol {} is not defined", symbol),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}
