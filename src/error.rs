use std::error::Error as StdError;
use std::fmt;

/// Error type for the routine builder
///
/// Covers the failures a session can run into: loading the catalog, writing the
/// selection store, and talking to the completion API. None of them are fatal;
/// callers surface them inline and stay ready for a retry.
///
/// # Example
///
/// ```rust
/// use routine_builder::Error;
///
/// fn describe(error: &Error) -> &'static str {
///     match error {
///         Error::Fetch(_) => "catalog unavailable",
///         Error::Persistence(_) => "selection not saved",
///         e if e.is_completion_error() => "assistant unavailable",
///         _ => "unexpected error",
///     }
/// }
///
/// assert_eq!(describe(&Error::MissingCredential("OPENAI_API_KEY".into())), "assistant unavailable");
/// ```
#[derive(Debug)]
pub enum Error {
    /// Catalog could not be fetched or was not well-formed
    Fetch(String),
    /// Durable store could not be read or written
    Persistence(String),
    /// HTTP transport error while calling the completion API
    Request(reqwest::Error),
    /// Completion API error with message and optional status code
    Response(String, Option<u16>),
    /// Completion response body could not be parsed
    Parse(serde_json::Error),
    /// No credential available; carries the variable that was consulted
    MissingCredential(String),
    /// Credential could not be turned into a header value
    Header(String),
    /// Other errors
    Other(String),
}

impl Error {
    /// Whether this error belongs to a failed completion request.
    pub fn is_completion_error(&self) -> bool {
        matches!(
            self,
            Error::Request(_)
                | Error::Response(..)
                | Error::Parse(_)
                | Error::MissingCredential(_)
                | Error::Header(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fetch(msg) => write!(f, "Catalog error: {}", msg),
            Error::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            Error::Request(e) => write!(f, "Request error: {}", e),
            Error::Response(msg, status) => match status {
                Some(code) => write!(f, "API error (status {}): {}", code, msg),
                None => write!(f, "API error: {}", msg),
            },
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::MissingCredential(source) => write!(f, "API key not found ({})", source),
            Error::Header(msg) => write!(f, "Header error: {}", msg),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Request(e) => Some(e),
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
