pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("malformed event payload: {0}")]
    Event(#[from] serde_json::Error),
    #[error("failed to read event payload: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty response while protecting branch {0}")]
    EmptyProtectionResponse(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("input required and not supplied: {0}")]
    MissingInput(&'static str),
    #[error("invalid branch pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid value '{value}' for {input}: {reason}")]
    InvalidValue {
        input: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum RemoteError {
    #[error("github request failed: {}", api_message(.0))]
    Api(octocrab::Error),
    #[error("unreadable response body: {0}")]
    Body(serde_json::Error),
    #[error("graphql request returned errors: {0}")]
    Graphql(String),
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },
    #[error("cannot build request route: {0}")]
    InvalidRoute(String),
}

impl From<octocrab::Error> for RemoteError {
    fn from(error: octocrab::Error) -> Self {
        RemoteError::Api(error)
    }
}

/// octocrab's own `Display` appends a captured backtrace; keep only the cause.
fn api_message(error: &octocrab::Error) -> String {
    match std::error::Error::source(error) {
        Some(source) => source.to_string(),
        None => error.to_string().lines().next().unwrap_or_default().to_string(),
    }
}
