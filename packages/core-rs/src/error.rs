use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file listing request failed: {0}")]
    Transport(String),
    #[error("file listing returned status {0:?}")]
    Status(String),
    #[error("file listing could not be decoded: {0}")]
    Decode(String),
    #[error("malformed record {id:?}: {reason}")]
    MalformedRecord { id: String, reason: String },
    #[error("duplicate record id {0:?}")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("no action is awaiting confirmation")]
    NothingPending,
    #[error("delete of {id} failed: {reason}")]
    Delete { id: String, reason: String },
    #[error("cleanup failed: {0}")]
    Cleanup(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Parse { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
}
