use thiserror::Error;

use crate::catalog::CourseId;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum PrereqError {
    #[error("malformed course code '{code}' in record '{record}'")]
    MalformedCode { code: String, record: String },
    #[error("course {0} lists itself as a prerequisite")]
    SelfLoop(CourseId),
    #[error("unknown course or department '{0}'")]
    UnknownNode(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PrereqError>;
