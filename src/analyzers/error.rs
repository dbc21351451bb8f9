use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("no input data: observation log {0} does not exist")]
    NoInputData(PathBuf),
    #[error("failed to read observation log: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed observation log: {0}")]
    Csv(#[from] csv::Error),
}
