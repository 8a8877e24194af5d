use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Ingestion worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
