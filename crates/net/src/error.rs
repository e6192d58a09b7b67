use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid lookup url: {0}")]
    InvalidUrl(String),
    #[error("client build error: {0}")]
    Client(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("decode error: {0}")]
    Decode(String),
}
