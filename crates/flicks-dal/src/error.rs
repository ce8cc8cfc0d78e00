pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    RecordNotFound(String),

    #[error("Store lock poisoned")]
    StorePoisoned,
}
