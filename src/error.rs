use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode row {row_num}")]
    Decode { row_num: usize },
    #[error("table full")]
    TableFull,
    #[error("tried to fetch page number out of bounds: {page_num}")]
    PageOutOfBounds { page_num: usize },
    #[error("{column} is longer than {max} bytes")]
    StringTooLong { column: &'static str, max: usize },
    #[error("{column} contains a NUL byte")]
    NulByte { column: &'static str },
    #[error("duplicate key {user_id}")]
    DuplicateKey { user_id: String },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid age {0:?}")]
    InvalidAge(String),
    #[error("page size must be positive")]
    InvalidPageSize,
    #[error("batch size must be positive")]
    InvalidBatchSize,
    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
