use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown {kind} value: {value:?}")]
    UnknownValue { kind: &'static str, value: String },
    #[error("duplicate {store} id {id}")]
    DuplicateId { store: &'static str, id: u32 },
    #[error("expense {id} has a negative amount")]
    NegativeAmount { id: u32 },
    #[error("monthly budget must not be negative, got {0}")]
    NegativeBudget(rust_decimal::Decimal),
    #[error("fixture error: {0}")]
    Fixture(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Error::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}
