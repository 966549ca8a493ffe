use thiserror::Error;

pub type RfResult<T> = Result<T, RfError>;

#[derive(Error, Debug)]
pub enum RfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
