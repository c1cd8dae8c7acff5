//! Errors raised while building JSON contracts

use thiserror::Error;

/// JSON contract errors
#[derive(Debug, Error)]
pub enum Error {
    /// Contract type does not derive `Deserialize` as a plain struct
    #[error("Contract type `{0}` is not a struct")]
    NotAStruct(&'static str),
}
