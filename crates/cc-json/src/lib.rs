//! JSON conversion rules shared by CC services
//!
//! - [`decimal`] and [`integer`]: `#[serde(with = ...)]` rules that write an
//!   absent number as `""` and read blank or numeric strings leniently.
//! - [`contract`]: projections that serialize any value with the shape of an
//!   interface struct.
//! - [`settings`]: options applied when writing or reading JSON text.

pub mod contract;
pub mod decimal;
mod error;
pub mod integer;
pub mod settings;
mod token;

pub use contract::{ContractResolver, InterfaceContractResolver};
pub use error::Error;
pub use rust_decimal::Decimal;
pub use settings::JsonSettings;
