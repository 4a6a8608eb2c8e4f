//! Domain model of the fuelbook vehicle ledger.
//!
//! Vehicles, expense events, input normalisation, the reporting views and the
//! [`store::LedgerStore`] abstraction. No HTTP or database code lives here.

pub mod error;
pub mod event;
pub mod ledger;
pub mod report;
pub mod store;
pub mod vehicle;

pub use error::{Error, Result, ValidationError};
