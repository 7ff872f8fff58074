//! System Definitions.
//!
//! Contém os tipos de erro que atravessam a fronteira entre o agendador e o
//! sistema operacional.

pub mod error;

pub use error::{Errno, SchedError};
