pub mod error;

pub use error::{AdlensError, Result};
