pub mod anchors;
pub mod csr;
pub mod dnssec;
pub mod error;
pub mod fetch;
pub mod output;
pub mod sources;

pub use error::{AnchorError, Result};
