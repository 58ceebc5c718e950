//! rowfs-types: status codes and result types shared across rowfs crates.

pub mod result;
pub mod status;
pub mod status_code;

pub use result::{make_error, make_error_msg, Result};
pub use status::Status;
