pub mod call_log;
pub mod client;
pub mod flash;
pub mod types;

pub use call_log::{ApiCall, ApiCallLog};
pub use client::RedeemClient;
pub use flash::RedeemFlash;
pub use types::{RedeemError, RedeemRequest, RedeemResult};
