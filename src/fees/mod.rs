pub mod calculator;
pub mod types;

pub use calculator::{compute_fee, FeeError};
pub use types::{
    BrokerFeeResult, CommissionSchedule, FeeBreakdown, FeeSchedule, FxFee, FxPolicy, PlatformFee,
};
