//! Application-wide constants.

/// Currency every rate is quoted against and every balance is valued in.
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Secondary display currency for valuations.
pub const DEFAULT_SECONDARY_CURRENCY: &str = "IDR";

/// Age in hours after which a rate is reported as stale.
pub const STALE_RATE_HOURS: i64 = 24;
