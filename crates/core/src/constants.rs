//! Constants used throughout the clinic core crate.

/// Default address the REST server binds to.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";

/// Default PBKDF2 iteration count for stored password hashes.
pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 100_000;

/// Default session lifetime: one day.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Highest valid `dayOfWeek` (Saturday). Sunday is 0.
pub const MAX_DAY_OF_WEEK: u8 = 6;

/// First identifier assigned to each entity kind.
pub const FIRST_ID: u64 = 1;
