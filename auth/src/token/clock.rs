use chrono::DateTime;
use chrono::Utc;

/// Source of the current time for token issuance and expiry checks.
///
/// Production code uses [`SystemClock`]; tests inject a fixed clock so
/// expiry behavior is deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
