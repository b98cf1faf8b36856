pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Read-only view of the progression switch that permits the top quality tier.
///
/// The progression system owns the writer side; scoring only ever asks.
pub trait UnlockSource {
    fn is_unlocked(&self) -> bool;
}

impl UnlockSource for bool {
    fn is_unlocked(&self) -> bool {
        *self
    }
}
