use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Position-stable identifier allocated by the owning queue in submission order.
#[derive(
    Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln,
)]
pub struct ReservationId(i64);

impl ReservationId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}
