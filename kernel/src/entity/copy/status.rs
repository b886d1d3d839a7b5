use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CopyStatus {
    Available,
    Loaned,
    OnHold,
}

const AVAILABLE: &str = "available";
const LOANED: &str = "loaned";
const ON_HOLD: &str = "on_hold";

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => AVAILABLE,
            CopyStatus::Loaned => LOANED,
            CopyStatus::OnHold => ON_HOLD,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            AVAILABLE => Some(CopyStatus::Available),
            LOANED => Some(CopyStatus::Loaned),
            ON_HOLD => Some(CopyStatus::OnHold),
            _ => None,
        }
    }
}
