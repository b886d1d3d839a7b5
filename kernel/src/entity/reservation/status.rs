use serde::{Deserialize, Serialize};

use crate::entity::{CopyId, HoldUntil};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReservationStatus {
    Queued,
    HoldReady {
        copy_id: CopyId,
        hold_until: HoldUntil,
    },
    LoanComplete,
    Expired,
}

/// The state of a reservation without the hold details, as exposed to callers.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationPhase {
    Queued,
    HoldReady,
    LoanComplete,
    Expired,
}

pub const QUEUED: &str = "queued";
pub const HOLD_READY: &str = "hold_ready";
pub const LOAN_COMPLETE: &str = "loan_complete";
pub const EXPIRED: &str = "expired";

impl ReservationStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ReservationStatus::Queued => QUEUED,
            ReservationStatus::HoldReady { .. } => HOLD_READY,
            ReservationStatus::LoanComplete => LOAN_COMPLETE,
            ReservationStatus::Expired => EXPIRED,
        }
    }

    pub fn phase(&self) -> ReservationPhase {
        match self {
            ReservationStatus::Queued => ReservationPhase::Queued,
            ReservationStatus::HoldReady { .. } => ReservationPhase::HoldReady,
            ReservationStatus::LoanComplete => ReservationPhase::LoanComplete,
            ReservationStatus::Expired => ReservationPhase::Expired,
        }
    }

    /// Queued and HoldReady reservations still occupy a place in the queue.
    pub fn is_active(&self) -> bool {
        match self {
            ReservationStatus::Queued | ReservationStatus::HoldReady { .. } => true,
            ReservationStatus::LoanComplete | ReservationStatus::Expired => false,
        }
    }
}
