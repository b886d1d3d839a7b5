use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Suspended,
}

const ACTIVE: &str = "active";
const SUSPENDED: &str = "suspended";

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => ACTIVE,
            MemberStatus::Suspended => SUSPENDED,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ACTIVE => Some(MemberStatus::Active),
            SUSPENDED => Some(MemberStatus::Suspended),
            _ => None,
        }
    }
}
