use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize, Fromln, AsRefln)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
