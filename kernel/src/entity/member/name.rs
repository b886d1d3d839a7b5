use error_stack::Report;
use serde::Serialize;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize)]
pub struct MemberName(String);

impl MemberName {
    pub fn new(name: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(
                Report::new(KernelError::Validation).attach_printable("member name is required")
            );
        }
        Ok(Self(name))
    }
}
