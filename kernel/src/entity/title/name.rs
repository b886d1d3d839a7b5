use error_stack::Report;
use serde::Serialize;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Fromln, AsRefln)]
pub struct TitleName(String);

impl TitleName {
    pub fn new(name: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Report::new(KernelError::Validation).attach_printable("title is required"));
        }
        Ok(Self(name))
    }
}
