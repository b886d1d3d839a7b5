use error_stack::Report;
use serde::Serialize;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Fromln, AsRefln)]
pub struct TitleAuthor(String);

impl TitleAuthor {
    pub fn new(author: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let author = author.into();
        if author.trim().is_empty() {
            return Err(Report::new(KernelError::Validation).attach_printable("author is required"));
        }
        Ok(Self(author))
    }
}
