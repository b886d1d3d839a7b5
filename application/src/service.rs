use std::fmt::Display;

use error_stack::Report;
use kernel::KernelError;

pub use self::{loan::*, member::*, reservation::*, title::*};

mod loan;
mod member;
mod reservation;
mod title;

/// Turns a missed lookup into a `NotFound` report naming what was looked for.
pub(crate) fn require<T>(
    found: Option<T>,
    kind: &str,
    id: impl Display,
) -> error_stack::Result<T, KernelError> {
    found.ok_or_else(|| {
        Report::new(KernelError::NotFound).attach_printable(format!("{kind} {id} does not exist"))
    })
}

#[cfg(test)]
pub(crate) mod test_module;
