mod loan;
mod member;
mod title;

pub use self::{loan::*, member::*, title::*};
