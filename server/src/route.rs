mod loan;
mod member;
mod reservation;
mod title;

pub use self::{loan::*, member::*, reservation::*, title::*};
