mod common;
mod copy;
mod loan;
mod member;
mod reservation;
mod title;

pub use self::{common::*, copy::*, loan::*, member::*, reservation::*, title::*};
