mod inmemory;
mod postgres;

pub use self::{inmemory::*, postgres::*};
