//! Works out how much ORE a nanofactory needs, given its reaction list.

mod formula;
mod resolve;

pub use formula::{
    Formula, FormulaError, FormulaTable, ParseError, Quantity, FUEL, ORE,
};
pub use resolve::{resolve, Leftovers, ResolveError};
