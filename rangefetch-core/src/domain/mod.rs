//! Domain types: bars, datasets, date ranges, granularity, symbol table.

pub mod bar;
pub mod date_range;
pub mod granularity;
pub mod symbol_table;

pub use bar::{Bar, Dataset};
pub use date_range::DateRange;
pub use granularity::Granularity;
pub use symbol_table::SymbolTable;
