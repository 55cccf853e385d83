#![cfg_attr(debug_assertions, allow(dead_code))]

mod utils;

pub mod decoder;
pub mod emit;
pub mod error;
pub mod load;
pub mod overlap;
pub mod rank;
pub mod table;
pub mod template;

pub use decoder::{DecisionTable, Decoded, UNDEFINED};
pub use emit::{Backend, EmitConfig, EmitRecord, Guard, RangePolicy};
pub use error::CompileError;
pub use table::{PatternTable, TableBuilder};
pub use template::{CompiledPattern, FieldDescriptor, Width};

/// Compile one pattern table into its ordered guard records: rank by
/// specificity, prove every overlap is disambiguated, then emit for the
/// configured backend.
pub fn compile(
    table: PatternTable,
    config: &EmitConfig,
) -> Result<Vec<EmitRecord>, CompileError> {
    let ranked = rank::rank(table);
    overlap::analyze(&ranked)?;
    emit::emit(&ranked, config)
}
