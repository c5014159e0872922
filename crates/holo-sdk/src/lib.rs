pub mod base;
pub mod field;
pub mod op;
pub mod registry;
pub mod sample;
pub mod schema;

pub use base::{BaseAnnotator, BaseFilter};
pub use field::Field;
pub use op::{Operator, OperatorFactory};
pub use registry::OperatorRegistry;
pub use sample::Sample;
pub use schema::{RecordSchema, SchemaError};

// Re-export anyhow for convenience
pub use anyhow::{Error, Result};
