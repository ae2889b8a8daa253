//! Standard Forthic modules
//!
//! This module contains the standard library modules for Forthic:
//! - **boolean**: Comparison, logic, and membership operations
//! - **math**: Arithmetic operations
//! - **core**: Stack, variable, control, interpreter, and screen operations
//! - **array**: Array and record data transformation
//! - **record**: Dictionary operations
//! - **functional**: Higher-order collection operations (map/filter/group/sort)
//! - **string**: Text processing
//! - **json**: JSON serialization
//! - **tsv**: Tab-separated-value serialization
//! - **datetime**: Date/time operations

pub mod array;
pub mod boolean;
pub mod core;
pub mod datetime;
pub mod functional;
pub mod json;
pub mod math;
pub mod record;
pub mod string;
pub mod tsv;

pub use array::ArrayModule;
pub use boolean::BooleanModule;
pub use core::CoreModule;
pub use datetime::DateTimeModule;
pub use functional::FunctionalModule;
pub use json::JSONModule;
pub use math::MathModule;
pub use record::RecordModule;
pub use string::StringModule;
pub use tsv::TSVModule;
