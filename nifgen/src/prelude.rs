//! Prelude module for convenient imports.
//!
//! ```ignore
//! use nifgen::prelude::*;
//! ```

// Schema model
pub use nifgen_schema::{
    BitField, BitFlags, Compound, Context, Diagnostic, Enum, FieldMap, Hierarchy, NiObject,
    SchemaType,
};

// Filtering and expressions
pub use nifgen_schema::{
    TargetProfile, Version, VersionRelation, compare, parse_expression, should_emit_member,
    should_emit_struct,
};

// Errors
pub use nifgen_codegen::CodegenError;
pub use nifgen_schema::{ParseError, SchemaError};

// Generation
pub use nifgen_codegen::{GeneratedFiles, Generator, generate_from_file, generate_from_xml};
