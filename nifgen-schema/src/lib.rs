//! # nifgen schema
//!
//! nif.xml reader and filtered schema model.
//!
//! This crate provides:
//! - XML document parsing into a generic element tree
//! - Version parsing and the inclusion predicates for a [`TargetProfile`]
//! - The condition/arithmetic expression normalizer
//! - The schema model (bit flags, enums, bit fields, compounds, objects)
//!   with the field redeclaration rule and the object hierarchy

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod expr;
pub mod hierarchy;
pub mod naming;
pub mod parser;
pub mod predicates;
pub mod profile;
pub mod structs;
pub mod types;
pub mod version;

pub use context::Context;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ParseError, SchemaError};
pub use expr::parse_expression;
pub use hierarchy::Hierarchy;
pub use parser::{Attributes, Document, Element, parse_document};
pub use predicates::{should_emit_member, should_emit_struct};
pub use profile::{FieldOverride, TargetProfile};
pub use structs::{Compound, NiObject};
pub use types::{BitField, BitFieldMember, BitFlags, Enum, FieldInsert, FieldMap, SchemaType};
pub use version::{Version, VersionRelation, compare};
