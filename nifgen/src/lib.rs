//! # nifgen
//!
//! Generates typed binrw deserializers for the NetImmerse/Gamebryo NIF
//! format from the niftools `nif.xml` description.
//!
//! ## Pipeline
//!
//! 1. [`schema`] reads nif.xml, filters every structure and member against a
//!    [`TargetProfile`] of deployment versions, normalizes condition
//!    expressions, and builds the schema model.
//! 2. [`codegen`] turns the model into five Rust modules.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nifgen::prelude::*;
//!
//! let profile = TargetProfile::default();
//! let ctx = Context::from_file("nif.xml", &profile)?;
//! let files = Generator::new(&ctx, &profile).generate()?;
//! files.write_to("src".as_ref())?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - XML reading, version predicates, expressions, model
//! - [`codegen`] - Rust source generation
//! - [`cli`] - Command line front end used by the `nifgen` binary

pub mod cli;
pub mod prelude;

/// nif.xml parsing and the schema model.
pub mod schema {
    pub use nifgen_schema::*;
}

/// Rust source generation from the schema model.
pub mod codegen {
    pub use nifgen_codegen::*;
}

// Re-export commonly used items at the crate root
pub use nifgen_codegen::{CodegenError, GeneratedFiles, Generator};
pub use nifgen_schema::{Context, Diagnostic, ParseError, SchemaError, TargetProfile, Version};
