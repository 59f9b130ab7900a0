//! # nifgen codegen
//!
//! binrw declaration generation from nif.xml.
//!
//! This crate provides:
//! - `bitflags!` sets, C-like enums and bit field newtypes
//! - Compound and block object structs with binrw read attributes
//! - The `NiObject` dispatch enum over every concrete block type

pub mod error;
pub mod generator;
pub mod rust;

pub use error::CodegenError;
pub use generator::{GeneratedFiles, Generator};

use nifgen_schema::{Context, TargetProfile};

/// Generates Rust sources from a nif.xml string.
///
/// # Arguments
/// * `xml` - nif.xml content
/// * `profile` - Target versions and exclusion rules
///
/// # Returns
/// The generated files and the model they were built from.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(
    xml: &str,
    profile: &TargetProfile,
) -> Result<(GeneratedFiles, Context), CodegenError> {
    let ctx = Context::parse(xml, profile)?;
    let files = Generator::new(&ctx, profile).generate()?;
    Ok((files, ctx))
}

/// Generates Rust sources from a nif.xml file.
///
/// # Arguments
/// * `path` - Path to nif.xml
/// * `profile` - Target versions and exclusion rules
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    profile: &TargetProfile,
) -> Result<(GeneratedFiles, Context), CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, profile)
}
