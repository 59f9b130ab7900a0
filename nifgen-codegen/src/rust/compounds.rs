//! Compound struct generation.

use super::fields::{FieldRenderer, takes_arg};
use super::push_doc;
use crate::error::CodegenError;
use nifgen_schema::{Compound, Context, TargetProfile};

/// Generator for compound structs.
pub struct CompoundGenerator<'a> {
    ctx: &'a Context,
    profile: &'a TargetProfile,
    fields: FieldRenderer<'a>,
}

impl<'a> CompoundGenerator<'a> {
    /// Creates a new compound generator.
    #[must_use]
    pub fn new(ctx: &'a Context, profile: &'a TargetProfile) -> Self {
        Self {
            ctx,
            profile,
            fields: FieldRenderer::new(ctx, profile),
        }
    }

    /// Generates all compounds not listed as hand-written.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field expression is malformed.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let mut output = String::new();
        output.push_str("use binrw::{BinRead, binread};\n\n");
        output.push_str(
            "use crate::{basic::*, bitfields::*, bitflags::*, enums::*, objects::*};\n\n",
        );
        if !self.profile.manual_compounds.is_empty() {
            output.push_str("mod manual;\n");
            output.push_str("pub use self::manual::*;\n\n");
        }

        for compound in self.ctx.compounds.values() {
            if self.profile.is_manual(&compound.name) {
                tracing::debug!(compound = %compound.name, "skipping hand-written compound");
                continue;
            }
            output.push_str(&self.generate_compound(compound)?);
        }

        Ok(output)
    }

    /// Generates one compound struct.
    fn generate_compound(&self, compound: &Compound) -> Result<String, CodegenError> {
        let mut output = String::new();

        push_doc(&mut output, "", &compound.doc);
        output.push_str("#[binread]\n");
        output.push_str("#[derive(Clone, Debug, PartialEq)]\n");
        if takes_arg(self.ctx, self.profile, &compound.name) {
            output.push_str("#[br(import(arg: usize, _header_version: FileVersion))]\n");
        } else {
            output.push_str("#[br(import(_header_version: FileVersion))]\n");
        }

        if compound.generic {
            output.push_str(&format!(
                "pub struct {}<T: for<'a> BinRead<Args<'a> = ()> + 'static> {{\n",
                compound.name
            ));
        } else {
            output.push_str(&format!("pub struct {} {{\n", compound.name));
        }

        for (name, field) in compound.fields.iter() {
            output.push_str(&self.fields.render(name, field)?);
        }
        output.push_str("}\n\n");

        Ok(output)
    }
}
