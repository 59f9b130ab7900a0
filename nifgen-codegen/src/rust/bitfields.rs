//! Packed bit field generation.

use super::push_doc;
use nifgen_schema::{BitField, BitFieldMember, Context};

/// Generator for bit field newtypes.
pub struct BitFieldGenerator<'a> {
    ctx: &'a Context,
}

impl<'a> BitFieldGenerator<'a> {
    /// Creates a new bit field generator.
    #[must_use]
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Generates all bit field definitions.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        output.push_str("use binrw::BinRead;\n\n");
        output.push_str("use crate::enums::*;\n\n");

        for bf in self.ctx.bitfields.values() {
            output.push_str(&self.generate_bitfield(bf));
        }

        output
    }

    fn generate_bitfield(&self, bf: &BitField) -> String {
        let mut output = String::new();

        push_doc(&mut output, "", &bf.doc);
        output.push_str("#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, BinRead)]\n");
        output.push_str(&format!("pub struct {}(pub {});\n\n", bf.name, bf.storage));

        output.push_str(&format!("impl {} {{\n", bf.name));
        for (name, member) in &bf.members {
            output.push_str(&self.generate_accessor(bf, name, member));
        }
        output.push_str("}\n\n");

        output
    }

    /// Generates one member accessor.
    fn generate_accessor(&self, bf: &BitField, name: &str, member: &BitFieldMember) -> String {
        let mut output = String::new();
        let raw = format!("((self.0 & {}) >> {})", member.mask, member.pos);
        let ty = member.ty.inner_type();

        if let Some(default) = &member.default {
            output.push_str(&format!("    /// Defaults to `{default}`.\n"));
        }
        output.push_str("    #[inline]\n");
        output.push_str("    #[must_use]\n");

        if member.ty.needs_bool_mapping() {
            output.push_str(&format!("    pub fn {name}(&self) -> bool {{\n"));
            output.push_str(&format!("        (self.0 & {}) != 0\n", member.mask));
        } else if let Some(e) = self.ctx.enums.get(&member.ty.ty) {
            output.push_str(&format!("    pub fn {name}(&self) -> Option<{ty}> {{\n"));
            output.push_str(&format!(
                "        {ty}::try_from({raw} as {}).ok()\n",
                e.storage
            ));
        } else {
            output.push_str(&format!("    pub fn {name}(&self) -> {ty} {{\n"));
            if ty == bf.storage {
                output.push_str(&format!("        {raw}\n"));
            } else {
                output.push_str(&format!("        {raw} as {ty}\n"));
            }
        }
        output.push_str("    }\n\n");

        output
    }
}
