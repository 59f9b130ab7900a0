//! Bit flag set generation.

use super::push_doc;
use nifgen_schema::{BitFlags, Context};

/// Generator for `bitflags!` declarations.
pub struct BitFlagsGenerator<'a> {
    ctx: &'a Context,
}

impl<'a> BitFlagsGenerator<'a> {
    /// Creates a new bit flags generator.
    #[must_use]
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Generates all bit flag sets.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        output.push_str("use binrw::{\n");
        output.push_str("    BinRead, BinResult, Endian,\n");
        output.push_str("    io::{Read, Seek},\n");
        output.push_str("};\n");
        output.push_str("use bitflags::bitflags;\n\n");

        for flags in self.ctx.bitflags.values() {
            output.push_str(&self.generate_flags(flags));
        }

        output
    }

    fn generate_flags(&self, flags: &BitFlags) -> String {
        let mut output = String::new();

        output.push_str("bitflags! {\n");
        push_doc(&mut output, "    ", &flags.doc);
        output.push_str("    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]\n");
        output.push_str(&format!(
            "    pub struct {}: {} {{\n",
            flags.name, flags.storage
        ));
        for (name, bit) in &flags.flags {
            output.push_str(&format!("        const {name} = 1 << {bit};\n"));
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        // Unknown bits are kept so re-reading never loses data.
        output.push_str(&format!("impl BinRead for {} {{\n", flags.name));
        output.push_str("    type Args<'a> = ();\n\n");
        output.push_str("    fn read_options<R: Read + Seek>(\n");
        output.push_str("        reader: &mut R,\n");
        output.push_str("        endian: Endian,\n");
        output.push_str("        _args: Self::Args<'_>,\n");
        output.push_str("    ) -> BinResult<Self> {\n");
        output.push_str(&format!(
            "        {}::read_options(reader, endian, ()).map(Self::from_bits_retain)\n",
            flags.storage
        ));
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}
