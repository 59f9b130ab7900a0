//! Block object generation and the `NiObject` dispatch enum.

use super::fields::FieldRenderer;
use super::push_doc;
use crate::error::CodegenError;
use nifgen_schema::{Context, NiObject, TargetProfile};

/// Generator for block object structs.
pub struct ObjectGenerator<'a> {
    ctx: &'a Context,
    profile: &'a TargetProfile,
    fields: FieldRenderer<'a>,
}

impl<'a> ObjectGenerator<'a> {
    /// Creates a new object generator.
    #[must_use]
    pub fn new(ctx: &'a Context, profile: &'a TargetProfile) -> Self {
        Self {
            ctx,
            profile,
            fields: FieldRenderer::new(ctx, profile),
        }
    }

    /// Generates the dispatch enum followed by every object struct.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field expression is malformed.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let mut output = String::new();
        output.push_str("use binrw::{\n");
        output.push_str("    BinRead, BinResult, Endian, Error, binread,\n");
        output.push_str("    io::{Read, Seek},\n");
        output.push_str("};\n\n");
        output.push_str(
            "use crate::{basic::*, bitfields::*, bitflags::*, compounds::*, enums::*};\n\n",
        );

        output.push_str(&self.generate_dispatch());

        for object in self.ctx.objects.values() {
            output.push_str(&self.generate_object(object)?);
        }

        Ok(output)
    }

    fn concrete(&self) -> impl Iterator<Item = &'a NiObject> {
        self.ctx.objects.values().filter(|o| !o.is_abstract)
    }

    /// Generates the `NiObject` enum and its reader.
    fn generate_dispatch(&self) -> String {
        let mut output = String::new();
        let root = &self.profile.root_object;

        output.push_str("/// Any block that can appear in a file's block list.\n");
        output.push_str("#[derive(Clone, Debug, PartialEq)]\n");
        output.push_str(&format!("pub enum {root} {{\n"));
        for object in self.concrete() {
            output.push_str(&format!("    {0}({0}),\n", object.name));
        }
        output.push_str("}\n\n");

        output.push_str(&format!("impl BinRead for {root} {{\n"));
        output.push_str("    /// Block type name from the header, and the file version.\n");
        output.push_str("    type Args<'a> = (&'a [u8], FileVersion);\n\n");
        output.push_str("    fn read_options<R: Read + Seek>(\n");
        output.push_str("        reader: &mut R,\n");
        output.push_str("        endian: Endian,\n");
        output.push_str("        (name, version): Self::Args<'_>,\n");
        output.push_str("    ) -> BinResult<Self> {\n");
        output.push_str("        let pos = reader.stream_position()?;\n");
        output.push_str("        match name {\n");
        for object in self.concrete() {
            output.push_str(&format!(
                "            b\"{0}\" => {0}::read_options(reader, endian, (version,)).map(Self::{0}),\n",
                object.name
            ));
        }
        output.push_str("            _ => Err(Error::Custom {\n");
        output.push_str("                pos,\n");
        output.push_str(
            "                err: Box::new(format!(\"unsupported block type {}\", String::from_utf8_lossy(name))),\n",
        );
        output.push_str("            }),\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl {root} {{\n"));
        output.push_str("    /// Name of the block type as written in the file header.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn type_name(&self) -> &'static str {\n");
        output.push_str("        match self {\n");
        for object in self.concrete() {
            output.push_str(&format!(
                "            Self::{0}(_) => \"{0}\",\n",
                object.name
            ));
        }
        output.push_str("        }\n");
        output.push_str("    }\n\n");

        output.push_str("    /// Returns true if this block is `ancestor` or derives from it.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub fn inherits_from(&self, ancestor: &str) -> bool {\n");
        output.push_str("        match self {\n");
        for object in self.concrete() {
            let mut lineage = vec![object.name.as_str()];
            lineage.extend(self.ctx.hierarchy.ancestors(&object.name));
            lineage.push(root.as_str());
            let pattern = lineage
                .iter()
                .map(|name| format!("\"{name}\""))
                .collect::<Vec<_>>()
                .join(" | ");
            output.push_str(&format!(
                "            Self::{}(_) => matches!(ancestor, {pattern}),\n",
                object.name
            ));
        }
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }

    /// Generates one object struct, embedding its parent as `base`.
    fn generate_object(&self, object: &NiObject) -> Result<String, CodegenError> {
        let mut output = String::new();

        push_doc(&mut output, "", &object.doc);
        output.push_str("#[binread]\n");
        output.push_str("#[derive(Clone, Debug, PartialEq)]\n");
        output.push_str("#[br(import(_header_version: FileVersion))]\n");
        output.push_str(&format!("pub struct {} {{\n", object.name));

        if let Some(parent) = self.ctx.hierarchy.parent(&object.name) {
            output.push_str("    #[br(args(_header_version,))]\n");
            output.push_str(&format!("    pub base: {parent},\n"));
        }
        for (name, field) in object.fields.iter() {
            output.push_str(&self.fields.render(name, field)?);
        }
        output.push_str("}\n\n");

        Ok(output)
    }
}
