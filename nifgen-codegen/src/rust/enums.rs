//! Enum code generation.

use super::push_doc;
use nifgen_schema::{Context, Enum};

/// Generator for C-like enum definitions.
pub struct EnumGenerator<'a> {
    ctx: &'a Context,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Generates all enum definitions.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        output.push_str("use binrw::BinRead;\n\n");

        for e in self.ctx.enums.values() {
            output.push_str(&self.generate_enum(e));
        }

        output
    }

    /// Generates an enum definition.
    fn generate_enum(&self, e: &Enum) -> String {
        let mut output = String::new();

        push_doc(&mut output, "", &e.doc);
        output.push_str("#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, BinRead)]\n");
        output.push_str(&format!("#[br(repr = {})]\n", e.storage));
        output.push_str(&format!("#[repr({})]\n", e.storage));
        output.push_str(&format!("pub enum {} {{\n", e.name));
        for (name, value) in &e.options {
            output.push_str(&format!("    {name} = {value},\n"));
        }
        output.push_str("}\n\n");

        // Fallible conversion from the raw storage value
        output.push_str(&format!(
            "impl TryFrom<{}> for {} {{\n",
            e.storage, e.name
        ));
        output.push_str(&format!("    type Error = {};\n\n", e.storage));
        output.push_str(&format!(
            "    fn try_from(value: {}) -> Result<Self, Self::Error> {{\n",
            e.storage
        ));
        output.push_str("        match value {\n");
        for name in e.options.keys() {
            output.push_str(&format!(
                "            v if v == Self::{name} as {} => Ok(Self::{name}),\n",
                e.storage
            ));
        }
        output.push_str("            other => Err(other),\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl From<{}> for {} {{\n", e.name, e.storage));
        output.push_str(&format!("    fn from(value: {}) -> Self {{\n", e.name));
        output.push_str("        value as Self\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifgen_schema::TargetProfile;

    fn create_test_ctx() -> Context {
        let xml = r#"<niftoolsxml version="0.9.3.0">
    <enum name="AlphaFunction" storage="byte" prefix="ALPHA">
        Describes alpha blend modes.
        <option value="0" name="ONE" />
        <option value="1" name="ZERO" />
        <option value="0x0A" name="SATURATE" />
    </enum>
    <enum name="CycleType" storage="uint">
        <option value="0" name="CYCLE_LOOP" />
        <option value="2" name="CYCLE_CLAMP" />
    </enum>
</niftoolsxml>"#;
        Context::parse(xml, &TargetProfile::default()).expect("Failed to parse")
    }

    #[test]
    fn test_generate_enum() {
        let ctx = create_test_ctx();
        let output = EnumGenerator::new(&ctx).generate();

        assert!(output.contains("/// Describes alpha blend modes.\n"));
        assert!(output.contains("#[br(repr = u8)]\n#[repr(u8)]\npub enum AlphaFunction {"));
        assert!(output.contains("    ALPHA_ONE = 0,\n"));
        assert!(output.contains("    ALPHA_SATURATE = 10,\n"));
        assert!(output.contains("pub enum CycleType {"));
        assert!(output.contains("    CYCLE_CLAMP = 2,\n"));
    }

    #[test]
    fn test_generate_conversions() {
        let ctx = create_test_ctx();
        let output = EnumGenerator::new(&ctx).generate();

        assert!(output.contains("impl TryFrom<u8> for AlphaFunction {"));
        assert!(output.contains("v if v == Self::ALPHA_ZERO as u8 => Ok(Self::ALPHA_ZERO),"));
        assert!(output.contains("impl From<CycleType> for u32 {"));
    }
}
