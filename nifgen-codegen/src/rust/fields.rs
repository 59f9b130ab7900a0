//! Field declarations shared by compounds and objects.

use crate::error::CodegenError;
use nifgen_schema::{Context, SchemaType, TargetProfile};

/// Returns true if the compound's reader takes the `arg` parameter.
#[must_use]
pub fn takes_arg(ctx: &Context, profile: &TargetProfile, name: &str) -> bool {
    profile.arg_compounds.iter().any(|c| c == name)
        || ctx.compounds.get(name).is_some_and(|c| c.mentions_arg())
}

/// Renders binrw-annotated field declarations.
pub struct FieldRenderer<'a> {
    ctx: &'a Context,
    profile: &'a TargetProfile,
}

impl<'a> FieldRenderer<'a> {
    /// Creates a new field renderer.
    #[must_use]
    pub fn new(ctx: &'a Context, profile: &'a TargetProfile) -> Self {
        Self { ctx, profile }
    }

    /// Combined existence check from `cond`, `ver1` and `ver2`.
    ///
    /// # Errors
    /// Returns `CodegenError::Parse` if an expression or version is
    /// malformed.
    pub fn guard(&self, field: &SchemaType) -> Result<Option<String>, CodegenError> {
        let cond = field.condition_expression()?;
        let versions = field.version_guard()?;

        Ok(match (cond, versions) {
            (Some(c), Some(v)) => Some(format!("({c}) && ({v})")),
            (c, v) => c.or(v),
        })
    }

    /// Arguments forwarded to a compound reader, if `field` refers to one.
    fn reader_args(&self, field: &SchemaType) -> Option<String> {
        if !self.ctx.compounds.contains_key(&field.ty) {
            return None;
        }

        if takes_arg(self.ctx, self.profile, &field.ty) {
            let arg = field.arg_expression().unwrap_or_else(|| "0".to_string());
            Some(format!("{arg} as usize, _header_version"))
        } else {
            Some("_header_version,".to_string())
        }
    }

    /// `map` closure turning the stored bytes of a `bool` field, scalar or
    /// array, into booleans.
    fn bool_mapping(field: &SchemaType) -> Option<String> {
        if !field.needs_bool_mapping() {
            return None;
        }
        let stored = SchemaType {
            ty: "u8".to_string(),
            ..field.clone()
        }
        .full_type();

        Some(match field.arr1 {
            None => "|b: u8| b != 0".to_string(),
            Some(_) if field.is_dynamic() => {
                format!("|v: {stored}| v.into_iter().map(|b| b != 0).collect()")
            }
            Some(_) => format!("|a: {stored}| a.map(|b| b != 0)"),
        })
    }

    /// Renders one field at four-space indentation.
    ///
    /// # Errors
    /// Returns `CodegenError::Parse` if an expression in the field is
    /// malformed.
    pub fn render(&self, name: &str, field: &SchemaType) -> Result<String, CodegenError> {
        let mut output = String::new();
        let guard = self.guard(field)?;

        if let Some(count) = field.count_expression()? {
            output.push_str(&format!("    #[br(count = {count})]\n"));
        }
        if let Some(map) = Self::bool_mapping(field) {
            output.push_str(&format!("    #[br(map = {map})]\n"));
        }
        if let Some(guard) = &guard {
            output.push_str(&format!("    #[br(if({guard}))]\n"));
        }
        if let Some(args) = self.reader_args(field) {
            if field.is_dynamic() {
                output.push_str(&format!("    #[br(args {{ inner: ({args}) }})]\n"));
            } else {
                output.push_str(&format!("    #[br(args({args}))]\n"));
            }
        }

        let ty = field.full_type();
        if guard.is_some() {
            output.push_str(&format!("    pub {name}: Option<{ty}>,\n"));
        } else {
            output.push_str(&format!("    pub {name}: {ty},\n"));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifgen_schema::Attributes;

    fn ctx() -> Context {
        let xml = r##"<niftoolsxml version="0.9.3.0">
    <struct name="Vector3">
        <field name="x" type="float" />
    </struct>
    <struct name="Morph">
        <field name="Num Keys" type="uint" />
    </struct>
    <struct name="QuatKey" generic="true">
        <field name="Time" type="float" cond="#ARG# #NEQ# 4" />
    </struct>
</niftoolsxml>"##;
        Context::parse(xml, &TargetProfile::default()).expect("Failed to parse")
    }

    fn field(pairs: &[(&str, &str)]) -> SchemaType {
        let attrs: Attributes = pairs.iter().copied().collect();
        SchemaType::from_attributes("field", &attrs).unwrap()
    }

    #[test]
    fn test_takes_arg() {
        let ctx = ctx();
        let profile = TargetProfile::default();
        assert!(takes_arg(&ctx, &profile, "Morph"));
        assert!(takes_arg(&ctx, &profile, "QuatKey"));
        assert!(!takes_arg(&ctx, &profile, "Vector3"));
    }

    #[test]
    fn test_render_plain() {
        let ctx = ctx();
        let profile = TargetProfile::default();
        let r = FieldRenderer::new(&ctx, &profile);
        assert_eq!(
            r.render("num_vertices", &field(&[("type", "ushort")])).unwrap(),
            "    pub num_vertices: u16,\n"
        );
    }

    #[test]
    fn test_render_bool() {
        let ctx = ctx();
        let profile = TargetProfile::default();
        let r = FieldRenderer::new(&ctx, &profile);
        assert_eq!(
            r.render("has_normals", &field(&[("type", "bool")])).unwrap(),
            "    #[br(map = |b: u8| b != 0)]\n    pub has_normals: bool,\n"
        );
    }

    #[test]
    fn test_render_bool_arrays() {
        let ctx = ctx();
        let profile = TargetProfile::default();
        let r = FieldRenderer::new(&ctx, &profile);
        assert_eq!(
            r.render("flags", &field(&[("type", "bool"), ("arr1", "4")])).unwrap(),
            "    #[br(map = |a: [u8; 4]| a.map(|b| b != 0))]\n    pub flags: [bool; 4],\n"
        );
        assert_eq!(
            r.render("mask", &field(&[("type", "bool"), ("arr1", "Num Bones")])).unwrap(),
            "    #[br(count = num_bones)]\n\
             \x20   #[br(map = |v: Vec<u8>| v.into_iter().map(|b| b != 0).collect())]\n\
             \x20   pub mask: Vec<bool>,\n"
        );
    }

    #[test]
    fn test_render_dynamic_conditional_compound() {
        let ctx = ctx();
        let profile = TargetProfile::default();
        let r = FieldRenderer::new(&ctx, &profile);
        let out = r
            .render(
                "normals",
                &field(&[
                    ("type", "Vector3"),
                    ("arr1", "Num Vertices"),
                    ("cond", "Has Normals"),
                    ("ver1", "10.0.1.0"),
                ]),
            )
            .unwrap();
        assert_eq!(
            out,
            "    #[br(count = num_vertices)]\n\
             \x20   #[br(if((has_normals) && (FileVersion(10, 0, 1, 0) <= _header_version)))]\n\
             \x20   #[br(args { inner: (_header_version,) })]\n\
             \x20   pub normals: Option<Vec<Vector3>>,\n"
        );
    }

    #[test]
    fn test_render_compound_with_arg() {
        let ctx = ctx();
        let profile = TargetProfile::default();
        let r = FieldRenderer::new(&ctx, &profile);
        let out = r
            .render(
                "quaternion_keys",
                &field(&[("type", "QuatKey"), ("template", "Quaternion"), ("arr1", "3"), ("arg", "Rotation Type")]),
            )
            .unwrap();
        assert_eq!(
            out,
            "    #[br(args(rotation_type as usize, _header_version))]\n    pub quaternion_keys: [QuatKey<Quaternion>; 3],\n"
        );
    }

    #[test]
    fn test_render_bad_condition() {
        let ctx = ctx();
        let profile = TargetProfile::default();
        let r = FieldRenderer::new(&ctx, &profile);
        assert!(matches!(
            r.render("x", &field(&[("type", "uint"), ("cond", "(broken")])),
            Err(CodegenError::Parse(_))
        ));
    }
}
