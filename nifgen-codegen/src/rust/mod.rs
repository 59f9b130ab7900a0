//! Rust code generation modules.

pub mod bitfields;
pub mod bitflags;
pub mod compounds;
pub mod enums;
pub mod fields;
pub mod objects;

pub use bitfields::BitFieldGenerator;
pub use bitflags::BitFlagsGenerator;
pub use compounds::CompoundGenerator;
pub use enums::EnumGenerator;
pub use fields::FieldRenderer;
pub use objects::ObjectGenerator;

/// Writes documentation lines as `///` comments at the given indentation.
pub(crate) fn push_doc(output: &mut String, indent: &str, lines: &[String]) {
    for line in lines {
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_doc() {
        let mut out = String::new();
        push_doc(
            &mut out,
            "    ",
            &["First.".to_string(), String::new(), "Third.".to_string()],
        );
        assert_eq!(out, "    /// First.\n    ///\n    /// Third.\n");
    }
}
