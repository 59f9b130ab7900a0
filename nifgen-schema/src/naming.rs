//! Conversion of nif.xml names into Rust identifiers.

/// nif.xml basic types that map onto Rust primitives or fixed support types.
const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("uint64", "u64"),
    ("int64", "i64"),
    ("ulittle32", "u32"),
    ("uint", "u32"),
    ("int", "i32"),
    ("ushort", "u16"),
    ("short", "i16"),
    ("char", "i8"),
    ("byte", "u8"),
    ("bool", "bool"),
    ("float", "f32"),
    ("hfloat", "f16"),
    ("string", "NiString"),
    ("#T#", "T"),
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/// Returns true for non-empty text made only of numeric characters.
#[must_use]
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_numeric)
}

/// Upper-cases the first character of a structure name.
#[must_use]
pub fn convert_struct_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a nif.xml type reference into the Rust type name.
#[must_use]
pub fn convert_type(name: &str) -> String {
    BUILTIN_TYPES
        .iter()
        .find(|(xml, _)| *xml == name)
        .map_or_else(|| convert_struct_name(name), |(_, rust)| (*rust).to_string())
}

/// Converts a field name (or a bare identifier inside an expression) into a
/// Rust field reference.
///
/// `#ARG#` becomes the generated `arg` parameter and dotted text is read as
/// a version literal.
#[must_use]
pub fn convert_field_name(name: &str) -> String {
    if name == "#ARG#" {
        return "arg".to_string();
    }

    if name.contains('.') {
        let parts: Vec<&str> = name.split('.').collect();
        return format!("FileVersion({})", parts.join(", "));
    }

    let name = name.to_lowercase().replace(' ', "_").replace(':', "");
    if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("r#{name}")
    } else {
        name
    }
}

/// Converts an enum option or flag name into a variant identifier.
#[must_use]
pub fn convert_variant_name(name: &str) -> String {
    name.replace([' ', ':'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("4"));
        assert!(is_numeric("128"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("0x10"));
        assert!(!is_numeric("Num Vertices"));
    }

    #[test]
    fn test_convert_type() {
        assert_eq!(convert_type("ushort"), "u16");
        assert_eq!(convert_type("hfloat"), "f16");
        assert_eq!(convert_type("#T#"), "T");
        assert_eq!(convert_type("niNode"), "NiNode");
        assert_eq!(convert_type("Vector3"), "Vector3");
    }

    #[test]
    fn test_convert_field_name() {
        assert_eq!(convert_field_name("Num Vertices"), "num_vertices");
        assert_eq!(convert_field_name("UV Sets: Count"), "uv_sets_count");
        assert_eq!(convert_field_name("#ARG#"), "arg");
        assert_eq!(convert_field_name("Type"), "r#type");
        assert_eq!(convert_field_name("20.2.0.7"), "FileVersion(20, 2, 0, 7)");
    }

    #[test]
    fn test_convert_variant_name() {
        assert_eq!(convert_variant_name("ALPHA ONE"), "ALPHAONE");
        assert_eq!(convert_variant_name("F_SNORM16:2"), "F_SNORM162");
    }
}
