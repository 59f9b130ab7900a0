//! Top-level generator producing the five output files.

use crate::error::CodegenError;
use crate::rust::{
    BitFieldGenerator, BitFlagsGenerator, CompoundGenerator, EnumGenerator, ObjectGenerator,
};
use nifgen_schema::{Context, TargetProfile};
use std::path::Path;

/// Lints the nif.xml naming scheme would otherwise trigger in emitted code.
const LINT_ALLOWS: &str = "#![allow(\n    \
    non_camel_case_types,\n    \
    non_snake_case,\n    \
    non_upper_case_globals,\n    \
    unused_imports,\n    \
    unused_parens,\n    \
    clippy::all\n\
)]\n\n";

/// Generated Rust sources, one string per output module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// `bitflags.rs`
    pub bitflags: String,
    /// `enums.rs`
    pub enums: String,
    /// `bitfields.rs`
    pub bitfields: String,
    /// `compounds.rs`
    pub compounds: String,
    /// `objects.rs`
    pub objects: String,
}

impl GeneratedFiles {
    /// File names paired with their contents, in emission order.
    #[must_use]
    pub fn files(&self) -> [(&'static str, &str); 5] {
        [
            ("bitflags.rs", self.bitflags.as_str()),
            ("enums.rs", self.enums.as_str()),
            ("bitfields.rs", self.bitfields.as_str()),
            ("compounds.rs", self.compounds.as_str()),
            ("objects.rs", self.objects.as_str()),
        ]
    }

    /// Writes all files into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the directory or a file cannot be
    /// written, or `CodegenError::Generation` if `dir` is not a directory.
    pub fn write_to(&self, dir: &Path) -> Result<(), CodegenError> {
        if dir.exists() && !dir.is_dir() {
            return Err(CodegenError::generation(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        std::fs::create_dir_all(dir)?;

        for (name, contents) in self.files() {
            let path = dir.join(name);
            std::fs::write(&path, contents)?;
            tracing::info!(path = %path.display(), bytes = contents.len(), "wrote");
        }
        Ok(())
    }
}

/// Code generator for a schema [`Context`].
pub struct Generator<'a> {
    ctx: &'a Context,
    profile: &'a TargetProfile,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(ctx: &'a Context, profile: &'a TargetProfile) -> Self {
        Self { ctx, profile }
    }

    /// Banner placed at the top of every generated file.
    #[must_use]
    pub fn header(&self) -> String {
        let version = self.ctx.version.as_deref().unwrap_or("unknown");
        let mut output = String::new();
        output.push_str(&format!(
            "//! Automatically generated by nifgen from nif.xml version {version}.\n"
        ));
        output.push_str("//!\n");
        output.push_str("//! Do not edit by hand; rerun the generator instead.\n\n");
        output.push_str(LINT_ALLOWS);
        output
    }

    /// Generates all output files.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field expression in the model is
    /// malformed.
    pub fn generate(&self) -> Result<GeneratedFiles, CodegenError> {
        let header = self.header();
        let with_header = |body: String| format!("{header}{body}");

        let files = GeneratedFiles {
            bitflags: with_header(BitFlagsGenerator::new(self.ctx).generate()),
            enums: with_header(EnumGenerator::new(self.ctx).generate()),
            bitfields: with_header(BitFieldGenerator::new(self.ctx).generate()),
            compounds: with_header(CompoundGenerator::new(self.ctx, self.profile).generate()?),
            objects: with_header(ObjectGenerator::new(self.ctx, self.profile).generate()?),
        };

        tracing::debug!(
            bitflags = self.ctx.bitflags.len(),
            enums = self.ctx.enums.len(),
            bitfields = self.ctx.bitfields.len(),
            compounds = self.ctx.compounds.len(),
            objects = self.ctx.objects.len(),
            "generated sources"
        );

        Ok(files)
    }
}
