//! Command line front end.

use anyhow::{Context as _, Result, bail};
use clap::{ArgAction, Parser};
use nifgen_codegen::Generator;
use nifgen_schema::{Context, TargetProfile, Version};
use std::path::PathBuf;

/// Generate binrw deserializers for the NIF format from nif.xml.
#[derive(Parser, Debug)]
#[command(name = "nifgen", version, about)]
pub struct Cli {
    /// Path to nif.xml
    #[arg(long)]
    pub xml: PathBuf,

    /// Directory receiving bitflags.rs, enums.rs, bitfields.rs, compounds.rs and objects.rs
    #[arg(long, required_unless_present = "dry_run")]
    pub out_dir: Option<PathBuf>,

    /// JSON target profile; omitted keys keep the built-in defaults
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Deployment version to support (repeatable); replaces the profile's list
    #[arg(long = "target", value_name = "VERSION")]
    pub targets: Vec<String>,

    /// Build and generate everything but write no files
    #[arg(long)]
    pub dry_run: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Number of field conflicts reported while building the model.
    pub conflicts: usize,
    /// Compounds the consumer has to provide by hand.
    pub manual_compounds: Vec<String>,
    /// Whether files were written.
    pub written: bool,
}

impl Summary {
    /// Completion message printed by the binary.
    #[must_use]
    pub fn banner(&self) -> String {
        format!(
            "Done! Make sure to validate basic types, {}!\n{} field conflict(s) reported.",
            self.manual_compounds.join(", "),
            self.conflicts
        )
    }
}

impl Cli {
    /// Default log filter for the requested verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Loads the profile file, if any, and applies `--target` overrides.
    ///
    /// # Errors
    /// Fails if the profile cannot be read or deserialized, or a target
    /// version does not parse.
    pub fn load_profile(&self) -> Result<TargetProfile> {
        let mut profile = match &self.profile {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading profile {}", path.display()))?;
                serde_json::from_str::<TargetProfile>(&text)
                    .with_context(|| format!("parsing profile {}", path.display()))?
            }
            None => TargetProfile::default(),
        };

        if !self.targets.is_empty() {
            profile.versions = self
                .targets
                .iter()
                .map(|t| Version::parse(t).with_context(|| format!("invalid --target {t}")))
                .collect::<Result<Vec<_>>>()?;
        }

        if profile.versions.is_empty() {
            bail!("the target profile lists no versions");
        }
        Ok(profile)
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    /// Fails on any profile, schema, generation or IO error.
    pub fn run(&self) -> Result<Summary> {
        let profile = self.load_profile()?;
        tracing::info!(targets = ?profile.versions.iter().map(ToString::to_string).collect::<Vec<_>>(), "loaded profile");

        let ctx = Context::from_file(&self.xml, &profile)
            .with_context(|| format!("building schema model from {}", self.xml.display()))?;
        let files = Generator::new(&ctx, &profile).generate()?;

        let written = match (&self.out_dir, self.dry_run) {
            (Some(dir), false) => {
                files
                    .write_to(dir)
                    .with_context(|| format!("writing sources to {}", dir.display()))?;
                true
            }
            _ => {
                for (name, contents) in files.files() {
                    tracing::info!(file = name, bytes = contents.len(), "dry run, not written");
                }
                false
            }
        };

        Ok(Summary {
            conflicts: ctx.diagnostics.conflict_count(),
            manual_compounds: profile.manual_compounds.clone(),
            written,
        })
    }
}
