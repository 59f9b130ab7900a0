//! Prints what a nif.xml contributes for the default target profile.
//!
//! ```text
//! cargo run --example inspect -- path/to/nif.xml [ObjectName]
//! ```

use nifgen::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(xml) = args.next() else {
        anyhow::bail!("usage: inspect <nif.xml> [ObjectName]");
    };
    let focus = args.next().unwrap_or_else(|| "NiAVObject".to_string());

    let profile = TargetProfile::default();
    let ctx = Context::from_file(&xml, &profile)?;

    println!("nif.xml version {}", ctx.version.as_deref().unwrap_or("unknown"));
    println!("  bitflags:  {}", ctx.bitflags.len());
    println!("  enums:     {}", ctx.enums.len());
    println!("  bitfields: {}", ctx.bitfields.len());
    println!("  compounds: {}", ctx.compounds.len());
    println!("  objects:   {}", ctx.objects.len());

    match ctx.objects.get(&focus) {
        Some(object) => {
            println!("\n{focus} ({} own fields)", object.fields.len());
            println!("  ancestors:   {}", ctx.hierarchy.ancestors(&focus).join(" -> "));
            println!("  descendants: {}", ctx.hierarchy.descendants(&focus).len() - 1);
            for (name, ty) in object.fields.iter() {
                println!("    {name}: {ty}");
            }
        }
        None => println!("\n{focus} is not emitted for this profile"),
    }

    if !ctx.diagnostics.is_empty() {
        println!("\n{} diagnostic(s):", ctx.diagnostics.len());
        for diagnostic in ctx.diagnostics.iter() {
            println!("  {diagnostic}");
        }
    }

    Ok(())
}
