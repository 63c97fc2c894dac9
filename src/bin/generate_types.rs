//! Export the host-facing contract: TypeScript bindings and a JSON Schema.
//!
//! Usage: `generate_types [OUT_DIR]` (default: `bindings/`)

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use ts_rs::TS;

use nextstep::status::{
    ActionResult, ActionStatus, CodeModifiedTime, MachineStatus, ProjectActionStatus,
    ProjectStatus, WholeStatus,
};
use nextstep::steps::{ResolvedCommand, ResolvedFollowUp, ResolvedStep};

fn write_binding<T: TS + 'static>(out_dir: &Path) -> Result<()> {
    let name = T::name();
    let ts = T::export_to_string().with_context(|| format!("Failed to export {}", name))?;
    let path = out_dir.join(format!("{}.ts", name));
    fs::write(&path, ts).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bindings"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    println!("Writing TypeScript bindings:");
    write_binding::<WholeStatus>(&out_dir)?;
    write_binding::<MachineStatus>(&out_dir)?;
    write_binding::<ProjectStatus>(&out_dir)?;
    write_binding::<CodeModifiedTime>(&out_dir)?;
    write_binding::<ProjectActionStatus>(&out_dir)?;
    write_binding::<ActionStatus>(&out_dir)?;
    write_binding::<ActionResult>(&out_dir)?;
    write_binding::<ResolvedStep>(&out_dir)?;
    write_binding::<ResolvedCommand>(&out_dir)?;
    write_binding::<ResolvedFollowUp>(&out_dir)?;

    let schema = schemars::schema_for!(WholeStatus);
    let schema_path = out_dir.join("status.schema.json");
    let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;
    fs::write(&schema_path, json)
        .with_context(|| format!("Failed to write {}", schema_path.display()))?;
    println!("Writing JSON Schema:\n  {}", schema_path.display());

    Ok(())
}
