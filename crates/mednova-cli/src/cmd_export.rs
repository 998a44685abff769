use std::path::{Path, PathBuf};

use mednova_core::{MednovaPaths, Patient, Settings};
use mednova_export::{ExportConfig, ReportExporter};

use crate::cmd_init::open_store;

pub const DEMO_PATIENT_ID: &str = "1234";

/// `patient_<id>_gemini.json`
pub fn default_output_path(id: &str) -> PathBuf {
    PathBuf::from(format!("patient_{id}_gemini.json"))
}

/// `mednova export <id>`
pub fn execute(
    paths: &MednovaPaths,
    settings: &Settings,
    id: &str,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let store = open_store(paths)?;
    let Some(patient) = store.fetch_by_id(id)? else {
        println!("Patient not found");
        return Ok(());
    };

    let output = match output {
        Some(p) => paths.resolve(p),
        None => paths.resolve(&default_output_path(id)),
    };
    let config = ExportConfig::from_settings(settings)?;
    let response = run_export(config, &patient, &output)?;

    println!("Gemini API response saved: {}", output.display());
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// `mednova demo`: optionally seed patient 1234, then export it.
pub fn demo(paths: &MednovaPaths, settings: &Settings, seed: bool) -> anyhow::Result<()> {
    if seed {
        seed_demo_patient(paths)?;
    }
    execute(paths, settings, DEMO_PATIENT_ID, None)
}

fn demo_patient() -> Patient {
    Patient {
        id: DEMO_PATIENT_ID.to_string(),
        name: "John Doe".to_string(),
        age: 35,
        gender: "Male".to_string(),
        contact_information: "john.doe@example.com".to_string(),
        blood_group: "O+".to_string(),
        height: 175,
        weight: 70,
    }
}

/// Insert the sample patient unless a row with its ID already exists.
fn seed_demo_patient(paths: &MednovaPaths) -> anyhow::Result<bool> {
    let store = open_store(paths)?;
    if store.fetch_by_id(DEMO_PATIENT_ID)?.is_some() {
        return Ok(false);
    }
    store.create(demo_patient())?;
    println!("Seeded patient {DEMO_PATIENT_ID}");
    Ok(true)
}

/// Drive the single export request on a current-thread runtime.
fn run_export(
    config: ExportConfig,
    patient: &Patient,
    output: &Path,
) -> anyhow::Result<serde_json::Value> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let exporter = ReportExporter::new(config);
    Ok(rt.block_on(exporter.export(patient, output))?)
}
