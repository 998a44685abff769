use mednova_core::MednovaPaths;
use mednova_store::PatientStore;

pub fn execute(paths: &MednovaPaths) -> anyhow::Result<()> {
    let already = paths.is_initialized() && paths.db_file.exists();

    paths.ensure_layout()?;
    // Safe to repeat: the table is created only if missing
    PatientStore::open(&paths.db_file)?;

    if already {
        println!("Already initialized at {}", paths.mednova_dir.display());
    } else {
        println!("Initialized {}", paths.db_file.display());
    }
    Ok(())
}

/// Open the patient store of an initialized workspace.
pub fn open_store(paths: &MednovaPaths) -> anyhow::Result<PatientStore> {
    if !paths.is_initialized() {
        anyhow::bail!("No .mednova/ workspace found. Run `mednova init` first.");
    }
    Ok(PatientStore::open(&paths.db_file)?)
}
