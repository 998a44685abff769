use std::path::{Path, PathBuf};

/// All well-known paths under `.mednova/`.
#[derive(Debug, Clone)]
pub struct MednovaPaths {
    pub root: PathBuf,
    pub mednova_dir: PathBuf,
    pub db_file: PathBuf,
    pub config_json: PathBuf,
}

impl MednovaPaths {
    /// Derive all paths from a workspace root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mednova_dir = root.join(".mednova");
        Self {
            db_file: mednova_dir.join("patient_db.sqlite"),
            config_json: mednova_dir.join("config.json"),
            mednova_dir,
            root,
        }
    }

    /// Create the `.mednova/` directory. Idempotent.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.mednova_dir)
    }

    /// Check whether `.mednova/` exists.
    pub fn is_initialized(&self) -> bool {
        self.mednova_dir.is_dir()
    }

    /// Resolve a path given on the command line against the workspace root.
    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}
