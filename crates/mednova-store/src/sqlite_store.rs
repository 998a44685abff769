//! SQLite-backed patient storage.
//!
//! One file, one `patients` table. Every public operation opens its own
//! connection and drops it before returning, on success and on error alike.

use mednova_core::types::Patient;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    gender TEXT NOT NULL,
    contact_information TEXT NOT NULL,
    blood_group TEXT NOT NULL,
    height INTEGER NOT NULL,
    weight INTEGER NOT NULL
);
";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the engine rejected an insert because the id already exists.
    pub fn is_duplicate(&self) -> bool {
        match self {
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code == rusqlite::ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            }
            _ => false,
        }
    }
}

/// Handle to the patient database file. Holds only the path.
#[derive(Debug, Clone)]
pub struct PatientStore {
    db_path: PathBuf,
}

impl PatientStore {
    /// Point at `db_path` and make sure the table exists.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.into(),
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Create the file and the `patients` table if missing. Idempotent;
    /// existing rows are never touched.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA_SQL)?;
        tracing::debug!(db = %self.db_path.display(), "patients table ready");
        Ok(())
    }

    /// Insert one patient. A duplicate id surfaces the engine's constraint
    /// error unchanged (see [`StoreError::is_duplicate`]).
    pub fn create(&self, patient: Patient) -> Result<Patient, StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO patients
             (id, name, age, gender, contact_information, blood_group, height, weight)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                patient.id,
                patient.name,
                patient.age,
                patient.gender,
                patient.contact_information,
                patient.blood_group,
                patient.height,
                patient.weight,
            ],
        )?;
        tracing::debug!(id = %patient.id, "patient created");
        Ok(patient)
    }

    /// Look up a patient by primary key. `Ok(None)` when no row matches.
    pub fn fetch_by_id(&self, id: &str) -> Result<Option<Patient>, StoreError> {
        let conn = self.connect()?;
        let patient = conn
            .query_row(
                "SELECT id, name, age, gender, contact_information, blood_group, height, weight
                 FROM patients WHERE id = ?1",
                params![id],
                map_patient_row,
            )
            .optional()?;
        tracing::debug!(id, found = patient.is_some(), "patient lookup");
        Ok(patient)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.db_path)?)
    }
}

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        contact_information: row.get(4)?,
        blood_group: row.get(5)?,
        height: row.get(6)?,
        weight: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_store() -> (tempfile::TempDir, PatientStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PatientStore::open(dir.path().join("patient_db.sqlite")).unwrap();
        (dir, store)
    }

    fn john() -> Patient {
        Patient {
            id: "1234".into(),
            name: "John Doe".into(),
            age: 35,
            gender: "Male".into(),
            contact_information: "john.doe@example.com".into(),
            blood_group: "O+".into(),
            height: 175,
            weight: 70,
        }
    }

    #[test]
    fn schema_creation() {
        let (_dir, store) = tmp_store();
        let conn = Connection::open(store.path()).unwrap();
        let cols: Vec<(String, bool)> = conn
            .prepare("SELECT name, \"notnull\" FROM pragma_table_info('patients') ORDER BY cid")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? == 1)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let names: Vec<&str> = cols.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            [
                "id",
                "name",
                "age",
                "gender",
                "contact_information",
                "blood_group",
                "height",
                "weight"
            ]
        );
        // every column except the primary key carries NOT NULL
        assert!(cols[1..].iter().all(|(_, not_null)| *not_null));
    }

    #[test]
    fn patient_round_trip() {
        let (_dir, store) = tmp_store();
        let created = store.create(john()).unwrap();
        assert_eq!(created, john());

        let fetched = store.fetch_by_id("1234").unwrap();
        assert_eq!(fetched, Some(john()));
    }

    #[test]
    fn unknown_id_is_none() {
        let (_dir, store) = tmp_store();
        store.create(john()).unwrap();
        assert_eq!(store.fetch_by_id("9999").unwrap(), None);
        assert_eq!(store.fetch_by_id("").unwrap(), None);
    }

    #[test]
    fn duplicate_id_rejected() {
        let (_dir, store) = tmp_store();
        store.create(john()).unwrap();

        let mut second = john();
        second.name = "Jane Roe".into();
        second.age = 41;
        let err = store.create(second).unwrap_err();
        assert!(err.is_duplicate(), "unexpected error: {err}");

        // first row survives untouched
        assert_eq!(store.fetch_by_id("1234").unwrap(), Some(john()));
        // and the store stays usable after the failed insert
        let mut other = john();
        other.id = "5678".into();
        store.create(other.clone()).unwrap();
        assert_eq!(store.fetch_by_id("5678").unwrap(), Some(other));
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("patient_db.sqlite");

        let store = PatientStore::open(&db).unwrap();
        store.create(john()).unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();

        let reopened = PatientStore::open(&db).unwrap();
        assert_eq!(reopened.fetch_by_id("1234").unwrap(), Some(john()));
    }

    #[test]
    fn open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("a").join("b").join("patients.sqlite");
        let store = PatientStore::open(&db).unwrap();
        assert!(db.exists());
        assert_eq!(store.fetch_by_id("1234").unwrap(), None);
    }

    #[test]
    fn values_stored_as_given() {
        let (_dir, store) = tmp_store();
        let odd = Patient {
            id: "ünïcødé-01".into(),
            name: "田中 太郎".into(),
            age: -3,
            gender: "".into(),
            contact_information: "n/a".into(),
            blood_group: "purple".into(),
            height: 0,
            weight: i64::MAX,
        };
        store.create(odd.clone()).unwrap();
        assert_eq!(store.fetch_by_id("ünïcødé-01").unwrap(), Some(odd));
    }

    #[test]
    fn non_duplicate_error_is_not_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        // skip initialize: the parent directory is never created
        let store = PatientStore {
            db_path: dir.path().join("missing").join("p.sqlite"),
        };
        let err = store.fetch_by_id("1234").unwrap_err();
        assert!(!err.is_duplicate());
    }
}
