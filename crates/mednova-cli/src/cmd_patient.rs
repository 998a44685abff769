use clap::Subcommand;
use mednova_core::{MednovaPaths, Patient};
use mednova_store::PatientStore;

use crate::cmd_init::open_store;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum PatientCmd {
    /// Insert a patient record (fails if the ID already exists)
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        age: i64,
        #[arg(long)]
        gender: String,
        /// Contact information (email, phone, ...)
        #[arg(long)]
        contact: String,
        #[arg(long)]
        blood_group: String,
        #[arg(long, allow_negative_numbers = true)]
        height: i64,
        #[arg(long, allow_negative_numbers = true)]
        weight: i64,
    },
    /// Show a patient record by ID
    Show {
        /// Patient ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

// ── Dispatch ──

pub fn run(cmd: PatientCmd, paths: &MednovaPaths) -> anyhow::Result<()> {
    match cmd {
        PatientCmd::Create {
            id,
            name,
            age,
            gender,
            contact,
            blood_group,
            height,
            weight,
        } => {
            let store = open_store(paths)?;
            let patient = create(
                &store,
                Patient {
                    id,
                    name,
                    age,
                    gender,
                    contact_information: contact,
                    blood_group,
                    height,
                    weight,
                },
            )?;
            println!("Created patient {}", patient.id);
            Ok(())
        }
        PatientCmd::Show { id, json } => {
            let store = open_store(paths)?;
            match store.fetch_by_id(&id)? {
                Some(p) if json => println!("{}", serde_json::to_string_pretty(&p)?),
                Some(p) => print!("{}", render(&p)),
                None => println!("Patient not found"),
            }
            Ok(())
        }
    }
}

// ── Command Implementations ──

/// Insert `patient`; a duplicate ID keeps the engine error as the source.
pub fn create(store: &PatientStore, patient: Patient) -> anyhow::Result<Patient> {
    let id = patient.id.clone();
    store.create(patient).map_err(|e| {
        if e.is_duplicate() {
            anyhow::Error::new(e).context(format!("patient {id} already exists"))
        } else {
            e.into()
        }
    })
}

fn render(p: &Patient) -> String {
    format!(
        "ID:          {}\n\
         Name:        {}\n\
         Age:         {}\n\
         Gender:      {}\n\
         Contact:     {}\n\
         Blood Group: {}\n\
         Height:      {}\n\
         Weight:      {}\n",
        p.id, p.name, p.age, p.gender, p.contact_information, p.blood_group, p.height, p.weight
    )
}
