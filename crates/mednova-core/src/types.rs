use serde::{Deserialize, Serialize};

/// Patient identifier. Caller supplied, never generated.
pub type PatientId = String;

/// The single stored entity: an eight-field record keyed by `id`.
///
/// Field values are opaque. Nothing here checks age ranges, blood groups or
/// identifier formats; whatever the caller hands in is what gets stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub contact_information: String,
    pub blood_group: String,
    pub height: i64,
    pub weight: i64,
}
