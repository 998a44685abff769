use mednova_core::types::Patient;
use serde::{Deserialize, Serialize};

/// Request body for `models/*:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub text: String,
}

/// Render every patient field as `<Label>: <value>` lines, in fixed order,
/// under a `Patient Data:` heading. No trailing newline.
pub fn patient_summary(patient: &Patient) -> String {
    format!(
        "Patient Data:\n\
         ID: {}\n\
         Name: {}\n\
         Age: {}\n\
         Gender: {}\n\
         Contact: {}\n\
         Blood Group: {}\n\
         Height: {}\n\
         Weight: {}",
        patient.id,
        patient.name,
        patient.age,
        patient.gender,
        patient.contact_information,
        patient.blood_group,
        patient.height,
        patient.weight,
    )
}

/// A single user-role message carrying the patient summary.
pub fn build_request(patient: &Patient) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: patient_summary(patient),
            }],
        }],
    }
}
