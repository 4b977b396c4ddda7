//! Photo-based crop health check backed by a hosted plant-disease classifier.
//!
//! The classifier is a black box returning a label and confidence; everything farmers see
//! (severity, treatments, remedies) comes from [`diagnose`] and the static treatment tables.

mod classifier;
mod diagnosis;
mod router;
mod service;
mod treatments;

pub use classifier::{
    ClassifierError, DiseaseClassifier, ImageDecodeError, ImageUpload, SpaceClassifier,
};
pub use diagnosis::{
    diagnose, parse_prediction, Diagnosis, Finding, HealthStatus, Prediction, Severity, Urgency,
};
pub use router::crop_doctor_router;
pub use service::{CropDoctorError, CropDoctorRequest, CropDoctorService};
pub use treatments::{disease_treatment, pest_treatment, Treatment};
