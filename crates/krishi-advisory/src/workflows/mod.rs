pub mod advisory;
pub mod crop_doctor;
pub mod knowledge;
