use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::classifier::{ClassifierError, DiseaseClassifier, ImageDecodeError, ImageUpload};
use super::diagnosis::{diagnose, Diagnosis};

/// Photo submitted for diagnosis. Location and symptoms are logged context only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDoctorRequest {
    pub image: String,
    #[serde(default, alias = "cropName")]
    pub crop_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CropDoctorError {
    #[error(transparent)]
    InvalidImage(#[from] ImageDecodeError),
    #[error("image analysis failed: {0}")]
    Classifier(#[from] ClassifierError),
}

pub struct CropDoctorService {
    classifier: Arc<dyn DiseaseClassifier>,
}

impl CropDoctorService {
    pub fn new(classifier: Arc<dyn DiseaseClassifier>) -> Self {
        Self { classifier }
    }

    pub async fn examine(&self, request: CropDoctorRequest) -> Result<Diagnosis, CropDoctorError> {
        let image = ImageUpload::from_base64(&request.image)?;
        self.examine_upload(
            &image,
            request.crop_name.as_deref(),
            request.location.as_deref(),
        )
        .await
    }

    /// Diagnose an already decoded image, e.g. one read from disk.
    pub async fn examine_upload(
        &self,
        image: &ImageUpload,
        crop_name: Option<&str>,
        location: Option<&str>,
    ) -> Result<Diagnosis, CropDoctorError> {
        if image.bytes.is_empty() {
            return Err(ImageDecodeError::Empty.into());
        }

        let prediction = match self.classifier.classify(image).await {
            Ok(prediction) => prediction,
            Err(error) => {
                warn!(classifier = self.classifier.name(), %error, "image classification failed");
                return Err(error.into());
            }
        };

        let diagnosis = diagnose(&prediction, crop_name);
        info!(
            label = %prediction.label,
            confidence = diagnosis.confidence,
            location = location.unwrap_or("unspecified"),
            "crop diagnosis produced"
        );

        Ok(diagnosis)
    }
}
