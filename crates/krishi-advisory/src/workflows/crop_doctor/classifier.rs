use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use regex::Regex;
use reqwest::{multipart, Client, StatusCode};

use super::diagnosis::{parse_prediction, Prediction};
use crate::config::CropDoctorConfig;

const PREDICT_PATH: &str = "/api/predict";
const UPLOAD_FIELD: &str = "data";
const CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(30);

/// Decoded photo ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime: mime::Mime,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageDecodeError {
    #[error("image is empty")]
    Empty,
    #[error("image is not valid base64: {0}")]
    InvalidBase64(String),
}

fn data_url_prefix() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^data:(image/[\w.+-]+);base64,").ok())
        .as_ref()
}

impl ImageUpload {
    /// Decode base64 image data, accepting an optional `data:image/...;base64,` prefix.
    /// Without a prefix the image is assumed to be JPEG.
    pub fn from_base64(encoded: &str) -> Result<Self, ImageDecodeError> {
        let trimmed = encoded.trim();
        let (mime, payload) = match data_url_prefix().and_then(|re| re.captures(trimmed)) {
            Some(captures) => {
                let declared = captures
                    .get(1)
                    .and_then(|m| m.as_str().parse::<mime::Mime>().ok())
                    .unwrap_or(mime::IMAGE_JPEG);
                let start = captures.get(0).map(|m| m.end()).unwrap_or(0);
                (declared, &trimmed[start..])
            }
            None => (mime::IMAGE_JPEG, trimmed),
        };

        if payload.is_empty() {
            return Err(ImageDecodeError::Empty);
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ImageDecodeError::InvalidBase64(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageDecodeError::Empty);
        }

        Ok(Self { bytes, mime })
    }

    fn file_name(&self) -> String {
        format!("crop_image.{}", self.mime.subtype().as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unexpected classifier response: {0}")]
    UnexpectedResponse(String),
}

/// Plant disease image classifier.
#[async_trait]
pub trait DiseaseClassifier: Send + Sync {
    async fn classify(&self, image: &ImageUpload) -> Result<Prediction, ClassifierError>;

    fn name(&self) -> &'static str;
}

/// Hosted inference space accepting a multipart upload on `/api/predict`.
#[derive(Debug, Clone)]
pub struct SpaceClassifier {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl SpaceClassifier {
    pub fn from_config(config: &CropDoctorConfig) -> Result<Self, ClassifierError> {
        let http = Client::builder()
            .timeout(CLASSIFIER_TIMEOUT)
            .user_agent(concat!("krishi-advisory/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.endpoint, PREDICT_PATH)
    }
}

#[async_trait]
impl DiseaseClassifier for SpaceClassifier {
    async fn classify(&self, image: &ImageUpload) -> Result<Prediction, ClassifierError> {
        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name())
            .mime_str(image.mime.as_ref())
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let mut request = self.http.post(self.predict_url()).multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await.map_err(map_reqwest_error)?;
        match res.status() {
            s if s.is_success() => {
                let payload = res
                    .json::<serde_json::Value>()
                    .await
                    .map_err(|e| ClassifierError::UnexpectedResponse(e.to_string()))?;
                parse_prediction(payload).ok_or_else(|| {
                    ClassifierError::UnexpectedResponse("no prediction in payload".to_string())
                })
            }
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                Err(ClassifierError::Timeout)
            }
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(ClassifierError::Http { status, body })
            }
        }
    }

    fn name(&self) -> &'static str {
        "space"
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClassifierError {
    if e.is_timeout() {
        ClassifierError::Timeout
    } else {
        ClassifierError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_data_url_prefix_and_keeps_declared_type() {
        let upload = ImageUpload::from_base64("data:image/png;base64,aGVsbG8=").expect("decode");
        assert_eq!(upload.bytes, b"hello");
        assert_eq!(upload.mime, mime::IMAGE_PNG);
        assert_eq!(upload.file_name(), "crop_image.png");
    }

    #[test]
    fn bare_payload_defaults_to_jpeg() {
        let upload = ImageUpload::from_base64("  aGVsbG8=\n").expect("decode");
        assert_eq!(upload.mime, mime::IMAGE_JPEG);
        assert_eq!(upload.file_name(), "crop_image.jpeg");
    }

    #[test]
    fn rejects_empty_and_garbage_input() {
        assert_eq!(ImageUpload::from_base64(""), Err(ImageDecodeError::Empty));
        assert_eq!(
            ImageUpload::from_base64("data:image/jpeg;base64,"),
            Err(ImageDecodeError::Empty)
        );
        assert!(matches!(
            ImageUpload::from_base64("not base64 at all!"),
            Err(ImageDecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn predict_url_ignores_trailing_slash() {
        let classifier = SpaceClassifier::from_config(&CropDoctorConfig {
            endpoint: "https://plants.example.test/".to_string(),
            token: None,
        })
        .expect("client builds");
        assert_eq!(
            classifier.predict_url(),
            "https://plants.example.test/api/predict"
        );
    }
}
