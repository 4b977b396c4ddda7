use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFeedbackStore, InMemoryKnowledgeStore};
use crate::routes::build_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use krishi_advisory::config::{AiServiceConfig, AppConfig, CropDoctorConfig};
use krishi_advisory::error::AppError;
use krishi_advisory::telemetry;
use krishi_advisory::workflows::advisory::{
    AdvisoryRuleEngine, AdvisoryService, AiFallbackAdapter, RemoteAdvisoryModel,
};
use krishi_advisory::workflows::crop_doctor::{CropDoctorService, SpaceClassifier};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let knowledge = Arc::new(InMemoryKnowledgeStore::load(
        args.practices_csv.as_deref(),
        args.soil_csv.as_deref(),
    )?);
    info!(
        practices = knowledge.practice_count(),
        soil_samples = knowledge.sample_count(),
        "knowledge store loaded"
    );

    let engine = Arc::new(AdvisoryRuleEngine::default());
    let mut advisory_service = AdvisoryService::new(
        knowledge,
        Arc::new(InMemoryFeedbackStore::default()),
        engine.clone(),
    );
    if let Some(adapter) = remote_adapter(&config.ai, engine) {
        advisory_service = advisory_service.with_ai(adapter);
    }

    let app = build_router(
        Arc::new(advisory_service),
        crop_doctor_service(&config.crop_doctor),
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "krishi advisory service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Remote AI adapter when credentials are configured; the service runs rule-only otherwise.
pub(crate) fn remote_adapter(
    config: &AiServiceConfig,
    engine: Arc<AdvisoryRuleEngine>,
) -> Option<AiFallbackAdapter> {
    if !config.is_configured() {
        info!("AI advisory service not configured, using rule engine only");
        return None;
    }

    match RemoteAdvisoryModel::from_config(config) {
        Ok(model) => Some(AiFallbackAdapter::new(Arc::new(model), engine)),
        Err(error) => {
            warn!(%error, "AI advisory client unavailable, using rule engine only");
            None
        }
    }
}

pub(crate) fn crop_doctor_service(config: &CropDoctorConfig) -> Option<Arc<CropDoctorService>> {
    match SpaceClassifier::from_config(config) {
        Ok(classifier) => {
            info!(endpoint = %config.endpoint, "crop doctor enabled");
            Some(Arc::new(CropDoctorService::new(Arc::new(classifier))))
        }
        Err(error) => {
            warn!(%error, "crop doctor disabled");
            None
        }
    }
}
