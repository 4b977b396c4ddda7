use krishi_advisory::error::AppError;
use krishi_advisory::workflows::advisory::{
    FeedbackRecord, FeedbackRepository, KnowledgeRecord, KnowledgeRepository, RepositoryError,
    SoilSampleRecord,
};
use krishi_advisory::workflows::knowledge::{normalize_key, KnowledgeImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

/// Verified practices shipped with the service so a fresh instance can answer requests.
const SEED_PRACTICES_CSV: &str = "\
district,crop,practice,benefit,season,source,submitted_by,verified
Barabanki,Wheat,Apply well-rotted gobar khad two weeks before sowing,Improves soil structure and moisture retention,Rabi,Village elders,,true
Barabanki,Wheat,Soak seed overnight in diluted cow urine (beej upchar),Better germination and fewer seed-borne diseases,Rabi,KVK Barabanki,,true
Barabanki,Wheat,Spray neem leaf extract when aphids appear,Keeps aphids below damaging levels,Rabi,,Ram Kishore,true
Varanasi,Paddy,Grow dhaincha and plough it in before puddling,Adds nitrogen and organic matter,Kharif,KVK Varanasi,,true
Varanasi,Paddy,Keep 5 cm standing water after transplanting,Suppresses weeds,Kharif,,,true
Nashik,Onion,Mulch beds with sugarcane trash,Conserves soil moisture,Rabi,,,true
";

const SEED_SOIL_CSV: &str = "\
district,crop,nitrogen,phosphorus,potassium,ph,organic_carbon,sampled_at
Barabanki,Wheat,24,11,135,5.8,0.38,2025-10-12
Barabanki,Wheat,31,16,170,6.4,0.52,2023-10-02
Varanasi,Paddy,34,12,160,8.4,0.45,2025-06-01
";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

fn same_key(left: &str, right: &str) -> bool {
    normalize_key(left) == normalize_key(right)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryKnowledgeStore {
    records: Arc<Mutex<Vec<KnowledgeRecord>>>,
    samples: Arc<Mutex<Vec<SoilSampleRecord>>>,
}

impl InMemoryKnowledgeStore {
    pub(crate) fn new(records: Vec<KnowledgeRecord>, samples: Vec<SoilSampleRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            samples: Arc::new(Mutex::new(samples)),
        }
    }

    /// Store backed by the given CSV files, falling back to the bundled seed data for any file
    /// not supplied.
    pub(crate) fn load(
        practices_csv: Option<&Path>,
        soil_csv: Option<&Path>,
    ) -> Result<Self, AppError> {
        let records = match practices_csv {
            Some(path) => KnowledgeImporter::practices_from_path(path)?,
            None => KnowledgeImporter::practices_from_reader(Cursor::new(SEED_PRACTICES_CSV))?,
        };
        let samples = match soil_csv {
            Some(path) => KnowledgeImporter::soil_from_path(path)?,
            None => KnowledgeImporter::soil_from_reader(Cursor::new(SEED_SOIL_CSV))?,
        };
        Ok(Self::new(records, samples))
    }

    pub(crate) fn practice_count(&self) -> usize {
        lock(&self.records).map(|guard| guard.len()).unwrap_or(0)
    }

    pub(crate) fn sample_count(&self) -> usize {
        lock(&self.samples).map(|guard| guard.len()).unwrap_or(0)
    }
}

impl KnowledgeRepository for InMemoryKnowledgeStore {
    fn verified_practices(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Vec<KnowledgeRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .iter()
            .filter(|record| {
                record.verified && same_key(&record.district, district) && same_key(&record.crop, crop)
            })
            .cloned()
            .collect())
    }

    fn latest_soil_sample(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Option<SoilSampleRecord>, RepositoryError> {
        let guard = lock(&self.samples)?;
        Ok(guard
            .iter()
            .filter(|sample| same_key(&sample.district, district) && same_key(&sample.crop, crop))
            .max_by_key(|sample| sample.sampled_at)
            .cloned())
    }

    fn submit_practice(&self, record: KnowledgeRecord) -> Result<KnowledgeRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFeedbackStore {
    records: Arc<Mutex<Vec<FeedbackRecord>>>,
}

impl FeedbackRepository for InMemoryFeedbackStore {
    fn record(&self, feedback: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        lock(&self.records)?.push(feedback.clone());
        Ok(feedback)
    }

    fn for_advisory(&self, advisory_id: &str) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .iter()
            .filter(|record| record.advisory_id == advisory_id)
            .cloned()
            .collect())
    }
}
