use std::sync::Arc;

use async_trait::async_trait;

use common::Health;
use models::church::{ChurchSettings, ChurchSettingsInput};

use crate::error::ApiError;
use crate::records::RecordService;

/// Church settings plus the system-status probe the setup wizard reads.
#[async_trait]
pub trait ChurchApi: Send + Sync {
    async fn settings(&self) -> Result<ChurchSettings, ApiError>;
    async fn save_settings(&self, id: &str, input: &ChurchSettingsInput) -> Result<ChurchSettings, ApiError>;
    async fn system_status(&self) -> Result<Health, ApiError>;
}

pub struct HttpChurchApi {
    records: Arc<RecordService>,
}

impl HttpChurchApi {
    pub fn new(records: Arc<RecordService>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ChurchApi for HttpChurchApi {
    async fn settings(&self) -> Result<ChurchSettings, ApiError> {
        self.records.get_json("/api/worship/settings").await
    }

    async fn save_settings(&self, id: &str, input: &ChurchSettingsInput) -> Result<ChurchSettings, ApiError> {
        self.records.update("churches", id, input).await
    }

    async fn system_status(&self) -> Result<Health, ApiError> {
        self.records.get_json("/api/health").await
    }
}

/// In-memory mock for tests.
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    pub fn sample_settings() -> ChurchSettings {
        ChurchSettings {
            id: "church1".into(),
            name: "Grace Fellowship".into(),
            timezone: "UTC".into(),
            service_day: 0,
            default_service_time: Some("10:00".into()),
        }
    }

    pub struct MockChurchApi {
        pub settings: Mutex<ChurchSettings>,
        pub health: Mutex<Health>,
        pub fail: Mutex<Option<ApiError>>,
    }

    impl Default for MockChurchApi {
        fn default() -> Self {
            Self {
                settings: Mutex::new(sample_settings()),
                health: Mutex::new(Health { status: "ok".into(), provisioned: true }),
                fail: Mutex::new(None),
            }
        }
    }

    impl MockChurchApi {
        pub fn fail_with(&self, err: ApiError) {
            *self.fail.lock().unwrap() = Some(err);
        }

        fn check(&self) -> Result<(), ApiError> {
            match &*self.fail.lock().unwrap() {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ChurchApi for MockChurchApi {
        async fn settings(&self) -> Result<ChurchSettings, ApiError> {
            self.check()?;
            Ok(self.settings.lock().unwrap().clone())
        }

        async fn save_settings(&self, _id: &str, input: &ChurchSettingsInput) -> Result<ChurchSettings, ApiError> {
            self.check()?;
            let mut settings = self.settings.lock().unwrap();
            settings.name = input.name.clone();
            settings.timezone = input.timezone.clone();
            settings.service_day = input.service_day;
            settings.default_service_time = input.default_service_time.clone();
            Ok(settings.clone())
        }

        async fn system_status(&self) -> Result<Health, ApiError> {
            self.check()?;
            Ok(self.health.lock().unwrap().clone())
        }
    }
}
