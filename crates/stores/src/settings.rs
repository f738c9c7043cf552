use std::sync::Arc;

use tracing::{info, instrument};

use client::api::ChurchApi;
use client::ApiError;
use models::church::{ChurchSettings, ChurchSettingsInput};

use crate::reactive::Reactive;

/// Load/save workflow over the single church-settings record.
pub struct ChurchSettingsStore {
    api: Arc<dyn ChurchApi>,
    pub settings: Reactive<Option<ChurchSettings>>,
    pub loading: Reactive<bool>,
    pub saving: Reactive<bool>,
    pub error: Reactive<Option<String>>,
}

impl ChurchSettingsStore {
    pub fn new(api: Arc<dyn ChurchApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            settings: Reactive::new(None),
            loading: Reactive::new(false),
            saving: Reactive::new(false),
            error: Reactive::new(None),
        })
    }

    fn fail(&self, e: ApiError) -> ApiError {
        self.error.set(Some(e.display_message()));
        e
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ApiError> {
        self.loading.set(true);
        self.error.set(None);
        let out = match self.api.settings().await {
            Ok(settings) => {
                self.settings.set(Some(settings));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        };
        self.loading.set(false);
        out
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn save(&self, input: ChurchSettingsInput) -> Result<ChurchSettings, ApiError> {
        self.error.set(None);
        if let Err(e) = input.validate() {
            return Err(self.fail(ApiError::Other(e.to_string())));
        }
        let id = self
            .settings
            .get()
            .map(|s| s.id)
            .ok_or_else(|| ApiError::Other("Settings not loaded.".into()))
            .map_err(|e| self.fail(e))?;
        self.saving.set(true);
        let result = self.api.save_settings(&id, &input).await;
        self.saving.set(false);
        match result {
            Ok(settings) => {
                info!("church settings saved");
                self.settings.set(Some(settings.clone()));
                Ok(settings)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}
