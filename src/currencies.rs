use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{Currency, CurrencyPayload};
use crate::utils::{normalize_currency, validate_currency};

/// Cached currency list; same refetch-after-mutation policy as categories.
pub struct CurrencyManager {
    client: ApiClient,
    currencies: Vec<Currency>,
    last_error: Option<String>,
}

impl CurrencyManager {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            currencies: Vec::new(),
            last_error: None,
        }
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn record<T>(&mut self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(e) = &result {
            self.last_error = Some(e.user_message());
        } else {
            self.last_error = None;
        }
        result
    }

    /// Normalizes and checks the form before anything is sent.
    pub fn prepare(form: &CurrencyPayload) -> ApiResult<CurrencyPayload> {
        let payload = normalize_currency(form);
        validate_currency(&payload)?;
        Ok(payload)
    }

    pub async fn load(&mut self) -> ApiResult<()> {
        let result = self.client.get_currencies().await;
        self.currencies = self.record(result)?;
        Ok(())
    }

    pub async fn create(&mut self, form: &CurrencyPayload) -> ApiResult<Currency> {
        let result = match Self::prepare(form) {
            Ok(payload) => self.client.create_currency(&payload).await,
            Err(e) => Err(e),
        };
        let created = self.record(result)?;
        tracing::info!("created currency {} ({})", created.code, created.id);
        self.load().await?;
        Ok(created)
    }

    pub async fn update(&mut self, id: &str, form: &CurrencyPayload) -> ApiResult<Currency> {
        let result = match Self::prepare(form) {
            Ok(payload) => self.client.update_currency(id, &payload).await,
            Err(e) => Err(e),
        };
        let updated = self.record(result)?;
        tracing::info!("updated currency {}", updated.id);
        self.load().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> ApiResult<()> {
        let result = self.client.delete_currency(id).await;
        self.record(result)?;
        tracing::info!("deleted currency {}", id);
        self.load().await
    }
}
