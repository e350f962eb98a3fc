use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::WeatherError,
    model::{CreateWeatherRequest, WeatherRecord},
    provider::WeatherProvider,
    store::RecordStore,
};

/// Validates requests, queries the provider and records results.
///
/// Cheap to clone; clones share the same provider and store.
#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn RecordStore>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self { provider, store }
    }

    /// Look up current conditions for `request.location` and store them
    /// together with the request under a fresh identifier.
    ///
    /// Makes exactly one provider call. Nothing is stored unless it
    /// succeeds.
    pub async fn create_record(&self, request: CreateWeatherRequest) -> Result<String, WeatherError> {
        if request.date.is_empty() || request.location.is_empty() {
            return Err(WeatherError::InvalidInput(
                "Date and location are required.".to_string(),
            ));
        }

        let reply = self
            .provider
            .current_conditions(&request.location)
            .await
            .map_err(|err| {
                let cause = format!("{err:#}");
                tracing::error!(location = %request.location, %cause, "weather provider unreachable");
                WeatherError::ProviderUnreachable(cause)
            })?;

        if let Some(message) = reply.rejection() {
            tracing::warn!(location = %request.location, status = %reply.status, %message, "weather provider rejected query");
            return Err(WeatherError::ProviderRejected(message));
        }

        let id = Uuid::new_v4().to_string();
        let record = WeatherRecord {
            id: id.clone(),
            date: request.date,
            location: request.location,
            notes: request.notes,
            weather: reply.current_conditions(),
        };

        self.store.write(id.clone(), record);
        tracing::info!(%id, "weather record created");

        Ok(id)
    }

    pub fn get_record(&self, id: &str) -> Result<WeatherRecord, WeatherError> {
        self.store.read(id).ok_or_else(|| {
            tracing::debug!(%id, "weather record not found");
            WeatherError::NotFound { id: id.to_string() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{provider::ProviderReply, store::InMemoryStore};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use serde_json::{Value, json};
    use std::collections::HashSet;

    #[derive(Debug)]
    enum Canned {
        Reply(ProviderReply),
        Transport(&'static str),
    }

    /// Provider double that answers every query the same way and records queries.
    #[derive(Debug)]
    struct StubProvider {
        canned: Canned,
        queries: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn replying(body: Value) -> Arc<Self> {
            Self::with(Canned::Reply(ProviderReply::ok(body)))
        }

        fn with(canned: Canned) -> Arc<Self> {
            Arc::new(Self { canned, queries: Mutex::new(Vec::new()) })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current_conditions(&self, query: &str) -> anyhow::Result<ProviderReply> {
            self.queries.lock().push(query.to_string());
            match &self.canned {
                Canned::Reply(reply) => Ok(reply.clone()),
                Canned::Transport(msg) => Err(anyhow!(*msg)),
            }
        }
    }

    /// Store double that counts writes.
    #[derive(Debug, Default)]
    struct CountingStore {
        inner: InMemoryStore,
        writes: Mutex<usize>,
    }

    impl RecordStore for CountingStore {
        fn write(&self, id: String, record: WeatherRecord) {
            *self.writes.lock() += 1;
            self.inner.write(id, record);
        }

        fn read(&self, id: &str) -> Option<WeatherRecord> {
            self.inner.read(id)
        }
    }

    fn service(provider: Arc<StubProvider>) -> (WeatherService, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        (WeatherService::new(provider, store.clone()), store)
    }

    #[tokio::test]
    async fn create_then_get_returns_stored_record() {
        let provider = StubProvider::replying(json!({ "current": { "temperature": 20 } }));
        let (svc, _) = service(provider.clone());

        let id = svc
            .create_record(CreateWeatherRequest::new("2024-01-01", "Paris").with_notes("trip"))
            .await
            .unwrap();

        let record = svc.get_record(&id).unwrap();
        assert_eq!(
            record,
            WeatherRecord {
                id: id.clone(),
                date: "2024-01-01".into(),
                location: "Paris".into(),
                notes: "trip".into(),
                weather: json!({ "temperature": 20 }),
            }
        );
        assert_eq!(provider.queries(), vec!["Paris".to_string()]);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn notes_default_to_empty() {
        let (svc, _) = service(StubProvider::replying(json!({ "current": {} })));

        let id = svc
            .create_record(CreateWeatherRequest::new("tomorrow", "Lima"))
            .await
            .unwrap();

        assert_eq!(svc.get_record(&id).unwrap().notes, "");
    }

    #[tokio::test]
    async fn empty_date_or_location_is_invalid_input() {
        let provider = StubProvider::replying(json!({ "current": {} }));
        let (svc, store) = service(provider.clone());

        for (date, location) in [("", "Paris"), ("2024-01-01", ""), ("", "")] {
            let err = svc
                .create_record(CreateWeatherRequest::new(date, location))
                .await
                .unwrap_err();
            assert_eq!(err, WeatherError::InvalidInput("Date and location are required.".into()));
        }

        assert!(provider.queries().is_empty());
        assert_eq!(*store.writes.lock(), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_unreachable_and_writes_nothing() {
        let (svc, store) = service(StubProvider::with(Canned::Transport("connection refused")));

        let err = svc
            .create_record(CreateWeatherRequest::new("2024-01-01", "Paris"))
            .await
            .unwrap_err();

        assert_eq!(err, WeatherError::ProviderUnreachable("connection refused".into()));
        assert_eq!(*store.writes.lock(), 0);
    }

    #[tokio::test]
    async fn error_payload_is_rejected_and_writes_nothing() {
        let provider = StubProvider::replying(json!({
            "success": false,
            "error": { "code": 615, "info": "Your API request failed." }
        }));
        let (svc, store) = service(provider);

        let err = svc
            .create_record(CreateWeatherRequest::new("2024-01-01", "Atlantis"))
            .await
            .unwrap_err();

        assert_eq!(err, WeatherError::ProviderRejected("Your API request failed.".into()));
        assert_eq!(*store.writes.lock(), 0);
    }

    #[tokio::test]
    async fn non_success_status_is_rejected_with_fallback() {
        let reply = ProviderReply::new(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
        let (svc, store) = service(StubProvider::with(Canned::Reply(reply)));

        let err = svc
            .create_record(CreateWeatherRequest::new("2024-01-01", "Paris"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WeatherError::ProviderRejected(crate::provider::REJECTION_FALLBACK.into())
        );
        assert_eq!(*store.writes.lock(), 0);
    }

    #[tokio::test]
    async fn missing_current_is_stored_as_empty_object() {
        let (svc, _) = service(StubProvider::replying(json!({ "request": {} })));

        let id = svc
            .create_record(CreateWeatherRequest::new("2024-01-01", "Paris"))
            .await
            .unwrap();

        assert_eq!(svc.get_record(&id).unwrap().weather, json!({}));
    }

    #[tokio::test]
    async fn identifiers_are_unique() {
        let (svc, store) = service(StubProvider::replying(json!({ "current": {} })));

        let mut ids = HashSet::new();
        for _ in 0..50 {
            let id = svc
                .create_record(CreateWeatherRequest::new("2024-01-01", "Paris"))
                .await
                .unwrap();
            assert!(ids.insert(id));
        }
        assert_eq!(*store.writes.lock(), 50);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let provider = StubProvider::replying(json!({}));
        let svc = WeatherService::new(provider, Arc::new(InMemoryStore::new()));

        let err = svc.get_record("never-created").unwrap_err();
        assert_eq!(err, WeatherError::NotFound { id: "never-created".into() });
    }
}
