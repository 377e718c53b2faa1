//! Test utilities for service handler testing.
//!
//! Fixtures for the two public collaborators and helpers that mount them on a
//! wiremock server, so handler tests can run a full lookup without network
//! access. [`SpanCapture`] records the spans a lookup opens and the fields
//! recorded on them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::DefaultGuard;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Postal code of Praça da Sé, São Paulo.
pub const SAO_PAULO_CEP: &str = "01001000";

/// Well-formed code that ViaCEP reports as unassigned.
pub const UNKNOWN_CEP: &str = "00000000";

/// City ViaCEP returns for [`SAO_PAULO_CEP`].
pub const SAO_PAULO_CITY: &str = "São Paulo";

/// Access key the weather fixtures expect.
pub const TEST_API_KEY: &str = "test-key";

/// ViaCEP body for a resolved code.
pub fn viacep_found(city: &str) -> Value {
    json!({
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": city,
        "uf": "SP",
        "ibge": "3550308"
    })
}

/// ViaCEP body for an unassigned code.
pub fn viacep_not_found() -> Value {
    json!({ "erro": true })
}

/// WeatherAPI `current.json` body.
pub fn weatherapi_current(city: &str, temp_c: f64) -> Value {
    json!({
        "location": { "name": city, "region": "Sao Paulo", "country": "Brazil" },
        "current": { "temp_c": temp_c, "temp_f": temp_c * 1.8 + 32.0, "is_day": 1 }
    })
}

/// Answer `GET /ws/{cep}/json/` with `body`.
pub async fn mount_viacep(server: &MockServer, cep: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/ws/{}/json/", cep)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer `GET /v1/current.json?q={city}` with the given temperature.
pub async fn mount_weatherapi(server: &MockServer, city: &str, temp_c: f64) {
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", TEST_API_KEY))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(weatherapi_current(city, temp_c)))
        .mount(server)
        .await;
}

/// Answer every weather lookup with `status`.
pub async fn mount_weatherapi_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Fail the test if any request reaches `server`.
pub async fn expect_no_calls(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

// =============================================================================
// Span capture
// =============================================================================

/// A span seen by [`SpanCapture`].
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub fields: HashMap<String, String>,
}

impl CapturedSpan {
    /// Value recorded for `field`, if any. Fields declared `Empty` and never
    /// recorded are absent.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// Layer that keeps every span opened while it is the default subscriber.
#[derive(Debug, Clone, Default)]
pub struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

/// Index of a span's entry in [`SpanCapture`], kept in span extensions.
struct SpanSlot(usize);

struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl SpanCapture {
    /// Install a capturing subscriber on the current thread.
    ///
    /// Spans are captured until the returned guard is dropped. Use it from a
    /// current-thread runtime (`#[tokio::test]`) so handler futures run on the
    /// same thread.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    /// All spans with the given name, in creation order.
    pub fn named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .filter(|span| span.name == name)
            .cloned()
            .collect()
    }

    /// The one span with the given name.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one such span was opened.
    pub fn only(&self, name: &str) -> CapturedSpan {
        let mut spans = self.named(name);
        assert_eq!(spans.len(), 1, "expected exactly one {name:?} span");
        spans.remove(0)
    }
}

impl<S> Layer<S> for SpanCapture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        attrs.record(&mut FieldRecorder(&mut fields));

        let span = ctx.span(id);
        let parent = span
            .as_ref()
            .and_then(|span| span.parent())
            .map(|parent| parent.name());

        let mut spans = self.spans.lock().unwrap();
        spans.push(CapturedSpan {
            name: attrs.metadata().name(),
            parent,
            fields,
        });

        if let Some(span) = span {
            span.extensions_mut().insert(SpanSlot(spans.len() - 1));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let Some(slot) = span.extensions().get::<SpanSlot>().map(|slot| slot.0) else {
            return;
        };

        let mut spans = self.spans.lock().unwrap();
        if let Some(captured) = spans.get_mut(slot) {
            values.record(&mut FieldRecorder(&mut captured.fields));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_codes_are_well_formed() {
        assert!(cepweather_lib::is_valid_cep(SAO_PAULO_CEP));
        assert!(cepweather_lib::is_valid_cep(UNKNOWN_CEP));
    }

    #[test]
    fn test_viacep_fixtures() {
        assert_eq!(viacep_found(SAO_PAULO_CITY)["localidade"], SAO_PAULO_CITY);
        assert_eq!(viacep_not_found()["erro"], true);
    }

    #[test]
    fn test_weatherapi_fixture() {
        let body = weatherapi_current(SAO_PAULO_CITY, 25.0);
        assert_eq!(body["current"]["temp_c"], 25.0);
        assert_eq!(body["location"]["name"], SAO_PAULO_CITY);
    }

    #[test]
    fn test_span_capture_records_fields_and_parent() {
        let (capture, _guard) = SpanCapture::install();

        let outer_span = tracing::info_span!("outer", cep = "01001000");
        let _entered = outer_span.enter();
        let inner_span = tracing::info_span!("inner", temp_c = tracing::field::Empty);
        inner_span.record("temp_c", 25.0);

        let outer = capture.only("outer");
        assert_eq!(outer.field("cep"), Some("01001000"));
        assert_eq!(outer.parent, None);

        let inner = capture.only("inner");
        assert_eq!(inner.parent, Some("outer"));
        assert_eq!(inner.field("temp_c"), Some("25.0"));
    }

    #[test]
    fn test_request_id_format() {
        let id1 = test_request_id();
        let id2 = test_request_id();

        assert!(id1.starts_with("test-"));
        assert_ne!(id1, id2);
    }
}
