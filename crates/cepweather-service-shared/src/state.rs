//! Application state for HTTP services.
//!
//! Each service builds its outbound clients once at startup, wraps them in a
//! context type implementing [`ServiceContext`], and shares it with every
//! handler through [`AppState`].

use std::ops::Deref;
use std::sync::Arc;

/// A named downstream dependency, reported by the readiness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub name: &'static str,
    pub url: String,
}

impl Upstream {
    pub fn new(name: &'static str, url: impl Into<String>) -> Self {
        Self {
            name,
            url: url.into(),
        }
    }
}

/// Per-service context held in [`AppState`].
pub trait ServiceContext: Send + Sync + 'static {
    /// Short service name used in logs, metrics and health responses.
    fn service_name(&self) -> &'static str;

    /// Downstream dependencies this service calls.
    fn upstreams(&self) -> Vec<Upstream>;
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use cepweather_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState<WeatherContext>>) {
///     let city = state.location.resolve_city(&cep).await?;
/// }
///
/// let app = Router::new()
///     .route("/weather", post(handler))
///     .with_state(AppState::new(context));
/// ```
pub struct AppState<C> {
    inner: Arc<C>,
}

impl<C> AppState<C> {
    pub fn new(context: C) -> Self {
        Self {
            inner: Arc::new(context),
        }
    }

    /// Access the service context.
    pub fn context(&self) -> &C {
        &self.inner
    }
}

// Manual impl: `derive(Clone)` would require `C: Clone`.
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Deref for AppState<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: ServiceContext> std::fmt::Debug for AppState<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.inner.service_name())
            .field("upstreams", &self.inner.upstreams().len())
            .finish()
    }
}
