use crate::config::Config;
use crate::form::{FormController, Status};
use crate::html_view::{render_page, FIELD_PREFIX};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Form, Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Page state guarded by a single lock.
pub struct Page {
    pub controller: FormController,
    /// Task running the current prediction, kept so it can be aborted.
    inflight: Option<JoinHandle<()>>,
    /// Task re-fetching metadata after a failed load.
    loading: Option<JoinHandle<()>>,
}

/// Shared application state injected into handlers.
pub struct AppState {
    /// The page behind `/`. Never locked across a backend call.
    pub page: Mutex<Page>,
    /// Backend host shown in the header and footer.
    pub backend_host: String,
}

impl AppState {
    pub fn new(controller: FormController, config: &Config) -> Arc<Self> {
        Arc::new(Self {
            page: Mutex::new(Page {
                controller,
                inflight: None,
                loading: None,
            }),
            backend_host: config.backend_host(),
        })
    }

    /// Waits for the background metadata and prediction tasks, if any, to finish.
    pub async fn settle(&self) {
        let handles = {
            let mut page = self.page.lock().await;
            [page.loading.take(), page.inflight.take()]
        };
        for handle in handles.into_iter().flatten() {
            // An aborted task reports a JoinError; its state change was already applied.
            let _ = handle.await;
        }
    }
}

/// Fetches metadata and initializes the form.
pub async fn load_metadata(state: Arc<AppState>) {
    state.page.lock().await.controller.begin_load();
    fetch_metadata(state).await;
}

/// Completes a load already started with `begin_load`.
async fn fetch_metadata(state: Arc<AppState>) {
    let client = state.page.lock().await.controller.client().clone();

    let outcome = client.get_meta().await;

    state.page.lock().await.controller.finish_load(outcome);
}

/// Builds the router serving the evaluator page.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(post_form))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "course-load-evaluator",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /
///
/// Renders the page for the current state. When the metadata load failed, the
/// failure is rendered and a new fetch starts, so the next visit sees its outcome.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut page = state.page.lock().await;
    let html = render_page(&page.controller, &state.backend_host);
    if page.controller.needs_reload() {
        tracing::info!("Metadata unavailable, fetching again");
        page.controller.begin_load();
        page.loading = Some(tokio::spawn(fetch_metadata(state.clone())));
    }
    Html(html)
}

/// POST /
///
/// Applies one page event (`action=submit|example|cancel`) and redirects back to
/// the page. Inputs arrive as `f:<feature>=<value>` pairs.
pub async fn post_form(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Redirect {
    let action = fields
        .iter()
        .rev()
        .find(|(key, _)| key == "action")
        .map(|(_, value)| value.as_str())
        .unwrap_or("submit");
    tracing::info!("POST / action={}", action);

    let mut page = state.page.lock().await;
    match action {
        "example" => {
            if !page.controller.fill_example() {
                tracing::debug!("Fill example ignored while {}", page.controller.status());
            }
        }
        "cancel" => {
            if page.controller.cancel_prediction() {
                if let Some(handle) = page.inflight.take() {
                    handle.abort();
                }
            }
        }
        "submit" => {
            // Inputs are frozen while an evaluation runs.
            if page.controller.status() != Status::Predicting {
                for (key, value) in &fields {
                    if let Some(name) = key.strip_prefix(FIELD_PREFIX) {
                        page.controller.change(name, value);
                    }
                }
            }
            match page.controller.begin_submit() {
                Ok((generation, request)) => {
                    let client = page.controller.client().clone();
                    let task_state = state.clone();
                    page.inflight = Some(tokio::spawn(async move {
                        let outcome = client.predict(&request).await;
                        task_state
                            .page
                            .lock()
                            .await
                            .controller
                            .finish_submit(generation, outcome);
                    }));
                }
                Err(e) => tracing::debug!("Submission not started: {}", e),
            }
        }
        other => tracing::warn!("Unknown page action: {}", other),
    }

    Redirect::to("/")
}
