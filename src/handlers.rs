// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the zrl resolver service.
//!
//! The page renderer calls `/zrl/init` once per request from a remote
//! visitor and `/zrl/annotate` for outgoing profile links. The probe worker
//! reports classifications back through `/probe/result`. The `/profile/*`
//! endpoints return display decisions for profile pages; the renderer
//! supplies the database rows they work from.

use crate::annotator::ZrlAnnotator;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::ZrlError;
use crate::guard::{record_probe_result, ProbeDecision, ProbeGuard};
use crate::jobs::JobQueue;
use crate::metrics::ZrlMetrics;
use crate::network::NetworkKind;
use crate::profile::advanced::{advanced_profile, PlainText, ProfileField, ProfileRecord};
use crate::profile::reminders::{
    birthday_reminders, birthday_window, cached_birthdays, event_reminders, event_window,
    BirthdayReminders, BirthdayRow, EventReminders, EventRow,
};
use crate::profile::sidebar::{profile_sidebar, ProfileSidebar, SidebarContext, SidebarProfile};
use crate::profile::tabs::{ProfileTab, ProfileTabBuilder, TabContext};
use crate::resolver::ZrlResolver;
use crate::visitor::{VisitorContext, VisitorIdentity};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub annotator: ZrlAnnotator,
    pub resolver: ZrlResolver,
    pub tabs: ProfileTabBuilder,
    pub cache: Arc<dyn CacheStore>,
    pub metrics: ZrlMetrics,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        cache: Arc<dyn CacheStore>,
        queue: Arc<dyn JobQueue>,
    ) -> Result<Self, prometheus::Error> {
        let metrics = ZrlMetrics::new()?;
        let guard = ProbeGuard::new(config.probe.clone(), cache.clone());
        let resolver = ZrlResolver::new(guard, queue).with_metrics(metrics.clone());

        Ok(Self {
            annotator: ZrlAnnotator::new(config.zrl.clone()),
            resolver,
            tabs: ProfileTabBuilder::new(config.base_url.clone()),
            cache,
            metrics,
            config,
        })
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Link annotation request.
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub target_url: String,
    #[serde(default)]
    pub force_trailing_slash: bool,
    #[serde(default)]
    pub visitor_url: Option<String>,
}

/// Link annotation response.
#[derive(Debug, Serialize)]
pub struct AnnotateResponse {
    pub url: String,
    pub annotated: bool,
}

/// Per-request initialisation for a visitor.
#[derive(Debug, Deserialize)]
pub struct InitRequest {
    #[serde(default)]
    pub visitor_url: Option<String>,
    #[serde(default)]
    pub local_user_id: Option<u64>,
    #[serde(default)]
    pub request_path: String,
}

/// Probe classification reported by the worker.
#[derive(Debug, Deserialize)]
pub struct ProbeResultRequest {
    pub host: String,
    pub network: NetworkKind,
}

/// Profile tabs request.
#[derive(Debug, Deserialize)]
pub struct TabsRequest {
    pub nickname: String,
    #[serde(default)]
    pub context: TabContext,
    /// Remote visitor whose identity is carried on profile-shaped tabs
    #[serde(default)]
    pub visitor_url: Option<String>,
}

/// Profile sidebar request.
#[derive(Debug, Deserialize)]
pub struct SidebarRequest {
    pub profile: SidebarProfile,
    #[serde(default)]
    pub context: SidebarContext,
}

/// Advanced profile request.
#[derive(Debug, Deserialize)]
pub struct AdvancedRequest {
    pub profile: ProfileRecord,
    #[serde(default)]
    pub viewer_uid: Option<u64>,
}

/// Reminders request. Birthday rows are only used on a cache miss; rows
/// outside the reminder windows are ignored.
#[derive(Debug, Deserialize)]
pub struct RemindersRequest {
    #[serde(default)]
    pub visitor: VisitorContext,
    /// Viewer's UTC offset in seconds
    #[serde(default)]
    pub tz_offset_secs: i32,
    #[serde(default)]
    pub birthdays: Vec<BirthdayRow>,
    #[serde(default)]
    pub events: Vec<EventRow>,
}

/// Reminders response.
#[derive(Debug, Serialize)]
pub struct RemindersResponse {
    pub birthdays: Option<BirthdayReminders>,
    pub events: Option<EventReminders>,
}

/// Theme owner request.
#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    #[serde(default)]
    pub visitor: VisitorContext,
    #[serde(default)]
    pub page_uid: Option<u64>,
    #[serde(default)]
    pub always_my_theme: bool,
}

/// Theme owner response.
#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub uid: u64,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/zrl/annotate", post(annotate))
        .route("/zrl/init", post(init))
        .route("/probe/result", post(probe_result))
        .route("/profile/tabs", post(tabs))
        .route("/profile/sidebar", post(sidebar))
        .route("/profile/advanced", post(advanced))
        .route("/profile/reminders", post(reminders))
        .route("/profile/theme", post(theme));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "zrl-resolver",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Decorate an outgoing link for the visitor.
pub async fn annotate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnnotateRequest>,
) -> Json<AnnotateResponse> {
    let visitor = VisitorIdentity {
        claimed_url: req.visitor_url,
    };
    let result = state.annotator.annotate_detailed(
        &req.target_url,
        req.force_trailing_slash,
        visitor.claimed(),
    );
    state.metrics.record_annotation(result.annotated);

    debug!(target = %req.target_url, url = %result.url, annotated = result.annotated, "Annotated link");
    Json(AnnotateResponse {
        url: result.url,
        annotated: result.annotated,
    })
}

/// Run the probe guard for a visitor and schedule a probe when warranted.
pub async fn init(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InitRequest>,
) -> Json<ProbeDecision> {
    let ctx = VisitorContext {
        identity: VisitorIdentity {
            claimed_url: req.visitor_url,
        },
        local_user_id: req.local_user_id,
        is_mobile: false,
    };

    Json(state.resolver.init(&ctx, &req.request_path).await)
}

/// Store a probe classification for a host.
pub async fn probe_result(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProbeResultRequest>,
) -> Response {
    match record_probe_result(state.cache.as_ref(), &state.config.probe, &req.host, req.network).await {
        Ok(entry) => {
            info!(host = %entry.host, network = %entry.network, "Probe result stored");
            (StatusCode::OK, Json(entry)).into_response()
        }
        Err(e @ ZrlError::InvalidHost { .. }) => {
            warn!(host = %req.host, "Rejected probe result for invalid host");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "INVALID_HOST",
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!(host = %req.host, error = %e, "Failed to store probe result");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "CACHE_UNAVAILABLE",
                }),
            )
                .into_response()
        }
    }
}

/// Navigation tabs for a profile, annotated for a remote visitor.
pub async fn tabs(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TabsRequest>,
) -> Json<Vec<ProfileTab>> {
    let visitor = VisitorIdentity {
        claimed_url: req.visitor_url,
    };
    let mut tabs = state.tabs.build(&req.nickname, &req.context);
    for tab in &mut tabs {
        tab.url = state.annotator.annotate(&tab.url, false, visitor.claimed());
    }
    Json(tabs)
}

/// Sidebar decisions for a profile.
pub async fn sidebar(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SidebarRequest>,
) -> Json<ProfileSidebar> {
    Json(profile_sidebar(&req.profile, &req.context, &state.config.base_url))
}

/// Populated detail fields of a profile.
pub async fn advanced(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdvancedRequest>,
) -> Response {
    let today = Utc::now().date_naive();
    match advanced_profile(
        &req.profile,
        req.viewer_uid,
        &state.config.base_url,
        today,
        &PlainText,
    ) {
        Some(fields) => Json::<Vec<ProfileField>>(fields).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Profile has no name".to_string(),
                code: "PROFILE_NOT_FOUND",
            }),
        )
            .into_response(),
    }
}

/// Birthday and event reminders for a logged-in user.
pub async fn reminders(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemindersRequest>,
) -> Json<RemindersResponse> {
    let Some(uid) = req.visitor.desktop_local_user() else {
        return Json(RemindersResponse {
            birthdays: None,
            events: None,
        });
    };

    let tz = FixedOffset::east_opt(req.tz_offset_secs).unwrap_or_else(|| {
        warn!(offset = req.tz_offset_secs, "Ignoring out-of-range timezone offset");
        Utc.fix()
    });
    let now = Utc::now();

    // Rows outside the query windows are ignored
    let (lower, upper) = birthday_window(now);
    let supplied: Vec<BirthdayRow> = req
        .birthdays
        .into_iter()
        .filter(|row| row.start < upper && row.finish > lower)
        .collect();
    let (from, until) = event_window(now);
    let events: Vec<EventRow> = req
        .events
        .into_iter()
        .filter(|row| row.start >= from && row.start < until)
        .collect();

    let rows = cached_birthdays(
        state.cache.as_ref(),
        uid,
        state.config.cache.birthday_ttl(),
        || async move { supplied },
    )
    .await;

    Json(RemindersResponse {
        birthdays: birthday_reminders(&req.visitor, &rows, now, tz, &state.config.base_url),
        events: event_reminders(&req.visitor, &events, now, tz),
    })
}

/// Which user's theme renders a page.
pub async fn theme(Json(req): Json<ThemeRequest>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        uid: req.visitor.theme_uid(req.page_uid, req.always_my_theme),
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
