//! HTTP front end
//!
//! - `GET /` renders the empty form
//! - `GET /dashboard?ticker=..&start=..&end=..` renders the HTML dashboard
//! - `GET /api/dashboard?ticker=..&start=..&end=..` returns the page description as JSON

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use dash_stock::ui::{self, UiDescription};
use dash_stock::{AppState, Dashboard, DashboardError, DashboardRequest, MarketDataClient};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

type SharedDashboard<C> = Arc<Dashboard<C>>;

/// Rendering failure, reported as a 500
pub struct ServerError(DashboardError);

impl From<DashboardError> for ServerError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "failed to render page");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub fn router<C: MarketDataClient + 'static>(dashboard: SharedDashboard<C>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard_page::<C>))
        .route("/api/dashboard", get(dashboard_api::<C>))
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard)
}

pub async fn serve<C: MarketDataClient + 'static>(
    dashboard: SharedDashboard<C>,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving dashboard");
    axum::serve(listener, router(dashboard)).await?;
    Ok(())
}

/// Run the request, or turn a malformed query into a rejected state
async fn page_for<C: MarketDataClient>(
    dashboard: &Dashboard<C>,
    query: Result<Query<DashboardRequest>, QueryRejection>,
) -> (StatusCode, UiDescription) {
    match query {
        Ok(Query(request)) => {
            let state = dashboard.run(&request).await;
            let status = match &state {
                AppState::Rejected { .. } => StatusCode::BAD_REQUEST,
                AppState::Idle | AppState::Loaded(_) => StatusCode::OK,
            };
            (status, ui::render(&state))
        }
        Err(rejection) => {
            let state = AppState::Rejected {
                ticker: String::new(),
                start: None,
                end: None,
                message: rejection.body_text(),
            };
            (StatusCode::BAD_REQUEST, ui::render(&state))
        }
    }
}

async fn index() -> Result<Html<String>, ServerError> {
    Ok(Html(ui::html::to_html(&ui::render(&AppState::Idle))?))
}

async fn dashboard_page<C: MarketDataClient + 'static>(
    State(dashboard): State<SharedDashboard<C>>,
    query: Result<Query<DashboardRequest>, QueryRejection>,
) -> Result<(StatusCode, Html<String>), ServerError> {
    let (status, page) = page_for(&dashboard, query).await;
    Ok((status, Html(ui::html::to_html(&page)?)))
}

async fn dashboard_api<C: MarketDataClient + 'static>(
    State(dashboard): State<SharedDashboard<C>>,
    query: Result<Query<DashboardRequest>, QueryRejection>,
) -> (StatusCode, Json<UiDescription>) {
    let (status, page) = page_for(&dashboard, query).await;
    (status, Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::offline_dashboard;
    use chrono::NaiveDate;

    fn dashboard() -> SharedDashboard<crate::test_support::OfflineClient> {
        Arc::new(offline_dashboard())
    }

    fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(
        ticker: &str,
        start: (i32, u32, u32),
        end: (i32, u32, u32),
    ) -> Query<DashboardRequest> {
        Query(DashboardRequest::new(ticker, date(start), date(end)))
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let Html(body) = index().await.ok().unwrap();
        assert!(body.contains(r#"action="/dashboard""#));
    }

    #[tokio::test]
    async fn test_api_degrades_offline_provider() {
        let (status, Json(page)) = dashboard_api(
            State(dashboard()),
            Ok(query("aapl", (2024, 1, 1), (2024, 6, 1))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page.input.unwrap().ticker, "AAPL");
        assert_eq!(page.sections.len(), 6);
    }

    #[tokio::test]
    async fn test_api_rejects_reversed_range() {
        let (status, Json(page)) = dashboard_api(
            State(dashboard()),
            Ok(query("aapl", (2024, 6, 1), (2024, 1, 1))),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(page.sections[0].title, "Error");

        let input = page.input.unwrap();
        assert_eq!(input.start, Some(date((2024, 6, 1))));
        assert_eq!(input.end, Some(date((2024, 1, 1))));
    }

    #[tokio::test]
    async fn test_rejected_page_keeps_dates_in_form() {
        let (status, Html(body)) = dashboard_page(
            State(dashboard()),
            Ok(query("msft", (2024, 6, 1), (2024, 1, 1))),
        )
        .await
        .ok()
        .unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(r#"name="start" value="2024-06-01""#));
        assert!(body.contains(r#"name="end" value="2024-01-01""#));
    }

    #[tokio::test]
    async fn test_page_is_html() {
        let (status, Html(body)) = dashboard_page(
            State(dashboard()),
            Ok(query("msft", (2024, 1, 1), (2024, 6, 1))),
        )
        .await
        .ok()
        .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Total Analysis"));
        assert!(body.contains("No data available"));
    }
}
