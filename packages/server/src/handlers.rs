//! HTTP handler functions for the rescue dashboard API.

use actix_web::{HttpResponse, web};
use rescue_dashboard_incident_models::FilterSelection;
use rescue_dashboard_query::filter::plot_data;
use rescue_dashboard_query::hover::HTML_SEPARATOR;
use rescue_dashboard_server_models::{
    ApiDistrictCount, ApiError, ApiHealth, ApiMarker, ApiOptions, BarResponse, MapResponse,
    PlotQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        record_count: state.records.len() as u64,
    })
}

/// `GET /api/options`
///
/// Returns the choices and defaults for the incident-type and time-window
/// controls.
pub async fn options() -> HttpResponse {
    HttpResponse::Ok().json(ApiOptions::current())
}

/// `GET /api/theme`
pub async fn theme(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.theme.as_ref())
}

/// `GET /api/map`
///
/// Returns a marker for every matching request with valid coordinates.
pub async fn map(
    state: web::Data<AppState>,
    params: web::Query<PlotQueryParams>,
) -> HttpResponse {
    let selection = match parse_selection(&params) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    let data = plot_data(&state.records, &selection, &state.clock);
    let markers: Vec<ApiMarker> = data
        .markers(HTML_SEPARATOR)
        .into_iter()
        .map(ApiMarker::from)
        .collect();

    HttpResponse::Ok().json(MapResponse {
        total_count: data.records.len() as u64,
        plotted_count: markers.len() as u64,
        markers,
    })
}

/// `GET /api/bar`
///
/// Returns the number of matching requests per district.
pub async fn bar(
    state: web::Data<AppState>,
    params: web::Query<PlotQueryParams>,
) -> HttpResponse {
    let selection = match parse_selection(&params) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    let data = plot_data(&state.records, &selection, &state.clock);

    HttpResponse::Ok().json(BarResponse {
        districts: data
            .district_counts()
            .into_iter()
            .map(ApiDistrictCount::from)
            .collect(),
        total_count: data.records.len() as u64,
    })
}

/// Parses the query parameters into a [`FilterSelection`], answering
/// `400 Bad Request` if either value is unrecognized.
fn parse_selection(params: &PlotQueryParams) -> Result<FilterSelection, HttpResponse> {
    FilterSelection::from_query(params.types.as_deref(), params.window.as_deref()).map_err(|e| {
        log::warn!("Rejected selection {params:?}: {e}");
        HttpResponse::BadRequest().json(ApiError {
            error: e.to_string(),
        })
    })
}
