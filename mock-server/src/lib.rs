//! Simulator for the upstream contact-center API.
//!
//! Serves the single `GET /api/index.php` route the adapter targets. The
//! `endpoint` query parameter selects the behavior; parameter lookup is
//! case-insensitive because the host forwards keys with inconsistent
//! casing (`Endpoint`, `Tel`, `CIF`, ...). Responses are plain text, the
//! way the production endpoint answers.

use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;

pub fn app() -> Router {
    Router::new().route("/api/index.php", get(handle_api))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn handle_api(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    let Some(endpoint) = lookup(&params, "endpoint") else {
        return (
            StatusCode::BAD_REQUEST,
            "Error: Missing 'endpoint' parameter".to_string(),
        );
    };

    match endpoint.to_ascii_lowercase().as_str() {
        "procesaredate_1" => procesare_date(&params),
        "getinfo" => get_info(&params),
        "savecid" => save_cid(&params),
        _ => (
            StatusCode::NOT_FOUND,
            format!("Error: Unknown endpoint '{endpoint}'"),
        ),
    }
}

/// Case-insensitive parameter lookup, exact case first.
fn lookup(params: &HashMap<String, String>, name: &str) -> Option<String> {
    if let Some(value) = params.get(name) {
        return Some(value.clone());
    }
    params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.clone())
}

fn procesare_date(params: &HashMap<String, String>) -> (StatusCode, String) {
    let tel = lookup(params, "tel");
    let cif = lookup(params, "cif");
    let cid = lookup(params, "cid");
    if tel.is_none() || cif.is_none() || cid.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            "Error: Missing required parameters (tel, CIF, CID)".to_string(),
        );
    }
    (StatusCode::OK, "Success!".to_string())
}

fn get_info(params: &HashMap<String, String>) -> (StatusCode, String) {
    match lookup(params, "id") {
        Some(id) => (StatusCode::OK, format!("Info for ID={id}: customer record found")),
        None => (
            StatusCode::BAD_REQUEST,
            "Error: Missing required parameter 'id'".to_string(),
        ),
    }
}

fn save_cid(params: &HashMap<String, String>) -> (StatusCode, String) {
    match lookup(params, "cid") {
        Some(cid) => (StatusCode::OK, format!("Success: Saved CID={cid}")),
        None => (
            StatusCode::BAD_REQUEST,
            "Error: Missing required parameter 'cid'".to_string(),
        ),
    }
}
