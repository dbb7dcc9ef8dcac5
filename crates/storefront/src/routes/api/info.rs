//! Health probe and static reference data for chat clients.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use crate::rasa::RasaError;
use crate::state::AppState;

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub rasa_server: &'static str,
    pub message: &'static str,
}

impl HealthStatus {
    fn from_probe(probe: &std::result::Result<(), RasaError>) -> (StatusCode, Self) {
        match probe {
            Ok(()) => (
                StatusCode::OK,
                Self {
                    status: "healthy",
                    rasa_server: "connected",
                    message: "All services are running",
                },
            ),
            Err(RasaError::Status { .. }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Self {
                    status: "unhealthy",
                    rasa_server: "error",
                    message: "Rasa server returned error",
                },
            ),
            Err(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Self {
                    status: "unhealthy",
                    rasa_server: "disconnected",
                    message: "Cannot connect to Rasa server",
                },
            ),
        }
    }
}

/// Probe the bot service.
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let probe = state.rasa().status().await;
    if let Err(err) = &probe {
        tracing::warn!(error = %err, "Rasa health probe failed");
    }

    let (status, body) = HealthStatus::from_probe(&probe);
    (status, Json(body))
}

/// A language the bot can converse in.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

/// Body of `GET /api/languages`.
#[derive(Debug, Serialize)]
pub struct Languages {
    pub languages: &'static [Language],
}

const LANGUAGES: &[Language] = &[
    Language {
        code: "en",
        name: "English",
        native_name: "English",
    },
    Language {
        code: "si",
        name: "Sinhala",
        native_name: "සිංහල",
    },
    Language {
        code: "ta",
        name: "Tamil",
        native_name: "தமிழ்",
    },
];

/// Supported languages.
pub async fn languages() -> Json<Languages> {
    Json(Languages {
        languages: LANGUAGES,
    })
}

/// Quick facts for visitors.
#[derive(Debug, Serialize)]
pub struct QuickInfo {
    pub currency: &'static str,
    pub timezone: &'static str,
    pub emergency: &'static str,
    pub tourist_police: &'static str,
    pub best_time: &'static str,
    pub capital: &'static str,
}

/// Body of `GET /api/tourism-info`.
#[derive(Debug, Serialize)]
pub struct TourismInfo {
    pub quick_info: QuickInfo,
    pub popular_attractions: &'static [&'static str],
    pub popular_foods: &'static [&'static str],
}

/// General tourism information.
pub async fn tourism_info() -> Json<TourismInfo> {
    Json(TourismInfo {
        quick_info: QuickInfo {
            currency: "Sri Lankan Rupee (LKR)",
            timezone: "UTC+5:30",
            emergency: "119",
            tourist_police: "011-242-1052",
            best_time: "December to April",
            capital: "Colombo",
        },
        popular_attractions: &[
            "Sigiriya",
            "Nuwara Eliya",
            "Galle Fort",
            "Yala National Park",
            "Kandy",
            "Anuradhapura",
        ],
        popular_foods: &[
            "Rice and Curry",
            "Kottu Roti",
            "Hoppers",
            "String Hoppers",
            "Lamprais",
        ],
    })
}
