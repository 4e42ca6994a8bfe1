use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/charts/connected-users", get(get_connected_users_chart))
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub visitor_count: i64,
    pub connected_users: i64,
}

async fn get_stats() -> Result<Json<DashboardStats>> {
    // TODO: wire real visitor metrics once the platform exposes them

    Ok(Json(DashboardStats {
        visitor_count: 2024,
        connected_users: 3,
    }))
}

#[derive(Debug, Serialize)]
pub struct ChartDataPoint {
    pub hour: String,
    pub users: i64,
}

async fn get_connected_users_chart() -> Result<Json<Vec<ChartDataPoint>>> {
    Ok(Json(vec![
        ChartDataPoint { hour: "09:00".to_string(), users: 1 },
        ChartDataPoint { hour: "10:00".to_string(), users: 2 },
        ChartDataPoint { hour: "11:00".to_string(), users: 2 },
        ChartDataPoint { hour: "12:00".to_string(), users: 3 },
        ChartDataPoint { hour: "13:00".to_string(), users: 2 },
        ChartDataPoint { hour: "14:00".to_string(), users: 3 },
        ChartDataPoint { hour: "15:00".to_string(), users: 3 },
        ChartDataPoint { hour: "16:00".to_string(), users: 2 },
    ]))
}
