/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - Bearer が必要な範囲 (referee 系) に auth middleware を適用する
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    assignments::{accept_assignment, list_assignments, reject_assignment},
    auth::login,
    health::health,
    news::{list_news, mock_news},
    profile::{get_profile, update_profile},
    settlements::{list_settlements, settlement_pdf},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let referee = Router::new()
        .route("/referee/profile", get(get_profile).put(update_profile))
        .route("/referee/assignments", get(list_assignments))
        .route("/referee/assignments/{id}/accept", post(accept_assignment))
        .route("/referee/assignments/{id}/reject", post(reject_assignment))
        .route("/referee/settlements", get(list_settlements))
        .route("/referee/settlements/{id}/pdf", get(settlement_pdf));
    let referee = middleware::auth::access::apply(referee, state);

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/news", get(list_news))
        .route("/news/mock", get(mock_news))
        .merge(referee)
}
