/*
 * Responsibility
 * - /referee/profile の GET / PUT forwarding
 * - PUT: multipart を boundary で decode → (あれば) 写真を storage へ bridge →
 *   storage URL を body に折り込んで multipart で再送信
 * - upload が完了してから forwarding を始める (同一リクエスト内の順序保証)
 */
use axum::extract::{Multipart, State};

use crate::api::v1::dto::profile::ProfileUpdateInput;
use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::services::upstream::UpstreamResponse;
use crate::state::AppState;

const PROFILE_PATH: &str = "/api/arbitro/perfil";

pub async fn get_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<UpstreamResponse, AppError> {
    let headers = state.upstream.forward_headers(Some(auth.authorization()));
    Ok(state.upstream.get(PROFILE_PATH, headers, &[]).await?)
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    multipart: Multipart,
) -> Result<UpstreamResponse, AppError> {
    // All local validation happens before any network call.
    let input = ProfileUpdateInput::from_multipart(multipart).await?;

    let mut photo_url = input.photo_url;

    if let Some(photo) = input.photo {
        // Timestamp prefix keeps names unique in the provider namespace.
        let generated_name = format!(
            "{}_{}",
            chrono::Utc::now().timestamp_millis(),
            photo.original_name
        );
        let reference = state.storage.upload(photo.buffer, &generated_name).await?;
        // The raw buffer stops here: only the storage URL travels upstream.
        photo_url = Some(reference.secure_url);
    }

    let mut form = reqwest::multipart::Form::new();
    if let Some(remove) = input.remove_photo {
        form = form.text("quitarFoto", remove.to_string());
    }
    if let Some(url) = photo_url {
        form = form.text("urlFoto", url);
    }
    for date in &input.available_dates {
        form = form.text("fechasDisponibles", date.as_str().to_string());
    }

    let headers = state.upstream.forward_headers(Some(auth.authorization()));
    Ok(state
        .upstream
        .put_multipart(PROFILE_PATH, headers, form)
        .await?)
}
