//! `POST /_lightbase/management/request-magic-link` (spec §4.8).

use crate::dto::{MagicLinkReq, MagicLinkResp};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use identity_core_core::domains::management::MagicLinkDelivery;
use shared_error::AppError;

#[utoipa::path(
    post,
    path = "/_lightbase/management/request-magic-link",
    tag = "management",
    operation_id = "management_request_magic_link",
    request_body = MagicLinkReq,
    responses((status = 200, description = "Magic link delivered or returned inline", body = MagicLinkResp))
)]
pub async fn request_magic_link(
    State(state): State<AppState>,
    Json(payload): Json<MagicLinkReq>,
) -> Result<Json<MagicLinkResp>, AppError> {
    let delivery = state
        .with_events(|events| async {
            let management = state
                .management_interface(events)
                .ok_or_else(|| AppError::server_key("management.requestMagicLink.notConfigured"))?;
            management.request_magic_link(&payload.messaging_user_id).await
        })
        .await?;

    Ok(Json(match delivery {
        MagicLinkDelivery::Sent => MagicLinkResp { delivered: true, inline_url: None },
        MagicLinkDelivery::Inline(url) => MagicLinkResp { delivered: true, inline_url: Some(url) },
    }))
}
