// src/api/verify.rs

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::instamojo_client::{
    self, extract_status, status_is_successful, InstamojoError,
};
use crate::catalog;
use crate::AppState;

/// The client may send the payment identifier under any of the names the
/// provider uses across its redirect flavours.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub payment_id: Option<String>,
    pub id: Option<String>,
    pub token: Option<String>,
    pub payment_request_id: Option<String>,
    /// Optional: lets the response carry that product's download list.
    pub product_id: Option<String>,
}

impl VerifyRequest {
    pub fn resolved_payment_id(&self) -> Option<&str> {
        self.payment_id
            .as_deref()
            .or(self.id.as_deref())
            .or(self.token.as_deref())
            .or(self.payment_request_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Download descriptors for a verified purchase.
// TODO: swap the static catalog lookup for per-purchase signed download URLs
// once the download service issues them.
pub fn downloads_for(product_id: Option<&str>) -> Vec<serde_json::Value> {
    let items: Vec<(&str, &catalog::DownloadItem)> = match product_id.and_then(catalog::product) {
        Some(product) => product.downloads.iter().map(|d| (product.id, d)).collect(),
        None => catalog::all_products()
            .iter()
            .flat_map(|p| p.downloads.iter().map(move |d| (p.id, d)))
            .collect(),
    };

    items
        .into_iter()
        .map(|(pid, d)| {
            json!({
                "name": d.name,
                "url": format!("https://famechase.com/downloads/{pid}/{}.pdf", d.file_name),
            })
        })
        .collect()
}

/// Server-side payment verification against the Instamojo API.
///
/// This is the only trust anchor in the checkout flow: the client-local
/// redirect inspection in `purchases` unlocks the UI but proves nothing.
#[utoipa::path(
    post,
    path = "/api/instamojo-verify",
    tag = "payments",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification handled; check `ok`"),
        (status = 400, description = "Missing payment id"),
        (status = 500, description = "Server credentials not configured"),
        (status = 502, description = "Upstream provider error")
    )
)]
#[post("/api/instamojo-verify")]
pub async fn verify_payment(
    state: web::Data<AppState>,
    payload: web::Json<VerifyRequest>,
) -> HttpResponse {
    let payload = payload.into_inner();

    let Some(payment_id) = payload.resolved_payment_id() else {
        return HttpResponse::BadRequest().json(json!({
            "ok": false,
            "error": "payment_id required"
        }));
    };

    let Some((api_key, auth_token)) = state.instamojo.credentials() else {
        log::error!("instamojo credentials not configured");
        return HttpResponse::InternalServerError().json(json!({
            "ok": false,
            "error": "Instamojo credentials not configured"
        }));
    };

    let payment = match instamojo_client::fetch_payment(
        &state.instamojo.api_base,
        api_key,
        auth_token,
        payment_id,
    )
    .await
    {
        Ok(payment) => payment,
        Err(InstamojoError::Api { status, body }) => {
            log::warn!("instamojo verify upstream error status={status}");
            return HttpResponse::BadGateway().json(json!({
                "ok": false,
                "error": "Instamojo API error",
                "status": status,
                "data": body
            }));
        }
        Err(e) => {
            log::error!("instamojo verify request error: {e}");
            return HttpResponse::InternalServerError().json(json!({
                "ok": false,
                "error": e.to_string()
            }));
        }
    };

    let status = extract_status(&payment);
    let success = status.as_deref().map(status_is_successful).unwrap_or(false);

    if !success {
        return HttpResponse::Ok().json(json!({
            "ok": false,
            "message": "Payment not completed",
            "status": status,
            "data": payment
        }));
    }

    HttpResponse::Ok().json(json!({
        "ok": true,
        "message": "Payment verified",
        "status": status,
        "data": payment,
        "downloads": downloads_for(payload.product_id.as_deref())
    }))
}
