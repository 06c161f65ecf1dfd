// src/handlers/supplier_quotations.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermSupplierPortalReview, RequirePermission},
    },
    models::{
        supplier_portal::{QuotationReviewResult, QuotationStatus, SupplierQuotationSubmission},
        tenancy::RequestContext,
    },
    services::quotation_service::ReviewDecision,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuotationListQuery {
    pub status: Option<QuotationStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuotationPayload {
    pub quotation_id: Option<Uuid>,
    /// under_review, accepted ou rejected
    pub status: Option<QuotationStatus>,
    pub rejection_reason: Option<String>,
    pub rejection_notes: Option<String>,
    #[serde(default)]
    pub can_resubmit: bool,
}

#[utoipa::path(
    get,
    path = "/api/supplier-quotations",
    tag = "Supplier Portal",
    params(
        QuotationListQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Cotações recebidas", body = Vec<SupplierQuotationSubmission>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quotations(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermSupplierPortalReview>,
    Query(query): Query<QuotationListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let quotations = app_state
        .quotation_service
        .list(&ctx, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(quotations)))
}

#[utoipa::path(
    put,
    path = "/api/supplier-quotations",
    tag = "Supplier Portal",
    request_body = ReviewQuotationPayload,
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Cotação revisada; fatura gerada quando aceita", body = QuotationReviewResult),
        (status = 400, description = "Transição inválida"),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_quotation(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermSupplierPortalReview>,
    Json(payload): Json<ReviewQuotationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let expose = app_state.config.expose_error_details;

    let quotation_id = payload
        .quotation_id
        .ok_or_else(|| AppError::MissingField("quotationId").to_api_error(&locale, expose))?;
    let status = payload
        .status
        .ok_or_else(|| AppError::MissingField("status").to_api_error(&locale, expose))?;

    let result = app_state
        .quotation_service
        .review(
            &ctx,
            quotation_id,
            ReviewDecision {
                status,
                rejection_reason: payload.rejection_reason,
                rejection_notes: payload.rejection_notes,
                can_resubmit: payload.can_resubmit,
            },
        )
        .await
        .map_err(|e| e.to_api_error(&locale, expose))?;

    Ok((StatusCode::OK, Json(result)))
}
