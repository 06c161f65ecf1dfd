// src/models/supplier_portal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quotation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
    Expired,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "draft",
            QuotationStatus::Submitted => "submitted",
            QuotationStatus::UnderReview => "under_review",
            QuotationStatus::Accepted => "accepted",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::Expired => "expired",
        }
    }

    /// Revisão do comprador: submitted -> under_review, e submitted/under_review -> accepted/rejected.
    pub fn can_transition_to(&self, target: QuotationStatus) -> bool {
        matches!(
            (self, target),
            (QuotationStatus::Submitted, QuotationStatus::UnderReview)
                | (QuotationStatus::Submitted, QuotationStatus::Accepted)
                | (QuotationStatus::Submitted, QuotationStatus::Rejected)
                | (QuotationStatus::UnderReview, QuotationStatus::Accepted)
                | (QuotationStatus::UnderReview, QuotationStatus::Rejected)
        )
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierQuotationSubmission {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub supplier_id: Uuid,
    pub rfq_id: Option<Uuid>,
    pub purchase_order_id: Option<Uuid>,
    #[schema(example = "QS-2024-0007")]
    pub submission_number: String,
    #[schema(example = "2500.00")]
    pub total_amount: Decimal,
    pub currency_code: Option<String>,
    pub status: QuotationStatus,
    pub rejection_reason: Option<String>,
    pub rejection_notes: Option<String>,
    pub can_resubmit: bool,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Cotação + dados do fornecedor necessários para faturar e notificar
#[derive(Debug, Clone, FromRow)]
pub struct QuotationForReview {
    #[sqlx(flatten)]
    pub quotation: SupplierQuotationSubmission,
    pub supplier_name: String,
    pub supplier_email: Option<String>,
    pub supplier_payment_terms: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInvoice {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    #[schema(example = "INV-000001")]
    pub invoice_number: String,
    pub supplier_id: Uuid,
    pub quotation_id: Uuid,
    pub purchase_order_id: Option<Uuid>,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub invoice_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-02-15")]
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    #[schema(example = "USD")]
    pub currency_code: String,
    pub payment_status: PaymentStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSupplierInvoice {
    pub invoice_number: String,
    pub supplier_id: Uuid,
    pub quotation_id: Uuid,
    pub purchase_order_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    QuotationUnderReview,
    QuotationAccepted,
    QuotationRejected,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::QuotationUnderReview => "quotation_under_review",
            NotificationType::QuotationAccepted => "quotation_accepted",
            NotificationType::QuotationRejected => "quotation_rejected",
        }
    }
}

// Inbox do fornecedor (somente inserção)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPortalNotification {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub supplier_id: Uuid,
    #[schema(example = "quotation_accepted")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPortalNotification {
    pub supplier_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub related_entity_type: &'static str,
    pub related_entity_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationReviewResult {
    #[schema(example = "Quotation accepted and invoice INV-000001 generated")]
    pub message: String,
    pub success: bool,
    pub quotation: SupplierQuotationSubmission,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<SupplierInvoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::QuotationStatus::*;

    #[test]
    fn reviewer_can_accept_or_reject_open_quotations() {
        for from in [Submitted, UnderReview] {
            assert!(from.can_transition_to(Accepted));
            assert!(from.can_transition_to(Rejected));
        }
        assert!(Submitted.can_transition_to(UnderReview));
        assert!(!UnderReview.can_transition_to(UnderReview));
    }

    #[test]
    fn closed_quotations_cannot_be_reviewed_again() {
        for from in [Accepted, Rejected, Expired, Draft] {
            for to in [UnderReview, Accepted, Rejected] {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }
}
