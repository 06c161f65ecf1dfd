// src/db/quotation_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::supplier_portal::{
        NewPortalNotification, NewSupplierInvoice, PaymentStatus, QuotationForReview,
        QuotationStatus, SupplierInvoice, SupplierPortalNotification,
        SupplierQuotationSubmission,
    },
};

const QUOTATION_COLUMNS: &str = r#"
    q.id, q.organization_id, q.supplier_id, q.rfq_id, q.purchase_order_id,
    q.submission_number, q.total_amount, q.currency_code, q.status,
    q.rejection_reason, q.rejection_notes, q.can_resubmit, q.reviewed_by,
    q.reviewed_at, q.submitted_at, q.created_at, q.updated_at
"#;

const INVOICE_COLUMNS: &str = r#"
    id, organization_id, invoice_number, supplier_id, quotation_id,
    purchase_order_id, invoice_date, due_date, total_amount, currency_code,
    payment_status, created_by, created_at
"#;

// Campos gravados pela revisão do comprador
pub struct ReviewUpdate<'a> {
    pub status: QuotationStatus,
    pub rejection_reason: Option<&'a str>,
    pub rejection_notes: Option<&'a str>,
    pub can_resubmit: bool,
    pub reviewed_by: Uuid,
}

#[derive(Clone)]
pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<QuotationStatus>,
    ) -> Result<Vec<SupplierQuotationSubmission>, AppError> {
        let quotations = sqlx::query_as::<_, SupplierQuotationSubmission>(&format!(
            r#"
            SELECT {} FROM supplier_quotation_submissions q
            WHERE q.organization_id = $1
              AND ($2::quotation_status IS NULL OR q.status = $2)
            ORDER BY q.submitted_at DESC NULLS LAST, q.created_at DESC
            "#,
            QUOTATION_COLUMNS
        ))
        .bind(organization_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotations)
    }

    /// Trava a cotação para revisão, trazendo o fornecedor junto.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        quotation_id: Uuid,
    ) -> Result<QuotationForReview, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, QuotationForReview>(&format!(
            r#"
            SELECT {},
                   sup.name AS supplier_name,
                   sup.email AS supplier_email,
                   sup.payment_terms AS supplier_payment_terms
            FROM supplier_quotation_submissions q
            JOIN suppliers sup ON sup.id = q.supplier_id
            WHERE q.id = $1 AND q.organization_id = $2
            FOR UPDATE OF q
            "#,
            QUOTATION_COLUMNS
        ))
        .bind(quotation_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::QuotationNotFound)
    }

    pub async fn update_review<'e, E>(
        &self,
        executor: E,
        quotation_id: Uuid,
        review: &ReviewUpdate<'_>,
    ) -> Result<SupplierQuotationSubmission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation = sqlx::query_as::<_, SupplierQuotationSubmission>(&format!(
            r#"
            UPDATE supplier_quotation_submissions q SET
                status = $2,
                rejection_reason = $3,
                rejection_notes = $4,
                can_resubmit = $5,
                reviewed_by = $6,
                reviewed_at = NOW(),
                updated_at = NOW()
            WHERE q.id = $1
            RETURNING {}
            "#,
            QUOTATION_COLUMNS
        ))
        .bind(quotation_id)
        .bind(review.status)
        .bind(review.rejection_reason)
        .bind(review.rejection_notes)
        .bind(review.can_resubmit)
        .bind(review.reviewed_by)
        .fetch_one(executor)
        .await?;

        Ok(quotation)
    }

    pub async fn insert_invoice<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        user_id: Uuid,
        invoice: &NewSupplierInvoice,
    ) -> Result<SupplierInvoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SupplierInvoice>(&format!(
            r#"
            INSERT INTO supplier_invoices (
                organization_id, invoice_number, supplier_id, quotation_id,
                purchase_order_id, invoice_date, due_date, total_amount,
                currency_code, payment_status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            INVOICE_COLUMNS
        ))
        .bind(organization_id)
        .bind(&invoice.invoice_number)
        .bind(invoice.supplier_id)
        .bind(invoice.quotation_id)
        .bind(invoice.purchase_order_id)
        .bind(invoice.invoice_date)
        .bind(invoice.due_date)
        .bind(invoice.total_amount)
        .bind(&invoice.currency_code)
        .bind(PaymentStatus::Pending)
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "invoice for this quotation"))
    }

    pub async fn insert_notification<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        notification: &NewPortalNotification,
    ) -> Result<SupplierPortalNotification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SupplierPortalNotification>(
            r#"
            INSERT INTO supplier_portal_notifications (
                organization_id, supplier_id, notification_type, title, message,
                related_entity_type, related_entity_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, organization_id, supplier_id, notification_type, title, message,
                      related_entity_type, related_entity_id, is_read, created_at
            "#,
        )
        .bind(organization_id)
        .bind(notification.supplier_id)
        .bind(notification.notification_type.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.related_entity_type)
        .bind(notification.related_entity_id)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }
}
