// src/services/quotation_service.rs

use chrono::{Days, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{quotation_repo::ReviewUpdate, QuotationRepository, SequenceRepository, SettingsRepository},
    models::{
        documents::DocumentKind,
        supplier_portal::{
            NewPortalNotification, NewSupplierInvoice, NotificationType, QuotationReviewResult,
            QuotationStatus, SupplierQuotationSubmission,
        },
        tenancy::RequestContext,
    },
    services::notification_service::NotificationService,
};

// Decisão do comprador sobre uma cotação
#[derive(Debug, Clone)]
pub struct ReviewDecision {
    pub status: QuotationStatus,
    pub rejection_reason: Option<String>,
    pub rejection_notes: Option<String>,
    pub can_resubmit: bool,
}

/// Vencimento = data da fatura + prazo do fornecedor (em dias corridos).
pub fn due_date(invoice_date: NaiveDate, payment_terms_days: i32) -> NaiveDate {
    let days = u64::try_from(payment_terms_days.max(0)).unwrap_or_default();
    invoice_date
        .checked_add_days(Days::new(days))
        .unwrap_or(invoice_date)
}

#[derive(Clone)]
pub struct QuotationService {
    pool: PgPool,
    quotation_repo: QuotationRepository,
    sequence_repo: SequenceRepository,
    settings_repo: SettingsRepository,
    notifications: NotificationService,
}

impl QuotationService {
    pub fn new(
        pool: PgPool,
        quotation_repo: QuotationRepository,
        sequence_repo: SequenceRepository,
        settings_repo: SettingsRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            pool,
            quotation_repo,
            sequence_repo,
            settings_repo,
            notifications,
        }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<QuotationStatus>,
    ) -> Result<Vec<SupplierQuotationSubmission>, AppError> {
        self.quotation_repo.list(ctx.organization_id, status).await
    }

    /// Status, fatura e notificação do portal entram juntos ou nada entra.
    /// O e-mail ao fornecedor sai depois do commit.
    pub async fn review(
        &self,
        ctx: &RequestContext,
        quotation_id: Uuid,
        decision: ReviewDecision,
    ) -> Result<QuotationReviewResult, AppError> {
        let org = ctx.organization_id;
        let target = decision.status;

        let mut tx = self.pool.begin().await?;

        let current = self
            .quotation_repo
            .find_for_update(&mut *tx, org, quotation_id)
            .await?;

        if !current.quotation.status.can_transition_to(target) {
            return Err(AppError::InvalidStatusTransition {
                entity: "quotation",
                from: current.quotation.status.to_string(),
                to: target.to_string(),
            });
        }

        let rejected = target == QuotationStatus::Rejected;
        let quotation = self
            .quotation_repo
            .update_review(
                &mut *tx,
                quotation_id,
                &ReviewUpdate {
                    status: target,
                    rejection_reason: decision.rejection_reason.as_deref().filter(|_| rejected),
                    rejection_notes: decision.rejection_notes.as_deref().filter(|_| rejected),
                    can_resubmit: rejected && decision.can_resubmit,
                    reviewed_by: ctx.user_id,
                },
            )
            .await?;

        let number = &quotation.submission_number;
        let (invoice, notification, message) = match target {
            QuotationStatus::Accepted => {
                let settings = self.settings_repo.get_settings(&mut *tx, org).await?;
                let invoice_date = Utc::now().date_naive();
                let terms = current
                    .supplier_payment_terms
                    .unwrap_or(settings.default_payment_terms_days);

                let invoice_number = self
                    .sequence_repo
                    .next_number(&mut *tx, org, DocumentKind::SupplierInvoice)
                    .await?;

                let invoice = self
                    .quotation_repo
                    .insert_invoice(
                        &mut *tx,
                        org,
                        ctx.user_id,
                        &NewSupplierInvoice {
                            invoice_number,
                            supplier_id: quotation.supplier_id,
                            quotation_id: quotation.id,
                            purchase_order_id: quotation.purchase_order_id,
                            invoice_date,
                            due_date: due_date(invoice_date, terms),
                            total_amount: quotation.total_amount,
                            currency_code: quotation
                                .currency_code
                                .clone()
                                .unwrap_or(settings.default_currency),
                        },
                    )
                    .await?;

                let notification = NewPortalNotification {
                    supplier_id: quotation.supplier_id,
                    notification_type: NotificationType::QuotationAccepted,
                    title: "Quotation accepted".to_string(),
                    message: format!(
                        "Your quotation {} was accepted. Invoice {} was generated, due on {}.",
                        number, invoice.invoice_number, invoice.due_date
                    ),
                    related_entity_type: "supplier_invoice",
                    related_entity_id: invoice.id,
                };
                let message = format!(
                    "Quotation accepted and invoice {} generated",
                    invoice.invoice_number
                );
                (Some(invoice), notification, message)
            }
            QuotationStatus::Rejected => {
                let mut text = format!("Your quotation {} was rejected.", number);
                if let Some(reason) = &quotation.rejection_reason {
                    text.push_str(&format!(" Reason: {}.", reason));
                }
                if let Some(notes) = &quotation.rejection_notes {
                    text.push_str(&format!(" Notes: {}", notes));
                }
                if quotation.can_resubmit {
                    text.push_str(" You may submit a revised quotation.");
                }

                let notification = NewPortalNotification {
                    supplier_id: quotation.supplier_id,
                    notification_type: NotificationType::QuotationRejected,
                    title: "Quotation rejected".to_string(),
                    message: text,
                    related_entity_type: "supplier_quotation",
                    related_entity_id: quotation.id,
                };
                (None, notification, "Quotation rejected".to_string())
            }
            _ => {
                let notification = NewPortalNotification {
                    supplier_id: quotation.supplier_id,
                    notification_type: NotificationType::QuotationUnderReview,
                    title: "Quotation under review".to_string(),
                    message: format!("Your quotation {} is now under review.", number),
                    related_entity_type: "supplier_quotation",
                    related_entity_id: quotation.id,
                };
                (None, notification, "Quotation marked as under review".to_string())
            }
        };

        self.quotation_repo
            .insert_notification(&mut *tx, org, &notification)
            .await?;

        tx.commit().await?;

        tracing::info!(
            quotation_id = %quotation_id,
            status = %target,
            invoice = ?invoice.as_ref().map(|i| i.invoice_number.as_str()),
            "cotação revisada"
        );

        let warning = self
            .notifications
            .dispatch(
                current.supplier_email.as_deref(),
                notification.title.clone(),
                notification.message.clone(),
            )
            .await;

        Ok(QuotationReviewResult {
            message,
            success: true,
            quotation,
            invoice,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_adds_supplier_terms() {
        let invoice_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            due_date(invoice_date, 45),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
        );
    }

    #[test]
    fn default_terms_cross_month_end() {
        let invoice_date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(
            due_date(invoice_date, 30),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn zero_or_negative_terms_are_due_immediately() {
        let invoice_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(due_date(invoice_date, 0), invoice_date);
        assert_eq!(due_date(invoice_date, -5), invoice_date);
    }
}
