// src/services/notification_service.rs

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

// Mensagem de saída para um fornecedor. O transporte (SMTP, fila...) é externo.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> anyhow::Result<()>;
}

/// Implementação padrão: só registra no log.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        tracing::info!(
            recipient = %message.recipient,
            subject = %message.subject,
            "📧 notificação enviada ao fornecedor"
        );
        Ok(())
    }
}

// Despacho pós-commit: nunca falha, no máximo devolve um aviso
#[derive(Clone)]
pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl NotificationService {
    pub fn new(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self { notifier, timeout }
    }

    /// `None` = entregue. `Some(aviso)` quando não há destinatário, o envio falhou
    /// ou estourou o tempo limite.
    pub async fn dispatch(&self, recipient: Option<&str>, subject: String, body: String) -> Option<String> {
        let Some(recipient) = recipient.filter(|r| !r.trim().is_empty()) else {
            tracing::warn!(subject = %subject, "fornecedor sem e-mail, notificação não enviada");
            return Some("Supplier has no email address; notification was not sent.".to_string());
        };

        let message = OutboundMessage {
            recipient: recipient.to_string(),
            subject,
            body,
        };

        match tokio::time::timeout(self.timeout, self.notifier.send(&message)).await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => {
                tracing::warn!(recipient = %message.recipient, error = %e, "falha ao notificar fornecedor");
                Some(format!("Failed to notify supplier: {}", e))
            }
            Err(_) => {
                tracing::warn!(
                    recipient = %message.recipient,
                    timeout_secs = self.timeout.as_secs(),
                    "notificação ao fornecedor excedeu o tempo limite"
                );
                Some("Supplier notification timed out.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _message: &OutboundMessage) -> anyhow::Result<()> {
            anyhow::bail!("smtp unavailable")
        }
    }

    struct SlowNotifier;

    #[async_trait]
    impl Notifier for SlowNotifier {
        async fn send(&self, _message: &OutboundMessage) -> anyhow::Result<()> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    fn service(notifier: impl Notifier + 'static) -> NotificationService {
        NotificationService::new(Arc::new(notifier), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn delivered_message_yields_no_warning() {
        let warning = service(LogNotifier)
            .dispatch(Some("vendas@fornecedor.com"), "PO000001".into(), "body".into())
            .await;
        assert!(warning.is_none());
    }

    #[tokio::test]
    async fn failures_become_warnings() {
        let warning = service(FailingNotifier)
            .dispatch(Some("vendas@fornecedor.com"), "PO000001".into(), "body".into())
            .await;
        assert!(warning.unwrap().contains("smtp unavailable"));
    }

    #[tokio::test]
    async fn missing_recipient_is_a_warning() {
        let warning = service(LogNotifier).dispatch(None, "PO000001".into(), "body".into()).await;
        assert!(warning.is_some());
        let blank = service(LogNotifier).dispatch(Some("  "), "PO000001".into(), "body".into()).await;
        assert!(blank.is_some());
    }

    #[tokio::test]
    async fn slow_transport_times_out() {
        let warning = service(SlowNotifier)
            .dispatch(Some("vendas@fornecedor.com"), "PO000001".into(), "body".into())
            .await;
        assert_eq!(warning.as_deref(), Some("Supplier notification timed out."));
    }
}
