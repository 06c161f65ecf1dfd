// src/db/sequence_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{common::error::AppError, models::documents::DocumentKind};

// Contador por (organização, tipo de documento). Stateless: sempre roda dentro
// da transação de quem cria o documento, então um rollback devolve o número.
#[derive(Clone, Default)]
pub struct SequenceRepository;

impl SequenceRepository {
    pub fn new() -> Self {
        Self
    }

    /// Reserva o próximo valor. Na primeira chamada o contador parte do maior
    /// sufixo numérico já gravado, preservando documentos anteriores ao contador.
    pub async fn next_value<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        kind: DocumentKind,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (table, column) = kind.source();

        // O INSERT concorrente bloqueia na PK até o primeiro commitar e então cai no UPDATE
        let value = sqlx::query_scalar::<_, i64>(&format!(
            r#"
            INSERT INTO document_sequences (organization_id, kind, last_value)
            VALUES (
                $1, $2,
                (SELECT COALESCE(MAX(substring({column} FROM '(\d+)$')::bigint), 0) + 1
                 FROM {table} WHERE organization_id = $1)
            )
            ON CONFLICT (organization_id, kind)
            DO UPDATE SET last_value = document_sequences.last_value + 1, updated_at = NOW()
            RETURNING last_value
            "#
        ))
        .bind(organization_id)
        .bind(kind.key())
        .fetch_one(executor)
        .await?;

        Ok(value)
    }

    pub async fn next_number<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        kind: DocumentKind,
    ) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let value = self.next_value(executor, organization_id, kind).await?;
        Ok(kind.format(value))
    }
}
