use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::db_err;
use crate::domain::verification::{Verification, VerificationKind, VerificationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::verification;

pub struct SeaOrmVerificationRepository {
    db: DatabaseConnection,
}

impl SeaOrmVerificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn verification_model_to_domain(model: verification::Model) -> DomainResult<Verification> {
    Ok(Verification {
        kind: model
            .kind
            .parse()
            .map_err(|e: DomainError| DomainError::Storage(e.to_string()))?,
        id: model.id,
        target: model.target,
        code_hash: model.code_hash,
        attempts: model.attempts,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

#[async_trait]
impl VerificationRepository for SeaOrmVerificationRepository {
    async fn replace(
        &self,
        kind: VerificationKind,
        target: &str,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<Verification> {
        let txn = self.db.begin().await.map_err(db_err)?;

        verification::Entity::delete_many()
            .filter(verification::Column::Kind.eq(kind.as_str()))
            .filter(verification::Column::Target.eq(target))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let model = verification::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            kind: Set(kind.as_str().to_string()),
            target: Set(target.to_string()),
            code_hash: Set(code_hash.to_string()),
            attempts: Set(0),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        verification_model_to_domain(model)
    }

    async fn find(&self, kind: VerificationKind, target: &str) -> DomainResult<Option<Verification>> {
        verification::Entity::find()
            .filter(verification::Column::Kind.eq(kind.as_str()))
            .filter(verification::Column::Target.eq(target))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(verification_model_to_domain)
            .transpose()
    }

    async fn record_failed_attempt(&self, id: &str) -> DomainResult<i32> {
        verification::Entity::update_many()
            .col_expr(
                verification::Column::Attempts,
                Expr::col(verification::Column::Attempts).add(1),
            )
            .filter(verification::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let model = verification::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Verification", "id", id))?;

        Ok(model.attempts)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        verification::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let result = verification::Entity::delete_many()
            .filter(verification::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}
