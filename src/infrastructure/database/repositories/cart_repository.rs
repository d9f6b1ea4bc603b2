use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::cart::{
    CartLine, CartLineStatus, CartRepository, DrinkOptions, MergeOutcome, OptionFingerprint,
    MAX_LINE_QUANTITY,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::cart_line;

pub struct SeaOrmCartRepository {
    db: DatabaseConnection,
}

impl SeaOrmCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn options_from_columns(
    topping: &str,
    sugar: i32,
    ice: &str,
    size: &str,
) -> DomainResult<DrinkOptions> {
    let stored = |e: DomainError| DomainError::Storage(format!("Corrupt drink options: {}", e));
    Ok(DrinkOptions {
        topping: topping.parse().map_err(stored)?,
        sugar: u8::try_from(sugar)
            .map_err(|_| DomainError::Storage(format!("Corrupt sugar value: {}", sugar)))?,
        ice: ice.parse().map_err(stored)?,
        size: size.parse().map_err(stored)?,
    })
}

fn line_model_to_domain(model: cart_line::Model) -> DomainResult<CartLine> {
    let options = options_from_columns(&model.topping, model.sugar, &model.ice, &model.size)?;
    Ok(CartLine {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        options,
        quantity: model.quantity,
        status: match model.status {
            cart_line::CartLineStatus::Active => CartLineStatus::Active,
            cart_line::CartLineStatus::CheckedOut => CartLineStatus::CheckedOut,
        },
        order_id: model.order_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn active_for(user_id: &str) -> Select<cart_line::Entity> {
    cart_line::Entity::find()
        .filter(cart_line::Column::UserId.eq(user_id))
        .filter(cart_line::Column::Status.eq(cart_line::CartLineStatus::Active))
}

fn matching(select: Select<cart_line::Entity>, fp: &OptionFingerprint) -> Select<cart_line::Entity> {
    select
        .filter(cart_line::Column::ProductId.eq(fp.product_id.as_str()))
        .filter(cart_line::Column::Topping.eq(fp.options.topping.as_str()))
        .filter(cart_line::Column::Sugar.eq(fp.options.sugar as i32))
        .filter(cart_line::Column::Ice.eq(fp.options.ice.as_str()))
        .filter(cart_line::Column::Size.eq(fp.options.size.as_str()))
}

async fn find_active<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    line_id: &str,
) -> DomainResult<Option<cart_line::Model>> {
    active_for(user_id)
        .filter(cart_line::Column::Id.eq(line_id))
        .one(conn)
        .await
        .map_err(db_err)
}

fn stale_merge() -> DomainError {
    DomainError::Conflict("Cart changed while merging duplicate lines".to_string())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl CartRepository for SeaOrmCartRepository {
    async fn active_lines(&self, user_id: &str) -> DomainResult<Vec<CartLine>> {
        let models = active_for(user_id)
            .order_by_asc(cart_line::Column::CreatedAt)
            .order_by_asc(cart_line::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.into_iter().map(line_model_to_domain).collect()
    }

    async fn add_or_increment(
        &self,
        user_id: &str,
        fingerprint: &OptionFingerprint,
        quantity: i32,
    ) -> DomainResult<CartLine> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        let existing = matching(active_for(user_id), fingerprint)
            .order_by_asc(cart_line::Column::CreatedAt)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let model = match existing {
            Some(line) => {
                let id = line.id.clone();
                // increment in SQL so concurrent adds are not lost
                let result = cart_line::Entity::update_many()
                    .col_expr(
                        cart_line::Column::Quantity,
                        Expr::col(cart_line::Column::Quantity).add(quantity),
                    )
                    .col_expr(cart_line::Column::UpdatedAt, Expr::value(now))
                    .filter(cart_line::Column::Id.eq(id.as_str()))
                    .filter(cart_line::Column::Quantity.lte(MAX_LINE_QUANTITY - quantity))
                    .exec(&txn)
                    .await
                    .map_err(db_err)?;

                if result.rows_affected != 1 {
                    return Err(DomainError::Validation(format!(
                        "Quantity must not exceed {}",
                        MAX_LINE_QUANTITY
                    )));
                }

                find_active(&txn, user_id, &id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("CartLine", "id", id))?
            }
            None => cart_line::ActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                user_id: Set(user_id.to_string()),
                product_id: Set(fingerprint.product_id.clone()),
                topping: Set(fingerprint.options.topping.as_str().to_string()),
                sugar: Set(fingerprint.options.sugar as i32),
                ice: Set(fingerprint.options.ice.as_str().to_string()),
                size: Set(fingerprint.options.size.as_str().to_string()),
                quantity: Set(quantity),
                status: Set(cart_line::CartLineStatus::Active),
                order_id: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?,
        };

        txn.commit().await.map_err(db_err)?;
        line_model_to_domain(model)
    }

    async fn set_quantity(&self, user_id: &str, line_id: &str, quantity: i32) -> DomainResult<CartLine> {
        let existing = find_active(&self.db, user_id, line_id)
            .await?
            .ok_or_else(|| DomainError::not_found("CartLine", "id", line_id))?;

        let mut active: cart_line::ActiveModel = existing.into();
        active.quantity = Set(quantity);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await.map_err(db_err)?;

        line_model_to_domain(model)
    }

    async fn delete_line(&self, user_id: &str, line_id: &str) -> DomainResult<bool> {
        let result = cart_line::Entity::delete_many()
            .filter(cart_line::Column::Id.eq(line_id))
            .filter(cart_line::Column::UserId.eq(user_id))
            .filter(cart_line::Column::Status.eq(cart_line::CartLineStatus::Active))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected == 1)
    }

    async fn apply_merge(&self, outcome: &MergeOutcome) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();
        let observed = |id: &str| outcome.observed.get(id).copied().ok_or_else(stale_merge);

        for (id, quantity) in &outcome.updated {
            let result = cart_line::Entity::update_many()
                .col_expr(cart_line::Column::Quantity, Expr::value(*quantity))
                .col_expr(cart_line::Column::UpdatedAt, Expr::value(now))
                .filter(cart_line::Column::Id.eq(id.as_str()))
                .filter(cart_line::Column::Status.eq(cart_line::CartLineStatus::Active))
                .filter(cart_line::Column::Quantity.eq(observed(id.as_str())?))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if result.rows_affected != 1 {
                return Err(stale_merge());
            }
        }

        for id in &outcome.absorbed {
            let result = cart_line::Entity::delete_many()
                .filter(cart_line::Column::Id.eq(id.as_str()))
                .filter(cart_line::Column::Status.eq(cart_line::CartLineStatus::Active))
                .filter(cart_line::Column::Quantity.eq(observed(id.as_str())?))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            if result.rows_affected != 1 {
                return Err(stale_merge());
            }
        }

        txn.commit().await.map_err(db_err)
    }
}
