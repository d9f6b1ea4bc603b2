use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, is_unique_violation};
use crate::domain::product::{
    NewImage, NewProduct, Product, ProductChanges, ProductImage, ProductQuery, ProductRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{cart_line, product, product_image};
use crate::shared::PaginatedResult;

pub struct SeaOrmProductRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn product_model_to_domain(model: product::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price_cents: model.price_cents,
        featured: model.featured,
        available: model.available,
        image_id: model.image_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn image_model_to_domain(model: product_image::Model) -> ProductImage {
    ProductImage {
        id: model.id,
        product_id: model.product_id,
        content_type: model.content_type,
        data: model.data,
        created_at: model.created_at,
    }
}

fn name_conflict(e: sea_orm::DbErr) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::Conflict("A product with this name already exists".to_string())
    } else {
        db_err(e)
    }
}

/// Replace every image of a product with `image`. Returns the new image id.
async fn store_image(
    txn: &DatabaseTransaction,
    product_id: &str,
    image: NewImage,
) -> DomainResult<String> {
    product_image::Entity::delete_many()
        .filter(product_image::Column::ProductId.eq(product_id))
        .exec(txn)
        .await
        .map_err(db_err)?;

    let id = uuid::Uuid::new_v4().to_string();
    product_image::ActiveModel {
        id: Set(id.clone()),
        product_id: Set(product_id.to_string()),
        content_type: Set(image.content_type),
        data: Set(image.data),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await
    .map_err(db_err)?;

    Ok(id)
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn create(&self, new: NewProduct) -> DomainResult<Product> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = product::ActiveModel {
            id: Set(id.clone()),
            name: Set(new.name.trim().to_string()),
            description: Set(new.description),
            price_cents: Set(new.price_cents),
            featured: Set(new.featured),
            available: Set(true),
            image_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(name_conflict)?;

        let model = match new.image {
            Some(image) => {
                let image_id = store_image(&txn, &id, image).await?;
                let mut active: product::ActiveModel = model.into();
                active.image_id = Set(Some(image_id));
                active.update(&txn).await.map_err(db_err)?
            }
            None => model,
        };

        txn.commit().await.map_err(db_err)?;
        Ok(product_model_to_domain(model))
    }

    async fn update(&self, id: &str, changes: ProductChanges) -> DomainResult<Product> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = product::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Product", "id", id))?;

        let mut active: product::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = changes.price_cents {
            active.price_cents = Set(price);
        }
        if let Some(featured) = changes.featured {
            active.featured = Set(featured);
        }
        if let Some(image) = changes.image {
            let image_id = store_image(&txn, id, image).await?;
            active.image_id = Set(Some(image_id));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&txn).await.map_err(name_conflict)?;
        txn.commit().await.map_err(db_err)?;

        Ok(product_model_to_domain(model))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(product_model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = product::Entity::find()
            .filter(product::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(product_model_to_domain).collect())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Product>> {
        let model = product::Entity::find()
            .filter(product::Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(product_model_to_domain))
    }

    async fn list(&self, query: ProductQuery) -> DomainResult<PaginatedResult<Product>> {
        let mut select = product::Entity::find().filter(product::Column::Available.eq(true));

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(product::Column::Name.contains(search));
        }
        if let Some(featured) = query.featured {
            select = select.filter(product::Column::Featured.eq(featured));
        }

        let total = select.clone().count(&self.db).await.map_err(db_err)?;
        let page = query.pagination;

        let models = select
            .order_by_asc(product::Column::Name)
            .offset(page.offset())
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(product_model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page.page, page.limit))
    }

    async fn retire(&self, id: &str) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = product::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Product", "id", id))?;

        let mut active: product::ActiveModel = existing.into();
        active.available = Set(false);
        active.featured = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(db_err)?;

        let removed = cart_line::Entity::delete_many()
            .filter(cart_line::Column::ProductId.eq(id))
            .filter(cart_line::Column::Status.eq(cart_line::CartLineStatus::Active))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(removed.rows_affected)
    }

    async fn image(&self, product_id: &str) -> DomainResult<Option<ProductImage>> {
        let model = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .order_by_desc(product_image::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(image_model_to_domain))
    }

    async fn count_available(&self) -> DomainResult<u64> {
        product::Entity::find()
            .filter(product::Column::Available.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
