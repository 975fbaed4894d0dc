use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait};

use crate::{
    EngineError, NewProduct, Page, PageRequest, Product, ProductUpdate, ResultEngine,
    categories, products,
    repository::{
        active, find_active, find_active_for_update, load_by_ids, name_taken, paginate,
        soft_delete,
    },
};

use super::{Engine, categories::require_category, ensure_positive, normalize_required_name};

/// Pair a product row with its category, deleted or not.
pub(super) async fn product_with_category<C: ConnectionTrait>(
    db: &C,
    product: products::Model,
) -> ResultEngine<Product> {
    let category = categories::Entity::find_by_id(product.category_id)
        .one(db)
        .await?
        .ok_or(EngineError::CategoryNotFound(product.category_id))?;
    Ok(Product::from((product, category)))
}

/// Batch version of [`product_with_category`].
pub(super) async fn products_with_categories<C: ConnectionTrait>(
    db: &C,
    products: Vec<products::Model>,
) -> ResultEngine<Vec<Product>> {
    let categories = load_by_ids::<categories::Entity, _>(
        db,
        products.iter().map(|product| product.category_id),
    )
    .await?;

    products
        .into_iter()
        .map(|product| {
            let category = categories
                .get(&product.category_id)
                .cloned()
                .ok_or(EngineError::CategoryNotFound(product.category_id))?;
            Ok(Product::from((product, category)))
        })
        .collect()
}

impl Engine {
    /// Add a product to an active category.
    pub async fn create_product(&self, cmd: NewProduct) -> ResultEngine<Product> {
        let name = normalize_required_name(&cmd.name, "product name")?;
        ensure_positive(cmd.count, "count")?;
        let NewProduct {
            count, category_id, ..
        } = cmd;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let category = require_category(db_tx, category_id).await?;
                if name_taken::<products::Entity, _>(db_tx, products::Column::Name, &name, None)
                    .await?
                {
                    return Err(EngineError::ProductAlreadyExists(name));
                }

                let now = Utc::now();
                let model = products::ActiveModel {
                    name: ActiveValue::Set(name),
                    count: ActiveValue::Set(count),
                    category_id: ActiveValue::Set(category_id),
                    deleted: ActiveValue::Set(false),
                    created_at: ActiveValue::Set(now),
                    modified_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;

                tracing::info!(product_id = model.id, category_id, count, "product created");
                Ok(Product::from((model, category)))
            })
        })
        .await
    }

    pub async fn product(&self, product_id: i64) -> ResultEngine<Product> {
        let model = find_active::<products::Entity, _>(&self.database, product_id)
            .await?
            .ok_or(EngineError::ProductNotFound(product_id))?;
        product_with_category(&self.database, model).await
    }

    pub async fn list_products(&self, page: PageRequest) -> ResultEngine<Page<Product>> {
        let mut page = paginate(&self.database, active::<products::Entity>(), page).await?;
        let models = std::mem::take(&mut page.content);
        let content = products_with_categories(&self.database, models).await?;
        Ok(page.with_content(content))
    }

    /// Rename, restock or move a product to another active category.
    pub async fn update_product(
        &self,
        product_id: i64,
        cmd: ProductUpdate,
    ) -> ResultEngine<Product> {
        if cmd.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one field must be supplied".to_string(),
            ));
        }
        let name = cmd
            .name
            .as_deref()
            .map(|value| normalize_required_name(value, "product name"))
            .transpose()?;
        if let Some(count) = cmd.count {
            ensure_positive(count, "count")?;
        }
        let ProductUpdate {
            count, category_id, ..
        } = cmd;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let product = find_active_for_update::<products::Entity, _>(db_tx, product_id)
                    .await?
                    .ok_or(EngineError::ProductNotFound(product_id))?;
                let mut model: products::ActiveModel = product.into();

                if let Some(name) = name {
                    if name_taken::<products::Entity, _>(
                        db_tx,
                        products::Column::Name,
                        &name,
                        Some(product_id),
                    )
                    .await?
                    {
                        return Err(EngineError::ProductAlreadyExists(name));
                    }
                    model.name = ActiveValue::Set(name);
                }
                if let Some(count) = count {
                    model.count = ActiveValue::Set(count);
                }
                if let Some(category_id) = category_id {
                    require_category(db_tx, category_id).await?;
                    model.category_id = ActiveValue::Set(category_id);
                }
                model.modified_at = ActiveValue::Set(Utc::now());

                let updated = model.update(db_tx).await?;
                tracing::info!(product_id, count = updated.count, "product updated");
                product_with_category(db_tx, updated).await
            })
        })
        .await
    }

    pub async fn delete_product(&self, product_id: i64) -> ResultEngine<()> {
        if !soft_delete::<products::Entity, _>(&self.database, product_id).await? {
            return Err(EngineError::ProductNotFound(product_id));
        }
        tracing::info!(product_id, "product deleted");
        Ok(())
    }
}
