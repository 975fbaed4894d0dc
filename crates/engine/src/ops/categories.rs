use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, QueryFilter};

use crate::{
    Category, CategoryUpdate, EngineError, NewCategory, Page, PageRequest, ResultEngine,
    categories, products,
    repository::{
        active, find_active, find_active_for_update, list_active, name_taken, paginate,
        soft_delete,
    },
};

use super::{Engine, ensure_positive, normalize_required_name};

pub(super) async fn require_category<C: ConnectionTrait>(
    db: &C,
    category_id: i64,
) -> ResultEngine<categories::Model> {
    find_active::<categories::Entity, _>(db, category_id)
        .await?
        .ok_or(EngineError::CategoryNotFound(category_id))
}

impl Engine {
    pub async fn create_category(&self, cmd: NewCategory) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category name")?;
        ensure_positive(cmd.order, "order")?;
        let order = cmd.order;
        let description = cmd.description.trim().to_string();

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                if name_taken::<categories::Entity, _>(
                    db_tx,
                    categories::Column::Name,
                    &name,
                    None,
                )
                .await?
                {
                    return Err(EngineError::CategoryAlreadyExists(name));
                }

                let now = Utc::now();
                let model = categories::ActiveModel {
                    name: ActiveValue::Set(name),
                    sort_order: ActiveValue::Set(order),
                    description: ActiveValue::Set(description),
                    deleted: ActiveValue::Set(false),
                    created_at: ActiveValue::Set(now),
                    modified_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;

                tracing::info!(category_id = model.id, "category created");
                Ok(Category::from(model))
            })
        })
        .await
    }

    pub async fn category(&self, category_id: i64) -> ResultEngine<Category> {
        require_category(&self.database, category_id)
            .await
            .map(Category::from)
    }

    pub async fn list_categories(&self, page: PageRequest) -> ResultEngine<Page<Category>> {
        let page = paginate(&self.database, active::<categories::Entity>(), page).await?;
        Ok(page.map(Category::from))
    }

    /// Every active category, unpaged.
    pub async fn all_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = list_active::<categories::Entity, _>(&self.database).await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    pub async fn update_category(
        &self,
        category_id: i64,
        cmd: CategoryUpdate,
    ) -> ResultEngine<Category> {
        if cmd.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one field must be supplied".to_string(),
            ));
        }
        let name = cmd
            .name
            .as_deref()
            .map(|value| normalize_required_name(value, "category name"))
            .transpose()?;
        if let Some(order) = cmd.order {
            ensure_positive(order, "order")?;
        }
        let order = cmd.order;
        let description = cmd.description.map(|value| value.trim().to_string());

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let category = find_active_for_update::<categories::Entity, _>(db_tx, category_id)
                    .await?
                    .ok_or(EngineError::CategoryNotFound(category_id))?;
                let mut model: categories::ActiveModel = category.into();

                if let Some(name) = name {
                    if name_taken::<categories::Entity, _>(
                        db_tx,
                        categories::Column::Name,
                        &name,
                        Some(category_id),
                    )
                    .await?
                    {
                        return Err(EngineError::CategoryAlreadyExists(name));
                    }
                    model.name = ActiveValue::Set(name);
                }
                if let Some(order) = order {
                    model.sort_order = ActiveValue::Set(order);
                }
                if let Some(description) = description {
                    model.description = ActiveValue::Set(description);
                }
                model.modified_at = ActiveValue::Set(Utc::now());

                let updated = model.update(db_tx).await?;
                tracing::info!(category_id, "category updated");
                Ok(Category::from(updated))
            })
        })
        .await
    }

    /// Soft delete a category. Refused with [`EngineError::CategoryInUse`]
    /// while active products still point at it.
    pub async fn delete_category(&self, category_id: i64) -> ResultEngine<()> {
        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                find_active_for_update::<categories::Entity, _>(db_tx, category_id)
                    .await?
                    .ok_or(EngineError::CategoryNotFound(category_id))?;

                let in_use = active::<products::Entity>()
                    .filter(products::Column::CategoryId.eq(category_id))
                    .one(db_tx)
                    .await?
                    .is_some();
                if in_use {
                    return Err(EngineError::CategoryInUse(category_id));
                }

                soft_delete::<categories::Entity, _>(db_tx, category_id).await?;
                tracing::info!(category_id, "category deleted");
                Ok(())
            })
        })
        .await
    }
}
