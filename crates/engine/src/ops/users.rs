use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait};

use crate::{
    EngineError, NewUser, Page, PageRequest, ResultEngine, User, UserUpdate,
    repository::{active, find_active, find_active_for_update, name_taken, paginate, soft_delete},
    users,
};

use super::{Engine, normalize_required_name};

pub(super) async fn require_user<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> ResultEngine<users::Model> {
    find_active::<users::Entity, _>(db, user_id)
        .await?
        .ok_or(EngineError::UserNotFound(user_id))
}

pub(super) async fn require_user_for_update<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> ResultEngine<users::Model> {
    find_active_for_update::<users::Entity, _>(db, user_id)
        .await?
        .ok_or(EngineError::UserNotFound(user_id))
}

/// Persist a new balance and bump `modified_at`.
pub(super) async fn set_balance<C: ConnectionTrait>(
    db: &C,
    user: users::Model,
    balance_minor: i64,
) -> ResultEngine<users::Model> {
    let mut model: users::ActiveModel = user.into();
    model.balance_minor = ActiveValue::Set(balance_minor);
    model.modified_at = ActiveValue::Set(Utc::now());
    Ok(model.update(db).await?)
}

impl Engine {
    /// Register a user.
    ///
    /// Fails with [`EngineError::UserAlreadyExists`] if an active user already
    /// has the username.
    pub async fn create_user(&self, cmd: NewUser) -> ResultEngine<User> {
        let username = normalize_required_name(&cmd.username, "username")?;
        let full_name = normalize_required_name(&cmd.full_name, "full name")?;
        if cmd.balance.is_negative() {
            return Err(EngineError::InvalidAmount(
                "initial balance must be >= 0".to_string(),
            ));
        }
        let balance = cmd.balance;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                if name_taken::<users::Entity, _>(db_tx, users::Column::Username, &username, None)
                    .await?
                {
                    return Err(EngineError::UserAlreadyExists(username));
                }

                let now = Utc::now();
                let model = users::ActiveModel {
                    username: ActiveValue::Set(username),
                    full_name: ActiveValue::Set(full_name),
                    balance_minor: ActiveValue::Set(balance.minor()),
                    deleted: ActiveValue::Set(false),
                    created_at: ActiveValue::Set(now),
                    modified_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(db_tx)
                .await?;

                tracing::info!(user_id = model.id, balance = %balance, "user created");
                Ok(User::from(model))
            })
        })
        .await
    }

    pub async fn user(&self, user_id: i64) -> ResultEngine<User> {
        require_user(&self.database, user_id).await.map(User::from)
    }

    pub async fn list_users(&self, page: PageRequest) -> ResultEngine<Page<User>> {
        let page = paginate(&self.database, active::<users::Entity>(), page).await?;
        Ok(page.map(User::from))
    }

    /// Apply the supplied fields. A new username is checked against the
    /// other active users.
    pub async fn update_user(&self, user_id: i64, cmd: UserUpdate) -> ResultEngine<User> {
        if cmd.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one field must be supplied".to_string(),
            ));
        }
        let username = cmd
            .username
            .as_deref()
            .map(|value| normalize_required_name(value, "username"))
            .transpose()?;
        let full_name = cmd
            .full_name
            .as_deref()
            .map(|value| normalize_required_name(value, "full name"))
            .transpose()?;

        self.with_tx(move |_, db_tx| {
            Box::pin(async move {
                let user = require_user_for_update(db_tx, user_id).await?;
                let mut model: users::ActiveModel = user.into();

                if let Some(username) = username {
                    if name_taken::<users::Entity, _>(
                        db_tx,
                        users::Column::Username,
                        &username,
                        Some(user_id),
                    )
                    .await?
                    {
                        return Err(EngineError::UserAlreadyExists(username));
                    }
                    model.username = ActiveValue::Set(username);
                }
                if let Some(full_name) = full_name {
                    model.full_name = ActiveValue::Set(full_name);
                }
                model.modified_at = ActiveValue::Set(Utc::now());

                let updated = model.update(db_tx).await?;
                tracing::info!(user_id, "user updated");
                Ok(User::from(updated))
            })
        })
        .await
    }

    pub async fn delete_user(&self, user_id: i64) -> ResultEngine<()> {
        if !soft_delete::<users::Entity, _>(&self.database, user_id).await? {
            return Err(EngineError::UserNotFound(user_id));
        }
        tracing::info!(user_id, "user deleted");
        Ok(())
    }
}
