use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, IntoActiveModel as _, IsolationLevel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, Statement, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict, Query},
};
use uuid::Uuid;

use inkwell_core::sea_ext::OrderByRandom;
use inkwell_domain::ink::Visibility;
use inkwell_domain::pagination::{CursorPage, CursorRequest, PageRequest, Sort};
use inkwell_domain::reaction::ReactionKind;
use inkwell_domain::settings::PermissionStatus;
use inkwell_api_schema::{
    accounts, follows, inks, notification_settings, onboarding_profiles, reactions, sessions,
    users, verification_tokens,
};

use crate::domain::repository::{
    AccountRepository, FollowRepository, InkRepository, NotificationSettingsRepository,
    OnboardingRepository, ReactionRepository, SessionRepository, SignInOutcome, SignInPort,
    UserRepository, VerificationTokenRepository,
};
use crate::domain::types::{
    Account, Follow, Ink, InkPatch, InkSortBy, InkStats, NotificationFlagsPatch,
    NotificationSettings, OnboardingProfile, Reaction, ReactionCount, Session, TrendingInk, User,
    UserProfilePatch, VerificationToken,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("list users by ids")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let result = user_to_active_model(user).insert(&self.db).await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("username") => {
                    Err(ApiError::UsernameTaken)
                }
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::EmailTaken),
                _ => Err(anyhow::Error::from(e).context("create user").into()),
            },
        }
    }

    async fn update_profile(&self, id: Uuid, patch: &UserProfilePatch) -> Result<(), ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref username) = patch.username {
            am.username = Set(Some(username.clone()));
        }
        if let Some(ref name) = patch.name {
            am.name = Set(Some(name.clone()));
        }
        if let Some(ref image) = patch.image {
            am.image = Set(Some(image.clone()));
        }
        if let Some(ref bio) = patch.bio {
            am.bio = Set(Some(bio.clone()));
        }
        if let Some(ref location) = patch.location {
            am.location = Set(Some(location.clone()));
        }
        am.updated_at = Set(Utc::now());
        match am.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(ApiError::UserNotFound),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::UsernameTaken),
                _ => Err(anyhow::Error::from(e).context("update user profile").into()),
            },
        }
    }

    async fn set_onboarding_state(
        &self,
        id: Uuid,
        completed: bool,
        step: Option<&str>,
    ) -> Result<(), ApiError> {
        let am = users::ActiveModel {
            id: Set(id),
            onboarding_completed: Set(completed),
            onboarding_step: Set(step.map(str::to_owned)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        match am.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(ApiError::UserNotFound),
            Err(e) => Err(anyhow::Error::from(e)
                .context("set onboarding state")
                .into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_suggestions(&self, for_user: Uuid, limit: u32) -> Result<Vec<User>, ApiError> {
        let already_following = Query::select()
            .column(follows::Column::FollowingId)
            .from(follows::Entity)
            .and_where(Expr::col(follows::Column::FollowerId).eq(for_user))
            .to_owned();
        let models = users::Entity::find()
            .filter(users::Column::Id.ne(for_user))
            .filter(users::Column::Id.not_in_subquery(already_following))
            .order_by_random()
            .limit(limit as u64)
            .all(&self.db)
            .await
            .context("list user suggestions")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        name: model.name,
        image: model.image,
        bio: model.bio,
        location: model.location,
        email_verified: model.email_verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
        login_count: model.login_count,
        onboarding_completed: model.onboarding_completed,
        onboarding_step: model.onboarding_step,
    }
}

fn user_to_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        email: Set(user.email.clone()),
        username: Set(user.username.clone()),
        name: Set(user.name.clone()),
        image: Set(user.image.clone()),
        bio: Set(user.bio.clone()),
        location: Set(user.location.clone()),
        email_verified: Set(user.email_verified),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
        last_login_at: Set(user.last_login_at),
        login_count: Set(user.login_count),
        onboarding_completed: Set(user.onboarding_completed),
        onboarding_step: Set(user.onboarding_step.clone()),
    }
}

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn upsert(&self, account: &Account) -> Result<(), ApiError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Provider.eq(&account.provider))
            .filter(accounts::Column::ProviderAccountId.eq(&account.provider_account_id))
            .one(&self.db)
            .await
            .context("find account for upsert")?;

        match existing {
            Some(row) if row.user_id != account.user_id => Err(ApiError::AccountAlreadyLinked),
            Some(row) => {
                let mut am = row.into_active_model();
                am.refresh_token = Set(account.refresh_token.clone());
                am.access_token = Set(account.access_token.clone());
                am.expires_at = Set(account.expires_at);
                am.token_type = Set(account.token_type.clone());
                am.scope = Set(account.scope.clone());
                am.id_token = Set(account.id_token.clone());
                am.session_state = Set(account.session_state.clone());
                am.update(&self.db).await.context("refresh account tokens")?;
                Ok(())
            }
            None => {
                let am = accounts::ActiveModel {
                    id: Set(account.id),
                    user_id: Set(account.user_id),
                    kind: Set(account.kind.clone()),
                    provider: Set(account.provider.clone()),
                    provider_account_id: Set(account.provider_account_id.clone()),
                    refresh_token: Set(account.refresh_token.clone()),
                    access_token: Set(account.access_token.clone()),
                    expires_at: Set(account.expires_at),
                    token_type: Set(account.token_type.clone()),
                    scope: Set(account.scope.clone()),
                    id_token: Set(account.id_token.clone()),
                    session_state: Set(account.session_state.clone()),
                };
                match am.insert(&self.db).await {
                    Ok(_) => Ok(()),
                    // Lost the race against a concurrent link of the same pair.
                    Err(e) => match e.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            Err(ApiError::AccountAlreadyLinked)
                        }
                        _ => Err(anyhow::Error::from(e).context("insert account").into()),
                    },
                }
            }
        }
    }

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>, ApiError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Provider.eq(provider))
            .filter(accounts::Column::ProviderAccountId.eq(provider_account_id))
            .one(&self.db)
            .await
            .context("find account by provider")?;
        Ok(model.map(account_from_model))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Account>, ApiError> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Provider)
            .all(&self.db)
            .await
            .context("list accounts by user")?;
        Ok(models.into_iter().map(account_from_model).collect())
    }

    async fn unlink(
        &self,
        user_id: Uuid,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<bool, ApiError> {
        let result = accounts::Entity::delete_many()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::Provider.eq(provider))
            .filter(accounts::Column::ProviderAccountId.eq(provider_account_id))
            .exec(&self.db)
            .await
            .context("unlink account")?;
        Ok(result.rows_affected > 0)
    }
}

fn account_from_model(model: accounts::Model) -> Account {
    Account {
        id: model.id,
        user_id: model.user_id,
        kind: model.kind,
        provider: model.provider,
        provider_account_id: model.provider_account_id,
        refresh_token: model.refresh_token,
        access_token: model.access_token,
        expires_at: model.expires_at,
        token_type: model.token_type,
        scope: model.scope,
        id_token: model.id_token,
        session_state: model.session_state,
    }
}

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::SessionToken.eq(token))
            .one(&self.db)
            .await
            .context("find session by token")?;
        Ok(model.map(session_from_model))
    }

    async fn renew(&self, token: &str, expires: DateTime<Utc>) -> Result<(), ApiError> {
        sessions::Entity::update_many()
            .col_expr(sessions::Column::Expires, Expr::value(expires))
            .filter(sessions::Column::SessionToken.eq(token))
            .exec(&self.db)
            .await
            .context("renew session")?;
        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, ApiError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::SessionToken.eq(token))
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Expires.lte(now))
            .exec(&self.db)
            .await
            .context("delete expired sessions")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        session_token: model.session_token,
        user_id: model.user_id,
        expires: model.expires,
    }
}

// ── Verification token repository ────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationTokenRepository {
    pub db: DatabaseConnection,
}

impl VerificationTokenRepository for DbVerificationTokenRepository {
    async fn create(&self, token: &VerificationToken) -> Result<(), ApiError> {
        verification_tokens::ActiveModel {
            identifier: Set(token.identifier.clone()),
            token: Set(token.token.clone()),
            expires: Set(token.expires),
        }
        .insert(&self.db)
        .await
        .context("create verification token")?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let result = verification_tokens::Entity::delete_many()
            .filter(verification_tokens::Column::Expires.lte(now))
            .exec(&self.db)
            .await
            .context("delete expired verification tokens")?;
        Ok(result.rows_affected)
    }
}

// ── Sign-in port ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSignInPort {
    pub db: DatabaseConnection,
}

impl SignInPort for DbSignInPort {
    async fn sign_in(
        &self,
        email: &str,
        code: &str,
        session_token: &str,
        session_expires: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<SignInOutcome, ApiError> {
        let email = email.to_owned();
        let code = code.to_owned();
        let session_token = session_token.to_owned();
        self.db
            .transaction_with_config::<_, SignInOutcome, ApiError>(
                |txn| {
                    Box::pin(async move {
                        let consumed = verification_tokens::Entity::find_by_id((
                            email.clone(),
                            code.clone(),
                        ))
                        .one(txn)
                        .await
                        .context("find sign-in code")?;
                        let Some(row) = consumed else {
                            return Err(ApiError::InvalidSignInCode);
                        };
                        verification_tokens::Entity::delete_by_id((email.clone(), code))
                            .exec(txn)
                            .await
                            .context("consume sign-in code")?;
                        if row.expires <= now {
                            return Err(ApiError::InvalidSignInCode);
                        }

                        let existing = users::Entity::find()
                            .filter(users::Column::Email.eq(&email))
                            .one(txn)
                            .await
                            .context("find user for sign-in")?;

                        let (user, created_user) = match existing {
                            Some(model) => {
                                let mut am = model.clone().into_active_model();
                                am.last_login_at = Set(Some(now));
                                am.login_count = Set(model.login_count + 1);
                                if model.email_verified.is_none() {
                                    am.email_verified = Set(Some(now));
                                }
                                am.updated_at = Set(now);
                                let updated =
                                    am.update(txn).await.context("record user login")?;
                                (updated, false)
                            }
                            None => {
                                let am = users::ActiveModel {
                                    id: Set(Uuid::now_v7()),
                                    email: Set(email.clone()),
                                    username: Set(None),
                                    name: Set(None),
                                    image: Set(None),
                                    bio: Set(None),
                                    location: Set(None),
                                    email_verified: Set(Some(now)),
                                    created_at: Set(now),
                                    updated_at: Set(now),
                                    last_login_at: Set(Some(now)),
                                    login_count: Set(1),
                                    onboarding_completed: Set(false),
                                    onboarding_step: Set(None),
                                };
                                let created =
                                    am.insert(txn).await.context("create user on sign-in")?;
                                (created, true)
                            }
                        };

                        let session = sessions::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            session_token: Set(session_token),
                            user_id: Set(user.id),
                            expires: Set(session_expires),
                        }
                        .insert(txn)
                        .await
                        .context("create session on sign-in")?;

                        Ok(SignInOutcome {
                            user: user_from_model(user),
                            session: session_from_model(session),
                            created_user,
                        })
                    })
                },
                Some(IsolationLevel::Serializable),
                None,
            )
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db) => {
                    ApiError::Internal(anyhow::Error::from(db).context("sign-in transaction"))
                }
                TransactionError::Transaction(api) => api,
            })
    }
}

// ── Ink repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbInkRepository {
    pub db: DatabaseConnection,
}

impl InkRepository for DbInkRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ink>, ApiError> {
        let model = inks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ink by id")?;
        model.map(ink_from_model).transpose()
    }

    async fn feed(&self, cursor: CursorRequest) -> Result<CursorPage<Ink>, ApiError> {
        let CursorRequest { after, limit } = cursor.clamped();
        let mut query =
            inks::Entity::find().filter(inks::Column::Visibility.eq(Visibility::Public.as_str()));

        if let Some(after_id) = after {
            let anchor = inks::Entity::find_by_id(after_id)
                .one(&self.db)
                .await
                .context("resolve feed cursor")?;
            if let Some(anchor) = anchor {
                query = query.filter(
                    Condition::any()
                        .add(inks::Column::CreatedAt.lt(anchor.created_at))
                        .add(
                            Condition::all()
                                .add(inks::Column::CreatedAt.eq(anchor.created_at))
                                .add(inks::Column::Id.lt(anchor.id)),
                        ),
                );
            }
        }

        // Fetch one extra row to decide whether another window exists.
        let mut models = query
            .order_by_desc(inks::Column::CreatedAt)
            .order_by_desc(inks::Column::Id)
            .limit(limit as u64 + 1)
            .all(&self.db)
            .await
            .context("load ink feed")?;

        let next = if models.len() > limit as usize {
            models.truncate(limit as usize);
            models.last().map(|m| m.id)
        } else {
            None
        };
        let items = models
            .into_iter()
            .map(ink_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CursorPage { items, next })
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        sort_by: InkSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ink>, ApiError> {
        let page = page.clamped();
        let mut query = inks::Entity::find().filter(inks::Column::AuthorId.eq(author_id));
        if !include_hidden {
            query = query.filter(inks::Column::Visibility.eq(Visibility::Public.as_str()));
        }
        query = match sort_by {
            InkSortBy::CreatedAt(Sort::Desc) => query.order_by_desc(inks::Column::CreatedAt),
            InkSortBy::CreatedAt(Sort::Asc) => query.order_by_asc(inks::Column::CreatedAt),
            InkSortBy::Views(Sort::Desc) => query.order_by_desc(inks::Column::Views),
            InkSortBy::Views(Sort::Asc) => query.order_by_asc(inks::Column::Views),
        };
        let models = query
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list inks by author")?;
        models.into_iter().map(ink_from_model).collect()
    }

    async fn latest_by_author(&self, author_id: Uuid) -> Result<Option<Ink>, ApiError> {
        let model = inks::Entity::find()
            .filter(inks::Column::AuthorId.eq(author_id))
            .order_by_desc(inks::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest ink by author")?;
        model.map(ink_from_model).transpose()
    }

    async fn create(&self, ink: &Ink) -> Result<(), ApiError> {
        inks::ActiveModel {
            id: Set(ink.id),
            content: Set(ink.content.clone()),
            author_id: Set(ink.author_id),
            created_at: Set(ink.created_at),
            updated_at: Set(ink.updated_at),
            reading_time: Set(ink.reading_time),
            views: Set(ink.views),
            kind: Set(ink.kind.clone()),
            theme: Set(ink.theme.clone()),
            visibility: Set(ink.visibility.as_str().to_owned()),
            is_pinned: Set(ink.is_pinned),
        }
        .insert(&self.db)
        .await
        .context("create ink")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &InkPatch, now: DateTime<Utc>) -> Result<(), ApiError> {
        let mut am = inks::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref content) = patch.content {
            am.content = Set(content.clone());
        }
        if let Some(ref kind) = patch.kind {
            am.kind = Set(kind.clone());
        }
        if let Some(ref theme) = patch.theme {
            am.theme = Set(theme.clone());
        }
        if let Some(visibility) = patch.visibility {
            am.visibility = Set(visibility.as_str().to_owned());
        }
        if let Some(reading_time) = patch.reading_time {
            am.reading_time = Set(reading_time);
        }
        am.updated_at = Set(now);
        match am.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(ApiError::InkNotFound),
            Err(e) => Err(anyhow::Error::from(e).context("update ink").into()),
        }
    }

    async fn set_pinned(
        &self,
        author_id: Uuid,
        ink_id: Uuid,
        pinned: bool,
    ) -> Result<(), ApiError> {
        let result = self
            .db
            .transaction::<_, u64, DbErr>(move |txn| {
                Box::pin(async move {
                    if pinned {
                        inks::Entity::update_many()
                            .col_expr(inks::Column::IsPinned, Expr::value(false))
                            .filter(inks::Column::AuthorId.eq(author_id))
                            .filter(inks::Column::IsPinned.eq(true))
                            .exec(txn)
                            .await?;
                    }
                    let result = inks::Entity::update_many()
                        .col_expr(inks::Column::IsPinned, Expr::value(pinned))
                        .filter(inks::Column::Id.eq(ink_id))
                        .filter(inks::Column::AuthorId.eq(author_id))
                        .exec(txn)
                        .await?;
                    Ok(result.rows_affected)
                })
            })
            .await
            .context("set pinned ink")?;
        if result == 0 {
            return Err(ApiError::InkNotFound);
        }
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), ApiError> {
        let result = inks::Entity::update_many()
            .col_expr(
                inks::Column::Views,
                Expr::col(inks::Column::Views).add(1),
            )
            .filter(inks::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment ink views")?;
        if result.rows_affected == 0 {
            return Err(ApiError::InkNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = inks::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete ink")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        let count = inks::Entity::find()
            .filter(inks::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count inks by author")?;
        Ok(count)
    }

    async fn author_stats(&self, author_id: Uuid) -> Result<InkStats, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct StatsRow {
            ink_count: i64,
            total_views: i64,
            avg_views: f64,
            min_views: i32,
            max_views: i32,
            total_reading_time: i64,
        }

        let sql = r#"
            SELECT COUNT(*)                                  AS ink_count,
                   COALESCE(SUM(views), 0)::bigint           AS total_views,
                   COALESCE(AVG(views), 0)::double precision AS avg_views,
                   COALESCE(MIN(views), 0)                   AS min_views,
                   COALESCE(MAX(views), 0)                   AS max_views,
                   COALESCE(SUM(reading_time), 0)::bigint    AS total_reading_time
            FROM inks
            WHERE author_id = $1
        "#;

        let row = StatsRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [author_id.into()],
        ))
        .one(&self.db)
        .await
        .context("aggregate author ink stats")?
        .context("aggregate query returned no row")?;

        Ok(InkStats {
            ink_count: row.ink_count as u64,
            total_views: row.total_views,
            avg_views: row.avg_views,
            min_views: row.min_views,
            max_views: row.max_views,
            total_reading_time: row.total_reading_time,
        })
    }

    async fn trending(
        &self,
        since: DateTime<Utc>,
        min_reactions: i64,
        limit: u32,
    ) -> Result<Vec<TrendingInk>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct TrendingRow {
            id: Uuid,
            content: String,
            author_id: Uuid,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            reading_time: i32,
            views: i32,
            kind: String,
            theme: String,
            visibility: String,
            is_pinned: bool,
            reaction_count: i64,
        }

        let sql = r#"
            SELECT i.*, r.reaction_count
            FROM inks AS i
            JOIN (
                SELECT ink_id, COUNT(*) AS reaction_count
                FROM reactions
                WHERE created_at >= $1
                GROUP BY ink_id
                HAVING COUNT(*) >= $2
            ) AS r ON r.ink_id = i.id
            WHERE i.visibility = 'public'
            ORDER BY r.reaction_count DESC, i.created_at DESC
            LIMIT $3
        "#;

        let rows = TrendingRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [since.into(), min_reactions.into(), (limit as i64).into()],
        ))
        .all(&self.db)
        .await
        .context("load trending inks")?;

        rows.into_iter()
            .map(|row| {
                let visibility = parse_visibility(&row.visibility)?;
                Ok(TrendingInk {
                    ink: Ink {
                        id: row.id,
                        content: row.content,
                        author_id: row.author_id,
                        created_at: row.created_at,
                        updated_at: row.updated_at,
                        reading_time: row.reading_time,
                        views: row.views,
                        kind: row.kind,
                        theme: row.theme,
                        visibility,
                        is_pinned: row.is_pinned,
                    },
                    reaction_count: row.reaction_count,
                })
            })
            .collect()
    }
}

fn parse_visibility(value: &str) -> Result<Visibility, ApiError> {
    Visibility::from_str(value)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("unknown visibility column value")))
}

fn ink_from_model(model: inks::Model) -> Result<Ink, ApiError> {
    let visibility = parse_visibility(&model.visibility)?;
    Ok(Ink {
        id: model.id,
        content: model.content,
        author_id: model.author_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
        reading_time: model.reading_time,
        views: model.views,
        kind: model.kind,
        theme: model.theme,
        visibility,
        is_pinned: model.is_pinned,
    })
}

// ── Reaction repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReactionRepository {
    pub db: DatabaseConnection,
}

impl ReactionRepository for DbReactionRepository {
    async fn set(&self, reaction: &Reaction) -> Result<bool, ApiError> {
        let am = reactions::ActiveModel {
            id: Set(reaction.id),
            ink_id: Set(reaction.ink_id),
            user_id: Set(reaction.user_id),
            kind: Set(reaction.kind.as_str().to_owned()),
            created_at: Set(reaction.created_at),
        };
        let inserted = reactions::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    reactions::Column::InkId,
                    reactions::Column::UserId,
                    reactions::Column::Kind,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("set reaction")?;
        Ok(inserted > 0)
    }

    async fn unset(
        &self,
        ink_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<bool, ApiError> {
        let result = reactions::Entity::delete_many()
            .filter(reactions::Column::InkId.eq(ink_id))
            .filter(reactions::Column::UserId.eq(user_id))
            .filter(reactions::Column::Kind.eq(kind.as_str()))
            .exec(&self.db)
            .await
            .context("unset reaction")?;
        Ok(result.rows_affected > 0)
    }

    async fn counts_for_ink(&self, ink_id: Uuid) -> Result<Vec<ReactionCount>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct KindCountRow {
            kind: String,
            count: i64,
        }

        let rows = reactions::Entity::find()
            .select_only()
            .column(reactions::Column::Kind)
            .column_as(reactions::Column::Id.count(), "count")
            .filter(reactions::Column::InkId.eq(ink_id))
            .group_by(reactions::Column::Kind)
            .into_model::<KindCountRow>()
            .all(&self.db)
            .await
            .context("count reactions per kind")?;

        rows.into_iter()
            .map(|row| {
                let kind = parse_reaction_kind(&row.kind)?;
                Ok(ReactionCount {
                    kind,
                    count: row.count as u64,
                })
            })
            .collect()
    }

    async fn kinds_for(&self, ink_id: Uuid, user_id: Uuid) -> Result<Vec<ReactionKind>, ApiError> {
        let models = reactions::Entity::find()
            .filter(reactions::Column::InkId.eq(ink_id))
            .filter(reactions::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list reaction kinds for user")?;
        models
            .into_iter()
            .map(|m| parse_reaction_kind(&m.kind))
            .collect()
    }

    async fn list_reactor_ids(&self, ink_id: Uuid) -> Result<Vec<Uuid>, ApiError> {
        let ids: Vec<Uuid> = reactions::Entity::find()
            .select_only()
            .column(reactions::Column::UserId)
            .distinct()
            .filter(reactions::Column::InkId.eq(ink_id))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list distinct reactor ids")?;
        Ok(ids)
    }

    async fn count_received_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        let authored = Query::select()
            .column(inks::Column::Id)
            .from(inks::Entity)
            .and_where(Expr::col(inks::Column::AuthorId).eq(author_id))
            .to_owned();
        let count = reactions::Entity::find()
            .filter(reactions::Column::InkId.in_subquery(authored))
            .count(&self.db)
            .await
            .context("count reactions received by author")?;
        Ok(count)
    }
}

fn parse_reaction_kind(value: &str) -> Result<ReactionKind, ApiError> {
    ReactionKind::from_str(value)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("unknown reaction kind column value")))
}

// ── Follow repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn follow(&self, follow: &Follow) -> Result<(), ApiError> {
        let am = follows::ActiveModel {
            follower_id: Set(follow.follower_id),
            following_id: Set(follow.following_id),
            created_at: Set(follow.created_at),
        };
        match am.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(ApiError::AlreadyFollowing),
                _ => Err(anyhow::Error::from(e).context("insert follow").into()),
            },
        }
    }

    async fn follow_many(&self, follows_batch: &[Follow]) -> Result<u64, ApiError> {
        if follows_batch.is_empty() {
            return Ok(0);
        }
        let models = follows_batch.iter().map(|f| follows::ActiveModel {
            follower_id: Set(f.follower_id),
            following_id: Set(f.following_id),
            created_at: Set(f.created_at),
        });
        let inserted = follows::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([follows::Column::FollowerId, follows::Column::FollowingId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("bulk insert follows")?;
        Ok(inserted)
    }

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool, ApiError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::FollowerId.eq(follower_id))
            .filter(follows::Column::FollowingId.eq(following_id))
            .exec(&self.db)
            .await
            .context("delete follow")?;
        Ok(result.rows_affected > 0)
    }

    async fn is_following(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, ApiError> {
        let model = follows::Entity::find_by_id((follower_id, following_id))
            .one(&self.db)
            .await
            .context("find follow edge")?;
        Ok(model.is_some())
    }

    async fn list_following(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Follow>, ApiError> {
        let page = page.clamped();
        let models = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(user_id))
            .order_by_desc(follows::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list following")?;
        Ok(models.into_iter().map(follow_from_model).collect())
    }

    async fn list_followers(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Follow>, ApiError> {
        let page = page.clamped();
        let models = follows::Entity::find()
            .filter(follows::Column::FollowingId.eq(user_id))
            .order_by_desc(follows::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list followers")?;
        Ok(models.into_iter().map(follow_from_model).collect())
    }

    async fn count_following(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let count = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(user_id))
            .count(&self.db)
            .await
            .context("count following")?;
        Ok(count)
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let count = follows::Entity::find()
            .filter(follows::Column::FollowingId.eq(user_id))
            .count(&self.db)
            .await
            .context("count followers")?;
        Ok(count)
    }
}

fn follow_from_model(model: follows::Model) -> Follow {
    Follow {
        follower_id: model.follower_id,
        following_id: model.following_id,
        created_at: model.created_at,
    }
}

// ── Notification settings repository ─────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationSettingsRepository {
    pub db: DatabaseConnection,
}

impl NotificationSettingsRepository for DbNotificationSettingsRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<NotificationSettings>, ApiError> {
        let model = notification_settings::Entity::find()
            .filter(notification_settings::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find notification settings")?;
        model.map(settings_from_model).transpose()
    }

    async fn upsert(&self, settings: &NotificationSettings) -> Result<(), ApiError> {
        let existing = notification_settings::Entity::find()
            .filter(notification_settings::Column::UserId.eq(settings.user_id))
            .one(&self.db)
            .await
            .context("find notification settings for upsert")?;

        match existing {
            Some(row) => {
                let mut am = row.into_active_model();
                am.push_enabled = Set(settings.push_enabled);
                am.new_follower = Set(settings.new_follower);
                am.new_reaction = Set(settings.new_reaction);
                am.trending_inks = Set(settings.trending_inks);
                am.followed_user_inks = Set(settings.followed_user_inks);
                am.most_reacted = Set(settings.most_reacted);
                am.suggestions = Set(settings.suggestions);
                am.editors_pick = Set(settings.editors_pick);
                am.permission_status = Set(settings.permission_status.as_str().to_owned());
                am.last_updated = Set(settings.last_updated);
                am.update(&self.db)
                    .await
                    .context("update notification settings")?;
            }
            None => {
                notification_settings::ActiveModel {
                    id: Set(settings.id),
                    user_id: Set(settings.user_id),
                    push_enabled: Set(settings.push_enabled),
                    new_follower: Set(settings.new_follower),
                    new_reaction: Set(settings.new_reaction),
                    trending_inks: Set(settings.trending_inks),
                    followed_user_inks: Set(settings.followed_user_inks),
                    most_reacted: Set(settings.most_reacted),
                    suggestions: Set(settings.suggestions),
                    editors_pick: Set(settings.editors_pick),
                    permission_status: Set(settings.permission_status.as_str().to_owned()),
                    last_updated: Set(settings.last_updated),
                }
                .insert(&self.db)
                .await
                .context("insert notification settings")?;
            }
        }
        Ok(())
    }

    async fn update_flags(
        &self,
        user_id: Uuid,
        patch: &NotificationFlagsPatch,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let existing = notification_settings::Entity::find()
            .filter(notification_settings::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find notification settings for update")?;
        let Some(row) = existing else {
            return Err(ApiError::SettingsNotFound);
        };

        let mut am = row.into_active_model();
        if let Some(v) = patch.push_enabled {
            am.push_enabled = Set(v);
        }
        if let Some(v) = patch.new_follower {
            am.new_follower = Set(v);
        }
        if let Some(v) = patch.new_reaction {
            am.new_reaction = Set(v);
        }
        if let Some(v) = patch.trending_inks {
            am.trending_inks = Set(v);
        }
        if let Some(v) = patch.followed_user_inks {
            am.followed_user_inks = Set(v);
        }
        if let Some(v) = patch.most_reacted {
            am.most_reacted = Set(v);
        }
        if let Some(v) = patch.suggestions {
            am.suggestions = Set(v);
        }
        if let Some(v) = patch.editors_pick {
            am.editors_pick = Set(v);
        }
        if let Some(status) = patch.permission_status {
            am.permission_status = Set(status.as_str().to_owned());
        }
        am.last_updated = Set(now);
        am.update(&self.db)
            .await
            .context("patch notification settings")?;
        Ok(())
    }
}

fn settings_from_model(
    model: notification_settings::Model,
) -> Result<NotificationSettings, ApiError> {
    let permission_status = PermissionStatus::from_str(&model.permission_status).ok_or_else(
        || ApiError::Internal(anyhow::anyhow!("unknown permission status column value")),
    )?;
    Ok(NotificationSettings {
        id: model.id,
        user_id: model.user_id,
        push_enabled: model.push_enabled,
        new_follower: model.new_follower,
        new_reaction: model.new_reaction,
        trending_inks: model.trending_inks,
        followed_user_inks: model.followed_user_inks,
        most_reacted: model.most_reacted,
        suggestions: model.suggestions,
        editors_pick: model.editors_pick,
        permission_status,
        last_updated: model.last_updated,
    })
}

// ── Onboarding repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOnboardingRepository {
    pub db: DatabaseConnection,
}

impl OnboardingRepository for DbOnboardingRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<OnboardingProfile>, ApiError> {
        let model = onboarding_profiles::Entity::find()
            .filter(onboarding_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find onboarding profile")?;
        model.map(onboarding_from_model).transpose()
    }

    async fn upsert(&self, profile: &OnboardingProfile) -> Result<(), ApiError> {
        let suggestions = serde_json::to_value(&profile.following_suggestions)
            .context("encode following suggestions")?;
        let interests =
            serde_json::to_value(&profile.interests).context("encode interests")?;

        let existing = onboarding_profiles::Entity::find()
            .filter(onboarding_profiles::Column::UserId.eq(profile.user_id))
            .one(&self.db)
            .await
            .context("find onboarding profile for upsert")?;

        match existing {
            Some(row) => {
                let mut am = row.into_active_model();
                am.following_suggestions = Set(suggestions);
                am.interests = Set(interests);
                am.updated_at = Set(profile.updated_at);
                am.update(&self.db)
                    .await
                    .context("update onboarding profile")?;
            }
            None => {
                onboarding_profiles::ActiveModel {
                    id: Set(profile.id),
                    user_id: Set(profile.user_id),
                    following_suggestions: Set(suggestions),
                    interests: Set(interests),
                    created_at: Set(profile.created_at),
                    updated_at: Set(profile.updated_at),
                }
                .insert(&self.db)
                .await
                .context("insert onboarding profile")?;
            }
        }
        Ok(())
    }

    async fn complete(
        &self,
        user_id: Uuid,
        step: Option<&str>,
        follows_batch: &[Follow],
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let step = step.map(str::to_owned);
        let follows_batch = follows_batch.to_vec();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        onboarding_completed: Set(true),
                        onboarding_step: Set(step),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;

                    onboarding_profiles::Entity::update_many()
                        .col_expr(onboarding_profiles::Column::UpdatedAt, Expr::value(now))
                        .filter(onboarding_profiles::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?;

                    if !follows_batch.is_empty() {
                        let models = follows_batch.iter().map(|f| follows::ActiveModel {
                            follower_id: Set(f.follower_id),
                            following_id: Set(f.following_id),
                            created_at: Set(f.created_at),
                        });
                        follows::Entity::insert_many(models)
                            .on_conflict(
                                OnConflict::columns([
                                    follows::Column::FollowerId,
                                    follows::Column::FollowingId,
                                ])
                                .do_nothing()
                                .to_owned(),
                            )
                            .exec_without_returning(txn)
                            .await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Transaction(DbErr::RecordNotUpdated) => ApiError::UserNotFound,
                e => ApiError::Internal(
                    anyhow::Error::from(e).context("complete onboarding transaction"),
                ),
            })
    }
}

fn onboarding_from_model(
    model: onboarding_profiles::Model,
) -> Result<OnboardingProfile, ApiError> {
    let following_suggestions: Vec<Uuid> =
        serde_json::from_value(model.following_suggestions)
            .context("decode following suggestions")?;
    let interests: Vec<String> =
        serde_json::from_value(model.interests).context("decode interests")?;
    Ok(OnboardingProfile {
        id: model.id,
        user_id: model.user_id,
        following_suggestions,
        interests,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
