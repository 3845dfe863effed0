use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionError,
    TransactionTrait,
    sea_query::{Expr, Query, extension::postgres::PgExpr},
};

use ladle_api_schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts,
    subscriptions, tags, users,
};
use ladle_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::{
    IngredientRepository, MembershipRepository, RecipeRepository, ShoppingListSource,
    SubscriptionRepository, TagRepository, UserRepository,
};
use crate::domain::types::{
    Ingredient, IngredientAmount, NewUser, Recipe, RecipeDetails, RecipeDraft, RecipeFilter,
    ShoppingListItem, Tag, User,
};
use crate::error::ApiServiceError;

fn unwrap_txn_err(e: TransactionError<ApiServiceError>) -> ApiServiceError {
    match e {
        TransactionError::Connection(db) => ApiServiceError::from(db),
        TransactionError::Transaction(inner) => inner,
    }
}

/// Escape LIKE wildcards in user-supplied prefixes.
fn escape_like(prefix: &str) -> String {
    prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiServiceError> {
        let model = users::ActiveModel {
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            avatar: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(user_from_model(model))
    }

    async fn list(&self, page: PageRequest) -> Result<Paginated<User>, ApiServiceError> {
        let page = page.clamped();
        let query = users::Entity::find().order_by_asc(users::Column::Username);
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count users")?;
        let models = query
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(Paginated {
            count,
            items: models.into_iter().map(user_from_model).collect(),
        })
    }

    async fn set_password_hash(&self, id: i64, hash: &str) -> Result<(), ApiServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set password hash")?;
        Ok(())
    }

    async fn set_avatar(&self, id: i64, path: Option<&str>) -> Result<(), ApiServiceError> {
        users::ActiveModel {
            id: Set(id),
            avatar: Set(path.map(str::to_owned)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set avatar")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        avatar: model.avatar,
        created_at: model.created_at,
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, ApiServiceError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, ApiServiceError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiServiceError> {
        let mut query = ingredients::Entity::find().order_by_asc(ingredients::Column::Name);
        if let Some(prefix) = name_prefix {
            query = query.filter(
                Expr::col((ingredients::Entity, ingredients::Column::Name))
                    .ilike(format!("{}%", escape_like(prefix))),
            );
        }
        let models = query.all(&self.db).await.context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Ingredient>, ApiServiceError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl DbRecipeRepository {
    /// Verify every referenced ingredient and tag id exists; runs inside
    /// the aggregate-write transaction so a failure rolls everything back.
    async fn check_references<C: sea_orm::ConnectionTrait>(
        conn: &C,
        draft: &RecipeDraft,
    ) -> Result<(), ApiServiceError> {
        let ingredient_ids: Vec<i64> = draft.ingredients.iter().map(|&(id, _)| id).collect();
        let found = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ingredient_ids.iter().copied()))
            .count(conn)
            .await
            .context("check ingredient ids")?;
        if found != ingredient_ids.len() as u64 {
            return Err(ApiServiceError::Validation(
                "ingredients: unknown ingredient id".into(),
            ));
        }
        let found = tags::Entity::find()
            .filter(tags::Column::Id.is_in(draft.tags.iter().copied()))
            .count(conn)
            .await
            .context("check tag ids")?;
        if found != draft.tags.len() as u64 {
            return Err(ApiServiceError::Validation("tags: unknown tag id".into()));
        }
        Ok(())
    }

    async fn insert_join_rows<C: sea_orm::ConnectionTrait>(
        conn: &C,
        recipe_id: i64,
        draft: &RecipeDraft,
    ) -> Result<(), ApiServiceError> {
        let tag_rows = draft.tags.iter().map(|&tag_id| recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(tag_id),
        });
        recipe_tags::Entity::insert_many(tag_rows)
            .exec(conn)
            .await
            .context("insert recipe tags")?;

        let ingredient_rows =
            draft
                .ingredients
                .iter()
                .map(|&(ingredient_id, amount)| recipe_ingredients::ActiveModel {
                    recipe_id: Set(recipe_id),
                    ingredient_id: Set(ingredient_id),
                    amount: Set(amount),
                });
        recipe_ingredients::Entity::insert_many(ingredient_rows)
            .exec(conn)
            .await
            .context("insert recipe ingredients")?;
        Ok(())
    }

    async fn details_for(
        &self,
        model: recipes::Model,
        viewer: Option<i64>,
    ) -> Result<RecipeDetails, ApiServiceError> {
        let author = users::Entity::find_by_id(model.author_id)
            .one(&self.db)
            .await
            .context("find recipe author")?
            .ok_or_else(|| ApiServiceError::Internal(anyhow::anyhow!("recipe has no author")))?;

        let tag_ids: Vec<i64> = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.eq(model.id))
            .all(&self.db)
            .await
            .context("list recipe tag links")?
            .into_iter()
            .map(|row| row.tag_id)
            .collect();
        let tags = tags::Entity::find()
            .filter(tags::Column::Id.is_in(tag_ids))
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list recipe tags")?
            .into_iter()
            .map(tag_from_model)
            .collect();

        let ingredient_rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.eq(model.id))
            .find_also_related(ingredients::Entity)
            .order_by_asc(recipe_ingredients::Column::IngredientId)
            .all(&self.db)
            .await
            .context("list recipe ingredients")?;
        let mut ingredient_amounts = Vec::with_capacity(ingredient_rows.len());
        for (row, ingredient) in ingredient_rows {
            let ingredient = ingredient.ok_or_else(|| {
                ApiServiceError::Internal(anyhow::anyhow!("dangling ingredient reference"))
            })?;
            ingredient_amounts.push(IngredientAmount {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount: row.amount,
            });
        }

        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(user_id) => {
                let fav = favorites::Entity::find_by_id((user_id, model.id))
                    .one(&self.db)
                    .await
                    .context("check favorite flag")?
                    .is_some();
                let cart = shopping_carts::Entity::find_by_id((user_id, model.id))
                    .one(&self.db)
                    .await
                    .context("check cart flag")?
                    .is_some();
                (fav, cart)
            }
            None => (false, false),
        };

        Ok(RecipeDetails {
            recipe: recipe_from_model(model),
            author: user_from_model(author),
            tags,
            ingredients: ingredient_amounts,
            is_favorited,
            is_in_shopping_cart,
        })
    }
}

impl RecipeRepository for DbRecipeRepository {
    async fn create(&self, author_id: i64, draft: &RecipeDraft) -> Result<i64, ApiServiceError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, i64, ApiServiceError>(|txn| {
                Box::pin(async move {
                    Self::check_references(txn, &draft).await?;
                    let recipe = recipes::ActiveModel {
                        author_id: Set(author_id),
                        name: Set(draft.name.clone()),
                        text: Set(draft.text.clone()),
                        image: Set(draft.image.clone()),
                        cooking_time: Set(draft.cooking_time),
                        created_at: Set(chrono::Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .context("insert recipe")?;
                    Self::insert_join_rows(txn, recipe.id, &draft).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .map_err(unwrap_txn_err)
    }

    async fn update(&self, recipe_id: i64, draft: &RecipeDraft) -> Result<(), ApiServiceError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, (), ApiServiceError>(|txn| {
                Box::pin(async move {
                    Self::check_references(txn, &draft).await?;
                    recipes::ActiveModel {
                        id: Set(recipe_id),
                        name: Set(draft.name.clone()),
                        text: Set(draft.text.clone()),
                        image: Set(draft.image.clone()),
                        cooking_time: Set(draft.cooking_time),
                        ..Default::default()
                    }
                    .update(txn)
                    .await
                    .context("update recipe scalars")?;

                    // Clear-then-reinsert: join rows are replaced, never merged.
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(recipe_id))
                        .exec(txn)
                        .await
                        .context("clear recipe tags")?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(recipe_id))
                        .exec(txn)
                        .await
                        .context("clear recipe ingredients")?;
                    Self::insert_join_rows(txn, recipe_id, &draft).await?;
                    Ok(())
                })
            })
            .await
            .map_err(unwrap_txn_err)
    }

    async fn delete(&self, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let result = recipes::Entity::delete_by_id(recipe_id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, recipe_id: i64) -> Result<Option<Recipe>, ApiServiceError> {
        let model = recipes::Entity::find_by_id(recipe_id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn details(
        &self,
        recipe_id: i64,
        viewer: Option<i64>,
    ) -> Result<Option<RecipeDetails>, ApiServiceError> {
        let model = recipes::Entity::find_by_id(recipe_id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        match model {
            Some(model) => Ok(Some(self.details_for(model, viewer).await?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Paginated<RecipeDetails>, ApiServiceError> {
        let page = page.clamped();
        let mut query = recipes::Entity::find();

        if let Some(author_id) = filter.author_id {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if !filter.tag_slugs.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(recipe_tags::Column::RecipeId)
                        .from(recipe_tags::Entity)
                        .and_where(
                            Expr::col(recipe_tags::Column::TagId).in_subquery(
                                Query::select()
                                    .column(tags::Column::Id)
                                    .from(tags::Entity)
                                    .and_where(
                                        Expr::col(tags::Column::Slug)
                                            .is_in(filter.tag_slugs.clone()),
                                    )
                                    .to_owned(),
                            ),
                        )
                        .to_owned(),
                ),
            );
        }
        // The membership flags only take effect for authenticated viewers.
        if let Some(user_id) = viewer {
            if filter.is_favorited {
                query = query.filter(
                    recipes::Column::Id.in_subquery(
                        Query::select()
                            .column(favorites::Column::RecipeId)
                            .from(favorites::Entity)
                            .and_where(Expr::col(favorites::Column::UserId).eq(user_id))
                            .to_owned(),
                    ),
                );
            }
            if filter.is_in_shopping_cart {
                query = query.filter(
                    recipes::Column::Id.in_subquery(
                        Query::select()
                            .column(shopping_carts::Column::RecipeId)
                            .from(shopping_carts::Entity)
                            .and_where(Expr::col(shopping_carts::Column::UserId).eq(user_id))
                            .to_owned(),
                    ),
                );
            }
        }

        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let models = query
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list recipes")?;

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(self.details_for(model, viewer).await?);
        }
        Ok(Paginated { count, items })
    }

    async fn list_by_author(
        &self,
        author_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, ApiServiceError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query.all(&self.db).await.context("list author recipes")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn count_by_author(&self, author_id: i64) -> Result<u64, ApiServiceError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count author recipes")?;
        Ok(count)
    }
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        text: model.text,
        image: model.image,
        cooking_time: model.cooking_time,
        created_at: model.created_at,
    }
}

// ── Favorite repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavoriteRepository {
    pub db: DatabaseConnection,
}

impl MembershipRepository for DbFavoriteRepository {
    async fn add(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let row = favorites::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
        };
        match favorites::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(true),
            // A concurrent duplicate insert loses to the primary key and
            // surfaces as the defined conflict, not a 500.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert favorite").into()),
        }
    }

    async fn remove(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let result = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete favorite")?;
        Ok(result.rows_affected > 0)
    }

    async fn contains(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let model = favorites::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("check favorite")?;
        Ok(model.is_some())
    }
}

// ── Shopping-cart repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShoppingCartRepository {
    pub db: DatabaseConnection,
}

impl MembershipRepository for DbShoppingCartRepository {
    async fn add(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let row = shopping_carts::ActiveModel {
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
        };
        match shopping_carts::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert cart row").into()),
        }
    }

    async fn remove(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let result = shopping_carts::Entity::delete_many()
            .filter(shopping_carts::Column::UserId.eq(user_id))
            .filter(shopping_carts::Column::RecipeId.eq(recipe_id))
            .exec(&self.db)
            .await
            .context("delete cart row")?;
        Ok(result.rows_affected > 0)
    }

    async fn contains(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let model = shopping_carts::Entity::find_by_id((user_id, recipe_id))
            .one(&self.db)
            .await
            .context("check cart row")?;
        Ok(model.is_some())
    }
}

impl ShoppingListSource for DbShoppingCartRepository {
    async fn aggregate(&self, user_id: i64) -> Result<Vec<ShoppingListItem>, ApiServiceError> {
        use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

        #[derive(Debug, FromQueryResult)]
        struct Row {
            name: String,
            measurement_unit: String,
            total_amount: i64,
        }

        let sql = r#"
            SELECT i.name AS name,
                   i.measurement_unit AS measurement_unit,
                   CAST(SUM(ri.amount) AS BIGINT) AS total_amount
            FROM recipe_ingredients ri
            INNER JOIN ingredients i ON i.id = ri.ingredient_id
            INNER JOIN shopping_carts sc ON sc.recipe_id = ri.recipe_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name ASC
        "#;

        let rows = Row::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("aggregate shopping list")?;

        Ok(rows
            .into_iter()
            .map(|row| ShoppingListItem {
                name: row.name,
                measurement_unit: row.measurement_unit,
                total_amount: row.total_amount,
            })
            .collect())
    }
}

// ── Subscription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SubscriptionRepository for DbSubscriptionRepository {
    async fn follow(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError> {
        let row = subscriptions::ActiveModel {
            user_id: Set(user_id),
            author_id: Set(author_id),
        };
        match subscriptions::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert subscription").into()),
        }
    }

    async fn unfollow(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError> {
        let result = subscriptions::Entity::delete_many()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .context("delete subscription")?;
        Ok(result.rows_affected > 0)
    }

    async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError> {
        let model = subscriptions::Entity::find_by_id((user_id, author_id))
            .one(&self.db)
            .await
            .context("check subscription")?;
        Ok(model.is_some())
    }

    async fn list_authors(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Paginated<User>, ApiServiceError> {
        let page = page.clamped();
        let query = users::Entity::find()
            .filter(
                users::Column::Id.in_subquery(
                    Query::select()
                        .column(subscriptions::Column::AuthorId)
                        .from(subscriptions::Entity)
                        .and_where(Expr::col(subscriptions::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(users::Column::Username);
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count followed authors")?;
        let models = query
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list followed authors")?;
        Ok(Paginated {
            count,
            items: models.into_iter().map(user_from_model).collect(),
        })
    }
}
