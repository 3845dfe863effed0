use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use ladle_api::domain::repository::{
    ImageStore, MembershipRepository, PasswordPort, RecipeRepository, ShoppingListSource,
    SubscriptionRepository, UserRepository,
};
use ladle_api::domain::types::{
    NewUser, Recipe, RecipeDetails, RecipeDraft, RecipeFilter, ShoppingListItem, User,
};
use ladle_api::error::ApiServiceError;
use ladle_domain::pagination::{PageRequest, Paginated};

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, new: &NewUser) -> Result<User, ApiServiceError> {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            email: new.email.clone(),
            username: new.username.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            password_hash: new.password_hash.clone(),
            avatar: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn list(&self, page: PageRequest) -> Result<Paginated<User>, ApiServiceError> {
        let users = self.users.lock().unwrap();
        let items = users
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok(Paginated {
            count: users.len() as u64,
            items,
        })
    }

    async fn set_password_hash(&self, id: i64, hash: &str) -> Result<(), ApiServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.password_hash = hash.to_owned();
        }
        Ok(())
    }

    async fn set_avatar(&self, id: i64, path: Option<&str>) -> Result<(), ApiServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.avatar = path.map(str::to_owned);
        }
        Ok(())
    }
}

// ── MockRecipeRepo ───────────────────────────────────────────────────────────

/// In-memory recipe store keeping the last written draft per recipe so
/// tests can inspect the exact join rows a write would produce.
pub struct MockRecipeRepo {
    pub recipes: Arc<Mutex<Vec<Recipe>>>,
    pub drafts: Arc<Mutex<HashMap<i64, RecipeDraft>>>,
}

impl MockRecipeRepo {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(Mutex::new(recipes)),
            drafts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn drafts_handle(&self) -> Arc<Mutex<HashMap<i64, RecipeDraft>>> {
        Arc::clone(&self.drafts)
    }

    pub fn recipes_handle(&self) -> Arc<Mutex<Vec<Recipe>>> {
        Arc::clone(&self.recipes)
    }
}

impl RecipeRepository for MockRecipeRepo {
    async fn create(&self, author_id: i64, draft: &RecipeDraft) -> Result<i64, ApiServiceError> {
        let mut recipes = self.recipes.lock().unwrap();
        let id = recipes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        recipes.push(Recipe {
            id,
            author_id,
            name: draft.name.clone(),
            text: draft.text.clone(),
            image: draft.image.clone(),
            cooking_time: draft.cooking_time,
            created_at: Utc::now(),
        });
        self.drafts.lock().unwrap().insert(id, draft.clone());
        Ok(id)
    }

    async fn update(&self, recipe_id: i64, draft: &RecipeDraft) -> Result<(), ApiServiceError> {
        let mut recipes = self.recipes.lock().unwrap();
        if let Some(r) = recipes.iter_mut().find(|r| r.id == recipe_id) {
            r.name = draft.name.clone();
            r.text = draft.text.clone();
            r.image = draft.image.clone();
            r.cooking_time = draft.cooking_time;
        }
        self.drafts.lock().unwrap().insert(recipe_id, draft.clone());
        Ok(())
    }

    async fn delete(&self, recipe_id: i64) -> Result<bool, ApiServiceError> {
        let mut recipes = self.recipes.lock().unwrap();
        let before = recipes.len();
        recipes.retain(|r| r.id != recipe_id);
        self.drafts.lock().unwrap().remove(&recipe_id);
        Ok(recipes.len() < before)
    }

    async fn find_by_id(&self, recipe_id: i64) -> Result<Option<Recipe>, ApiServiceError> {
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == recipe_id)
            .cloned())
    }

    async fn details(
        &self,
        recipe_id: i64,
        _viewer: Option<i64>,
    ) -> Result<Option<RecipeDetails>, ApiServiceError> {
        let recipe = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == recipe_id)
            .cloned();
        Ok(recipe.map(|recipe| RecipeDetails {
            author: test_user(recipe.author_id),
            recipe,
            tags: vec![],
            ingredients: vec![],
            is_favorited: false,
            is_in_shopping_cart: false,
        }))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<i64>,
        page: PageRequest,
    ) -> Result<Paginated<RecipeDetails>, ApiServiceError> {
        let recipes: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.author_id.is_none_or(|a| r.author_id == a))
            .cloned()
            .collect();
        let count = recipes.len() as u64;
        let mut items = Vec::new();
        for recipe in recipes
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
        {
            items.push(self.details(recipe.id, viewer).await?.unwrap());
        }
        Ok(Paginated { count, items })
    }

    async fn list_by_author(
        &self,
        author_id: i64,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, ApiServiceError> {
        let mut recipes: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.author_id == author_id)
            .cloned()
            .collect();
        if let Some(limit) = limit {
            recipes.truncate(limit as usize);
        }
        Ok(recipes)
    }

    async fn count_by_author(&self, author_id: i64) -> Result<u64, ApiServiceError> {
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.author_id == author_id)
            .count() as u64)
    }
}

// ── MockMembershipRepo ───────────────────────────────────────────────────────

pub struct MockMembershipRepo {
    pub rows: Arc<Mutex<HashSet<(i64, i64)>>>,
}

impl MockMembershipRepo {
    pub fn empty() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn rows_handle(&self) -> Arc<Mutex<HashSet<(i64, i64)>>> {
        Arc::clone(&self.rows)
    }
}

impl MembershipRepository for MockMembershipRepo {
    async fn add(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        Ok(self.rows.lock().unwrap().insert((user_id, recipe_id)))
    }

    async fn remove(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        Ok(self.rows.lock().unwrap().remove(&(user_id, recipe_id)))
    }

    async fn contains(&self, user_id: i64, recipe_id: i64) -> Result<bool, ApiServiceError> {
        Ok(self.rows.lock().unwrap().contains(&(user_id, recipe_id)))
    }
}

// ── MockSubscriptionRepo ─────────────────────────────────────────────────────

pub struct MockSubscriptionRepo {
    pub edges: Arc<Mutex<HashSet<(i64, i64)>>>,
    pub authors: Vec<User>,
}

impl MockSubscriptionRepo {
    pub fn new(edges: Vec<(i64, i64)>, authors: Vec<User>) -> Self {
        Self {
            edges: Arc::new(Mutex::new(edges.into_iter().collect())),
            authors,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], vec![])
    }
}

impl SubscriptionRepository for MockSubscriptionRepo {
    async fn follow(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError> {
        Ok(self.edges.lock().unwrap().insert((user_id, author_id)))
    }

    async fn unfollow(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError> {
        Ok(self.edges.lock().unwrap().remove(&(user_id, author_id)))
    }

    async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool, ApiServiceError> {
        Ok(self.edges.lock().unwrap().contains(&(user_id, author_id)))
    }

    async fn list_authors(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> Result<Paginated<User>, ApiServiceError> {
        let edges = self.edges.lock().unwrap();
        let followed: Vec<User> = self
            .authors
            .iter()
            .filter(|a| edges.contains(&(user_id, a.id)))
            .cloned()
            .collect();
        Ok(Paginated {
            count: followed.len() as u64,
            items: followed
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .collect(),
        })
    }
}

// ── MockShoppingListSource ───────────────────────────────────────────────────

/// Ingredient lines per recipe plus a cart set; aggregates the way the
/// production query does (group by name+unit, sum, name ascending).
pub struct MockShoppingListSource {
    pub cart: HashSet<(i64, i64)>,
    pub recipe_lines: Vec<(i64, &'static str, &'static str, i64)>,
}

impl ShoppingListSource for MockShoppingListSource {
    async fn aggregate(&self, user_id: i64) -> Result<Vec<ShoppingListItem>, ApiServiceError> {
        let mut totals: HashMap<(&str, &str), i64> = HashMap::new();
        for &(recipe_id, name, unit, amount) in &self.recipe_lines {
            if self.cart.contains(&(user_id, recipe_id)) {
                *totals.entry((name, unit)).or_default() += amount;
            }
        }
        let mut items: Vec<ShoppingListItem> = totals
            .into_iter()
            .map(|((name, unit), total)| ShoppingListItem {
                name: name.to_owned(),
                measurement_unit: unit.to_owned(),
                total_amount: total,
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

// ── MockImageStore / FakePassword ────────────────────────────────────────────

#[derive(Default)]
pub struct MockImageStore {
    pub stored: Arc<Mutex<Vec<String>>>,
    pub removed: Arc<Mutex<Vec<String>>>,
}

impl ImageStore for MockImageStore {
    async fn store(&self, dir: &str, ext: &str, _data: &[u8]) -> Result<String, ApiServiceError> {
        let n = self.stored.lock().unwrap().len();
        let path = format!("{dir}/img{n}.{ext}");
        self.stored.lock().unwrap().push(path.clone());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> Result<(), ApiServiceError> {
        self.removed.lock().unwrap().push(path.to_owned());
        Ok(())
    }
}

pub struct FakePassword;

impl PasswordPort for FakePassword {
    fn hash(&self, password: &str) -> Result<String, ApiServiceError> {
        Ok(format!("hash:{password}"))
    }

    fn verify(&self, password: &str, password_hash: &str) -> bool {
        password_hash == format!("hash:{password}")
    }
}

// ── Test fixtures ────────────────────────────────────────────────────────────

pub fn test_user(id: i64) -> User {
    User {
        id,
        email: format!("user{id}@example.com"),
        username: format!("user{id}"),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        password_hash: "hash:correct-horse".to_owned(),
        avatar: None,
        created_at: Utc::now(),
    }
}

pub fn test_recipe(id: i64, author_id: i64) -> Recipe {
    Recipe {
        id,
        author_id,
        name: format!("Recipe {id}"),
        text: "Combine and cook.".to_owned(),
        image: format!("recipes/images/{id}.png"),
        cooking_time: 30,
        created_at: Utc::now(),
    }
}
