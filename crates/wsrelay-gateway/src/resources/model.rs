//! Resource records and their input schemas.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use wsrelay_core::error::{Result, WsRelayError};
use wsrelay_core::protocol::ResourceKind;

use super::store::{ResourceStore, Stores};

const MAX_NAME_CHARS: usize = 100;

/// Input schema check, run before the store is touched.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// A record kind served by the generic CRUD routes.
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;

    const KIND: ResourceKind;
    /// Whether mutations of this kind are broadcast to connected clients.
    const ANNOUNCE: bool;

    fn id(&self) -> u64;
    /// Human-readable name used in mutation notices.
    fn label(&self) -> &str;
    fn from_create(id: u64, input: Self::Create) -> Self;
    /// Apply the fields present in `patch`.
    fn apply(&mut self, patch: Self::Update);
    fn store(stores: &Stores) -> &dyn ResourceStore<Self>;
}

fn check_name(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WsRelayError::BadRequest(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(WsRelayError::BadRequest(format!(
            "{field} must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(WsRelayError::BadRequest("price must be a non-negative number".into()));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(WsRelayError::BadRequest(format!("invalid email: {email}"))),
    }
}

// --------------------
// Category
// --------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Validate for CategoryCreate {
    fn validate(&self) -> Result<()> {
        check_name("name", &self.name)
    }
}

impl Validate for CategoryUpdate {
    fn validate(&self) -> Result<()> {
        self.name.as_deref().map_or(Ok(()), |n| check_name("name", n))
    }
}

impl Resource for Category {
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    const KIND: ResourceKind = ResourceKind::Category;
    const ANNOUNCE: bool = true;

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn from_create(id: u64, input: CategoryCreate) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
        }
    }

    fn apply(&mut self, patch: CategoryUpdate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }

    fn store(stores: &Stores) -> &dyn ResourceStore<Self> {
        stores.categories.as_ref()
    }
}

// --------------------
// Item
// --------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<u64>,
}

impl Validate for ItemCreate {
    fn validate(&self) -> Result<()> {
        check_name("name", &self.name)?;
        check_price(self.price)
    }
}

impl Validate for ItemUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            check_name("name", name)?;
        }
        self.price.map_or(Ok(()), check_price)
    }
}

impl Resource for Item {
    type Create = ItemCreate;
    type Update = ItemUpdate;
    const KIND: ResourceKind = ResourceKind::Item;
    const ANNOUNCE: bool = true;

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn from_create(id: u64, input: ItemCreate) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            category_id: input.category_id,
        }
    }

    fn apply(&mut self, patch: ItemUpdate) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = Some(category_id);
        }
    }

    fn store(stores: &Stores) -> &dyn ResourceStore<Self> {
        stores.items.as_ref()
    }
}

// --------------------
// User
// --------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Validate for UserCreate {
    fn validate(&self) -> Result<()> {
        check_name("username", &self.username)?;
        check_email(&self.email)
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(username) = &self.username {
            check_name("username", username)?;
        }
        self.email.as_deref().map_or(Ok(()), check_email)
    }
}

impl Resource for User {
    type Create = UserCreate;
    type Update = UserUpdate;
    const KIND: ResourceKind = ResourceKind::User;
    // User changes stay private to the HTTP caller.
    const ANNOUNCE: bool = false;

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.username
    }

    fn from_create(id: u64, input: UserCreate) -> Self {
        Self {
            id,
            username: input.username,
            email: input.email,
            full_name: input.full_name,
        }
    }

    fn apply(&mut self, patch: UserUpdate) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = Some(full_name);
        }
    }

    fn store(stores: &Stores) -> &dyn ResourceStore<Self> {
        stores.users.as_ref()
    }
}
