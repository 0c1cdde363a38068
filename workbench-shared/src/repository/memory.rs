//! In-memory repositories
//!
//! [`MemoryStore<T>`] keeps rows in insertion order behind a `tokio` lock and
//! evaluates filters with the same semantics as the SQL renderer:
//!
//! - NULL fails every condition
//! - ascending sorts put NULLs last, descending sorts put them first
//! - unique keys (user email, product SKU) are enforced among live rows only
//!
//! Foreign keys are not checked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Product, ProductFilter, Project, ProjectFilter, ProjectItem, ProjectItemFilter, User,
    UserFilter,
};
use crate::query::{Filter, Pagination, SortKey, Value};
use crate::repository::{
    ProductRepository, ProjectItemRepository, ProjectRepository, RepositoryError,
    RepositoryResult, UserRepository,
};

/// A row the memory store can hold
pub trait Record: Clone + Send + Sync + 'static {
    /// Name used in `NotFound` errors
    const RESOURCE: &'static str;

    fn id(&self) -> Uuid;

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_deleted_at(&mut self, at: DateTime<Utc>);

    /// Column lookup: `None` for an unknown column, `Some(None)` for NULL
    fn column(&self, name: &str) -> Option<Option<Value>>;

    /// Constraint name and key for a unique column, if the type has one
    fn unique_key(&self) -> Option<(&'static str, String)> {
        None
    }

    /// Copies the fields an `update` is allowed to write
    fn apply_update(&mut self, update: &Self);
}

/// Generic in-memory table
#[derive(Debug)]
pub struct MemoryStore<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

fn not_found<T: Record>() -> RepositoryError {
    RepositoryError::NotFound {
        resource: T::RESOURCE,
    }
}

fn unknown_column(name: &str) -> RepositoryError {
    RepositoryError::Database(sqlx::Error::ColumnNotFound(name.to_string()))
}

/// Orders two optional values; NULL sorts as the largest value
fn compare_nullable(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(rows: &[T], candidate: &T) -> RepositoryResult<()> {
        let Some((constraint, key)) = candidate.unique_key() else {
            return Ok(());
        };

        let taken = rows.iter().any(|row| {
            row.id() != candidate.id()
                && row.deleted_at().is_none()
                && row.unique_key().map(|(_, k)| k) == Some(key.clone())
        });

        if taken {
            return Err(RepositoryError::Conflict {
                constraint: constraint.to_string(),
            });
        }
        Ok(())
    }

    pub async fn insert(&self, record: &T) -> RepositoryResult<T> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|row| row.id() == record.id()) {
            return Err(RepositoryError::Conflict {
                constraint: "primary key".to_string(),
            });
        }
        Self::check_unique(&rows, record)?;

        rows.push(record.clone());
        Ok(record.clone())
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<T> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id() == id && row.deleted_at().is_none())
            .cloned()
            .ok_or_else(not_found::<T>)
    }

    /// First live row matching `predicate`
    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.deleted_at().is_none() && predicate(row))
            .cloned()
    }

    /// Filter, sort and page the live rows
    pub async fn select(&self, filter: &impl Filter, page: &Pagination) -> RepositoryResult<Vec<T>> {
        let keys = page.sort_keys()?;
        let conditions = filter.conditions();

        let rows = self.rows.read().await;
        let mut selected = Vec::new();
        for row in rows.iter().filter(|row| row.deleted_at().is_none()) {
            let mut keep = true;
            for condition in &conditions {
                let value = row
                    .column(condition.column())
                    .ok_or_else(|| unknown_column(condition.column()))?;
                if !condition.matches(value.as_ref()) {
                    keep = false;
                    break;
                }
            }
            if keep {
                selected.push(row.clone());
            }
        }
        drop(rows);

        sort_rows(&mut selected, &keys)?;

        let offset = page.effective_offset();
        let limit = page.effective_limit().unwrap_or(usize::MAX);
        Ok(selected.into_iter().skip(offset).take(limit).collect())
    }

    /// Live rows whose `column` equals `value`, newest first
    pub async fn select_where(&self, column: &str, value: Value) -> RepositoryResult<Vec<T>> {
        let rows = self.rows.read().await;
        let mut selected = Vec::new();
        for row in rows.iter().filter(|row| row.deleted_at().is_none()) {
            let actual = row.column(column).ok_or_else(|| unknown_column(column))?;
            if actual.and_then(|v| v.compare(&value)) == Some(Ordering::Equal) {
                selected.push(row.clone());
            }
        }
        drop(rows);

        sort_rows(
            &mut selected,
            &[SortKey {
                column: "created_at".to_string(),
                descending: true,
            }],
        )?;
        Ok(selected)
    }

    pub async fn replace(&self, record: &T) -> RepositoryResult<T> {
        let mut rows = self.rows.write().await;
        Self::check_unique(&rows, record)?;

        let row = rows
            .iter_mut()
            .find(|row| row.id() == record.id() && row.deleted_at().is_none())
            .ok_or_else(not_found::<T>)?;
        row.apply_update(record);
        Ok(row.clone())
    }

    /// Applies `mutate` to a live row; `mutate` returns false to abort
    pub async fn modify(&self, id: Uuid, mutate: impl FnOnce(&mut T) -> bool) -> Option<T> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id && row.deleted_at().is_none())?;

        let mut draft = row.clone();
        if !mutate(&mut draft) {
            return None;
        }
        *row = draft;
        Some(row.clone())
    }

    pub async fn soft_delete(&self, id: Uuid) {
        let mut rows = self.rows.write().await;
        if let Some(row) = rows
            .iter_mut()
            .find(|row| row.id() == id && row.deleted_at().is_none())
        {
            row.set_deleted_at(Utc::now());
        }
    }
}

fn sort_rows<T: Record>(rows: &mut [T], keys: &[SortKey]) -> RepositoryResult<()> {
    if keys.is_empty() {
        return Ok(());
    }

    if let Some(row) = rows.first() {
        if let Some(key) = keys.iter().find(|key| row.column(&key.column).is_none()) {
            return Err(unknown_column(&key.column));
        }
    }

    rows.sort_by(|a, b| {
        for key in keys {
            let va = a.column(&key.column).flatten();
            let vb = b.column(&key.column).flatten();
            let ordering = compare_nullable(&va, &vb);
            let ordering = if key.descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
    Ok(())
}

impl Record for User {
    const RESOURCE: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    fn column(&self, name: &str) -> Option<Option<Value>> {
        let value = match name {
            "id" => Value::from(self.id),
            "name" => Value::from(self.name.as_str()),
            "email" => Value::from(self.email.as_str()),
            "created_at" => Value::from(self.created_at),
            "updated_at" => Value::from(self.updated_at),
            "deleted_at" => return Some(self.deleted_at.map(Value::from)),
            _ => return None,
        };
        Some(Some(value))
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("users_email_live_key", self.email.clone()))
    }

    fn apply_update(&mut self, update: &Self) {
        self.name = update.name.clone();
        self.email = update.email.clone();
        self.password_hash = update.password_hash.clone();
        self.updated_at = update.updated_at;
    }
}

impl Record for Product {
    const RESOURCE: &'static str = "product";

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    fn column(&self, name: &str) -> Option<Option<Value>> {
        let value = match name {
            "id" => Value::from(self.id),
            "name" => Value::from(self.name.as_str()),
            "description" => Value::from(self.description.as_str()),
            "price" => Value::from(self.price),
            "stock" => Value::from(self.stock),
            "category" => Value::from(self.category.as_str()),
            "sku" => Value::from(self.sku.as_str()),
            "created_at" => Value::from(self.created_at),
            "updated_at" => Value::from(self.updated_at),
            "deleted_at" => return Some(self.deleted_at.map(Value::from)),
            _ => return None,
        };
        Some(Some(value))
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("products_sku_live_key", self.sku.clone()))
    }

    // Stock is left alone
    fn apply_update(&mut self, update: &Self) {
        self.name = update.name.clone();
        self.description = update.description.clone();
        self.price = update.price;
        self.category = update.category.clone();
        self.sku = update.sku.clone();
        self.updated_at = update.updated_at;
    }
}

impl Record for Project {
    const RESOURCE: &'static str = "project";

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    fn column(&self, name: &str) -> Option<Option<Value>> {
        Some(match name {
            "id" => Some(Value::from(self.id)),
            "name" => Some(Value::from(self.name.as_str())),
            "description" => Some(Value::from(self.description.as_str())),
            "status" => Some(Value::from(self.status.as_str())),
            "start_date" => self.start_date.map(Value::from),
            "end_date" => self.end_date.map(Value::from),
            "budget" => self.budget.map(Value::from),
            "owner_id" => Some(Value::from(self.owner_id)),
            "created_at" => Some(Value::from(self.created_at)),
            "updated_at" => Some(Value::from(self.updated_at)),
            "deleted_at" => self.deleted_at.map(Value::from),
            _ => return None,
        })
    }

    fn apply_update(&mut self, update: &Self) {
        let (created_at, deleted_at) = (self.created_at, self.deleted_at);
        *self = update.clone();
        self.created_at = created_at;
        self.deleted_at = deleted_at;
    }
}

impl Record for ProjectItem {
    const RESOURCE: &'static str = "project item";

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    fn column(&self, name: &str) -> Option<Option<Value>> {
        Some(match name {
            "id" => Some(Value::from(self.id)),
            "project_id" => Some(Value::from(self.project_id)),
            "name" => Some(Value::from(self.name.as_str())),
            "description" => Some(Value::from(self.description.as_str())),
            "status" => Some(Value::from(self.status.as_str())),
            "priority" => Some(Value::from(self.priority.as_str())),
            "estimated_hours" => self.estimated_hours.map(Value::from),
            "actual_hours" => self.actual_hours.map(Value::from),
            "due_date" => self.due_date.map(Value::from),
            "assigned_to" => self.assigned_to.map(Value::from),
            "created_at" => Some(Value::from(self.created_at)),
            "updated_at" => Some(Value::from(self.updated_at)),
            "deleted_at" => self.deleted_at.map(Value::from),
            _ => return None,
        })
    }

    fn apply_update(&mut self, update: &Self) {
        let (created_at, deleted_at) = (self.created_at, self.deleted_at);
        *self = update.clone();
        self.created_at = created_at;
        self.deleted_at = deleted_at;
    }
}

#[async_trait]
impl UserRepository for MemoryStore<User> {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        self.insert(user).await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<User> {
        self.get(id).await
    }

    async fn list(&self, filter: &UserFilter, page: &Pagination) -> RepositoryResult<Vec<User>> {
        self.select(filter, page).await
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        self.replace(user).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.soft_delete(id).await;
        Ok(())
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.find(|user| user.email == email).await)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore<Product> {
    async fn create(&self, product: &Product) -> RepositoryResult<Product> {
        self.insert(product).await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Product> {
        self.get(id).await
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<Product>> {
        self.select(filter, page).await
    }

    async fn update(&self, product: &Product) -> RepositoryResult<Product> {
        self.replace(product).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.soft_delete(id).await;
        Ok(())
    }

    async fn get_by_sku(&self, sku: &str) -> RepositoryResult<Option<Product>> {
        Ok(self.find(|product| product.sku == sku).await)
    }

    async fn update_stock(&self, id: Uuid, stock: i32) -> RepositoryResult<Product> {
        self.modify(id, |product| {
            product.stock = stock;
            product.updated_at = Utc::now();
            true
        })
        .await
        .ok_or_else(not_found::<Product>)
    }

    async fn adjust_stock(&self, id: Uuid, delta: i32) -> RepositoryResult<Option<Product>> {
        Ok(self
            .modify(id, |product| match product.stock.checked_add(delta) {
                Some(stock) if stock >= 0 => {
                    product.stock = stock;
                    product.updated_at = Utc::now();
                    true
                }
                _ => false,
            })
            .await)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore<Project> {
    async fn create(&self, project: &Project) -> RepositoryResult<Project> {
        self.insert(project).await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Project> {
        self.get(id).await
    }

    async fn list(
        &self,
        filter: &ProjectFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<Project>> {
        self.select(filter, page).await
    }

    async fn update(&self, project: &Project) -> RepositoryResult<Project> {
        self.replace(project).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.soft_delete(id).await;
        Ok(())
    }

    async fn get_by_owner_id(&self, owner_id: Uuid) -> RepositoryResult<Vec<Project>> {
        self.select_where("owner_id", Value::from(owner_id)).await
    }
}

#[async_trait]
impl ProjectItemRepository for MemoryStore<ProjectItem> {
    async fn create(&self, item: &ProjectItem) -> RepositoryResult<ProjectItem> {
        self.insert(item).await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<ProjectItem> {
        self.get(id).await
    }

    async fn list(
        &self,
        filter: &ProjectItemFilter,
        page: &Pagination,
    ) -> RepositoryResult<Vec<ProjectItem>> {
        self.select(filter, page).await
    }

    async fn update(&self, item: &ProjectItem) -> RepositoryResult<ProjectItem> {
        self.replace(item).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.soft_delete(id).await;
        Ok(())
    }

    async fn get_by_project_id(&self, project_id: Uuid) -> RepositoryResult<Vec<ProjectItem>> {
        self.select_where("project_id", Value::from(project_id)).await
    }

    async fn get_by_assigned_to(&self, user_id: Uuid) -> RepositoryResult<Vec<ProjectItem>> {
        self.select_where("assigned_to", Value::from(user_id)).await
    }
}
