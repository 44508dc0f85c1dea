//! In-memory catalog store
//!
//! Holds the fixed product and user collections for the lifetime of the
//! process. The store is an owned value injected into whoever needs it
//! (route handlers, tests) rather than module-level state. Products are
//! read-only; users are append-only.

use parking_lot::RwLock;
use tracing::debug;

use crate::types::{NewUser, Product, ProductFilter, User, DEFAULT_ROLE};

/// Shared in-memory catalog. Cheap to wrap in an `Arc` and hand to
/// concurrent request handlers; user-id assignment happens under the
/// write lock so ids stay unique.
pub struct CatalogStore {
    products: Vec<Product>,
    users: RwLock<Vec<User>>,
}

impl CatalogStore {
    /// Create a store populated with the seed records
    pub fn new() -> Self {
        Self {
            products: seed_products(),
            users: RwLock::new(seed_users()),
        }
    }

    /// Products matching every supplied filter, in seed order.
    /// An empty result is a normal outcome, never an error.
    pub fn list_products(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// First product with the given id
    pub fn get_product(&self, id: u32) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    /// All users in insertion order
    pub fn list_users(&self) -> Vec<User> {
        self.users.read().clone()
    }

    /// First user with the given id
    pub fn get_user(&self, id: u32) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    /// Append a new user. The id is current count + 1, computed while the
    /// write lock is held. The role defaults to "user" when omitted.
    pub fn create_user(&self, new: NewUser) -> User {
        let mut users = self.users.write();
        let user = User {
            id: users.len() as u32 + 1,
            name: new.name,
            email: new.email,
            role: new.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        };
        users.push(user.clone());
        debug!("Created user {} ({})", user.id, user.email);
        user
    }

    /// Current number of users
    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_products() -> Vec<Product> {
    let records = [
        (1, "Notebook", 3500.00, "Electronics", true),
        (2, "Mouse", 50.00, "Accessories", true),
        (3, "Keyboard", 150.00, "Accessories", false),
        (4, "Monitor", 1200.00, "Electronics", true),
        (5, "Headset", 200.00, "Accessories", true),
    ];
    records
        .into_iter()
        .map(|(id, name, price, category, in_stock)| Product {
            id,
            name: name.to_string(),
            price,
            category: category.to_string(),
            in_stock,
        })
        .collect()
}

fn seed_users() -> Vec<User> {
    let records = [
        (1, "João Silva", "joao@example.com", "admin"),
        (2, "Maria Santos", "maria@example.com", "user"),
        (3, "Pedro Oliveira", "pedro@example.com", "user"),
        (4, "Ana Costa", "ana@example.com", "moderator"),
    ];
    records
        .into_iter()
        .map(|(id, name, email, role)| User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        })
        .collect()
}
