use serde::{Deserialize, Serialize};

/// Something a client can put in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Unit price in cents.
    pub price_cents: u32,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Store {
    pub id: String,
    pub name: String,
    /// Position on the map, in km.
    pub position: (f32, f32),
    pub open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub vehicle: String,
    pub position: (f32, f32),
    /// Average rating, 1.0 to 5.0.
    pub rating: f32,
}

/// Read-only reference data shared by every view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub stores: Vec<Store>,
    pub drivers: Vec<Driver>,
}

impl Catalog {
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn store(&self, id: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }

    pub fn driver(&self, id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    /// Available products of a category, in catalog order.
    pub fn products_in(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.available && p.category == category)
            .collect()
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }
}
