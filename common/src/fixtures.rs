//! Deterministic seed data. The same seed always yields the same catalog
//! positions and the same stream of orders.

use crate::config::SimulationConfig;
use crate::constants::COORDINATE_SCALE;
use crate::messages::CreateOrder;
use crate::types::catalog::{Catalog, Driver, Product, Store};
use crate::types::dtos::{LineItem, Order, total_units};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const PRODUCTS: [(&str, &str, &str, u32); 8] = [
    ("margherita", "Margherita", "pizza", 1150),
    ("fugazzeta", "Fugazzeta", "pizza", 1300),
    ("napolitana", "Napolitana", "pizza", 1250),
    ("empanada-carne", "Empanada de carne", "empanadas", 320),
    ("empanada-jyq", "Empanada jamón y queso", "empanadas", 300),
    ("faina", "Fainá", "sides", 450),
    ("flan", "Flan casero", "desserts", 600),
    ("soda", "Soda 1.5L", "drinks", 350),
];

const STORES: [(&str, &str); 3] = [
    ("store-centro", "Pedidos Centro"),
    ("store-palermo", "Pedidos Palermo"),
    ("store-boedo", "Pedidos Boedo"),
];

const DRIVERS: [(&str, &str, &str); 4] = [
    ("driver-ana", "Ana", "bike"),
    ("driver-bruno", "Bruno", "scooter"),
    ("driver-carla", "Carla", "car"),
    ("driver-dario", "Darío", "bike"),
];

fn random_position(rng: &mut StdRng) -> (f32, f32) {
    (
        (rng.r#gen::<f32>() * COORDINATE_SCALE).round(),
        (rng.r#gen::<f32>() * COORDINATE_SCALE).round(),
    )
}

/// Catalog built from the default seed.
pub fn catalog() -> Catalog {
    seeded_catalog(crate::constants::DEFAULT_FIXTURE_SEED)
}

pub fn seeded_catalog(seed: u64) -> Catalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let products = PRODUCTS
        .iter()
        .map(|(id, name, category, price_cents)| Product {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price_cents: *price_cents,
            available: true,
        })
        .collect();
    let stores = STORES
        .iter()
        .map(|(id, name)| Store {
            id: id.to_string(),
            name: name.to_string(),
            position: random_position(&mut rng),
            open: true,
        })
        .collect();
    let drivers = DRIVERS
        .iter()
        .map(|(id, name, vehicle)| Driver {
            id: id.to_string(),
            name: name.to_string(),
            vehicle: vehicle.to_string(),
            position: random_position(&mut rng),
            rating: (rng.gen_range(35..=50) as f32) / 10.0,
        })
        .collect();
    Catalog {
        products,
        stores,
        drivers,
    }
}

/// Endless, reproducible stream of incoming orders.
pub struct OrderGenerator {
    rng: StdRng,
    catalog: Catalog,
    next_order_id: u64,
}

impl OrderGenerator {
    pub fn new(seed: u64, catalog: Catalog) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            catalog,
            next_order_id: 1,
        }
    }

    /// Random position a client orders from.
    pub fn client_position(&mut self) -> (f32, f32) {
        random_position(&mut self.rng)
    }

    /// Next incoming checkout.
    pub fn next_request(&mut self) -> CreateOrder {
        let item_count = self.rng.gen_range(1..=3);
        let picked: Vec<String> = self
            .catalog
            .products
            .choose_multiple(&mut self.rng, item_count)
            .map(|product| product.id.clone())
            .collect();
        let items: Vec<LineItem> = picked
            .into_iter()
            .map(|product_id| LineItem {
                product_id,
                quantity: self.rng.gen_range(1..=3),
            })
            .collect();
        let store_id = self
            .catalog
            .stores
            .choose(&mut self.rng)
            .map(|store| store.id.clone())
            .unwrap_or_default();
        CreateOrder {
            client_id: format!("client-{}", self.rng.gen_range(1..=20)),
            store_id,
            items,
            priority: self.rng.gen_bool(0.2),
        }
    }

    /// Next incoming order, numbered by the generator itself.
    pub fn next_order(&mut self, config: &SimulationConfig) -> Order {
        let request = self.next_request();
        let order_id = self.next_order_id;
        self.next_order_id += 1;
        order_from_request(order_id, request, config)
    }
}

/// Builds the pending order a checkout request describes.
pub fn order_from_request(order_id: u64, request: CreateOrder, config: &SimulationConfig) -> Order {
    let units = total_units(&request.items).unwrap_or(u32::MAX);
    Order::new(
        order_id,
        request.client_id,
        request.store_id,
        request.items,
        request.priority,
        config.bake_time(units),
    )
}

pub fn generate_orders(seed: u64, count: usize, config: &SimulationConfig) -> Vec<Order> {
    let mut generator = OrderGenerator::new(seed, seeded_catalog(seed));
    (0..count).map(|_| generator.next_order(config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::kitchen_status::KitchenStatus;

    #[test]
    fn same_seed_same_orders() {
        let config = SimulationConfig::default();
        let first = generate_orders(7, 5, &config);
        let second = generate_orders(7, 5, &config);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.order_id, b.order_id);
            assert_eq!(a.items, b.items);
            assert_eq!(a.store_id, b.store_id);
            assert_eq!(a.priority, b.priority);
        }
    }

    #[test]
    fn generated_orders_start_pending_with_sequential_ids() {
        let orders = generate_orders(1, 4, &SimulationConfig::default());
        let ids: Vec<u64> = orders.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(orders.iter().all(|o| o.status == KitchenStatus::Pending));
        assert!(orders.iter().all(|o| !o.items.is_empty()));
    }

    #[test]
    fn oversized_requests_still_build_an_order() {
        let config = SimulationConfig::default();
        let request = CreateOrder {
            client_id: "client-1".to_string(),
            store_id: "store-centro".to_string(),
            items: vec![
                LineItem::new("faina", u32::MAX).unwrap(),
                LineItem::new("soda", 1).unwrap(),
            ],
            priority: false,
        };
        let order = order_from_request(1, request, &config);
        assert_eq!(order.unit_count(), u32::MAX);
        assert_eq!(order.bake_time, config.max_oven_time);
    }

    #[test]
    fn generated_items_exist_in_the_catalog() {
        let catalog = seeded_catalog(3);
        let mut generator = OrderGenerator::new(3, catalog.clone());
        let order = generator.next_order(&SimulationConfig::default());
        assert!(order.items.iter().all(|i| catalog.product(&i.product_id).is_some()));
        assert!(catalog.store(&order.store_id).is_some());
    }

    #[test]
    fn catalog_positions_are_on_the_map() {
        let catalog = catalog();
        assert_eq!(catalog.drivers.len(), DRIVERS.len());
        for driver in &catalog.drivers {
            assert!((0.0..=COORDINATE_SCALE).contains(&driver.position.0));
            assert!((3.5..=5.0).contains(&driver.rating));
        }
        assert_eq!(catalog.categories()[0], "pizza");
    }
}
