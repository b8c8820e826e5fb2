//! Plain-text screens for each role view.

use common::roles::{Cart, Role};
use common::types::catalog::Catalog;
use common::types::dtos::{DeliveryTask, Order};
use common::types::kitchen_status::KitchenStatus;
use common::utils::format_price;
use delivery::messages::DriverState;
use kitchen::messages::KitchenView;
use std::fmt::Write;

pub fn menu(catalog: &Catalog, category: Option<&str>) -> String {
    let mut out = String::new();
    let categories: Vec<&str> = match category {
        Some(category) => vec![category],
        None => catalog.categories(),
    };
    for category in categories {
        let _ = writeln!(out, "[{}]", category);
        for product in catalog.products_in(category) {
            let _ = writeln!(
                out,
                "  {:<16} {:<28} {:>8}",
                product.id,
                product.name,
                format_price(product.price_cents as u64)
            );
        }
    }
    if out.is_empty() {
        out.push_str("Nothing on the menu");
    }
    out
}

pub fn cart(cart: &Cart, catalog: &Catalog) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }
    let mut out = String::new();
    for item in &cart.items {
        let name = catalog
            .product(&item.product_id)
            .map(|p| p.name.as_str())
            .unwrap_or(item.product_id.as_str());
        let _ = writeln!(out, "  {} x {}", item.quantity, name);
    }
    let _ = write!(out, "Total: {}", format_price(cart.total_cents(catalog)));
    out
}

pub fn order_line(order: &Order, catalog: &Catalog) -> String {
    format!(
        "#{:<4} {:<14} {:<14} {:<13} {:>3} units {:>9}{}",
        order.order_id,
        order.store_id,
        order.client_id,
        order.status,
        order.unit_count(),
        format_price(order.total_cents(catalog)),
        if order.priority { "  PRIORITY" } else { "" }
    )
}

pub fn orders(orders: &[Order], catalog: &Catalog) -> String {
    if orders.is_empty() {
        return "No orders".to_string();
    }
    orders
        .iter()
        .map(|order| order_line(order, catalog))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn kitchen(view: &KitchenView, catalog: &Catalog) -> String {
    if view.queue.is_empty() {
        return "Kitchen queue is empty".to_string();
    }
    let mut out = String::new();
    for order in &view.queue {
        let _ = write!(out, "{}", order_line(order, catalog));
        if let Some(remaining) = view.oven_remaining(order.order_id) {
            let _ = write!(out, "  oven {}s", remaining.as_secs());
        }
        let missing = order.checklist.missing();
        if !missing.is_empty() && order.status == KitchenStatus::QualityCheck {
            let _ = write!(out, "  missing: {}", missing.join(", "));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn task(task: &DeliveryTask) -> String {
    format!(
        "#{} {} for {}: {:.1} km left, ETA {} min{}",
        task.order_id(),
        task.status,
        task.order.client_id,
        task.distance_remaining_km,
        task.eta_minutes,
        if task.is_confirmed() { ", delivered" } else { "" }
    )
}

pub fn driver(state: &DriverState) -> String {
    format!(
        "{} {} at ({:.1}, {:.1}), current order: {}, delivered: {}",
        state.driver_id,
        if state.online { "online" } else { "offline" },
        state.position.0,
        state.position.1,
        state
            .current_order
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "none".to_string()),
        state.completed.len()
    )
}

pub fn help(role: Role) -> String {
    let commands: &[&str] = match role {
        Role::Visitor => &["menu [category]"],
        Role::Client => &[
            "menu [category]",
            "add <product> [qty]",
            "remove <product>",
            "cart",
            "checkout <store> [priority]",
            "track [order]",
        ],
        Role::Admin => &["orders [status]", "track <order>", "assign <order> <driver>"],
        Role::StoreManager => &["orders [status]", "assign <order> <driver>"],
        Role::Delivery => &["status", "online", "offline", "drive", "confirm [photo] [signature]"],
        Role::Kitchen => &["queue", "next <order>", "check <order> <item>"],
    };
    format!(
        "You are at {} ({}). Commands: {}, go <path>, help, quit",
        role.path(),
        role,
        commands.join(", ")
    )
}
