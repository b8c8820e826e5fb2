//! Role-keyed views. Every role owns its own local state; switching role
//! replaces the whole view, nothing is shared between them.

use crate::errors::FlowError;
use crate::messages::CreateOrder;
use crate::types::catalog::Catalog;
use crate::types::dtos::LineItem;
use crate::types::kitchen_status::KitchenStatus;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Visitor,
    Client,
    Admin,
    StoreManager,
    Delivery,
    Kitchen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    BrowseMenu,
    EditCart,
    Checkout,
    TrackOrder,
    ViewAllOrders,
    AssignDriver,
    AdvanceOrder,
    TickCheck,
    AdvanceDelivery,
    ConfirmDelivery,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Visitor,
        Role::Client,
        Role::Admin,
        Role::StoreManager,
        Role::Delivery,
        Role::Kitchen,
    ];

    pub const fn allowed_actions(self) -> &'static [Action] {
        match self {
            Role::Visitor => &[Action::BrowseMenu],
            Role::Client => &[
                Action::BrowseMenu,
                Action::EditCart,
                Action::Checkout,
                Action::TrackOrder,
            ],
            Role::Admin => &[
                Action::ViewAllOrders,
                Action::TrackOrder,
                Action::AssignDriver,
            ],
            Role::StoreManager => &[Action::ViewAllOrders, Action::AssignDriver],
            Role::Delivery => &[Action::AdvanceDelivery, Action::ConfirmDelivery],
            Role::Kitchen => &[Action::AdvanceOrder, Action::TickCheck],
        }
    }

    pub fn can(self, action: Action) -> bool {
        self.allowed_actions().contains(&action)
    }

    pub const fn path(self) -> &'static str {
        match self {
            Role::Visitor => "/",
            Role::Client => "/client",
            Role::Admin => "/admin",
            Role::StoreManager => "/store-manager",
            Role::Delivery => "/delivery",
            Role::Kitchen => "/kitchen",
        }
    }

    /// Maps a navigation path to the role mounted there. Sub-paths such as
    /// `/kitchen/orders/3` belong to their top-level role.
    pub fn from_path(path: &str) -> Result<Role, FlowError> {
        let trimmed = path.trim();
        let top = trimmed
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        match top {
            "" => Ok(Role::Visitor),
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            "store-manager" => Ok(Role::StoreManager),
            "delivery" => Ok(Role::Delivery),
            "kitchen" => Ok(Role::Kitchen),
            _ => Err(FlowError::UnknownRoute(trimmed.to_string())),
        }
    }

    /// Second path segment, naming the driver or store a view works for:
    /// `/delivery/driver-ana`, `/kitchen/store-centro`.
    pub fn scope_of(path: &str) -> Option<String> {
        path.trim()
            .trim_start_matches('/')
            .split('/')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Visitor => write!(f, "visitor"),
            Role::Client => write!(f, "client"),
            Role::Admin => write!(f, "admin"),
            Role::StoreManager => write!(f, "store manager"),
            Role::Delivery => write!(f, "delivery"),
            Role::Kitchen => write!(f, "kitchen"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Items a client collected before checking out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub items: Vec<LineItem>,
}

impl Cart {
    /// Adds `quantity` units, merging with an existing line of the same product.
    pub fn add(&mut self, catalog: &Catalog, product_id: &str, quantity: u32) -> Result<(), FlowError> {
        let product = catalog
            .product(product_id)
            .filter(|p| p.available)
            .ok_or_else(|| FlowError::UnknownProduct(product_id.to_string()))?;
        let line = LineItem::new(product.id.clone(), quantity)?;
        match self.items.iter_mut().find(|i| i.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(FlowError::InvalidQuantity)?
            }
            None => self.items.push(line),
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> Option<LineItem> {
        let index = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_cents(&self, catalog: &Catalog) -> u64 {
        self.items
            .iter()
            .filter_map(|item| {
                catalog
                    .product(&item.product_id)
                    .map(|p| p.price_cents as u64 * item.quantity as u64)
            })
            .sum()
    }

    /// Empties the cart into an order request.
    pub fn checkout(
        &mut self,
        client_id: &str,
        store_id: &str,
        priority: bool,
    ) -> Result<CreateOrder, FlowError> {
        if self.is_empty() {
            return Err(FlowError::EmptyCart);
        }
        Ok(CreateOrder {
            client_id: client_id.to_string(),
            store_id: store_id.to_string(),
            items: std::mem::take(&mut self.items),
            priority,
        })
    }
}

/// Local state of the view currently mounted.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleView {
    Visitor {
        category: Option<String>,
    },
    Client {
        cart: Cart,
        active_order: Option<u64>,
    },
    Admin {
        filter: Option<KitchenStatus>,
    },
    StoreManager {
        store_id: Option<String>,
        filter: Option<KitchenStatus>,
    },
    Delivery {
        driver_id: Option<String>,
        active_task: Option<u64>,
        online: bool,
    },
    Kitchen {
        store_id: Option<String>,
        selected_order: Option<u64>,
        filter: Option<KitchenStatus>,
    },
}

impl RoleView {
    /// Fresh state for `role`, scoped to a driver or store where it applies.
    pub fn mount(role: Role, scope: Option<String>) -> Self {
        match role {
            Role::Visitor => RoleView::Visitor { category: None },
            Role::Client => RoleView::Client {
                cart: Cart::default(),
                active_order: None,
            },
            Role::Admin => RoleView::Admin { filter: None },
            Role::StoreManager => RoleView::StoreManager {
                store_id: scope,
                filter: None,
            },
            Role::Delivery => RoleView::Delivery {
                driver_id: scope,
                active_task: None,
                online: true,
            },
            Role::Kitchen => RoleView::Kitchen {
                store_id: scope,
                selected_order: None,
                filter: None,
            },
        }
    }

    /// Driver or store the view is bound to.
    pub fn scope(&self) -> Option<String> {
        match self {
            RoleView::Delivery { driver_id, .. } => driver_id.clone(),
            RoleView::Kitchen { store_id, .. } | RoleView::StoreManager { store_id, .. } => {
                store_id.clone()
            }
            _ => None,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleView::Visitor { .. } => Role::Visitor,
            RoleView::Client { .. } => Role::Client,
            RoleView::Admin { .. } => Role::Admin,
            RoleView::StoreManager { .. } => Role::StoreManager,
            RoleView::Delivery { .. } => Role::Delivery,
            RoleView::Kitchen { .. } => Role::Kitchen,
        }
    }
}

/// Tagged-variant router: one mounted view at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    view: RoleView,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            view: RoleView::mount(Role::Visitor, None),
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts the view for `path`. Navigating within the current role keeps
    /// its state unless the path names another driver or store.
    pub fn navigate(&mut self, path: &str) -> Result<Role, FlowError> {
        let role = Role::from_path(path)?;
        let scope = match role {
            Role::Delivery | Role::Kitchen | Role::StoreManager => Role::scope_of(path),
            _ => None,
        };
        if role != self.view.role() || (scope.is_some() && scope != self.view.scope()) {
            self.view = RoleView::mount(role, scope);
        }
        Ok(role)
    }

    pub fn role(&self) -> Role {
        self.view.role()
    }

    pub fn view(&self) -> &RoleView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RoleView {
        &mut self.view
    }

    pub fn authorize(&self, action: Action) -> Result<(), FlowError> {
        let role = self.role();
        if role.can(action) {
            Ok(())
        } else {
            Err(FlowError::ActionNotAllowed {
                role: role.to_string(),
                action: action.to_string(),
            })
        }
    }
}
