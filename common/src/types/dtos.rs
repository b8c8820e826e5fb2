use crate::errors::FlowError;
use crate::types::catalog::Catalog;
use crate::types::checklist::QualityChecklist;
use crate::types::delivery_status::DeliveryStatus;
use crate::types::kitchen_status::KitchenStatus;
use crate::types::status_flow::StatusFlow;
use crate::utils::{calculate_distance, estimate_eta_minutes};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// ID del producto en el catálogo.
    pub product_id: String,
    /// Cantidad pedida, al menos 1.
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Result<Self, FlowError> {
        if quantity == 0 {
            return Err(FlowError::InvalidQuantity);
        }
        Ok(Self {
            product_id: product_id.into(),
            quantity,
        })
    }
}

/// Units across `items`, or `None` when the sum does not fit a `u32`.
pub fn total_units(items: &[LineItem]) -> Option<u32> {
    items
        .iter()
        .try_fold(0u32, |units, item| units.checked_add(item.quantity))
}

/// Moment an order reached one of its statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusStamp {
    pub status: KitchenStatus,
    pub at: SystemTime,
}

/// What the caller has to do after a successful kitchen transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    None,
    /// The order just went into the oven.
    StartOvenTimer(Duration),
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// ID de la orden.
    pub order_id: u64,
    /// ID del cliente asociado a la orden.
    pub client_id: String,
    /// ID del local que prepara la orden.
    pub store_id: String,
    pub items: Vec<LineItem>,
    pub status: KitchenStatus,
    /// Una marca por cada estado alcanzado, empezando por la creación.
    pub status_history: Vec<StatusStamp>,
    /// Las órdenes prioritarias se atienden primero.
    pub priority: bool,
    pub checklist: QualityChecklist,
    /// Tiempo de horno.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub bake_time: Duration,
    pub notes: Option<String>,
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl Eq for Order {}

impl Order {
    pub fn new(
        order_id: u64,
        client_id: impl Into<String>,
        store_id: impl Into<String>,
        items: Vec<LineItem>,
        priority: bool,
        bake_time: Duration,
    ) -> Self {
        let status = KitchenStatus::initial();
        Self {
            order_id,
            client_id: client_id.into(),
            store_id: store_id.into(),
            items,
            status,
            status_history: vec![StatusStamp {
                status,
                at: SystemTime::now(),
            }],
            priority,
            checklist: QualityChecklist::default(),
            bake_time,
            notes: None,
        }
    }

    pub fn created_at(&self) -> SystemTime {
        self.status_history
            .first()
            .map(|stamp| stamp.at)
            .unwrap_or(SystemTime::UNIX_EPOCH)
    }

    /// When the order reached `status`, if it ever did.
    pub fn reached_at(&self, status: KitchenStatus) -> Option<SystemTime> {
        self.status_history
            .iter()
            .find(|stamp| stamp.status == status)
            .map(|stamp| stamp.at)
    }

    pub fn unit_count(&self) -> u32 {
        total_units(&self.items).unwrap_or(u32::MAX)
    }

    /// Price of the whole order. Items missing from the catalog count as zero.
    pub fn total_cents(&self, catalog: &Catalog) -> u64 {
        self.items
            .iter()
            .filter_map(|item| {
                catalog
                    .product(&item.product_id)
                    .map(|product| product.price_cents as u64 * item.quantity as u64)
            })
            .sum()
    }

    /// Moves the order one step forward.
    ///
    /// Only the adjacent next status is accepted. Leaving `quality_check`
    /// additionally needs every check ticked.
    pub fn advance(&mut self, target: KitchenStatus) -> Result<TransitionEffect, FlowError> {
        self.status.check_advance(target)?;
        if target == KitchenStatus::Ready && !self.checklist.is_complete() {
            return Err(FlowError::ChecklistIncomplete {
                missing: self.checklist.missing(),
            });
        }

        self.status = target;
        self.status_history.push(StatusStamp {
            status: target,
            at: SystemTime::now(),
        });

        Ok(match target {
            KitchenStatus::Baking => TransitionEffect::StartOvenTimer(self.bake_time),
            _ => TransitionEffect::None,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.status == KitchenStatus::Ready
    }
}

/// Evidence captured at the door.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofOfDelivery {
    pub capture_id: Uuid,
    pub photo: Option<String>,
    pub signature: Option<String>,
    pub confirmed_at: SystemTime,
}

impl ProofOfDelivery {
    pub fn new(photo: Option<String>, signature: Option<String>) -> Self {
        Self {
            capture_id: Uuid::new_v4(),
            photo,
            signature,
            confirmed_at: SystemTime::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(None, None)
    }
}

/// Emitted once per task, when the driver confirms the delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryCompleted {
    pub order_id: u64,
    pub driver_id: String,
    pub proof: ProofOfDelivery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryTask {
    pub order: Order,
    pub driver_id: String,
    pub status: DeliveryStatus,
    /// Posición del cliente que realizó la orden.
    pub client_position: (f32, f32),
    pub distance_remaining_km: f32,
    pub eta_minutes: u32,
    pub proof: Option<ProofOfDelivery>,
    pub time_stamp: SystemTime,
}

impl DeliveryTask {
    pub fn new(
        order: Order,
        driver_id: impl Into<String>,
        driver_position: (f32, f32),
        client_position: (f32, f32),
    ) -> Self {
        let distance = calculate_distance(driver_position, client_position);
        Self {
            order,
            driver_id: driver_id.into(),
            status: DeliveryStatus::initial(),
            client_position,
            distance_remaining_km: distance,
            eta_minutes: estimate_eta_minutes(distance),
            proof: None,
            time_stamp: SystemTime::now(),
        }
    }

    pub fn order_id(&self) -> u64 {
        self.order.order_id
    }

    pub fn is_confirmed(&self) -> bool {
        self.proof.is_some()
    }

    pub fn advance(&mut self, target: DeliveryStatus) -> Result<(), FlowError> {
        if self.is_confirmed() {
            return Err(FlowError::AlreadyConfirmed(self.order_id()));
        }
        self.status.check_advance(target)?;
        self.status = target;
        if target == DeliveryStatus::Arrived {
            self.distance_remaining_km = 0.0;
            self.eta_minutes = 0;
        }
        self.time_stamp = SystemTime::now();
        Ok(())
    }

    /// Records driven distance and refreshes the ETA. Returns whether the
    /// driver is now at the client's position.
    pub fn record_progress(&mut self, km: f32) -> bool {
        self.distance_remaining_km = (self.distance_remaining_km - km).max(0.0);
        self.eta_minutes = estimate_eta_minutes(self.distance_remaining_km);
        self.time_stamp = SystemTime::now();
        self.distance_remaining_km <= f32::EPSILON
    }

    /// Closes the task. Succeeds exactly once, and only after arriving.
    pub fn confirm(&mut self, proof: ProofOfDelivery) -> Result<DeliveryCompleted, FlowError> {
        if self.is_confirmed() {
            return Err(FlowError::AlreadyConfirmed(self.order_id()));
        }
        if self.status != DeliveryStatus::Arrived {
            return Err(FlowError::NotArrived(self.order_id()));
        }
        self.proof = Some(proof.clone());
        self.time_stamp = SystemTime::now();
        Ok(DeliveryCompleted {
            order_id: self.order_id(),
            driver_id: self.driver_id.clone(),
            proof,
        })
    }
}
