use actix::prelude::*;
use colored::Color;
use common::assignments::Assignments;
use common::config::SimulationConfig;
use common::errors::FlowError;
use common::fixtures::order_from_request;
use common::logger::Logger;
use common::messages::{
    AdvanceDelivery, AdvanceOrder, AssignDriver, BoardEvent, BoardNotification, BoardSnapshot,
    ConfirmDelivery, CreateOrder, GetDeliveryTask, GetOrder, GetOrders, GetSnapshot, Subscribe,
    TickCheck, UpdateDeliveryProgress,
};
use common::types::delivery_status::DeliveryStatus;
use common::types::dtos::{DeliveryCompleted, DeliveryTask, Order, TransitionEffect, total_units};
use common::types::kitchen_status::KitchenStatus;
use std::collections::HashMap;

/// The `OrderBoard` actor is the only writer of orders and delivery tasks.
///
/// # Responsibilities
/// - Numbers and stores new orders.
/// - Validates every status change through the order and task flows.
/// - Keeps the one-to-one order/driver assignment.
/// - Appends every accepted change to the event log and pushes it to subscribers.
///
/// Kitchens, drivers and role views never touch an order directly, they ask
/// the board through messages, so the actor mailbox serializes all writes.
pub struct OrderBoard {
    /// Dictionary of orders.
    pub orders: HashMap<u64, Order>,
    /// Delivery tasks, keyed by order.
    pub tasks: HashMap<u64, DeliveryTask>,
    /// Which driver carries which order.
    pub assignments: Assignments,
    /// Accepted changes, oldest first.
    pub events: Vec<(u64, BoardEvent)>,
    /// Id the next created order will get.
    pub next_order_id: u64,
    /// Index of the next log entry.
    pub next_log_id: u64,
    /// Actors interested in board changes.
    pub subscribers: Vec<Recipient<BoardNotification>>,
    pub config: SimulationConfig,
    pub logger: Logger,
}

impl OrderBoard {
    pub fn new(config: SimulationConfig) -> Self {
        let logger = Logger::new("Board", Color::White).with_verbose(config.verbose);
        Self {
            orders: HashMap::new(),
            tasks: HashMap::new(),
            assignments: Assignments::new(),
            events: Vec::new(),
            next_order_id: 1,
            next_log_id: 1,
            subscribers: Vec::new(),
            config,
            logger,
        }
    }

    /// Adds an event to the log and notifies every subscriber still alive.
    fn record(&mut self, event: BoardEvent) {
        let log_index = self.next_log_id;
        self.next_log_id += 1;
        self.logger.debug(format!("#{} {:?}", log_index, event));
        self.events.push((log_index, event.clone()));
        self.subscribers.retain(|subscriber| {
            subscriber
                .try_send(BoardNotification {
                    log_index,
                    event: event.clone(),
                })
                .is_ok()
        });
    }

    fn order_mut(&mut self, order_id: u64) -> Result<&mut Order, FlowError> {
        self.orders
            .get_mut(&order_id)
            .ok_or(FlowError::OrderNotFound(order_id))
    }

    fn task_mut(&mut self, order_id: u64) -> Result<&mut DeliveryTask, FlowError> {
        self.tasks
            .get_mut(&order_id)
            .ok_or(FlowError::TaskNotFound(order_id))
    }

    /// Orders matching the filter: priority first, then oldest first.
    pub fn list_orders(&self, filter: &GetOrders) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|order| filter.status.is_none_or(|status| order.status == status))
            .filter(|order| {
                filter
                    .store_id
                    .as_ref()
                    .is_none_or(|store_id| &order.store_id == store_id)
            })
            .cloned()
            .collect();
        orders.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at().cmp(&b.created_at()))
                .then(a.order_id.cmp(&b.order_id))
        });
        orders
    }
}

impl Actor for OrderBoard {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        self.logger.info("Order board started.");
    }
}

impl Handler<Subscribe> for OrderBoard {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _ctx: &mut Self::Context) -> Self::Result {
        self.subscribers.push(msg.recipient);
    }
}

impl Handler<CreateOrder> for OrderBoard {
    type Result = Result<Order, FlowError>;

    fn handle(&mut self, msg: CreateOrder, _ctx: &mut Self::Context) -> Self::Result {
        if msg.items.is_empty() {
            return Err(FlowError::EmptyCart);
        }
        if msg.items.iter().any(|item| item.quantity == 0) {
            return Err(FlowError::InvalidQuantity);
        }
        total_units(&msg.items).ok_or(FlowError::InvalidQuantity)?;
        let order_id = self.next_order_id;
        self.next_order_id += 1;

        let order = order_from_request(order_id, msg, &self.config);
        self.logger.info(format!(
            "New order {} for {} ({} units{})",
            order.order_id,
            order.store_id,
            order.unit_count(),
            if order.priority { ", priority" } else { "" }
        ));
        self.orders.insert(order_id, order.clone());
        self.record(BoardEvent::OrderCreated {
            order_id,
            store_id: order.store_id.clone(),
            priority: order.priority,
        });
        Ok(order)
    }
}

impl Handler<AdvanceOrder> for OrderBoard {
    type Result = Result<(Order, TransitionEffect), FlowError>;

    fn handle(&mut self, msg: AdvanceOrder, _ctx: &mut Self::Context) -> Self::Result {
        let order = self.order_mut(msg.order_id)?;
        let from = order.status;
        let effect = order.advance(msg.target)?;
        let order = order.clone();

        self.logger.info(format!(
            "Order {}: {} -> {}",
            order.order_id, from, order.status
        ));
        self.record(BoardEvent::OrderAdvanced {
            order_id: order.order_id,
            from,
            to: order.status,
        });
        Ok((order, effect))
    }
}

impl Handler<TickCheck> for OrderBoard {
    type Result = Result<Order, FlowError>;

    fn handle(&mut self, msg: TickCheck, _ctx: &mut Self::Context) -> Self::Result {
        let order = self.order_mut(msg.order_id)?;
        if order.status != KitchenStatus::QualityCheck {
            return Err(FlowError::NotInQualityCheck(msg.order_id));
        }
        order.checklist.tick(&msg.check)?;
        let order = order.clone();
        self.record(BoardEvent::CheckTicked {
            order_id: msg.order_id,
            check: msg.check,
        });
        Ok(order)
    }
}

impl Handler<GetOrder> for OrderBoard {
    type Result = Option<Order>;

    fn handle(&mut self, msg: GetOrder, _ctx: &mut Self::Context) -> Self::Result {
        self.orders.get(&msg.order_id).cloned()
    }
}

impl Handler<GetOrders> for OrderBoard {
    type Result = MessageResult<GetOrders>;

    fn handle(&mut self, msg: GetOrders, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.list_orders(&msg))
    }
}

impl Handler<AssignDriver> for OrderBoard {
    type Result = Result<DeliveryTask, FlowError>;

    fn handle(&mut self, msg: AssignDriver, _ctx: &mut Self::Context) -> Self::Result {
        let order = self
            .orders
            .get(&msg.order_id)
            .ok_or(FlowError::OrderNotFound(msg.order_id))?;
        if !order.is_ready() {
            return Err(FlowError::OrderNotReady(msg.order_id));
        }
        if self.tasks.contains_key(&msg.order_id) {
            return Err(FlowError::AlreadyAssigned(msg.order_id));
        }
        self.assignments.assign(msg.order_id, &msg.driver_id)?;

        let task = DeliveryTask::new(
            order.clone(),
            msg.driver_id.clone(),
            msg.driver_position,
            msg.client_position,
        );
        self.logger.info(format!(
            "Order {} assigned to {} ({:.1} km, ~{} min)",
            msg.order_id, msg.driver_id, task.distance_remaining_km, task.eta_minutes
        ));
        self.tasks.insert(msg.order_id, task.clone());
        self.record(BoardEvent::DriverAssigned {
            order_id: msg.order_id,
            driver_id: msg.driver_id,
        });
        Ok(task)
    }
}

impl Handler<AdvanceDelivery> for OrderBoard {
    type Result = Result<DeliveryTask, FlowError>;

    fn handle(&mut self, msg: AdvanceDelivery, _ctx: &mut Self::Context) -> Self::Result {
        let task = self.task_mut(msg.order_id)?;
        let from = task.status;
        task.advance(msg.target)?;
        let task = task.clone();

        self.logger.info(format!(
            "Delivery of order {}: {} -> {}",
            msg.order_id, from, task.status
        ));
        self.record(BoardEvent::DeliveryAdvanced {
            order_id: msg.order_id,
            from,
            to: task.status,
        });
        Ok(task)
    }
}

impl Handler<UpdateDeliveryProgress> for OrderBoard {
    type Result = Result<DeliveryTask, FlowError>;

    fn handle(&mut self, msg: UpdateDeliveryProgress, _ctx: &mut Self::Context) -> Self::Result {
        let task = self.task_mut(msg.order_id)?;
        if task.status != DeliveryStatus::Driving {
            return Err(FlowError::NotDriving(msg.order_id));
        }
        task.record_progress(msg.km_driven);
        Ok(task.clone())
    }
}

impl Handler<ConfirmDelivery> for OrderBoard {
    type Result = Result<DeliveryCompleted, FlowError>;

    fn handle(&mut self, msg: ConfirmDelivery, _ctx: &mut Self::Context) -> Self::Result {
        let task = self.task_mut(msg.order_id)?;
        let completed = task.confirm(msg.proof)?;
        self.assignments.release_order(msg.order_id);

        self.logger.info(format!(
            "Order {} delivered by {}",
            completed.order_id, completed.driver_id
        ));
        self.record(BoardEvent::DeliveryCompleted(completed.clone()));
        Ok(completed)
    }
}

impl Handler<GetDeliveryTask> for OrderBoard {
    type Result = Option<DeliveryTask>;

    fn handle(&mut self, msg: GetDeliveryTask, _ctx: &mut Self::Context) -> Self::Result {
        self.tasks.get(&msg.order_id).cloned()
    }
}

impl Handler<GetSnapshot> for OrderBoard {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _msg: GetSnapshot, _ctx: &mut Self::Context) -> Self::Result {
        let mut orders: Vec<Order> = self.orders.values().cloned().collect();
        orders.sort_by_key(|order| order.order_id);
        let mut tasks: Vec<DeliveryTask> = self.tasks.values().cloned().collect();
        tasks.sort_by_key(|task| task.order_id());
        MessageResult(BoardSnapshot {
            orders,
            tasks,
            assignments: self.assignments.clone(),
            events: self.events.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::dtos::{LineItem, ProofOfDelivery};
    use common::types::status_flow::StatusFlow;
    use std::sync::{Arc, Mutex};

    fn request(priority: bool) -> CreateOrder {
        CreateOrder {
            client_id: "client-1".into(),
            store_id: "store-centro".into(),
            items: vec![LineItem::new("margherita", 2).unwrap()],
            priority,
        }
    }

    async fn ready_order(board: &Addr<OrderBoard>) -> u64 {
        let order = board.send(request(false)).await.unwrap().unwrap();
        for status in &KitchenStatus::SEQUENCE[1..6] {
            board
                .send(AdvanceOrder {
                    order_id: order.order_id,
                    target: *status,
                })
                .await
                .unwrap()
                .unwrap();
        }
        for check in common::constants::QUALITY_CHECKS {
            board
                .send(TickCheck {
                    order_id: order.order_id,
                    check: check.to_string(),
                })
                .await
                .unwrap()
                .unwrap();
        }
        board
            .send(AdvanceOrder {
                order_id: order.order_id,
                target: KitchenStatus::Ready,
            })
            .await
            .unwrap()
            .unwrap();
        order.order_id
    }

    fn assign(order_id: u64, driver_id: &str) -> AssignDriver {
        AssignDriver {
            order_id,
            driver_id: driver_id.into(),
            driver_position: (0.0, 0.0),
            client_position: (1.0, 1.0),
        }
    }

    struct Collector(Arc<Mutex<Vec<BoardEvent>>>);

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<BoardNotification> for Collector {
        type Result = ();

        fn handle(&mut self, msg: BoardNotification, _ctx: &mut Self::Context) {
            if let Ok(mut events) = self.0.lock() {
                events.push(msg.event);
            }
        }
    }

    #[actix_rt::test]
    async fn orders_get_sequential_ids_and_bake_time() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let first = board.send(request(false)).await.unwrap().unwrap();
        let second = board.send(request(false)).await.unwrap().unwrap();
        assert_eq!(first.order_id, 1);
        assert_eq!(second.order_id, 2);
        assert_eq!(first.status, KitchenStatus::Pending);
        assert_eq!(first.bake_time, SimulationConfig::default().bake_time(2));
    }

    #[actix_rt::test]
    async fn empty_requests_are_rejected() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let mut empty = request(false);
        empty.items.clear();
        assert_eq!(board.send(empty).await.unwrap(), Err(FlowError::EmptyCart));
    }

    #[actix_rt::test]
    async fn oversized_requests_are_rejected_without_using_an_id() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let mut oversized = request(false);
        oversized.items = vec![
            LineItem::new("faina", u32::MAX).unwrap(),
            LineItem::new("soda", 1).unwrap(),
        ];
        assert_eq!(
            board.send(oversized).await.unwrap(),
            Err(FlowError::InvalidQuantity)
        );
        let order = board.send(request(false)).await.unwrap().unwrap();
        assert_eq!(order.order_id, 1);
    }

    #[actix_rt::test]
    async fn checks_are_only_ticked_during_quality_check() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let order = board.send(request(false)).await.unwrap().unwrap();
        let early = board
            .send(TickCheck {
                order_id: order.order_id,
                check: common::constants::QUALITY_CHECKS[0].to_string(),
            })
            .await
            .unwrap();
        assert_eq!(early.unwrap_err(), FlowError::NotInQualityCheck(order.order_id));

        let stored = board.send(GetOrder { order_id: order.order_id }).await.unwrap().unwrap();
        assert_eq!(stored.checklist.missing().len(), common::constants::QUALITY_CHECKS.len());
        let snapshot = board.send(GetSnapshot).await.unwrap();
        assert!(
            !snapshot
                .events
                .iter()
                .any(|(_, e)| matches!(e, BoardEvent::CheckTicked { .. }))
        );
    }

    #[actix_rt::test]
    async fn kitchen_scenario_through_the_board() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let order = board.send(request(false)).await.unwrap().unwrap();
        let id = order.order_id;

        let (_, effect) = board
            .send(AdvanceOrder { order_id: id, target: KitchenStatus::Preparing })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(effect, TransitionEffect::None);

        let skipped = board
            .send(AdvanceOrder { order_id: id, target: KitchenStatus::Ready })
            .await
            .unwrap();
        assert_eq!(
            skipped.unwrap_err(),
            FlowError::invalid_transition("preparing", "ready")
        );

        let (order, effect) = board
            .send(AdvanceOrder { order_id: id, target: KitchenStatus::Baking })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, KitchenStatus::Baking);
        assert_eq!(effect, TransitionEffect::StartOvenTimer(order.bake_time));
    }

    #[actix_rt::test]
    async fn unknown_orders_are_reported() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let result = board
            .send(AdvanceOrder { order_id: 99, target: KitchenStatus::Preparing })
            .await
            .unwrap();
        assert_eq!(result.unwrap_err(), FlowError::OrderNotFound(99));
        assert!(board.send(GetOrder { order_id: 99 }).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn listing_puts_priority_first() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        board.send(request(false)).await.unwrap().unwrap();
        board.send(request(true)).await.unwrap().unwrap();
        board.send(request(false)).await.unwrap().unwrap();
        board
            .send(AdvanceOrder { order_id: 3, target: KitchenStatus::Preparing })
            .await
            .unwrap()
            .unwrap();

        let all = board.send(GetOrders::default()).await.unwrap();
        let ids: Vec<u64> = all.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let pending = board
            .send(GetOrders {
                status: Some(KitchenStatus::Pending),
                store_id: None,
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
    }

    #[actix_rt::test]
    async fn drivers_only_take_ready_orders() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let order = board.send(request(false)).await.unwrap().unwrap();
        let result = board.send(assign(order.order_id, "driver-ana")).await.unwrap();
        assert_eq!(result.unwrap_err(), FlowError::OrderNotReady(order.order_id));
    }

    #[actix_rt::test]
    async fn delivery_is_confirmed_exactly_once() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let id = ready_order(&board).await;
        let task = board.send(assign(id, "driver-ana")).await.unwrap().unwrap();
        assert_eq!(task.status, DeliveryStatus::Assigned);

        board
            .send(AdvanceDelivery { order_id: id, target: DeliveryStatus::Driving })
            .await
            .unwrap()
            .unwrap();
        let early = board
            .send(ConfirmDelivery { order_id: id, proof: ProofOfDelivery::empty() })
            .await
            .unwrap();
        assert_eq!(early.unwrap_err(), FlowError::NotArrived(id));

        board
            .send(AdvanceDelivery { order_id: id, target: DeliveryStatus::Arrived })
            .await
            .unwrap()
            .unwrap();
        let completed = board
            .send(ConfirmDelivery {
                order_id: id,
                proof: ProofOfDelivery::new(None, Some("J. Perez".into())),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(completed.driver_id, "driver-ana");

        let again = board
            .send(ConfirmDelivery { order_id: id, proof: ProofOfDelivery::empty() })
            .await
            .unwrap();
        assert_eq!(again.unwrap_err(), FlowError::AlreadyConfirmed(id));

        let snapshot = board.send(GetSnapshot).await.unwrap();
        let completions = snapshot
            .events
            .iter()
            .filter(|(_, e)| matches!(e, BoardEvent::DeliveryCompleted(_)))
            .count();
        assert_eq!(completions, 1);
        assert!(snapshot.assignments.is_driver_free("driver-ana"));
    }

    #[actix_rt::test]
    async fn a_driver_cannot_take_two_orders() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let first = ready_order(&board).await;
        let second = ready_order(&board).await;
        board.send(assign(first, "driver-ana")).await.unwrap().unwrap();

        let busy = board.send(assign(second, "driver-ana")).await.unwrap();
        assert_eq!(
            busy.unwrap_err(),
            FlowError::DriverBusy { driver_id: "driver-ana".into(), order_id: first }
        );
        let taken = board.send(assign(first, "driver-bruno")).await.unwrap();
        assert_eq!(taken.unwrap_err(), FlowError::AlreadyAssigned(first));
    }

    #[actix_rt::test]
    async fn progress_is_only_accepted_while_driving() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let id = ready_order(&board).await;
        board.send(assign(id, "driver-carla")).await.unwrap().unwrap();
        let parked = board
            .send(UpdateDeliveryProgress { order_id: id, km_driven: 0.5 })
            .await
            .unwrap();
        assert_eq!(parked.unwrap_err(), FlowError::NotDriving(id));

        board
            .send(AdvanceDelivery { order_id: id, target: DeliveryStatus::Driving })
            .await
            .unwrap()
            .unwrap();
        let task = board
            .send(UpdateDeliveryProgress { order_id: id, km_driven: 0.5 })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.distance_remaining_km, 1.5);

        board
            .send(AdvanceDelivery { order_id: id, target: DeliveryStatus::Arrived })
            .await
            .unwrap()
            .unwrap();
        let late = board
            .send(UpdateDeliveryProgress { order_id: id, km_driven: 0.5 })
            .await
            .unwrap();
        assert_eq!(late.unwrap_err(), FlowError::NotDriving(id));
    }

    #[actix_rt::test]
    async fn subscribers_receive_every_change_in_order() {
        let board = OrderBoard::new(SimulationConfig::default()).start();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let collector = Collector(seen.clone()).start();
        board
            .send(Subscribe { recipient: collector.recipient() })
            .await
            .unwrap();

        let order = board.send(request(false)).await.unwrap().unwrap();
        board
            .send(AdvanceOrder { order_id: order.order_id, target: KitchenStatus::Preparing })
            .await
            .unwrap()
            .unwrap();
        actix_rt::time::sleep(std::time::Duration::from_millis(50)).await;

        let events = seen.lock().unwrap().clone();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BoardEvent::OrderCreated { order_id: 1, .. }));
        assert_eq!(
            events[1],
            BoardEvent::OrderAdvanced {
                order_id: 1,
                from: KitchenStatus::Pending,
                to: KitchenStatus::Preparing
            }
        );
    }
}
