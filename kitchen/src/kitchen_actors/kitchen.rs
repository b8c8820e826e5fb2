use crate::messages::{
    AdvanceKitchenOrder, GetKitchenView, KitchenView, OvenFinished, PressNext, TickQualityCheck,
};
use actix::prelude::*;
use board::OrderBoard;
use colored::Color;
use common::config::SimulationConfig;
use common::errors::FlowError;
use common::logger::Logger;
use common::messages::{
    AdvanceOrder, BoardEvent, BoardNotification, GetOrder, GetOrders, Subscribe, TickCheck,
};
use common::types::dtos::{Order, TransitionEffect};
use common::types::kitchen_status::KitchenStatus;
use common::types::status_flow::StatusFlow;
use std::collections::HashMap;
use std::time::Duration;

/// Countdown of one order in the oven.
pub struct OvenTimer {
    pub handle: SpawnHandle,
    pub remaining: Duration,
}

/// Looks `order_id` up on the board, hiding orders of other stores.
async fn own_order(board: &Addr<OrderBoard>, store_id: &str, order_id: u64) -> Result<Order, FlowError> {
    board
        .send(GetOrder { order_id })
        .await
        .map_err(|e| FlowError::Unavailable(e.to_string()))?
        .filter(|order| order.store_id == store_id)
        .ok_or(FlowError::OrderNotFound(order_id))
}

/// Kitchen screen of one store.
///
/// Every status change goes through the board. The kitchen only adds what
/// the screen owns: oven countdowns started when an order enters `baking`,
/// which keep the order from leaving the oven early.
pub struct Kitchen {
    pub store_id: String,
    pub board: Addr<OrderBoard>,
    /// Ovens running, by order.
    pub ovens: HashMap<u64, OvenTimer>,
    pub config: SimulationConfig,
    pub logger: Logger,
}

impl Kitchen {
    pub fn new(store_id: impl Into<String>, board: Addr<OrderBoard>, config: SimulationConfig) -> Self {
        let store_id = store_id.into();
        let logger = Logger::new(format!("Kitchen {}", store_id), Color::Magenta)
            .with_verbose(config.verbose);
        Self {
            store_id,
            board,
            ovens: HashMap::new(),
            config,
            logger,
        }
    }

    /// Starts the countdown of `order_id`, replacing any previous one.
    pub fn start_oven(&mut self, order_id: u64, bake_time: Duration, ctx: &mut Context<Self>) {
        let tick = self.config.oven_tick;
        let handle = ctx.run_interval(tick, move |act, ctx| {
            let Some(timer) = act.ovens.get_mut(&order_id) else {
                return;
            };
            timer.remaining = timer.remaining.saturating_sub(tick);
            act.logger
                .debug(format!("Oven {}: {}s left", order_id, timer.remaining.as_secs()));
            if timer.remaining.is_zero() {
                ctx.notify(OvenFinished { order_id });
            }
        });
        if let Some(previous) = self.ovens.insert(
            order_id,
            OvenTimer {
                handle,
                remaining: bake_time,
            },
        ) {
            ctx.cancel_future(previous.handle);
        }
        self.logger.info(format!(
            "Order {} in the oven for {}s",
            order_id,
            bake_time.as_secs()
        ));
    }

    /// An order may not leave `baking` while its oven is still counting down.
    fn check_oven(&self, order_id: u64, target: KitchenStatus) -> Result<(), FlowError> {
        if target != KitchenStatus::Cooling {
            return Ok(());
        }
        match self.ovens.get(&order_id) {
            Some(timer) => Err(FlowError::OvenStillRunning {
                order_id,
                remaining_secs: timer.remaining.as_secs(),
            }),
            None => Ok(()),
        }
    }

    fn after_advance(&mut self, order: &Order, effect: TransitionEffect, ctx: &mut Context<Self>) {
        if let TransitionEffect::StartOvenTimer(bake_time) = effect {
            self.start_oven(order.order_id, bake_time, ctx);
        }
        if order.is_ready() {
            self.logger
                .info(format!("Order {} ready for pickup", order.order_id));
        }
    }
}

impl Actor for Kitchen {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.logger.info("Kitchen started.");
        self.board.do_send(Subscribe {
            recipient: ctx.address().recipient(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if !self.ovens.is_empty() {
            self.logger
                .warn(format!("Kitchen closed with {} ovens on", self.ovens.len()));
        }
    }
}

impl Handler<BoardNotification> for Kitchen {
    type Result = ();

    fn handle(&mut self, msg: BoardNotification, _ctx: &mut Self::Context) -> Self::Result {
        if let BoardEvent::OrderCreated {
            order_id,
            store_id,
            priority,
        } = msg.event
        {
            if store_id == self.store_id {
                self.logger.info(format!(
                    "New order {}{}",
                    order_id,
                    if priority { " (priority)" } else { "" }
                ));
            }
        }
    }
}

impl Handler<OvenFinished> for Kitchen {
    type Result = ();

    fn handle(&mut self, msg: OvenFinished, ctx: &mut Self::Context) -> Self::Result {
        if let Some(timer) = self.ovens.remove(&msg.order_id) {
            ctx.cancel_future(timer.handle);
            self.logger
                .info(format!("Order {} out of the oven", msg.order_id));
        }
    }
}

/// Atomic: no other message reaches the kitchen between the oven check and
/// the oven start, so `cooling` can never slip past a countdown being set up.
impl Handler<AdvanceKitchenOrder> for Kitchen {
    type Result = AtomicResponse<Self, Result<Order, FlowError>>;

    fn handle(&mut self, msg: AdvanceKitchenOrder, _ctx: &mut Self::Context) -> Self::Result {
        if let Err(e) = self.check_oven(msg.order_id, msg.target) {
            return AtomicResponse::new(Box::pin(actix::fut::ready(Err(e))));
        }
        let board = self.board.clone();
        let store_id = self.store_id.clone();
        AtomicResponse::new(Box::pin(
            async move {
                own_order(&board, &store_id, msg.order_id).await?;
                board
                    .send(AdvanceOrder {
                        order_id: msg.order_id,
                        target: msg.target,
                    })
                    .await
                    .map_err(|e| FlowError::Unavailable(e.to_string()))?
            }
            .into_actor(self)
            .map(|result, act, ctx| {
                let (order, effect) = result?;
                act.after_advance(&order, effect, ctx);
                Ok(order)
            }),
        ))
    }
}

impl Handler<PressNext> for Kitchen {
    type Result = ResponseFuture<Result<Order, FlowError>>;

    fn handle(&mut self, msg: PressNext, ctx: &mut Self::Context) -> Self::Result {
        let board = self.board.clone();
        let kitchen = ctx.address();
        let store_id = self.store_id.clone();
        Box::pin(async move {
            let order = own_order(&board, &store_id, msg.order_id).await?;
            let target = order
                .status
                .next()
                .ok_or_else(|| FlowError::invalid_transition(order.status, "none"))?;
            kitchen
                .send(AdvanceKitchenOrder {
                    order_id: msg.order_id,
                    target,
                })
                .await
                .map_err(|e| FlowError::Unavailable(e.to_string()))?
        })
    }
}

impl Handler<TickQualityCheck> for Kitchen {
    type Result = ResponseFuture<Result<Order, FlowError>>;

    fn handle(&mut self, msg: TickQualityCheck, _ctx: &mut Self::Context) -> Self::Result {
        let board = self.board.clone();
        let store_id = self.store_id.clone();
        Box::pin(async move {
            own_order(&board, &store_id, msg.order_id).await?;
            board
                .send(TickCheck {
                    order_id: msg.order_id,
                    check: msg.check,
                })
                .await
                .map_err(|e| FlowError::Unavailable(e.to_string()))?
        })
    }
}

impl Handler<GetKitchenView> for Kitchen {
    type Result = ResponseActFuture<Self, Result<KitchenView, FlowError>>;

    fn handle(&mut self, _msg: GetKitchenView, _ctx: &mut Self::Context) -> Self::Result {
        let board = self.board.clone();
        let store_id = self.store_id.clone();
        Box::pin(
            async move {
                board
                    .send(GetOrders {
                        status: None,
                        store_id: Some(store_id),
                    })
                    .await
            }
            .into_actor(self)
            .map(|result, act, _ctx| {
                let orders = result.map_err(|e| FlowError::Unavailable(e.to_string()))?;
                let queue = orders.into_iter().filter(|o| !o.is_ready()).collect();
                let mut ovens: Vec<(u64, Duration)> = act
                    .ovens
                    .iter()
                    .map(|(order_id, timer)| (*order_id, timer.remaining))
                    .collect();
                ovens.sort_by_key(|(order_id, _)| *order_id);
                Ok(KitchenView { queue, ovens })
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::QUALITY_CHECKS;
    use common::messages::CreateOrder;
    use common::types::dtos::LineItem;
    use ntest::timeout;

    fn fast_config() -> SimulationConfig {
        SimulationConfig {
            oven_tick: Duration::from_millis(10),
            base_oven_time: Duration::from_millis(100),
            oven_time_per_item: Duration::ZERO,
            ..SimulationConfig::default()
        }
    }

    async fn setup(config: SimulationConfig) -> (Addr<OrderBoard>, Addr<Kitchen>, u64) {
        let board = OrderBoard::new(config.clone()).start();
        let kitchen = Kitchen::new("store-centro", board.clone(), config).start();
        let order = board
            .send(CreateOrder {
                client_id: "client-1".into(),
                store_id: "store-centro".into(),
                items: vec![LineItem::new("fugazzeta", 1).unwrap()],
                priority: false,
            })
            .await
            .unwrap()
            .unwrap();
        (board, kitchen, order.order_id)
    }

    #[actix_rt::test]
    async fn advancing_follows_the_sequence() {
        let (_board, kitchen, id) = setup(fast_config()).await;
        let order = kitchen
            .send(AdvanceKitchenOrder { order_id: id, target: KitchenStatus::Preparing })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, KitchenStatus::Preparing);

        let skipped = kitchen
            .send(AdvanceKitchenOrder { order_id: id, target: KitchenStatus::Ready })
            .await
            .unwrap();
        assert_eq!(
            skipped.unwrap_err(),
            FlowError::invalid_transition("preparing", "ready")
        );
    }

    #[actix_rt::test]
    #[timeout(5000)]
    async fn baking_starts_a_countdown_that_gates_cooling() {
        let (_board, kitchen, id) = setup(fast_config()).await;
        kitchen.send(PressNext { order_id: id }).await.unwrap().unwrap();
        let order = kitchen.send(PressNext { order_id: id }).await.unwrap().unwrap();
        assert_eq!(order.status, KitchenStatus::Baking);

        let view = kitchen.send(GetKitchenView).await.unwrap().unwrap();
        assert!(view.oven_remaining(id).is_some());

        let early = kitchen.send(PressNext { order_id: id }).await.unwrap();
        assert!(matches!(early, Err(FlowError::OvenStillRunning { order_id, .. }) if order_id == id));

        actix_rt::time::sleep(Duration::from_millis(400)).await;
        let view = kitchen.send(GetKitchenView).await.unwrap().unwrap();
        assert!(view.oven_remaining(id).is_none());
        let order = kitchen.send(PressNext { order_id: id }).await.unwrap().unwrap();
        assert_eq!(order.status, KitchenStatus::Cooling);
    }

    #[actix_rt::test]
    #[timeout(5000)]
    async fn checklist_gates_ready() {
        let (_board, kitchen, id) = setup(fast_config()).await;
        for _ in 0..2 {
            kitchen.send(PressNext { order_id: id }).await.unwrap().unwrap();
        }
        actix_rt::time::sleep(Duration::from_millis(400)).await;
        for _ in 0..3 {
            kitchen.send(PressNext { order_id: id }).await.unwrap().unwrap();
        }

        let blocked = kitchen.send(PressNext { order_id: id }).await.unwrap();
        assert!(matches!(blocked, Err(FlowError::ChecklistIncomplete { .. })));

        for check in QUALITY_CHECKS {
            kitchen
                .send(TickQualityCheck { order_id: id, check: check.into() })
                .await
                .unwrap()
                .unwrap();
        }
        let order = kitchen.send(PressNext { order_id: id }).await.unwrap().unwrap();
        assert!(order.is_ready());

        let view = kitchen.send(GetKitchenView).await.unwrap().unwrap();
        assert!(view.queue.is_empty());

        let done = kitchen.send(PressNext { order_id: id }).await.unwrap();
        assert!(matches!(done, Err(FlowError::InvalidTransition { .. })));
    }

    #[actix_rt::test]
    #[timeout(5000)]
    async fn concurrent_advances_cannot_skip_the_oven() {
        let config = SimulationConfig {
            base_oven_time: Duration::from_secs(10),
            ..fast_config()
        };
        let (board, kitchen, id) = setup(config).await;
        kitchen.send(PressNext { order_id: id }).await.unwrap().unwrap();

        let (bake, cool) = tokio::join!(
            kitchen.send(AdvanceKitchenOrder { order_id: id, target: KitchenStatus::Baking }),
            kitchen.send(AdvanceKitchenOrder { order_id: id, target: KitchenStatus::Cooling }),
        );
        assert_eq!(bake.unwrap().unwrap().status, KitchenStatus::Baking);
        assert!(matches!(
            cool.unwrap(),
            Err(FlowError::OvenStillRunning { order_id, .. }) if order_id == id
        ));
        let order = board.send(GetOrder { order_id: id }).await.unwrap().unwrap();
        assert_eq!(order.status, KitchenStatus::Baking);
    }

    #[actix_rt::test]
    async fn orders_of_other_stores_are_out_of_reach() {
        let (board, kitchen, _) = setup(fast_config()).await;
        let foreign = board
            .send(CreateOrder {
                client_id: "client-2".into(),
                store_id: "store-boedo".into(),
                items: vec![LineItem::new("fugazzeta", 1).unwrap()],
                priority: false,
            })
            .await
            .unwrap()
            .unwrap();
        let id = foreign.order_id;

        let advanced = kitchen
            .send(AdvanceKitchenOrder { order_id: id, target: KitchenStatus::Preparing })
            .await
            .unwrap();
        assert_eq!(advanced.unwrap_err(), FlowError::OrderNotFound(id));
        let ticked = kitchen
            .send(TickQualityCheck { order_id: id, check: QUALITY_CHECKS[0].into() })
            .await
            .unwrap();
        assert_eq!(ticked.unwrap_err(), FlowError::OrderNotFound(id));

        let order = board.send(GetOrder { order_id: id }).await.unwrap().unwrap();
        assert_eq!(order.status, KitchenStatus::Pending);
    }

    #[actix_rt::test]
    async fn unknown_order_cannot_be_pressed() {
        let (_board, kitchen, _) = setup(fast_config()).await;
        let result = kitchen.send(PressNext { order_id: 42 }).await.unwrap();
        assert_eq!(result.unwrap_err(), FlowError::OrderNotFound(42));
    }
}
