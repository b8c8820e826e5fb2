use crate::messages::{
    ConfirmArrival, DriverState, GetDriverState, ReachedClient, SetOnline, StartDriving, TakeOrder,
};
use actix::prelude::*;
use board::OrderBoard;
use colored::Color;
use common::config::SimulationConfig;
use common::errors::FlowError;
use common::logger::Logger;
use common::messages::{AdvanceDelivery, AssignDriver, ConfirmDelivery, UpdateDeliveryProgress};
use common::types::catalog::Driver;
use common::types::delivery_status::DeliveryStatus;
use common::types::dtos::{DeliveryCompleted, DeliveryTask, ProofOfDelivery};

/// Driver screen.
///
/// Holds at most one order at a time. While driving, a timer reports the
/// distance covered to the board every `drive_tick` and marks the task as
/// arrived when nothing is left.
pub struct Delivery {
    pub driver: Driver,
    /// Posición actual del delivery.
    pub position: (f32, f32),
    /// Si acepta pedidos nuevos.
    pub online: bool,
    /// Pedido actual en curso, si lo hay.
    pub current_order: Option<u64>,
    /// Posición del cliente del pedido actual.
    pub destination: Option<(f32, f32)>,
    pub drive_timer: Option<SpawnHandle>,
    /// Órdenes entregadas.
    pub completed: Vec<u64>,
    pub board: Addr<OrderBoard>,
    pub config: SimulationConfig,
    pub logger: Logger,
}

impl Delivery {
    pub fn new(driver: Driver, board: Addr<OrderBoard>, config: SimulationConfig) -> Self {
        let logger = Logger::new(format!("Delivery {}", driver.id), Color::Blue)
            .with_verbose(config.verbose);
        Self {
            position: driver.position,
            driver,
            online: true,
            current_order: None,
            destination: None,
            drive_timer: None,
            completed: Vec::new(),
            board,
            config,
            logger,
        }
    }

    fn current(&self) -> Result<u64, FlowError> {
        self.current_order
            .ok_or_else(|| FlowError::NoActiveTask(self.driver.id.clone()))
    }

    fn start_drive_timer(&mut self, order_id: u64, ctx: &mut Context<Self>) {
        let km = self.config.km_per_tick;
        let handle = ctx.run_interval(self.config.drive_tick, move |act, ctx| {
            act.board
                .send(UpdateDeliveryProgress {
                    order_id,
                    km_driven: km,
                })
                .into_actor(act)
                .map(move |result, act, ctx| match result {
                    Ok(Ok(task)) => {
                        act.logger.debug(format!(
                            "{:.1} km left, ETA {} min",
                            task.distance_remaining_km, task.eta_minutes
                        ));
                        if task.distance_remaining_km <= 0.0 {
                            ctx.notify(ReachedClient { order_id });
                        }
                    }
                    Ok(Err(e)) => act.logger.warn(format!("Progress rejected: {}", e)),
                    Err(e) => act.logger.error(format!("Board unreachable: {}", e)),
                })
                .wait(ctx);
        });
        self.drive_timer = Some(handle);
    }

    fn stop_drive_timer(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.drive_timer.take() {
            ctx.cancel_future(handle);
        }
    }
}

impl Actor for Delivery {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        self.logger.info(format!(
            "{} online with a {} at {:?}",
            self.driver.name, self.driver.vehicle, self.position
        ));
    }
}

impl Handler<SetOnline> for Delivery {
    type Result = ();

    fn handle(&mut self, msg: SetOnline, _ctx: &mut Self::Context) -> Self::Result {
        self.online = msg.0;
        self.logger
            .info(if msg.0 { "Going online" } else { "Going offline" });
    }
}

impl Handler<TakeOrder> for Delivery {
    type Result = ResponseActFuture<Self, Result<DeliveryTask, FlowError>>;

    fn handle(&mut self, msg: TakeOrder, _ctx: &mut Self::Context) -> Self::Result {
        if let Some(current) = self.current_order {
            return Box::pin(actix::fut::ready(Err(FlowError::DriverBusy {
                driver_id: self.driver.id.clone(),
                order_id: current,
            })));
        }
        if !self.online {
            return Box::pin(actix::fut::ready(Err(FlowError::ActionNotAllowed {
                role: "offline driver".into(),
                action: "TakeOrder".into(),
            })));
        }
        let request = AssignDriver {
            order_id: msg.order_id,
            driver_id: self.driver.id.clone(),
            driver_position: self.position,
            client_position: msg.client_position,
        };
        let board = self.board.clone();
        Box::pin(
            async move { board.send(request).await }
                .into_actor(self)
                .map(move |result, act, _ctx| {
                    let task = result.map_err(|e| FlowError::Unavailable(e.to_string()))??;
                    act.logger.info(format!(
                        "Took order {} ({:.1} km away)",
                        task.order_id(),
                        task.distance_remaining_km
                    ));
                    act.current_order = Some(task.order_id());
                    act.destination = Some(msg.client_position);
                    Ok(task)
                }),
        )
    }
}

impl Handler<StartDriving> for Delivery {
    type Result = ResponseActFuture<Self, Result<DeliveryTask, FlowError>>;

    fn handle(&mut self, _msg: StartDriving, _ctx: &mut Self::Context) -> Self::Result {
        let order_id = match self.current() {
            Ok(order_id) => order_id,
            Err(e) => return Box::pin(actix::fut::ready(Err(e))),
        };
        let board = self.board.clone();
        Box::pin(
            async move {
                board
                    .send(AdvanceDelivery {
                        order_id,
                        target: DeliveryStatus::Driving,
                    })
                    .await
            }
            .into_actor(self)
            .map(move |result, act, ctx| {
                let task = result.map_err(|e| FlowError::Unavailable(e.to_string()))??;
                act.logger
                    .info(format!("Driving order {}, ETA {} min", order_id, task.eta_minutes));
                act.start_drive_timer(order_id, ctx);
                Ok(task)
            }),
        )
    }
}

impl Handler<ReachedClient> for Delivery {
    type Result = ();

    fn handle(&mut self, msg: ReachedClient, ctx: &mut Self::Context) -> Self::Result {
        if self.current_order != Some(msg.order_id) {
            return;
        }
        self.stop_drive_timer(ctx);
        if let Some(destination) = self.destination {
            self.position = destination;
        }
        self.board
            .send(AdvanceDelivery {
                order_id: msg.order_id,
                target: DeliveryStatus::Arrived,
            })
            .into_actor(self)
            .map(move |result, act, _ctx| match result {
                Ok(Ok(_)) => act
                    .logger
                    .info(format!("Arrived with order {}", msg.order_id)),
                Ok(Err(e)) => act.logger.warn(format!("Arrival rejected: {}", e)),
                Err(e) => act.logger.error(format!("Board unreachable: {}", e)),
            })
            .wait(ctx);
    }
}

impl Handler<ConfirmArrival> for Delivery {
    type Result = ResponseActFuture<Self, Result<DeliveryCompleted, FlowError>>;

    fn handle(&mut self, msg: ConfirmArrival, _ctx: &mut Self::Context) -> Self::Result {
        let order_id = match self.current() {
            Ok(order_id) => order_id,
            Err(e) => return Box::pin(actix::fut::ready(Err(e))),
        };
        let board = self.board.clone();
        let proof = ProofOfDelivery::new(msg.photo, msg.signature);
        Box::pin(
            async move { board.send(ConfirmDelivery { order_id, proof }).await }
                .into_actor(self)
                .map(move |result, act, _ctx| {
                    let completed = result.map_err(|e| FlowError::Unavailable(e.to_string()))??;
                    act.logger
                        .info(format!("Order {} delivered", completed.order_id));
                    act.completed.push(completed.order_id);
                    act.current_order = None;
                    act.destination = None;
                    Ok(completed)
                }),
        )
    }
}

impl Handler<GetDriverState> for Delivery {
    type Result = MessageResult<GetDriverState>;

    fn handle(&mut self, _msg: GetDriverState, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(DriverState {
            driver_id: self.driver.id.clone(),
            position: self.position,
            online: self.online,
            current_order: self.current_order,
            completed: self.completed.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::QUALITY_CHECKS;
    use common::messages::{AdvanceOrder, CreateOrder, GetDeliveryTask, TickCheck};
    use common::types::dtos::LineItem;
    use common::types::kitchen_status::KitchenStatus;
    use common::types::status_flow::StatusFlow;
    use ntest::timeout;
    use std::time::Duration;

    fn fast_config() -> SimulationConfig {
        SimulationConfig {
            drive_tick: Duration::from_millis(10),
            km_per_tick: 1.0,
            ..SimulationConfig::default()
        }
    }

    fn test_driver() -> Driver {
        Driver {
            id: "driver-ana".into(),
            name: "Ana".into(),
            vehicle: "bike".into(),
            position: (0.0, 0.0),
            rating: 4.8,
        }
    }

    async fn ready_order(board: &Addr<OrderBoard>) -> u64 {
        let order = board
            .send(CreateOrder {
                client_id: "client-3".into(),
                store_id: "store-palermo".into(),
                items: vec![LineItem::new("empanada-carne", 6).unwrap()],
                priority: false,
            })
            .await
            .unwrap()
            .unwrap();
        for status in &KitchenStatus::SEQUENCE[1..6] {
            board
                .send(AdvanceOrder { order_id: order.order_id, target: *status })
                .await
                .unwrap()
                .unwrap();
        }
        for check in QUALITY_CHECKS {
            board
                .send(TickCheck { order_id: order.order_id, check: check.into() })
                .await
                .unwrap()
                .unwrap();
        }
        board
            .send(AdvanceOrder { order_id: order.order_id, target: KitchenStatus::Ready })
            .await
            .unwrap()
            .unwrap();
        order.order_id
    }

    #[actix_rt::test]
    async fn taking_an_order_assigns_the_driver() {
        let board = OrderBoard::new(fast_config()).start();
        let id = ready_order(&board).await;
        let driver = Delivery::new(test_driver(), board.clone(), fast_config()).start();

        let task = driver
            .send(TakeOrder { order_id: id, client_position: (2.0, 1.0) })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.status, DeliveryStatus::Assigned);
        assert_eq!(task.distance_remaining_km, 3.0);

        let state = driver.send(GetDriverState).await.unwrap();
        assert_eq!(state.current_order, Some(id));

        let second = ready_order(&board).await;
        let busy = driver
            .send(TakeOrder { order_id: second, client_position: (1.0, 1.0) })
            .await
            .unwrap();
        assert_eq!(
            busy.unwrap_err(),
            FlowError::DriverBusy { driver_id: "driver-ana".into(), order_id: id }
        );
    }

    #[actix_rt::test]
    async fn offline_drivers_do_not_take_orders() {
        let board = OrderBoard::new(fast_config()).start();
        let id = ready_order(&board).await;
        let driver = Delivery::new(test_driver(), board.clone(), fast_config()).start();
        driver.send(SetOnline(false)).await.unwrap();

        let result = driver
            .send(TakeOrder { order_id: id, client_position: (1.0, 1.0) })
            .await
            .unwrap();
        assert!(matches!(result, Err(FlowError::ActionNotAllowed { .. })));
        assert!(board.send(GetDeliveryTask { order_id: id }).await.unwrap().is_none());
    }

    #[actix_rt::test]
    #[timeout(5000)]
    async fn driving_ends_at_the_client_and_confirms_once() {
        let board = OrderBoard::new(fast_config()).start();
        let id = ready_order(&board).await;
        let driver = Delivery::new(test_driver(), board.clone(), fast_config()).start();
        driver
            .send(TakeOrder { order_id: id, client_position: (2.0, 1.0) })
            .await
            .unwrap()
            .unwrap();

        let task = driver.send(StartDriving).await.unwrap().unwrap();
        assert_eq!(task.status, DeliveryStatus::Driving);

        let early = driver.send(ConfirmArrival::default()).await.unwrap();
        assert_eq!(early.unwrap_err(), FlowError::NotArrived(id));

        let mut status = DeliveryStatus::Driving;
        for _ in 0..50 {
            actix_rt::time::sleep(Duration::from_millis(20)).await;
            status = board
                .send(GetDeliveryTask { order_id: id })
                .await
                .unwrap()
                .unwrap()
                .status;
            if status == DeliveryStatus::Arrived {
                break;
            }
        }
        assert_eq!(status, DeliveryStatus::Arrived);

        let completed = driver
            .send(ConfirmArrival {
                photo: Some("porch.jpg".into()),
                signature: None,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(completed.order_id, id);

        let state = driver.send(GetDriverState).await.unwrap();
        assert_eq!(state.position, (2.0, 1.0));
        assert_eq!(state.current_order, None);
        assert_eq!(state.completed, vec![id]);

        let again = board
            .send(ConfirmDelivery { order_id: id, proof: ProofOfDelivery::empty() })
            .await
            .unwrap();
        assert_eq!(again.unwrap_err(), FlowError::AlreadyConfirmed(id));
    }

    #[actix_rt::test]
    async fn nothing_to_drive_without_an_order() {
        let board = OrderBoard::new(fast_config()).start();
        let driver = Delivery::new(test_driver(), board, fast_config()).start();
        let no_task = FlowError::NoActiveTask("driver-ana".into());
        assert_eq!(driver.send(StartDriving).await.unwrap().unwrap_err(), no_task);
        assert_eq!(
            driver.send(ConfirmArrival::default()).await.unwrap().unwrap_err(),
            no_task
        );
    }
}
