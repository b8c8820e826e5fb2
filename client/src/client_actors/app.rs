use crate::commands::Command;
use crate::messages::{GetRole, RunCommand};
use crate::render;
use actix::prelude::*;
use board::OrderBoard;
use colored::Color;
use common::config::SimulationConfig;
use common::errors::FlowError;
use common::fixtures::OrderGenerator;
use common::logger::Logger;
use common::messages::{
    BoardEvent, BoardNotification, GetDeliveryTask, GetOrder, GetOrders, Subscribe,
};
use common::roles::{Cart, Role, RoleView, Router};
use common::types::catalog::Catalog;
use common::types::kitchen_status::KitchenStatus;
use delivery::Delivery;
use delivery::messages::{ConfirmArrival, GetDriverState, SetOnline, StartDriving, TakeOrder};
use kitchen::Kitchen;
use kitchen::messages::{GetKitchenView, PressNext, TickQualityCheck};
use std::collections::HashMap;

type Reply = ResponseActFuture<App, Result<String, FlowError>>;

fn reply(result: Result<String, FlowError>) -> Reply {
    Box::pin(actix::fut::ready(result))
}

fn unavailable(e: MailboxError) -> FlowError {
    FlowError::Unavailable(e.to_string())
}

/// Terminal front end.
///
/// Owns the router, so exactly one role view is mounted at a time, and talks
/// to the board, the kitchens and the drivers on behalf of that role.
pub struct App {
    pub client_id: String,
    pub router: Router,
    pub catalog: Catalog,
    pub board: Addr<OrderBoard>,
    /// Kitchen screens, by store.
    pub kitchens: HashMap<String, Addr<Kitchen>>,
    /// Driver screens, by driver.
    pub drivers: HashMap<String, Addr<Delivery>>,
    /// Where the client of each known order is waiting.
    pub destinations: HashMap<u64, (f32, f32)>,
    /// Orders placed from this terminal.
    pub my_orders: Vec<u64>,
    home: (f32, f32),
    generator: OrderGenerator,
    pub logger: Logger,
}

impl App {
    pub fn new(
        client_id: impl Into<String>,
        catalog: Catalog,
        board: Addr<OrderBoard>,
        config: &SimulationConfig,
    ) -> Self {
        let client_id = client_id.into();
        let logger =
            Logger::new(format!("App {}", client_id), Color::Green).with_verbose(config.verbose);
        let mut generator = OrderGenerator::new(config.fixture_seed, catalog.clone());
        let home = generator.client_position();
        Self {
            client_id,
            router: Router::new(),
            catalog,
            board,
            kitchens: HashMap::new(),
            drivers: HashMap::new(),
            destinations: HashMap::new(),
            my_orders: Vec::new(),
            home,
            generator,
            logger,
        }
    }

    pub fn with_kitchen(mut self, store_id: impl Into<String>, kitchen: Addr<Kitchen>) -> Self {
        self.kitchens.insert(store_id.into(), kitchen);
        self
    }

    pub fn with_driver(mut self, driver_id: impl Into<String>, driver: Addr<Delivery>) -> Self {
        self.drivers.insert(driver_id.into(), driver);
        self
    }

    fn cart_mut(&mut self) -> Result<(&mut Cart, &Catalog), FlowError> {
        match self.router.view_mut() {
            RoleView::Client { cart, .. } => Ok((cart, &self.catalog)),
            other => Err(FlowError::ActionNotAllowed {
                role: other.role().to_string(),
                action: "EditCart".into(),
            }),
        }
    }

    /// Kitchen of the store named by the mounted path.
    fn kitchen(&self) -> Result<Addr<Kitchen>, FlowError> {
        let store_id = self
            .router
            .view()
            .scope()
            .ok_or_else(|| FlowError::BadCommand("go /kitchen/<store> first".into()))?;
        self.kitchens
            .get(&store_id)
            .cloned()
            .ok_or(FlowError::UnknownRoute(format!("/kitchen/{}", store_id)))
    }

    /// Driver named by the mounted path.
    fn driver(&self) -> Result<Addr<Delivery>, FlowError> {
        let driver_id = self
            .router
            .view()
            .scope()
            .ok_or_else(|| FlowError::BadCommand("go /delivery/<driver> first".into()))?;
        self.drivers
            .get(&driver_id)
            .cloned()
            .ok_or(FlowError::UnknownRoute(format!("/delivery/{}", driver_id)))
    }

    /// Store a manager's listing is narrowed to. Admins see every store.
    fn managed_store(&self) -> Result<Option<String>, FlowError> {
        match self.router.view() {
            RoleView::StoreManager { store_id: None, .. } => Err(FlowError::BadCommand(
                "go /store-manager/<store> first".into(),
            )),
            RoleView::StoreManager { store_id, .. } => Ok(store_id.clone()),
            _ => Ok(None),
        }
    }

    fn go(&mut self, path: &str) -> Result<String, FlowError> {
        let role = self.router.navigate(path)?;
        self.logger.debug(format!("Mounted {} view", role));
        Ok(render::help(role))
    }

    fn menu(&mut self, category: Option<String>) -> String {
        if let RoleView::Visitor { category: selected } = self.router.view_mut() {
            *selected = category.clone();
        }
        render::menu(&self.catalog, category.as_deref())
    }

    fn checkout(&mut self, store_id: String, priority: bool) -> Reply {
        if !self.catalog.store(&store_id).is_some_and(|store| store.open) {
            return reply(Err(FlowError::BadCommand(format!(
                "no open store named {}",
                store_id
            ))));
        }
        let client_id = self.client_id.clone();
        let request = match self
            .cart_mut()
            .and_then(|(cart, _)| cart.checkout(&client_id, &store_id, priority))
        {
            Ok(request) => request,
            Err(e) => return reply(Err(e)),
        };
        let items = request.items.clone();
        Box::pin(self.board.send(request).into_actor(self).map(
            move |result, act, _ctx| {
                let order = match result.map_err(unavailable).and_then(|r| r) {
                    Ok(order) => order,
                    Err(e) => {
                        // Give the items back so the client can retry.
                        if let Ok((cart, _)) = act.cart_mut() {
                            cart.items = items;
                        }
                        return Err(e);
                    }
                };
                act.my_orders.push(order.order_id);
                act.destinations.insert(order.order_id, act.home);
                if let RoleView::Client { active_order, .. } = act.router.view_mut() {
                    *active_order = Some(order.order_id);
                }
                act.logger.info(format!("Placed order {}", order.order_id));
                Ok(format!(
                    "Order placed\n{}",
                    render::order_line(&order, &act.catalog)
                ))
            },
        ))
    }

    fn track(&mut self, order_id: Option<u64>) -> Reply {
        let order_id = match (order_id, self.router.view()) {
            (Some(order_id), _) => order_id,
            (None, RoleView::Client {
                active_order: Some(order_id),
                ..
            }) => *order_id,
            _ => return reply(Err(FlowError::BadCommand("track <order>".into()))),
        };
        if self.router.role() == Role::Client && !self.my_orders.contains(&order_id) {
            return reply(Err(FlowError::OrderNotFound(order_id)));
        }
        let board = self.board.clone();
        Box::pin(
            async move {
                let order = board
                    .send(GetOrder { order_id })
                    .await
                    .map_err(unavailable)?
                    .ok_or(FlowError::OrderNotFound(order_id))?;
                let task = board
                    .send(GetDeliveryTask { order_id })
                    .await
                    .map_err(unavailable)?;
                Ok::<_, FlowError>((order, task))
            }
            .into_actor(self)
            .map(|result, act, _ctx| {
                let (order, task) = result?;
                let mut screen = render::order_line(&order, &act.catalog);
                if let Some(task) = task {
                    screen.push('\n');
                    screen.push_str(&render::task(&task));
                }
                Ok(screen)
            }),
        )
    }

    fn orders(&mut self, status: Option<KitchenStatus>) -> Reply {
        let store_id = match self.managed_store() {
            Ok(store_id) => store_id,
            Err(e) => return reply(Err(e)),
        };
        if let RoleView::Admin { filter } | RoleView::StoreManager { filter, .. } =
            self.router.view_mut()
        {
            *filter = status;
        }
        Box::pin(
            self.board
                .send(GetOrders { status, store_id })
                .into_actor(self)
                .map(|result, act, _ctx| {
                    let orders = result.map_err(unavailable)?;
                    Ok(render::orders(&orders, &act.catalog))
                }),
        )
    }

    fn assign(&mut self, order_id: u64, driver_id: String) -> Reply {
        let Some(driver) = self.drivers.get(&driver_id).cloned() else {
            return reply(Err(FlowError::BadCommand(format!(
                "unknown driver {}",
                driver_id
            ))));
        };
        let store_id = match self.managed_store() {
            Ok(store_id) => store_id,
            Err(e) => return reply(Err(e)),
        };
        let client_position = *self
            .destinations
            .entry(order_id)
            .or_insert_with(|| self.generator.client_position());
        let board = self.board.clone();
        Box::pin(
            async move {
                let order = board
                    .send(GetOrder { order_id })
                    .await
                    .map_err(unavailable)?
                    .ok_or(FlowError::OrderNotFound(order_id))?;
                if store_id.is_some_and(|store_id| store_id != order.store_id) {
                    return Err(FlowError::OrderNotFound(order_id));
                }
                driver
                    .send(TakeOrder {
                        order_id,
                        client_position,
                    })
                    .await
                    .map_err(unavailable)?
            }
            .into_actor(self)
            .map(|result, act, _ctx| {
                let task = result?;
                act.logger.info(format!(
                    "Order {} assigned to {}",
                    task.order_id(),
                    task.driver_id
                ));
                Ok(render::task(&task))
            }),
        )
    }

    fn queue(&mut self) -> Reply {
        let kitchen = match self.kitchen() {
            Ok(kitchen) => kitchen,
            Err(e) => return reply(Err(e)),
        };
        Box::pin(
            kitchen
                .send(GetKitchenView)
                .into_actor(self)
                .map(|result, act, _ctx| {
                    let view = result.map_err(unavailable)??;
                    Ok(render::kitchen(&view, &act.catalog))
                }),
        )
    }

    fn next(&mut self, order_id: u64) -> Reply {
        let kitchen = match self.kitchen() {
            Ok(kitchen) => kitchen,
            Err(e) => return reply(Err(e)),
        };
        if let RoleView::Kitchen { selected_order, .. } = self.router.view_mut() {
            *selected_order = Some(order_id);
        }
        Box::pin(
            kitchen
                .send(PressNext { order_id })
                .into_actor(self)
                .map(|result, act, _ctx| {
                    let order = result.map_err(unavailable)??;
                    Ok(render::order_line(&order, &act.catalog))
                }),
        )
    }

    fn check(&mut self, order_id: u64, check: String) -> Reply {
        let kitchen = match self.kitchen() {
            Ok(kitchen) => kitchen,
            Err(e) => return reply(Err(e)),
        };
        Box::pin(
            kitchen
                .send(TickQualityCheck { order_id, check })
                .into_actor(self)
                .map(|result, _act, _ctx| {
                    let order = result.map_err(unavailable)??;
                    let missing = order.checklist.missing();
                    Ok(if missing.is_empty() {
                        format!("Order {} passed every check", order.order_id)
                    } else {
                        format!("Order {} still missing: {}", order.order_id, missing.join(", "))
                    })
                }),
        )
    }

    fn status(&mut self) -> Reply {
        let driver = match self.driver() {
            Ok(driver) => driver,
            Err(e) => return reply(Err(e)),
        };
        let board = self.board.clone();
        Box::pin(
            async move {
                let state = driver.send(GetDriverState).await.map_err(unavailable)?;
                let task = match state.current_order {
                    Some(order_id) => board
                        .send(GetDeliveryTask { order_id })
                        .await
                        .map_err(unavailable)?,
                    None => None,
                };
                Ok::<_, FlowError>((state, task))
            }
            .into_actor(self)
            .map(|result, act, _ctx| {
                let (state, task) = result?;
                if let RoleView::Delivery {
                    active_task,
                    online,
                    ..
                } = act.router.view_mut()
                {
                    *active_task = state.current_order;
                    *online = state.online;
                }
                let mut screen = render::driver(&state);
                if let Some(task) = task {
                    screen.push('\n');
                    screen.push_str(&render::task(&task));
                }
                Ok(screen)
            }),
        )
    }

    fn set_online(&mut self, online: bool) -> Reply {
        let driver = match self.driver() {
            Ok(driver) => driver,
            Err(e) => return reply(Err(e)),
        };
        Box::pin(
            driver
                .send(SetOnline(online))
                .into_actor(self)
                .map(move |result, act, _ctx| {
                    result.map_err(unavailable)?;
                    if let RoleView::Delivery { online: shown, .. } = act.router.view_mut() {
                        *shown = online;
                    }
                    Ok(if online {
                        "Online, waiting for orders".to_string()
                    } else {
                        "Offline".to_string()
                    })
                }),
        )
    }

    fn drive(&mut self) -> Reply {
        let driver = match self.driver() {
            Ok(driver) => driver,
            Err(e) => return reply(Err(e)),
        };
        Box::pin(
            driver
                .send(StartDriving)
                .into_actor(self)
                .map(|result, act, _ctx| {
                    let task = result.map_err(unavailable)??;
                    if let RoleView::Delivery { active_task, .. } = act.router.view_mut() {
                        *active_task = Some(task.order_id());
                    }
                    Ok(render::task(&task))
                }),
        )
    }

    fn confirm(&mut self, photo: Option<String>, signature: Option<String>) -> Reply {
        let driver = match self.driver() {
            Ok(driver) => driver,
            Err(e) => return reply(Err(e)),
        };
        Box::pin(
            driver
                .send(ConfirmArrival { photo, signature })
                .into_actor(self)
                .map(|result, act, _ctx| {
                    let completed = result.map_err(unavailable)??;
                    if let RoleView::Delivery { active_task, .. } = act.router.view_mut() {
                        *active_task = None;
                    }
                    Ok(format!(
                        "Order {} delivered, proof {}",
                        completed.order_id, completed.proof.capture_id
                    ))
                }),
        )
    }
}

impl Actor for App {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.board.do_send(Subscribe {
            recipient: ctx.address().recipient(),
        });
        self.logger
            .info(format!("Welcome, {}! Type help to see what you can do.", self.client_id));
    }
}

impl Handler<RunCommand> for App {
    type Result = ResponseActFuture<Self, Result<String, FlowError>>;

    fn handle(&mut self, msg: RunCommand, _ctx: &mut Self::Context) -> Self::Result {
        let command = msg.0;
        if let Some(action) = command.action() {
            if let Err(e) = self.router.authorize(action) {
                return reply(Err(e));
            }
        }
        match command {
            Command::Go(path) => reply(self.go(&path)),
            Command::Help => reply(Ok(render::help(self.router.role()))),
            Command::Quit => reply(Ok("Bye!".to_string())),
            Command::Menu(category) => reply(Ok(self.menu(category))),
            Command::Add {
                product_id,
                quantity,
            } => reply(self.cart_mut().and_then(|(cart, catalog)| {
                cart.add(catalog, &product_id, quantity)?;
                Ok(render::cart(cart, catalog))
            })),
            Command::Remove(product_id) => reply(self.cart_mut().map(|(cart, catalog)| {
                cart.remove(&product_id);
                render::cart(cart, catalog)
            })),
            Command::Cart => reply(
                self.cart_mut()
                    .map(|(cart, catalog)| render::cart(cart, catalog)),
            ),
            Command::Checkout { store_id, priority } => self.checkout(store_id, priority),
            Command::Track(order_id) => self.track(order_id),
            Command::Orders(status) => self.orders(status),
            Command::Assign {
                order_id,
                driver_id,
            } => self.assign(order_id, driver_id),
            Command::Queue => self.queue(),
            Command::Next(order_id) => self.next(order_id),
            Command::Check { order_id, check } => self.check(order_id, check),
            Command::Status => self.status(),
            Command::Online(online) => self.set_online(online),
            Command::Drive => self.drive(),
            Command::Confirm { photo, signature } => self.confirm(photo, signature),
        }
    }
}

impl Handler<GetRole> for App {
    type Result = MessageResult<GetRole>;

    fn handle(&mut self, _msg: GetRole, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.router.role())
    }
}

impl Handler<BoardNotification> for App {
    type Result = ();

    fn handle(&mut self, msg: BoardNotification, _ctx: &mut Self::Context) -> Self::Result {
        let order_id = msg.event.order_id();
        if !self.my_orders.contains(&order_id) {
            return;
        }
        match msg.event {
            BoardEvent::OrderAdvanced { to, .. } => self
                .logger
                .info(format!("Your order {} is now {}", order_id, to)),
            BoardEvent::DriverAssigned { driver_id, .. } => self
                .logger
                .info(format!("{} is picking up your order {}", driver_id, order_id)),
            BoardEvent::DeliveryAdvanced { to, .. } => self
                .logger
                .info(format!("Delivery of order {}: {}", order_id, to)),
            BoardEvent::DeliveryCompleted(_) => self
                .logger
                .info(format!("Order {} delivered, enjoy!", order_id)),
            BoardEvent::OrderCreated { .. } | BoardEvent::CheckTicked { .. } => {}
        }
    }
}
