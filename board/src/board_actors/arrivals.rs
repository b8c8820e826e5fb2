use crate::board_actors::order_board::OrderBoard;
use actix::prelude::*;
use colored::Color;
use common::config::SimulationConfig;
use common::fixtures::OrderGenerator;
use common::logger::Logger;

/// Simulates clients checking out on a fixed cadence.
pub struct OrderArrivals {
    pub generator: OrderGenerator,
    pub board: Addr<OrderBoard>,
    pub config: SimulationConfig,
    /// Stops after this many orders, `None` keeps going.
    pub remaining: Option<usize>,
    pub logger: Logger,
}

impl OrderArrivals {
    pub fn new(
        generator: OrderGenerator,
        board: Addr<OrderBoard>,
        config: SimulationConfig,
        limit: Option<usize>,
    ) -> Self {
        Self {
            generator,
            board,
            logger: Logger::new("Arrivals", Color::Cyan).with_verbose(config.verbose),
            config,
            remaining: limit,
        }
    }

    fn push_next(&mut self, ctx: &mut Context<Self>) {
        if self.remaining == Some(0) {
            ctx.stop();
            return;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        let request = self.generator.next_request();
        self.logger
            .debug(format!("Client {} checks out at {}", request.client_id, request.store_id));
        let logger = self.logger.clone();
        self.board
            .send(request)
            .into_actor(self)
            .map(move |result, _act, _ctx| match result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => logger.warn(format!("Order rejected: {}", e)),
                Err(e) => logger.error(format!("Board unreachable: {}", e)),
            })
            .wait(ctx);
    }
}

impl Actor for OrderArrivals {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.logger.info("Order arrivals started.");
        self.push_next(ctx);
        ctx.run_interval(self.config.order_arrival, |act, ctx| act.push_next(ctx));
    }
}
