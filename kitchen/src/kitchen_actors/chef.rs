use crate::kitchen_actors::kitchen::Kitchen;
use crate::messages::{GetKitchenView, KitchenView, PressNext, TickQualityCheck};
use actix::prelude::*;
use colored::Color;
use common::errors::FlowError;
use common::logger::Logger;
use common::types::kitchen_status::KitchenStatus;
use std::time::Duration;

/// Simulated cook pressing the kitchen buttons on a fixed cadence.
///
/// On every round the chef takes the first order of the queue that is not
/// in the oven, ticks its checklist when it is being checked, and presses
/// "next" on it.
pub struct Chef {
    pub name: String,
    pub kitchen: Addr<Kitchen>,
    pub pace: Duration,
    pub logger: Logger,
}

impl Chef {
    pub fn new(name: impl Into<String>, kitchen: Addr<Kitchen>, pace: Duration) -> Self {
        let name = name.into();
        Self {
            logger: Logger::new(format!("Chef {}", name), Color::Green),
            name,
            kitchen,
            pace,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.logger = self.logger.with_verbose(verbose);
        self
    }

    /// Order the chef would work on next.
    pub fn pick(view: &KitchenView) -> Option<(u64, KitchenStatus)> {
        view.queue
            .iter()
            .find(|order| view.oven_remaining(order.order_id).is_none())
            .map(|order| (order.order_id, order.status))
    }

    fn work(&mut self, ctx: &mut Context<Self>) {
        let kitchen = self.kitchen.clone();
        let logger = self.logger.clone();
        async move {
            let view = kitchen
                .send(GetKitchenView)
                .await
                .map_err(|e| FlowError::Unavailable(e.to_string()))??;
            let Some((order_id, status)) = Chef::pick(&view) else {
                return Ok(None);
            };
            if status == KitchenStatus::QualityCheck {
                for check in common::constants::QUALITY_CHECKS {
                    kitchen
                        .send(TickQualityCheck {
                            order_id,
                            check: check.to_string(),
                        })
                        .await
                        .map_err(|e| FlowError::Unavailable(e.to_string()))??;
                }
            }
            let order = kitchen
                .send(PressNext { order_id })
                .await
                .map_err(|e| FlowError::Unavailable(e.to_string()))??;
            Ok::<_, FlowError>(Some(order))
        }
        .into_actor(self)
        .map(move |result, _act, _ctx| match result {
            Ok(Some(order)) => logger.debug(format!("Order {} now {}", order.order_id, order.status)),
            Ok(None) => logger.debug("Nothing to do"),
            Err(e) => logger.warn(format!("Could not move order: {}", e)),
        })
        .wait(ctx);
    }
}

impl Actor for Chef {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.logger.info(format!("{} is cooking.", self.name));
        ctx.run_interval(self.pace, |act, ctx| act.work(ctx));
    }
}
