use actix::prelude::*;
use board::{OrderArrivals, OrderBoard};
use colored::Color;
use common::config::SimulationConfig;
use common::fixtures::{OrderGenerator, seeded_catalog};
use common::logger::Logger;
use common::messages::{GetDeliveryTask, GetOrders};
use common::types::delivery_status::DeliveryStatus;
use common::types::kitchen_status::KitchenStatus;
use delivery::Delivery;
use delivery::messages::{ConfirmArrival, StartDriving, TakeOrder};
use kitchen::{Chef, Kitchen};
use std::env;
use tokio::signal::ctrl_c;
use tokio::time::sleep;

#[actix::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <driver_id> [config.json]", args[0]);
        std::process::exit(1);
    }
    let config = match SimulationConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let catalog = seeded_catalog(config.fixture_seed);
    let Some(driver) = catalog.driver(&args[1]).cloned() else {
        let known: Vec<&str> = catalog.drivers.iter().map(|d| d.id.as_str()).collect();
        eprintln!("Unknown driver {}. Known drivers: {}", args[1], known.join(", "));
        std::process::exit(1);
    };

    let board = OrderBoard::new(config.clone()).start();
    for store in &catalog.stores {
        let kitchen = Kitchen::new(store.id.clone(), board.clone(), config.clone()).start();
        Chef::new(format!("{} cook", store.name), kitchen, config.oven_tick * 2)
            .with_verbose(config.verbose)
            .start();
    }
    let mut generator = OrderGenerator::new(config.fixture_seed, catalog);
    let destinations: Vec<(f32, f32)> = (0..64).map(|_| generator.client_position()).collect();
    OrderArrivals::new(generator, board.clone(), config.clone(), None).start();
    let logger = Logger::new(format!("Shift {}", driver.id), Color::Blue).with_verbose(config.verbose);
    let driver = Delivery::new(driver, board.clone(), config.clone()).start();

    let shift = async move {
        let mut trip = 0usize;
        loop {
            sleep(config.drive_tick).await;
            let Ok(ready) = board
                .send(GetOrders {
                    status: Some(KitchenStatus::Ready),
                    store_id: None,
                })
                .await
            else {
                break;
            };
            for order in ready {
                let destination = destinations[trip % destinations.len()];
                if driver
                    .send(TakeOrder {
                        order_id: order.order_id,
                        client_position: destination,
                    })
                    .await
                    .is_ok_and(|taken| taken.is_ok())
                {
                    trip += 1;
                    match driver.send(StartDriving).await {
                        Ok(Ok(task)) => logger.info(format!(
                            "Driving order {} ({:.1} km, ETA {} min)",
                            task.order_id(),
                            task.distance_remaining_km,
                            task.eta_minutes
                        )),
                        Ok(Err(e)) => {
                            logger.error(format!("Cannot leave with order {}: {}", order.order_id, e));
                            return;
                        }
                        Err(e) => {
                            logger.error(format!("Driver stopped: {}", e));
                            return;
                        }
                    }
                    while let Ok(Some(task)) = board
                        .send(GetDeliveryTask {
                            order_id: order.order_id,
                        })
                        .await
                    {
                        if task.status != DeliveryStatus::Driving {
                            break;
                        }
                        sleep(config.drive_tick).await;
                    }
                    match driver
                        .send(ConfirmArrival {
                            photo: Some(format!("order-{}.jpg", order.order_id)),
                            signature: None,
                        })
                        .await
                    {
                        Ok(Ok(completed)) => {
                            logger.info(format!("Order {} delivered", completed.order_id))
                        }
                        Ok(Err(e)) => logger.warn(format!(
                            "Order {} not confirmed: {}",
                            order.order_id, e
                        )),
                        Err(e) => {
                            logger.error(format!("Driver stopped: {}", e));
                            return;
                        }
                    }
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = shift => {}
        _ = ctrl_c() => {
            println!("Ctrl-C received, shutting down...");
        }
    }
    Ok(())
}
