use actix::prelude::*;
use board::{OrderArrivals, OrderBoard};
use common::config::SimulationConfig;
use common::fixtures::{OrderGenerator, seeded_catalog};
use kitchen::{Chef, Kitchen};
use std::env;
use tokio::signal::ctrl_c;

#[actix::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <store_id> [config.json]", args[0]);
        std::process::exit(1);
    }
    let store_id = args[1].clone();
    let config = match SimulationConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let catalog = seeded_catalog(config.fixture_seed);
    if catalog.store(&store_id).is_none() {
        let known: Vec<&str> = catalog.stores.iter().map(|s| s.id.as_str()).collect();
        eprintln!("Unknown store {}. Known stores: {}", store_id, known.join(", "));
        std::process::exit(1);
    }

    let board = OrderBoard::new(config.clone()).start();
    let kitchen = Kitchen::new(store_id, board.clone(), config.clone()).start();
    Chef::new("Lucía", kitchen, config.oven_tick * 2)
        .with_verbose(config.verbose)
        .start();
    OrderArrivals::new(
        OrderGenerator::new(config.fixture_seed, catalog),
        board,
        config,
        None,
    )
    .start();

    tokio::select! {
        _ = ctrl_c() => {
            println!("Ctrl-C received, shutting down...");
        }
    }
    Ok(())
}
