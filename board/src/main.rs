use actix::prelude::*;
use board::{OrderArrivals, OrderBoard};
use common::config::SimulationConfig;
use common::fixtures::{OrderGenerator, seeded_catalog};
use common::messages::GetSnapshot;
use std::env;
use tokio::signal::ctrl_c;

#[actix::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = match SimulationConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let board = OrderBoard::new(config.clone()).start();
    let generator = OrderGenerator::new(config.fixture_seed, seeded_catalog(config.fixture_seed));
    OrderArrivals::new(generator, board.clone(), config, None).start();

    tokio::select! {
        _ = ctrl_c() => {
            println!("Ctrl-C received, shutting down...");
        }
    }

    if let Ok(snapshot) = board.send(GetSnapshot).await {
        match serde_json::to_string_pretty(&snapshot.orders) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Unable to dump board: {}", e),
        }
    }
    Ok(())
}
