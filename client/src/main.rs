use actix::prelude::*;
use board::{OrderArrivals, OrderBoard};
use client::App;
use client::commands::Command;
use client::messages::{GetRole, RunCommand};
use colored::{Color, Colorize};
use common::config::SimulationConfig;
use common::fixtures::{OrderGenerator, seeded_catalog};
use common::logger::Logger;
use common::utils::print_welcome_message;
use delivery::Delivery;
use kitchen::Kitchen;
use std::env;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::ctrl_c;

/// Orders other clients place while this terminal is open.
const BACKGROUND_ORDERS: usize = 6;

#[actix::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let client_id = args
        .get(1)
        .filter(|arg| !arg.ends_with(".json"))
        .cloned()
        .unwrap_or_else(|| "client-1".to_string());
    let config = match SimulationConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let logger = Logger::new("Terminal", Color::White).with_verbose(config.verbose);
    let catalog = seeded_catalog(config.fixture_seed);

    let board = OrderBoard::new(config.clone()).start();
    let mut app = App::new(client_id, catalog.clone(), board.clone(), &config);
    for store in &catalog.stores {
        let kitchen = Kitchen::new(store.id.clone(), board.clone(), config.clone()).start();
        app = app.with_kitchen(store.id.clone(), kitchen);
    }
    for driver in &catalog.drivers {
        let id = driver.id.clone();
        app = app.with_driver(id, Delivery::new(driver.clone(), board.clone(), config.clone()).start());
    }
    let app = app.start();
    OrderArrivals::new(
        OrderGenerator::new(config.fixture_seed.wrapping_add(1), catalog),
        board,
        config,
        Some(BACKGROUND_ORDERS),
    )
    .start();

    print_welcome_message();
    let prompt = async {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let role = app.send(GetRole).await.map_err(std::io::Error::other)?;
            print!("{} ", format!("{}>", role.path()).bold());
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                return Ok::<_, std::io::Error>(());
            };
            if line.trim().is_empty() {
                continue;
            }
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    logger.warn(format!("{}. Type help to list commands.", e));
                    continue;
                }
            };
            let quit = command == Command::Quit;
            match app.send(RunCommand(command)).await {
                Ok(Ok(screen)) => println!("{}", screen),
                Ok(Err(e)) => logger.warn(e.to_string()),
                Err(e) => {
                    logger.error(format!("App stopped: {}", e));
                    return Ok(());
                }
            }
            if quit {
                return Ok(());
            }
        }
    };

    tokio::select! {
        result = prompt => result?,
        _ = ctrl_c() => {
            println!("Ctrl-C received, shutting down...");
        }
    }
    Ok(())
}
