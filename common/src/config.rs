use crate::constants::{
    BASE_OVEN_SECONDS, DEFAULT_FIXTURE_SEED, DRIVE_TICK_MILLIS, DRIVER_KM_PER_TICK,
    MAX_OVEN_SECONDS, ORDER_ARRIVAL_MILLIS, OVEN_SECONDS_PER_ITEM, OVEN_TICK_MILLIS,
};
use crate::errors::FlowError;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, DurationSeconds, serde_as};
use std::path::Path;
use std::time::Duration;

/// Knobs of the simulated timers. Every field is optional in the JSON file.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub oven_tick: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub base_oven_time: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub oven_time_per_item: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub max_oven_time: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub drive_tick: Duration,
    pub km_per_tick: f32,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub order_arrival: Duration,
    pub fixture_seed: u64,
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            oven_tick: Duration::from_millis(OVEN_TICK_MILLIS),
            base_oven_time: Duration::from_secs(BASE_OVEN_SECONDS),
            oven_time_per_item: Duration::from_secs(OVEN_SECONDS_PER_ITEM),
            max_oven_time: Duration::from_secs(MAX_OVEN_SECONDS),
            drive_tick: Duration::from_millis(DRIVE_TICK_MILLIS),
            km_per_tick: DRIVER_KM_PER_TICK,
            order_arrival: Duration::from_millis(ORDER_ARRIVAL_MILLIS),
            fixture_seed: DEFAULT_FIXTURE_SEED,
            verbose: false,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let config: SimulationConfig =
            serde_json::from_str(json).map_err(|e| FlowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| FlowError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Loads the file named by the first CLI argument after the program
    /// name that ends in `.json`, or the defaults when there is none.
    pub fn from_args(args: &[String]) -> Result<Self, FlowError> {
        match args.iter().skip(1).find(|arg| arg.ends_with(".json")) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), FlowError> {
        if self.oven_tick.is_zero() || self.drive_tick.is_zero() || self.order_arrival.is_zero() {
            return Err(FlowError::Config("tick intervals must be positive".into()));
        }
        if self.km_per_tick <= 0.0 {
            return Err(FlowError::Config("km_per_tick must be positive".into()));
        }
        Ok(())
    }

    /// Oven time for an order with `units` ordered units.
    pub fn bake_time(&self, units: u32) -> Duration {
        self.oven_time_per_item
            .checked_mul(units)
            .and_then(|per_units| self.base_oven_time.checked_add(per_units))
            .map_or(self.max_oven_time, |bake| bake.min(self.max_oven_time))
    }
}
