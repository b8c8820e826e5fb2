/// Cadence at which the oven reports its countdown.
pub const OVEN_TICK_MILLIS: u64 = 1000;
/// Base baking time of any order, in seconds.
pub const BASE_OVEN_SECONDS: u64 = 6;
/// Extra baking time per ordered unit, in seconds.
pub const OVEN_SECONDS_PER_ITEM: u64 = 2;
/// Upper bound for a single bake.
pub const MAX_OVEN_SECONDS: u64 = 30;

/// Cadence of the simulated driver movement.
pub const DRIVE_TICK_MILLIS: u64 = 1500;
/// Distance covered by a driver on every movement tick.
pub const DRIVER_KM_PER_TICK: f32 = 0.5;
/// Average driver speed used to estimate arrival times.
pub const DRIVER_SPEED_KM_PER_HOUR: f32 = 24.0;

/// Interval between simulated incoming orders.
pub const ORDER_ARRIVAL_MILLIS: u64 = 3000;

/// Seed used by the fixtures when none is configured.
pub const DEFAULT_FIXTURE_SEED: u64 = 42;
/// Scale of the 2D map positions are drawn on, in km.
pub const COORDINATE_SCALE: f32 = 10.0;

/// Checks every order has to pass before leaving `quality_check`.
pub const QUALITY_CHECKS: [&str; 4] = [
    "temperature",
    "presentation",
    "order_complete",
    "sealed_packaging",
];
