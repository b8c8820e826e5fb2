use crate::constants::DRIVER_SPEED_KM_PER_HOUR;

/// Manhattan distance between two map positions, in km.
pub fn calculate_distance(point1: (f32, f32), point2: (f32, f32)) -> f32 {
    let dx = (point1.0 - point2.0).abs();
    let dy = (point1.1 - point2.1).abs();
    dx + dy
}

/// Minutes needed to drive `distance_km`, rounded up.
pub fn estimate_eta_minutes(distance_km: f32) -> u32 {
    if distance_km <= 0.0 {
        return 0;
    }
    (distance_km * 60.0 / DRIVER_SPEED_KM_PER_HOUR).ceil() as u32
}

/// Formats a price in cents as `$12.34`.
pub fn format_price(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

pub fn print_welcome_message() {
    println!("+------------------------------------+");
    println!("|   PEDIDOS :: order flow simulator  |");
    println!("+------------------------------------+");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_manhattan() {
        assert_eq!(calculate_distance((1.0, 1.0), (4.0, -1.0)), 5.0);
        assert_eq!(calculate_distance((2.0, 2.0), (2.0, 2.0)), 0.0);
    }

    #[test]
    fn eta_rounds_up() {
        assert_eq!(estimate_eta_minutes(0.0), 0);
        assert_eq!(estimate_eta_minutes(2.0), 5);
        assert_eq!(estimate_eta_minutes(2.1), 6);
    }

    #[test]
    fn prices_have_two_decimals() {
        assert_eq!(format_price(1205), "$12.05");
        assert_eq!(format_price(99), "$0.99");
    }
}
