use common::errors::FlowError;
use common::roles::Action;
use common::types::kitchen_status::KitchenStatus;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Mounts the view for a path, e.g. `go /kitchen/store-centro`.
    Go(String),
    Menu(Option<String>),
    Add { product_id: String, quantity: u32 },
    Remove(String),
    Cart,
    Checkout { store_id: String, priority: bool },
    Track(Option<u64>),
    Orders(Option<KitchenStatus>),
    Assign { order_id: u64, driver_id: String },
    Queue,
    Next(u64),
    Check { order_id: u64, check: String },
    Status,
    Online(bool),
    Drive,
    Confirm {
        photo: Option<String>,
        signature: Option<String>,
    },
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, FlowError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(FlowError::BadCommand(String::new()));
        };
        let args: Vec<&str> = words.collect();
        let bad = || FlowError::BadCommand(line.trim().to_string());

        let command = match (verb, args.as_slice()) {
            ("go", [path]) => Command::Go(path.to_string()),
            ("menu", []) => Command::Menu(None),
            ("menu", [category]) => Command::Menu(Some(category.to_string())),
            ("add", [product_id]) => Command::Add {
                product_id: product_id.to_string(),
                quantity: 1,
            },
            ("add", [product_id, quantity]) => Command::Add {
                product_id: product_id.to_string(),
                quantity: quantity.parse().map_err(|_| bad())?,
            },
            ("remove", [product_id]) => Command::Remove(product_id.to_string()),
            ("cart", []) => Command::Cart,
            ("checkout", [store_id]) => Command::Checkout {
                store_id: store_id.to_string(),
                priority: false,
            },
            ("checkout", [store_id, "priority"]) => Command::Checkout {
                store_id: store_id.to_string(),
                priority: true,
            },
            ("track", []) => Command::Track(None),
            ("track", [order_id]) => Command::Track(Some(parse_id(order_id).ok_or_else(bad)?)),
            ("orders", []) => Command::Orders(None),
            ("orders", [status]) => {
                Command::Orders(Some(KitchenStatus::parse(status).ok_or_else(bad)?))
            }
            ("assign", [order_id, driver_id]) => Command::Assign {
                order_id: parse_id(order_id).ok_or_else(bad)?,
                driver_id: driver_id.to_string(),
            },
            ("queue", []) => Command::Queue,
            ("next", [order_id]) => Command::Next(parse_id(order_id).ok_or_else(bad)?),
            ("check", [order_id, check]) => Command::Check {
                order_id: parse_id(order_id).ok_or_else(bad)?,
                check: check.to_string(),
            },
            ("status", []) => Command::Status,
            ("online", []) => Command::Online(true),
            ("offline", []) => Command::Online(false),
            ("drive", []) => Command::Drive,
            ("confirm", rest) if rest.len() <= 2 => Command::Confirm {
                photo: rest.first().map(|s| s.to_string()),
                signature: rest.get(1).map(|s| s.to_string()),
            },
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(bad()),
        };
        Ok(command)
    }

    /// Action the mounted role must be allowed to perform, if any.
    pub fn action(&self) -> Option<Action> {
        match self {
            Command::Go(_) | Command::Help | Command::Quit => None,
            Command::Menu(_) => Some(Action::BrowseMenu),
            Command::Add { .. } | Command::Remove(_) | Command::Cart => Some(Action::EditCart),
            Command::Checkout { .. } => Some(Action::Checkout),
            Command::Track(_) => Some(Action::TrackOrder),
            Command::Orders(_) => Some(Action::ViewAllOrders),
            Command::Assign { .. } => Some(Action::AssignDriver),
            Command::Queue | Command::Next(_) => Some(Action::AdvanceOrder),
            Command::Check { .. } => Some(Action::TickCheck),
            Command::Status | Command::Online(_) | Command::Drive => Some(Action::AdvanceDelivery),
            Command::Confirm { .. } => Some(Action::ConfirmDelivery),
        }
    }
}

fn parse_id(word: &str) -> Option<u64> {
    word.trim_start_matches('#').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            Command::parse("add faina 2"),
            Ok(Command::Add {
                product_id: "faina".into(),
                quantity: 2
            })
        );
        assert_eq!(
            Command::parse("  checkout store-boedo priority "),
            Ok(Command::Checkout {
                store_id: "store-boedo".into(),
                priority: true
            })
        );
        assert_eq!(Command::parse("next #7"), Ok(Command::Next(7)));
        assert_eq!(
            Command::parse("orders quality_check"),
            Ok(Command::Orders(Some(KitchenStatus::QualityCheck)))
        );
        assert_eq!(
            Command::parse("confirm door.jpg"),
            Ok(Command::Confirm {
                photo: Some("door.jpg".into()),
                signature: None
            })
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            Command::parse("add faina many"),
            Err(FlowError::BadCommand("add faina many".into()))
        );
        assert!(Command::parse("orders burnt").is_err());
        assert!(Command::parse("next").is_err());
        assert!(Command::parse("").is_err());
    }

    #[test]
    fn navigation_needs_no_permission() {
        assert_eq!(Command::Go("/admin".into()).action(), None);
        assert_eq!(Command::Drive.action(), Some(Action::AdvanceDelivery));
        assert_eq!(Command::Queue.action(), Some(Action::AdvanceOrder));
    }
}
