use crate::commands::Command;
use actix::Message;
use common::errors::FlowError;
use common::roles::Role;

/// Message sent by the prompt loop for every line the user typed.
///
/// Replies with the text of the screen to print.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<String, FlowError>")]
pub struct RunCommand(pub Command);

/// Message to read which role is mounted, for the prompt.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Role")]
pub struct GetRole;
