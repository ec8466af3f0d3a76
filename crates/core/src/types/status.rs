//! Status enums for the stylist chat.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// The shopper.
    User,
    /// The stylist model.
    Model,
}

/// Chat session request state.
///
/// At most one recommendation request is outstanding per session; a send is
/// only accepted in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingResponse,
}

impl ChatState {
    /// Whether a recommendation request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }
}
