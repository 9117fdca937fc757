//! NPC dialog primitives
//!
//! Conversation-graph links and the delivery collaborator the quest dialog
//! state machine emits through. Wire encoding is owned by the collaborator,
//! not by this crate.

use serde::Serialize;

use crate::entity::Player;

/// Fixed button labels and link keys shared by every dialog menu.
pub mod constants {
    pub const YES: &str = "Yes";
    pub const NO: &str = "No";
    pub const OK: &str = "Ok";
    /// Link key that closes the dialog window client-side.
    pub const BYE: &str = "BYE";
}

/// An edge in the conversation graph: which dialog state the link jumps to,
/// the label shown to the player, and the quest it refers to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogLink {
    pub state: String,
    pub text: String,
    pub quest_id: Option<i32>,
}

impl DialogLink {
    pub fn new(state: &str, text: &str, quest_id: Option<i32>) -> Self {
        Self {
            state: state.to_string(),
            text: text.to_string(),
            quest_id,
        }
    }
}

/// Delivery collaborator for composed dialog content.
///
/// Implementations own packet encoding and transport; the quest system only
/// hands over ordered texts, the link menu, and the answer buttons.
pub trait DialogSender: Send + Sync {
    fn send_dialog(
        &self,
        player: &Player,
        texts: &[String],
        links: &[DialogLink],
        buttons: &[DialogLink],
        quest_id: i32,
    );
}
