//! Player and NPC views
//!
//! Minimal read-only views of game entities, as consumed by the quest dialog
//! state machine. The full entity state lives in the game-entity subsystem.

use std::sync::Arc;

use crate::dialog::DialogLink;
use crate::quest::QuestData;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub level: i32,
    /// Job id, matched against a quest's eligible-job set.
    pub job: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Npc {
    pub id: String,
    pub name: String,
    /// Static dialog links authored on the NPC itself.
    pub dialog_links: Vec<DialogLink>,
    /// Quests this NPC offers.
    pub quests: Vec<Arc<QuestData>>,
}
