//! Quest content pipeline and NPC quest dialog for a multiplayer game server.
//!
//! The `data` layer tokenizes and parses schema-less quest include files
//! into statement trees and holds the read-only defines/texts symbol tables.
//! The `quest` layer folds parsed blocks into `QuestData`, publishes them
//! through an immutable, swappable catalog, and runs the dialog state
//! machine that lets a player negotiate quest acceptance with an NPC.
//!
//! The surrounding server owns everything else: symbol-table loading, packet
//! encoding, and player progress persistence.

pub mod data;
pub mod dialog;
pub mod entity;
pub mod quest;

pub use dialog::{DialogLink, DialogSender};
pub use entity::{Npc, Player};
pub use quest::{CatalogHandle, QuestAssembler, QuestCatalog, QuestData, QuestSystem};
