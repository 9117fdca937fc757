//! Quest System Module
//!
//! Assembles quest definitions from schema-less include files into a
//! published catalog, and drives the NPC quest dialog state machine.

pub mod assembler;
pub mod catalog;
pub mod definition;
pub mod system;

pub use assembler::{AssembleError, HotReloadEvent, QuestAssembler};
pub use catalog::{CatalogHandle, QuestCatalog};
pub use definition::{DialogSlot, QuestData, QuestDialogState, QuestKeyword};
pub use system::QuestSystem;
