//! Quest definition structures
//!
//! The assembled, immutable form of a quest block, plus the small closed
//! vocabularies of the source format: instruction keywords, dialog say-id
//! slots, and dialog states.

use serde::Serialize;

use crate::dialog::DialogLink;

/// Number of begin-dialog slots in the source format.
pub const BEGIN_TEXT_SLOTS: usize = 5;
/// Number of end-complete / end-failure dialog slots each.
pub const END_TEXT_SLOTS: usize = 3;

/// Instruction and block keywords the assembler recognizes.
///
/// Anything else in a quest block is carried by the statement tree but
/// ignored during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestKeyword {
    SetTitle,
    SetDialog,
    Setting,
    SetCharacter,
    SetEndCharacter,
    SetBeginLevel,
    SetBeginPreviousQuest,
    SetBeginJob,
    Unrecognized,
}

impl QuestKeyword {
    pub fn from_name(name: &str) -> Self {
        match name {
            "SetTitle" => QuestKeyword::SetTitle,
            "SetDialog" => QuestKeyword::SetDialog,
            "setting" => QuestKeyword::Setting,
            "SetCharacter" => QuestKeyword::SetCharacter,
            "SetEndCharacter" => QuestKeyword::SetEndCharacter,
            "SetBeginLevel" => QuestKeyword::SetBeginLevel,
            "SetBeginPreviousQuest" => QuestKeyword::SetBeginPreviousQuest,
            "SetBeginJob" => QuestKeyword::SetBeginJob,
            _ => QuestKeyword::Unrecognized,
        }
    }

    /// Keyword as written in include files. Empty for `Unrecognized`.
    pub const fn name(self) -> &'static str {
        match self {
            QuestKeyword::SetTitle => "SetTitle",
            QuestKeyword::SetDialog => "SetDialog",
            QuestKeyword::Setting => "setting",
            QuestKeyword::SetCharacter => "SetCharacter",
            QuestKeyword::SetEndCharacter => "SetEndCharacter",
            QuestKeyword::SetBeginLevel => "SetBeginLevel",
            QuestKeyword::SetBeginPreviousQuest => "SetBeginPreviousQuest",
            QuestKeyword::SetBeginJob => "SetBeginJob",
            QuestKeyword::Unrecognized => "",
        }
    }
}

/// Bucketed destination of a `SetDialog(say_id, text_id)` instruction.
///
/// Say ids 0..=12 map onto five fixed ranges; anything outside is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSlot {
    /// Begin texts 1-5, slot index 0..=4.
    Begin(usize),
    BeginYes,
    BeginNo,
    /// End-complete texts 1-3, slot index 0..=2.
    EndComplete(usize),
    /// End-failure texts 1-3, slot index 0..=2.
    EndFailure(usize),
}

impl DialogSlot {
    pub fn from_say_id(say_id: i32) -> Option<Self> {
        match say_id {
            0..=4 => Some(DialogSlot::Begin(say_id as usize)),
            5 => Some(DialogSlot::BeginYes),
            6 => Some(DialogSlot::BeginNo),
            7..=9 => Some(DialogSlot::EndComplete(say_id as usize - 7)),
            10..=12 => Some(DialogSlot::EndFailure(say_id as usize - 10)),
            _ => None,
        }
    }
}

/// Dialog states a player/NPC quest interaction can request.
///
/// Only the negotiation states are implemented; `End` and `EndCompleted`
/// exist so their wire names round-trip, but the state machine rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestDialogState {
    Suggest,
    BeginYes,
    BeginNo,
    End,
    EndCompleted,
}

impl QuestDialogState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestDialogState::Suggest => "QUEST_SUGGEST",
            QuestDialogState::BeginYes => "QUEST_BEGIN_YES",
            QuestDialogState::BeginNo => "QUEST_BEGIN_NO",
            QuestDialogState::End => "QUEST_END",
            QuestDialogState::EndCompleted => "QUEST_END_COMPLETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "QUEST_SUGGEST" => Some(QuestDialogState::Suggest),
            "QUEST_BEGIN_YES" => Some(QuestDialogState::BeginYes),
            "QUEST_BEGIN_NO" => Some(QuestDialogState::BeginNo),
            "QUEST_END" => Some(QuestDialogState::End),
            "QUEST_END_COMPLETE" => Some(QuestDialogState::EndCompleted),
            _ => None,
        }
    }
}

/// A fully assembled quest definition.
///
/// Built once by the assembler, then published read-only through the
/// catalog. Dialog text sequences are already compacted: gaps in the source
/// slots are removed, order preserved.
#[derive(Debug, Clone, Serialize)]
pub struct QuestData {
    /// Catalog key, resolved defines-or-literal from the block name.
    pub id: i32,
    /// Raw block name as written in the source file.
    pub name: String,
    pub title: String,
    /// Character the quest starts at.
    pub start_character: Option<String>,
    /// Character the quest is turned in to.
    pub end_character: Option<String>,
    pub min_level: i32,
    pub max_level: i32,
    pub previous_quest_type: Option<i32>,
    pub previous_quest_id: Option<i32>,
    /// Job ids allowed to take the quest; `None` means no restriction.
    pub jobs: Option<Vec<i32>>,
    pub begin_texts: Vec<String>,
    pub accepted_text: Option<String>,
    pub declined_text: Option<String>,
    pub end_complete_texts: Vec<String>,
    pub end_failure_texts: Vec<String>,
    /// Suggestion entry point shown in NPC dialog menus.
    pub link: DialogLink,
}

impl QuestData {
    /// A quest with defaults for everything the `setting` and `SetDialog`
    /// passes fill in later.
    pub fn new(id: i32, name: &str, title: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            title: title.to_string(),
            start_character: None,
            end_character: None,
            min_level: 0,
            max_level: 0,
            previous_quest_type: None,
            previous_quest_id: None,
            jobs: None,
            begin_texts: Vec::new(),
            accepted_text: None,
            declined_text: None,
            end_complete_texts: Vec::new(),
            end_failure_texts: Vec::new(),
            link: DialogLink::new(QuestDialogState::Suggest.as_str(), title, Some(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        assert_eq!(QuestKeyword::from_name("SetTitle"), QuestKeyword::SetTitle);
        assert_eq!(QuestKeyword::from_name("setting"), QuestKeyword::Setting);
        assert_eq!(
            QuestKeyword::from_name("SetTeleport"),
            QuestKeyword::Unrecognized
        );
        assert_eq!(QuestKeyword::SetDialog.name(), "SetDialog");
    }

    #[test]
    fn test_dialog_slot_buckets() {
        assert_eq!(DialogSlot::from_say_id(0), Some(DialogSlot::Begin(0)));
        assert_eq!(DialogSlot::from_say_id(4), Some(DialogSlot::Begin(4)));
        assert_eq!(DialogSlot::from_say_id(5), Some(DialogSlot::BeginYes));
        assert_eq!(DialogSlot::from_say_id(6), Some(DialogSlot::BeginNo));
        assert_eq!(DialogSlot::from_say_id(7), Some(DialogSlot::EndComplete(0)));
        assert_eq!(DialogSlot::from_say_id(9), Some(DialogSlot::EndComplete(2)));
        assert_eq!(DialogSlot::from_say_id(10), Some(DialogSlot::EndFailure(0)));
        assert_eq!(DialogSlot::from_say_id(12), Some(DialogSlot::EndFailure(2)));
        assert_eq!(DialogSlot::from_say_id(13), None);
        assert_eq!(DialogSlot::from_say_id(-1), None);
    }

    #[test]
    fn test_dialog_state_strings() {
        assert_eq!(QuestDialogState::Suggest.as_str(), "QUEST_SUGGEST");
        assert_eq!(
            QuestDialogState::from_str("QUEST_BEGIN_YES"),
            Some(QuestDialogState::BeginYes)
        );
        assert_eq!(
            QuestDialogState::from_str("QUEST_END_COMPLETE"),
            Some(QuestDialogState::EndCompleted)
        );
        assert_eq!(QuestDialogState::from_str("QUEST_GIVEUP"), None);
    }

    #[test]
    fn test_new_quest_defaults() {
        let quest = QuestData::new(1001, "QUEST_FIRST", "Find the lost sword");
        assert_eq!(quest.min_level, 0);
        assert_eq!(quest.max_level, 0);
        assert!(quest.jobs.is_none());
        assert!(quest.begin_texts.is_empty());
        assert_eq!(quest.link.state, "QUEST_SUGGEST");
        assert_eq!(quest.link.text, "Find the lost sword");
        assert_eq!(quest.link.quest_id, Some(1001));
    }
}
