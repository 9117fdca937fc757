//! Quest dialog state machine
//!
//! Drives the multi-turn negotiation between a player and an NPC over a
//! quest: eligibility checks, suggestion menus, and the accept/decline
//! answers. All composed content goes out through the `DialogSender`
//! collaborator; nothing here touches player progress.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::dialog::{constants, DialogLink, DialogSender};
use crate::entity::{Npc, Player};

use super::definition::{QuestData, QuestDialogState};

pub struct QuestSystem {
    sender: Arc<dyn DialogSender>,
}

impl QuestSystem {
    pub fn new(sender: Arc<dyn DialogSender>) -> Self {
        Self { sender }
    }

    /// Extension point for setting up a player's quest state on login.
    /// Progress persistence lives outside this crate.
    pub fn initialize(&self, _player: &Player) {}

    /// Whether `player` is eligible to start `quest`: level within the
    /// inclusive range, and job in the quest's job set when one is declared.
    pub fn can_start_quest(&self, player: &Player, quest: &QuestData) -> bool {
        if player.level < quest.min_level || player.level > quest.max_level {
            warn!(
                "Cannot start quest '{}' (id: {}) for player '{}': level too low or too high",
                quest.title, quest.id, player.name
            );
            return false;
        }

        if let Some(jobs) = &quest.jobs {
            if !jobs.contains(&player.job) {
                warn!(
                    "Cannot start quest '{}' (id: {}) for player '{}': invalid job",
                    quest.title, quest.id, player.name
                );
                return false;
            }
        }

        true
    }

    /// Handle one dialog interaction. Unknown states are logged and dropped;
    /// nothing is sent and nothing is raised to the caller.
    pub fn process_quest(
        &self,
        player: &Player,
        npc: &Npc,
        quest: &QuestData,
        state: QuestDialogState,
    ) {
        match state {
            QuestDialogState::Suggest => {
                debug!("Suggest quest '{}' to '{}'", quest.title, player.name);
                self.suggest_quest(player, npc, quest);
            }
            QuestDialogState::BeginYes => self.accept_quest(player, npc, quest),
            QuestDialogState::BeginNo => self.decline_quest(player, npc, quest),
            state => error!("Received unknown dialog quest state: {:?}", state),
        }
    }

    /// The NPC's link menu: its static links followed by one suggestion link
    /// per held quest the player can still start.
    fn npc_links(&self, player: &Player, npc: &Npc) -> Vec<DialogLink> {
        let mut links = npc.dialog_links.clone();
        links.extend(
            npc.quests
                .iter()
                .filter(|quest| self.can_start_quest(player, quest))
                .map(|quest| quest.link.clone()),
        );
        links
    }

    fn suggest_quest(&self, player: &Player, npc: &Npc, quest: &QuestData) {
        let links = self.npc_links(player, npc);
        let buttons = vec![
            DialogLink::new(
                QuestDialogState::BeginYes.as_str(),
                constants::YES,
                Some(quest.id),
            ),
            DialogLink::new(
                QuestDialogState::BeginNo.as_str(),
                constants::NO,
                Some(quest.id),
            ),
        ];

        self.sender
            .send_dialog(player, &quest.begin_texts, &links, &buttons, quest.id);
    }

    fn accept_quest(&self, player: &Player, npc: &Npc, quest: &QuestData) {
        let links = self.npc_links(player, npc);
        let buttons = vec![DialogLink::new(constants::BYE, constants::OK, None)];
        let texts: Vec<String> = quest.accepted_text.clone().into_iter().collect();

        self.sender
            .send_dialog(player, &texts, &links, &buttons, quest.id);

        // TODO: record the acceptance in the player's quest diary once the
        // progress store exists.
    }

    fn decline_quest(&self, player: &Player, npc: &Npc, quest: &QuestData) {
        let links = self.npc_links(player, npc);
        let buttons = vec![DialogLink::new(constants::BYE, constants::OK, None)];
        let texts: Vec<String> = quest.declined_text.clone().into_iter().collect();

        self.sender
            .send_dialog(player, &texts, &links, &buttons, quest.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct SentDialog {
        texts: Vec<String>,
        links: Vec<DialogLink>,
        buttons: Vec<DialogLink>,
        quest_id: i32,
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<SentDialog>>,
    }

    impl RecordingSender {
        fn take(&self) -> Vec<SentDialog> {
            std::mem::take(&mut *self.sent.lock().unwrap())
        }
    }

    impl DialogSender for RecordingSender {
        fn send_dialog(
            &self,
            _player: &Player,
            texts: &[String],
            links: &[DialogLink],
            buttons: &[DialogLink],
            quest_id: i32,
        ) {
            self.sent.lock().unwrap().push(SentDialog {
                texts: texts.to_vec(),
                links: links.to_vec(),
                buttons: buttons.to_vec(),
                quest_id,
            });
        }
    }

    fn player(level: i32, job: i32) -> Player {
        Player {
            id: "p1".to_string(),
            name: "Tester".to_string(),
            level,
            job,
        }
    }

    fn sample_quest() -> QuestData {
        let mut quest = QuestData::new(1001, "1001", "Find the lost sword");
        quest.min_level = 10;
        quest.max_level = 20;
        quest.begin_texts = vec!["Will you help?".to_string()];
        quest.accepted_text = Some("Thank you!".to_string());
        quest.declined_text = Some("Too bad.".to_string());
        quest
    }

    fn system() -> (QuestSystem, Arc<RecordingSender>) {
        let sender = Arc::new(RecordingSender::default());
        (QuestSystem::new(sender.clone()), sender)
    }

    #[test]
    fn test_can_start_quest_level_boundaries() {
        let (system, _) = system();
        let quest = sample_quest();

        assert!(system.can_start_quest(&player(10, 0), &quest));
        assert!(system.can_start_quest(&player(20, 0), &quest));
        assert!(system.can_start_quest(&player(15, 0), &quest));
        assert!(!system.can_start_quest(&player(9, 0), &quest));
        assert!(!system.can_start_quest(&player(21, 0), &quest));
    }

    #[test]
    fn test_can_start_quest_job_set() {
        let (system, _) = system();
        let mut quest = sample_quest();
        quest.jobs = Some(vec![2, 3]);

        assert!(system.can_start_quest(&player(15, 2), &quest));
        assert!(!system.can_start_quest(&player(15, 1), &quest));

        // No declared job set means no job restriction.
        quest.jobs = None;
        assert!(system.can_start_quest(&player(15, 1), &quest));
    }

    #[test]
    fn test_suggest_emits_texts_and_answer_menu() {
        let (system, sender) = system();
        let quest = Arc::new(sample_quest());
        let npc = Npc {
            id: "npc1".to_string(),
            name: "Peddler".to_string(),
            dialog_links: vec![DialogLink::new("SHOP", "Show me your wares", None)],
            quests: vec![quest.clone()],
        };

        system.process_quest(&player(15, 0), &npc, &quest, QuestDialogState::Suggest);

        let sent = sender.take();
        assert_eq!(sent.len(), 1);
        let dialog = &sent[0];

        assert_eq!(dialog.quest_id, 1001);
        assert_eq!(dialog.texts, vec!["Will you help?"]);

        // Static NPC links first, then the eligible quest's suggestion link.
        assert_eq!(dialog.links.len(), 2);
        assert_eq!(dialog.links[0].state, "SHOP");
        assert_eq!(dialog.links[1], quest.link);

        // Two answer buttons, both tagged with the quest id.
        assert_eq!(dialog.buttons.len(), 2);
        assert_eq!(dialog.buttons[0].state, "QUEST_BEGIN_YES");
        assert_eq!(dialog.buttons[0].text, constants::YES);
        assert_eq!(dialog.buttons[0].quest_id, Some(1001));
        assert_eq!(dialog.buttons[1].state, "QUEST_BEGIN_NO");
        assert_eq!(dialog.buttons[1].quest_id, Some(1001));
    }

    #[test]
    fn test_suggest_filters_ineligible_quests_from_menu() {
        let (system, sender) = system();
        let offered = Arc::new(sample_quest());
        let mut high_level = QuestData::new(2002, "2002", "Slay the dragon");
        high_level.min_level = 90;
        high_level.max_level = 99;
        let npc = Npc {
            quests: vec![offered.clone(), Arc::new(high_level)],
            ..Npc::default()
        };

        system.process_quest(&player(15, 0), &npc, &offered, QuestDialogState::Suggest);

        let sent = sender.take();
        let dialog = &sent[0];
        assert_eq!(dialog.links.len(), 1);
        assert_eq!(dialog.links[0].quest_id, Some(1001));
    }

    #[test]
    fn test_begin_yes_emits_accepted_text_with_ok_button() {
        let (system, sender) = system();
        let quest = sample_quest();
        let npc = Npc::default();

        system.process_quest(&player(15, 0), &npc, &quest, QuestDialogState::BeginYes);

        let sent = sender.take();
        let dialog = &sent[0];
        assert_eq!(dialog.texts, vec!["Thank you!"]);
        assert_eq!(dialog.buttons.len(), 1);
        assert_eq!(dialog.buttons[0].state, constants::BYE);
        assert_eq!(dialog.buttons[0].text, constants::OK);
        assert_eq!(dialog.quest_id, 1001);
    }

    #[test]
    fn test_begin_no_emits_decline_text_with_ok_button() {
        let (system, sender) = system();
        let quest = sample_quest();
        let npc = Npc::default();

        system.process_quest(&player(15, 0), &npc, &quest, QuestDialogState::BeginNo);

        let sent = sender.take();
        let dialog = &sent[0];
        assert_eq!(dialog.texts, vec!["Too bad."]);
        assert_eq!(dialog.buttons.len(), 1);
        assert_eq!(dialog.buttons[0].state, constants::BYE);
    }

    #[test]
    fn test_unknown_state_sends_nothing() {
        let (system, sender) = system();
        let quest = sample_quest();
        let npc = Npc::default();
        let player = player(15, 0);

        system.process_quest(&player, &npc, &quest, QuestDialogState::End);
        system.process_quest(&player, &npc, &quest, QuestDialogState::EndCompleted);

        assert!(sender.take().is_empty());
    }

    #[test]
    fn test_initialize_is_a_no_op() {
        let (system, sender) = system();
        system.initialize(&player(15, 0));
        assert!(sender.take().is_empty());
    }
}
