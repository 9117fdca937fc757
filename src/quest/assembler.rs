//! Quest assembler
//!
//! Discovers quest include files under the data directory, parses each into
//! a statement tree, and folds every top-level block into a `QuestData`
//! entry of the shared catalog. Independent files are processed concurrently;
//! the catalog map is the only shared-mutation boundary and duplicate ids
//! are dropped first-write-wins. Supports hot-reloading during development.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::data::statement::{Block, Parameter, Statement};
use crate::data::tables::{GameResources, ResourcesHandle};
use crate::data::parser;

use super::catalog::{CatalogHandle, QuestCatalog};
use super::definition::{
    DialogSlot, QuestData, QuestKeyword, BEGIN_TEXT_SLOTS, END_TEXT_SLOTS,
};

/// File name prefix of quest include files.
const QUEST_FILE_PREFIX: &str = "propQuest";
/// File extension of quest include files.
const QUEST_FILE_EXTENSION: &str = "inc";

/// Block-scoped assembly failure. The surrounding file keeps loading its
/// remaining blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("quest block '{0}' has no SetTitle instruction")]
    MissingTitle(String),
    #[error("quest block name '{0}' does not resolve to a quest id")]
    UnresolvedQuestId(String),
}

/// Builds the quest catalog from include files on disk.
pub struct QuestAssembler {
    resources: Arc<ResourcesHandle>,
    catalog: Arc<CatalogHandle>,
    data_dir: PathBuf,
}

impl QuestAssembler {
    pub fn new(
        data_dir: &Path,
        resources: Arc<ResourcesHandle>,
        catalog: Arc<CatalogHandle>,
    ) -> Self {
        Self {
            resources,
            catalog,
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// The catalog handle this assembler publishes to.
    pub fn catalog(&self) -> &Arc<CatalogHandle> {
        &self.catalog
    }

    /// Run a full load pass and publish the resulting catalog.
    ///
    /// One malformed file never blocks the others: its blocks are skipped
    /// with a warning and loading continues. Returns the number of quests
    /// published.
    pub async fn load_all(&self) -> Result<usize, String> {
        info!("Loading quests from {:?}", self.data_dir);

        if !self.data_dir.exists() {
            warn!("Quest directory does not exist: {:?}", self.data_dir);
            return Ok(0);
        }

        // The symbol tables are pinned for the whole pass; a concurrent
        // reload only affects later passes.
        let resources = self.resources.snapshot();

        let mut paths = Vec::new();
        collect_quest_files(&self.data_dir, &mut paths)?;

        // Override files sort after their shorter base file; lexicographic
        // order breaks remaining ties.
        paths.sort_by(|a, b| {
            let (a_len, b_len) = (a.as_os_str().len(), b.as_os_str().len());
            a_len.cmp(&b_len).then_with(|| a.cmp(b))
        });

        let quests: Arc<DashMap<i32, Arc<QuestData>>> = Arc::new(DashMap::new());

        let mut tasks = Vec::new();
        for path in paths {
            let resources = Arc::clone(&resources);
            let quests = Arc::clone(&quests);

            // Parsing is pure CPU work, so it runs on the blocking pool.
            tasks.push(tokio::task::spawn_blocking(move || {
                if let Err(e) = load_quest_file(&path, &resources, &quests) {
                    warn!("Failed to load quest file {:?}: {}", path, e);
                }
            }));
        }

        for task in tasks {
            if let Err(e) = task.await {
                warn!("Quest load task failed: {}", e);
            }
        }

        let count = quests.len();
        let snapshot: HashMap<i32, Arc<QuestData>> = quests
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let version = self.catalog.publish(QuestCatalog::new(snapshot));
        info!("Loaded {} quest definitions (catalog version {})", count, version);

        Ok(count)
    }

    /// Start a file watcher that reruns the load pass whenever a quest
    /// include file changes. Returns a channel signalling reload outcomes.
    pub fn start_file_watcher(
        self: &Arc<Self>,
    ) -> Result<tokio::sync::mpsc::Receiver<HotReloadEvent>, String> {
        use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
        use std::time::Duration;

        let (tx, rx) = tokio::sync::mpsc::channel(32);
        let assembler = Arc::clone(self);
        let data_dir = self.data_dir.clone();
        let rt = tokio::runtime::Handle::try_current()
            .map_err(|e| format!("File watcher needs a tokio runtime: {}", e))?;

        std::thread::spawn(move || {
            let (notify_tx, notify_rx) = std::sync::mpsc::channel();

            let mut watcher = match RecommendedWatcher::new(
                move |res: Result<notify::Event, notify::Error>| {
                    if let Ok(event) = res {
                        let _ = notify_tx.send(event);
                    }
                },
                Config::default().with_poll_interval(Duration::from_secs(1)),
            ) {
                Ok(w) => w,
                Err(e) => {
                    error!("Failed to create file watcher: {}", e);
                    return;
                }
            };

            if let Err(e) = watcher.watch(&data_dir, RecursiveMode::Recursive) {
                error!("Failed to watch quest directory: {}", e);
                return;
            }

            info!("Quest hot-reload watcher started for {:?}", data_dir);

            while let Ok(event) = notify_rx.recv() {
                use notify::EventKind;

                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }

                for path in &event.paths {
                    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                    if extension != QUEST_FILE_EXTENSION {
                        continue;
                    }

                    info!("Detected change in {:?}, triggering reload", path);

                    let assembler = Arc::clone(&assembler);
                    let tx = tx.clone();
                    let changed = path.to_string_lossy().to_string();

                    rt.spawn(async move {
                        match assembler.load_all().await {
                            Ok(_) => {
                                let _ = tx.send(HotReloadEvent::Reloaded(changed)).await;
                            }
                            Err(e) => {
                                error!("Hot-reload failed: {}", e);
                                let _ = tx.send(HotReloadEvent::Error(e)).await;
                            }
                        }
                    });
                }
            }
        });

        Ok(rx)
    }
}

/// Events from the hot-reload watcher.
#[derive(Debug, Clone)]
pub enum HotReloadEvent {
    /// A file change triggered a successful reload.
    Reloaded(String),
    /// An error occurred during reload.
    Error(String),
}

/// Recursively collect quest include files under `dir`.
fn collect_quest_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {:?}: {}", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() {
            collect_quest_files(&path, paths)?;
        } else if is_quest_file(&path) {
            paths.push(path);
        }
    }

    Ok(())
}

fn is_quest_file(path: &Path) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(QUEST_FILE_PREFIX));

    name_matches && path.extension().is_some_and(|ext| ext == QUEST_FILE_EXTENSION)
}

/// Parse one file and fold its top-level blocks into the shared map.
fn load_quest_file(
    path: &Path,
    resources: &GameResources,
    quests: &DashMap<i32, Arc<QuestData>>,
) -> Result<(), String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

    let statements = parser::parse(&content)
        .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

    for statement in &statements {
        if let Statement::Block(block) = statement {
            match assemble_quest(block, resources) {
                Ok(quest) => {
                    // Insert-if-absent: the first writer wins and a later
                    // duplicate id is dropped without note.
                    let id = quest.id;
                    quests.entry(id).or_insert_with(|| Arc::new(quest));
                }
                Err(e) => warn!("Skipping quest block in {:?}: {}", path, e),
            }
        }
    }

    Ok(())
}

/// Fold a single top-level block into a quest definition.
fn assemble_quest(block: &Block, resources: &GameResources) -> Result<QuestData, AssembleError> {
    let id = resources
        .defines
        .resolve(&block.name)
        .ok_or_else(|| AssembleError::UnresolvedQuestId(block.name.clone()))?;

    // The title is the one mandatory field.
    let title_key = block
        .instruction(QuestKeyword::SetTitle.name())
        .and_then(|instruction| instruction.text(0))
        .ok_or_else(|| AssembleError::MissingTitle(block.name.clone()))?;
    let title = resources.texts.resolve(&title_key);

    let mut quest = QuestData::new(id, &block.name, &title);

    apply_settings(&mut quest, block.block(QuestKeyword::Setting.name()), resources);
    apply_dialogs(&mut quest, block, resources);

    Ok(quest)
}

/// Apply the optional `setting` block. Each field is independently optional;
/// a missing block leaves every default in place.
fn apply_settings(quest: &mut QuestData, settings: Option<&Block>, resources: &GameResources) {
    let Some(settings) = settings else {
        warn!("Cannot find quest settings for quest '{}'", quest.title);
        return;
    };

    quest.start_character = settings
        .instruction(QuestKeyword::SetCharacter.name())
        .and_then(|instruction| instruction.text(0));
    quest.end_character = settings
        .instruction(QuestKeyword::SetEndCharacter.name())
        .and_then(|instruction| instruction.text(0));

    if let Some(levels) = settings.instruction(QuestKeyword::SetBeginLevel.name()) {
        quest.min_level = levels.integer(0).unwrap_or(0);
        quest.max_level = levels.integer(1).unwrap_or(0);
    }

    if let Some(previous) = settings.instruction(QuestKeyword::SetBeginPreviousQuest.name()) {
        quest.previous_quest_type = previous.integer(0);
        quest.previous_quest_id = previous
            .text(1)
            .and_then(|name| resources.defines.resolve(&name));
    }

    if let Some(jobs) = settings.instruction(QuestKeyword::SetBeginJob.name()) {
        let jobs: Vec<i32> = jobs
            .parameters
            .iter()
            .filter_map(|parameter| match parameter {
                Parameter::Integer(value) => Some(*value),
                Parameter::Text(name) => resources.defines.resolve(name),
            })
            .collect();

        if !jobs.is_empty() {
            quest.jobs = Some(jobs);
        }
    }
}

/// Scan the block's immediate `SetDialog` instructions and bucket each
/// resolved say id into its dialog slot. Out-of-range say ids are ignored.
fn apply_dialogs(quest: &mut QuestData, block: &Block, resources: &GameResources) {
    let mut begin: [Option<String>; BEGIN_TEXT_SLOTS] = std::array::from_fn(|_| None);
    let mut end_complete: [Option<String>; END_TEXT_SLOTS] = std::array::from_fn(|_| None);
    let mut end_failure: [Option<String>; END_TEXT_SLOTS] = std::array::from_fn(|_| None);

    for statement in &block.statements {
        let Statement::Instruction(instruction) = statement else {
            continue;
        };
        if QuestKeyword::from_name(&instruction.name) != QuestKeyword::SetDialog {
            continue;
        }

        let Some(say_key) = instruction.text(0) else {
            continue;
        };
        let Some(text_key) = instruction.text(1) else {
            continue;
        };
        let Some(say_id) = resources.defines.resolve(&say_key) else {
            continue;
        };
        let text = resources.texts.resolve(&text_key);

        match DialogSlot::from_say_id(say_id) {
            Some(DialogSlot::Begin(slot)) => begin[slot] = Some(text),
            Some(DialogSlot::BeginYes) => quest.accepted_text = Some(text),
            Some(DialogSlot::BeginNo) => quest.declined_text = Some(text),
            Some(DialogSlot::EndComplete(slot)) => end_complete[slot] = Some(text),
            Some(DialogSlot::EndFailure(slot)) => end_failure[slot] = Some(text),
            None => {}
        }
    }

    quest.begin_texts = compact(begin);
    quest.end_complete_texts = compact(end_complete);
    quest.end_failure_texts = compact(end_failure);
}

/// Drop the gaps from a sparse slot array, preserving slot order.
fn compact<const N: usize>(slots: [Option<String>; N]) -> Vec<String> {
    slots.into_iter().flatten().collect()
}
