//! Shared test doubles: scripted chat model, bag-of-words embedder, fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use gamebuddy::agent::ModelRequester;
use gamebuddy::errors::{AgentError, Result};
use gamebuddy::models::ChatModel;
use gamebuddy::steamdb::{Embedder, GameRecord, SteamDbManager};
use gamebuddy::tools::implementations::builtin;
use gamebuddy::tools::{ToolCatalog, ToolRegistry, ToolsDispatcher};
use gamebuddy::types::ConversationTurn;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Chat model replaying a fixed list of replies, then repeating the fallback
pub struct ScriptedModel {
    replies: Mutex<Vec<Value>>,
    fallback: Option<Value>,
    calls: AtomicUsize,
    transcripts: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Value>) -> Self {
        let mut replies = replies;
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            fallback: None,
            calls: AtomicUsize::new(0),
            transcripts: Mutex::new(Vec::new()),
        }
    }

    /// Model that answers every call with `reply`
    pub fn always(reply: Value) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Transcript sent with each call
    pub fn transcripts(&self) -> Vec<Vec<ConversationTurn>> {
        self.transcripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, messages: &[ConversationTurn]) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transcripts.lock().unwrap().push(messages.to_vec());

        let next = self.replies.lock().unwrap().pop();
        next.or_else(|| self.fallback.clone())
            .ok_or_else(|| AgentError::ModelServiceError("script exhausted".to_string()))
    }
}

/// Chat-completion envelope around `content`
pub fn completion(content: &str) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

/// Deterministic embedder: hashed bag of words over the text after the
/// first line, so a document and a query with the same body embed alike
pub struct BagOfWordsEmbedder {
    pub dimension: usize,
}

impl Default for BagOfWordsEmbedder {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

fn fnv1a(word: &str) -> u64 {
    word.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

#[async_trait]
impl Embedder for BagOfWordsEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = text.split_once('\n').map_or(text, |(_, rest)| rest);
        let mut vector = vec![0f32; self.dimension];
        for word in body
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = (fnv1a(&word.to_lowercase()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        Ok(vector)
    }
}

/// Embedder whose service is always down
pub struct DownEmbedder;

#[async_trait]
impl Embedder for DownEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(AgentError::EmbeddingServiceError(
            "connection refused".to_string(),
        ))
    }
}

pub fn game(name: &str, description: &str, tags: &str, genres: &str, popularity: u64) -> GameRecord {
    GameRecord {
        name: name.to_string(),
        description: description.to_string(),
        tags: tags.to_string(),
        genres: genres.to_string(),
        popularity,
    }
}

/// Small catalog in exported JSON form; three rows are filtered out
pub fn catalog_json() -> Value {
    json!([
        {"name": "Stardew Valley", "description": "A cozy farming life sim with crafting.", "tags": "Farming Sim, Cozy", "genres": "Indie, RPG", "stsp_owners": 30000000},
        {"name": "Hades", "description": "A fast roguelike dungeon crawler set in the underworld of Greek mythology.", "tags": "Roguelike, Action", "genres": "Action, Indie", "stsp_owners": 8000000},
        {"name": "Obscure Gem", "description": "A tiny puzzle game.", "tags": "Puzzle", "genres": "Indie", "stsp_owners": 1200},
        {"name": "Subnautica", "description": "Explore an alien <b>underwater</b> world &amp; survive.", "tags": "Survival, Open World", "genres": "Adventure", "stsp_owners": 9000000},
        {"name": "No Description", "description": "", "tags": "Action", "genres": "Action", "stsp_owners": 500000},
        {"name": "Factorio", "description": "Build and automate factories on an alien planet.", "tags": "Automation, Base Building", "genres": "Simulation, Strategy", "stsp_owners": 4000000},
        {"name": "Threshold", "description": "Exactly at the cutoff.", "tags": "", "genres": "", "stsp_owners": 35000},
        {"name": "Hollow Knight", "description": "A hand-drawn metroidvania through a ruined insect kingdom.", "tags": "Metroidvania, Souls-like", "genres": "Action, Adventure", "stsp_owners": 7000000}
    ])
}

/// Index over the retained records of `catalog_json`
pub async fn steamdb() -> Arc<SteamDbManager> {
    let dir = tempfile::TempDir::new().unwrap();
    let catalog = dir.path().join("steamdb.json");
    std::fs::write(&catalog, catalog_json().to_string()).unwrap();

    let db = SteamDbManager::load(
        &catalog,
        &dir.path().join("embeddings.bin"),
        Arc::new(BagOfWordsEmbedder::default()),
        2,
    )
    .await
    .unwrap();
    Arc::new(db)
}

/// Tool catalog listing every built-in tool
pub fn tool_catalog() -> ToolCatalog {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/tools.json");
    ToolCatalog::load(&path).unwrap()
}

/// Dispatcher over the real built-in tools
pub async fn dispatcher() -> ToolsDispatcher {
    let tools = builtin(steamdb().await, "http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
    let catalog = tool_catalog();
    let registry = ToolRegistry::resolve(&catalog, tools);
    ToolsDispatcher::new(catalog, registry)
}

/// Requester over the built-in tools and a scripted model
pub async fn requester(model: Arc<ScriptedModel>) -> ModelRequester {
    ModelRequester::new(model, Arc::new(dispatcher().await))
}
