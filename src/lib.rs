// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod distance;
pub mod lexicon;
pub mod operator;
pub mod pipeline;
pub mod protocol;
pub mod ranker;
pub mod report;
pub mod resolver;
pub mod telemetry;
pub mod tokenizer;

// ---- Re-exports for stable public API ----
pub use crate::config::AnalyzerConfig;
pub use crate::distance::{levenshtein, padded_hamming};
pub use crate::lexicon::{JsonFileStore, Lexicon, LexiconEntry, LexiconStore, MemoryStore};
pub use crate::operator::{
    ConsoleOperator, DeclineAll, LineEditorOperator, Operator, Prompt, ScriptedOperator,
};
pub use crate::pipeline::{analyze, Analysis};
pub use crate::protocol::{ProtocolCheck, ProtocolPhase, ProtocolPhrases};
pub use crate::ranker::{rank, RankerParams, SuggestionList};
pub use crate::report::{Report, SentimentSummary, Verdict};
pub use crate::resolver::{HitKind, Resolution, ResolvedWord, Resolver};
pub use crate::tokenizer::{tokenize, Token, TokenKind};
