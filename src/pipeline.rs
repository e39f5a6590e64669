// src/pipeline.rs
//! One transcript, end to end:
//! 1) tokenize
//! 2) resolve every WORD token in order (registrations are visible to later words)
//! 3) aggregate sentiment over the resolved words
//! 4) protocol check, with phrases taken from the lexicon as it stands after step 2

use crate::lexicon::Lexicon;
use crate::protocol::ProtocolPhrases;
use crate::report::{Report, SentimentSummary};
use crate::resolver::{Resolution, ResolvedWord, Resolver};
use crate::tokenizer::{tokenize, Token};
use anyhow::Result;
use chrono::Utc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub resolutions: Vec<Resolution>,
    pub report: Report,
}

impl Analysis {
    pub fn resolved_words(&self) -> Vec<ResolvedWord> {
        self.resolutions
            .iter()
            .filter_map(Resolution::resolved)
            .collect()
    }
}

pub fn analyze(
    text: &str,
    lexicon: &mut Lexicon,
    resolver: &mut Resolver<'_>,
) -> Result<Analysis> {
    let tokens = tokenize(text);
    debug!(tokens = tokens.len(), "transcript tokenized");

    let mut resolutions = Vec::new();
    for token in tokens.iter().filter(|t| t.is_word()) {
        resolutions.push(resolver.resolve(&token.lexeme, lexicon)?);
    }

    let mut resolved = Vec::new();
    let mut registered = Vec::new();
    let mut declined = Vec::new();
    for r in &resolutions {
        match r {
            Resolution::Registered { key, .. } => registered.push(key.clone()),
            Resolution::Declined { lexeme } => declined.push(lexeme.clone()),
            Resolution::Hit { .. } => {}
        }
        if let Some(w) = r.resolved() {
            resolved.push(w);
        }
    }

    let sentiment = SentimentSummary::from_words(&resolved);
    let protocol = ProtocolPhrases::from_lexicon(lexicon).check(text);
    debug!(
        resolved = resolved.len(),
        registered = registered.len(),
        declined = declined.len(),
        "transcript analyzed"
    );

    let report = Report {
        generated_at: Utc::now(),
        transcript: None,
        token_count: tokens.len(),
        word_count: resolutions.len(),
        resolved,
        registered,
        declined,
        sentiment,
        protocol,
    };
    Ok(Analysis {
        tokens,
        resolutions,
        report,
    })
}
