// src/resolver.rs
//! Word resolution: exact lookup, operator-picked suggestion, or registration.
//!
//! Lookup and ranking are pure; every decision that needs a human goes through the
//! [`Operator`]. Registration persists first and only then updates the in-memory
//! lexicon, so a failed write never leaves the two out of step.

use crate::config::ScoreRange;
use crate::lexicon::{Lexicon, LexiconEntry, LexiconStore};
use crate::operator::{is_affirmative, Operator, Prompt};
use crate::ranker::{rank, RankerParams};
use crate::telemetry::anon_hash;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

/// How a word that was already in the lexicon got matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Exact,
    Suggestion,
}

/// Outcome of resolving one word.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Hit {
        key: String,
        role_tag: String,
        sentiment: Option<f64>,
        via: HitKind,
    },
    Registered {
        key: String,
        role_tag: String,
        sentiment: f64,
    },
    Declined {
        lexeme: String,
    },
}

/// The `(key, role tag, sentiment)` triple carried into aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedWord {
    pub key: String,
    pub role_tag: String,
    pub sentiment: Option<f64>,
}

impl Resolution {
    fn hit(key: &str, entry: &LexiconEntry, via: HitKind) -> Self {
        Resolution::Hit {
            key: key.to_string(),
            role_tag: entry.role_tag.clone(),
            sentiment: entry.sentiment,
            via,
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, Resolution::Declined { .. })
    }

    pub fn resolved(&self) -> Option<ResolvedWord> {
        match self {
            Resolution::Hit {
                key,
                role_tag,
                sentiment,
                ..
            } => Some(ResolvedWord {
                key: key.clone(),
                role_tag: role_tag.clone(),
                sentiment: *sentiment,
            }),
            Resolution::Registered {
                key,
                role_tag,
                sentiment,
            } => Some(ResolvedWord {
                key: key.clone(),
                role_tag: role_tag.clone(),
                sentiment: Some(*sentiment),
            }),
            Resolution::Declined { .. } => None,
        }
    }
}

pub struct Resolver<'a> {
    store: &'a dyn LexiconStore,
    operator: &'a mut dyn Operator,
    params: RankerParams,
    score_range: ScoreRange,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a dyn LexiconStore, operator: &'a mut dyn Operator) -> Self {
        Self {
            store,
            operator,
            params: RankerParams::default(),
            score_range: ScoreRange::default(),
        }
    }

    pub fn with_params(mut self, params: RankerParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_score_range(mut self, range: ScoreRange) -> Self {
        self.score_range = range;
        self
    }

    /// Resolve `lexeme` against `lexicon`, asking the operator when it is unknown.
    /// A registered word is written to the store and then added to `lexicon`.
    pub fn resolve(&mut self, lexeme: &str, lexicon: &mut Lexicon) -> Result<Resolution> {
        let key = lexeme.to_lowercase();
        let id = anon_hash(&key);

        if let Some(entry) = lexicon.get(&key) {
            debug!(word = %id, "exact lexicon hit");
            return Ok(Resolution::hit(&key, entry, HitKind::Exact));
        }

        let suggestions = rank(&key, lexicon.keys(), &self.params);
        debug!(word = %id, suggestions = suggestions.len(), "unknown word");
        let answer = self.operator.answer(&Prompt::ChooseSuggestion {
            lexeme,
            suggestions: &suggestions,
        })?;

        if let Some(chosen) = suggestions.select(&answer) {
            if let Some(entry) = lexicon.get(chosen) {
                self.operator.inform(&format!("selected: {chosen}"));
                return Ok(Resolution::hit(chosen, entry, HitKind::Suggestion));
            }
        }

        let confirm = self
            .operator
            .answer(&Prompt::ConfirmRegistration { lexeme })?;
        if !is_affirmative(&confirm) {
            debug!(word = %id, "registration declined");
            return Ok(Resolution::Declined {
                lexeme: lexeme.to_string(),
            });
        }

        let role_tag = self.operator.answer(&Prompt::RoleTag { lexeme })?;
        let sentiment = self.ask_score(lexeme)?;
        let entry = LexiconEntry::new(role_tag.trim(), Some(sentiment));

        let mut addition = Lexicon::new();
        addition.insert(&key, entry.clone());
        self.store
            .merge_write(&addition)
            .with_context(|| format!("registering lexeme {id}"))?;
        lexicon.insert(&key, entry.clone());

        info!(word = %id, role_tag = %entry.role_tag, sentiment, "lexeme registered");
        self.operator.inform(&format!(
            "new lexeme registered: {key} -> role tag: {}, sentiment: {}",
            entry.role_tag, sentiment
        ));
        Ok(Resolution::Registered {
            key,
            role_tag: entry.role_tag,
            sentiment,
        })
    }

    fn ask_score(&mut self, lexeme: &str) -> Result<f64> {
        let mut retry = false;
        loop {
            let answer = self.operator.answer(&Prompt::SentimentScore {
                lexeme,
                range: self.score_range,
                retry,
            })?;
            match answer.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => return Ok(v),
                _ if self.operator.exhausted() => {
                    bail!("operator input ended while waiting for a sentiment score")
                }
                _ => retry = true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::MemoryStore;
    use crate::operator::ScriptedOperator;

    fn seed() -> Lexicon {
        [
            ("hola", "SALUDO", Some(1.0)),
            ("gracias", "DESPEDIDA", Some(2.0)),
            ("problema", "PALABRA", Some(-2.0)),
            ("cedula", "IDENTIFICACION_CLIENTE", None),
        ]
        .into_iter()
        .map(|(k, t, s)| (k.to_string(), LexiconEntry::new(t, s)))
        .collect()
    }

    struct FailingStore;

    impl LexiconStore for FailingStore {
        fn load_all(&self) -> Result<Lexicon> {
            Ok(Lexicon::new())
        }
        fn merge_write(&self, _entries: &Lexicon) -> Result<()> {
            bail!("disk full")
        }
    }

    #[test]
    fn exact_hit_asks_nothing() {
        let store = MemoryStore::default();
        let mut op = ScriptedOperator::default();
        let mut lex = seed();
        let got = Resolver::new(&store, &mut op)
            .resolve("HOLA", &mut lex)
            .unwrap();
        assert_eq!(
            got,
            Resolution::Hit {
                key: "hola".into(),
                role_tag: "SALUDO".into(),
                sentiment: Some(1.0),
                via: HitKind::Exact,
            }
        );
        assert!(op.asked().is_empty());
    }

    #[test]
    fn numbered_choice_picks_a_suggestion() {
        let store = MemoryStore::default();
        let mut op = ScriptedOperator::new(["1"]);
        let mut lex = seed();
        let got = Resolver::new(&store, &mut op)
            .resolve("Holaa", &mut lex)
            .unwrap();
        match got {
            Resolution::Hit { key, via, .. } => {
                assert_eq!(key, "hola");
                assert_eq!(via, HitKind::Suggestion);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(lex, seed());
        assert_eq!(op.messages(), ["selected: hola"]);
    }

    #[test]
    fn out_of_range_choice_falls_through_to_registration() {
        let store = MemoryStore::default();
        let mut op = ScriptedOperator::new(["42", "n"]);
        let mut lex = seed();
        let got = Resolver::new(&store, &mut op)
            .resolve("xyz", &mut lex)
            .unwrap();
        assert!(got.is_declined());
        assert_eq!(op.asked().len(), 2);
        assert!(op.asked()[1].contains("register 'xyz' as new?"));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn registration_retries_unparsable_scores() {
        let store = MemoryStore::default();
        let mut op = ScriptedOperator::new(["", "s", " T ", "mucho", "inf", "NaN", "2.5"]);
        let mut lex = seed();
        let got = Resolver::new(&store, &mut op)
            .resolve("xyz", &mut lex)
            .unwrap();
        assert_eq!(
            got,
            Resolution::Registered {
                key: "xyz".into(),
                role_tag: "T".into(),
                sentiment: 2.5,
            }
        );
        // "mucho" does not parse; "inf" and "NaN" parse but are not finite
        assert_eq!(op.asked().len(), 7);
        assert!(!op.asked()[3].starts_with("please enter a valid number."));
        for retry in &op.asked()[4..] {
            assert!(retry.starts_with("please enter a valid number."));
        }
        assert_eq!(lex.get("xyz"), Some(&LexiconEntry::new("T", Some(2.5))));
        assert_eq!(
            store.snapshot().get("xyz"),
            Some(&LexiconEntry::new("T", Some(2.5)))
        );
    }

    #[test]
    fn failed_write_leaves_the_lexicon_untouched() {
        let store = FailingStore;
        let mut op = ScriptedOperator::new(["", "y", "T", "1"]);
        let mut lex = seed();
        let err = Resolver::new(&store, &mut op)
            .resolve("xyz", &mut lex)
            .unwrap_err();
        assert!(format!("{err:#}").contains("disk full"));
        assert!(!lex.contains("xyz"));
    }

    #[test]
    fn running_out_of_answers_at_the_score_prompt_is_an_error() {
        let store = MemoryStore::default();
        let mut op = ScriptedOperator::new(["", "y", "T"]);
        let mut lex = seed();
        let err = Resolver::new(&store, &mut op)
            .resolve("xyz", &mut lex)
            .unwrap_err();
        assert!(err.to_string().contains("sentiment score"));
        assert!(!lex.contains("xyz"));
    }
}
