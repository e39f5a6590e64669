// src/report.rs
//! Final call report: sentiment aggregate plus protocol check.

use crate::protocol::ProtocolCheck;
use crate::resolver::ResolvedWord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Positive,
    Negative,
    Neutral,
}

impl Verdict {
    pub fn from_total(total: f64) -> Self {
        if total > 0.0 {
            Verdict::Positive
        } else if total < 0.0 {
            Verdict::Negative
        } else {
            Verdict::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Positive => "Positive",
            Verdict::Negative => "Negative",
            Verdict::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredWord {
    pub key: String,
    pub score: f64,
}

/// Aggregate over the words that carry a sentiment score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub total: f64,
    pub verdict: Verdict,
    pub scored_words: usize,
    pub positive_words: usize,
    pub negative_words: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_positive: Option<ScoredWord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_negative: Option<ScoredWord>,
}

impl SentimentSummary {
    /// `None` when no word has a score. Extremes keep the first occurrence on ties.
    pub fn from_words(words: &[ResolvedWord]) -> Option<Self> {
        let mut total = 0.0;
        let mut scored_words = 0;
        let mut positive_words = 0;
        let mut negative_words = 0;
        let mut most_positive: Option<ScoredWord> = None;
        let mut most_negative: Option<ScoredWord> = None;

        for w in words {
            let Some(score) = w.sentiment else { continue };
            total += score;
            scored_words += 1;
            if score > 0.0 {
                positive_words += 1;
                if most_positive.as_ref().map_or(true, |m| score > m.score) {
                    most_positive = Some(ScoredWord {
                        key: w.key.clone(),
                        score,
                    });
                }
            } else if score < 0.0 {
                negative_words += 1;
                if most_negative.as_ref().map_or(true, |m| score < m.score) {
                    most_negative = Some(ScoredWord {
                        key: w.key.clone(),
                        score,
                    });
                }
            }
        }

        if scored_words == 0 {
            return None;
        }
        Some(Self {
            total,
            verdict: Verdict::from_total(total),
            scored_words,
            positive_words,
            negative_words,
            most_positive,
            most_negative,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub token_count: usize,
    pub word_count: usize,
    pub resolved: Vec<ResolvedWord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registered: Vec<String>,
    pub declined: Vec<String>,
    pub sentiment: Option<SentimentSummary>,
    pub protocol: ProtocolCheck,
}

impl Report {
    pub fn with_transcript(mut self, name: impl Into<String>) -> Self {
        self.transcript = Some(name.into());
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n================== FINAL REPORT ==================");
        if let Some(t) = &self.transcript {
            let _ = writeln!(out, "Transcript: {t}");
        }

        let _ = writeln!(out, "\n1. Sentiment detection:");
        match &self.sentiment {
            Some(s) => {
                let _ = writeln!(out, "Overall sentiment: {} ({:+.1})", s.verdict.label(), s.total);
                let _ = writeln!(out, "Positive words: {}", s.positive_words);
                if let Some(m) = &s.most_positive {
                    let _ = writeln!(out, "Most positive word: {}, {:+}", m.key, m.score);
                }
                let _ = writeln!(out, "Negative words: {}", s.negative_words);
                if let Some(m) = &s.most_negative {
                    let _ = writeln!(out, "Most negative word: {}, {}", m.key, m.score);
                }
            }
            None => {
                let _ = writeln!(out, "No sentiment-scored words detected.");
            }
        }

        let p = &self.protocol;
        let _ = writeln!(out, "\n2. Service protocol check:");
        let _ = writeln!(out, "Greeting phase: {}", ok_missing(p.greeting));
        let _ = writeln!(
            out,
            "Customer identification: {}",
            ok_missing(p.customer_identification)
        );
        let _ = writeln!(
            out,
            "Prohibited language: {}",
            if p.prohibited_language {
                "Detected"
            } else {
                "None detected"
            }
        );
        let _ = writeln!(out, "Courteous farewell: {}", ok_missing(p.farewell));

        if !self.registered.is_empty() {
            let _ = writeln!(out, "\nNew lexicon entries: {}", self.registered.join(", "));
        }
        let _ = writeln!(out, "\n==================================================");
        out
    }
}

fn ok_missing(present: bool) -> &'static str {
    if present {
        "OK"
    } else {
        "Missing"
    }
}
