// src/protocol.rs
//! Service-protocol compliance: greeting, customer identification, prohibited
//! language, farewell.
//!
//! Phrases come from the lexicon itself (entries whose role tag names a phase), so a
//! word registered during the run counts for the check on the same transcript.

use crate::lexicon::Lexicon;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolPhase {
    Greeting,
    CustomerIdentification,
    ProhibitedLanguage,
    Farewell,
}

impl ProtocolPhase {
    pub const ALL: [ProtocolPhase; 4] = [
        ProtocolPhase::Greeting,
        ProtocolPhase::CustomerIdentification,
        ProtocolPhase::ProhibitedLanguage,
        ProtocolPhase::Farewell,
    ];

    /// Role tag that marks a lexicon entry as a phrase of this phase.
    pub fn role_tag(&self) -> &'static str {
        match self {
            ProtocolPhase::Greeting => "SALUDO",
            ProtocolPhase::CustomerIdentification => "IDENTIFICACION_CLIENTE",
            ProtocolPhase::ProhibitedLanguage => "NO_PERMITIDA",
            ProtocolPhase::Farewell => "DESPEDIDA",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.role_tag().eq_ignore_ascii_case(tag))
    }
}

/// Phrases per phase, lower-cased.
#[derive(Debug, Clone, Default)]
pub struct ProtocolPhrases {
    phrases: BTreeMap<ProtocolPhase, Vec<String>>,
}

impl ProtocolPhrases {
    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        let mut phrases: BTreeMap<ProtocolPhase, Vec<String>> = BTreeMap::new();
        for (key, entry) in lexicon.iter() {
            if let Some(phase) = ProtocolPhase::from_tag(&entry.role_tag) {
                phrases.entry(phase).or_default().push(key.to_lowercase());
            }
        }
        Self { phrases }
    }

    pub fn for_phase(&self, phase: ProtocolPhase) -> &[String] {
        self.phrases.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Scan `text` for each phase. A phase is present when any of its phrases occurs
    /// as a substring of the normalized transcript.
    pub fn check(&self, text: &str) -> ProtocolCheck {
        let haystack = normalize(text);
        let found = |phase: ProtocolPhase| {
            self.for_phase(phase).iter().any(|p| {
                let needle = normalize(p);
                !needle.is_empty() && haystack.contains(needle.as_str())
            })
        };
        ProtocolCheck {
            greeting: found(ProtocolPhase::Greeting),
            customer_identification: found(ProtocolPhase::CustomerIdentification),
            prohibited_language: found(ProtocolPhase::ProhibitedLanguage),
            farewell: found(ProtocolPhase::Farewell),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolCheck {
    pub greeting: bool,
    pub customer_identification: bool,
    pub prohibited_language: bool,
    pub farewell: bool,
}

impl ProtocolCheck {
    /// Greeting, identification and farewell present; no prohibited language.
    pub fn is_compliant(&self) -> bool {
        self.greeting && self.customer_identification && self.farewell && !self.prohibited_language
    }
}

// lowercase + condensed whitespace
fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconEntry;

    fn lexicon(rows: &[(&str, &str)]) -> Lexicon {
        rows.iter()
            .map(|(k, t)| (k.to_string(), LexiconEntry::new(*t, None)))
            .collect()
    }

    #[test]
    fn tags_match_case_insensitively() {
        assert_eq!(ProtocolPhase::from_tag(" saludo "), Some(ProtocolPhase::Greeting));
        assert_eq!(
            ProtocolPhase::from_tag("No_Permitida"),
            Some(ProtocolPhase::ProhibitedLanguage)
        );
        assert_eq!(ProtocolPhase::from_tag("PALABRA"), None);
    }

    #[test]
    fn phrases_are_grouped_by_phase() {
        let phrases = ProtocolPhrases::from_lexicon(&lexicon(&[
            ("hola", "SALUDO"),
            ("buenos dias", "saludo"),
            ("gracias", "DESPEDIDA"),
            ("problema", "PALABRA"),
        ]));
        assert_eq!(
            phrases.for_phase(ProtocolPhase::Greeting),
            ["buenos dias", "hola"]
        );
        assert_eq!(phrases.for_phase(ProtocolPhase::Farewell), ["gracias"]);
        assert!(phrases
            .for_phase(ProtocolPhase::CustomerIdentification)
            .is_empty());
    }

    #[test]
    fn compliant_call() {
        let phrases = ProtocolPhrases::from_lexicon(&lexicon(&[
            ("buenos dias", "SALUDO"),
            ("cedula", "IDENTIFICACION_CLIENTE"),
            ("gracias por llamar", "DESPEDIDA"),
            ("idiota", "NO_PERMITIDA"),
        ]));
        let check = phrases.check(
            "Buenos   dias, me da su cedula por favor.\nGracias\tpor llamar.",
        );
        assert!(check.greeting);
        assert!(check.customer_identification);
        assert!(check.farewell);
        assert!(!check.prohibited_language);
        assert!(check.is_compliant());
    }

    #[test]
    fn rude_call_is_flagged() {
        let phrases = ProtocolPhrases::from_lexicon(&lexicon(&[
            ("hola", "SALUDO"),
            ("idiota", "NO_PERMITIDA"),
        ]));
        let check = phrases.check("Usted es un IDIOTA");
        assert!(!check.greeting);
        assert!(check.prohibited_language);
        assert!(!check.is_compliant());
    }
}
