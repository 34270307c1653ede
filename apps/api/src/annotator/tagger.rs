//! Rule-based tagger behind the production annotator.
//!
//! Works from a TSV lexicon artifact mapping terms to part-of-speech tags
//! (`det`, `adj`, `noun`, `propn`, `verb`, `adv`, `pron`, `adp`, `conj`,
//! `num`) or entity labels (`ent:org`, `ent:product`, `ent:gpe`,
//! `ent:work_of_art`, `ent:person`). Out-of-lexicon tokens get a tag from
//! suffix and shape heuristics. Noun phrases follow a fixed chunk grammar;
//! entities come from gazetteer lookups plus a proper-noun fallback. The
//! output is noisy in the way statistical taggers are noisy, and the
//! extraction layer downstream is built to tolerate that.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use unicode_segmentation::UnicodeSegmentation;

use super::{Annotation, Entity, EntityLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Determiner,
    Adjective,
    Noun,
    ProperNoun,
    Verb,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Number,
}

impl PosTag {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "det" => Some(PosTag::Determiner),
            "adj" => Some(PosTag::Adjective),
            "noun" => Some(PosTag::Noun),
            "propn" => Some(PosTag::ProperNoun),
            "verb" => Some(PosTag::Verb),
            "adv" => Some(PosTag::Adverb),
            "pron" => Some(PosTag::Pronoun),
            "adp" => Some(PosTag::Preposition),
            "conj" => Some(PosTag::Conjunction),
            "num" => Some(PosTag::Number),
            _ => None,
        }
    }
}

pub struct RuleTagger {
    /// Lowercased term to part-of-speech tag.
    pos: HashMap<String, PosTag>,
    /// Lowercased, whitespace-normalized phrase to entity label.
    gazetteer: HashMap<String, EntityLabel>,
    /// Longest gazetteer phrase in words, bounds the lookahead.
    gazetteer_max_words: usize,
}

impl RuleTagger {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading tagger lexicon at {}", path.display()))?;
        Self::from_lexicon(&contents)
    }

    /// Parses the TSV lexicon. Blank lines, `#` comments, lines without a
    /// tab, and unknown tags are skipped; a lexicon with no usable entries
    /// at all is rejected.
    pub fn from_lexicon(contents: &str) -> Result<Self> {
        let mut pos = HashMap::new();
        let mut gazetteer = HashMap::new();
        let mut gazetteer_max_words = 0;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((term, tag)) = line.split_once('\t') else {
                continue;
            };
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                continue;
            }
            let tag = tag.trim();
            if let Some(label) = EntityLabel::parse(tag) {
                let words: Vec<&str> = term.split_whitespace().collect();
                gazetteer_max_words = gazetteer_max_words.max(words.len());
                gazetteer.insert(words.join(" "), label);
            } else if let Some(pos_tag) = PosTag::parse(tag) {
                pos.insert(term, pos_tag);
            }
        }

        if pos.is_empty() && gazetteer.is_empty() {
            bail!("lexicon contains no usable entries");
        }
        Ok(RuleTagger { pos, gazetteer, gazetteer_max_words })
    }

    /// Tags and chunks the text sentence by sentence. Entities and noun
    /// phrases never span a sentence boundary.
    pub fn annotate_text(&self, text: &str) -> Annotation {
        let mut annotation = Annotation::default();
        for sentence in text.unicode_sentences() {
            let tokens: Vec<&str> = sentence.unicode_words().collect();
            if tokens.is_empty() {
                continue;
            }
            let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
            let tags: Vec<PosTag> = tokens
                .iter()
                .zip(&lowered)
                .map(|(token, lower)| self.tag_token(token, lower))
                .collect();

            self.collect_entities(&tokens, &lowered, &tags, &mut annotation.entities);
            collect_noun_phrases(&tokens, &tags, &mut annotation.noun_phrases);
        }
        annotation
    }

    fn tag_token(&self, token: &str, lowered: &str) -> PosTag {
        self.pos
            .get(lowered)
            .copied()
            .unwrap_or_else(|| heuristic_tag(token))
    }

    /// Gazetteer phrases first (longest match wins), then maximal runs of
    /// proper nouns as organizations. Single all-caps tokens land here via
    /// the acronym shape heuristic.
    fn collect_entities(
        &self,
        tokens: &[&str],
        lowered: &[String],
        tags: &[PosTag],
        out: &mut Vec<Entity>,
    ) {
        let mut i = 0;
        while i < tokens.len() {
            if let Some((len, label)) = self.gazetteer_match(lowered, i) {
                out.push(Entity { text: tokens[i..i + len].join(" "), label });
                i += len;
                continue;
            }
            if tags[i] == PosTag::ProperNoun {
                let mut j = i + 1;
                while j < tokens.len()
                    && tags[j] == PosTag::ProperNoun
                    && self.gazetteer_match(lowered, j).is_none()
                {
                    j += 1;
                }
                out.push(Entity {
                    text: tokens[i..j].join(" "),
                    label: EntityLabel::Organization,
                });
                i = j;
                continue;
            }
            i += 1;
        }
    }

    fn gazetteer_match(&self, lowered: &[String], start: usize) -> Option<(usize, EntityLabel)> {
        let max = self.gazetteer_max_words.min(lowered.len() - start);
        for len in (1..=max).rev() {
            let candidate = lowered[start..start + len].join(" ");
            if let Some(label) = self.gazetteer.get(&candidate) {
                return Some((len, *label));
            }
        }
        None
    }
}

/// Chunk grammar: an optional determiner, any adjectives or numbers, then
/// at least one noun or proper noun. A standalone pronoun is its own chunk.
fn collect_noun_phrases(tokens: &[&str], tags: &[PosTag], out: &mut Vec<String>) {
    let mut i = 0;
    while i < tokens.len() {
        if tags[i] == PosTag::Pronoun {
            out.push(tokens[i].to_string());
            i += 1;
            continue;
        }
        let start = i;
        let mut j = i;
        if tags[j] == PosTag::Determiner {
            j += 1;
        }
        while j < tokens.len() && matches!(tags[j], PosTag::Adjective | PosTag::Number) {
            j += 1;
        }
        let noun_start = j;
        while j < tokens.len() && matches!(tags[j], PosTag::Noun | PosTag::ProperNoun) {
            j += 1;
        }
        if j > noun_start {
            out.push(tokens[start..j].join(" "));
            i = j;
        } else {
            i = start + 1;
        }
    }
}

fn heuristic_tag(token: &str) -> PosTag {
    if token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return PosTag::Number;
    }
    if is_acronym(token) || is_title_case(token) {
        return PosTag::ProperNoun;
    }
    let lower = token.to_lowercase();
    if lower.ends_with("ly") {
        return PosTag::Adverb;
    }
    if lower.ends_with("ing") || lower.ends_with("ed") {
        return PosTag::Verb;
    }
    if lower.ends_with("ous") || lower.ends_with("ful") || lower.ends_with("ive") {
        return PosTag::Adjective;
    }
    PosTag::Noun
}

fn is_acronym(token: &str) -> bool {
    let len = token.chars().count();
    (2..=6).contains(&len) && token.chars().all(|c| c.is_ascii_uppercase())
}

fn is_title_case(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| c.is_lowercase() || c.is_numeric()),
        _ => false,
    }
}

// ──────────────────────────── Tests ────────────────────────────
