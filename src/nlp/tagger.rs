//! Heuristic part-of-speech tagging
//!
//! The lemmatizer works best with a POS hint. This tagger supplies one
//! without a statistical model: closed-class word tables, punctuation and
//! number detection, capitalization and common English suffixes. Languages
//! other than English only get punctuation and numeral tags; their other
//! tokens stay untagged and are lemmatized with the default category.

use crate::types::{LanguageTag, PosTag, Token};

/// A dictionary-free POS tagger
#[derive(Debug, Clone, Copy, Default)]
pub struct PosTagger {
    english: bool,
}

impl PosTagger {
    /// Create a tagger for the given language
    pub fn new(language: &LanguageTag) -> Self {
        Self {
            english: language.as_str() == "en",
        }
    }

    /// Tag every untagged token of one sentence in place.
    ///
    /// Tags supplied by the caller are kept.
    pub fn tag_sentence(&self, tokens: &mut [Token]) {
        let mut at_start = true;
        for token in tokens {
            if token.pos.is_none() {
                token.pos = self.guess(&token.text, at_start);
            }
            // Opening quotes and brackets keep the sentence-start position
            if token.is_wordlike() {
                at_start = false;
            }
        }
    }

    /// Guess the tag of one word; `None` when no heuristic applies.
    pub fn guess(&self, word: &str, sentence_start: bool) -> Option<PosTag> {
        if word.is_empty() {
            return None;
        }
        if !word.chars().any(char::is_alphanumeric) {
            return Some(if word.chars().all(is_punctuation) {
                PosTag::Punctuation
            } else {
                PosTag::Symbol
            });
        }
        if word
            .chars()
            .all(|c| c.is_numeric() || matches!(c, '.' | ',' | '%' | '-'))
        {
            return Some(PosTag::Numeral);
        }
        if !self.english {
            return None;
        }

        let lower = word.to_lowercase();
        if let Some(pos) = function_word_pos(&lower) {
            return Some(pos);
        }

        let mut chars = word.chars();
        let capitalized = chars.next().is_some_and(char::is_uppercase)
            && chars.all(|c| !c.is_uppercase());
        if capitalized && !sentence_start {
            return Some(PosTag::ProperNoun);
        }

        Some(suffix_pos(&lower))
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2018}'..='\u{201F}' | '\u{2026}' | '\u{00AB}' | '\u{00BB}' | '\u{3001}' | '\u{3002}'
        )
}

fn function_word_pos(lower: &str) -> Option<PosTag> {
    let pos = match lower {
        // Determiners
        "a" | "an" | "the" | "this" | "that" | "these" | "those" | "my" | "your" | "his"
        | "her" | "its" | "our" | "their" | "some" | "any" | "each" | "every" | "no" => {
            PosTag::Determiner
        }
        // Conjunctions
        "and" | "or" | "but" | "nor" | "so" | "yet" | "if" | "because" | "while" | "though"
        | "although" | "when" | "unless" | "until" | "since" | "whether" => PosTag::Conjunction,
        // Prepositions
        "of" | "to" | "in" | "for" | "on" | "with" | "at" | "from" | "by" | "about" | "as"
        | "into" | "like" | "through" | "after" | "over" | "between" | "out" | "against"
        | "during" | "without" | "before" | "under" | "around" | "among" => PosTag::Preposition,
        // Pronouns
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "us" | "them"
        | "myself" | "yourself" | "himself" | "herself" | "itself" | "ourselves"
        | "themselves" | "who" | "whom" | "what" | "which" => PosTag::Pronoun,
        // Auxiliaries and modals
        "am" | "is" | "are" | "was" | "were" | "be" | "been" | "being" | "has" | "have"
        | "had" | "having" | "do" | "does" | "did" | "done" | "can" | "could" | "will"
        | "would" | "shall" | "should" | "may" | "might" | "must" => PosTag::Verb,
        // Particles
        "not" | "n't" | "'s" => PosTag::Particle,
        // Interjections
        "oh" | "ah" | "wow" | "hello" | "hi" | "yes" | "ok" | "okay" => PosTag::Interjection,
        _ => return None,
    };
    Some(pos)
}

fn suffix_pos(lower: &str) -> PosTag {
    if lower.ends_with("ly") && lower.len() > 4 {
        return PosTag::Adverb;
    }
    if lower.ends_with("ing") && lower.len() > 4 || lower.ends_with("ed") && lower.len() > 3 {
        return PosTag::Verb;
    }
    if (lower.ends_with("ize") || lower.ends_with("ise")) && lower.len() > 5 {
        return PosTag::Verb;
    }
    const ADJECTIVE_SUFFIXES: [&str; 8] = ["ful", "less", "ous", "ive", "able", "ible", "al", "ic"];
    if lower.len() > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return PosTag::Adjective;
    }
    // Most remaining open-class words are nouns
    PosTag::Noun
}
