//! Unicode-aware tokenization
//!
//! Word boundaries follow UAX #29; sentence boundaries use a punctuation
//! heuristic with a per-language abbreviation list. Both are best-effort:
//! no input text is ever rejected.

use crate::errors::{NormalizeError, Result};
use crate::nlp::STAGE_TOKENIZE;
use crate::resources::LinguisticResources;
use crate::types::{Document, Sentence, Token};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

// ============================================================================
// Rules
// ============================================================================

/// Language-specific segmentation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerRules {
    /// Words that may be followed by a period without ending the sentence.
    /// Stored lower-case, without the trailing period.
    #[serde(default)]
    pub abbreviations: FxHashSet<String>,
    /// Abbreviations that only count as such before a number (`No. 5`,
    /// `Fig. 3`, `Jan. 12`). Elsewhere they are ordinary words.
    #[serde(default)]
    pub numeral_abbreviations: FxHashSet<String>,
    /// One-letter words that are never initials (`I`, `a`)
    #[serde(default)]
    pub single_letter_words: FxHashSet<String>,
    /// Keep `don't` as one token instead of `do` + `n't`
    #[serde(default = "default_true")]
    pub keep_contractions: bool,
    /// Keep `state-of-the-art` as one token
    #[serde(default = "default_true")]
    pub keep_hyphenated: bool,
    /// Suffixes split off when `keep_contractions` is false (e.g. `n't`, `'s`)
    #[serde(default)]
    pub contraction_suffixes: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for TokenizerRules {
    fn default() -> Self {
        Self {
            abbreviations: FxHashSet::default(),
            numeral_abbreviations: FxHashSet::default(),
            single_letter_words: FxHashSet::default(),
            keep_contractions: true,
            keep_hyphenated: true,
            contraction_suffixes: Vec::new(),
        }
    }
}

impl TokenizerRules {
    /// Parse rules from their JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: TokenizerRules = serde_json::from_str(json)?;
        Ok(rules.normalized())
    }

    /// Builder method: add abbreviations
    pub fn with_abbreviations(mut self, words: &[&str]) -> Self {
        self.abbreviations
            .extend(words.iter().map(|w| normalize_abbreviation(w)));
        self
    }

    /// Builder method: add abbreviations used only before numbers
    pub fn with_numeral_abbreviations(mut self, words: &[&str]) -> Self {
        self.numeral_abbreviations
            .extend(words.iter().map(|w| normalize_abbreviation(w)));
        self
    }

    /// Builder method: add one-letter words that never act as initials
    pub fn with_single_letter_words(mut self, words: &[&str]) -> Self {
        self.single_letter_words
            .extend(words.iter().map(|w| w.trim().to_lowercase()));
        self
    }

    /// Builder method: set contraction handling
    pub fn with_keep_contractions(mut self, keep: bool) -> Self {
        self.keep_contractions = keep;
        self
    }

    /// Builder method: set hyphenated compound handling
    pub fn with_keep_hyphenated(mut self, keep: bool) -> Self {
        self.keep_hyphenated = keep;
        self
    }

    /// Builder method: set contraction suffixes
    pub fn with_contraction_suffixes(mut self, suffixes: &[&str]) -> Self {
        self.contraction_suffixes = suffixes.iter().map(|s| s.to_string()).collect();
        self.normalized()
    }

    /// Lower-case abbreviations and order suffixes longest first.
    fn normalized(mut self) -> Self {
        self.abbreviations = self
            .abbreviations
            .iter()
            .map(|w| normalize_abbreviation(w))
            .filter(|w| !w.is_empty())
            .collect();
        self.numeral_abbreviations = self
            .numeral_abbreviations
            .iter()
            .map(|w| normalize_abbreviation(w))
            .filter(|w| !w.is_empty())
            .collect();
        self.single_letter_words = self
            .single_letter_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .collect();
        for suffix in &mut self.contraction_suffixes {
            *suffix = suffix.to_lowercase().replace('\u{2019}', "'");
        }
        self.contraction_suffixes
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self.contraction_suffixes.dedup();
        self
    }

    /// Check if `word` (without its trailing period) is a known abbreviation
    pub fn is_abbreviation(&self, word: &str) -> bool {
        !word.is_empty() && self.abbreviations.contains(&normalize_abbreviation(word))
    }

    /// Check if `word` abbreviates something when a number follows it
    pub fn is_numeral_abbreviation(&self, word: &str) -> bool {
        !word.is_empty()
            && self
                .numeral_abbreviations
                .contains(&normalize_abbreviation(word))
    }

    /// A single upper-case letter such as the `J` in `J. Smith`.
    ///
    /// Letters listed in `single_letter_words` are words, not initials.
    pub fn is_initial(&self, word: &str) -> bool {
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_uppercase() => !self
                .single_letter_words
                .contains(&c.to_lowercase().collect::<String>()),
            _ => false,
        }
    }
}

fn normalize_abbreviation(word: &str) -> String {
    word.trim().trim_end_matches('.').to_lowercase()
}

// ============================================================================
// Segmenter
// ============================================================================

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\u{2026}' | '\u{3002}' | '\u{FF01}' | '\u{FF1F}')
}

fn is_closer(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | ')' | ']' | '}' | '\u{201D}' | '\u{2019}' | '\u{00BB}' | '\u{300D}'
    )
}

fn is_hyphen(s: &str) -> bool {
    matches!(s, "-" | "\u{2010}" | "\u{2011}")
}

fn is_wordlike(s: &str) -> bool {
    s.chars().any(char::is_alphanumeric)
}

/// Rule-driven sentence and word segmentation over plain text
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'r> {
    rules: &'r TokenizerRules,
}

/// A token candidate: a byte range into the text being segmented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    start: usize,
    end: usize,
    word: bool,
}

impl<'r> Segmenter<'r> {
    pub fn new(rules: &'r TokenizerRules) -> Self {
        Self { rules }
    }

    /// Lazily split `text` into sentences
    pub fn sentences<'a>(&self, text: &'a str) -> Sentences<'a>
    where
        'r: 'a,
    {
        Sentences {
            segmenter: Segmenter { rules: self.rules },
            text,
            pos: 0,
            sentence_idx: 0,
            token_idx: 0,
        }
    }

    /// Find the byte offset where the sentence starting at `from` ends.
    fn sentence_end(&self, text: &str, from: usize) -> usize {
        let mut iter = text[from..].char_indices().peekable();

        while let Some((i, c)) = iter.next() {
            let abs = from + i;

            // A blank line always closes the sentence
            if c == '\n' && blank_line_follows(&text[abs + 1..]) {
                return abs;
            }
            if !is_terminator(c) {
                continue;
            }

            let mut end = abs + c.len_utf8();
            let mut run = 1;
            while let Some(&(_, n)) = iter.peek() {
                if !is_terminator(n) {
                    break;
                }
                end += n.len_utf8();
                run += 1;
                iter.next();
            }
            while let Some(&(_, n)) = iter.peek() {
                if !is_closer(n) {
                    break;
                }
                end += n.len_utf8();
                iter.next();
            }

            let single_period = c == '.' && run == 1;
            if self.is_boundary(text, from, abs, end, single_period) {
                return end;
            }
        }

        text.len()
    }

    /// Decide whether the terminator run at `term..end` ends the sentence.
    fn is_boundary(
        &self,
        text: &str,
        sentence_start: usize,
        term: usize,
        end: usize,
        single_period: bool,
    ) -> bool {
        let after = &text[end..];
        match after.chars().next() {
            None => return true,
            // "3.14", "e.g.x", "Hello.World"
            Some(n) if !n.is_whitespace() => return false,
            Some(_) => {}
        }

        if single_period {
            let word = preceding_word(&text[sentence_start..term]);
            let numbered = starts_with_digit(after.trim_start());
            if self.rules.is_abbreviation(word)
                || self.rules.is_initial(word)
                || (numbered && self.rules.is_numeral_abbreviation(word))
            {
                return false;
            }
        }

        // Quoted speech and ellipses continue when the next word is lower-case
        !matches!(after.trim_start().chars().next(), Some(n) if n.is_lowercase())
    }

    /// Split one sentence span into token byte ranges (absolute offsets).
    fn words(&self, text: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
        let span = &text[start..end];
        let mut pieces: Vec<Piece> = span
            .split_word_bound_indices()
            .filter(|(_, seg)| !seg.chars().all(char::is_whitespace))
            .map(|(i, seg)| Piece {
                start: start + i,
                end: start + i + seg.len(),
                word: is_wordlike(seg),
            })
            .collect();

        if self.rules.keep_hyphenated {
            pieces = join_hyphenated(text, pieces);
        }
        pieces = self.join_abbreviation_periods(text, pieces);
        pieces = join_punctuation_runs(text, pieces);

        let mut ranges = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if piece.word && !self.rules.keep_contractions {
                if let Some(split) = self.split_contraction(&text[piece.start..piece.end]) {
                    ranges.push((piece.start, piece.start + split));
                    ranges.push((piece.start + split, piece.end));
                    continue;
                }
            }
            ranges.push((piece.start, piece.end));
        }
        ranges
    }

    /// `Dr` + `.` becomes `Dr.` when `dr` is a known abbreviation, and
    /// `No` + `.` becomes `No.` when a number comes next.
    fn join_abbreviation_periods(&self, text: &str, pieces: Vec<Piece>) -> Vec<Piece> {
        let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
        for (i, &piece) in pieces.iter().enumerate() {
            if let Some(last) = out.last_mut() {
                if last.word && last.end == piece.start && &text[piece.start..piece.end] == "." {
                    let word = &text[last.start..last.end];
                    let numbered = pieces
                        .get(i + 1)
                        .is_some_and(|next| starts_with_digit(&text[next.start..next.end]));
                    if self.rules.is_abbreviation(word)
                        || (numbered && self.rules.is_numeral_abbreviation(word))
                    {
                        last.end = piece.end;
                        continue;
                    }
                }
            }
            out.push(piece);
        }
        out
    }

    /// Byte index at which a contraction suffix starts, if the word has one.
    fn split_contraction(&self, word: &str) -> Option<usize> {
        let folded = word.to_lowercase().replace('\u{2019}', "'");
        // Folding can change byte lengths; only split when it did not.
        if folded.len() != word.len() {
            return None;
        }
        self.rules
            .contraction_suffixes
            .iter()
            .find(|suffix| folded.len() > suffix.len() && folded.ends_with(suffix.as_str()))
            .map(|suffix| word.len() - suffix.len())
            .filter(|&at| word.is_char_boundary(at))
    }
}

fn blank_line_follows(rest: &str) -> bool {
    for c in rest.chars() {
        match c {
            '\n' => return true,
            ' ' | '\t' | '\r' => continue,
            _ => return false,
        }
    }
    false
}

/// The last whitespace-delimited word before a terminator, with leading
/// brackets and quotes removed.
fn preceding_word(segment: &str) -> &str {
    segment
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric())
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn join_hyphenated(text: &str, pieces: Vec<Piece>) -> Vec<Piece> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    let mut i = 0;
    while i < pieces.len() {
        let mut current = pieces[i];
        i += 1;
        if current.word {
            while i + 1 < pieces.len() {
                let hyphen = pieces[i];
                let next = pieces[i + 1];
                let joins = current.end == hyphen.start
                    && is_hyphen(&text[hyphen.start..hyphen.end])
                    && hyphen.end == next.start
                    && next.word;
                if !joins {
                    break;
                }
                current.end = next.end;
                i += 2;
            }
        }
        out.push(current);
    }
    out
}

/// `.` `.` `.` becomes `...`; different punctuation stays separate.
fn join_punctuation_runs(text: &str, pieces: Vec<Piece>) -> Vec<Piece> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let Some(last) = out.last_mut() {
            if !last.word && !piece.word && last.end == piece.start {
                let run = &text[last.start..last.end];
                let seg = &text[piece.start..piece.end];
                let mut seg_chars = seg.chars();
                if let (Some(c), None) = (seg_chars.next(), seg_chars.next()) {
                    if run.chars().all(|r| r == c) {
                        last.end = piece.end;
                        continue;
                    }
                }
            }
        }
        out.push(piece);
    }
    out
}

// ============================================================================
// Sentence iterator
// ============================================================================

/// A lazy, finite sequence of sentences.
///
/// Cloning the iterator (or asking the tokenizer again) restarts
/// segmentation from the beginning of the text.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    segmenter: Segmenter<'a>,
    text: &'a str,
    pos: usize,
    sentence_idx: usize,
    token_idx: usize,
}

impl Iterator for Sentences<'_> {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        let rest = &self.text[self.pos..];
        let start = self.pos + (rest.len() - rest.trim_start().len());
        if start >= self.text.len() {
            self.pos = self.text.len();
            return None;
        }

        let end = self.segmenter.sentence_end(self.text, start);
        self.pos = end;

        let span = self.text[start..end].trim_end();
        let end = start + span.len();
        let mut sentence = Sentence::new(span, start, end, self.sentence_idx);

        for (word_start, word_end) in self.segmenter.words(self.text, start, end) {
            sentence.tokens.push(Token::new(
                &self.text[word_start..word_end],
                word_start,
                word_end,
                self.sentence_idx,
                self.token_idx,
            ));
            self.token_idx += 1;
        }

        self.sentence_idx += 1;
        Some(sentence)
    }
}

impl std::iter::FusedIterator for Sentences<'_> {}

// ============================================================================
// Tokenizer
// ============================================================================

/// Document tokenizer backed by the shared linguistic resources
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'r> {
    resources: &'r LinguisticResources,
}

impl<'r> Tokenizer<'r> {
    pub fn new(resources: &'r LinguisticResources) -> Self {
        Self { resources }
    }

    /// Lazily segment a document into sentences of raw tokens.
    ///
    /// Fails only when the document's language has no tokenizer rules.
    pub fn sentences<'a>(&self, doc: &'a Document) -> Result<Sentences<'a>>
    where
        'r: 'a,
    {
        let language = doc.language();
        let rules = self
            .resources
            .tokenizer_rules(language)
            .ok_or_else(|| NormalizeError::unsupported_language(language.as_str(), STAGE_TOKENIZE))?;
        Ok(Segmenter::new(rules).sentences(doc.text()))
    }

    /// Segment a document eagerly
    pub fn tokenize(&self, doc: &Document) -> Result<Vec<Sentence>> {
        Ok(self.sentences(doc)?.collect())
    }
}
