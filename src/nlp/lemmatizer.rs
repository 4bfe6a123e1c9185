//! Dictionary-based lemmatization
//!
//! A [`LemmaDictionary`] holds known base forms, inflection entries
//! (`form → lemma` with a frequency) and suffix detachment rules, all keyed
//! by [`LemmaCategory`]. The [`Lemmatizer`] resolves a surface form against
//! it in a fixed order:
//!
//! 1. the form is a base form of the requested category → unchanged;
//! 2. inflection entries of the category → best sense;
//! 3. detachment rules of the category → first candidate that is a known
//!    base form (doubled final consonants are undoubled: `running → run`);
//! 4. only with an explicit POS: a base form of any category, then the best
//!    inflection sense of any category;
//! 5. the surface form itself.
//!
//! "Best sense" means highest frequency, ties broken by the lexicographically
//! first lemma. Without a POS the noun category is used and step 4 is
//! skipped. Every lemma the dictionary can return is registered as a base
//! form of its category, so lemmas are fixed points.

use crate::errors::{NormalizeError, Result};
use crate::nlp::STAGE_LEMMATIZE;
use crate::resources::LinguisticResources;
use crate::types::{LanguageTag, LemmaCategory, PosTag, Token};
use rustc_hash::FxHashMap;

/// Frequency assigned to entries that do not state one
pub const DEFAULT_FREQUENCY: u32 = 1;

/// One dictionary sense of an inflected form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sense {
    pub category: LemmaCategory,
    pub lemma: String,
    pub frequency: u32,
}

/// Replace `suffix` with `replacement` to obtain a base-form candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixRule {
    pub category: LemmaCategory,
    pub suffix: String,
    pub replacement: String,
}

impl SuffixRule {
    pub fn new(category: LemmaCategory, suffix: &str, replacement: &str) -> Self {
        Self {
            category,
            suffix: suffix.to_lowercase(),
            replacement: replacement.to_lowercase(),
        }
    }

    /// Candidate base forms produced by this rule, in preference order
    fn candidates(&self, form: &str) -> Vec<String> {
        if form.len() <= self.suffix.len() || !form.ends_with(self.suffix.as_str()) {
            return Vec::new();
        }
        let stem = &form[..form.len() - self.suffix.len()];
        let mut out = vec![format!("{}{}", stem, self.replacement)];

        if self.replacement.is_empty() {
            let mut chars = stem.chars().rev();
            if let (Some(last), Some(prev)) = (chars.next(), chars.next()) {
                if last == prev && is_consonant(last) {
                    out.push(stem[..stem.len() - last.len_utf8()].to_string());
                }
            }
        }
        out
    }
}

fn category_bit(category: LemmaCategory) -> u8 {
    match category {
        LemmaCategory::Noun => 1,
        LemmaCategory::Verb => 2,
        LemmaCategory::Adjective => 4,
        LemmaCategory::Adverb => 8,
    }
}

fn is_consonant(c: char) -> bool {
    c.is_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

// ============================================================================
// Dictionary
// ============================================================================

/// An inflection database keyed by (form, category)
#[derive(Debug, Clone, Default)]
pub struct LemmaDictionary {
    /// Form → bitmask of the categories it is a base form of
    bases: FxHashMap<String, u8>,
    inflections: FxHashMap<String, Vec<Sense>>,
    rules: Vec<SuffixRule>,
}

impl LemmaDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the TSV dictionary format.
    ///
    /// ```text
    /// # comment
    /// cat<TAB>n                  base form
    /// are<TAB>v<TAB>be<TAB>50    inflection with frequency
    /// geese<TAB>n<TAB>goose      inflection, default frequency
    /// %rule<TAB>n<TAB>ies<TAB>y  detachment rule (`_` = empty replacement)
    /// ```
    pub fn parse(source: &str) -> std::result::Result<Self, String> {
        let mut dict = Self::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let cols: Vec<&str> = line.split('\t').map(str::trim).collect();

            let category = |code: &str| {
                LemmaCategory::from_code(code)
                    .ok_or_else(|| format!("line {}: unknown category '{}'", line_no, code))
            };

            if cols[0] == "%rule" {
                if cols.len() != 4 {
                    return Err(format!("line {}: rule needs 4 columns", line_no));
                }
                let replacement = if cols[3] == "_" { "" } else { cols[3] };
                dict.add_rule(SuffixRule::new(category(cols[1])?, cols[2], replacement));
                continue;
            }

            match *cols.as_slice() {
                [form, cat] => dict.insert_base(form, category(cat)?),
                [form, cat, lemma] => {
                    dict.insert_inflection(form, category(cat)?, lemma, DEFAULT_FREQUENCY)
                }
                [form, cat, lemma, freq] => {
                    let frequency = freq
                        .parse::<u32>()
                        .map_err(|_| format!("line {}: bad frequency '{}'", line_no, freq))?;
                    dict.insert_inflection(form, category(cat)?, lemma, frequency)
                }
                _ => return Err(format!("line {}: expected 2 to 4 columns", line_no)),
            }
        }

        Ok(dict)
    }

    /// Register a base form
    pub fn insert_base(&mut self, form: &str, category: LemmaCategory) {
        let form = form.to_lowercase();
        if !form.is_empty() {
            *self.bases.entry(form).or_default() |= category_bit(category);
        }
    }

    /// Register an inflected form; its lemma becomes a base form too.
    pub fn insert_inflection(
        &mut self,
        form: &str,
        category: LemmaCategory,
        lemma: &str,
        frequency: u32,
    ) {
        let form = form.to_lowercase();
        let lemma = lemma.to_lowercase();
        if form.is_empty() || lemma.is_empty() {
            return;
        }
        self.insert_base(&lemma, category);
        let senses = self.inflections.entry(form).or_default();
        match senses
            .iter_mut()
            .find(|s| s.category == category && s.lemma == lemma)
        {
            Some(existing) => existing.frequency = existing.frequency.max(frequency),
            None => senses.push(Sense {
                category,
                lemma,
                frequency,
            }),
        }
    }

    /// Append a detachment rule; rules are tried in insertion order
    pub fn add_rule(&mut self, rule: SuffixRule) {
        self.rules.push(rule);
    }

    pub fn is_base(&self, form: &str, category: LemmaCategory) -> bool {
        self.bases
            .get(form)
            .is_some_and(|mask| mask & category_bit(category) != 0)
    }

    pub fn is_base_any(&self, form: &str) -> bool {
        self.bases.get(form).is_some_and(|&mask| mask != 0)
    }

    /// All senses recorded for an inflected form
    pub fn senses(&self, form: &str) -> &[Sense] {
        self.inflections.get(form).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct base forms
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty() && self.inflections.is_empty()
    }

    fn best_sense<'a>(senses: impl Iterator<Item = &'a Sense>) -> Option<&'a Sense> {
        senses.fold(None, |best: Option<&Sense>, s| match best {
            Some(b) if b.frequency > s.frequency => Some(b),
            Some(b) if b.frequency == s.frequency && b.lemma <= s.lemma => Some(b),
            _ => Some(s),
        })
    }

    /// Resolve a lower-case form within one category (steps 1 to 3)
    fn resolve_in(&self, form: &str, category: LemmaCategory) -> Option<String> {
        if self.is_base(form, category) {
            return Some(form.to_string());
        }
        if let Some(sense) =
            Self::best_sense(self.senses(form).iter().filter(|s| s.category == category))
        {
            return Some(sense.lemma.clone());
        }
        self.rules
            .iter()
            .filter(|r| r.category == category)
            .flat_map(|r| r.candidates(form))
            .find(|candidate| self.is_base(candidate, category))
    }

    /// Resolve a lower-case form across every category (step 4)
    fn resolve_any(&self, form: &str) -> Option<String> {
        if self.is_base_any(form) {
            return Some(form.to_string());
        }
        Self::best_sense(self.senses(form).iter()).map(|s| s.lemma.clone())
    }

    /// Look up a form; `None` when the dictionary has no answer
    pub fn lookup(&self, form: &str, pos: Option<PosTag>) -> Option<String> {
        let form = form.to_lowercase();
        match pos.and_then(|p| p.lemma_category()) {
            Some(category) => self
                .resolve_in(&form, category)
                .or_else(|| self.resolve_any(&form)),
            None => self.resolve_in(&form, LemmaCategory::Noun),
        }
    }
}

// ============================================================================
// Lemmatizer
// ============================================================================

/// Reduces surface forms to dictionary lemmas; never fails on unknown words
#[derive(Debug, Clone, Copy)]
pub struct Lemmatizer<'d> {
    dictionary: &'d LemmaDictionary,
    case_fold: bool,
}

impl<'d> Lemmatizer<'d> {
    pub fn new(dictionary: &'d LemmaDictionary) -> Self {
        Self {
            dictionary,
            case_fold: true,
        }
    }

    /// Build a lemmatizer for the dictionary registered for `language`
    pub fn for_language(resources: &'d LinguisticResources, language: &LanguageTag) -> Result<Self> {
        resources
            .dictionary(language)
            .map(Self::new)
            .ok_or_else(|| NormalizeError::unsupported_language(language.as_str(), STAGE_LEMMATIZE))
    }

    /// Builder method: lower-case forms that fall back to the surface
    pub fn with_case_fold(mut self, case_fold: bool) -> Self {
        self.case_fold = case_fold;
        self
    }

    /// Normalize one surface form
    pub fn lemmatize(&self, surface: &str, pos: Option<PosTag>) -> String {
        if !surface.chars().any(char::is_alphabetic) {
            return surface.to_string();
        }
        if matches!(pos, Some(PosTag::Punctuation) | Some(PosTag::Symbol)) {
            return surface.to_string();
        }

        match self.dictionary.lookup(surface, pos) {
            Some(lemma) => lemma,
            None if self.case_fold => surface.to_lowercase(),
            None => surface.to_string(),
        }
    }

    /// Set a token's normalized form from its surface form and POS
    pub fn lemmatize_token(&self, token: &mut Token) {
        token.lemma = self.lemmatize(&token.text, token.pos);
    }
}
