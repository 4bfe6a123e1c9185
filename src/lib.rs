//! # lexnorm
//!
//! Deterministic text normalization for search indexing and keyword
//! extraction.
//!
//! A [`Pipeline`] turns a raw [`Document`] into a [`NormalizedDocument`]:
//! sentences of tokens, each carrying its surface form, a lemma, an optional
//! part-of-speech tag and a stopword flag.
//!
//! ## Features
//!
//! - **Offset-preserving**: every token keeps its byte span in the source
//! - **Unicode-aware**: UAX #29 word boundaries for non-Latin scripts
//! - **Data-driven**: tokenizer rules, stopword lists and lemma dictionaries
//!   are plain files, with English built in
//! - **Parallel batches**: Rayon-backed batch normalization
//!
//! ```no_run
//! use lexnorm::Pipeline;
//!
//! let pipeline = Pipeline::english()?;
//! let doc = pipeline.run_text("The cats are running.")?;
//! assert_eq!(doc.lemmas(), vec!["the", "cat", "be", "run", "."]);
//! # Ok::<(), lexnorm::NormalizeError>(())
//! ```

pub mod errors;
pub mod nlp;
pub mod pipeline;
pub mod resources;
pub mod types;

// Re-export commonly used types
pub use errors::{NormalizeError, Result};
pub use types::{
    Document, LanguageTag, LemmaCategory, NormalizedDocument, PosTag, Sentence, Token, TokenRecord,
};

// Re-export main functionality
pub use nlp::{
    lemmatizer::{LemmaDictionary, Lemmatizer},
    stopwords::{StopwordFilter, StopwordMode},
    tagger::PosTagger,
    tokenizer::{Tokenizer, TokenizerRules},
};
pub use pipeline::{Pipeline, PipelineConfig, PipelineObserver, RuntimeSpec};
pub use resources::{LinguisticResources, ResourceConfig, ResourceSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
