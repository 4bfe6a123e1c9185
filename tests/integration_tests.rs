//! Integration tests for lexnorm

use lexnorm::nlp::{STAGE_LEMMATIZE, STAGE_TOKENIZE};
use lexnorm::pipeline::StageTimingObserver;
use lexnorm::*;
use std::sync::Arc;

/// Sample text for testing
const SAMPLE_TEXT: &str = r#"
Dr. Smith studied the geese that were flying south. They weren't alone!

The children ran across the fields, and the dogs were barking loudly...
Nobody knew why. "Is it over?" she asked.
"#;

fn english() -> Pipeline {
    Pipeline::english().unwrap()
}

fn pipeline_with(config: PipelineConfig) -> Pipeline {
    Pipeline::new(Arc::new(LinguisticResources::builtin().unwrap()), config).unwrap()
}

fn surfaces(doc: &NormalizedDocument) -> Vec<String> {
    doc.tokens().map(|t| t.text.clone()).collect()
}

#[test]
fn test_full_pipeline() {
    let doc = english().run_text("The cats are running.").unwrap();

    assert_eq!(doc.sentences.len(), 1);
    assert_eq!(surfaces(&doc), vec!["The", "cats", "are", "running", "."]);
    assert_eq!(
        doc.tokens().map(|t| t.is_stopword).collect::<Vec<_>>(),
        vec![true, false, true, false, false]
    );
    assert_eq!(doc.lemmas(), vec!["the", "cat", "be", "run", "."]);
}

#[test]
fn test_empty_input() {
    let pipeline = english();
    for text in ["", "   ", "\n\n\t"] {
        let doc = pipeline.run_text(text).unwrap();
        assert!(doc.sentences.is_empty(), "{:?}", text);
    }
}

#[test]
fn test_unsupported_language() {
    let doc = Document::parse("Hello.", "xx").unwrap();
    let err = english().run(&doc).unwrap_err();

    assert!(err.is_unsupported_language());
    assert_eq!(err.stage(), Some(STAGE_TOKENIZE));
    assert_eq!(err.to_string(), "Unsupported language 'xx' (stage: tokenize)");
}

#[test]
fn test_unknown_word_keeps_surface() {
    let doc = english().run_text("glorp").unwrap();
    assert_eq!(doc.lemmas(), vec!["glorp"]);
}

#[test]
fn test_sentence_segmentation_and_offsets() {
    let doc = english().run_text(SAMPLE_TEXT).unwrap();

    assert_eq!(doc.sentences.len(), 5);
    assert!(doc.sentences[0].text.starts_with("Dr. Smith"));
    assert_eq!(doc.sentences[1].text, "They weren't alone!");
    assert!(doc.sentences[2].text.ends_with("loudly..."));

    for (i, sentence) in doc.sentences.iter().enumerate() {
        assert_eq!(sentence.index, i);
        assert_eq!(&SAMPLE_TEXT[sentence.start..sentence.end], sentence.text);
        for token in &sentence.tokens {
            assert_eq!(&SAMPLE_TEXT[token.start..token.end], token.text);
            assert_eq!(token.sentence_idx, i);
        }
    }

    let token_idx: Vec<usize> = doc.tokens().map(|t| t.token_idx).collect();
    assert_eq!(token_idx, (0..doc.token_count()).collect::<Vec<_>>());
}

#[test]
fn test_sentence_ending_in_ordinary_word() {
    let pipeline = english();

    let doc = pipeline.run_text("The answer is no. We left early.").unwrap();
    assert_eq!(doc.sentences.len(), 2);
    assert_eq!(surfaces(&doc)[..5], ["The", "answer", "is", "no", "."]);
    let no = &doc.sentences[0].tokens[3];
    assert!(no.is_stopword);
    assert_eq!(no.lemma, "no");

    for text in ["Neither did I. We left early.", "He got an A. Then he left."] {
        let doc = pipeline.run_text(text).unwrap();
        assert_eq!(doc.sentences.len(), 2, "{}", text);
        // Sentence-initial, so not mistaken for a proper noun
        assert_ne!(doc.sentences[1].tokens[0].pos, Some(PosTag::ProperNoun));
    }

    let doc = pipeline.run_text("See No. 5 for details.").unwrap();
    assert_eq!(doc.sentences.len(), 1);
    assert_eq!(doc.sentences[0].tokens[1].text, "No.");
}

#[test]
fn test_stopword_flag_ignores_apostrophe_style() {
    let doc = english().run_text("I don\u{2019}t know. You don't either.").unwrap();
    let flag_of = |surface: &str| doc.tokens().find(|t| t.text == surface).map(|t| t.is_stopword);

    assert_eq!(flag_of("don\u{2019}t"), Some(true));
    assert_eq!(flag_of("don't"), Some(true));
}

#[test]
fn test_irregular_forms() {
    let doc = english().run_text(SAMPLE_TEXT).unwrap();
    let lemma_of = |surface: &str| {
        doc.tokens()
            .find(|t| t.text == surface)
            .map(|t| t.lemma.clone())
            .unwrap()
    };

    assert_eq!(lemma_of("geese"), "goose");
    assert_eq!(lemma_of("were"), "be");
    assert_eq!(lemma_of("children"), "child");
    assert_eq!(lemma_of("ran"), "run");
    assert_eq!(lemma_of("Dr."), "dr.");
    assert_eq!(lemma_of("..."), "...");
}

#[test]
fn test_order_preserved_regardless_of_optional_stages() {
    let full = english().run_text(SAMPLE_TEXT).unwrap();
    let configs = [
        PipelineConfig::tokenize_only(LanguageTag::english()),
        PipelineConfig::default().with_lemmatizer(false),
        PipelineConfig::default().with_stopword_filter(false),
    ];

    for config in configs {
        let doc = pipeline_with(config).run_text(SAMPLE_TEXT).unwrap();
        assert_eq!(surfaces(&doc), surfaces(&full));
    }
}

#[test]
fn test_stopword_flagging_keeps_token_count() {
    let unfiltered = pipeline_with(PipelineConfig::default().with_stopword_filter(false))
        .run_text(SAMPLE_TEXT)
        .unwrap();
    let filtered = english().run_text(SAMPLE_TEXT).unwrap();

    assert_eq!(filtered.token_count(), unfiltered.token_count());
    assert!(filtered.tokens().any(|t| t.is_stopword));
    assert!(unfiltered.tokens().all(|t| !t.is_stopword));
    assert!(filtered
        .tokens()
        .filter(|t| !t.is_wordlike())
        .all(|t| !t.is_stopword));
}

#[test]
fn test_lemmatization_is_idempotent_on_output() {
    let pipeline = english();
    let en = LanguageTag::english();
    let lemmatizer = Lemmatizer::for_language(pipeline.resources(), &en).unwrap();

    let doc = pipeline.run_text(SAMPLE_TEXT).unwrap();
    for lemma in doc.lemmas() {
        assert_eq!(lemmatizer.lemmatize(lemma, None), lemma);
    }
}

#[test]
fn test_deterministic_output() {
    let pipeline = english();
    let first = pipeline.run_text(SAMPLE_TEXT).unwrap();
    let second = pipeline.run_text(SAMPLE_TEXT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_observer_reports_every_stage() {
    let pipeline = english();
    let doc = Document::new("Cats sleep.", LanguageTag::english());
    let mut obs = StageTimingObserver::new();

    pipeline.run_with_observer(&doc, &mut obs).unwrap();

    assert_eq!(obs.reports().len(), 3);
    assert_eq!(obs.stages()[0], STAGE_TOKENIZE);
    assert_eq!(obs.stages()[2], STAGE_LEMMATIZE);
}

#[test]
fn test_batch_matches_sequential() {
    let pipeline = pipeline_with(PipelineConfig::default().with_runtime(RuntimeSpec::with_max_threads(2)));
    let docs: Vec<Document> = SAMPLE_TEXT
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Document::new(l, LanguageTag::english()))
        .collect();

    let batch = pipeline.run_batch(&docs).unwrap();
    assert_eq!(batch.len(), docs.len());
    for (doc, result) in docs.iter().zip(batch) {
        assert_eq!(result.unwrap(), pipeline.run(doc).unwrap());
    }
}

#[test]
fn test_shared_resources_across_pipelines() {
    let resources = Arc::new(LinguisticResources::builtin().unwrap());
    let strict = Pipeline::new(resources.clone(), PipelineConfig::default()).unwrap();
    let raw = Pipeline::new(
        resources.clone(),
        PipelineConfig::tokenize_only(LanguageTag::english()),
    )
    .unwrap();

    assert_eq!(strict.run_text("Cats.").unwrap().lemmas(), vec!["cat", "."]);
    assert_eq!(raw.run_text("Cats.").unwrap().lemmas(), vec!["Cats", "."]);
    assert!(Arc::ptr_eq(strict.resources(), raw.resources()));
}

#[test]
fn test_json_output() {
    let doc = english().run_text("The cats are running.").unwrap();
    let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

    let sentences = value.as_array().unwrap();
    assert_eq!(sentences.len(), 1);
    let records = sentences[0].as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[1]["surface"], "cats");
    assert_eq!(records[1]["lemma"], "cat");
    assert_eq!(records[1]["is_stopword"], false);
    assert_eq!(records[2]["pos"], "VERB");
    assert_eq!(records[4]["pos"], "PUNCT");
}

#[test]
fn test_untagged_output_has_null_pos() {
    let doc = pipeline_with(PipelineConfig::default().with_pos_tagger(false))
        .run_text("Cats.")
        .unwrap();
    let records = doc.to_records();
    assert!(records[0].iter().all(|r| r.pos.is_none()));
}

#[test]
fn test_document_from_json() {
    let doc: Document = serde_json::from_str(r#"{ "text": "Dogs bark.", "language": "EN" }"#).unwrap();
    assert_eq!(doc.language(), &LanguageTag::english());

    let out = english().run(&doc).unwrap();
    assert_eq!(out.lemmas(), vec!["dog", "bark", "."]);
}

#[test]
fn test_keywords() {
    let doc = english()
        .run_text("The cats are running. Cats love running in the park!")
        .unwrap();

    assert_eq!(doc.keywords(2), vec!["cat", "run"]);
    let all = doc.keywords(0);
    assert_eq!(all[..2], ["cat", "run"]);
    assert!(all.contains(&"park".to_string()));
    assert!(!all.iter().any(|k| k == "the" || k == "in"));
}

#[test]
fn test_resources_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stop.txt"), "# custom\ncats\n").unwrap();
    std::fs::write(
        dir.path().join("resources.json"),
        r#"{
            "languages": ["en"],
            "tokenizer_rules": { "en": { "builtin": "en" } },
            "stopwords": { "en": { "file": "stop.txt" } },
            "lemma_dictionaries": { "en": { "builtin": "en" } }
        }"#,
    )
    .unwrap();

    let resources = LinguisticResources::from_config_path(dir.path().join("resources.json")).unwrap();
    let pipeline = Pipeline::new(Arc::new(resources), PipelineConfig::default()).unwrap();
    let doc = pipeline.run_text("The cats are running.").unwrap();

    assert_eq!(
        doc.tokens().map(|t| t.is_stopword).collect::<Vec<_>>(),
        vec![false, true, false, false, false]
    );
}

#[test]
fn test_bad_resource_file_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, "{ not json").unwrap();

    let config = ResourceConfig::default()
        .with_language(LanguageTag::english(), ResourceSource::file(&path));
    let err = LinguisticResources::load(&config).unwrap_err();
    assert!(matches!(err, NormalizeError::ResourceLoadFailure { .. }));
}

#[test]
fn test_german_builtin_resources() {
    let resources = LinguisticResources::load(&ResourceConfig::builtin(&["de"]).unwrap()).unwrap();
    let pipeline = Pipeline::new(
        Arc::new(resources),
        PipelineConfig::default()
            .with_language(LanguageTag::new("de").unwrap())
            .with_lemmatizer(false),
    )
    .unwrap();

    let doc = pipeline.run_text("Der Hund und die Katze.").unwrap();
    let flags: Vec<bool> = doc.tokens().map(|t| t.is_stopword).collect();
    assert_eq!(flags, vec![true, false, true, true, false, false]);
}
