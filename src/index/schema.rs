//! Tantivy schema and analyzers for keyed documents.

use tantivy::Index;
use tantivy::schema::{
    Field, IndexRecordOption, STORED, Schema, SchemaBuilder, TextFieldIndexing, TextOptions,
};
use tantivy::tokenizer::{
    AsciiFoldingFilter, LowerCaser, RawTokenizer, RemoveLongFilter, SimpleTokenizer, TextAnalyzer,
    TokenStream,
};

/// Analyzer name for approximate keys.
pub const FUZZY_TOKENIZER: &str = "shoreline_fuzzy";

/// Analyzer name for whole-string keys.
pub const EXACT_TOKENIZER: &str = "shoreline_exact";

/// Schema fields for a keyed document collection.
#[derive(Debug, Clone)]
pub struct KeySchema {
    /// Fuzzy keys, tokenized into words.
    pub fuzzy_key: Field,

    /// Exact keys, indexed as one lowercased, ASCII-folded token each.
    pub exact_key: Field,

    /// Document content as a JSON string. Stored only.
    pub content: Field,
}

impl KeySchema {
    pub fn build() -> (Schema, Self) {
        let mut builder = SchemaBuilder::default();

        let fuzzy_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(FUZZY_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();
        let fuzzy_key = builder.add_text_field("fuzzy_key", fuzzy_options);

        let exact_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(EXACT_TOKENIZER)
                    .set_index_option(IndexRecordOption::Basic),
            )
            .set_stored();
        let exact_key = builder.add_text_field("exact_key", exact_options);

        let content = builder.add_text_field("content", STORED);

        let schema = builder.build();
        (
            schema,
            Self {
                fuzzy_key,
                exact_key,
                content,
            },
        )
    }

    /// Resolve fields from an existing index schema.
    pub fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
        Ok(Self {
            fuzzy_key: schema.get_field("fuzzy_key")?,
            exact_key: schema.get_field("exact_key")?,
            content: schema.get_field("content")?,
        })
    }
}

pub fn fuzzy_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser)
        .filter(AsciiFoldingFilter)
        .build()
}

pub fn exact_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(RawTokenizer::default())
        .filter(LowerCaser)
        .filter(AsciiFoldingFilter)
        .build()
}

/// Register both analyzers. Must run on every freshly created or opened index.
pub fn register_analyzers(index: &Index) {
    index.tokenizers().register(FUZZY_TOKENIZER, fuzzy_analyzer());
    index.tokenizers().register(EXACT_TOKENIZER, exact_analyzer());
}

/// Run `text` through `analyzer` and collect the token texts.
pub fn analyze(analyzer: &TextAnalyzer, text: &str) -> Vec<String> {
    let mut analyzer = analyzer.clone();
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    while stream.advance() {
        tokens.push(stream.token().text.clone());
    }
    tokens
}

/// Collapse inner whitespace so "Santos  Gonzaga" and "Santos Gonzaga"
/// index to the same exact key.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The single token an exact key or exact lookup reduces to.
pub fn normalize_exact(analyzer: &TextAnalyzer, text: &str) -> Option<String> {
    let collapsed = collapse_whitespace(text);
    if collapsed.is_empty() {
        return None;
    }
    analyze(analyzer, &collapsed).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_build() {
        let (schema, fields) = KeySchema::build();
        assert!(schema.get_field("fuzzy_key").is_ok());
        assert!(schema.get_field("exact_key").is_ok());
        assert!(schema.get_field("content").is_ok());
        assert_eq!(schema.fields().count(), 3);

        let resolved = KeySchema::from_schema(&schema).unwrap();
        assert_eq!(resolved.exact_key, fields.exact_key);
    }

    #[test]
    fn test_fuzzy_analyzer_folds_accents() {
        let tokens = analyze(&fuzzy_analyzer(), "José Menino");
        assert_eq!(tokens, vec!["jose".to_string(), "menino".to_string()]);
    }

    #[test]
    fn test_normalize_exact() {
        let analyzer = exact_analyzer();
        assert_eq!(
            normalize_exact(&analyzer, "  Santos   Gonzaga "),
            Some("santos gonzaga".to_string())
        );
        assert_eq!(
            normalize_exact(&analyzer, "São Vicente"),
            Some("sao vicente".to_string())
        );
        assert_eq!(normalize_exact(&analyzer, "   "), None);
    }
}
