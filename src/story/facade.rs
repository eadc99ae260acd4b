//! The single external entry point: `loads(source) -> Result<LoadResult, StoryError>`, running
//! tokenize → parse → transform → compile in one call. Grounded on
//! `examples/creative-forest-lang-pt/src/lib.rs`'s `DefaultParser`/`ImplementationError`/
//! `ParseError` idiom (no `thiserror`/`anyhow`).

use crate::story::compiler;
use crate::story::error::StoryError;
use crate::story::grammar::build_parser;
use crate::story::transform::transform;
use crate::story::value::Script;
use crate::Code;

/// The result of a successful `loads` call: the compiled [`Script`] plus the two fields the
/// original facade exposed alongside it (`spec.md` §6).
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub script: Script,
    pub entrypoint: Option<String>,
    pub version: &'static str,
}

/// `loads(source)`: tokenizes and parses `source` per the Storyscript grammar, transforms the
/// concrete tree, and compiles it into a [`Script`]. The tokenizer's indentation lexeme only
/// fires on an interior `\n`, so a trailing newline is appended here if the caller omitted one —
/// see `story::token`'s `build_tokenizer` doc comment.
pub fn loads(source: &str) -> Result<LoadResult, StoryError> {
    let mut normalized = source.to_string();
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }

    let parser = build_parser().map_err(|_| StoryError::internal("grammar"))?;
    let trees = parser.parse(normalized.as_bytes())?;
    let root = trees
        .into_iter()
        .next()
        .ok_or(StoryError::internal("empty-parse"))?;

    let code = Code::new(normalized.as_bytes());
    let root = transform(root, &code)?;
    let version = env!("CARGO_PKG_VERSION");
    let script = compiler::compile(&root, &code, version)?;

    Ok(LoadResult {
        entrypoint: script.entrypoint.clone(),
        script,
        version,
    })
}
