//! otto-core: compiler front end for the Otto pipeline DSL.
//!
//! Turns `.otto` source text into a validated Orf document in three steps:
//! lexing ([`lexer`]), grammar parsing into a concrete syntax tree
//! ([`parser`], [`cst`]), and a single depth-first tree walk that builds
//! the document ([`builder`]).
//!
//! Malformed input never aborts the scan: syntax errors are accumulated
//! out of band ([`error::ErrorCollector`]) and handed back as data. The
//! one fatal condition is a structural invariant violation inside the
//! builder ([`error::BuildError`]), which signals a defect in the
//! grammar/builder pairing rather than bad input.
//!
//! # Public API
//!
//! - [`parse()`] -- source text to CST plus error list; never fails
//! - [`compile()`] -- source text to Orf plus error list
//! - [`TreeBuilder`] -- the single-use CST walker, for callers that want
//!   to drive the stages separately

pub mod builder;
pub mod cst;
pub mod error;
pub mod lexer;
pub mod parser;

pub use builder::TreeBuilder;
pub use error::{BuildError, ErrorCollector, SyntaxError};
pub use otto_orf::Orf;

/// Result of lexing and parsing one source buffer.
#[derive(Debug)]
pub struct ParseOutcome {
    /// The tree, possibly partial when `errors` is non-empty.
    pub document: cst::Document,
    pub errors: Vec<SyntaxError>,
}

/// Result of a full front-end run over one source buffer.
#[derive(Debug)]
pub struct CompileOutcome {
    pub orf: Orf,
    /// Callers decide whether a non-empty list invalidates the document;
    /// typically it should.
    pub errors: Vec<SyntaxError>,
}

/// Lex and parse a source buffer. Never fails; malformed regions are
/// reported in the returned error list.
pub fn parse(source: &str) -> ParseOutcome {
    let mut errors = ErrorCollector::new();
    let tokens = lexer::lex(source, &mut errors);
    let document = parser::parse(&tokens, &mut errors);
    ParseOutcome {
        document,
        errors: errors.into_errors(),
    }
}

/// Parse a source buffer and build its Orf document.
///
/// Syntax errors are returned alongside the document; a [`BuildError`]
/// is a fatal front-end defect and aborts the run.
pub fn compile(source: &str) -> Result<CompileOutcome, BuildError> {
    let outcome = parse(source);
    let mut tree_builder = TreeBuilder::new();
    tree_builder.walk(&outcome.document)?;
    Ok(CompileOutcome {
        orf: tree_builder.into_orf(),
        errors: outcome.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_produces_a_document_and_no_errors_for_valid_input() {
        let outcome = compile("pipeline { stages { stage { name = 'Build' } } }")
            .expect("no structural failure");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.orf.stages().len(), 1);
    }

    #[test]
    fn compile_surfaces_syntax_errors_as_data() {
        let outcome = compile("").expect("no structural failure");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.orf, Orf::EMPTY);
    }

    #[test]
    fn spec_oneliner_with_stray_brace_still_yields_the_stage() {
        // Trailing garbage is a syntax error, but everything before it
        // parsed cleanly and the document reflects that.
        let src = "pipeline { stages { stage { name = 'Build' \
                   runtime { docker { image = 'alpine' } } \
                   steps { sh 'env' } } } } }";
        let outcome = compile(src).expect("no structural failure");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.orf.stages().len(), 1);
        assert_eq!(outcome.orf.stages()[0].name, "Build");
        assert_eq!(outcome.orf.runtimes().len(), 1);
    }
}
