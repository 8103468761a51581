//! Recursive-descent parser for Lua and its dialects.
//!
//! The parser never fails: malformed input produces missing tokens, skipped
//! tokens and diagnostics inside an otherwise complete [`SyntaxTree`].

use lunar_errors::Diagnostic;
use lunar_inputs::{File, LuaSyntaxOptions, SourceText};
use lunar_yellow::SyntaxTree;
use salsa::Accumulator as _;
use tracing::{debug, instrument};

mod grammar;
mod parser;

/// Parses `text` with the given dialect.
pub fn parse(text: &str, options: LuaSyntaxOptions) -> SyntaxTree {
    parse_source(SourceText::new(text), options)
}

#[instrument(skip_all, fields(len = source.as_str().len()))]
pub fn parse_source(source: SourceText, options: LuaSyntaxOptions) -> SyntaxTree {
    debug!(dialect = options.name().unwrap_or("custom"), "parsing");

    let mut parser = parser::Parser::new(source.as_str(), options);
    grammar::chunk(&mut parser);
    let green = parser.build_tree();

    let tree = SyntaxTree::new(source, green, options);
    debug!(diagnostics = tree.diagnostics().len(), "parsed");
    tree
}

/// Parses a file, reporting its diagnostics through the [`Diagnostic`]
/// accumulator.
#[salsa::tracked(returns(ref), no_eq)]
pub fn parse_file(db: &dyn salsa::Database, file: File) -> SyntaxTree {
    let tree = parse(file.text(db), file.options(db));
    for diagnostic in tree.diagnostics() {
        diagnostic.clone().accumulate(db);
    }
    tree
}

pub trait FileParse {
    fn parse(self, db: &dyn salsa::Database) -> &SyntaxTree;
}

impl FileParse for File {
    fn parse(self, db: &dyn salsa::Database) -> &SyntaxTree {
        parse_file(db, self)
    }
}

/// Every diagnostic reported while parsing `file`.
pub fn file_diagnostics(db: &dyn salsa::Database, file: File) -> Vec<Diagnostic> {
    parse_file::accumulated::<Diagnostic>(db, file).into_iter().cloned().collect()
}
