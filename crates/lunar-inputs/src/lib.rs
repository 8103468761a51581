//! Inputs to the front end: source text, dialect options and the salsa file input.

mod options;
mod source;

pub use line_index::LineIndex;
pub use options::{ContinueType, LuaSyntaxOptions, UnknownPreset};
pub use source::{SourceLocation, SourceRange, SourceText};

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: camino::Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
    pub options: LuaSyntaxOptions,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn salsa::Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }
}
