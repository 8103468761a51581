//! Diagnostics reported by the Lua front end.

mod code;

use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use code::{ErrorCode, Severity};
pub use text_size::TextRange;

/// A diagnostic with an absolute range into the source text.
#[salsa::accumulator]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    code: ErrorCode,
    range: TextRange,
    message: String,
    args: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, range: TextRange, args: Vec<String>) -> Self {
        let message = code.format(&args);
        Self { code, range, message, args }
    }

    pub fn error(code: ErrorCode, range: TextRange) -> Self {
        Self::new(code, range, Vec::new())
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// The structured arguments the message was rendered from.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = match self.severity() {
            Severity::Error => Level::Error,
            Severity::Warning => Level::Warning,
            Severity::Info => Level::Info,
            Severity::Hidden => Level::Note,
        };

        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hidden => "hidden",
        };
        write!(f, "{severity}[{}]: {} at {:?}", self.code, self.message, self.range)
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::*;

    #[test]
    fn message_is_rendered_from_code() {
        let range = TextRange::at(TextSize::new(3), TextSize::new(0));
        let diagnostic = Diagnostic::new(ErrorCode::TokenExpected, range, vec!["end".into()]);

        assert_eq!(diagnostic.message(), "expected 'end'");
        assert_eq!(diagnostic.args(), ["end"]);
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.to_string(), "error[LUA1002]: expected 'end' at 3..3");
    }

    #[test]
    fn render_points_at_range() {
        let text = "local x = @\n";
        let range = TextRange::at(TextSize::new(10), TextSize::new(1));
        let diagnostic = Diagnostic::new(ErrorCode::BadCharacter, range, vec!["@".into()]);

        let rendered = diagnostic.render(&Renderer::plain(), "main.lua", text).to_string();
        assert!(rendered.contains("bad character '@'"), "{rendered}");
        assert!(rendered.contains("main.lua"), "{rendered}");
    }
}
