//! Diagnostics rendering for TypeSlang
//!
//! Turns an [`EmitError`] into user-facing text. When the offending unit's source text is available the error is
//! rendered as a `miette` report with the span highlighted; otherwise a one-line `file:line:column` form is used.

use crate::backend::EmitError;
use miette::{GraphicalReportHandler, GraphicalTheme, NamedSource, Report};

/// Render `error` against the source of the unit it points into.
pub fn format_error(source: Option<&str>, error: &EmitError) -> String {
    let fallback = || format_plain(error);
    let Some(source) = source.filter(|text| !text.is_empty() && error.span.end <= text.len()) else {
        return fallback();
    };

    let report = Report::new(error.clone()).with_source_code(NamedSource::new(&error.unit, source.to_string()));
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    match handler.render_report(&mut out, &*report) {
        Ok(()) => out,
        Err(_) => fallback(),
    }
}

/// `error[typeslang::kind]: file:line:column: message`
pub fn format_plain(error: &EmitError) -> String {
    let location = if error.unit.is_empty() {
        format!("{}:{}", error.position.line, error.position.column)
    } else {
        format!("{}:{}:{}", error.unit, error.position.line, error.position.column)
    };
    format!("error[{}]: {location}: {}", error.kind.code(), error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::EmitErrorKind;
    use typeslang_syntax::ast::{Position, Span};

    fn radix_error() -> EmitError {
        EmitError {
            kind: EmitErrorKind::UnsupportedRadix,
            message: "radix `7` is not supported (expected one of 2, 8, 10, 16)".to_string(),
            unit: "main.ts".to_string(),
            position: Position { line: 2, column: 22 },
            span: Span::new(39, 40),
        }
    }

    #[test]
    fn plain_form_without_source() {
        let text = format_error(None, &radix_error());
        assert_eq!(
            text,
            "error[typeslang::unsupported_radix]: main.ts:2:22: radix `7` is not supported (expected one of 2, 8, 10, 16)"
        );
    }

    #[test]
    fn report_highlights_the_span() {
        let source = "let x: i32 = 255;\nconst s = x.toString(7);\n";
        let text = format_error(Some(source), &radix_error());
        assert!(text.contains("typeslang::unsupported_radix"), "{text}");
        assert!(text.contains("main.ts"), "{text}");
        assert!(text.contains("x.toString(7)"), "{text}");
    }

    #[test]
    fn span_past_the_source_falls_back() {
        let text = format_error(Some("short"), &radix_error());
        assert!(text.starts_with("error[typeslang::unsupported_radix]"));
    }
}
