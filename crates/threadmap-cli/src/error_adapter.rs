//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! Scene errors carry the scene source and a byte span, so they are rendered
//! with a labeled snippet. Everything else is rendered as a plain report with
//! a diagnostic code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use threadmap::ThreadmapError;

use crate::{error::CliError, scene::SceneError};

/// Adapter for a [`SceneError`] together with the scene source.
pub struct SceneAdapter<'a> {
    err: &'a SceneError,
    src: &'a str,
}

impl<'a> SceneAdapter<'a> {
    pub fn new(err: &'a SceneError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for SceneAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for SceneAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for SceneAdapter<'_> {}

impl MietteDiagnostic for SceneAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.err.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.err
            .help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;

        let primary = LabeledSpan::new_primary_with_span(
            Some(self.err.label().to_string()),
            span_to_miette(span),
        );
        let secondary = self.err.secondary().map(|(span, label)| {
            LabeledSpan::new_with_span(Some(label.to_string()), span_to_miette(span))
        });

        Some(Box::new(std::iter::once(primary).chain(secondary)))
    }
}

/// Adapter for [`CliError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Threadmap(ThreadmapError::Io(_)) => "threadmap::io",
            CliError::Threadmap(ThreadmapError::Tree(_)) => "threadmap::tree",
            CliError::Threadmap(ThreadmapError::Config(_)) | CliError::Config(_) => {
                "threadmap::config"
            }
            CliError::Scene { err, .. } => err.code(),
            CliError::Report(_) => "threadmap::report",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A scene error with source location information.
    Scene(SceneAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Scene(s) => fmt::Display::fmt(s, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Scene(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Scene(s) => s.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Scene(s) => s.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Scene(s) => s.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Scene(s) => s.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: std::ops::Range<usize>) -> SourceSpan {
    SourceSpan::from(span)
}

/// Converts a [`CliError`] into a reportable error.
pub fn to_reportable(err: &CliError) -> Reportable<'_> {
    match err {
        CliError::Scene { err, src } => Reportable::Scene(SceneAdapter::new(err, src)),
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_scene_error_has_labels() {
        let src = "[[thread]]\nkey = \"a\"\n\n[[thread]]\nkey = \"a\"\n";
        let err = SceneError::DuplicateKey {
            key: "a".to_string(),
            span: 29..32,
            first: 17..20,
        };
        let cli_err = CliError::new_scene_error(err, src);

        let reportable = to_reportable(&cli_err);
        assert_eq!(reportable.to_string(), "duplicate thread key `a`");
        assert_eq!(
            reportable.code().map(|code| code.to_string()).as_deref(),
            Some("threadmap::scene::duplicate_key")
        );
        assert!(reportable.source_code().is_some());

        let labels: Vec<_> = reportable.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("redefined here"));
        assert!(!labels[1].primary());
        assert_eq!(labels[1].offset(), 17);
    }

    #[test]
    fn test_syntax_error_without_span() {
        let err = SceneError::Syntax {
            message: "bad".to_string(),
            span: None,
        };
        let adapter = SceneAdapter::new(&err, "");
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_plain_error() {
        let err = CliError::Config(ConfigError::Parse("oops".to_string()));

        match to_reportable(&err) {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Failed to parse TOML configuration: oops");
                assert_eq!(
                    e.code().map(|code| code.to_string()).as_deref(),
                    Some("threadmap::config")
                );
                assert!(e.labels().is_none());
            }
            Reportable::Scene(_) => panic!("Expected Error"),
        }
    }
}
