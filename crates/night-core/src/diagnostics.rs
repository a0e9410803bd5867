//! The diagnostic sink shared by the compile phases.
//!
//! `Diagnostics` accumulates warnings and minor errors so that a single
//! compile can report every type problem it finds, and records at most one
//! fatal error, which marks the compile as failed.
//!
//! # Examples
//!
//! ```
//! use night_core::{Diagnostics, Span};
//!
//! let mut diagnostics = Diagnostics::new().with_section("main.night");
//! diagnostics.minor_error("type mismatch between 'str' and 'int'", Span::point(3, 7));
//!
//! assert!(diagnostics.has_minor_errors());
//! assert_eq!(
//!     diagnostics.to_string(),
//!     "main.night:3:7: minor error: type mismatch between 'str' and 'int'"
//! );
//! ```

use std::fmt;
use std::panic::Location;

use crate::{CompilationError, FatalError, Span};

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Informational, never blocks compilation.
    Warning,
    /// A recoverable semantic problem; checking continues past it.
    MinorError,
    /// Compilation cannot continue.
    FatalError,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::MinorError => "minor error",
            DiagnosticKind::FatalError => "fatal error",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub kind: DiagnosticKind,
    /// The diagnostic message text.
    pub message: String,
    /// Where in the script the problem is.
    pub span: Span,
    /// The compiler call site that raised it, recorded in debug mode.
    pub origin: Option<&'static Location<'static>>,
}

/// Collector for warnings, minor errors and the fatal error of a compile.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    fatal: Option<Diagnostic>,
    section: Option<String>,
    debug: bool,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the compiler call site of every diagnostic.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Name of the file or section the diagnostics refer to.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Records an informational warning.
    #[track_caller]
    pub fn warning(&mut self, msg: impl Into<String>, span: Span) {
        let diagnostic = self.make(DiagnosticKind::Warning, msg.into(), span);
        self.entries.push(diagnostic);
    }

    /// Records a recoverable error. Compilation continues.
    #[track_caller]
    pub fn minor_error(&mut self, msg: impl Into<String>, span: Span) {
        let diagnostic = self.make(DiagnosticKind::MinorError, msg.into(), span);
        self.entries.push(diagnostic);
    }

    /// Records a compilation error as a minor diagnostic.
    #[track_caller]
    pub fn report(&mut self, error: &CompilationError) {
        self.minor_error(error.to_string(), error.span());
    }

    /// Records a fatal error and returns it so the caller can bail out.
    ///
    /// A later fatal error replaces an earlier one; only the last is kept.
    #[track_caller]
    #[must_use]
    pub fn fatal_error(&mut self, msg: impl Into<String>, span: Span) -> FatalError {
        let diagnostic = self.make(DiagnosticKind::FatalError, msg.into(), span);
        let error = FatalError {
            message: self.format(&diagnostic),
            span,
        };
        self.fatal = Some(diagnostic);
        error
    }

    /// Returns `true` if any minor error was recorded.
    pub fn has_minor_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.kind == DiagnosticKind::MinorError)
    }

    /// Returns `true` if a fatal error was recorded.
    pub fn has_fatal_error(&self) -> bool {
        self.fatal.is_some()
    }

    /// The formatted fatal error message, if any.
    pub fn fatal_message(&self) -> Option<String> {
        self.fatal.as_ref().map(|d| self.format(d))
    }

    /// Number of minor errors recorded.
    pub fn minor_error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MinorError)
            .count()
    }

    /// Number of warnings recorded.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
            .count()
    }

    /// Iterate over the minor errors in the order they were reported.
    pub fn minor_errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MinorError)
    }

    /// Iterate over warnings and minor errors in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Returns `true` if nothing at all was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.fatal.is_none()
    }

    /// Format one diagnostic with this sink's section and debug settings.
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = match &self.section {
            Some(section) => format!(
                "{}:{}:{}: {}: {}",
                section, diagnostic.span.line, diagnostic.span.col, diagnostic.kind, diagnostic.message
            ),
            None => format!(
                "{}:{}: {}: {}",
                diagnostic.span.line, diagnostic.span.col, diagnostic.kind, diagnostic.message
            ),
        };
        if let Some(origin) = diagnostic.origin {
            out.push_str(&format!(" [{}:{}]", origin.file(), origin.line()));
        }
        out
    }

    #[track_caller]
    fn make(&self, kind: DiagnosticKind, message: String, span: Span) -> Diagnostic {
        tracing::debug!(kind = kind.as_str(), %span, "{message}");
        Diagnostic {
            kind,
            message,
            span,
            origin: if self.debug {
                Some(Location::caller())
            } else {
                None
            },
        }
    }
}

impl fmt::Display for Diagnostics {
    /// The fatal error if there is one, otherwise every minor error, one per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(fatal) = &self.fatal {
            return write!(f, "{}", self.format(fatal));
        }
        for (i, diagnostic) in self.minor_errors().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.format(diagnostic))?;
        }
        Ok(())
    }
}
