use serde::{Serialize, Serializer};
use std::fmt;

/// Whether a diagnostic is a structural error or a stylistic suspicion.
///
/// Advisory diagnostics describe code that is legal but probably not what the
/// author meant (`x = (1)`, an unquoted dict key). They are reported and
/// counted like everything else, and can be dropped with `--errors-only`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    MissingColon,
    BadIndent,
    MixedTabsSpaces,
    UnclosedString,
    UnclosedBracket,
    UnquotedDictKey,
    MissingDictColon,
    SingletonTupleMissingComma,
    InvalidIdentifier,
    DanglingElse,
    InvalidNumber,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingColon => "WD001",
            DiagnosticKind::BadIndent => "WD002",
            DiagnosticKind::MixedTabsSpaces => "WD003",
            DiagnosticKind::UnclosedString => "WD004",
            DiagnosticKind::UnclosedBracket => "WD005",
            DiagnosticKind::UnquotedDictKey => "WD006",
            DiagnosticKind::MissingDictColon => "WD007",
            DiagnosticKind::SingletonTupleMissingComma => "WD008",
            DiagnosticKind::InvalidIdentifier => "WD009",
            DiagnosticKind::DanglingElse => "WD010",
            DiagnosticKind::InvalidNumber => "WD011",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnquotedDictKey | DiagnosticKind::SingletonTupleMissingComma => {
                Severity::Advisory
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for DiagnosticKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One reported issue, anchored to a concrete (line, col) in the source.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub col: usize,
    #[serde(rename = "code")]
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl Diagnostic {
    pub fn new(
        file: &str,
        line: usize,
        col: usize,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.to_string(),
            line,
            col,
            kind,
            severity: kind.severity(),
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} {}",
            self.file, self.line, self.col, self.kind, self.message
        )?;
        if self.severity == Severity::Advisory {
            write!(f, " [advisory]")?;
        }
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {fix})")?;
        }
        Ok(())
    }
}
