//! Recoverable problems found while encoding.
//!
//! A diagnostic never stops an encode: the offending value is replaced by a
//! default (or omitted) and the encode carries on. Every diagnostic is
//! logged at `warn` level as it is recorded.

/// Diagnostic codes for lenient encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// W101: INFO string longer than 256 bytes was cut
    StringTruncated,
    /// W102: INFO sub-record absent from the IR
    MissingInfoField,
    /// W103: Top-level LIST absent from the IR
    MissingList,
    /// W104: sdta list has no `smpl` sub-chunk
    MissingSampleData,
    /// W105: pdta table absent from the IR
    MissingTable,
    /// W106: Generator amount has the wrong shape or range; 0 used
    MalformedAmount,
    /// W107: INFO value has the wrong kind for its field
    InfoKindMismatch,
    /// W108: Chunk id or form type differs from the format's
    UnexpectedChunkId,
    /// W109: The same LIST form appears more than once; first kept
    DuplicateList,
}

impl DiagnosticCode {
    /// Returns the diagnostic code string (e.g., "W101").
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticCode::StringTruncated => "W101",
            DiagnosticCode::MissingInfoField => "W102",
            DiagnosticCode::MissingList => "W103",
            DiagnosticCode::MissingSampleData => "W104",
            DiagnosticCode::MissingTable => "W105",
            DiagnosticCode::MalformedAmount => "W106",
            DiagnosticCode::InfoKindMismatch => "W107",
            DiagnosticCode::UnexpectedChunkId => "W108",
            DiagnosticCode::DuplicateList => "W109",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// Human-readable message.
    pub message: String,
    /// Location in the IR (e.g., "pdta.igen\[3\]").
    pub path: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with a location.
    pub fn with_path(
        code: DiagnosticCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Collects diagnostics during a single encode.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Record and log a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    /// Shorthand for [`Diagnostic::with_path`] + [`report`](Self::report).
    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, path: impl Into<String>) {
        self.report(Diagnostic::with_path(code, message, path));
    }

    /// Consume the collector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let codes = [
            DiagnosticCode::StringTruncated,
            DiagnosticCode::MissingInfoField,
            DiagnosticCode::MissingList,
            DiagnosticCode::MissingSampleData,
            DiagnosticCode::MissingTable,
            DiagnosticCode::MalformedAmount,
            DiagnosticCode::InfoKindMismatch,
            DiagnosticCode::UnexpectedChunkId,
            DiagnosticCode::DuplicateList,
        ];
        let mut strings: Vec<&str> = codes.iter().map(|c| c.code()).collect();
        strings.sort();
        strings.dedup();
        assert_eq!(strings.len(), codes.len());
    }

    #[test]
    fn test_collector_keeps_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.warn(DiagnosticCode::MissingTable, "pmod missing", "pdta.pmod");
        diagnostics.warn(DiagnosticCode::MissingTable, "imod missing", "pdta.imod");

        let items = diagnostics.into_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].to_string(), "W105: imod missing (at pdta.imod)");
    }
}
