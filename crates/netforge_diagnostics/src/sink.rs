//! Thread-safe diagnostic accumulator with per-code severity overrides.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A thread-safe accumulator for diagnostics emitted during validation and
/// code generation.
///
/// A sink may carry lint overrides: codes in the `allow` set are dropped on
/// emission, and codes in the `deny` set are promoted to
/// [`Severity::Error`]. Allow wins when a code is in both sets.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
    denied: HashSet<DiagnosticCode>,
    allowed: HashSet<DiagnosticCode>,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink with no overrides.
    pub fn new() -> Self {
        Self::with_overrides(HashSet::new(), HashSet::new())
    }

    /// Creates a sink that promotes `deny` codes to errors and drops `allow` codes.
    pub fn with_overrides(denied: HashSet<DiagnosticCode>, allowed: HashSet<DiagnosticCode>) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
            denied,
            allowed,
        }
    }

    /// Emits a diagnostic into the sink, applying the sink's overrides.
    pub fn emit(&self, mut diag: Diagnostic) {
        if self.allowed.contains(&diag.code) {
            return;
        }
        if self.denied.contains(&diag.code) {
            diag.severity = Severity::Error;
        }
        if diag.severity == Severity::Error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        let mut diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.push(diag);
    }

    /// Returns `true` if any error-severity diagnostics have been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns the number of warning-severity diagnostics currently held.
    pub fn warning_count(&self) -> usize {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.diagnostics.lock().unwrap();
        std::mem::take(&mut *diagnostics)
    }

    /// Returns a snapshot of all accumulated diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let diagnostics = self.diagnostics.lock().unwrap();
        diagnostics.clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
