use std::io::{self, Write};

use log::{error, warn};

use super::errors::Error;

/// Accumulates semantic diagnostics.
///
/// Every reported error is written to the listing stream immediately and kept
/// for later inspection. Reporting never aborts the caller; it only raises the
/// failure flag, which stays up until [`Reporter::clear`].
pub struct Reporter<W: Write> {
    out: W,
    diagnostics: Vec<Error>,
    failed: bool,
}

impl Reporter<io::Sink> {
    /// A reporter that records diagnostics without writing them anywhere.
    pub fn silent() -> Self {
        Reporter::new(io::sink())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter {
            out,
            diagnostics: vec![],
            failed: false,
        }
    }

    pub fn report(&mut self, diagnostic: Error) {
        warn!("{}", diagnostic);

        if let Err(err) = writeln!(self.out, "Semantic error {}", diagnostic) {
            error!("failed to write diagnostic: {}", err);
        }

        self.diagnostics.push(diagnostic);
        self.failed = true;
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Drops recorded diagnostics and lowers the failure flag.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.failed = false;
    }

    /// The listing stream, for writing non-diagnostic output such as the symbol table.
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
