//! Streaming Metadata Parser
//!
//! Reconstructs per-package records from repository metadata XML, one
//! package at a time, through a two-phase handler protocol: a
//! pre-allocation decision when a package element opens, then delivery of
//! the completed record when it closes. The caller can skip individual
//! packages or abort the whole pass from either phase.

mod schema;
mod state;

use std::io::BufRead;

use crate::error::ParseError;
use crate::package::Package;
use state::Engine;

/// Decision returned from [`PackageHandler::new_package`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewPackageDecision {
    /// Build this package and deliver it at its closing tag
    Allocate,
    /// Consume this package's subtree but discard the record
    Skip,
    /// Abort the whole parse; this package is never delivered
    Interrupt,
}

/// Decision returned from [`PackageHandler::package`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageDecision {
    /// Keep parsing
    Continue,
    /// Abort the parse; this delivery still counts
    Interrupt,
}

/// Receiver for reconstructed packages
///
/// Callbacks fire strictly in document order, on the calling thread, and
/// for any one package `new_package` always precedes `package`. Whatever
/// per-call context the caller needs lives on the implementing type.
pub trait PackageHandler {
    /// Called once per package element, after its identifying attributes
    /// are read and before any of its children are parsed.
    ///
    /// The default accepts every package.
    fn new_package(
        &mut self,
        pkgid: &str,
        name: Option<&str>,
        arch: Option<&str>,
    ) -> NewPackageDecision {
        let _ = (pkgid, name, arch);
        NewPackageDecision::Allocate
    }

    /// Called once per completed, non-skipped package, at its closing tag.
    /// Ownership of the record moves to the handler; the parser never
    /// touches it again.
    fn package(&mut self, package: Package) -> PackageDecision;
}

/// Handler that collects every delivered package and never interrupts
#[derive(Debug, Default)]
pub struct PackageCollector {
    /// Delivered packages in document order
    pub packages: Vec<Package>,
}

impl PackageHandler for PackageCollector {
    fn package(&mut self, package: Package) -> PackageDecision {
        self.packages.push(package);
        PackageDecision::Continue
    }
}

/// Parse a filelists.xml document from an already-decompressed source.
///
/// Returns the number of delivered packages. If any warnings occurred
/// (unrecognized file `type` values), their text is appended to
/// `warnings` in occurrence order, each entry terminated by `;`; the
/// string is left untouched otherwise, on error returns included.
pub fn parse_filelists<R: BufRead, H: PackageHandler>(
    source: R,
    handler: &mut H,
    warnings: Option<&mut String>,
) -> Result<u64, ParseError> {
    Engine::new(&schema::FILELISTS, handler).run(source, warnings)
}

/// Parse an other.xml document from an already-decompressed source.
///
/// Same protocol as [`parse_filelists`]; packages carry changelog entries
/// instead of file entries.
pub fn parse_other<R: BufRead, H: PackageHandler>(
    source: R,
    handler: &mut H,
    warnings: Option<&mut String>,
) -> Result<u64, ParseError> {
    Engine::new(&schema::OTHER, handler).run(source, warnings)
}
