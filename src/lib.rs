//! repodata-xml - Streaming parser for RPM repository metadata
//!
//! Reconstructs per-package records from repository metadata XML
//! (filelists.xml and other.xml) without materializing the document.
//! Packages are pushed to a caller-supplied handler one at a time; the
//! handler decides per package whether to build it, skip it, or abort the
//! whole pass.
//!
//! The source must already be decompressed; tokenization is delegated to
//! quick-xml.

mod error;
mod package;
mod parser;

pub use error::ParseError;
pub use package::{ChangelogEntry, FileType, Package, PackageFile, EVR};
pub use parser::{
    parse_filelists, parse_other, NewPackageDecision, PackageCollector, PackageDecision,
    PackageHandler,
};
