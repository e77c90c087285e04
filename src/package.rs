//! Package Record Model
//!
//! Per-package metadata records reconstructed from repository XML.
//! A record is owned by the parser only while its package element is open;
//! on delivery it moves to the caller wholesale.

/// Type of a packaged file entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    /// Regular file (the default when no type attribute is present)
    #[default]
    File,
    /// Directory
    Dir,
    /// Ghost file (listed in the package but not installed)
    Ghost,
}

impl FileType {
    /// Parse a `type` attribute value, `None` for unrecognized values
    pub fn from_attr(value: &str) -> Option<FileType> {
        match value {
            "file" => Some(FileType::File),
            "dir" => Some(FileType::Dir),
            "ghost" => Some(FileType::Ghost),
            _ => None,
        }
    }

    /// The canonical attribute spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::File => "file",
            FileType::Dir => "dir",
            FileType::Ghost => "ghost",
        }
    }
}

/// A single file entry within a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    /// Full path of the entry
    pub path: String,
    /// Entry type
    pub kind: FileType,
}

/// Epoch/version/release triple from a `<version>` element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EVR {
    pub epoch: Option<String>,
    pub version: Option<String>,
    pub release: Option<String>,
}

/// One changelog entry from an other.xml `<changelog>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    /// Changelog author attribute
    pub author: Option<String>,
    /// Changelog date as a unix timestamp; `None` if absent or unparseable
    pub date: Option<i64>,
    /// Changelog text
    pub text: String,
}

/// A reconstructed per-package metadata record
///
/// `pkgid` is the content-derived package identifier and is mandatory in the
/// document; every other field is optional or may be empty. The filelists
/// variant populates `files`, the other.xml variant populates `changelogs`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Package {
    /// Content-derived package identifier (checksum)
    pub pkgid: String,
    /// Package name attribute
    pub name: Option<String>,
    /// Package architecture attribute
    pub arch: Option<String>,
    /// Epoch/version/release, when a `<version>` element was present
    pub evr: Option<EVR>,
    /// File entries in document order
    pub files: Vec<PackageFile>,
    /// Changelog entries in document order
    pub changelogs: Vec<ChangelogEntry>,
}

/// Accumulates one in-flight package record
///
/// Created when a package element opens, finalized (or discarded) at its
/// closing tag. The parser owns the builder exclusively until then.
#[derive(Debug)]
pub(crate) struct PackageBuilder {
    package: Package,
}

impl PackageBuilder {
    pub(crate) fn new(pkgid: String, name: Option<String>, arch: Option<String>) -> Self {
        PackageBuilder {
            package: Package {
                pkgid,
                name,
                arch,
                ..Package::default()
            },
        }
    }

    pub(crate) fn set_evr(&mut self, evr: EVR) {
        self.package.evr = Some(evr);
    }

    pub(crate) fn push_file(&mut self, file: PackageFile) {
        self.package.files.push(file);
    }

    pub(crate) fn push_changelog(&mut self, entry: ChangelogEntry) {
        self.package.changelogs.push(entry);
    }

    pub(crate) fn finish(self) -> Package {
        self.package
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_attr() {
        assert_eq!(FileType::from_attr("file"), Some(FileType::File));
        assert_eq!(FileType::from_attr("dir"), Some(FileType::Dir));
        assert_eq!(FileType::from_attr("ghost"), Some(FileType::Ghost));
        assert_eq!(FileType::from_attr("foo"), None);
        assert_eq!(FileType::from_attr(""), None);
        assert_eq!(FileType::from_attr("File"), None);
    }

    #[test]
    fn test_file_type_default() {
        assert_eq!(FileType::default(), FileType::File);
    }

    #[test]
    fn test_builder_preserves_entry_order() {
        let mut builder = PackageBuilder::new(
            "abc123".to_string(),
            Some("fake_bash".to_string()),
            Some("x86_64".to_string()),
        );
        builder.push_file(PackageFile {
            path: "/usr/bin/fake_bash".to_string(),
            kind: FileType::File,
        });
        builder.push_file(PackageFile {
            path: "/usr/share/fake_bash".to_string(),
            kind: FileType::Dir,
        });

        let package = builder.finish();
        assert_eq!(package.pkgid, "abc123");
        assert_eq!(package.name.as_deref(), Some("fake_bash"));
        assert_eq!(package.arch.as_deref(), Some("x86_64"));
        assert_eq!(package.files.len(), 2);
        assert_eq!(package.files[0].path, "/usr/bin/fake_bash");
        assert_eq!(package.files[1].kind, FileType::Dir);
        assert!(package.changelogs.is_empty());
        assert!(package.evr.is_none());
    }
}
