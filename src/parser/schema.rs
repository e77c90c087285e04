//! Document Schema Descriptors
//!
//! One engine serves every metadata variant; the per-variant differences
//! (root element name, what a package's child elements mean) live in a
//! small static descriptor instead of document-type branches in the loop.

/// Behavior of a recognized package-child element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildRule {
    /// `<version epoch= ver= rel=>` attributes fill the record's EVR
    Version,
    /// `<file type=>path</file>` becomes a file entry
    FileEntry,
    /// `<changelog author= date=>text</changelog>` becomes a changelog entry
    Changelog,
}

/// Recognized vocabulary of one document variant
#[derive(Debug)]
pub(crate) struct Schema {
    /// Root collection element name
    pub root: &'static [u8],
    /// Recognized children of a package element
    pub children: &'static [(&'static [u8], ChildRule)],
}

impl Schema {
    /// Look up the rule for a package-child element, `None` if unrecognized
    pub(crate) fn child_rule(&self, name: &[u8]) -> Option<ChildRule> {
        self.children
            .iter()
            .find(|(child, _)| *child == name)
            .map(|(_, rule)| *rule)
    }
}

/// filelists.xml: `<filelists>` of packages carrying `<version>` and `<file>`
pub(crate) static FILELISTS: Schema = Schema {
    root: b"filelists",
    children: &[(b"version", ChildRule::Version), (b"file", ChildRule::FileEntry)],
};

/// other.xml: `<otherdata>` of packages carrying `<version>` and `<changelog>`
pub(crate) static OTHER: Schema = Schema {
    root: b"otherdata",
    children: &[
        (b"version", ChildRule::Version),
        (b"changelog", ChildRule::Changelog),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filelists_vocabulary() {
        assert_eq!(FILELISTS.root, b"filelists");
        assert_eq!(FILELISTS.child_rule(b"file"), Some(ChildRule::FileEntry));
        assert_eq!(FILELISTS.child_rule(b"version"), Some(ChildRule::Version));
        assert_eq!(FILELISTS.child_rule(b"changelog"), None);
        assert_eq!(FILELISTS.child_rule(b"package"), None);
    }

    #[test]
    fn test_other_vocabulary() {
        assert_eq!(OTHER.root, b"otherdata");
        assert_eq!(OTHER.child_rule(b"changelog"), Some(ChildRule::Changelog));
        assert_eq!(OTHER.child_rule(b"file"), None);
    }
}
