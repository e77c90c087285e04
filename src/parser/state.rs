//! Parser State Machine
//!
//! Drives package reconstruction over the quick-xml event stream: element
//! dispatch, the two-phase callback protocol, skip handling and the warning
//! accumulator. One engine runs one linear pass over one source.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::schema::{ChildRule, Schema};
use super::{NewPackageDecision, PackageDecision, PackageHandler};
use crate::error::ParseError;
use crate::package::{ChangelogEntry, FileType, PackageBuilder, PackageFile, EVR};

const TAG_PACKAGE: &[u8] = b"package";

/// Position in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between package elements
    Idle,
    /// Inside one package element's subtree
    InPackage,
}

/// Package-child element currently accumulating text content
enum Pending {
    None,
    File { kind: FileType, path: String },
    Changelog { author: Option<String>, date: Option<i64>, text: String },
}

/// One parse pass over one event stream
///
/// The engine exclusively owns the in-flight builder; ownership of each
/// completed record moves to the handler exactly once, at package close.
pub(crate) struct Engine<'h, H: PackageHandler> {
    schema: &'static Schema,
    handler: &'h mut H,
    state: State,
    building: Option<PackageBuilder>,
    skipping: bool,
    pending: Pending,
    warnings: String,
    delivered: u64,
}

impl<'h, H: PackageHandler> Engine<'h, H> {
    pub(crate) fn new(schema: &'static Schema, handler: &'h mut H) -> Self {
        Engine {
            schema,
            handler,
            state: State::Idle,
            building: None,
            skipping: false,
            pending: Pending::None,
            warnings: String::new(),
            delivered: 0,
        }
    }

    /// Consume the whole source, flushing accumulated warnings on the way
    /// out regardless of how the pass ended.
    pub(crate) fn run<R: BufRead>(
        mut self,
        source: R,
        warnings_out: Option<&mut String>,
    ) -> Result<u64, ParseError> {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);

        log::trace!(
            "parsing {} metadata",
            String::from_utf8_lossy(self.schema.root)
        );
        let result = self.event_loop(&mut reader);

        if !self.warnings.is_empty() {
            if let Some(out) = warnings_out {
                out.push_str(&self.warnings);
            }
        }
        result
    }

    fn event_loop<R: BufRead>(&mut self, reader: &mut Reader<R>) -> Result<u64, ParseError> {
        let mut buf = Vec::new();
        loop {
            match reader.read_event(&mut buf)? {
                Event::Start(ref e) => self.open_element(reader, e, false)?,
                Event::Empty(ref e) => self.open_element(reader, e, true)?,
                Event::End(ref e) => self.close_element(e.name())?,
                Event::Text(ref e) => {
                    let content = e.unescape_and_decode(reader)?;
                    self.text(&content);
                }
                Event::CData(ref e) => {
                    // CDATA is plain character data here, same as text.
                    let content = reader.decode(e)?.to_string();
                    self.text(&content);
                }
                Event::Eof => {
                    if self.state != State::Idle {
                        return Err(ParseError::MalformedDocument(
                            "premature end of document inside a package element".to_string(),
                        ));
                    }
                    break;
                }
                _ => (),
            }
            buf.clear();
        }
        log::trace!("delivered {} packages", self.delivered);
        Ok(self.delivered)
    }

    fn open_element<R: BufRead>(
        &mut self,
        reader: &mut Reader<R>,
        tag: &BytesStart,
        self_closing: bool,
    ) -> Result<(), ParseError> {
        match self.state {
            State::Idle => {
                if tag.name() == self.schema.root {
                    Ok(())
                } else if tag.name() == TAG_PACKAGE {
                    self.open_package(reader, tag, self_closing)
                } else {
                    skip_subtree(reader, tag, self_closing)
                }
            }
            State::InPackage => {
                // Inside a file/changelog element only text is recognized;
                // nested elements there are out of vocabulary.
                if !matches!(self.pending, Pending::None) {
                    return skip_subtree(reader, tag, self_closing);
                }
                match self.schema.child_rule(tag.name()) {
                    Some(ChildRule::Version) => self.open_version(reader, tag),
                    Some(ChildRule::FileEntry) => self.open_file(reader, tag, self_closing),
                    Some(ChildRule::Changelog) => self.open_changelog(reader, tag, self_closing),
                    None => skip_subtree(reader, tag, self_closing),
                }
            }
        }
    }

    /// Package element open: read identifying attributes, run the
    /// pre-allocation decision, enter the package subtree.
    fn open_package<R: BufRead>(
        &mut self,
        reader: &mut Reader<R>,
        tag: &BytesStart,
        self_closing: bool,
    ) -> Result<(), ParseError> {
        let name = attr_value(reader, tag, b"name")?;
        let arch = attr_value(reader, tag, b"arch")?;
        let pkgid = match attr_value(reader, tag, b"pkgid")? {
            Some(pkgid) if !pkgid.is_empty() => pkgid,
            _ => {
                return Err(ParseError::MalformedDocument(
                    "missing attribute \"pkgid\" of a package element".to_string(),
                ))
            }
        };

        match self.handler.new_package(&pkgid, name.as_deref(), arch.as_deref()) {
            NewPackageDecision::Interrupt => Err(ParseError::CallbackInterrupted(
                "parsing interrupted by the new-package callback".to_string(),
            )),
            NewPackageDecision::Skip => {
                if !self_closing {
                    self.state = State::InPackage;
                    self.skipping = true;
                }
                Ok(())
            }
            NewPackageDecision::Allocate => {
                let builder = PackageBuilder::new(pkgid, name, arch);
                if self_closing {
                    self.deliver(builder)
                } else {
                    self.state = State::InPackage;
                    self.skipping = false;
                    self.building = Some(builder);
                    Ok(())
                }
            }
        }
    }

    fn open_version<R: BufRead>(
        &mut self,
        reader: &Reader<R>,
        tag: &BytesStart,
    ) -> Result<(), ParseError> {
        if self.skipping {
            return Ok(());
        }
        let evr = EVR {
            epoch: attr_value(reader, tag, b"epoch")?,
            version: attr_value(reader, tag, b"ver")?,
            release: attr_value(reader, tag, b"rel")?,
        };
        if let Some(builder) = self.building.as_mut() {
            builder.set_evr(evr);
        }
        Ok(())
    }

    fn open_file<R: BufRead>(
        &mut self,
        reader: &Reader<R>,
        tag: &BytesStart,
        self_closing: bool,
    ) -> Result<(), ParseError> {
        let kind = match attr_value(reader, tag, b"type")? {
            None => FileType::File,
            Some(value) => match FileType::from_attr(&value) {
                Some(kind) => kind,
                None => {
                    // Reflects document content, so it fires for skipped
                    // packages too.
                    self.warn(&format!("Unknown file type \"{}\"", value));
                    FileType::File
                }
            },
        };
        let pending = Pending::File {
            kind,
            path: String::new(),
        };
        if self_closing {
            self.complete_child(pending);
        } else {
            self.pending = pending;
        }
        Ok(())
    }

    fn open_changelog<R: BufRead>(
        &mut self,
        reader: &Reader<R>,
        tag: &BytesStart,
        self_closing: bool,
    ) -> Result<(), ParseError> {
        let author = attr_value(reader, tag, b"author")?;
        let date = match attr_value(reader, tag, b"date")? {
            None => None,
            Some(value) => match value.parse::<i64>() {
                Ok(date) => Some(date),
                Err(_) => {
                    self.warn(&format!("Conversion of \"{}\" to integer failed", value));
                    None
                }
            },
        };
        let pending = Pending::Changelog {
            author,
            date,
            text: String::new(),
        };
        if self_closing {
            self.complete_child(pending);
        } else {
            self.pending = pending;
        }
        Ok(())
    }

    fn close_element(&mut self, name: &[u8]) -> Result<(), ParseError> {
        if self.state == State::Idle {
            return Ok(());
        }
        if name == TAG_PACKAGE {
            self.state = State::Idle;
            self.pending = Pending::None;
            self.skipping = false;
            if let Some(builder) = self.building.take() {
                return self.deliver(builder);
            }
            return Ok(());
        }
        let pending = std::mem::replace(&mut self.pending, Pending::None);
        self.complete_child(pending);
        Ok(())
    }

    fn text(&mut self, content: &str) {
        match &mut self.pending {
            Pending::File { path, .. } => path.push_str(content),
            Pending::Changelog { text, .. } => text.push_str(content),
            Pending::None => (),
        }
    }

    /// Store a finished child entry; a skipped package has no builder, so
    /// its entries are consumed and dropped here.
    fn complete_child(&mut self, pending: Pending) {
        let builder = match self.building.as_mut() {
            Some(builder) => builder,
            None => return,
        };
        match pending {
            Pending::None => (),
            Pending::File { kind, path } => builder.push_file(PackageFile { path, kind }),
            Pending::Changelog { author, date, text } => {
                builder.push_changelog(ChangelogEntry { author, date, text })
            }
        }
    }

    /// Hand the completed record to the handler. The delivery counts even
    /// when the handler interrupts on this very call.
    fn deliver(&mut self, builder: PackageBuilder) -> Result<(), ParseError> {
        self.delivered += 1;
        match self.handler.package(builder.finish()) {
            PackageDecision::Continue => Ok(()),
            PackageDecision::Interrupt => Err(ParseError::CallbackInterrupted(
                "parsing interrupted by the package callback".to_string(),
            )),
        }
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{}", message);
        self.warnings.push_str(message);
        self.warnings.push(';');
    }
}

/// Consume an out-of-vocabulary element together with its whole subtree.
fn skip_subtree<R: BufRead>(
    reader: &mut Reader<R>,
    tag: &BytesStart,
    self_closing: bool,
) -> Result<(), ParseError> {
    if self_closing {
        return Ok(());
    }
    let end = tag.name().to_vec();
    let mut buf = Vec::new();
    reader.read_to_end(end, &mut buf)?;
    Ok(())
}

/// Decode one attribute value, `None` if the attribute is absent.
fn attr_value<R: BufRead>(
    reader: &Reader<R>,
    tag: &BytesStart,
    name: &[u8],
) -> Result<Option<String>, ParseError> {
    match tag.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_and_decode_value(reader)?)),
        None => Ok(None),
    }
}
