//! citeform - dataset citations in the formats reference managers import.
//!
//! One [`CitationRecord`] renders to four independent formats:
//!
//! - `plain` - the human-readable citation sentence (optionally HTML-escaped)
//! - `bibtex` - a `@misc` entry
//! - `ris` - a `TY  - DATA` record
//! - `endnotexml` - an EndNote XML document
//!
//! # Quick Start
//!
//! ```rust
//! use citeform::{CitationRecord, LabelBundle, Locale, PersistentId};
//!
//! let record = CitationRecord::new("Title", "Dataverse", "2019")
//!     .author("Author, The First")
//!     .with_dataset_pid(PersistentId::new("doi", "10.18150", "ZENON"));
//!
//! let labels = LabelBundle::builtin();
//! let ris = citeform::ris::emit(&record, &labels, &Locale::new("en")).unwrap();
//!
//! assert!(ris.starts_with("TY  - DATA\r\n"));
//! assert!(ris.ends_with("ER  - "));
//! ```
//!
//! # Features
//!
//! Each format is a Cargo feature (`plain`, `bibtex`, `ris`, `endnotexml`);
//! `all` (the default) enables every one.
//!
//! # Labels
//!
//! Writers never hard-code the bracketed labels (`[data]`, `[producer]`, ...).
//! They ask a [`LabelResolver`] for the word in the requested locale and
//! decorate it themselves. [`LabelBundle`] is the bundled resolver; hosts with
//! their own localization plug in by implementing the trait.

use std::fmt;
use std::str::FromStr;

// Re-export core types
pub use citeform_core::*;

/// Plain-text citation support.
#[cfg(feature = "plain")]
pub mod plain {
    pub use citeform_write_plain::{PlainWriter, emit, emit_with_options};
}

/// BibTeX support.
#[cfg(feature = "bibtex")]
pub mod bibtex {
    pub use citeform_write_bibtex::{BibtexWriter, emit, emit_with_options};
}

/// RIS support.
#[cfg(feature = "ris")]
pub mod ris {
    pub use citeform_write_ris::{RisWriter, emit, emit_with_options};
}

/// EndNote XML support.
#[cfg(feature = "endnotexml")]
pub mod endnotexml {
    pub use citeform_write_endnotexml::{
        EndNoteXmlWriter, TagError, TagWriter, emit, emit_with_options,
    };
}

/// Error from [`render`].
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown format: {0}")]
    UnknownFormat(String),
    #[error("format {0} is not enabled in this build")]
    Disabled(Format),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// The citation formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Plain,
    Bibtex,
    Ris,
    EndNoteXml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Plain, Format::Bibtex, Format::Ris, Format::EndNoteXml];

    pub fn name(self) -> &'static str {
        match self {
            Format::Plain => "plain",
            Format::Bibtex => "bibtex",
            Format::Ris => "ris",
            Format::EndNoteXml => "endnotexml",
        }
    }

    /// File extension for downloads.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Plain => "txt",
            Format::Bibtex => "bib",
            Format::Ris => "ris",
            Format::EndNoteXml => "xml",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Plain => "text/plain",
            Format::Bibtex => "application/x-bibtex",
            Format::Ris => "application/x-research-info-systems",
            Format::EndNoteXml => "text/xml",
        }
    }

    /// The emitter for this format, if its feature is enabled.
    pub fn emitter(self) -> Option<&'static dyn Emitter> {
        emitters().into_iter().find(|e| e.format() == self.name())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" | "txt" => Ok(Format::Plain),
            "bibtex" | "bib" => Ok(Format::Bibtex),
            "ris" => Ok(Format::Ris),
            "endnotexml" | "endnote" | "xml" => Ok(Format::EndNoteXml),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

/// Emitters for every enabled format.
#[allow(unused_mut)]
pub fn emitters() -> Vec<&'static dyn Emitter> {
    let mut emitters: Vec<&'static dyn Emitter> = Vec::new();
    #[cfg(feature = "plain")]
    emitters.push(&citeform_write_plain::PlainWriter);
    #[cfg(feature = "bibtex")]
    emitters.push(&citeform_write_bibtex::BibtexWriter);
    #[cfg(feature = "ris")]
    emitters.push(&citeform_write_ris::RisWriter);
    #[cfg(feature = "endnotexml")]
    emitters.push(&citeform_write_endnotexml::EndNoteXmlWriter);
    emitters
}

/// Render `record` in `format`.
pub fn render(
    format: Format,
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
    options: &EmitOptions,
) -> Result<String, RenderError> {
    let emitter = format.emitter().ok_or(RenderError::Disabled(format))?;
    Ok(emitter.emit(record, labels, locale, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names_round_trip() {
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), format);
        }
        assert_eq!("BIB".parse::<Format>().unwrap(), Format::Bibtex);
        assert!("csl".parse::<Format>().is_err());
    }

    #[cfg(feature = "all")]
    #[test]
    fn test_every_format_has_an_emitter() {
        for format in Format::ALL {
            assert_eq!(format.emitter().unwrap().format(), format.name());
        }
    }

    #[test]
    fn test_download_metadata() {
        assert_eq!(Format::Bibtex.extension(), "bib");
        assert_eq!(Format::Ris.mime_type(), "application/x-research-info-systems");
        assert_eq!(Format::EndNoteXml.extension(), "xml");
    }
}
