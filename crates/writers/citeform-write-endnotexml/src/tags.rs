//! Stack-based XML tag writer.
//!
//! Every `open` is matched by a `close` in LIFO order; `finish` refuses to
//! return a document while tags are still open. Attributes attach to the most
//! recently opened tag until content or another tag is written.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

const PROLOGUE: &str = "<?xml version='1.0' encoding='UTF-8'?>";

/// Structural or output failure while writing XML.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("close without a matching open tag")]
    NothingOpen,
    #[error("attribute {0:?} written outside a start tag")]
    StrayAttribute(String),
    #[error("unclosed tags at end of document: {0:?}")]
    Unclosed(Vec<String>),
    #[error("xml output failed")]
    Write(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("xml output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl TagError {
    fn write(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TagError::Write(cause.into())
    }
}

/// Writes an XML document one tag at a time into an in-memory buffer.
pub struct TagWriter {
    writer: Writer<Cursor<Vec<u8>>>,
    open: Vec<String>,
    pending: Option<BytesStart<'static>>,
}

impl TagWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
            open: Vec::new(),
            pending: None,
        }
    }

    /// Write the XML declaration.
    pub fn start(&mut self) -> Result<&mut Self, TagError> {
        self.writer
            .get_mut()
            .write_all(PROLOGUE.as_bytes())
            .map_err(TagError::write)?;
        Ok(self)
    }

    /// Open a tag.
    pub fn open(&mut self, name: &str) -> Result<&mut Self, TagError> {
        self.flush()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(self)
    }

    /// Add an attribute to the tag just opened.
    pub fn attribute(&mut self, key: &str, value: &str) -> Result<&mut Self, TagError> {
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((key, &*xml_chars(value)));
                Ok(self)
            }
            None => Err(TagError::StrayAttribute(key.to_string())),
        }
    }

    /// Write escaped text inside the current tag.
    ///
    /// Characters XML 1.0 does not allow (most C0 controls, U+FFFE, U+FFFF)
    /// are dropped.
    pub fn text(&mut self, value: &str) -> Result<&mut Self, TagError> {
        self.flush()?;
        let value = xml_chars(value);
        self.event(Event::Text(BytesText::from_escaped(escape(value))))?;
        Ok(self)
    }

    /// Close the most recently opened tag.
    pub fn close(&mut self) -> Result<&mut Self, TagError> {
        self.flush()?;
        let name = self.open.pop().ok_or(TagError::NothingOpen)?;
        self.event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// `<name>value</name>`.
    pub fn element(&mut self, name: &str, value: &str) -> Result<&mut Self, TagError> {
        self.open(name)?.text(value)?.close()
    }

    /// One `<item>` per value, inside `<wrapper>` if given. Nothing for no values.
    pub fn collection<S: AsRef<str>>(
        &mut self,
        wrapper: Option<&str>,
        item: &str,
        values: &[S],
    ) -> Result<&mut Self, TagError> {
        if values.is_empty() {
            return Ok(self);
        }
        if let Some(wrapper) = wrapper {
            self.open(wrapper)?;
        }
        for value in values {
            self.element(item, value.as_ref())?;
        }
        if wrapper.is_some() {
            self.close()?;
        }
        Ok(self)
    }

    /// Return the finished document, which must have every tag closed.
    pub fn finish(mut self) -> Result<String, TagError> {
        self.flush()?;
        if !self.open.is_empty() {
            return Err(TagError::Unclosed(std::mem::take(&mut self.open)));
        }
        let bytes = self.writer.into_inner().into_inner();
        Ok(String::from_utf8(bytes)?)
    }

    fn flush(&mut self) -> Result<(), TagError> {
        if let Some(start) = self.pending.take() {
            self.event(Event::Start(start))?;
        }
        Ok(())
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), TagError> {
        self.writer.write_event(event).map_err(TagError::write)
    }
}

/// `value` without the characters XML 1.0 forbids.
fn xml_chars(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
        || c >= '\u{10000}'
}

impl Default for TagWriter {
    fn default() -> Self {
        Self::new()
    }
}
