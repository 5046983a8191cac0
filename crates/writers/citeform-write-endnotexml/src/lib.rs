//! EndNote XML writer for citeform.
//!
//! Emits a one-record EndNote XML document with reference type 59 (Dataset).
//! The document is written through [`TagWriter`], so every branch that opens a
//! tag also closes it; any writer failure aborts the render instead of
//! returning partial XML.

mod tags;

pub use tags::{TagError, TagWriter};

use citeform_core::{
    CitationContext, CitationRecord, EmitError, EmitOptions, Emitter, Label, LabelResolver,
    Locale, non_blank,
};

/// EndNote reference type for datasets.
const DATASET_REF_TYPE: &str = "59";

/// Emit an EndNote XML document.
pub fn emit(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
) -> Result<String, EmitError> {
    emit_with_options(record, labels, locale, &EmitOptions::default())
}

/// Emit an EndNote XML document with options.
pub fn emit_with_options(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
    options: &EmitOptions,
) -> Result<String, EmitError> {
    tracing::debug!(format = "endnotexml", %locale, "rendering citation");
    let cite = CitationContext::new(record, labels, locale, options);
    let mut xml = TagWriter::new();
    match write_document(&cite, &mut xml) {
        Ok(()) => {}
        Err(RecordError::Label(e)) => return Err(EmitError::Label(e)),
        Err(RecordError::Tag(e)) => return Err(render_failed(e)),
    }
    xml.finish().map_err(render_failed)
}

/// [`Emitter`] for EndNote XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndNoteXmlWriter;

impl Emitter for EndNoteXmlWriter {
    fn format(&self) -> &str {
        "endnotexml"
    }

    fn emit(
        &self,
        record: &CitationRecord,
        labels: &dyn LabelResolver,
        locale: &Locale,
        options: &EmitOptions,
    ) -> Result<String, EmitError> {
        emit_with_options(record, labels, locale, options)
    }
}

fn render_failed(e: TagError) -> EmitError {
    tracing::warn!(error = %e, "EndNote XML rendering failed");
    EmitError::render(e)
}

/// Label lookups and tag writes fail differently: the first is the caller's
/// configuration problem, the second a rendering failure.
enum RecordError {
    Label(citeform_core::LabelError),
    Tag(TagError),
}

impl From<citeform_core::LabelError> for RecordError {
    fn from(e: citeform_core::LabelError) -> Self {
        RecordError::Label(e)
    }
}

impl From<TagError> for RecordError {
    fn from(e: TagError) -> Self {
        RecordError::Tag(e)
    }
}

fn write_document(cite: &CitationContext<'_>, xml: &mut TagWriter) -> Result<(), RecordError> {
    let record = cite.record;

    xml.start()?.open("xml")?.open("records")?.open("record")?;

    xml.open("ref-type")?
        .attribute("name", "Dataset")?
        .text(DATASET_REF_TYPE)?
        .close()?;

    xml.open("contributors")?
        .collection(Some("authors"), "author", &record.authors)?
        .close()?;

    xml.open("titles")?;
    xml.element(
        "title",
        &format!("{}{}", record.title, cite.label(Label::Data)?),
    )?;
    if let Some(file_title) = cite.file_title() {
        xml.element(
            "secondary-title",
            &format!("{}{}", file_title, cite.label(Label::FileName)?),
        )?;
    }
    if let Some(series) = cite.series_title() {
        xml.element("tertiary-title", series)?;
    }
    xml.close()?; // titles

    xml.collection(Some("keywords"), "keyword", &record.keywords)?;
    xml.open("dates")?
        .element("year", cite.cited_year())?
        .close()?;

    if cite.has_publishing_data() {
        xml.element("publisher", &cite.publishing_data()?)?;
    }
    if let Some(version) = non_blank(record.version.as_deref()) {
        xml.element("edition", version)?;
    }
    xml.collection(None, "language", &record.languages)?;

    if let Some(pid) = &record.pid_of_dataset {
        xml.open("urls")?
            .open("web-urls")?
            .element("url", &cite.dataset_pid_url())?
            .close()? // web-urls
            .close()?; // urls
        xml.element(
            "electronic-resource-num",
            &format!("{}/{}/{}", pid.protocol, pid.authority, pid.identifier),
        )?;
    }
    if let Some(unf) = cite.unf() {
        xml.element("custom2", unf)?;
    }

    xml.close()? // record
        .close()? // records
        .close()?; // xml
    Ok(())
}
