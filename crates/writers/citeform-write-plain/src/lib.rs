//! Plain-text citation writer for citeform.
//!
//! Emits the human-readable citation sentence shown on a dataset page:
//!
//! ```text
//! Author, A.; Author, B.: Title [data]. Producer [producer], Warsaw, 2001.
//! Distributor [distributor], Dataverse [publisher], 2021. https://doi.org/10.18150/X, V1
//! ```
//!
//! With HTML escaping on, every value is entity-escaped and the dataset PID
//! becomes a link.

use citeform_core::{
    CitationContext, CitationRecord, EmitError, EmitOptions, Emitter, Fragments, Label,
    LabelResolver, Locale, is_blank, join_present, non_blank,
};

/// Emit a plain-text citation.
pub fn emit(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
    escape_html: bool,
) -> Result<String, EmitError> {
    let options = EmitOptions {
        escape_html,
        ..Default::default()
    };
    emit_with_options(record, labels, locale, &options)
}

/// Emit a plain-text citation with options.
pub fn emit_with_options(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
    options: &EmitOptions,
) -> Result<String, EmitError> {
    tracing::debug!(format = "plain", %locale, escape_html = options.escape_html, "rendering citation");
    let ctx = CitationContext::new(record, labels, locale, options);
    let text = EmitContext::new(ctx).citation()?;
    Ok(text)
}

/// [`Emitter`] for plain-text citations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainWriter;

impl Emitter for PlainWriter {
    fn format(&self) -> &str {
        "plain"
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

struct EmitContext<'a> {
    cite: CitationContext<'a>,
    escape: bool,
}

impl<'a> EmitContext<'a> {
    fn new(cite: CitationContext<'a>) -> Self {
        Self {
            escape: cite.options.escape_html,
            cite,
        }
    }

    fn text(&self, s: &str) -> String {
        if self.escape {
            escape_html(s)
        } else {
            s.to_string()
        }
    }

    fn citation(&self) -> Result<String, EmitError> {
        let record = self.cite.record;
        let mut parts = Fragments::new();

        parts.push(self.text(&record.authors.join("; ")), ": ");
        parts.push(self.title()?, ". ");

        if !record.producers.is_empty() {
            let production = join_present(
                &[
                    self.cite.join_producers()?,
                    record.production_place.clone().unwrap_or_default(),
                    record.production_date.clone().unwrap_or_default(),
                ],
                ", ",
            );
            parts.push(self.text(&production), ". ");
        }

        parts.push(self.text(&join_present(&record.other_ids, ", ")), ". ");

        let distribution_year = non_blank(record.release_year.as_deref()).unwrap_or(&record.year);
        let distribution = join_present(
            &[
                self.cite.join_distributors()?,
                self.cite.publisher_name()?,
                distribution_year.to_string(),
            ],
            ", ",
        );
        parts.push(self.text(&distribution), ". ");

        let version = non_blank(record.version.as_deref());
        let link_terminator = if version.is_some() { ", " } else { ". " };
        parts.push(self.link(&self.cite.dataset_pid_url()), link_terminator);
        parts.push(self.text(version.unwrap_or_default()), ". ");

        if let Some(file_title) = self.cite.file_title() {
            let file_label = self.cite.label(Label::FileName)?;
            parts.push(self.text(&format!("{}{}", file_title, file_label)), ", ");
            parts.push(self.text(&self.cite.file_pid()), "");
        }

        Ok(parts.render())
    }

    /// Dataset title with the data label; italic in HTML file citations.
    fn title(&self) -> Result<String, EmitError> {
        let title = &self.cite.record.title;
        if is_blank(title) {
            return Ok(String::new());
        }
        let label = self.text(&self.cite.label(Label::Data)?);
        let title = if self.escape && self.cite.should_include_file_name() {
            format!("<i>{}</i>", self.text(title))
        } else {
            self.text(title)
        };
        Ok(format!("{}{}", title, label))
    }

    fn link(&self, url: &str) -> String {
        if url.is_empty() || !self.escape {
            return url.to_string();
        }
        let url = escape_html(url);
        format!("<a href=\"{}\" target=\"_blank\">{}</a>", url, url)
    }
}

/// Escape HTML special characters.
fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
