//! RIS (Research Information Systems) writer for citeform.
//!
//! Emits one `TY  - DATA` record. Every tag line ends in CRLF except the
//! closing `ER` line, which ends the output.

use citeform_core::{
    CitationContext, CitationRecord, EmitError, EmitOptions, Emitter, Label, LabelResolver,
    Locale, non_blank,
};

/// Emit a RIS record.
pub fn emit(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
) -> Result<String, EmitError> {
    emit_with_options(record, labels, locale, &EmitOptions::default())
}

/// Emit a RIS record with options.
pub fn emit_with_options(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
    options: &EmitOptions,
) -> Result<String, EmitError> {
    tracing::debug!(format = "ris", %locale, "rendering citation");
    let cite = CitationContext::new(record, labels, locale, options);
    let mut ctx = EmitContext::new();
    emit_record(&cite, &mut ctx)?;
    Ok(ctx.output)
}

/// [`Emitter`] for RIS.
#[derive(Debug, Clone, Copy, Default)]
pub struct RisWriter;

impl Emitter for RisWriter {
    fn format(&self) -> &str {
        "ris"
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

struct EmitContext {
    output: String,
}

impl EmitContext {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn write_tag_value(&mut self, tag: &str, value: &str) {
        self.output.push_str(tag);
        self.output.push_str("  - ");
        self.output.push_str(value);
    }

    fn write_tag(&mut self, tag: &str, value: &str) {
        self.write_tag_value(tag, value);
        self.output.push_str("\r\n");
    }

    fn write_tags<S: AsRef<str>>(&mut self, tag: &str, values: &[S]) {
        for value in values {
            self.write_tag(tag, value.as_ref());
        }
    }

    fn end_record(&mut self) {
        self.write_tag_value("ER", "");
    }
}

fn emit_record(cite: &CitationContext<'_>, ctx: &mut EmitContext) -> Result<(), EmitError> {
    let record = cite.record;

    ctx.write_tag("TY", "DATA");
    ctx.write_tags("AU", &record.authors);
    ctx.write_tag(
        "T1",
        &format!("{}{}", record.title, cite.label(Label::Data)?),
    );
    if let Some(file_title) = cite.file_title() {
        ctx.write_tag("T2", file_title);
    }
    if let Some(series) = cite.series_title() {
        ctx.write_tag("T3", series);
    }
    ctx.write_tags("LA", &record.languages);
    ctx.write_tag("PY", &format!("{}///", cite.cited_year()));

    if let Some(pid) = &record.pid_of_dataset {
        ctx.write_tag("DO", &pid.authority_path());
        ctx.write_tag("UR", &cite.dataset_pid_url());
    }
    if let Some(version) = non_blank(record.version.as_deref()) {
        ctx.write_tag("ET", version);
    }
    if cite.has_publishing_data() {
        ctx.write_tag("PB", &cite.publishing_data()?);
    }
    if let Some(unf) = cite.unf() {
        ctx.write_tag("C2", unf);
    }

    ctx.end_record();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeform_core::{LabelBundle, PersistentId, Producer};

    fn full_record() -> CitationRecord {
        CitationRecord::new("Title", "Dataverse", "2019")
            .author("Author, The First")
            .author("Author, The Second")
            .producer(Producer::with_affiliation("Producer 1", "ABC"))
            .producer(Producer::with_affiliation("Producer 2", "BCD"))
            .distributor("Distributor 1")
            .distributor("Distributor 2")
            .language("polish")
            .language("italian")
            .with_production("Warsaw", "2001")
            .with_release_year("2021")
            .with_dataset_pid(PersistentId::new("doi", "10.18150", "ZENON"))
            .with_version("V1")
    }

    fn emit_str(record: &CitationRecord) -> String {
        emit(record, &LabelBundle::builtin(), &Locale::new("en")).unwrap()
    }

    #[test]
    fn test_emit_full_record() {
        assert_eq!(
            emit_str(&full_record()),
            "TY  - DATA\r\n\
             AU  - Author, The First\r\n\
             AU  - Author, The Second\r\n\
             T1  - Title [data]\r\n\
             LA  - polish\r\n\
             LA  - italian\r\n\
             PY  - 2001///\r\n\
             DO  - 10.18150/ZENON\r\n\
             UR  - https://doi.org/10.18150/ZENON\r\n\
             ET  - V1\r\n\
             PB  - Producer 1, ABC [producer], Producer 2, BCD [producer], Warsaw. \
             Distributor 1 [distributor], Distributor 2 [distributor], Dataverse [publisher], 2021\r\n\
             ER  - "
        );
    }

    #[test]
    fn test_emit_minimal_record() {
        let record = CitationRecord::new("Title", "Harvested", "2019").author("Doe, Jane");
        assert_eq!(
            emit_str(&record),
            "TY  - DATA\r\nAU  - Doe, Jane\r\nT1  - Title [data]\r\nPY  - 2019///\r\nER  - "
        );
    }

    #[test]
    fn test_file_title() {
        let record = full_record().with_file("File Name", None, true);
        let output = emit_str(&record);
        assert!(output.contains("T1  - Title [data]\r\nT2  - File Name\r\nLA  - polish\r\n"));

        let indirect = full_record().with_file("File Name", None, false);
        assert!(!emit_str(&indirect).contains("T2  - "));
    }

    #[test]
    fn test_extended_fields() {
        let record = full_record()
            .with_series_title("Series")
            .with_unf("UNF:6:abc==");
        assert!(!emit_str(&record).contains("T3  - "));

        let options = EmitOptions {
            extended: true,
            ..Default::default()
        };
        let output =
            emit_with_options(&record, &LabelBundle::builtin(), &Locale::new("en"), &options)
                .unwrap();
        assert!(output.contains("T1  - Title [data]\r\nT3  - Series\r\n"));
        assert!(output.ends_with("C2  - UNF:6:abc==\r\nER  - "));
    }

    #[test]
    fn test_only_crlf_line_endings() {
        let output = emit_str(&full_record());
        assert_eq!(output.matches('\n').count(), output.matches("\r\n").count());
        assert!(!output.ends_with('\n'));
    }
}
