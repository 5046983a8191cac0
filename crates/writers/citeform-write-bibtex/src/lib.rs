//! BibTeX writer for citeform.
//!
//! Emits a single `@misc` entry. Lines end in CRLF, which reference managers
//! expect when importing dataset citations.

use citeform_core::{
    CitationContext, CitationRecord, EmitError, EmitOptions, Emitter, Label, LabelResolver,
    Locale, non_blank,
};

const EOL: &str = "\r\n";

/// Emit a BibTeX entry.
pub fn emit(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
) -> Result<String, EmitError> {
    emit_with_options(record, labels, locale, &EmitOptions::default())
}

/// Emit a BibTeX entry with options.
pub fn emit_with_options(
    record: &CitationRecord,
    labels: &dyn LabelResolver,
    locale: &Locale,
    options: &EmitOptions,
) -> Result<String, EmitError> {
    tracing::debug!(format = "bibtex", %locale, "rendering citation");
    let cite = CitationContext::new(record, labels, locale, options);
    let mut ctx = EmitContext::new();
    emit_entry(&cite, &mut ctx)?;
    Ok(ctx.output)
}

/// [`Emitter`] for BibTeX.
#[derive(Debug, Clone, Copy, Default)]
pub struct BibtexWriter;

impl Emitter for BibtexWriter {
    fn format(&self) -> &str {
        "bibtex"
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

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// `name = {value},` followed by CRLF.
    fn field(&mut self, name: &str, value: &str) {
        self.write(name);
        self.write(" = {");
        self.write(&escape_bibtex(value));
        self.write("},");
        self.write(EOL);
    }
}

fn emit_entry(cite: &CitationContext<'_>, ctx: &mut EmitContext) -> Result<(), EmitError> {
    let record = cite.record;
    let pid = record.pid_of_dataset.as_ref();

    ctx.write("@misc{");
    ctx.write(pid.map(|p| p.identifier.as_str()).unwrap_or_default());
    ctx.write("_");
    ctx.write(&record.year);
    ctx.write(",");
    ctx.write(EOL);

    ctx.field("author", &record.authors.join(" and "));
    if let Some(pid) = pid {
        ctx.field("doi", &pid.authority_path());
    }
    if let Some(version) = non_blank(record.version.as_deref()) {
        ctx.field("edition", version);
    }
    if !record.keywords.is_empty() {
        ctx.field("keywords", &record.keywords.join(", "));
    }
    if cite.has_publishing_data() {
        ctx.field("publisher", &cite.publishing_data()?);
    }
    ctx.field(
        "title",
        &format!("{}{}", record.title, cite.label(Label::Data)?),
    );
    if let Some(unf) = cite.unf() {
        ctx.field("UNF", unf);
    }
    ctx.field("url", &cite.dataset_pid_url());
    ctx.field("year", cite.cited_year());
    if let Some(note) = note(cite)? {
        ctx.field("note", &note);
    }

    ctx.write("}");
    ctx.write(EOL);
    Ok(())
}

/// `Edition: V1; file.csv [file name], doi:...`, or `None` if there is nothing to note.
fn note(cite: &CitationContext<'_>) -> Result<Option<String>, EmitError> {
    let mut segments = Vec::new();
    if let Some(version) = non_blank(cite.record.version.as_deref()) {
        segments.push(format!("Edition: {}", version));
    }
    if let Some(file_title) = cite.file_title() {
        let mut file = format!("{}{}", file_title, cite.label(Label::FileName)?);
        let file_pid = cite.file_pid();
        if !file_pid.is_empty() {
            file.push_str(", ");
            file.push_str(&file_pid);
        }
        segments.push(file);
    }
    if segments.is_empty() {
        Ok(None)
    } else {
        Ok(Some(segments.join("; ")))
    }
}

/// Keep balanced brace groups and replace stray braces with their text
/// commands, so the value always closes at its own `}`.
fn escape_bibtex(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut matched = vec![false; chars.len()];
    let mut open = Vec::new();
    for (i, c) in chars.iter().enumerate() {
        match c {
            '{' => open.push(i),
            '}' => {
                if let Some(start) = open.pop() {
                    matched[start] = true;
                    matched[i] = true;
                }
            }
            _ => {}
        }
    }

    let mut result = String::with_capacity(text.len());
    for (c, matched) in chars.into_iter().zip(matched) {
        match c {
            '{' if !matched => result.push_str("\\textbraceleft{}"),
            '}' if !matched => result.push_str("\\textbraceright{}"),
            _ => result.push(c),
        }
    }
    result
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
            .keyword("Keyword I")
            .keyword("Keyword II")
            .language("polish")
            .with_production("Warsaw", "2001")
            .with_release_year("2021")
            .with_dataset_pid(PersistentId::new("doi", "10.18150", "ZENON"))
            .with_version("V1")
    }

    fn emit_str(record: &CitationRecord) -> String {
        emit(record, &LabelBundle::builtin(), &Locale::new("en")).unwrap()
    }

    #[test]
    fn test_emit_full_entry() {
        assert_eq!(
            emit_str(&full_record()),
            "@misc{ZENON_2019,\r\n\
             author = {Author, The First and Author, The Second},\r\n\
             doi = {10.18150/ZENON},\r\n\
             edition = {V1},\r\n\
             keywords = {Keyword I, Keyword II},\r\n\
             publisher = {Producer 1, ABC [producer], Producer 2, BCD [producer], Warsaw. \
             Distributor 1 [distributor], Distributor 2 [distributor], Dataverse [publisher], 2021},\r\n\
             title = {Title [data]},\r\n\
             url = {https://doi.org/10.18150/ZENON},\r\n\
             year = {2001},\r\n\
             note = {Edition: V1},\r\n\
             }\r\n"
        );
    }

    #[test]
    fn test_emit_harvested_entry() {
        let record = CitationRecord::new("Title", "Harvested", "2019")
            .author("Doe, Jane")
            .with_dataset_pid(PersistentId::new("doi", "10.5072", "FK2"));
        assert_eq!(
            emit_str(&record),
            "@misc{FK2_2019,\r\n\
             author = {Doe, Jane},\r\n\
             doi = {10.5072/FK2},\r\n\
             title = {Title [data]},\r\n\
             url = {https://doi.org/10.5072/FK2},\r\n\
             year = {2019},\r\n\
             }\r\n"
        );
    }

    #[test]
    fn test_no_pid() {
        let record = CitationRecord::new("Title", "Dataverse", "2019").author("Doe, Jane");
        let output = emit_str(&record);
        assert!(output.starts_with("@misc{_2019,\r\n"));
        assert!(!output.contains("doi = "));
        assert!(output.contains("url = {},\r\n"));
    }

    #[test]
    fn test_file_note() {
        let record = full_record().with_file(
            "File Name",
            Some(PersistentId::new("doi", "10.18150", "ZENON_F")),
            true,
        );
        assert!(emit_str(&record).contains(
            "note = {Edition: V1; File Name [file name], doi:10.18150/ZENON_F},\r\n}\r\n"
        ));
    }

    #[test]
    fn test_file_note_without_version() {
        let mut record = full_record().with_file("File Name", None, true);
        record.version = None;
        let output = emit_str(&record);
        assert!(output.contains("note = {File Name [file name]},\r\n"));
        assert!(!output.contains("edition = "));
    }

    /// Byte offset of the `}` that closes a brace-delimited value.
    fn closing_brace(value: &str) -> Option<usize> {
        let mut depth = 0usize;
        for (i, c) in value.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn title_line(output: &str) -> &str {
        output
            .split("\r\n")
            .find(|line| line.starts_with("title = "))
            .unwrap()
    }

    #[test]
    fn test_stray_closing_brace_does_not_end_value() {
        let record = CitationRecord::new("a}b", "Dataverse", "2019").author("X");
        let output = emit_str(&record);
        let value = title_line(&output).trim_start_matches("title = ");
        assert_eq!(value, "{a\\textbraceright{}b [data]},");
        assert_eq!(closing_brace(value), Some(value.len() - 2));
    }

    #[test]
    fn test_balanced_braces_are_kept() {
        let record = CitationRecord::new("The {DNA} Set", "Dataverse", "2019").author("X");
        assert!(emit_str(&record).contains("title = {The {DNA} Set [data]},\r\n"));
    }

    #[test]
    fn test_unbalanced_braces_keep_value_closed() {
        for title in ["Sets {A} and }B{", "{{x", "}}", "a{b}c}d{"] {
            let record = CitationRecord::new(title, "Dataverse", "2019").author("X");
            let output = emit_str(&record);
            let value = title_line(&output).trim_start_matches("title = ");
            assert_eq!(closing_brace(value), Some(value.len() - 2), "{title}: {value}");
        }
        assert_eq!(
            escape_bibtex("Sets {A} and }B{"),
            "Sets {A} and \\textbraceright{}B\\textbraceleft{}"
        );
    }

    #[test]
    fn test_extended_unf() {
        let record = full_record().with_unf("UNF:6:abc==");
        assert!(!emit_str(&record).contains("UNF"));

        let options = EmitOptions {
            extended: true,
            ..Default::default()
        };
        let output =
            emit_with_options(&record, &LabelBundle::builtin(), &Locale::new("en"), &options)
                .unwrap();
        assert!(output.contains("title = {Title [data]},\r\nUNF = {UNF:6:abc==},\r\nurl = "));
    }
}
