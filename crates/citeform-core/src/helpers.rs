//! Derived values shared by every format.
//!
//! All writers build a [`CitationContext`] and take producer lists,
//! publishing data, years and PID URLs from it, so the formats never
//! disagree on how these are composed.

use crate::{
    CitationRecord, EmitOptions, FileNameInclusion, Label, LabelError, LabelResolver, Locale,
    is_blank, join_present, non_blank,
};

/// One render call: a record plus the labels, locale and options to render it with.
#[derive(Clone, Copy)]
pub struct CitationContext<'a> {
    pub record: &'a CitationRecord,
    pub labels: &'a dyn LabelResolver,
    pub locale: &'a Locale,
    pub options: &'a EmitOptions,
}

impl<'a> CitationContext<'a> {
    pub fn new(
        record: &'a CitationRecord,
        labels: &'a dyn LabelResolver,
        locale: &'a Locale,
        options: &'a EmitOptions,
    ) -> Self {
        Self {
            record,
            labels,
            locale,
            options,
        }
    }

    /// The decorated label, e.g. `" [data]"`.
    pub fn label(&self, label: Label) -> Result<String, LabelError> {
        let word = self.labels.resolve(label, self.locale)?;
        Ok(format!(" [{}]", word))
    }

    /// `name, affiliation [producer]` per producer, comma-joined.
    pub fn join_producers(&self) -> Result<String, LabelError> {
        if self.record.producers.is_empty() {
            return Ok(String::new());
        }
        let label = self.label(Label::Producer)?;
        let entries: Vec<String> = self
            .record
            .producers
            .iter()
            .map(|p| match non_blank(p.affiliation.as_deref()) {
                Some(affiliation) => format!("{}, {}{}", p.name, affiliation, label),
                None => format!("{}{}", p.name, label),
            })
            .collect();
        Ok(entries.join(", "))
    }

    /// `name [distributor]` per distributor, comma-joined.
    pub fn join_distributors(&self) -> Result<String, LabelError> {
        if self.record.distributors.is_empty() {
            return Ok(String::new());
        }
        let label = self.label(Label::Distributor)?;
        let entries: Vec<String> = self
            .record
            .distributors
            .iter()
            .map(|d| format!("{}{}", d, label))
            .collect();
        Ok(entries.join(", "))
    }

    /// Root collection name with the publisher label, or empty if there is no name.
    pub fn publisher_name(&self) -> Result<String, LabelError> {
        if is_blank(&self.record.root_dataverse_name) {
            return Ok(String::new());
        }
        Ok(format!(
            "{}{}",
            self.record.root_dataverse_name,
            self.label(Label::Publisher)?
        ))
    }

    /// Producers and place, then distributors, publisher and auxiliary year.
    ///
    /// `Producer 1, ABC [producer], Warsaw. Distributor 1 [distributor],
    /// Dataverse [publisher], 2021`
    pub fn publishing_data(&self) -> Result<String, LabelError> {
        let mut out = String::new();
        if !self.record.producers.is_empty() {
            let place = self.record.production_place.clone().unwrap_or_default();
            out.push_str(&join_present(&[self.join_producers()?, place], ", "));
            out.push_str(". ");
        }
        let tail = join_present(
            &[
                self.join_distributors()?,
                self.publisher_name()?,
                self.auxiliary_year().unwrap_or_default().to_string(),
            ],
            ", ",
        );
        out.push_str(&tail);
        Ok(out)
    }

    /// Whether any format should emit a publisher field.
    pub fn has_publishing_data(&self) -> bool {
        !self.record.producers.is_empty() || !self.record.distributors.is_empty()
    }

    /// Production date if present, otherwise the release year.
    pub fn main_year(&self) -> Option<&'a str> {
        non_blank(self.record.production_date.as_deref())
            .or_else(|| non_blank(self.record.release_year.as_deref()))
    }

    /// The release year when it was displaced by the production date.
    pub fn auxiliary_year(&self) -> Option<&'a str> {
        non_blank(self.record.production_date.as_deref())
            .and_then(|_| non_blank(self.record.release_year.as_deref()))
    }

    /// [`main_year`](Self::main_year), falling back to the citation year.
    pub fn cited_year(&self) -> &'a str {
        self.main_year().unwrap_or(&self.record.year)
    }

    /// Whether file-specific fragments belong in this citation.
    pub fn should_include_file_name(&self) -> bool {
        let has_title = non_blank(self.record.file_title.as_deref()).is_some();
        match self.options.file_name {
            FileNameInclusion::DirectOnly => has_title && self.record.is_direct,
            FileNameInclusion::Always => has_title,
        }
    }

    /// Non-blank file title, only when file fragments are included.
    pub fn file_title(&self) -> Option<&'a str> {
        if self.should_include_file_name() {
            non_blank(self.record.file_title.as_deref())
        } else {
            None
        }
    }

    /// Resolvable URL of the dataset PID, empty if there is none.
    pub fn dataset_pid_url(&self) -> String {
        self.record
            .pid_of_dataset
            .as_ref()
            .and_then(|pid| pid.to_url())
            .unwrap_or_default()
    }

    /// `protocol:authority/identifier` of the file PID, empty if there is none.
    pub fn file_pid(&self) -> String {
        self.record
            .pid_of_file
            .as_ref()
            .map(|pid| pid.as_string())
            .unwrap_or_default()
    }

    /// Series title, only in extended output.
    pub fn series_title(&self) -> Option<&'a str> {
        if self.options.extended {
            non_blank(self.record.series_title.as_deref())
        } else {
            None
        }
    }

    /// UNF checksum, only in extended output.
    pub fn unf(&self) -> Option<&'a str> {
        if self.options.extended {
            non_blank(self.record.unf.as_deref())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LabelBundle, PersistentId, Producer};

    fn full_record() -> CitationRecord {
        CitationRecord::new("Title", "Dataverse", "2019")
            .author("Author, The First")
            .producer(Producer::with_affiliation("Producer 1", "ABC"))
            .producer(Producer::with_affiliation("Producer 2", "BCD"))
            .distributor("Distributor 1")
            .distributor("Distributor 2")
            .with_production("Warsaw", "2001")
            .with_release_year("2021")
    }

    fn with_ctx<T>(record: &CitationRecord, f: impl FnOnce(CitationContext<'_>) -> T) -> T {
        let labels = LabelBundle::builtin();
        let locale = Locale::new("en");
        let options = EmitOptions::default();
        f(CitationContext::new(record, &labels, &locale, &options))
    }

    #[test]
    fn test_join_producers() {
        let record = full_record().producer(Producer::new("Producer 3"));
        let joined = with_ctx(&record, |ctx| ctx.join_producers().unwrap());
        assert_eq!(
            joined,
            "Producer 1, ABC [producer], Producer 2, BCD [producer], Producer 3 [producer]"
        );
    }

    #[test]
    fn test_blank_affiliation_is_dropped() {
        let record = CitationRecord::new("T", "R", "2019")
            .producer(Producer::with_affiliation("Solo", "  "));
        let joined = with_ctx(&record, |ctx| ctx.join_producers().unwrap());
        assert_eq!(joined, "Solo [producer]");
    }

    #[test]
    fn test_publishing_data() {
        let data = with_ctx(&full_record(), |ctx| ctx.publishing_data().unwrap());
        assert_eq!(
            data,
            "Producer 1, ABC [producer], Producer 2, BCD [producer], Warsaw. \
             Distributor 1 [distributor], Distributor 2 [distributor], Dataverse [publisher], 2021"
        );
    }

    #[test]
    fn test_publishing_data_without_producers() {
        let record = CitationRecord::new("T", "Dataverse", "2019")
            .distributor("Distributor 1")
            .with_release_year("2021");
        let data = with_ctx(&record, |ctx| ctx.publishing_data().unwrap());
        // No production date: the release year is the main year, not auxiliary.
        assert_eq!(data, "Distributor 1 [distributor], Dataverse [publisher]");
    }

    #[test]
    fn test_publishing_data_empty() {
        let record = CitationRecord::new("T", "", "2019");
        let data = with_ctx(&record, |ctx| ctx.publishing_data().unwrap());
        assert_eq!(data, "");
    }

    #[test]
    fn test_years() {
        let record = full_record();
        with_ctx(&record, |ctx| {
            assert_eq!(ctx.main_year(), Some("2001"));
            assert_eq!(ctx.auxiliary_year(), Some("2021"));
            assert_eq!(ctx.cited_year(), "2001");
        });

        let record = CitationRecord::new("T", "R", "2019");
        with_ctx(&record, |ctx| {
            assert_eq!(ctx.main_year(), None);
            assert_eq!(ctx.auxiliary_year(), None);
            assert_eq!(ctx.cited_year(), "2019");
        });
    }

    #[test]
    fn test_file_name_policy() {
        let labels = LabelBundle::builtin();
        let locale = Locale::new("en");
        let indirect = CitationRecord::new("T", "R", "2019").with_file("data.csv", None, false);
        let blank = CitationRecord::new("T", "R", "2019").with_file(" ", None, true);

        let direct_only = EmitOptions::default();
        let always = EmitOptions {
            file_name: FileNameInclusion::Always,
            ..Default::default()
        };

        let ctx = CitationContext::new(&indirect, &labels, &locale, &direct_only);
        assert!(!ctx.should_include_file_name());
        let ctx = CitationContext::new(&indirect, &labels, &locale, &always);
        assert!(ctx.should_include_file_name());
        assert_eq!(ctx.file_title(), Some("data.csv"));
        let ctx = CitationContext::new(&blank, &labels, &locale, &always);
        assert!(!ctx.should_include_file_name());
    }

    #[test]
    fn test_pid_helpers() {
        let record = CitationRecord::new("T", "R", "2019")
            .with_dataset_pid(PersistentId::new("doi", "10.18150", "ZENON"))
            .with_file(
                "f",
                Some(PersistentId::new("doi", "10.18150", "ZENON_F")),
                true,
            );
        with_ctx(&record, |ctx| {
            assert_eq!(ctx.dataset_pid_url(), "https://doi.org/10.18150/ZENON");
            assert_eq!(ctx.file_pid(), "doi:10.18150/ZENON_F");
        });
        let bare = CitationRecord::new("T", "R", "2019");
        with_ctx(&bare, |ctx| {
            assert_eq!(ctx.dataset_pid_url(), "");
            assert_eq!(ctx.file_pid(), "");
        });
    }

    #[test]
    fn test_missing_label_propagates() {
        let record = full_record();
        let labels = LabelBundle::new();
        let locale = Locale::new("en");
        let options = EmitOptions::default();
        let ctx = CitationContext::new(&record, &labels, &locale, &options);
        assert!(ctx.publishing_data().is_err());
    }
}
