//! The citation record: everything a writer needs to cite one dataset or file.

use serde::{Deserialize, Serialize};

use crate::PersistentId;

/// A dataset producer with an optional affiliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Producer {
    pub name: String,
    pub affiliation: Option<String>,
}

impl Producer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: None,
        }
    }

    pub fn with_affiliation(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: Some(affiliation.into()),
        }
    }
}

/// Flattened bibliographic metadata for one citation.
///
/// Sequence fields keep their order in every rendered format. Optional
/// fields that are `None` or blank are left out of the output; nothing here
/// is ever rendered as a literal "null".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CitationRecord {
    pub authors: Vec<String>,
    pub producers: Vec<Producer>,
    pub distributors: Vec<String>,
    pub other_ids: Vec<String>,
    pub keywords: Vec<String>,
    pub languages: Vec<String>,

    pub title: String,
    /// Set only when the citation concerns one file of the dataset.
    pub file_title: Option<String>,
    pub series_title: Option<String>,

    pub production_place: Option<String>,
    /// Pre-formatted date literal.
    pub production_date: Option<String>,
    pub root_dataverse_name: String,
    pub release_year: Option<String>,
    /// Canonical citation year.
    pub year: String,
    pub version: Option<String>,
    /// Universal Numeric Fingerprint.
    pub unf: Option<String>,

    #[serde(alias = "persistentId")]
    pub pid_of_dataset: Option<PersistentId>,
    pub pid_of_file: Option<PersistentId>,
    /// The user accessed the file directly rather than through the dataset.
    pub is_direct: bool,
}

impl CitationRecord {
    /// Create a record with the fields every well-formed citation carries.
    pub fn new(
        title: impl Into<String>,
        root_dataverse_name: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            root_dataverse_name: root_dataverse_name.into(),
            year: year.into(),
            ..Default::default()
        }
    }

    /// Add an author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Add a producer.
    pub fn producer(mut self, producer: Producer) -> Self {
        self.producers.push(producer);
        self
    }

    /// Add a distributor.
    pub fn distributor(mut self, distributor: impl Into<String>) -> Self {
        self.distributors.push(distributor.into());
        self
    }

    /// Add an alternate identifier.
    pub fn other_id(mut self, id: impl Into<String>) -> Self {
        self.other_ids.push(id.into());
        self
    }

    /// Add a keyword.
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Add a language name.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn with_production(
        mut self,
        place: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        self.production_place = Some(place.into());
        self.production_date = Some(date.into());
        self
    }

    pub fn with_release_year(mut self, year: impl Into<String>) -> Self {
        self.release_year = Some(year.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_series_title(mut self, series: impl Into<String>) -> Self {
        self.series_title = Some(series.into());
        self
    }

    pub fn with_unf(mut self, unf: impl Into<String>) -> Self {
        self.unf = Some(unf.into());
        self
    }

    pub fn with_dataset_pid(mut self, pid: PersistentId) -> Self {
        self.pid_of_dataset = Some(pid);
        self
    }

    /// Turn this into a file-level citation.
    pub fn with_file(
        mut self,
        file_title: impl Into<String>,
        pid: Option<PersistentId>,
        direct: bool,
    ) -> Self {
        self.file_title = Some(file_title.into());
        self.pid_of_file = pid;
        self.is_direct = direct;
        self
    }
}
