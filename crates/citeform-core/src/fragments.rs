//! Punctuation-aware joining of citation fragments.

/// An ordered list of text fragments, each followed by its own punctuation.
///
/// A fragment's terminator is written only when another non-blank fragment
/// follows it. Blank fragments emit neither content nor terminator, so the
/// result never contains doubled delimiters and never ends with punctuation.
#[derive(Debug, Clone, Default)]
pub struct Fragments {
    parts: Vec<(String, &'static str)>,
}

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment terminated by `terminator`.
    pub fn push(&mut self, content: impl Into<String>, terminator: &'static str) -> &mut Self {
        self.parts.push((content.into(), terminator));
        self
    }

    /// Join the non-blank fragments.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut pending: Option<&str> = None;
        for (content, terminator) in &self.parts {
            if is_blank(content) {
                continue;
            }
            if let Some(pending) = pending {
                out.push_str(pending);
            }
            out.push_str(content);
            pending = Some(*terminator);
        }
        out
    }
}

/// True for empty or whitespace-only strings.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// The value of an optional field, if it is present and not blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_blank(v))
}

/// Join the non-blank members of `parts` with `separator`.
pub fn join_present<S: AsRef<str>>(parts: &[S], separator: &str) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !is_blank(p))
        .collect::<Vec<_>>()
        .join(separator)
}
