/// Substring predicate used to decide whether a discovered URL is a target
///
/// A URL matches when every marker appears somewhere in its string form.
/// The ETCSL corpus, for example, selects entry pages with the markers
/// `["etcsl", "myth"]` and section indexes with `["section"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPredicate {
    markers: Vec<String>,
}

impl LinkPredicate {
    /// Creates a predicate from a list of marker substrings
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if every marker is a substring of `url`
    ///
    /// A predicate with no markers matches nothing; an all-pass predicate is
    /// never what a caller wants, and an empty marker list in config is a
    /// validation error anyway.
    pub fn matches(&self, url: &str) -> bool {
        !self.markers.is_empty() && self.markers.iter().all(|m| url.contains(m.as_str()))
    }

    /// The marker substrings this predicate requires
    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}
