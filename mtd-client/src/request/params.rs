//! Request parameter sets.

use std::fmt;

use super::options::InvalidOption;

/// Delimiter the API uses between the identifiers of a multi-value parameter.
pub const ID_DELIMITER: char = ';';

/// An ordered set of `(name, value)` query parameters, unique by name.
///
/// Insertion order is preserved, so two requests built the same way always
/// serialize (and derive cache keys) identically. Setting a name that is
/// already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Params::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`Params::set`] that skips `None`.
    pub fn with_opt<V: fmt::Display>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.set(name, value);
        }
        self
    }

    /// Set a parameter, replacing any existing value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        let name = name.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    /// Remove a parameter, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(n, _)| n == name)?;
        Some(self.pairs.remove(idx).1)
    }

    /// Look up a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// One or more identifiers sent as a single multi-value parameter.
///
/// # Examples
///
/// ```
/// use mtd_client::request::IdList;
///
/// let routes = IdList::new(["ILLINI", "GREEN"]).unwrap();
/// assert_eq!(routes.to_string(), "ILLINI;GREEN");
///
/// assert!(IdList::new(Vec::<String>::new()).is_err());
/// assert!(IdList::new(["A;B"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdList(Vec<String>);

impl IdList {
    /// Build a list from identifiers. Rejects an empty list, empty
    /// identifiers, and identifiers containing the delimiter.
    pub fn new<I, S>(ids: I) -> Result<Self, InvalidOption>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(InvalidOption::new("id list", "must contain at least one id"));
        }
        if ids.iter().any(|id| id.is_empty()) {
            return Err(InvalidOption::new("id list", "ids must not be empty"));
        }
        if ids.iter().any(|id| id.contains(ID_DELIMITER)) {
            return Err(InvalidOption::new(
                "id list",
                format!("ids must not contain '{ID_DELIMITER}'"),
            ));
        }
        Ok(Self(ids))
    }

    /// A list holding a single identifier.
    pub fn single(id: impl Into<String>) -> Result<Self, InvalidOption> {
        Self::new([id.into()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an `IdList` holds at least one id by construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{ID_DELIMITER}")?;
            }
            f.write_str(id)?;
        }
        Ok(())
    }
}
