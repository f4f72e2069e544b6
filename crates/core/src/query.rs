//! Encoded query construction
//!
//! ServiceNow filters are "encoded queries": terms joined by `^`, with
//! `^OR` starting an alternative, e.g.
//! `active=true^priority=1^ORpriority=2^short_descriptionLIKEemail`.
//!
//! Values are inserted verbatim. A value containing `^` would split the term,
//! so untrusted text should go through [`sanitize_input`] first.

/// Builder for encoded query strings
///
/// ```
/// use snowgate_core::EncodedQuery;
///
/// let query = EncodedQuery::new()
///     .eq("active", "true")
///     .is_in("priority", ["1", "2"])
///     .like("short_description", "email")
///     .or_like("description", "email")
///     .build();
///
/// assert_eq!(
///     query,
///     "active=true^priorityIN1,2^short_descriptionLIKEemail^ORdescriptionLIKEemail"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedQuery {
    terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    or: bool,
    text: String,
}

impl EncodedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn eq(self, field: &str, value: impl AsRef<str>) -> Self {
        self.push(false, format!("{field}={}", value.as_ref()))
    }

    #[must_use]
    pub fn or_eq(self, field: &str, value: impl AsRef<str>) -> Self {
        self.push(true, format!("{field}={}", value.as_ref()))
    }

    #[must_use]
    pub fn is_in<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values.into_iter().fold(String::new(), |mut acc, v| {
            if !acc.is_empty() {
                acc.push(',');
            }
            acc.push_str(v.as_ref());
            acc
        });
        self.push(false, format!("{field}IN{joined}"))
    }

    #[must_use]
    pub fn like(self, field: &str, value: impl AsRef<str>) -> Self {
        self.push(false, format!("{field}LIKE{}", value.as_ref()))
    }

    #[must_use]
    pub fn or_like(self, field: &str, value: impl AsRef<str>) -> Self {
        self.push(true, format!("{field}LIKE{}", value.as_ref()))
    }

    /// `fieldBETWEENstart@end`
    #[must_use]
    pub fn between(self, field: &str, start: impl AsRef<str>, end: impl AsRef<str>) -> Self {
        self.push(false, format!("{field}BETWEEN{}@{}", start.as_ref(), end.as_ref()))
    }

    /// Append an already-encoded fragment
    #[must_use]
    pub fn raw(self, fragment: impl Into<String>) -> Self {
        self.push(false, fragment.into())
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                out.push('^');
                if term.or {
                    out.push_str("OR");
                }
            }
            out.push_str(&term.text);
        }
        out
    }

    fn push(mut self, or: bool, text: String) -> Self {
        if !text.is_empty() {
            self.terms.push(Term { or, text });
        }
        self
    }
}

impl std::fmt::Display for EncodedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

/// Value in the simple map form accepted by [`build_query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
    /// Skipped
    Null,
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for QueryValue {
    fn from(values: Vec<S>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Render `field=value` pairs as an AND-joined encoded query.
///
/// Lists render as `fieldINa,b`; [`QueryValue::Null`] entries are skipped.
pub fn build_query(params: &[(&str, QueryValue)]) -> String {
    params
        .iter()
        .fold(EncodedQuery::new(), |query, (field, value)| match value {
            QueryValue::Scalar(v) => query.eq(field, v),
            QueryValue::List(values) => query.is_in(field, values),
            QueryValue::Null => query,
        })
        .build()
}

/// Strip everything except word characters, whitespace, `-`, `@` and `.`
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || matches!(c, '-' | '@' | '.'))
        .collect()
}
