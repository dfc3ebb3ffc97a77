//! Declaration scopes and the qualified-name rule.
//!
//! A `Scope` is the explicit "current package" of a declaration block. Names
//! written in a block are qualified against it:
//!
//! | Written     | Qualified                                   |
//! |-------------|---------------------------------------------|
//! | `Cow`       | `<prefix>::Cow` (or `Cow` at the root)      |
//! | `::Cow`     | `Cow` (prefix stripped)                     |
//! | `+Calf`     | `<enclosing class>::Calf`                   |

use std::fmt;

/// Separator between qualified-name segments.
pub const SEPARATOR: &str = "::";

/// Error produced when a written name cannot be qualified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameError {
    /// The name (after stripping any sigil) is empty.
    Empty { written: String },
    /// A `+Name` was written outside of any class declaration.
    NoEnclosingClass { written: String },
    /// The name falls inside a namespace kept for generated names.
    Reserved { written: String, prefix: String },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty { written } => write!(f, "empty type name `{written}`"),
            NameError::NoEnclosingClass { written } => {
                write!(f, "`{written}` is relative to an enclosing class, but there is none")
            }
            NameError::Reserved { written, prefix } => {
                write!(f, "`{written}` is inside the reserved namespace `{prefix}`")
            }
        }
    }
}

impl std::error::Error for NameError {}

/// The naming context a declaration is made in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Prefix applied to plain names. Empty at the root.
    prefix: String,
    /// Full name of the nearest enclosing class, for `+Name`.
    enclosing_class: Option<String>,
}

impl Scope {
    /// The root scope: no prefix, no enclosing class.
    pub fn root() -> Self {
        Self::default()
    }

    /// A scope whose plain names are prefixed with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            enclosing_class: None,
        }
    }

    /// The prefix applied to plain names.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full name of the nearest enclosing class, if any.
    #[inline]
    pub fn enclosing_class(&self) -> Option<&str> {
        self.enclosing_class.as_deref()
    }

    /// Child scope for declarations nested inside the class `class_name`.
    ///
    /// The prefix is inherited unchanged; only `+Name` resolution moves.
    pub fn enter_class(&self, class_name: impl Into<String>) -> Self {
        Self {
            prefix: self.prefix.clone(),
            enclosing_class: Some(class_name.into()),
        }
    }

    /// Qualify a written name against this scope.
    pub fn qualify(&self, written: &str) -> Result<String, NameError> {
        if let Some(absolute) = written.strip_prefix(SEPARATOR) {
            return non_empty(absolute, written).map(str::to_owned);
        }

        if let Some(relative) = written.strip_prefix('+') {
            let local = non_empty(relative, written)?;
            let Some(class) = self.enclosing_class.as_deref() else {
                return Err(NameError::NoEnclosingClass {
                    written: written.to_owned(),
                });
            };
            return Ok(join(class, local));
        }

        let local = non_empty(written, written)?;
        if self.prefix.is_empty() {
            Ok(local.to_owned())
        } else {
            Ok(join(&self.prefix, local))
        }
    }
}

fn non_empty<'a>(name: &'a str, written: &str) -> Result<&'a str, NameError> {
    if name.is_empty() {
        Err(NameError::Empty {
            written: written.to_owned(),
        })
    } else {
        Ok(name)
    }
}

fn join(prefix: &str, local: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + SEPARATOR.len() + local.len());
    out.push_str(prefix);
    out.push_str(SEPARATOR);
    out.push_str(local);
    out
}

/// The last segment of a qualified name (`Farm::Cow` → `Cow`).
pub fn local_name(qualified: &str) -> &str {
    qualified.rsplit(SEPARATOR).next().unwrap_or(qualified)
}
