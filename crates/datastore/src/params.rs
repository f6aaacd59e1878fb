//! Parameter sets for statements.
//!
//! A statement uses exactly one of two placeholder styles: positional (`?`) or named (`:name`).  The caller picks the
//! style by picking the variant; nothing is inferred from the shape of the values.
use itertools::Itertools;

use crate::errors::{Result, UsageError};
use crate::Value;

/// Which placeholder style a generated statement should use.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParamStyle {
    /// `?`, bound by position.
    Positional,
    /// `:name`, bound by name.
    Named,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Params {
    Positional(Vec<Value>),
    /// Names are stored without the leading `:` and keep insertion order.
    Named(Vec<(String, Value)>),
}

impl Params {
    pub fn positional<I, V>(values: I) -> Params
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    /// An empty named parameter set, to be filled with [Params::with].
    pub fn named() -> Params {
        Params::Named(vec![])
    }

    /// Append a named value.  An empty positional set becomes named.
    ///
    /// # Panics
    ///
    /// If `self` already holds positional values.
    pub fn with(self, name: &str, value: impl Into<Value>) -> Params {
        let mut values = match self {
            Params::Named(v) => v,
            Params::Positional(v) if v.is_empty() => vec![],
            Params::Positional(_) => panic!("Cannot add the named parameter {} to positional parameters", name),
        };
        values.push((name.to_string(), value.into()));
        Params::Named(values)
    }

    /// Append a positional value.  An empty named set becomes positional.
    ///
    /// # Panics
    ///
    /// If `self` already holds named values.
    pub fn push(self, value: impl Into<Value>) -> Params {
        let mut values = match self {
            Params::Positional(v) => v,
            Params::Named(v) if v.is_empty() => vec![],
            Params::Named(_) => panic!("Cannot add a positional parameter to named parameters"),
        };
        values.push(value.into());
        Params::Positional(values)
    }

    pub fn style(&self) -> ParamStyle {
        match self {
            Params::Positional(_) => ParamStyle::Positional,
            Params::Named(_) => ParamStyle::Named,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Positional(v) => v.len(),
            Params::Named(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `other` after `self`.
    ///
    /// Both sides must share a style.  A name present on both sides is an error rather than letting one silently
    /// win.
    pub(crate) fn extend(self, other: Params) -> Result<Params> {
        match (self, other) {
            (Params::Positional(mut a), Params::Positional(b)) => {
                a.extend(b);
                Ok(Params::Positional(a))
            }
            (Params::Named(mut a), Params::Named(b)) => {
                for (name, value) in b {
                    if a.iter().any(|(n, _)| *n == name) {
                        return Err(UsageError::DuplicateParameter(name).into());
                    }
                    a.push((name, value));
                }
                Ok(Params::Named(a))
            }
            (Params::Named(a), Params::Positional(b)) if a.is_empty() => Ok(Params::Positional(b)),
            (Params::Positional(a), Params::Named(b)) if a.is_empty() => Ok(Params::Named(b)),
            _ => Err(UsageError::MixedParamStyles.into()),
        }
    }

    /// Bind every value to `statement`.
    ///
    /// The statement must use exactly as many placeholders as there are values.  Named params must name each
    /// placeholder exactly once, so no placeholder is left to bind as NULL.
    pub(crate) fn bind(&self, statement: &mut rusqlite::Statement<'_>) -> Result<()> {
        let expected = statement.parameter_count();
        if expected != self.len() {
            return Err(rusqlite::Error::InvalidParameterCount(self.len(), expected).into());
        }

        match self {
            Params::Positional(values) => {
                for (i, v) in values.iter().enumerate() {
                    statement.raw_bind_parameter(i + 1, v)?;
                }
            }
            Params::Named(values) => {
                // Placeholder indices are 1-based.
                let mut bound = vec![false; expected + 1];
                for (name, v) in values.iter() {
                    let placeholder = format!(":{}", name);
                    let index = statement
                        .parameter_index(&placeholder)?
                        .ok_or(rusqlite::Error::InvalidParameterName(placeholder))?;
                    if std::mem::replace(&mut bound[index], true) {
                        return Err(UsageError::DuplicateParameter(name.clone()).into());
                    }
                    statement.raw_bind_parameter(index, v)?;
                }

                let covered = bound.iter().skip(1).filter(|b| **b).count();
                if covered != expected {
                    return Err(rusqlite::Error::InvalidParameterCount(covered, expected).into());
                }
            }
        }

        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(vec![])
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Params::Positional(v) => write!(f, "[{}]", v.iter().join(", ")),
            Params::Named(v) => write!(
                f,
                "{{{}}}",
                v.iter().map(|(n, v)| format!("{}: {}", n, v)).join(", ")
            ),
        }
    }
}
