// SPDX-License-Identifier: MIT

//!
//! The era label type
//!

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can arise in relation to a [`Label`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("Label cannot be empty")]
    Empty,
}

/// The text describing an era (e.g. "Elementary School").  The value can be any
/// string apart from one which when trimmed of trailing and leading whitespace
/// is empty.  The stored value is trimmed.
#[derive(derive_more::Display, Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(String);

impl Label {
    /// Create and initialise a new label if it will be valid
    pub fn from<S: AsRef<str>>(label: S) -> Result<Self, LabelError> {
        let label = label.as_ref().trim();
        if label.is_empty() {
            Err(LabelError::Empty)
        } else {
            Ok(Label(label.to_string()))
        }
    }

    /// Get the underlying `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Label::from(string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from() {
        assert_eq!(Label::from(""), Err(LabelError::Empty));
        assert_eq!(Label::from(" \t "), Err(LabelError::Empty));
        let ok_1 = Label::from("Born").unwrap();
        let ok_2 = Label::from("  Born ").unwrap();
        assert_eq!(ok_1, ok_2);
        assert_eq!(ok_2.as_str(), "Born");
    }
}
