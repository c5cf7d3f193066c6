//! File name pattern matching.
//!
//! A [`FilePattern`] is compiled once per operation and then tested against
//! the base names of candidate entries. Matching is anchored at both ends:
//! `.*\.txt` accepts `a.txt` but not `a.txt.bak`.

use crate::ConnectorError;
use crate::Result;
use regex::Regex;

/// Compiled regular expression over file base names.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    regex: Regex,
}

impl FilePattern {
    /// Compiles `pattern` for full-string matching.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError::InvalidPattern`] if the expression does not
    /// compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use vfsconn_core::FilePattern;
    ///
    /// let pattern = FilePattern::new(r".*\.txt")?;
    /// assert!(pattern.matches("notes.txt"));
    /// assert!(!pattern.matches("notes.txt.bak"));
    /// # Ok::<(), vfsconn_core::ConnectorError>(())
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            ConnectorError::InvalidPattern {
                pattern: pattern.to_string(),
                source: Box::new(e),
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns `true` iff the whole of `name` matches.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern text as supplied by the caller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compiles an optional pattern, treating an empty string as absent.
    pub(crate) fn optional(pattern: Option<&str>) -> Result<Option<Self>> {
        pattern
            .filter(|p| !p.is_empty())
            .map(Self::new)
            .transpose()
    }
}

impl std::fmt::Display for FilePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
