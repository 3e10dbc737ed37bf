//! Text templates with named `{slot}` placeholders.
//!
//! Templates are read from disk once and parsed into literal segments and
//! slots. `{{` and `}}` produce literal braces. Rendering substitutes values
//! verbatim; substituted text is never re-scanned for placeholders, so
//! docstrings and annotations may contain braces freely.

use std::path::Path;

use crate::errors::GeneratorError;

/// File name of the per-type module template.
pub const TYPE_TEMPLATE: &str = "types.txt";

/// File name of the package index template.
pub const INDEX_TEMPLATE: &str = "init.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses template text.
    ///
    /// ## Examples
    ///
    /// ```
    /// use pybotgram_typegen::template::Template;
    ///
    /// let template = Template::parse("greeting", "class {name}:\n    x = {{}}").unwrap();
    /// assert_eq!(template.slots(), vec!["name"]);
    /// assert_eq!(template.render(&[("name", "User")]).unwrap(), "class User:\n    x = {}");
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Template` for an unclosed `{`, a stray `}`,
    /// or a slot whose name is empty or not an identifier.
    pub fn parse(name: &str, text: &str) -> Result<Self, GeneratorError> {
        let error = |reason: String| GeneratorError::Template {
            name: name.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let start = idx + 1;
                    let end = loop {
                        match chars.next() {
                            Some((end, '}')) => break end,
                            Some(_) => {}
                            None => return Err(error(format!("unclosed '{{' at byte {idx}"))),
                        }
                    };
                    let slot = &text[start..end];
                    let valid = slot.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                    if slot.is_empty() || !valid {
                        return Err(error(format!("invalid slot name '{slot}' at byte {idx}")));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot.to_string()));
                }
                '}' => return Err(error(format!("single '}}' at byte {idx}"))),
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    /// Reads and parses `dir/file_name`.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Read` if the file cannot be read, or
    /// `GeneratorError::Template` if it does not parse.
    pub fn load(dir: &Path, file_name: &str) -> Result<Self, GeneratorError> {
        let path = dir.join(file_name);
        let text = std::fs::read_to_string(&path).map_err(|e| GeneratorError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(file_name, &text)
    }

    /// Slot names in order of first appearance.
    pub fn slots(&self) -> Vec<&str> {
        let mut slots: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Slot(slot) = segment
                && !slots.contains(&slot.as_str())
            {
                slots.push(slot);
            }
        }
        slots
    }

    /// Substitutes `values` into the template.
    ///
    /// Values for names that are not slots are ignored.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Template` if a slot has no value.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, GeneratorError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    let value = values
                        .iter()
                        .find(|(name, _)| *name == slot.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| GeneratorError::Template {
                            name: self.name.clone(),
                            reason: format!("no value for slot '{slot}'"),
                        })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
