use std::borrow::Cow;

use crate::types::UsageError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// A parsed message template such as `"'{PropertyName}' must not be empty."`.
///
/// Placeholders are written `{Name}`; `{{` and `}}` produce literal braces. Parsing rejects
/// unterminated and empty placeholders, so every template reaching a validator is
/// well-formed. Which names are *resolvable* depends on the check the template belongs to
/// and is verified when the validator is built.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use rule_rail::messages::MessageTemplate;
///
/// let template = MessageTemplate::parse("{PropertyName} must contain fewer than {MaxElements} items.")?;
/// assert_eq!(template.placeholders().collect::<Vec<_>>(), ["PropertyName", "MaxElements"]);
///
/// let text = template.render(|name| match name {
///     "PropertyName" => Some(Cow::Borrowed("Pets")),
///     "MaxElements" => Some(Cow::Borrowed("10")),
///     _ => None,
/// });
/// assert_eq!(text, "Pets must contain fewer than 10 items.");
/// # Ok::<(), rule_rail::UsageError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parses `source`, failing on malformed placeholders.
    pub fn parse(source: &str) -> Result<Self, UsageError> {
        let malformed = || UsageError::MalformedTemplate { template: source.to_string() };

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(malformed()),
                            _ => name.push(c),
                        }
                    }
                    let name = name.trim();
                    if !closed || name.is_empty() {
                        return Err(malformed());
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { source: source.to_string(), segments })
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// The template text as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders the template, substituting every placeholder `resolve` knows.
    ///
    /// A placeholder `resolve` returns `None` for is written back verbatim.
    pub fn render<'s, F>(&self, mut resolve: F) -> String
    where
        F: FnMut(&str) -> Option<Cow<'s, str>>,
    {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => match resolve(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}
