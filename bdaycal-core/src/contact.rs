//! vCard parsing.
//!
//! Only the handful of properties needed to build birthday events are read:
//! `FN`, `N`, `UID` and `BDAY`. Everything else in a card is ignored.

use icalendar::parser::unfold;
use uuid::Uuid;

use crate::birthday::Birthday;
use crate::error::{BdayError, BdayResult};

const UNNAMED: &str = "(unnamed contact)";

/// One entry read from an address book file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub uid: Option<String>,
    /// Raw BDAY value, parsed on demand by [`Contact::birthday`].
    pub bday: Option<String>,
}

impl Contact {
    /// The parsed birthday, or `None` when the card has no BDAY.
    pub fn birthday(&self) -> Option<BdayResult<Birthday>> {
        self.bday.as_deref().map(Birthday::parse)
    }

    /// The card's UID as a UUID. A `urn:uuid:` prefix is accepted.
    pub fn uuid(&self) -> BdayResult<Uuid> {
        let uid = self.uid.as_deref().ok_or(BdayError::MissingUid)?;
        let bare = uid.strip_prefix("urn:uuid:").unwrap_or(uid);
        Uuid::parse_str(bare).map_err(|_| BdayError::InvalidUid(uid.to_string()))
    }
}

/// Parse every `VCARD` block in a file.
///
/// A broken block yields an error entry and does not stop the remaining
/// blocks from being read.
pub fn parse_contacts(content: &str) -> Vec<BdayResult<Contact>> {
    let normalized: String = content.lines().map(|l| format!("{}\r\n", l)).collect();
    let unfolded = unfold(&normalized);

    let mut results = Vec::new();
    let mut current: Option<CardBuilder> = None;

    for line in unfolded.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let Some((name, value)) = split_content_line(line) else {
            continue;
        };

        match (name.as_str(), value.trim()) {
            ("BEGIN", v) if v.eq_ignore_ascii_case("VCARD") => {
                if let Some(open) = current.take() {
                    results.push(Err(BdayError::MalformedCard(format!(
                        "card '{}' is missing END:VCARD",
                        open.display_name()
                    ))));
                }
                current = Some(CardBuilder::default());
            }
            ("END", v) if v.eq_ignore_ascii_case("VCARD") => match current.take() {
                Some(card) => results.push(Ok(card.build())),
                None => results.push(Err(BdayError::MalformedCard(
                    "END:VCARD without BEGIN:VCARD".to_string(),
                ))),
            },
            _ => {
                if let Some(card) = current.as_mut() {
                    card.apply(&name, value);
                }
            }
        }
    }

    if let Some(open) = current {
        results.push(Err(BdayError::MalformedCard(format!(
            "card '{}' is missing END:VCARD",
            open.display_name()
        ))));
    }

    results
}

#[derive(Default)]
struct CardBuilder {
    formatted_name: Option<String>,
    structured_name: Option<String>,
    uid: Option<String>,
    bday: Option<String>,
}

impl CardBuilder {
    fn apply(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match name {
            "FN" => self.formatted_name = Some(unescape(value)),
            "N" => self.structured_name = structured_to_display(value),
            "UID" => self.uid = Some(value.to_string()),
            "BDAY" => self.bday = Some(value.to_string()),
            _ => {}
        }
    }

    fn display_name(&self) -> String {
        self.formatted_name
            .clone()
            .or_else(|| self.structured_name.clone())
            .unwrap_or_else(|| UNNAMED.to_string())
    }

    fn build(self) -> Contact {
        Contact {
            name: self.display_name(),
            uid: self.uid,
            bday: self.bday,
        }
    }
}

/// Split `group.NAME;PARAMS:value` into the upper-cased name and the value.
///
/// The value starts after the first colon that is not inside a quoted
/// parameter value.
fn split_content_line(line: &str) -> Option<(String, &str)> {
    let mut in_quotes = false;
    let colon = line.char_indices().find_map(|(i, c)| match c {
        '"' => {
            in_quotes = !in_quotes;
            None
        }
        ':' if !in_quotes => Some(i),
        _ => None,
    })?;

    let (head, value) = (&line[..colon], &line[colon + 1..]);
    let name = head.split(';').next().unwrap_or(head);
    let name = name.rsplit('.').next().unwrap_or(name);

    Some((name.to_ascii_uppercase(), value))
}

/// `N:Family;Given;Additional;Prefix;Suffix` → "Given Family".
fn structured_to_display(value: &str) -> Option<String> {
    let parts: Vec<String> = value.split(';').map(unescape).collect();
    let family = parts.first().map(String::as_str).unwrap_or("");
    let given = parts.get(1).map(String::as_str).unwrap_or("");

    let name = format!("{} {}", given.trim(), family.trim()).trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// Resolve vCard text escapes in one left-to-right pass.
fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => result.push(' '),
            Some(escaped) => result.push(escaped),
            None => result.push('\\'),
        }
    }

    result
}
