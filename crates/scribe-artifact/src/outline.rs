//! Document outline extraction for text snapshots

use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// One heading of a markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text with inline markup stripped
    pub text: String,
}

/// Headings of `markdown`, in document order
#[must_use]
pub fn outline(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<Heading> = None;

    for event in MdParser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some(Heading {
                    level: level as u8,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut heading) = current.take() {
                    heading.text = heading.text.trim().to_string();
                    headings.push(heading);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(ref mut heading) = current {
                    heading.text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(ref mut heading) = current {
                    heading.text.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}
