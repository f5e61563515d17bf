//! `<uml>` tags in documentation comments.
//!
//! Authors embed PlantUML in comments as `<uml>...</uml>` (optionally
//! `<uml alt="...">`). Before rendering, every tag is replaced by a Markdown
//! image link pointing at the PlantUML server.

use std::borrow::Cow;
use std::sync::LazyLock;

use documl_config::{ClassDiagramPosition, UmlOptions};
use documl_model::Comment;
use regex::{Captures, Regex};

use crate::encode::encode;

/// `<uml alt="...">BODY</uml>`, case-insensitive, body spanning lines.
static UML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<uml(?:\s+alt\s*=\s*(?:"([^"]*)"|'([^']*)')\s*)?>(.*?)</uml>"#).unwrap()
});

/// Wrap diagram lines in a `<uml>` tag pair.
fn uml_block(lines: &[String]) -> String {
    format!("<uml>\n{}\n</uml>", lines.join("\n"))
}

/// Splice a synthesized class diagram into a comment.
///
/// [`ClassDiagramPosition::Above`] prepends the block to the short text
/// followed by a Markdown line break; [`ClassDiagramPosition::Below`] appends
/// it to the long text. Absent text counts as empty. Does nothing when
/// `lines` is empty.
pub fn inject_class_diagram(comment: &mut Comment, lines: &[String], position: ClassDiagramPosition) {
    if lines.is_empty() {
        return;
    }

    let block = uml_block(lines);
    match position {
        ClassDiagramPosition::Above => {
            let short_text = comment.short_text.as_deref().unwrap_or_default();
            comment.short_text = Some(format!("{block}  \n{short_text}"));
        }
        ClassDiagramPosition::Below => {
            let text = comment.text.as_deref().unwrap_or_default();
            comment.text = Some(format!("{text}\n{block}"));
        }
    }
}

/// Replaces `<uml>` tags with PlantUML image links.
#[derive(Debug, Clone)]
pub struct UmlTagConverter {
    /// `SERVER FORMAT/`, the prefix of every generated link.
    link_base: String,
}

impl UmlTagConverter {
    pub fn new(options: &UmlOptions) -> Self {
        Self {
            link_base: options.image_base_url(),
        }
    }

    /// Replace every tag in `text`, left to right.
    ///
    /// Text without tags is returned borrowed and untouched.
    pub fn convert<'t>(&self, text: &'t str) -> Cow<'t, str> {
        UML_TAG_RE.replace_all(text, |caps: &Captures| {
            let alt = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            let body = caps.get(3).map_or("", |m| m.as_str());
            format!("![{alt}]({}{})", self.link_base, encode(body))
        })
    }

    /// Convert both text fields of a comment in place.
    ///
    /// Returns the number of tags replaced.
    pub fn convert_comment(&self, comment: &mut Comment) -> usize {
        let mut converted = 0;
        for field in [&mut comment.short_text, &mut comment.text] {
            let Some(text) = field.as_deref() else {
                continue;
            };
            let count = UML_TAG_RE.find_iter(text).count();
            if count == 0 {
                continue;
            }
            let replaced = self.convert(text).into_owned();
            *field = Some(replaced);
            converted += count;
        }
        converted
    }
}
