use recall_types::PromptContext;

use crate::error::{PromptError, Result};

/// Named slot in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Question,
    History,
    Context,
    Summary,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "question" | "input" => Some(Self::Question),
            "history" | "chat_history" => Some(Self::History),
            "context" => Some(Self::Context),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// Template parsed once into literal text and placeholders
///
/// `{{` and `}}` render as literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        if source.trim().is_empty() {
            return Err(PromptError::InvalidParameter(format!(
                "template '{}' is empty",
                name
            )));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut slot = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => break,
                            other => slot.push(other),
                        }
                    }
                    if !closed {
                        return Err(PromptError::InvalidParameter(format!(
                            "template '{}' has an unclosed '{{'",
                            name
                        )));
                    }
                    let placeholder = Placeholder::parse(&slot).ok_or_else(|| {
                        PromptError::InvalidParameter(format!(
                            "template '{}' uses unknown placeholder {{{}}}",
                            name, slot
                        ))
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(placeholder));
                }
                '}' => {
                    return Err(PromptError::InvalidParameter(format!(
                        "template '{}' has an unmatched '}}'",
                        name
                    )));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            name,
            source,
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.segments.contains(&Segment::Slot(placeholder))
    }

    /// Textual substitution; absent optional fields render as empty text
    pub fn render(&self, context: &PromptContext) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Placeholder::Question) => out.push_str(&context.question),
                Segment::Slot(Placeholder::History) => out.push_str(&context.history),
                Segment::Slot(Placeholder::Context) => {
                    out.push_str(&context.retrieved_context.join("\n\n"))
                }
                Segment::Slot(Placeholder::Summary) => {
                    out.push_str(context.summary.as_deref().unwrap_or(""))
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_all_fields() {
        let template = PromptTemplate::parse(
            "t",
            "Context: {context}\nSummary: {summary}\n{history}\nuser: {question}",
        )
        .unwrap();
        let context = PromptContext::new("mayor?")
            .with_history("user: hi\nassistant: hello")
            .with_summary(Some("- greeted".to_string()))
            .with_retrieved_context(vec!["city: Kato".to_string(), "mayor: Yasuda".to_string()]);

        assert_eq!(
            template.render(&context),
            "Context: city: Kato\n\nmayor: Yasuda\nSummary: - greeted\nuser: hi\nassistant: hello\nuser: mayor?"
        );
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let template = PromptTemplate::parse("t", "[{summary}][{context}][{history}]").unwrap();
        assert_eq!(template.render(&PromptContext::new("q")), "[][][]");
    }

    #[test]
    fn test_aliases_and_escapes() {
        let template = PromptTemplate::parse("t", "{{json}} {chat_history} / {input}").unwrap();
        assert!(template.uses(Placeholder::History));
        assert!(template.uses(Placeholder::Question));
        assert!(!template.uses(Placeholder::Summary));

        let context = PromptContext::new("q").with_history("h");
        assert_eq!(template.render(&context), "{json} h / q");
    }

    #[test]
    fn test_invalid_templates() {
        for source in ["", "   ", "{question", "question}", "{unknown}", "{ques{tion}"] {
            assert!(
                matches!(PromptTemplate::parse("t", source), Err(PromptError::InvalidParameter(_))),
                "accepted {:?}",
                source
            );
        }
    }
}
