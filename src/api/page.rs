//! Server-rendered form page.
//!
//! The page is a Handlebars template; every value goes through `{{...}}`
//! so escaping is left to the template engine. The agent's markdown is
//! parsed into blocks and spans first, never spliced in as raw HTML.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

use crate::planner::PlanOutcome;

const PAGE_TEMPLATE: &str = include_str!("templates/page.hbs");

const SPANS_PARTIAL: &str =
    "{{#each spans}}{{#if strong}}<strong>{{text}}</strong>{{else}}{{text}}{{/if}}{{/each}}";

/// A run of text, optionally bold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub strong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub spans: Vec<Span>,
}

/// A paragraph (`spans`) or a bullet list (`items`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub spans: Option<Vec<Span>>,
    pub items: Option<Vec<ListItem>>,
}

#[derive(Debug, Serialize)]
struct Notice {
    class: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct PageData<'a> {
    city: &'a str,
    answer: Option<Vec<Block>>,
    notice: Option<Notice>,
}

/// Parse the small markdown subset the agent produces.
///
/// Lines starting with `-`, `*` or `•` become list items; other non-blank
/// lines become paragraphs. `**bold**` spans are kept.
pub fn markdown_blocks(text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        let bullet = ["- ", "* ", "• "]
            .iter()
            .find_map(|marker| trimmed.strip_prefix(marker));

        match bullet {
            Some(item) => {
                let item = ListItem {
                    spans: inline_spans(item.trim()),
                };
                match blocks.last_mut() {
                    Some(Block {
                        items: Some(items), ..
                    }) => items.push(item),
                    _ => blocks.push(Block {
                        spans: None,
                        items: Some(vec![item]),
                    }),
                }
            }
            None if trimmed.is_empty() => {}
            None => blocks.push(Block {
                spans: Some(inline_spans(trimmed)),
                items: None,
            }),
        }
    }

    blocks
}

fn inline_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut push = |text: &str, strong: bool| {
        if !text.is_empty() {
            spans.push(Span {
                text: text.to_string(),
                strong,
            });
        }
    };

    let mut rest = text;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) => {
                push(&rest[..start], false);
                push(&after[..end], true);
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    push(rest, false);
    spans
}

/// Renders the planner page from the embedded template.
pub struct PageRenderer {
    hbs: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut hbs = Handlebars::new();
        hbs.register_partial("spans", SPANS_PARTIAL)?;
        hbs.register_template_string("page", PAGE_TEMPLATE)?;
        Ok(Self { hbs })
    }

    /// Render the full page. `outcome` is shown below the form when present.
    pub fn render(&self, city: &str, outcome: Option<&PlanOutcome>) -> Result<String, RenderError> {
        let (answer, notice) = match outcome {
            Some(PlanOutcome::Answer(text)) => (Some(markdown_blocks(text)), None),
            Some(other) => (
                None,
                Some(Notice {
                    class: if other.is_failure() { "error" } else { "success" },
                    message: other.message(),
                }),
            ),
            None => (None, None),
        };

        self.hbs.render("page", &PageData { city, answer, notice })
    }
}
