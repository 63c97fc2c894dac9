//! Presentation of resolved steps for the chat surface.
//!
//! The host renders the real buttons; this produces the chat markdown (or
//! JSON) that lists each step with its commands and follow-ups.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde_json::json;

use crate::steps::ResolvedStep;

/// Shown when no step applies
pub const NOTHING_TO_SUGGEST: &str = "No next step applies right now.";

const STEP_TEMPLATE: &str = "**{{title}}**: {{description}}\
{{#if doc_link}} [Learn more]({{doc_link}}){{/if}}\
{{#each actions}}\n- {{this}}{{/each}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show at most this many steps
    pub limit: Option<usize>,
    pub include_doc_links: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            limit: None,
            include_doc_links: true,
        }
    }
}

fn visible<'a>(steps: &'a [ResolvedStep], options: &RenderOptions) -> &'a [ResolvedStep] {
    match options.limit {
        Some(limit) if limit < steps.len() => &steps[..limit],
        _ => steps,
    }
}

/// Action lines for a step: one per command, then one per follow-up
fn action_lines(step: &ResolvedStep) -> Vec<String> {
    let commands = step.commands.iter().map(|c| {
        let mut invocation = c.command_id.clone();
        for arg in &c.arguments {
            invocation.push(' ');
            invocation.push_str(arg);
        }
        format!("{} (`{}`)", c.label, invocation)
    });
    let follow_ups = step.follow_ups.iter().map(|f| format!("Ask `{}`", f.label));
    commands.chain(follow_ups).collect()
}

/// Render steps as chat markdown, one paragraph per step
pub fn render_markdown(steps: &[ResolvedStep], options: &RenderOptions) -> Result<String> {
    let steps = visible(steps, options);
    if steps.is_empty() {
        return Ok(NOTHING_TO_SUGGEST.to_string());
    }

    let mut hbs = Handlebars::new();
    hbs.set_strict_mode(false);
    hbs.register_escape_fn(handlebars::no_escape);

    let mut paragraphs = Vec::with_capacity(steps.len());
    for step in steps {
        let doc_link = if options.include_doc_links {
            step.doc_link.as_deref()
        } else {
            None
        };
        let data = json!({
            "title": step.title,
            "description": step.description.trim_end(),
            "doc_link": doc_link,
            "actions": action_lines(step),
        });
        let rendered = hbs
            .render_template(STEP_TEMPLATE, &data)
            .with_context(|| format!("Failed to render step '{}'", step.title))?;
        paragraphs.push(rendered);
    }

    Ok(paragraphs.join("\n\n"))
}

/// Render steps as a pretty-printed JSON array
pub fn render_json(steps: &[ResolvedStep], options: &RenderOptions) -> Result<String> {
    let steps = visible(steps, options);
    serde_json::to_string_pretty(steps).context("Failed to serialize steps")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{ResolvedCommand, ResolvedFollowUp};

    fn step(title: &str) -> ResolvedStep {
        ResolvedStep {
            title: title.to_string(),
            description: "Do the thing & more. ".to_string(),
            doc_link: Some("https://example.com/doc".to_string()),
            commands: vec![ResolvedCommand {
                label: "Run it".to_string(),
                command_id: "teamsAgent.executeCommand".to_string(),
                arguments: vec!["fx-extension.deploy".to_string()],
            }],
            follow_ups: vec![ResolvedFollowUp {
                label: "@teams /create".to_string(),
                trigger_id: "create".to_string(),
                prompt: String::new(),
            }],
            priority: 0,
        }
    }

    #[test]
    fn test_empty_renders_placeholder() {
        let out = render_markdown(&[], &RenderOptions::default()).unwrap();
        assert_eq!(out, NOTHING_TO_SUGGEST);
    }

    #[test]
    fn test_markdown_layout() {
        let out = render_markdown(&[step("Deploy")], &RenderOptions::default()).unwrap();
        assert_eq!(
            out,
            "**Deploy**: Do the thing & more. [Learn more](https://example.com/doc)\n\
             - Run it (`teamsAgent.executeCommand fx-extension.deploy`)\n\
             - Ask `@teams /create`"
        );
    }

    #[test]
    fn test_doc_links_can_be_hidden() {
        let options = RenderOptions {
            limit: None,
            include_doc_links: false,
        };
        let out = render_markdown(&[step("Deploy")], &options).unwrap();
        assert!(!out.contains("Learn more"));
    }

    #[test]
    fn test_limit_truncates() {
        let steps = vec![step("One"), step("Two"), step("Three")];
        let options = RenderOptions {
            limit: Some(2),
            include_doc_links: true,
        };
        let out = render_markdown(&steps, &options).unwrap();
        assert!(out.contains("**One**"));
        assert!(out.contains("**Two**"));
        assert!(!out.contains("**Three**"));
        assert_eq!(out.matches("\n\n").count(), 1);
    }

    #[test]
    fn test_json_output() {
        let out = render_json(&[step("Deploy")], &RenderOptions::default()).unwrap();
        let parsed: Vec<ResolvedStep> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec![step("Deploy")]);
        assert!(out.contains("\"commandId\""));
    }

    #[test]
    fn test_json_empty_is_empty_array() {
        let out = render_json(&[], &RenderOptions::default()).unwrap();
        assert_eq!(out, "[]");
    }
}
