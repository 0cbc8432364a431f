//! Review prompt template
//!
//! The template uses `{{VARIABLE}}` placeholders. Rendering is a single left-to-right
//! pass, so placeholder-like text inside substituted values is never expanded.

/// Embedded review prompt
const REVIEW_PROMPT: &str = include_str!("prompts/review.md");

/// Inputs embedded verbatim into the review prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub code: &'a str,
    pub assignment: &'a str,
    pub candidate_level: &'a str,
}

impl PromptInputs<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "CODE" => Some(self.code),
            "ASSIGNMENT" => Some(self.assignment),
            "CANDIDATE_LEVEL" => Some(self.candidate_level),
            _ => None,
        }
    }
}

/// Render the review prompt
pub fn render_review_prompt(inputs: &PromptInputs<'_>) -> String {
    render_template(REVIEW_PROMPT, inputs)
}

fn render_template(template: &str, inputs: &PromptInputs<'_>) -> String {
    let mut result = String::with_capacity(
        template.len() + inputs.code.len() + inputs.assignment.len() + inputs.candidate_level.len(),
    );
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                match inputs.lookup(name) {
                    Some(value) => result.push_str(value),
                    None => {
                        result.push_str("{{");
                        result.push_str(name);
                        result.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);

    result
}
