//! Prompt construction for the intent extraction request.
//!
//! Callers may override the default template through the request's
//! `system_prompt` field. Templates use `{{name}}` placeholders:
//! `{{query}}`, `{{current_time}}`, `{{timezone}}`, `{{rejected_times}}`.

use slotwise_core::intent::IntentPrompt;

pub(crate) const DEFAULT_TEMPLATE: &str = "\
The current time is {{current_time}} in the {{timezone}} timezone.

A user asked to schedule a meeting with this request: \"{{query}}\"
{{rejected_times}}
Determine the concrete time window the user means. Respond with a single \
JSON object containing startTime and endTime (ISO-8601 with explicit UTC \
offset), interpretation (one sentence, 10 to 200 characters), and \
confidence (0 to 1).";

/// Render the user-facing prompt text from the template, substituting every
/// placeholder. Unknown placeholders are left verbatim.
pub(crate) fn render(prompt: &IntentPrompt) -> String {
    let template = prompt.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);

    let rejected = if prompt.rejected_times.is_empty() {
        String::new()
    } else {
        let listed = prompt
            .rejected_times
            .iter()
            .map(|t| t.to_rfc3339())
            .collect::<Vec<_>>()
            .join(", ");
        format!("\nThe user already declined these times: {listed}.\n")
    };

    template
        .replace("{{query}}", &prompt.query)
        .replace("{{current_time}}", &prompt.now.to_rfc3339())
        .replace("{{timezone}}", prompt.now.timezone().name())
        .replace("{{rejected_times}}", &rejected)
}
