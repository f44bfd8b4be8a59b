//! Email synthesis: one generation request per recipient.

use tracing::warn;

use devreach_genai::GenAiClient;

/// The question asked of the memory store, and the lead of the generation
/// prompt. Kept identical so recalled facts match what the prompt needs.
pub fn synthesis_query(recipient_name: &str, target_short_name: &str) -> String {
    format!(
        "Write a short, personalised email to {recipient_name} about their use of {target_short_name}."
    )
}

/// Generate the email body for one recipient.
///
/// Returns `None` when the service produces no usable text; the caller
/// logs a warning and moves on to the next recipient.
pub async fn synthesize_email(
    genai: &GenAiClient,
    recipient_name: &str,
    target_short_name: &str,
    relevant_facts: &[String],
) -> Option<String> {
    let prompt = format!(
        "{query} \
         Brief features of {target_short_name} relevant to their project. \
         End the email asking to reach out for any kind of questions, feedback. \
         Keep it short, simple and friendly. \
         DO NOT INCLUDE ANY TAGS LIKE [Your Name] or [Insert two or three points here].\n\
         \n\
         User Details:\n\
         {facts}",
        query = synthesis_query(recipient_name, target_short_name),
        facts = relevant_facts.join("\n"),
    );

    match genai.generate(&prompt).await {
        Ok(body) => body,
        Err(e) => {
            warn!(recipient = recipient_name, error = %e, "email generation failed");
            None
        }
    }
}
