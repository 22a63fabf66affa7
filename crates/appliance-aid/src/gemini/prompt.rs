//! Prompt construction for the Gemini API.
//!
//! The diagnosis prompt pins the answer to four named sections so the
//! renderer and the reader always get the same shape of advice. The
//! technician prompt demands a bare JSON array; the parser still tolerates
//! models that wrap it anyway.

/// System instruction framing the diagnosis request.
#[must_use]
pub fn diagnosis_system() -> &'static str {
    r#"You are an expert home appliance technician. Your goal is to diagnose a problem with a customer's appliance based on their description and an optional photo.

Instructions:
1. Start with a "Likely Problem" section summarizing the most probable issue.
2. Create a "Possible Causes" section listing potential reasons for the problem in a numbered list.
3. Provide a "Simple Troubleshooting Steps" section with clear, safe, step-by-step instructions the user can try at home. Use a numbered list.
4. End with a "Safety Disclaimer" section. This must warn the user to unplug the appliance before attempting any repairs and to call a professional technician for any complex issues or if they are unsure about any step.

Format your entire response using Markdown for clarity."#
}

/// The user-message text describing the issue.
#[must_use]
pub fn issue_text(appliance_name: &str, description: &str) -> String {
    format!("My {appliance_name} is having an issue. Here is the description: {description}")
}

/// Prompt for the location-grounded technician search.
#[must_use]
pub fn technician_search(appliance_name: &str) -> String {
    format!(
        r#"Find appliance repair shops near the provided location that can service a {appliance_name}.

Return your response as a valid JSON array of objects. Each object should represent a single business and have the following properties: "name", "address", and "phone".

Example format:
[
  {{
    "name": "Example Appliance Repair",
    "address": "123 Main St, Anytown, USA",
    "phone": "555-123-4567"
  }}
]

Only return the raw JSON array, with no other text, explanations, or markdown formatting."#
    )
}
