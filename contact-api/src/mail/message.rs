//! Notification message construction.

/// The notification built from one validated submission.
///
/// Sender and destination addresses come from configuration and are added
/// by the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// Submitter name, used as the reply-to display name
    pub reply_to_name: String,
    /// Submitter address, used as the reply-to address
    pub reply_to_email: String,
}

impl ContactEmail {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        let subject = format!("New contact form message from {}", name);
        let text_body = format!("Name: {}\nEmail: {}\n\nMessage:\n{}", name, email, message);

        let html_message = escape_html(message).replace('\n', "<br/>");
        let html_body = format!(
            "<p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>",
            escape_html(name),
            escape_html(email),
            html_message
        );

        Self {
            subject,
            text_body,
            html_body,
            reply_to_name: name.to_string(),
            reply_to_email: email.to_string(),
        }
    }
}

/// Escape text for embedding in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
