// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Built-in email templates.
//!
//! Names ending in `.html` are autoescaped by Tera; the `.txt` variants are
//! rendered verbatim.

use tera::Tera;

pub const INVITATION_HTML: &str = "invitation.html";
pub const INVITATION_TEXT: &str = "invitation.txt";
pub const WELCOME_HTML: &str = "welcome.html";
pub const WELCOME_TEXT: &str = "welcome.txt";

const INVITATION_HTML_SOURCE: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #1f2937;">
    <p>Hello {{ invitee_name }},</p>
    {% if is_reminder %}
    <p>This is a reminder that {{ employer_name }} is waiting for your answers to the H-1B questionnaire for the <strong>{{ job_title }}</strong> position ({{ subject_type }}).</p>
    {% else %}
    <p>{{ employer_name }} has started an H-1B {{ subject_type }} for the <strong>{{ job_title }}</strong> position and needs some information from you.</p>
    {% endif %}
    <p>The questionnaire has eight short sections. Your progress is saved after each one, so you can stop and come back at any time.</p>
    <p><a href="{{ login_url }}" style="background: #2563eb; color: #ffffff; padding: 10px 18px; text-decoration: none; border-radius: 4px;">Open the questionnaire</a></p>
    <p>This link expires on {{ expires_on }}.</p>
  </body>
</html>
"#;

const INVITATION_TEXT_SOURCE: &str = r"Hello {{ invitee_name }},

{% if is_reminder -%}
This is a reminder that {{ employer_name }} is waiting for your answers to the H-1B questionnaire for the {{ job_title }} position ({{ subject_type }}).
{%- else -%}
{{ employer_name }} has started an H-1B {{ subject_type }} for the {{ job_title }} position and needs some information from you.
{%- endif %}

The questionnaire has eight short sections. Your progress is saved after each one, so you can stop and come back at any time.

Open the questionnaire: {{ login_url }}

This link expires on {{ expires_on }}.
";

const WELCOME_HTML_SOURCE: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #1f2937;">
    <p>Welcome, {{ name }}.</p>
    <p>Your account is ready. You can sign in at any time to follow your H-1B petitions.</p>
  </body>
</html>
"#;

const WELCOME_TEXT_SOURCE: &str = r"Welcome, {{ name }}.

Your account is ready. You can sign in at any time to follow your H-1B petitions.
";

/// Builds the template registry.
///
/// # Errors
///
/// Returns an error if a built-in template fails to parse.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera: Tera = Tera::default();
    tera.add_raw_templates(vec![
        (INVITATION_HTML, INVITATION_HTML_SOURCE),
        (INVITATION_TEXT, INVITATION_TEXT_SOURCE),
        (WELCOME_HTML, WELCOME_HTML_SOURCE),
        (WELCOME_TEXT, WELCOME_TEXT_SOURCE),
    ])?;
    Ok(tera)
}
