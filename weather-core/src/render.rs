//! Turning an observation (or a failure) into markup.
//!
//! Untrusted text only reaches [`Markup`] through [`Escaped`], and `Escaped`
//! can only be built by [`escape`].

use anyhow::Result;
use regex::{Captures, Regex};
use std::{fmt, sync::LazyLock};

use crate::{Settings, WeatherObservation, surface::OutputSurface};

pub const ICON_BASE_URL: &str = "https://www.weatherbit.io/static/img/icons";

/// How `{observed}` prints the observation time.
pub const OBSERVED_FORMAT: &str = "%H:%M UTC";

/// Placeholder tokens: `{name}` where name is ASCII letters or underscores.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("placeholder pattern is valid"));

/// Text that has been HTML-escaped and is safe to place in markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` so the text renders literally in markup.
pub fn escape(raw: &str) -> Escaped {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Escaped(out)
}

/// A rendered HTML fragment, ready to be written into an output surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escaped values available to the message template.
#[derive(Debug, Clone)]
struct TemplateValues {
    city: Escaped,
    temperature: Escaped,
    description: Escaped,
    icon: Escaped,
    observed: Escaped,
}

impl TemplateValues {
    fn new(observation: &WeatherObservation, settings: &Settings) -> Self {
        let temperature = format!(
            "{}°{}",
            round_temperature(observation.temperature),
            settings.unit_system.label()
        );

        let observed = observation.observed_at.format(OBSERVED_FORMAT).to_string();

        Self {
            city: escape(&observation.city_name),
            temperature: escape(&temperature),
            description: escape(&observation.condition_description.to_lowercase()),
            icon: escape(&observation.condition_code),
            observed: escape(&observed),
        }
    }

    fn lookup(&self, name: &str) -> Option<&Escaped> {
        match name {
            "city" | "city_name" => Some(&self.city),
            "temperature" | "temp" => Some(&self.temperature),
            "conditions" | "description" => Some(&self.description),
            "icon" => Some(&self.icon),
            "observed" => Some(&self.observed),
            _ => None,
        }
    }
}

/// Round half up (toward +∞), so -2.5 shows as -2. Going through i64 keeps "-0" out.
fn round_temperature(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Expand `{name}` placeholders in one pass. Unknown names expand to nothing.
fn expand_template(template: &str, values: &TemplateValues) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .lookup(&caps[1])
                .map(|v| v.as_str().to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

fn icon_html(values: &TemplateValues) -> String {
    format!(
        r#"<p><img src="{ICON_BASE_URL}/{}.png" alt="{}" width="120" height="120"></p>"#,
        values.icon, values.description
    )
}

/// Markup for a successful observation.
///
/// The template itself is caller configuration and is emitted as-is; only the
/// substituted values are escaped.
pub fn success_markup(observation: &WeatherObservation, settings: &Settings) -> Markup {
    let values = TemplateValues::new(observation, settings);

    let mut html = String::new();
    if settings.show_icon {
        html.push_str(&icon_html(&values));
    }
    html.push_str("<p>");
    html.push_str(&expand_template(&settings.message_template, &values));
    html.push_str("</p>");

    Markup(html)
}

/// Markup for the error path: only the escaped error message.
pub fn error_markup(message: &str) -> Markup {
    Markup(format!("<p>{}</p>", escape(message)))
}

pub fn render_success(
    observation: &WeatherObservation,
    settings: &Settings,
    surface: &mut dyn OutputSurface,
) -> Result<()> {
    let markup = success_markup(observation, settings);
    surface.replace(&settings.target_selector, &markup)?;

    tracing::info!(
        selector = %settings.target_selector,
        city = %observation.city_name,
        "Rendered weather"
    );
    Ok(())
}

pub fn render_error(settings: &Settings, surface: &mut dyn OutputSurface) -> Result<()> {
    render_error_message(&settings.error_message, &settings.target_selector, surface)
}

/// Error rendering for when settings could not be resolved at all.
pub fn render_error_message(
    message: &str,
    selector: &str,
    surface: &mut dyn OutputSurface,
) -> Result<()> {
    surface.replace(selector, &error_markup(message))
}
