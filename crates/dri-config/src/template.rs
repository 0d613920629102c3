//! Comment templates
//!
//! Templates use `{name}` placeholders. Unknown placeholders are left as-is.

/// Replace every `{key}` in `template` with its value
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{}}}", key), value)
        })
}
