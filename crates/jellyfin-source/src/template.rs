//! Episode title templates.
//!
//! Templates contain `{name}` placeholders, e.g. `{number} - {title}`.
//! Placeholders without a value render as empty text.

use std::collections::HashMap;

/// Substitute placeholders and tidy the result.
///
/// After substitution the text is trimmed and a single dangling `-` at either
/// end is dropped, so `{number} - {title}` with no number renders as the title.
pub fn render(template: &str, values: &HashMap<&str, String>) -> String {
    let substituted = substitute(template, values);

    let trimmed = substituted.trim();
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('-').unwrap_or(trimmed);
    trimmed.trim().to_string()
}

fn substitute(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find('}') {
            Some(close) if !after_open[..close].contains('{') => {
                let name = &after_open[..close];
                if let Some(value) = values.get(name) {
                    out.push_str(value);
                }
                rest = &after_open[close + 1..];
            }
            _ => {
                // Not a placeholder, keep the brace
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_render_all_fields_present() {
        let values = fields(&[("number", "3"), ("title", "Escape")]);
        assert_eq!(render("{number} - {title}", &values), "3 - Escape");
    }

    #[test]
    fn test_render_strips_dangling_separator() {
        let values = fields(&[("number", ""), ("title", "Pilot")]);
        assert_eq!(render("{number} - {title}", &values), "Pilot");

        let values = fields(&[("number", "7"), ("title", "")]);
        assert_eq!(render("{number} - {title}", &values), "7");
    }

    #[test]
    fn test_missing_key_renders_empty() {
        let values = fields(&[("title", "Pilot")]);
        assert_eq!(render("{seasonTitle} {title}", &values), "Pilot");
        assert_eq!(render("{nope}", &values), "");
    }

    #[test]
    fn test_only_one_dash_removed() {
        let values = fields(&[("title", "--Pilot--")]);
        assert_eq!(render("{title}", &values), "-Pilot-");
    }

    #[test]
    fn test_unbalanced_braces_are_literal() {
        let values = fields(&[("title", "Pilot")]);
        assert_eq!(render("{title} {", &values), "Pilot {");
        assert_eq!(render("{{title}", &values), "{Pilot");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render("  Special  ", &HashMap::new()), "Special");
    }
}
