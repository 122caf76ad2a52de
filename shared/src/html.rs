//! Server-rendered HTML helpers
//!
//! Pages are plain `format!` output wrapped in a shared layout. Every
//! user-supplied string must pass through [`escape`].

use std::fmt::Write;

use axum::response::Html;

use crate::session::Flash;

/// Escape text for use in element content and quoted attribute values
pub fn escape(input: &str) -> String {
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

/// Site chrome: brand name and navigation links
#[derive(Debug, Clone, Copy)]
pub struct Site {
    pub name: &'static str,
    pub nav: &'static [(&'static str, &'static str)],
}

impl Site {
    /// Render a full page around `body`
    pub fn page(&self, title: &str, flashes: &[Flash], body: &str) -> Html<String> {
        let mut nav = String::new();
        for (href, label) in self.nav {
            let _ = write!(nav, r#"<a href="{href}">{label}</a> "#);
        }

        let mut messages = String::new();
        for flash in flashes {
            let _ = write!(
                messages,
                r#"<div class="flash {}">{}</div>"#,
                flash.level.as_str(),
                escape(&flash.message)
            );
        }

        Html(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | {site}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #ccc; padding: .3rem .6rem; }}
.flash {{ padding: .5rem; margin: .5rem 0; }}
.flash.success {{ background: #e0f5e0; }}
.flash.error {{ background: #f9dede; }}
.flash.info {{ background: #e0ecf9; }}
form.inline {{ display: inline; }}
</style>
</head>
<body>
<nav><strong>{site}</strong> {nav}</nav>
{messages}
<h1>{title}</h1>
{body}
</body>
</html>"#,
            title = escape(title),
            site = self.name,
        ))
    }
}

/// `<label>` + `<input>` pair
pub fn input(label: &str, name: &str, kind: &str, value: &str) -> String {
    format!(
        r#"<p><label>{label}<br><input type="{kind}" name="{name}" value="{}"></label></p>"#,
        escape(value)
    )
}

/// `<select>` with `(value, text)` options, preselecting `selected`
pub fn select(label: &str, name: &str, options: &[(String, String)], selected: &str) -> String {
    let mut out = format!(r#"<p><label>{label}<br><select name="{name}">"#);
    for (value, text) in options {
        let mark = if value == selected { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{}"{mark}>{}</option>"#,
            escape(value),
            escape(text)
        );
    }
    out.push_str("</select></label></p>");
    out
}

/// Single-button POST form, used for delete/return/remove actions
pub fn post_button(action: &str, label: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="{}"><button type="submit">{label}</button></form>"#,
        escape(action)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FlashLevel;

    const SITE: Site = Site {
        name: "Test",
        nav: &[("/", "Home")],
    };

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_page_renders_flashes_escaped() {
        let flashes = vec![Flash {
            level: FlashLevel::Error,
            message: "<script>".into(),
        }];
        let Html(page) = SITE.page("Games", &flashes, "<p>body</p>");
        assert!(page.contains(r#"<div class="flash error">&lt;script&gt;</div>"#));
        assert!(page.contains("<h1>Games</h1>"));
        assert!(page.contains("<p>body</p>"));
        assert!(page.contains(r#"<a href="/">Home</a>"#));
    }

    #[test]
    fn test_select_marks_selected() {
        let options = vec![
            ("1".to_string(), "Ana".to_string()),
            ("2".to_string(), "Bia".to_string()),
        ];
        let html = select("Customer", "customer_id", &options, "2");
        assert!(html.contains(r#"<option value="2" selected>Bia</option>"#));
        assert!(html.contains(r#"<option value="1">Ana</option>"#));
    }
}
