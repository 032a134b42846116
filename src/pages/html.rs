//! HTML helpers.

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Only `http(s)` links are rendered as clickable.
pub fn safe_href(url: &str) -> Option<String> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Some(html_escape(url))
    } else {
        None
    }
}

/// Wrap a body in the shared document shell.
pub fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="cs">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body>
{}
</body>
</html>
"#,
        html_escape(title),
        body
    )
}

/// Format a number the Czech way (decimal comma, at most one decimal).
pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded).replace('.', ",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_safe_href() {
        assert_eq!(
            safe_href("https://mapy.cz/?a=1&b=2").as_deref(),
            Some("https://mapy.cz/?a=1&amp;b=2")
        );
        assert!(safe_href("javascript:alert(1)").is_none());
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(-3.0), "-3");
        assert_eq!(format_decimal(-3.46), "-3,5");
        assert_eq!(format_decimal(42.0), "42");
    }
}
