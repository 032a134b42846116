//! Admin page: access denied notice or the JSON editor.

use std::collections::BTreeMap;

use serde_json::Value;

use super::html::{document, html_escape};
use crate::auth::ResolvedAllowlist;
use crate::errors::{codes, localized_message, AppError};
use crate::models::{ContentBlock, ContentSlug};

const BACK_LINK: &str = r#"<p><a href="/">Zpět na hlavní stránku</a></p>"#;

/// Page for callers that did not pass the admin gate.
pub fn denied_page(error: &AppError, sign_in_url: &str) -> String {
    let body = format!(
        concat!(
            r#"<main id="admin"><h1>Administrace</h1><h2>Přístup odepřen.</h2>"#,
            r#"<p class="error" data-code="{}">{}</p>"#,
            "<p>Tato stránka vyžaduje přihlášení Google a povolení v seznamu správců.</p>",
            r#"<p><a class="sign-in" href="{}">Přihlásit se Google</a></p>{}</main>"#
        ),
        error.error_code(),
        html_escape(error.localized_message()),
        html_escape(sign_in_url),
        BACK_LINK
    );
    document("Administrace | SkiDráček", &body)
}

/// Page for admins when the editor cannot be loaded.
pub fn error_page(error: &AppError) -> String {
    let body = format!(
        r#"<main id="admin"><h1>Administrace</h1><p class="error" data-code="{}">{}</p>{}</main>"#,
        error.error_code(),
        html_escape(error.localized_message()),
        BACK_LINK
    );
    document("Administrace | SkiDráček", &body)
}

/// Editor with one form per slug.
pub fn editor_page(
    email: &str,
    blocks: &[ContentBlock],
    allowlist: Option<&ResolvedAllowlist>,
    sign_out_url: &str,
) -> String {
    let mut body = format!(
        r#"<main id="admin"><h1>Administrace</h1><p>Vítejte, {}.</p>"#,
        html_escape(email)
    );

    if let Some(list) = allowlist {
        body.push_str(&format!(
            r#"<p class="allowlist-source">Seznam správců: {} ({})</p>"#,
            html_escape(&list.source.to_string()),
            list.emails.len()
        ));
    }

    for slug in ContentSlug::ALL {
        let block = blocks.iter().find(|b| b.slug == slug.as_str());
        body.push_str(&slug_form(slug, block));
    }

    body.push_str(&format!(
        r#"<form action="{}" method="post"><button type="submit">Odhlásit se</button></form>{}</main>"#,
        html_escape(sign_out_url),
        BACK_LINK
    ));
    body.push_str(&editor_script());

    document("Administrace | SkiDráček", &body)
}

fn slug_form(slug: ContentSlug, block: Option<&ContentBlock>) -> String {
    let data = block
        .and_then(|b| serde_json::to_string_pretty(&b.data).ok())
        .unwrap_or_else(|| "{}".to_string());
    let updated = block
        .map(|b| format!(r#"<p class="updated">Upraveno: {}</p>"#, html_escape(&b.updated_at)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<form class="content-editor" data-slug="{slug}">"#,
            r#"<h2>{slug}</h2>{updated}"#,
            r#"<textarea name="data" rows="12" cols="80">{data}</textarea>"#,
            r#"<button type="submit">Uložit</button><output></output></form>"#
        ),
        slug = slug.as_str(),
        updated = updated,
        data = html_escape(&data)
    )
}

/// Czech messages keyed by error code, for the inline script.
fn messages_json() -> String {
    let messages: BTreeMap<&str, Value> = codes::ALL
        .iter()
        .map(|code| (*code, Value::from(localized_message(code))))
        .collect();
    // Keep "</script>" out of the inline script.
    serde_json::to_string(&messages)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}

fn editor_script() -> String {
    format!(
        r#"<script>
const MESSAGES = {messages};
for (const form of document.querySelectorAll("form.content-editor")) {{
  form.addEventListener("submit", async (event) => {{
    event.preventDefault();
    const out = form.querySelector("output");
    let data;
    try {{
      data = JSON.parse(form.querySelector("textarea").value);
    }} catch (e) {{
      out.textContent = MESSAGES.BAD_REQUEST;
      return;
    }}
    const res = await fetch("/api/content", {{
      method: "PUT",
      headers: {{ "Content-Type": "application/json" }},
      credentials: "same-origin",
      body: JSON.stringify({{ slug: form.dataset.slug, data }}),
    }});
    const body = await res.json().catch(() => ({{}}));
    if (body.ok) {{
      out.textContent = "Uloženo.";
      return;
    }}
    const issues = (body.issues || []).map((i) => (i.path ? i.path + ": " : "") + i.message);
    out.textContent = [MESSAGES[body.code] || MESSAGES.INTERNAL_ERROR, ...issues].join(" ");
  }});
}}
</script>"#,
        messages = messages_json()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AllowlistSource;
    use serde_json::json;

    #[test]
    fn test_denied_page() {
        let html = denied_page(
            &AppError::NotAuthenticated("Not signed in".to_string()),
            "/signin?next=%2Fadmin&x=1",
        );
        assert!(html.contains("Přístup odepřen."));
        assert!(html.contains("Nejste přihlášeni."));
        assert!(html.contains(r#"data-code="NOT_AUTHENTICATED""#));
        assert!(html.contains(r#"href="/signin?next=%2Fadmin&amp;x=1""#));
        assert!(html.contains("Tato stránka vyžaduje přihlášení Google"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(&AppError::Storage("database is locked".to_string()));
        assert!(html.contains("Uložení se nezdařilo."));
        assert!(!html.contains("database is locked"));
    }

    #[test]
    fn test_editor_lists_every_slug() {
        let blocks = vec![ContentBlock {
            slug: "hours".to_string(),
            data: json!({ "text": "Po-Pá <9-17>" }),
            updated_at: "2025-01-10T08:00:00.000Z".to_string(),
        }];
        let allowlist = ResolvedAllowlist {
            emails: vec!["boss@skidracek.cz".to_string()],
            source: AllowlistSource::Environment,
        };

        let html = editor_page(
            "boss@skidracek.cz",
            &blocks,
            Some(&allowlist),
            "https://auth.skidracek.cz/signout?next=/&x=1",
        );
        for slug in ContentSlug::ALL {
            assert!(html.contains(&format!(r#"data-slug="{}""#, slug.as_str())));
        }
        assert!(html.contains("Vítejte, boss@skidracek.cz."));
        assert!(html.contains("Po-Pá &lt;9-17&gt;"));
        assert!(html.contains("Seznam správců: environment (1)"));
        assert!(html.contains(
            r#"<form action="https://auth.skidracek.cz/signout?next=/&amp;x=1" method="post">"#
        ));
    }

    #[test]
    fn test_messages_cover_every_code() {
        let messages: BTreeMap<String, String> =
            serde_json::from_str(&messages_json().replace("<\\/", "</")).unwrap();
        for code in codes::ALL {
            assert_eq!(messages[code], localized_message(code));
        }
    }
}
