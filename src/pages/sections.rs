//! Sections of the public page.
//!
//! Every function returns an HTML fragment. Sections backed by a content
//! block take `Option<&T>` and render nothing when the block is absent;
//! the navigation, hero, gallery and footer always render.

use chrono::{DateTime, Datelike};

use super::html::{format_decimal, html_escape, safe_href};
use crate::models::{
    ContactsContent, DirectionsContent, HeroContent, HoursContent, NewsContent, PricingContent,
    SchoolContent,
};
use crate::weather::Weather;

/// Placeholder for an unknown weather value.
pub const UNKNOWN: &str = "?";

const FLICKR_URL: &str = "https://www.flickr.com/photos/130261563@N08/sets";

/// Section anchors in page order.
const NAV_LINKS: [(&str, &str); 7] = [
    ("#news", "Novinky"),
    ("#hours", "Provozní doba"),
    ("#school", "Lyžařská škola"),
    ("#pricing", "Ceník"),
    ("#directions", "Jak k nám"),
    ("#contacts", "Kontakty"),
    ("#gallery", "Galerie"),
];

const SOCIAL_LINKS: [(&str, &str); 3] = [
    ("Facebook", "https://www.facebook.com/SkiDracek/timeline"),
    ("Twitter", "https://twitter.com/skidracek"),
    ("Flickr", FLICKR_URL),
];

const CREDITS: [(&str, &str); 2] = [
    ("Marek Brumlich", "http://marekbrumlich.cz"),
    ("Jan Halama", "http://janhalama.cz"),
];

pub fn top_nav() -> String {
    let links: String = NAV_LINKS
        .iter()
        .map(|(href, label)| format!(r#"<a href="{}">{}</a>"#, href, html_escape(label)))
        .collect();
    format!(
        r##"<header id="top"><a class="brand" href="#hero">SkiDráček</a><nav>{}</nav></header>"##,
        links
    )
}

pub fn hero(hero: Option<&HeroContent>, weather: &Weather) -> String {
    let mut out = String::new();

    if let Some(banner) = hero.map(|h| &h.notice_banner) {
        if banner.is_visible && !banner.text.is_empty() {
            out.push_str(&format!(
                r#"<div class="notice-banner" role="status">{}</div>"#,
                html_escape(&banner.text)
            ));
        }
    }

    out.push_str(r#"<section id="hero"><h1>SkiDráček</h1>"#);

    if let Some(hero) = hero {
        out.push_str(&format!(r#"<p class="tagline">{}</p>"#, html_escape(&hero.tagline)));
    }

    let temperature = weather
        .temperature_c
        .map(|t| format!("{} °C", format_decimal(t)))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let snow = weather
        .snow_depth_cm
        .map(|s| format!("{} cm", format_decimal(s)))
        .unwrap_or_else(|| UNKNOWN.to_string());

    out.push_str(&format!(
        r#"<dl class="weather"><dt>Teplota</dt><dd class="temperature">{}</dd><dt>Sníh</dt><dd class="snow">{}</dd></dl>"#,
        html_escape(&temperature),
        html_escape(&snow)
    ));

    if let Some(updated) = &weather.last_updated_iso {
        out.push_str(&format!(
            r#"<p class="weather-updated">Aktualizováno: {}</p>"#,
            html_escape(updated)
        ));
    }

    if let Some(href) = hero.and_then(|h| safe_href(&h.webcam_url)) {
        out.push_str(&format!(
            r#"<p><a class="webcam" href="{}" target="_blank" rel="noopener noreferrer">Webkamera</a></p>"#,
            href
        ));
    }

    out.push_str("</section>");
    out
}

pub fn news(news: Option<&NewsContent>) -> String {
    let Some(news) = news else {
        return String::new();
    };

    let mut out = String::from(r#"<section id="news"><h2>Aktuální akce a novinky</h2>"#);
    let visible: Vec<_> = news.items.iter().filter(|i| i.is_visible).collect();

    if visible.is_empty() {
        out.push_str("<p>Momentálně nejsou naplánovány žádné akce.</p>");
    }

    for item in visible {
        out.push_str(&format!(
            r#"<article id="news-{}"><h3>{}</h3><p class="date">{}</p><p>{}</p></article>"#,
            html_escape(&item.id),
            html_escape(&item.title),
            html_escape(&czech_date(&item.date_iso)),
            html_escape(&item.body)
        ));
    }

    out.push_str("</section>");
    out
}

pub fn hours(hours: Option<&HoursContent>) -> String {
    match hours {
        Some(hours) => format!(
            r#"<section id="hours"><h2>Provozní doba</h2><p>{}</p></section>"#,
            html_escape(&hours.text)
        ),
        None => String::new(),
    }
}

pub fn school(school: Option<&SchoolContent>) -> String {
    let Some(school) = school else {
        return String::new();
    };

    format!(
        concat!(
            r#"<section id="school"><h2>Lyžařská škola</h2><p>{}</p>"#,
            r#"<div><h3>Ceny</h3><p>Individuální: {}</p><p>Skupinová: {}</p></div>"#,
            r#"<div><h3>Instruktor</h3><p>{}</p><p>{}</p><p>{}</p></div></section>"#
        ),
        html_escape(&school.description),
        html_escape(&school.pricing.individual),
        html_escape(&school.pricing.group),
        html_escape(&school.instructor.name),
        html_escape(&school.instructor.phone),
        mailto(&school.instructor.email)
    )
}

pub fn pricing(pricing: Option<&PricingContent>) -> String {
    let Some(pricing) = pricing else {
        return String::new();
    };

    let mut out = String::from(r#"<section id="pricing"><h2>Ceník</h2>"#);
    if !pricing.rows.is_empty() {
        out.push_str("<table><thead><tr><th>Doba</th><th>Dospělí</th><th>Děti</th></tr></thead><tbody>");
        for row in &pricing.rows {
            out.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&row.duration),
                html_escape(&row.adults),
                html_escape(&row.kids)
            ));
        }
        out.push_str("</tbody></table>");
    }
    out.push_str("</section>");
    out
}

pub fn directions(directions: Option<&DirectionsContent>) -> String {
    let Some(directions) = directions else {
        return String::new();
    };

    let mut out = format!(
        r#"<section id="directions"><h2>Jak k nám</h2><p>{}</p><p>GPS: {}</p>"#,
        html_escape(&directions.car),
        html_escape(&directions.gps)
    );
    if let Some(href) = safe_href(&directions.mapy_cz_url) {
        out.push_str(&external_link(&href, "Mapa"));
    }
    if !directions.buses.is_empty() {
        out.push_str("<ul>");
        for bus in &directions.buses {
            match safe_href(&bus.url) {
                Some(href) => out.push_str(&format!(
                    "<li>{}</li>",
                    external_link(&href, &bus.label)
                )),
                None => out.push_str(&format!("<li>{}</li>", html_escape(&bus.label))),
            }
        }
        out.push_str("</ul>");
    }
    out.push_str("</section>");
    out
}

pub fn contacts(contacts: Option<&ContactsContent>) -> String {
    let Some(contacts) = contacts else {
        return String::new();
    };

    let mut out = format!(
        concat!(
            r#"<section id="contacts"><h2>Kontakty</h2>"#,
            r#"<div><h3>Správce</h3><p>{}</p><p>{}</p><p>{}</p></div>"#,
            r#"<div><h3>Provozovatel</h3><p>{}</p><p>{}</p><p>IČO: {}</p>"#
        ),
        html_escape(&contacts.manager.name),
        html_escape(&contacts.manager.phone),
        mailto(&contacts.manager.email),
        html_escape(&contacts.operator.name),
        html_escape(&contacts.operator.address),
        html_escape(&contacts.operator.ico)
    );
    if let Some(href) = safe_href(&contacts.operator.web) {
        out.push_str(&external_link(&href, &contacts.operator.web));
    }
    out.push_str("</div>");
    if let Some(href) = safe_href(&contacts.wufoo_url) {
        out.push_str(&external_link(&href, "Napište nám (formulář)"));
    }
    out.push_str("</section>");
    out
}

pub fn gallery() -> String {
    format!(
        concat!(
            r#"<section id="gallery"><h2>Dráček v obrazech</h2>"#,
            "<p>Aktuální fotky najdete na našem Flickr profilu.</p>",
            "<p>{}</p></section>"
        ),
        external_link(FLICKR_URL, "Fotky na Flickru")
    )
}

pub fn footer(year: i32) -> String {
    let social: String = SOCIAL_LINKS
        .iter()
        .map(|(label, href)| external_link(href, label))
        .collect::<Vec<_>>()
        .join(" ");
    let credits: String = CREDITS
        .iter()
        .map(|(name, href)| external_link(href, name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"<footer id="footer"><p>© {} SkiDráček</p><p class="social">{}</p><p class="credits">Powered by {}</p></footer>"#,
        year, social, credits
    )
}

fn mailto(email: &str) -> String {
    let email = html_escape(email);
    format!(r#"<a href="mailto:{}">{}</a>"#, email, email)
}

/// `href` must already be escaped.
fn external_link(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        href,
        html_escape(label)
    )
}

/// `2025-01-15T08:30:00Z` as `15. 1. 2025`; unparseable input is shown as is.
fn czech_date(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => format!("{}. {}. {}", dt.day(), dt.month(), dt.year()),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewsItem, NoticeBanner};

    fn hero_content() -> HeroContent {
        HeroContent {
            tagline: "Místní vlek <a školička>".to_string(),
            webcam_url: "https://cam.skidracek.cz/live".to_string(),
            notice_banner: NoticeBanner {
                is_visible: true,
                text: "Dnes zavřeno".to_string(),
            },
        }
    }

    #[test]
    fn test_hero_with_unknown_weather_shows_placeholders() {
        let html = hero(Some(&hero_content()), &Weather::unknown());
        assert!(html.contains(r#"<dd class="temperature">?</dd>"#));
        assert!(html.contains(r#"<dd class="snow">?</dd>"#));
        assert!(html.contains("Místní vlek &lt;a školička&gt;"));
        assert!(html.contains("Dnes zavřeno"));
        assert!(html.contains("https://cam.skidracek.cz/live"));
    }

    #[test]
    fn test_hero_with_weather() {
        let weather = Weather {
            temperature_c: Some(-2.5),
            snow_depth_cm: Some(35.0),
            last_updated_iso: Some("2025-01-10T08:00".to_string()),
        };
        let html = hero(None, &weather);
        assert!(html.contains("-2,5 °C"));
        assert!(html.contains("35 cm"));
        assert!(html.contains("<h1>SkiDráček</h1>"));
        assert!(!html.contains("notice-banner"));
    }

    #[test]
    fn test_hidden_banner_is_not_rendered() {
        let mut content = hero_content();
        content.notice_banner.is_visible = false;
        assert!(!hero(Some(&content), &Weather::unknown()).contains("notice-banner"));
    }

    #[test]
    fn test_absent_sections_render_nothing() {
        assert!(news(None).is_empty());
        assert!(hours(None).is_empty());
        assert!(school(None).is_empty());
        assert!(pricing(None).is_empty());
        assert!(directions(None).is_empty());
        assert!(contacts(None).is_empty());
    }

    #[test]
    fn test_news_hides_invisible_items() {
        let content = NewsContent {
            items: vec![
                NewsItem {
                    id: "a".to_string(),
                    title: "Zahájení sezóny".to_string(),
                    body: "Jedeme!".to_string(),
                    date_iso: "2025-12-20T09:00:00Z".to_string(),
                    is_visible: true,
                },
                NewsItem {
                    id: "b".to_string(),
                    title: "Tajné".to_string(),
                    body: "Koncept".to_string(),
                    date_iso: "2025-12-21T09:00:00Z".to_string(),
                    is_visible: false,
                },
            ],
        };

        let html = news(Some(&content));
        assert!(html.contains("Zahájení sezóny"));
        assert!(html.contains("20. 12. 2025"));
        assert!(!html.contains("Tajné"));
    }

    #[test]
    fn test_news_without_visible_items() {
        let html = news(Some(&NewsContent { items: vec![] }));
        assert!(html.contains("Momentálně nejsou naplánovány žádné akce."));
    }

    #[test]
    fn test_nav_links_every_section_anchor() {
        let html = top_nav();
        for id in ["news", "hours", "school", "pricing", "directions", "contacts", "gallery"] {
            assert!(html.contains(&format!(r##"href="#{}""##, id)), "{}", id);
        }
        assert!(html.contains(r##"href="#hero""##));
    }

    #[test]
    fn test_gallery_links_to_flickr() {
        let html = gallery();
        assert!(html.contains(r#"<section id="gallery">"#));
        assert!(html.contains(r#"href="https://www.flickr.com/photos/130261563@N08/sets""#));
    }

    #[test]
    fn test_footer_social_links_and_credits() {
        let html = footer(2026);
        assert!(html.contains("© 2026 SkiDráček"));
        assert!(html.contains("https://www.facebook.com/SkiDracek/timeline"));
        assert!(html.contains("https://twitter.com/skidracek"));
        assert!(html.contains("https://www.flickr.com/photos/130261563@N08/sets"));
        assert!(html.contains("Marek Brumlich"));
        assert!(html.contains("Jan Halama"));
    }

    #[test]
    fn test_hours_text_is_escaped() {
        let html = hours(Some(&HoursContent {
            text: "Po-Pá 9-17 <b>".to_string(),
        }));
        assert!(html.contains("Po-Pá 9-17 &lt;b&gt;"));
    }
}
