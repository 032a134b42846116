//! Server-rendered HTML pages.

mod admin;
mod html;
mod sections;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::{Datelike, Utc};

use crate::models::{
    ContactsContent, ContentBlock, ContentData, DirectionsContent, HeroContent, HoursContent,
    NewsContent, PricingContent, SchoolContent,
};
use crate::AppState;

/// Shared-cache policy for the public page.
pub const PUBLIC_PAGE_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=60";

/// Blocks decoded into their records; rows that no longer decode are skipped.
#[derive(Default)]
struct PageContent {
    hero: Option<HeroContent>,
    news: Option<NewsContent>,
    hours: Option<HoursContent>,
    school: Option<SchoolContent>,
    pricing: Option<PricingContent>,
    directions: Option<DirectionsContent>,
    contacts: Option<ContactsContent>,
}

impl PageContent {
    fn from_blocks(blocks: &[ContentBlock]) -> Self {
        let mut content = PageContent::default();
        for block in blocks {
            match block.typed() {
                Some(ContentData::Hero(hero)) => content.hero = Some(hero),
                Some(ContentData::News(news)) => content.news = Some(news),
                Some(ContentData::Hours(hours)) => content.hours = Some(hours),
                Some(ContentData::School(school)) => content.school = Some(school),
                Some(ContentData::Pricing(pricing)) => content.pricing = Some(pricing),
                Some(ContentData::Directions(directions)) => content.directions = Some(directions),
                Some(ContentData::Contacts(contacts)) => content.contacts = Some(contacts),
                Some(ContentData::AdminAllowlist(_)) => {}
                None => tracing::warn!("Skipping undecodable content block {}", block.slug),
            }
        }
        content
    }
}

/// GET / - public page
pub async fn public_page(State(state): State<AppState>) -> Response {
    let (blocks, weather) = tokio::join!(
        state.store.fetch_all_content_blocks(),
        state.weather.current()
    );
    let content = PageContent::from_blocks(&blocks);

    let body = [
        sections::top_nav(),
        "<main>".to_string(),
        sections::hero(content.hero.as_ref(), &weather),
        sections::news(content.news.as_ref()),
        sections::hours(content.hours.as_ref()),
        sections::school(content.school.as_ref()),
        sections::pricing(content.pricing.as_ref()),
        sections::directions(content.directions.as_ref()),
        sections::contacts(content.contacts.as_ref()),
        sections::gallery(),
        "</main>".to_string(),
        sections::footer(Utc::now().year()),
    ]
    .concat();

    (
        [(header::CACHE_CONTROL, PUBLIC_PAGE_CACHE_CONTROL)],
        Html(html::document(
            "SkiDráček | Místní vlek a školička v Alšovicích",
            &body,
        )),
    )
        .into_response()
}

/// GET /admin - editor for admins, denial page for everyone else
pub async fn admin_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (status, body) = match state.gate.require_admin(&headers).await {
        // Strict read: never offer empty editors over existing content
        Ok(email) => match state.store.try_fetch_all_content_blocks().await {
            Ok(blocks) => {
                let allowlist = state.gate.resolve_allowed_admins().await.ok();
                (
                    StatusCode::OK,
                    admin::editor_page(
                        &email,
                        &blocks,
                        allowlist.as_ref(),
                        &state.config.sign_out_url,
                    ),
                )
            }
            Err(e) => (e.status_code(), admin::error_page(&e)),
        },
        Err(e) => {
            tracing::debug!("Admin page denied: {}", e);
            (
                e.status_code(),
                admin::denied_page(&e, &state.config.sign_in_url),
            )
        }
    };

    (status, [(header::CACHE_CONTROL, "no-store")], Html(body)).into_response()
}
