use std::sync::OnceLock;

use chrono_tz::Tz;
use rand::Rng;
use regex::Regex;

use crate::lazy;
use crate::models::guestbook::GuestbookEntry;
use crate::mood;
use crate::notify::{toast_html, Notification};

pub const EMPTY_GUESTBOOK_HTML: &str = r#"<div class="muted gb-empty">No guestbook entries yet — be the first to sign!</div>"#;

/// Everything a page template can pull in. Built by the page-load command.
pub struct PageContext {
    pub site_name: String,
    pub visitor_count: String,
    pub nav_html: String,
    pub calendar_html: String,
    pub guestbook_html: String,
    pub notification: Option<Notification>,
    pub current_year: i32,
}

/// Fill a page template's {{placeholder}} tags (lowercase + underscores),
/// then run the document-wide passes (mood text, lazy images) over the result.
pub fn render_page<R: Rng + ?Sized>(
    template: &str,
    ctx: &PageContext,
    moods: &[String],
    rng: &mut R,
) -> String {
    let toast = ctx.notification.as_ref().map(toast_html).unwrap_or_default();
    let site_name = html_escape(&ctx.site_name);
    let year = ctx.current_year.to_string();

    // One pass over the template: inserted values are never rescanned, so
    // `{{...}}` inside guestbook text stays literal text. Unknown tags drop out.
    let html = placeholder_re()
        .replace_all(template, |caps: &regex::Captures| -> String {
            match &caps[1] {
                // ── Global placeholders ──
                "site_name" => site_name.clone(),
                "current_year" => year.clone(),
                "visitor_count" => ctx.visitor_count.clone(),
                "nav" => ctx.nav_html.clone(),
                // ── Widgets ──
                "mini_calendar" => ctx.calendar_html.clone(),
                "guestbook_entries" => ctx.guestbook_html.clone(),
                "notification" => toast.clone(),
                _ => String::new(),
            }
        })
        .into_owned();

    let html = mood::randomize(&html, moods, rng);
    lazy::defer_images(&html)
}

/// Guestbook container contents: one block per entry, newest first, or the
/// empty-state message.
pub fn render_entries(entries: &[GuestbookEntry], tz: Tz) -> String {
    if entries.is_empty() {
        return EMPTY_GUESTBOOK_HTML.to_string();
    }

    let mut html = String::new();
    for entry in entries {
        html.push_str(&format!(
            r#"<div class="gb-entry" data-id="{id}">
    <div class="gb-entry-head">
        <strong class="gb-name">{name}</strong>
        <small class="gb-date">{date}</small>
    </div>
    <p class="gb-message">{message}</p>
</div>
"#,
            id = html_escape(&entry.id),
            name = html_escape(&entry.name),
            date = html_escape(&format_entry_date(entry, tz)),
            message = html_escape(&entry.message),
        ));
    }
    html
}

/// `MM/DD/YYYY HH:MM` in the site's timezone. Dates that don't parse are
/// shown as stored.
pub fn format_entry_date(entry: &GuestbookEntry, tz: Tz) -> String {
    match entry.created_at() {
        Some(utc) => utc.with_timezone(&tz).format("%m/%d/%Y %H:%M").to_string(),
        None => entry.date.clone(),
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn placeholder_re() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{([a-z_]+)\}\}").expect("placeholder regex"))
}
