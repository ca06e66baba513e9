use std::fmt::Write;

use super::{escape_html, Card, Slot, LOAD_FAILED, NEWS_EMPTY, NEWS_FAILED, NO_RESULTS};
use super::{PLACEHOLDER_IMAGE, SCHEDULE_FAILED};
use crate::catalog::{group_by_day, CompetitionEntry, JuryMember, NewsItem, ScheduleEntry};

impl Card for JuryMember {
    const EMPTY_MESSAGE: &'static str = NO_RESULTS;
    const FAILED_MESSAGE: &'static str = LOAD_FAILED;

    fn card_markup(&self, slot: Slot) -> String {
        format!(
            r#"<div class="card" {attrs} role="button" tabindex="0"><img src="{photo}" alt="{name}" loading="lazy"><div class="card__body"><h4>{name}</h4><small>{role}</small></div></div>"#,
            attrs = slot.attrs(),
            photo = escape_html(&self.photo),
            name = escape_html(&self.name),
            role = escape_html(&self.role),
        )
    }
}

impl Card for CompetitionEntry {
    const EMPTY_MESSAGE: &'static str = NO_RESULTS;
    const FAILED_MESSAGE: &'static str = LOAD_FAILED;

    fn card_markup(&self, slot: Slot) -> String {
        let accent = if self.is_folk() {
            "card--folclorica"
        } else {
            "card--internacional"
        };
        let mut out = format!(
            r#"<article class="card {accent}" {attrs} role="button" tabindex="0"><div class="card__body"><div class="card__meta"><span class="badge">{category}</span><span class="country">{country}</span></div><h3>{song}</h3><p>{performer}</p>"#,
            attrs = slot.attrs(),
            category = escape_html(&self.category),
            country = escape_html(&self.country),
            song = escape_html(&self.song),
            performer = escape_html(&self.performer),
        );
        if !self.sponsor.trim().is_empty() {
            let _ = write!(
                out,
                r#"<small class="sponsor">{}</small>"#,
                escape_html(&self.sponsor)
            );
        }
        out.push_str("</div></article>");
        out
    }
}

impl Card for NewsItem {
    const EMPTY_MESSAGE: &'static str = NEWS_EMPTY;
    const FAILED_MESSAGE: &'static str = NEWS_FAILED;

    fn card_markup(&self, slot: Slot) -> String {
        format!(
            r#"<li class="newsitem" {attrs}><a href="{url}" target="_blank" rel="noopener noreferrer">{title}</a></li>"#,
            attrs = slot.attrs(),
            url = escape_html(&self.url),
            title = escape_html(&self.title),
        )
    }

    fn placeholder_markup(message: &str) -> String {
        format!(r#"<li class="newsitem">{}</li>"#, escape_html(message))
    }
}

impl Card for ScheduleEntry {
    const EMPTY_MESSAGE: &'static str = NO_RESULTS;
    const FAILED_MESSAGE: &'static str = SCHEDULE_FAILED;

    fn card_markup(&self, slot: Slot) -> String {
        let photo = if self.photo.is_empty() {
            PLACEHOLDER_IMAGE
        } else {
            self.photo.as_str()
        };
        format!(
            r#"<div class="artista-mini" {attrs}><img src="{photo}" alt="{artist}" loading="lazy"><span>{artist}</span></div>"#,
            attrs = slot.attrs(),
            photo = escape_html(photo),
            artist = escape_html(&self.artist),
        )
    }

    fn list_markup(records: &[Self], generation: u64) -> String {
        let mut out = String::new();
        for day in group_by_day(records) {
            let _ = write!(
                out,
                r#"<article class="dia-columna"><div class="dia-header">{}</div><div class="dia-artistas">"#,
                escape_html(day.label)
            );
            for (index, entry) in day.entries {
                out.push_str(&entry.card_markup(Slot { index, generation }));
            }
            out.push_str("</div></article>");
        }
        out
    }
}
