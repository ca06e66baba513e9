use itertools::Itertools;
use serde::Serialize;

use crate::catalog::{CompetitionEntry, JuryMember, Link};
use crate::page::events::Key;
use crate::page::{Body, Scroll, CLOSE_BUTTON_ID, CLOSE_CONTROL_ID, MODAL_ID};
use crate::render::escape_html;

pub const LINK_SEPARATOR: &str = " · ";

/// Extended fields shown by the overlay for one record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub image: String,
    pub title: String,
    pub role: String,
    pub body: String,
    pub links: Vec<Link>,
}

impl From<&JuryMember> for Detail {
    fn from(m: &JuryMember) -> Self {
        Self {
            image: m.photo.clone(),
            title: m.name.clone(),
            role: m.role.clone(),
            body: m.bio.clone(),
            links: m.links.clone(),
        }
    }
}

impl From<&CompetitionEntry> for Detail {
    fn from(c: &CompetitionEntry) -> Self {
        let role = [c.performer.as_str(), c.country.as_str()]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .join(" · ");
        let body = [c.category.as_str(), c.sponsor.as_str()]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .join(" · ");
        Self {
            image: String::new(),
            title: c.song.clone(),
            role,
            body,
            links: Vec::new(),
        }
    }
}

/// What the overlay's elements currently hold. Text fields are plain text,
/// `links_html` is markup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OverlayView {
    pub image: String,
    pub title: String,
    pub role: String,
    pub bio: String,
    pub links_html: String,
}

/// The single shared detail modal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailOverlay {
    visible: bool,
    subject: Option<Detail>,
    view: OverlayView,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `detail`, replacing whatever was open, and locks page scroll.
    pub fn open(&mut self, detail: Detail, body: &mut Body) {
        self.view.image = detail.image.clone();
        self.view.title = detail.title.clone();
        self.view.role = detail.role.clone();
        self.view.bio = detail.body.clone();
        self.view.links_html = render_links(&detail.links);
        self.subject = Some(detail);
        self.visible = true;
        body.scroll = Scroll::Hidden;
    }

    /// Hides the overlay. Scroll is restored unconditionally; calling this on
    /// a closed overlay changes nothing.
    pub fn close(&mut self, body: &mut Body) {
        self.visible = false;
        self.subject = None;
        body.scroll = Scroll::Auto;
    }

    /// Click dismissal: close control, secondary button or backdrop.
    pub fn handle_click(&mut self, element_id: &str, body: &mut Body) -> bool {
        if !self.visible || !is_dismiss_target(element_id) {
            return false;
        }
        self.close(body);
        true
    }

    pub fn handle_key(&mut self, key: &Key, body: &mut Body) -> bool {
        if !self.visible || *key != Key::Escape {
            return false;
        }
        self.close(body);
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn subject(&self) -> Option<&Detail> {
        self.subject.as_ref()
    }

    pub fn view(&self) -> &OverlayView {
        &self.view
    }
}

fn is_dismiss_target(element_id: &str) -> bool {
    matches!(element_id, MODAL_ID | CLOSE_CONTROL_ID | CLOSE_BUTTON_ID)
}

fn render_links(links: &[Link]) -> String {
    links
        .iter()
        .filter(|l| !l.url.trim().is_empty())
        .map(|l| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                escape_html(&l.url),
                escape_html(&l.label)
            )
        })
        .join(LINK_SEPARATOR)
}
