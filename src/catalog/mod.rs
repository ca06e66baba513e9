pub mod filter;
pub mod record;
pub mod store;

pub use record::{
    group_by_day, CompetitionEntry, JuryMember, Link, NewsItem, Record, ScheduleDay,
    ScheduleEntry,
};
pub use store::CatalogStore;

use serde::Serialize;

/// The four catalogs of the festival page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    Schedule,
    News,
    Jury,
    Competition,
}

impl Catalog {
    pub const ALL: [Catalog; 4] = [
        Catalog::Schedule,
        Catalog::News,
        Catalog::Jury,
        Catalog::Competition,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "schedule" | "parrilla" => Some(Self::Schedule),
            "news" | "noticias" => Some(Self::News),
            "jury" | "jurado" => Some(Self::Jury),
            "competition" | "competencia" => Some(Self::Competition),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::News => "news",
            Self::Jury => "jury",
            Self::Competition => "competition",
        }
    }

    pub fn container_id(self) -> &'static str {
        match self {
            Self::Schedule => "parrillaContainer",
            Self::News => "newsList",
            Self::Jury => "grid",
            Self::Competition => "compGrid",
        }
    }

    pub fn from_container_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.container_id() == id)
    }

    pub fn search_input_id(self) -> &'static str {
        match self {
            Self::Schedule => "parrillaSearch",
            Self::News => "newsSearch",
            Self::Jury => "juradoSearch",
            Self::Competition => "compSearch",
        }
    }

    pub fn from_search_input_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.search_input_id() == id)
    }

    pub fn search_fields(self) -> &'static [&'static str] {
        match self {
            Self::Schedule => &["day", "artist"],
            Self::News => &["title"],
            Self::Jury => &["name", "role"],
            Self::Competition => &["song", "performer", "country", "category"],
        }
    }

    /// Whether cards of this catalog open the detail overlay.
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Jury | Self::Competition)
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
