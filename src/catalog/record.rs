use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A catalog row that exposes named text fields for searching.
///
/// Unknown field names return `None` and therefore never match a query.
pub trait Record: Clone {
    fn field(&self, name: &str) -> Option<&str>;
}

/// Accepts strings, numbers, booleans and `null`, so a sloppy dataset never
/// surfaces as a parse failure or as the literal text "undefined".
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_links<'de, D>(deserializer: D) -> Result<Vec<Link>, D::Error>
where
    D: Deserializer<'de>,
{
    let links = Option::<Vec<Link>>::deserialize(deserializer)?;
    Ok(links
        .unwrap_or_default()
        .into_iter()
        .filter(|l| !l.url.trim().is_empty())
        .collect())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawLink {
            Url(String),
            Labeled {
                #[serde(default, alias = "name", alias = "title", alias = "text")]
                label: Option<String>,
                #[serde(alias = "href")]
                url: String,
            },
        }

        Ok(match RawLink::deserialize(deserializer)? {
            RawLink::Url(url) => Link {
                label: url.clone(),
                url,
            },
            RawLink::Labeled { label, url } => {
                let label = label
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| url.clone());
                Link { label, url }
            }
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct JuryMember {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub photo: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: String,
    #[serde(default, deserialize_with = "lenient_links")]
    pub links: Vec<Link>,
}

impl Record for JuryMember {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "role" => Some(&self.role),
            "photo" => Some(&self.photo),
            "bio" => Some(&self.bio),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompetitionEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub song: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub performer: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sponsor: String,
}

impl CompetitionEntry {
    pub const FOLK_CATEGORY: &'static str = "Folclórica";

    pub fn is_folk(&self) -> bool {
        self.category.trim() == Self::FOLK_CATEGORY
    }
}

impl Record for CompetitionEntry {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "song" => Some(&self.song),
            "performer" => Some(&self.performer),
            "country" => Some(&self.country),
            "category" => Some(&self.category),
            "sponsor" => Some(&self.sponsor),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub excerpt: String,
}

impl Record for NewsItem {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "url" => Some(&self.url),
            "date" => Some(&self.date),
            "excerpt" => Some(&self.excerpt),
            _ => None,
        }
    }
}

/// One row of the schedule feed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub artist: String,
    pub photo: String,
}

impl Record for ScheduleEntry {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "day" => Some(&self.day),
            "artist" => Some(&self.artist),
            "photo" => Some(&self.photo),
            _ => None,
        }
    }
}

/// A day bucket of the schedule. Entries keep their position in the flat
/// displayed sequence so cards can still expose it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleDay<'a> {
    pub label: &'a str,
    pub entries: Vec<(usize, &'a ScheduleEntry)>,
}

/// Groups entries by `day` in first-seen order. Labels are never sorted.
pub fn group_by_day(entries: &[ScheduleEntry]) -> Vec<ScheduleDay<'_>> {
    let mut days: Vec<ScheduleDay<'_>> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match days.iter_mut().find(|d| d.label == entry.day) {
            Some(day) => day.entries.push((index, entry)),
            None => days.push(ScheduleDay {
                label: &entry.day,
                entries: vec![(index, entry)],
            }),
        }
    }
    days
}
