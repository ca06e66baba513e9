use chrono::Datelike;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use serde::Serialize;

use crate::catalog::filter;
use crate::catalog::{
    Catalog, CatalogStore, CompetitionEntry, JuryMember, NewsItem, Record, ScheduleEntry,
};
use crate::overlay::{Detail, DetailOverlay, OverlayView};
use crate::page::events::{CardRef, Dispatch, Event, EventKind, EventTable, Key, Target};
use crate::page::{Page, PageError, Scroll, YEAR_ID};
use crate::render::{self, Card};
use crate::source::{self, FetchError, Fetcher, SourceRef};

/// Resolved source per catalog. `None` leaves that catalog unloaded.
#[derive(Clone, Debug, Default)]
pub struct Sources {
    pub schedule: Option<SourceRef>,
    pub news: Option<SourceRef>,
    pub jury: Option<SourceRef>,
    pub competition: Option<SourceRef>,
}

impl Sources {
    pub fn get(&self, catalog: Catalog) -> Option<&SourceRef> {
        match catalog {
            Catalog::Schedule => self.schedule.as_ref(),
            Catalog::News => self.news.as_ref(),
            Catalog::Jury => self.jury.as_ref(),
            Catalog::Competition => self.competition.as_ref(),
        }
    }
}

enum Loaded {
    Schedule(Result<Vec<ScheduleEntry>, FetchError>),
    News(Result<Vec<NewsItem>, FetchError>),
    Jury(Result<Vec<JuryMember>, FetchError>),
    Competition(Result<Vec<CompetitionEntry>, FetchError>),
}

/// Outcome of one catalog load, in the order loads resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub records: Option<usize>,
    pub error: Option<String>,
}

impl LoadReport {
    fn skipped(catalog: Catalog) -> Self {
        Self {
            catalog,
            records: None,
            error: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.records.is_none() && self.error.is_none()
    }
}

/// One page session: the page, the four catalog stores and the overlay.
pub struct Site {
    page: Page,
    overlay: DetailOverlay,
    schedule: CatalogStore<ScheduleEntry>,
    news: CatalogStore<NewsItem>,
    jury: CatalogStore<JuryMember>,
    competition: CatalogStore<CompetitionEntry>,
    sources: Sources,
    events: EventTable<Site>,
}

impl Site {
    pub fn new(page: Page, sources: Sources) -> Self {
        let events = EventTable::new()
            .on(EventKind::Input, Site::on_input)
            .on(EventKind::Click, Site::on_click)
            .on(EventKind::KeyDown, Site::on_key_down);
        Self {
            page,
            overlay: DetailOverlay::new(),
            schedule: CatalogStore::new(),
            news: CatalogStore::new(),
            jury: CatalogStore::new(),
            competition: CatalogStore::new(),
            sources,
            events,
        }
    }

    /// Page-ready work that needs no data: the footer year.
    pub fn initialize(&mut self) {
        let year = chrono::Local::now().year().to_string();
        if let Err(e) = self.page.set_text(YEAR_ID, &year) {
            log::debug!("skipping footer year: {e}");
        }
    }

    /// Starts every configured load at once and applies each result as it
    /// arrives. A failed catalog degrades to its placeholder; siblings are
    /// unaffected.
    pub async fn load_all<F: Fetcher>(&mut self, fetcher: &F) -> Vec<LoadReport> {
        let mut pending: FuturesUnordered<LocalBoxFuture<'_, Loaded>> = FuturesUnordered::new();
        let mut reports = Vec::new();
        for catalog in Catalog::ALL {
            let Some(src) = self.sources.get(catalog).cloned() else {
                log::debug!("{catalog}: no source configured");
                reports.push(LoadReport::skipped(catalog));
                continue;
            };
            if let Err(e) = self.page.container(catalog.container_id()) {
                log::debug!("{catalog}: {e}, skipping");
                reports.push(LoadReport::skipped(catalog));
                continue;
            }
            pending.push(load_one(fetcher, catalog, src));
        }

        while let Some(loaded) = pending.next().await {
            reports.push(self.apply(loaded));
        }
        reports
    }

    /// Loads a single catalog. Later arrivals overwrite earlier ones.
    pub async fn load<F: Fetcher>(&mut self, fetcher: &F, catalog: Catalog) -> Option<LoadReport> {
        let src = self.sources.get(catalog).cloned()?;
        self.page.container(catalog.container_id()).ok()?;
        let loaded = load_one(fetcher, catalog, src).await;
        Some(self.apply(loaded))
    }

    fn apply(&mut self, loaded: Loaded) -> LoadReport {
        let page = &mut self.page;
        match loaded {
            Loaded::Schedule(res) => apply_load(page, &mut self.schedule, Catalog::Schedule, res),
            Loaded::News(res) => apply_load(page, &mut self.news, Catalog::News, res),
            Loaded::Jury(res) => apply_load(page, &mut self.jury, Catalog::Jury, res),
            Loaded::Competition(res) => {
                apply_load(page, &mut self.competition, Catalog::Competition, res)
            }
        }
    }

    /// Routes an event through the handler table.
    pub fn dispatch(&mut self, event: Event) -> Dispatch {
        let handler = self.events.handler(event.kind());
        match handler {
            Some(handler) => handler(self, &event),
            None => Dispatch::IGNORED,
        }
    }

    /// Filters a catalog by `query` and re-renders it.
    pub fn search(&mut self, catalog: Catalog, query: &str) -> Result<usize, PageError> {
        let page = &mut self.page;
        match catalog {
            Catalog::Schedule => refilter(page, &mut self.schedule, catalog, query),
            Catalog::News => refilter(page, &mut self.news, catalog, query),
            Catalog::Jury => refilter(page, &mut self.jury, catalog, query),
            Catalog::Competition => refilter(page, &mut self.competition, catalog, query),
        }
    }

    /// Card reference for the `index`-th card as currently rendered.
    pub fn card_ref(&self, catalog: Catalog, index: usize) -> CardRef {
        CardRef {
            container: catalog.container_id().to_string(),
            index,
            generation: self.generation(catalog),
        }
    }

    pub fn generation(&self, catalog: Catalog) -> u64 {
        match catalog {
            Catalog::Schedule => self.schedule.generation(),
            Catalog::News => self.news.generation(),
            Catalog::Jury => self.jury.generation(),
            Catalog::Competition => self.competition.generation(),
        }
    }

    pub fn displayed_len(&self, catalog: Catalog) -> usize {
        match catalog {
            Catalog::Schedule => self.schedule.displayed().len(),
            Catalog::News => self.news.displayed().len(),
            Catalog::Jury => self.jury.displayed().len(),
            Catalog::Competition => self.competition.displayed().len(),
        }
    }

    fn resolve_detail(&self, card: &CardRef) -> Option<Detail> {
        let catalog = Catalog::from_container_id(&card.container)?;
        if !catalog.is_interactive() {
            return None;
        }
        match catalog {
            Catalog::Jury => self.jury.resolve_at(card.generation, card.index).map(Detail::from),
            Catalog::Competition => self
                .competition
                .resolve_at(card.generation, card.index)
                .map(Detail::from),
            _ => None,
        }
    }

    fn activate(&mut self, card: &CardRef) -> bool {
        match self.resolve_detail(card) {
            Some(detail) => {
                self.overlay.open(detail, &mut self.page.body);
                true
            }
            None => {
                log::debug!(
                    "card {}#{} (generation {}) no longer resolves",
                    card.container,
                    card.index,
                    card.generation
                );
                false
            }
        }
    }

    fn on_input(site: &mut Site, event: &Event) -> Dispatch {
        let Event::Input { id, value } = event else {
            return Dispatch::IGNORED;
        };
        let Some(catalog) = Catalog::from_search_input_id(id) else {
            return Dispatch::IGNORED;
        };
        if let Err(e) = site.page.set_input(id, value) {
            log::debug!("{catalog}: {e}");
            return Dispatch::IGNORED;
        }
        match site.search(catalog, value) {
            Ok(_) => Dispatch::HANDLED,
            Err(e) => {
                log::debug!("{catalog}: {e}");
                Dispatch::IGNORED
            }
        }
    }

    fn on_click(site: &mut Site, event: &Event) -> Dispatch {
        let Event::Click { target } = event else {
            return Dispatch::IGNORED;
        };
        let handled = match target {
            Target::Card(card) => site.activate(card),
            Target::Element(id) => site.overlay.handle_click(id, &mut site.page.body),
        };
        Dispatch {
            handled,
            default_prevented: false,
        }
    }

    fn on_key_down(site: &mut Site, event: &Event) -> Dispatch {
        let Event::KeyDown { key, target } = event else {
            return Dispatch::IGNORED;
        };
        if *key == Key::Escape {
            let handled = site.overlay.handle_key(key, &mut site.page.body);
            return Dispatch {
                handled,
                default_prevented: false,
            };
        }
        match target {
            Some(Target::Card(card)) if key.is_activation() => {
                let interactive = Catalog::from_container_id(&card.container)
                    .map(Catalog::is_interactive)
                    .unwrap_or(false);
                if !interactive {
                    return Dispatch::IGNORED;
                }
                Dispatch {
                    handled: site.activate(card),
                    default_prevented: true,
                }
            }
            _ => Dispatch::IGNORED,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    pub fn jury(&self) -> &CatalogStore<JuryMember> {
        &self.jury
    }

    pub fn competition(&self) -> &CatalogStore<CompetitionEntry> {
        &self.competition
    }

    pub fn news(&self) -> &CatalogStore<NewsItem> {
        &self.news
    }

    pub fn schedule(&self) -> &CatalogStore<ScheduleEntry> {
        &self.schedule
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            containers: self
                .page
                .containers()
                .map(|(id, c)| (id.to_string(), c.html().to_string()))
                .collect(),
            inputs: self
                .page
                .inputs()
                .map(|(id, v)| (id.to_string(), v.to_string()))
                .collect(),
            year: self.page.text(YEAR_ID).map(|s| s.to_string()),
            scroll_locked: self.page.body.scroll == Scroll::Hidden,
            overlay: OverlaySnapshot {
                visible: self.overlay.is_visible(),
                view: self.overlay.view().clone(),
            },
        }
    }
}

/// Serializable state of the rendered page.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub containers: std::collections::BTreeMap<String, String>,
    pub inputs: std::collections::BTreeMap<String, String>,
    pub year: Option<String>,
    pub scroll_locked: bool,
    pub overlay: OverlaySnapshot,
}

#[derive(Clone, Debug, Serialize)]
pub struct OverlaySnapshot {
    pub visible: bool,
    #[serde(flatten)]
    pub view: OverlayView,
}

fn load_one<'a, F: Fetcher>(
    fetcher: &'a F,
    catalog: Catalog,
    src: SourceRef,
) -> LocalBoxFuture<'a, Loaded> {
    async move {
        match catalog {
            Catalog::Schedule => Loaded::Schedule(source::load_schedule(fetcher, &src).await),
            Catalog::News => Loaded::News(source::load_json(fetcher, &src).await),
            Catalog::Jury => Loaded::Jury(source::load_json(fetcher, &src).await),
            Catalog::Competition => Loaded::Competition(source::load_json(fetcher, &src).await),
        }
    }
    .boxed_local()
}

fn apply_load<R: Card + Record>(
    page: &mut Page,
    store: &mut CatalogStore<R>,
    catalog: Catalog,
    res: Result<Vec<R>, FetchError>,
) -> LoadReport {
    let container = match page.container_mut(catalog.container_id()) {
        Ok(c) => c,
        Err(e) => {
            log::debug!("{catalog}: {e}, dropping load result");
            return LoadReport {
                catalog,
                records: None,
                error: Some(e.to_string()),
            };
        }
    };
    match res {
        Ok(records) => {
            let count = records.len();
            let generation = store.set_full(records);
            render::render(container, store.displayed(), generation);
            log::debug!("{catalog}: loaded {count} records");
            LoadReport {
                catalog,
                records: Some(count),
                error: None,
            }
        }
        Err(e) => {
            log::warn!("{catalog}: {e}");
            store.mark_failed();
            render::render_failure::<R>(container);
            LoadReport {
                catalog,
                records: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn refilter<R: Card + Record>(
    page: &mut Page,
    store: &mut CatalogStore<R>,
    catalog: Catalog,
    query: &str,
) -> Result<usize, PageError> {
    let container = page.container_mut(catalog.container_id())?;
    // Whatever the load left in the container stays until data arrives.
    if !store.is_loaded() {
        log::debug!("{catalog}: not loaded, keeping current markup");
        return Ok(0);
    }
    let filtered = filter::apply(query, store.full(), catalog.search_fields());
    let count = filtered.len();
    let generation = store.set_displayed(filtered);
    render::render(container, store.displayed(), generation);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::StaticFetcher;

    fn sources() -> Sources {
        Sources {
            schedule: Some(SourceRef::local("parrilla.csv")),
            news: Some(SourceRef::local("noticias.json")),
            jury: Some(SourceRef::local("jurado.json")),
            competition: Some(SourceRef::local("competencia.json")),
        }
    }

    #[tokio::test]
    async fn one_failing_catalog_does_not_affect_siblings() {
        let fetcher = StaticFetcher::default()
            .with("jurado.json", r#"[{"name":"Ana"}]"#)
            .failing("competencia.json", 503)
            .with("noticias.json", r#"{"items":[]}"#)
            .with("parrilla.csv", "h\nViernes,Solista,");
        let mut site = Site::new(Page::festival(), sources());
        let reports = site.load_all(&fetcher).await;

        assert_eq!(reports.len(), 4);
        let failed: Vec<_> = reports.iter().filter(|r| r.error.is_some()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].catalog, Catalog::Competition);

        let page = site.page();
        assert!(page.container("compGrid").unwrap().html().contains(render::LOAD_FAILED));
        assert!(page.container("grid").unwrap().html().contains("Ana"));
        assert!(page.container("parrillaContainer").unwrap().html().contains("Solista"));
    }

    #[tokio::test]
    async fn missing_container_skips_the_load() {
        let fetcher = StaticFetcher::default().with("jurado.json", "[]");
        let page = Page::new().with_container("grid");
        let mut site = Site::new(page, sources());
        let reports = site.load_all(&fetcher).await;

        assert_eq!(reports.len(), 4);
        assert_eq!(reports.iter().filter(|r| r.is_skipped()).count(), 3);
        assert_eq!(fetcher.requests.borrow().as_slice(), ["jurado.json"]);
    }

    #[tokio::test]
    async fn stale_card_does_not_open_a_different_record() {
        let fetcher = StaticFetcher::default().with(
            "jurado.json",
            r#"[{"name":"Ana","role":"Host"},{"name":"Leo","role":"Judge"}]"#,
        );
        let mut site = Site::new(Page::festival(), sources());
        site.load(&fetcher, Catalog::Jury).await;

        let stale = site.card_ref(Catalog::Jury, 0);
        site.search(Catalog::Jury, "judge").unwrap();
        let d = site.dispatch(Event::Click {
            target: Target::Card(stale),
        });
        assert!(!d.handled);
        assert!(!site.overlay().is_visible());
    }

    #[tokio::test]
    async fn activation_keys_open_and_prevent_default() {
        let fetcher = StaticFetcher::default().with("jurado.json", r#"[{"name":"Ana"}]"#);
        let mut site = Site::new(Page::festival(), sources());
        site.load(&fetcher, Catalog::Jury).await;

        let card = site.card_ref(Catalog::Jury, 0);
        let d = site.dispatch(Event::KeyDown {
            key: Key::Space,
            target: Some(Target::Card(card)),
        });
        assert!(d.handled && d.default_prevented);
        assert_eq!(site.overlay().view().title, "Ana");
        assert_eq!(site.page().body.scroll, Scroll::Hidden);

        let d = site.dispatch(Event::KeyDown {
            key: Key::Escape,
            target: None,
        });
        assert!(d.handled);
        assert_eq!(site.page().body.scroll, Scroll::Auto);
    }

    #[test]
    fn initialize_writes_year_when_present() {
        let mut site = Site::new(Page::festival(), Sources::default());
        site.initialize();
        let year = site.page().text(YEAR_ID).unwrap();
        assert_eq!(year.len(), 4);

        let mut bare = Site::new(Page::new(), Sources::default());
        bare.initialize();
        assert_eq!(bare.page().text(YEAR_ID), None);
    }
}
