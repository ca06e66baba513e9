use crate::catalog::{filter, Catalog, JuryMember};
use crate::page::events::{Event, Key, Target};
use crate::page::{Page, Scroll, CLOSE_CONTROL_ID, MODAL_ID};
use crate::render::{self, NEWS_EMPTY};
use crate::site::{Site, Sources};
use crate::source::testing::StaticFetcher;
use crate::source::SourceRef;

const JURY_JSON: &str = r#"[
    {"name":"Ana","role":"Host","photo":"a.jpg"},
    {"name":"Leo","role":"Judge","photo":"l.jpg"}
]"#;

fn festival_sources() -> Sources {
    Sources {
        schedule: Some(SourceRef::local("parrilla.csv")),
        news: Some(SourceRef::local("noticias.json")),
        jury: Some(SourceRef::local("jurado.json")),
        competition: Some(SourceRef::local("competencia.json")),
    }
}

fn card_click(site: &Site, catalog: Catalog, index: usize) -> Event {
    Event::Click {
        target: Target::Card(site.card_ref(catalog, index)),
    }
}

#[tokio::test]
async fn filtered_index_opens_the_filtered_record() {
    let fetcher = StaticFetcher::default().with("jurado.json", JURY_JSON);
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::Jury).await;

    let handled = site.dispatch(Event::Input {
        id: "juradoSearch".to_string(),
        value: "judge".to_string(),
    });
    assert!(handled.handled);
    assert_eq!(site.jury().displayed().len(), 1);
    assert_eq!(site.jury().displayed()[0].name, "Leo");
    assert_eq!(site.page().input("juradoSearch"), Some("judge"));

    let d = site.dispatch(card_click(&site, Catalog::Jury, 0));
    assert!(d.handled);
    assert_eq!(site.overlay().subject().unwrap().title, "Leo");
    assert_eq!(site.overlay().view().image, "l.jpg");
}

#[tokio::test]
async fn clearing_the_search_restores_the_full_set() {
    let fetcher = StaticFetcher::default().with("jurado.json", JURY_JSON);
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::Jury).await;

    site.search(Catalog::Jury, "nobody").unwrap();
    assert!(site
        .page()
        .container("grid")
        .unwrap()
        .html()
        .contains(render::NO_RESULTS));

    site.search(Catalog::Jury, "  ").unwrap();
    assert_eq!(site.jury().displayed(), site.jury().full());
    let html = site.page().container("grid").unwrap().html();
    assert!(html.contains(r#"data-index="0""#) && html.contains(r#"data-index="1""#));
}

#[tokio::test]
async fn wrapped_empty_news_renders_single_placeholder() {
    let fetcher = StaticFetcher::default().with("noticias.json", r#"{"items": []}"#);
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::News).await;

    let html = site.page().container("newsList").unwrap().html();
    assert_eq!(html, format!(r#"<li class="newsitem">{NEWS_EMPTY}</li>"#));
    assert_eq!(html.matches("<li").count(), 1);
}

#[tokio::test]
async fn schedule_feed_groups_friday_rows() {
    let fetcher = StaticFetcher::default().with(
        "parrilla.csv",
        "dia,artista,foto\nFriday,Solista,img.jpg\nFriday,Banda,\n",
    );
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::Schedule).await;

    let html = site.page().container("parrillaContainer").unwrap().html();
    assert_eq!(html.matches(r#"class="dia-columna""#).count(), 1);
    let solista = html.find("Solista").unwrap();
    let banda = html.find("Banda").unwrap();
    assert!(solista < banda);
}

#[tokio::test]
async fn script_names_never_reach_markup_unescaped() {
    let fetcher = StaticFetcher::default().with(
        "jurado.json",
        r#"[{"name":"<script>x</script>","role":"Judge"}]"#,
    );
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::Jury).await;

    let html = site.page().container("grid").unwrap().html();
    assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(!html.contains("<script"));
}

#[tokio::test]
async fn overlay_dismissal_paths() {
    let fetcher = StaticFetcher::default().with("jurado.json", JURY_JSON);
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::Jury).await;

    for dismiss in [
        Event::Click {
            target: Target::Element(CLOSE_CONTROL_ID.to_string()),
        },
        Event::Click {
            target: Target::Element(MODAL_ID.to_string()),
        },
        Event::KeyDown {
            key: Key::Escape,
            target: None,
        },
    ] {
        site.dispatch(card_click(&site, Catalog::Jury, 1));
        assert!(site.overlay().is_visible());
        assert_eq!(site.page().body.scroll, Scroll::Hidden);

        assert!(site.dispatch(dismiss).handled);
        assert!(!site.overlay().is_visible());
        assert_eq!(site.page().body.scroll, Scroll::Auto);
    }

    // Closing again is a no-op.
    let before = site.snapshot();
    let d = site.dispatch(Event::KeyDown {
        key: Key::Escape,
        target: None,
    });
    assert!(!d.handled);
    let after = site.snapshot();
    assert_eq!(before.overlay.visible, after.overlay.visible);
    assert_eq!(before.scroll_locked, after.scroll_locked);
}

#[tokio::test]
async fn news_cards_do_not_open_the_overlay() {
    let fetcher = StaticFetcher::default().with(
        "noticias.json",
        r#"{"items":[{"title":"A","url":"https://a.cl"}]}"#,
    );
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::News).await;

    let d = site.dispatch(Event::KeyDown {
        key: Key::Enter,
        target: Some(Target::Card(site.card_ref(Catalog::News, 0))),
    });
    assert!(!d.handled && !d.default_prevented);
    assert!(!site.overlay().is_visible());
}

#[tokio::test]
async fn competition_card_opens_detail() {
    let fetcher = StaticFetcher::default().with(
        "competencia.json",
        r#"[{"song":"Volver","performer":"Dúo Sur","country":"Chile","category":"Folclórica"}]"#,
    );
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::Competition).await;

    assert!(site.dispatch(card_click(&site, Catalog::Competition, 0)).handled);
    assert_eq!(site.overlay().view().title, "Volver");
    assert_eq!(site.overlay().view().role, "Dúo Sur · Chile");
}

#[tokio::test]
async fn reload_overwrites_previous_state() {
    let first = StaticFetcher::default().with("jurado.json", JURY_JSON);
    let second = StaticFetcher::default().with("jurado.json", r#"[{"name":"Sol"}]"#);
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&first, Catalog::Jury).await;
    site.search(Catalog::Jury, "ana").unwrap();
    site.load(&second, Catalog::Jury).await;

    assert_eq!(site.jury().displayed().len(), 1);
    assert_eq!(site.jury().displayed()[0].name, "Sol");
}

#[test]
fn card_count_matches_records_for_various_sizes() {
    for n in 1..6 {
        let records: Vec<JuryMember> = (0..n)
            .map(|i| JuryMember {
                name: format!("p{i}"),
                ..Default::default()
            })
            .collect();
        let mut container = crate::page::Container::default();
        render::render(&mut container, &records, 1);
        let html = container.html();
        assert_eq!(html.matches(r#"role="button""#).count(), n);
        for i in 0..n {
            assert!(html.contains(&format!(r#"data-index="{i}""#)));
        }
    }
}

#[test]
fn empty_query_filter_is_identity_for_every_catalog_shape() {
    let records: Vec<JuryMember> = serde_json::from_str(JURY_JSON).unwrap();
    assert_eq!(
        filter::apply("", &records, Catalog::Jury.search_fields()),
        records
    );
}

#[tokio::test]
async fn search_keeps_the_failure_placeholder_of_a_failed_load() {
    let fetcher = StaticFetcher::default().failing("competencia.json", 503);
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&fetcher, Catalog::Competition).await;

    let d = site.dispatch(Event::Input {
        id: "compSearch".to_string(),
        value: "x".to_string(),
    });
    assert!(d.handled);
    assert_eq!(site.page().input("compSearch"), Some("x"));
    let html = site.page().container("compGrid").unwrap().html();
    assert!(html.contains(render::LOAD_FAILED));
    assert!(!html.contains(render::NO_RESULTS));
}

#[test]
fn search_before_the_load_arrives_leaves_the_container_alone() {
    let mut site = Site::new(Page::festival(), festival_sources());
    let before = site.page().container("grid").unwrap().html().to_string();

    assert_eq!(site.search(Catalog::Jury, "leo").unwrap(), 0);
    assert_eq!(site.page().container("grid").unwrap().html(), before);
}

#[tokio::test]
async fn failed_reload_is_not_revived_by_a_search() {
    let first = StaticFetcher::default().with("jurado.json", JURY_JSON);
    let second = StaticFetcher::default().failing("jurado.json", 500);
    let mut site = Site::new(Page::festival(), festival_sources());
    site.load(&first, Catalog::Jury).await;
    site.load(&second, Catalog::Jury).await;

    site.search(Catalog::Jury, "").unwrap();
    let html = site.page().container("grid").unwrap().html();
    assert!(html.contains(render::LOAD_FAILED));
    assert!(!html.contains("Leo"));
}
