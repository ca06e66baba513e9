use std::fmt::Write;

use crate::catalog::Catalog;
use crate::page::{CLOSE_BUTTON_ID, CLOSE_CONTROL_ID, MODAL_ID, YEAR_ID};
use crate::render::escape_html;
use crate::site::Snapshot;

fn section_title(catalog: Catalog) -> &'static str {
    match catalog {
        Catalog::Schedule => "Programación",
        Catalog::News => "Noticias",
        Catalog::Jury => "Jurado",
        Catalog::Competition => "Competencia",
    }
}

fn container_tag(catalog: Catalog) -> &'static str {
    match catalog {
        Catalog::News => "ul",
        _ => "div",
    }
}

/// Full static document: every catalog section, search inputs, the overlay
/// and the footer.
pub fn render_html(snapshot: &Snapshot) -> Vec<u8> {
    let mut sections = String::new();
    for catalog in Catalog::ALL {
        let id = catalog.container_id();
        let Some(inner) = snapshot.containers.get(id) else {
            continue;
        };
        let search = snapshot
            .inputs
            .get(catalog.search_input_id())
            .map(|value| {
                format!(
                    r#"<input id="{}" type="search" value="{}" placeholder="Buscar...">"#,
                    catalog.search_input_id(),
                    escape_html(value)
                )
            })
            .unwrap_or_default();
        let tag = container_tag(catalog);
        let _ = write!(
            sections,
            r#"
    <section class="section section--{name}">
      <h2>{title}</h2>
      {search}
      <{tag} id="{id}">{inner}</{tag}>
    </section>"#,
            name = catalog.as_str(),
            title = section_title(catalog),
        );
    }

    let overlay = &snapshot.overlay;
    let modal_class = if overlay.visible {
        "modal is-active"
    } else {
        "modal"
    };
    let year = snapshot.year.as_deref().map(escape_html).unwrap_or_default();
    let body_style = if snapshot.scroll_locked {
        r#" style="overflow: hidden""#
    } else {
        ""
    };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Cartelera</title>
</head>
<body{body_style}>
  <main>{sections}
  </main>

  <div id="{MODAL_ID}" class="{modal_class}" aria-hidden="{hidden}">
    <div class="modal__dialog" role="dialog" aria-modal="true">
      <button id="{CLOSE_CONTROL_ID}" class="modal__close" type="button" aria-label="Cerrar">&times;</button>
      <img id="modalImg" src="{image}" alt="{title}">
      <h3 id="modalTitle">{title}</h3>
      <p id="modalRole">{role}</p>
      <p id="modalBio">{bio}</p>
      <p id="modalLinks">{links}</p>
      <button id="{CLOSE_BUTTON_ID}" type="button">Cerrar</button>
    </div>
  </div>

  <footer>
    <p>&copy; <span id="{YEAR_ID}">{year}</span></p>
  </footer>
</body>
</html>
"####,
        hidden = !overlay.visible,
        image = escape_html(&overlay.view.image),
        title = escape_html(&overlay.view.title),
        role = escape_html(&overlay.view.role),
        bio = escape_html(&overlay.view.bio),
        links = overlay.view.links_html,
    );
    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::overlay::OverlayView;
    use crate::site::OverlaySnapshot;

    #[test]
    fn document_contains_sections_and_escaped_overlay() {
        let snapshot = Snapshot {
            containers: BTreeMap::from([
                ("grid".to_string(), r#"<div class="card">A</div>"#.to_string()),
                ("newsList".to_string(), r#"<li class="newsitem">N</li>"#.to_string()),
            ]),
            inputs: BTreeMap::from([("juradoSearch".to_string(), "\"x\"".to_string())]),
            year: Some("2026".to_string()),
            scroll_locked: true,
            overlay: OverlaySnapshot {
                visible: true,
                view: OverlayView {
                    title: "<b>Leo</b>".to_string(),
                    ..Default::default()
                },
            },
        };
        let html = String::from_utf8(render_html(&snapshot)).unwrap();
        assert!(html.contains(r#"<div id="grid"><div class="card">A</div></div>"#));
        assert!(html.contains(r#"<ul id="newsList"><li class="newsitem">N</li></ul>"#));
        assert!(!html.contains(r#"id="compGrid""#));
        assert!(html.contains(r#"value="&quot;x&quot;""#));
        assert!(html.contains("modal is-active"));
        assert!(html.contains("&lt;b&gt;Leo&lt;/b&gt;"));
        assert!(html.contains(r#"<body style="overflow: hidden">"#));
        assert!(html.contains(r#"<span id="year">2026</span>"#));
    }
}
