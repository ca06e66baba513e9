mod cards;

use crate::page::Container;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/50";

pub const NEWS_EMPTY: &str = "No hay noticias disponibles en este momento.";
pub const NEWS_FAILED: &str = "Sincronizando con El Epicentro...";
pub const SCHEDULE_FAILED: &str = "Actualizando programación...";
pub const LOAD_FAILED: &str = "No se pudo cargar la información.";
pub const NO_RESULTS: &str = "Sin resultados.";

/// Escapes the five reserved markup characters.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Where a card sits in the displayed sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub generation: u64,
}

impl Slot {
    fn attrs(self) -> String {
        format!(
            r#"data-index="{}" data-generation="{}""#,
            self.index, self.generation
        )
    }
}

/// Markup for one catalog's records.
pub trait Card: Sized {
    const EMPTY_MESSAGE: &'static str;
    const FAILED_MESSAGE: &'static str;

    fn card_markup(&self, slot: Slot) -> String;

    fn placeholder_markup(message: &str) -> String {
        format!(r#"<p class="note">{}</p>"#, escape_html(message))
    }

    fn list_markup(records: &[Self], generation: u64) -> String {
        records
            .iter()
            .enumerate()
            .map(|(index, r)| r.card_markup(Slot { index, generation }))
            .collect()
    }
}

/// Replaces the container's content with one card per record, or with the
/// single empty placeholder when there is nothing to show.
pub fn render<R: Card>(target: &mut Container, records: &[R], generation: u64) {
    if records.is_empty() {
        target.set_html(R::placeholder_markup(R::EMPTY_MESSAGE));
    } else {
        target.set_html(R::list_markup(records, generation));
    }
}

/// Degraded render after a failed load.
pub fn render_failure<R: Card>(target: &mut Container) {
    target.set_html(R::placeholder_markup(R::FAILED_MESSAGE));
}
