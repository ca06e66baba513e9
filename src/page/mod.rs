pub mod events;

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::catalog::Catalog;

pub const MODAL_ID: &str = "modal";
pub const CLOSE_CONTROL_ID: &str = "closeModal";
pub const CLOSE_BUTTON_ID: &str = "btnCerrarModal";
pub const YEAR_ID: &str = "year";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("element #{id} is not present on the page")]
    MissingElement { id: String },
}

/// A container element whose inner markup the renderers replace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Container {
    html: String,
}

impl Container {
    pub fn set_html(&mut self, html: String) {
        self.html = html;
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scroll {
    #[default]
    Auto,
    Hidden,
}

/// Document body state the overlay touches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Body {
    pub scroll: Scroll,
}

/// The host document: which hooks exist and what they currently hold.
#[derive(Clone, Debug, Default)]
pub struct Page {
    containers: BTreeMap<String, Container>,
    inputs: BTreeMap<String, String>,
    elements: BTreeSet<String>,
    texts: BTreeMap<String, String>,
    pub body: Body,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// The festival page layout with every hook present.
    pub fn festival() -> Self {
        let mut page = Self::new();
        for catalog in Catalog::ALL {
            page = page.with_container(catalog.container_id());
        }
        page.with_input(Catalog::Jury.search_input_id())
            .with_input(Catalog::Competition.search_input_id())
            .with_element(MODAL_ID)
            .with_element(CLOSE_CONTROL_ID)
            .with_element(CLOSE_BUTTON_ID)
            .with_element(YEAR_ID)
    }

    pub fn with_container(mut self, id: &str) -> Self {
        self.containers.insert(id.to_string(), Container::default());
        self.elements.insert(id.to_string());
        self
    }

    pub fn with_input(mut self, id: &str) -> Self {
        self.inputs.insert(id.to_string(), String::new());
        self.elements.insert(id.to_string());
        self
    }

    pub fn with_element(mut self, id: &str) -> Self {
        self.elements.insert(id.to_string());
        self
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.elements.contains(id)
    }

    pub fn container(&self, id: &str) -> Result<&Container, PageError> {
        self.containers.get(id).ok_or_else(|| missing(id))
    }

    pub fn container_mut(&mut self, id: &str) -> Result<&mut Container, PageError> {
        self.containers.get_mut(id).ok_or_else(|| missing(id))
    }

    pub fn containers(&self) -> impl Iterator<Item = (&str, &Container)> {
        self.containers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn set_input(&mut self, id: &str, value: &str) -> Result<(), PageError> {
        let slot = self.inputs.get_mut(id).ok_or_else(|| missing(id))?;
        *slot = value.to_string();
        Ok(())
    }

    pub fn input(&self, id: &str) -> Option<&str> {
        self.inputs.get(id).map(|s| s.as_str())
    }

    pub fn inputs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inputs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets the text content of a plain element such as the footer year.
    pub fn set_text(&mut self, id: &str, text: &str) -> Result<(), PageError> {
        if !self.has_element(id) {
            return Err(missing(id));
        }
        self.texts.insert(id.to_string(), text.to_string());
        Ok(())
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.texts.get(id).map(|s| s.as_str())
    }
}

fn missing(id: &str) -> PageError {
    PageError::MissingElement { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn festival_layout_has_all_hooks() {
        let page = Page::festival();
        for c in Catalog::ALL {
            assert!(page.container(c.container_id()).is_ok());
        }
        assert!(page.has_element(MODAL_ID));
        assert_eq!(page.input("juradoSearch"), Some(""));
    }

    #[test]
    fn missing_container_is_reported() {
        let mut page = Page::new().with_container("grid");
        assert_eq!(
            page.container_mut("compGrid").unwrap_err(),
            PageError::MissingElement {
                id: "compGrid".to_string()
            }
        );
        assert!(page.set_text(YEAR_ID, "2026").is_err());
    }
}
