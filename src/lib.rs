pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod newsfeed;
pub mod output;
pub mod overlay;
pub mod page;
pub mod render;
pub mod site;
pub mod source;

#[cfg(test)]
mod tests;
