use crate::catalog::Catalog;
use crate::cli::args::{CliArgs, Command};
use crate::page::Page;

/// Splits `CATALOG=QUERY` for a catalog whose search field is on the rendered
/// page. The query may be empty, which clears a filter.
pub fn parse_search(raw: &str) -> Result<(Catalog, String), String> {
    let (name, query) = raw
        .split_once('=')
        .ok_or_else(|| "expected CATALOG=QUERY".to_string())?;
    let catalog =
        Catalog::parse(name).ok_or_else(|| format!("unknown catalog '{}'", name.trim()))?;
    if Page::festival().input(catalog.search_input_id()).is_none() {
        return Err(format!("{catalog} has no search field"));
    }
    Ok((catalog, query.to_string()))
}

/// Splits `CATALOG:INDEX` for an interactive catalog.
pub fn parse_open(raw: &str) -> Result<(Catalog, usize), String> {
    let (name, index) = raw
        .rsplit_once(':')
        .ok_or_else(|| "expected CATALOG:INDEX".to_string())?;
    let catalog =
        Catalog::parse(name).ok_or_else(|| format!("unknown catalog '{}'", name.trim()))?;
    if !catalog.is_interactive() {
        return Err(format!("{catalog} cards do not open a detail view"));
    }
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid index '{}'", index.trim()))?;
    Ok((catalog, index))
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    match &args.command {
        Command::Render(render) => {
            for raw in render.search.iter() {
                parse_search(raw).map_err(|e| format!("invalid --search '{raw}': {e}"))?;
            }
            if let Some(raw) = render.open.as_deref() {
                parse_open(raw).map_err(|e| format!("invalid --open '{raw}': {e}"))?;
            }
            if let Some(raw) = render.format.as_deref() {
                if crate::output::OutputFormat::parse(raw).is_none() {
                    return Err(format!("invalid --format '{raw}', expected html or json"));
                }
            }
        }
        Command::News(news) => {
            if news.limit == Some(0) {
                return Err("invalid limit, expected positive integer".to_string());
            }
            if let Some(site) = news.site.as_deref() {
                if reqwest::Url::parse(site).is_err() {
                    return Err(format!("invalid --site '{site}'"));
                }
            }
        }
    }
    Ok(())
}
