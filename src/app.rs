use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

use crate::catalog::Catalog;
use crate::cli::args::{CliArgs, Command, NewsArgs, RenderArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::newsfeed::{self, FeedConfig};
use crate::output::{self, OutputFormat};
use crate::page::events::{Event, Target};
use crate::page::Page;
use crate::site::{LoadReport, Site, Sources};
use crate::source::{Base, FetchOptions, HttpFetcher, SourceRef, DEFAULT_USER_AGENT};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<12}: {}", label, value);
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub sources: Sources,
    pub searches: Vec<(Catalog, String)>,
    pub open: Option<(Catalog, usize)>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub fetch: FetchOptions,
    pub no_color: bool,
}

#[derive(Clone, Debug)]
pub struct NewsConfig {
    pub feed: FeedConfig,
    pub output: PathBuf,
    pub fetch: FetchOptions,
    pub no_color: bool,
}

fn fetch_options(timeout: Option<u64>, user_agent: Option<String>) -> FetchOptions {
    FetchOptions {
        timeout: Duration::from_secs(timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        ..FetchOptions::default()
    }
}

fn resolve_source(
    label: &str,
    reference: Option<String>,
    base: Option<&Base>,
) -> Result<Option<SourceRef>, String> {
    let Some(reference) = reference.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };
    SourceRef::resolve(&reference, base)
        .map(Some)
        .map_err(|e| format!("invalid {label} source: {e}"))
}

/// CLI flags win over the config file, which wins over built-in defaults.
pub fn build_render_config(
    args: RenderArgs,
    cfg: ConfigFile,
    timeout: Option<u64>,
    no_color: bool,
) -> Result<RenderConfig, String> {
    let base = args.base.or(cfg.base).map(|b| Base::parse(&b));
    let base = base.as_ref();

    let sources = Sources {
        schedule: resolve_source(
            "schedule",
            args.schedule_csv
                .or(cfg.schedule_csv)
                .or_else(|| Some(config::DEFAULT_SCHEDULE_CSV.to_string())),
            base,
        )?,
        news: resolve_source(
            "news",
            args.news
                .or(cfg.news)
                .or_else(|| Some(config::DEFAULT_NEWS.to_string())),
            base,
        )?,
        jury: resolve_source(
            "jury",
            args.jury
                .or(cfg.jury)
                .or_else(|| Some(config::DEFAULT_JURY.to_string())),
            base,
        )?,
        competition: resolve_source(
            "competition",
            args.competition
                .or(cfg.competition)
                .or_else(|| Some(config::DEFAULT_COMPETITION.to_string())),
            base,
        )?,
    };

    let searches = args
        .search
        .iter()
        .map(|raw| validation::parse_search(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let open = args
        .open
        .as_deref()
        .map(validation::parse_open)
        .transpose()?;

    let output = args.output.or(cfg.output);
    let format = match args.format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected html or json"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Html),
    };

    Ok(RenderConfig {
        sources,
        searches,
        open,
        output: output.map(|p| config::expand_tilde(&p)),
        format,
        fetch: fetch_options(timeout.or(cfg.timeout), cfg.user_agent),
        no_color: no_color || cfg.no_color.unwrap_or(false),
    })
}

pub fn build_news_config(
    args: NewsArgs,
    cfg: ConfigFile,
    timeout: Option<u64>,
    no_color: bool,
) -> Result<NewsConfig, String> {
    let defaults = FeedConfig::default();
    let feed = FeedConfig {
        site: args.site.or(cfg.news_site).unwrap_or(defaults.site),
        tag: args.tag.or(cfg.news_tag).unwrap_or(defaults.tag),
        limit: args.limit.or(cfg.news_limit).unwrap_or(defaults.limit),
    };
    if reqwest::Url::parse(&feed.site).is_err() {
        return Err(format!("invalid news site '{}'", feed.site));
    }
    let output = args
        .output
        .or(cfg.news_output)
        .unwrap_or_else(|| config::DEFAULT_NEWS.to_string());

    let mut fetch = fetch_options(timeout.or(cfg.timeout), cfg.user_agent);
    fetch.cache_bust = false;
    fetch.accept = Some("application/json,text/html;q=0.9,*/*;q=0.8".to_string());

    Ok(NewsConfig {
        feed,
        output: config::expand_tilde(&output),
        fetch,
        no_color: no_color || cfg.no_color.unwrap_or(false),
    })
}

fn spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn print_load_report(report: &LoadReport) {
    let label = report.catalog.as_str();
    match (&report.records, &report.error) {
        (Some(n), _) => format_kv_line(label, &format!("{} records", n.to_string().green())),
        (None, Some(e)) => format_kv_line(label, &format!("{} ({e})", "placeholder".yellow())),
        (None, None) => format_kv_line(label, &"skipped".dimmed().to_string()),
    }
}

async fn write_output(path: &PathBuf, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("failed to create output directory: {e}"))?;
    }
    let mut outfile = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| format!("failed to open output file: {e}"))?;
    outfile
        .write_all(bytes)
        .await
        .map_err(|_| "failed to write output file".to_string())
}

pub async fn run_render(run: RenderConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let fetcher =
        HttpFetcher::new(run.fetch.clone()).map_err(|e| format!("failed to build http client: {e}"))?;

    let mut site = Site::new(Page::festival(), run.sources.clone());
    site.initialize();

    let now = Instant::now();
    let pb = spinner("loading catalogs");
    let reports = site.load_all(&fetcher).await;
    pb.finish_and_clear();

    for report in reports.iter() {
        print_load_report(report);
    }

    for (catalog, query) in run.searches.iter() {
        let event = Event::Input {
            id: catalog.search_input_id().to_string(),
            value: query.clone(),
        };
        if !site.dispatch(event).handled {
            log::warn!("{catalog}: search field is not on the page");
            continue;
        }
        format_kv_line(
            &format!("search {catalog}"),
            &format!("{:?} -> {} shown", query, site.displayed_len(*catalog)),
        );
    }

    if let Some((catalog, index)) = run.open {
        let card = site.card_ref(catalog, index);
        let dispatch = site.dispatch(Event::Click {
            target: Target::Card(card),
        });
        if !dispatch.handled {
            return Err(format!(
                "{catalog} has no displayed card at index {index} ({} shown)",
                site.displayed_len(catalog)
            ));
        }
        format_kv_line("open", &site.overlay().view().title.bold().to_string());
    }

    let snapshot = site.snapshot();
    let rendered = output::render(&snapshot, run.format);
    match run.output.as_ref() {
        Some(path) => {
            write_output(path, &rendered).await?;
            format_kv_line("output", &path.display().to_string());
        }
        None => {
            println!("{}", String::from_utf8_lossy(&rendered));
        }
    }

    println!();
    println!(
        ":: Completed :: rendered in {}ms ::",
        now.elapsed().as_millis()
    );
    Ok(())
}

pub async fn run_news(run: NewsConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let fetcher =
        HttpFetcher::new(run.fetch.clone()).map_err(|e| format!("failed to build http client: {e}"))?;

    format_kv_line("site", &run.feed.site);
    format_kv_line("tag", &run.feed.tag);

    let pb = spinner("collecting news");
    let payload = newsfeed::build_payload(&fetcher, &run.feed).await;
    pb.finish_and_clear();

    newsfeed::write_payload(&run.output, &payload)
        .await
        .map_err(|e| e.to_string())?;

    let mode = serde_json::to_value(payload.mode)
        .ok()
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .unwrap_or_default();
    let mode = match payload.mode {
        newsfeed::FeedMode::Error => mode.red().to_string(),
        newsfeed::FeedMode::HtmlFallback => mode.yellow().to_string(),
        newsfeed::FeedMode::WpJson => mode.green().to_string(),
    };
    format_kv_line("mode", &mode);
    format_kv_line("items", &payload.items.len().to_string());
    if let Some(note) = payload.note.as_deref() {
        format_kv_line("note", note);
    }
    format_kv_line("output", &run.output.display().to_string());
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    validation::validate(&args)?;

    let config_path = args
        .config
        .as_deref()
        .map(config::expand_tilde)
        .or_else(config::default_config_path);
    if args.init_config {
        if let Some(path) = config_path.as_ref() {
            config::ensure_default_config_file(path)?;
            format_kv_line("config", &path.display().to_string());
        }
    }
    let cfg = match config_path.as_ref() {
        Some(path) => config::load_config(path, args.config.is_none())?,
        None => ConfigFile::default(),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    match args.command {
        Command::Render(render) => {
            let run = build_render_config(render, cfg, args.timeout, args.no_color)?;
            rt.block_on(run_render(run))
        }
        Command::News(news) => {
            let run = build_news_config(news, cfg, args.timeout, args.no_color)?;
            rt.block_on(run_news(run))
        }
    }
}
