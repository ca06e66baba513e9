use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "cartelera",
    version,
    about = "festival page catalog renderer",
    long_about = "Cartelera loads the festival page's schedule, news, jury and competition datasets, renders them the way the page does, and writes a static snapshot.\n\nExamples:\n  cartelera render --base ./site -o snapshot.html\n  cartelera render --search jury=judge --open jury:0 -o snapshot.json\n  cartelera news --tag olmue2026 -o assets/data/noticias.json\n\nTip: Use --config to persist sources and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.cartelera/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        global = true,
        help_heading = "Input",
        help = "Write a commented default config file if none exists."
    )]
    pub init_config: bool,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "Performance",
        help = "HTTP request timeout."
    )]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load every catalog and write a snapshot of the rendered page.
    Render(RenderArgs),
    /// Regenerate the news dataset from the WordPress site.
    News(NewsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[arg(
        short = 'b',
        long = "base",
        value_name = "URL|DIR",
        help_heading = "Input",
        help = "Base for relative catalog references."
    )]
    pub base: Option<String>,

    #[arg(
        long = "schedule-csv",
        visible_alias = "parrilla",
        value_name = "REF",
        help_heading = "Input",
        help = "Schedule CSV feed."
    )]
    pub schedule_csv: Option<String>,

    #[arg(
        long = "news",
        visible_alias = "noticias",
        value_name = "REF",
        help_heading = "Input",
        help = "News JSON."
    )]
    pub news: Option<String>,

    #[arg(
        long = "jury",
        visible_alias = "jurado",
        value_name = "REF",
        help_heading = "Input",
        help = "Jury JSON."
    )]
    pub jury: Option<String>,

    #[arg(
        long = "competition",
        visible_alias = "competencia",
        value_name = "REF",
        help_heading = "Input",
        help = "Competition JSON."
    )]
    pub competition: Option<String>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "CATALOG=QUERY",
        action = ArgAction::Append,
        help_heading = "Interaction",
        help = "Type QUERY into the jury or competition search field (repeatable)."
    )]
    pub search: Vec<String>,

    #[arg(
        long = "open",
        value_name = "CATALOG:INDEX",
        help_heading = "Interaction",
        help = "Activate the INDEX-th displayed card after searching."
    )]
    pub open: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the snapshot to FILE."
    )]
    pub output: Option<String>,

    #[arg(
        long = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Snapshot format: html or json (inferred from --output when omitted)."
    )]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NewsArgs {
    #[arg(
        long = "site",
        value_name = "URL",
        help_heading = "Input",
        help = "WordPress site root."
    )]
    pub site: Option<String>,

    #[arg(
        long = "tag",
        value_name = "SLUG",
        help_heading = "Input",
        help = "Tag slug to collect posts for."
    )]
    pub tag: Option<String>,

    #[arg(
        long = "limit",
        value_name = "N",
        help_heading = "Input",
        help = "Maximum number of items."
    )]
    pub limit: Option<usize>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Where to write the payload."
    )]
    pub output: Option<String>,
}
