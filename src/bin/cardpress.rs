use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

use cardpress::{
    CharacterRecord, Fill, GeneratorConfig, OutputConfig, OutputWriter, PortraitIndex,
    SheetPacker,
};

#[derive(Parser, Debug)]
#[command(name = "cardpress", version)]
struct Cli {
    /// Raise log verbosity (`-v` info, `-vv` debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render cards and print sheets for a set of records.
    Render(RenderArgs),
    /// List the tier styles.
    Tiers(ConfigArgs),
    /// Print the sheet layout for a configuration.
    Layout(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Character records (JSON array).
    #[arg(long)]
    records: PathBuf,

    /// Directory searched for `<name>.<ext>` or `<name>_*.<ext>` portraits.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Generator config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output root; cards go to `<out>/individual_cards`, sheets to `<out>/print_sheets`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Only render these tiers (repeatable, case-insensitive).
    #[arg(long = "tier")]
    tiers: Vec<String>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Write individual cards only.
    #[arg(long, default_value_t = false)]
    no_sheets: bool,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Generator config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Tiers(args) => cmd_tiers(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GeneratorConfig> {
    match path {
        Some(p) => GeneratorConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(out) = &args.out {
        config.output = OutputConfig {
            cards_dir: out.join("individual_cards"),
            sheets_dir: out.join("print_sheets"),
            ..config.output
        };
    }
    if args.threads.is_some() {
        config.batch.threads = args.threads;
    }
    if args.no_sheets {
        config.batch.emit_sheets = false;
    }
    config.validate().context("invalid configuration")?;

    let records = cardpress::read_records_path(&args.records)
        .with_context(|| format!("load records '{}'", args.records.display()))?;
    let records = filter_tiers(records, &args.tiers);
    if records.is_empty() {
        anyhow::bail!("no records to render");
    }

    let index = match &args.images {
        Some(dir) => PortraitIndex::scan(dir)
            .with_context(|| format!("scan images '{}'", dir.display()))?,
        None => PortraitIndex::default(),
    };

    let renderer = config.renderer()?;
    let mut writer = OutputWriter::new(config.output.clone())?;
    let report =
        renderer.run_with_loader(&records, |record| index.load(&record.name), &mut writer)?;

    for failure in &report.failures {
        eprintln!("skipped #{} '{}': {}", failure.index, failure.name, failure.message);
    }
    eprintln!("{report}");
    eprintln!(
        "wrote {} file(s) to {} and {}",
        writer.written().len(),
        config.output.cards_dir.display(),
        config.output.sheets_dir.display()
    );
    Ok(())
}

fn filter_tiers(records: Vec<CharacterRecord>, tiers: &[String]) -> Vec<CharacterRecord> {
    if tiers.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| tiers.iter().any(|t| t.eq_ignore_ascii_case(&r.tier)))
        .collect()
}

fn cmd_tiers(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let book = config.style_book()?;
    for (tier, profile) in book.iter() {
        let fill = match &profile.fill {
            Fill::Solid(c) => c.to_hex(),
            Fill::Gradient(stops) => stops
                .iter()
                .map(|s| s.color.to_hex())
                .collect::<Vec<_>>()
                .join(" > "),
        };
        println!("{tier:<14} {:<14} {fill}", profile.badge_label);
    }
    println!("{:<14} {:<14} {}", "(other)", "", book.fallback().primary().to_hex());
    Ok(())
}

fn cmd_layout(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let packer = SheetPacker::for_card(config.sheet.clone(), &config.card)
        .context("sheet layout")?;
    print!("{}", packer.info());
    Ok(())
}
