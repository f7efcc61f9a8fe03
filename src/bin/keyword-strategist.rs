use anyhow::{anyhow, bail, Result};
use clap::{Parser, ValueEnum};
use keyword_strategist::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use keyword_strategist::view::{self, KeywordFilter, SortDirection};
use keyword_strategist::{GenerationOptions, GeneratorConfig, Level, StrategyGenerator, StrategyType};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "keyword-strategist")]
#[command(about = "Generate an SEO keyword strategy for a topic")]
struct Cli {
    /// Topic to research (e.g. "قهوه ارگانیک")
    topic: String,

    /// Terms the model must keep out of the results (comma-separated)
    #[arg(short, long)]
    negative: Option<String>,

    /// Broad high-volume keywords or niche long-tail ones
    #[arg(short, long, value_enum, default_value = "broad")]
    strategy: StrategyArg,

    /// How to render the result
    #[arg(long, value_enum, default_value = "table")]
    view: ViewArg,

    /// Only show keywords with this search volume
    #[arg(long, value_enum)]
    volume: Option<LevelArg>,

    /// Only show keywords with this competition
    #[arg(long, value_enum)]
    competition: Option<LevelArg>,

    /// Sort rows by keyword
    #[arg(long, value_enum)]
    sort: Option<SortArg>,

    /// Model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Provider base URL (point at mock-llm-server for local runs)
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Enable verbose/debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Broad,
    Niche,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Table,
    Tree,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Asc,
    Desc,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::High => Level::High,
            LevelArg::Medium => Level::Medium,
            LevelArg::Low => Level::Low,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("keyword_strategist=debug")
    } else {
        EnvFilter::new("keyword_strategist=warn")
    };
    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let topic = cli.topic.trim();
    if topic.is_empty() {
        bail!("Topic must not be empty");
    }

    let config = GeneratorConfig::from_env()
        .with_model(cli.model)
        .with_base_url(cli.base_url);
    let generator = StrategyGenerator::gemini(config);

    let options = GenerationOptions {
        negative_keywords: cli.negative.map(|n| n.trim().to_string()),
        strategy_type: match cli.strategy {
            StrategyArg::Broad => StrategyType::Broad,
            StrategyArg::Niche => StrategyType::Niche,
        },
    };

    eprintln!("Generating strategy for '{topic}'...");
    let result = match generator.generate(topic, &options).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", view::error_message(&e));
            return Err(anyhow!("Strategy generation failed: {e}"));
        }
    };

    match cli.view {
        ViewArg::Json => {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| anyhow!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        ViewArg::Tree => {
            print!("{}", view::render_tree(&view::strategy_tree(&result)));
        }
        ViewArg::Table => {
            println!("{}\n{}\n", result.topic, result.summary);
            let filter = KeywordFilter {
                volume: cli.volume.map(Level::from),
                competition: cli.competition.map(Level::from),
            };
            let sort = cli.sort.map(|s| match s {
                SortArg::Asc => SortDirection::Asc,
                SortArg::Desc => SortDirection::Desc,
            });
            let rows = view::apply(&result.keywords, &filter, sort);
            print!("{}", view::render_table(&rows));
        }
    }

    Ok(())
}
