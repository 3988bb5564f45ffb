mod extract;
mod generate;
mod suggest;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mealwise_core::{SuggestConfig, SuggestionCriteria};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "mealwise")]
#[command(about = "Mealwise CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Filter criteria shared by the suggestion commands.
#[derive(Args, Debug, Clone)]
struct CriteriaArgs {
    /// Meal type (breakfast, lunch, dinner, snack)
    #[arg(long, default_value = "dinner")]
    meal_type: String,
    /// Dietary preference, "none" for no restriction
    #[arg(long, default_value = "none")]
    diet: String,
    /// Preferred cuisine
    #[arg(long, default_value = "")]
    cuisine: String,
    /// Comma-separated ingredients to use up
    #[arg(long, default_value = "")]
    ingredients: String,
}

impl CriteriaArgs {
    fn criteria(&self) -> SuggestionCriteria {
        SuggestionCriteria::new(&self.meal_type, &self.diet)
            .with_cuisine(&self.cuisine)
            .with_ingredients(&self.ingredients)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Page through stored meals, topping up with generated ones
    Suggest {
        #[command(flatten)]
        criteria: CriteriaArgs,
        /// Suggestions per batch
        #[arg(long, default_value = "3")]
        count: usize,
        /// Number of batches to fetch
        #[arg(long, default_value = "1")]
        batches: usize,
        /// Start each batch at a random store position
        #[arg(long)]
        get_new: bool,
        /// JSON array of meal rows used when DATABASE_URL is not set
        #[arg(long)]
        seed_file: Option<PathBuf>,
    },
    /// Generate meals with the configured provider only
    Generate {
        #[command(flatten)]
        criteria: CriteriaArgs,
        /// Number of meals to generate
        #[arg(long, default_value = "3")]
        count: usize,
    },
    /// Run extraction on a raw reply (file or stdin) and print the result
    Extract {
        /// File containing the raw reply; reads stdin when omitted
        file: Option<PathBuf>,
        #[command(flatten)]
        criteria: CriteriaArgs,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest {
            criteria,
            count,
            batches,
            get_new,
            seed_file,
        } => {
            let config = SuggestConfig::from_env()?;
            suggest::suggest(
                &config,
                &criteria.criteria(),
                count,
                batches,
                get_new,
                seed_file.as_deref(),
            )
            .await?;
        }
        Commands::Generate { criteria, count } => {
            let config = SuggestConfig::from_env()?;
            generate::generate(&config, &criteria.criteria(), count).await?;
        }
        Commands::Extract { file, criteria } => {
            extract::extract(file.as_deref(), &criteria.criteria()).await?;
        }
    }

    Ok(())
}
