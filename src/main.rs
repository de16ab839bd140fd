use clap::{Parser, Subcommand};
use log::error;
use tastoro::{FailurePolicy, Meal, MealAggregator, MealDbConfig, MealError};

#[derive(Parser)]
#[command(name = "tastoro")]
#[command(about = "Search TheMealDB by keyword and cuisine")]
struct Cli {
    /// Override the API root
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search meals by keyword, optionally across several areas
    Search {
        /// Keyword matched against meal names (defaults to the configured keyword)
        keyword: Option<String>,
        /// Area (cuisine) to search; repeat for several
        #[arg(short, long = "area")]
        areas: Vec<String>,
        /// Skip failed areas instead of failing the whole search
        #[arg(long)]
        partial: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show ingredients and instructions for one meal
    Detail {
        /// Meal id, e.g. 52940
        id: String,
        /// Print the meal as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available areas
    Areas,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = MealDbConfig::load().map_err(MealError::from)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Search {
            keyword,
            areas,
            partial,
            json,
        } => {
            if partial {
                config.failure_policy = FailurePolicy::Partial;
            }
            let aggregator = MealAggregator::from_config(&config)?;
            let meals = aggregator
                .query(keyword.as_deref().unwrap_or_default(), &areas)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&meals)?);
            } else if meals.is_empty() {
                println!("No meals found.");
            } else {
                for meal in &meals {
                    print_summary(meal);
                }
            }
        }
        Commands::Detail { id, json } => {
            let aggregator = MealAggregator::from_config(&config)?;
            let meal = aggregator.fetch_detail(&id).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&meal)?);
            } else {
                print_detail(&meal);
            }
        }
        Commands::Areas => {
            let aggregator = MealAggregator::from_config(&config)?;
            for area in aggregator.list_areas().await? {
                println!("{}", area);
            }
        }
    }

    Ok(())
}

fn print_summary(meal: &Meal) {
    match &meal.area {
        Some(area) => println!("{:>8}  {} [{}]", meal.id, meal.name, area),
        None => println!("{:>8}  {}", meal.id, meal.name),
    }
}

fn print_detail(meal: &Meal) {
    println!("{} (#{})", meal.name, meal.id);
    if let Some(area) = &meal.area {
        println!("Area: {}", area);
    }
    if let Some(category) = &meal.category {
        println!("Category: {}", category);
    }
    println!("Image: {}", meal.thumbnail_url);

    if let Some(ingredients) = &meal.ingredients {
        println!("\nIngredients:");
        for ingredient in ingredients {
            println!("  - {}", ingredient);
        }
    }
    if let Some(instructions) = &meal.instructions {
        println!("\n{}", instructions);
    }
}
