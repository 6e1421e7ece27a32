use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_rec::{
    config::{Config, RatingStoreKind},
    db::{create_redis_client, FileRatingStore, RatingStore, RedisRatingStore},
    services::{
        dataset::load_catalog_file, ratings::submit_rating, recommend,
        title_search::search_titles, ReferenceDataset,
    },
};

/// Movie recommendations from collaborative filtering over MovieLens ratings
#[derive(Debug, Parser)]
#[command(name = "movie-rec", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the catalog for titles containing the query
    Search {
        query: String,
    },
    /// Rate a movie (1-5 stars); rating it again replaces the old rating
    Rate {
        #[arg(long)]
        user: String,
        /// Exact catalog title, as printed by `search`
        #[arg(long)]
        title: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Show a user's ratings
    Ratings {
        #[arg(long)]
        user: String,
    },
    /// Recommend movies for a user
    Recommend {
        #[arg(long)]
        user: String,
        /// Number of nearest reference users
        #[arg(long)]
        neighbors: Option<usize>,
        /// Number of titles to print
        #[arg(long)]
        limit: Option<usize>,
        /// Keep titles the user already rated
        #[arg(long)]
        include_rated: bool,
    },
}

fn rating_store(config: &Config) -> anyhow::Result<Box<dyn RatingStore>> {
    let store: Box<dyn RatingStore> = match config.rating_store {
        RatingStoreKind::File => Box::new(FileRatingStore::new(&config.ratings_dir)),
        RatingStoreKind::Redis => {
            Box::new(RedisRatingStore::new(create_redis_client(&config.redis_url)?))
        }
    };
    tracing::debug!(backend = store.name(), "Rating store ready");
    Ok(store)
}

fn load_dataset(config: &Config) -> anyhow::Result<Arc<ReferenceDataset>> {
    let dataset = ReferenceDataset::load(&config.movies_path, &config.utility_matrix_path)
        .context("Failed to load reference dataset")?;
    Ok(Arc::new(dataset))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Search { query } => {
            let catalog = load_catalog_file(&config.movies_path)
                .context("Failed to load movie catalog")?;
            let results = search_titles(&catalog, &query);
            if results.is_empty() {
                println!("No match found.");
            }
            for movie in results {
                println!("{}", movie);
            }
        }
        Command::Rate {
            user,
            title,
            rating,
        } => {
            let store = rating_store(&config)?;
            let ratings = submit_rating(store.as_ref(), &user, &title, rating).await?;
            println!("{} has rated {} movie(s)", user.trim(), ratings.len());
        }
        Command::Ratings { user } => {
            let store = rating_store(&config)?;
            let ratings = store.load(&user).await?;
            for entry in ratings.entries() {
                println!("{}\t{}", entry.rating, entry.title);
            }
        }
        Command::Recommend {
            user,
            neighbors,
            limit,
            include_rated,
        } => {
            let dataset = load_dataset(&config)?;
            let store = rating_store(&config)?;
            let ratings = store.load(&user).await?;

            let mut options = config.recommend_options();
            if let Some(k) = neighbors {
                options.neighbors = k;
            }
            if let Some(n) = limit {
                options.limit = n;
            }
            if include_rated {
                options.exclude_rated = false;
            }

            let outcome = recommend(
                ratings.entries(),
                &dataset.utility,
                &dataset.catalog,
                &options,
            )?;

            for err in &outcome.unresolved {
                eprintln!("warning: {}", err);
            }
            if outcome.titles.is_empty() {
                println!("No recommendations. Rate a few more movies first.");
            }
            for title in &outcome.titles {
                println!("{}", title);
            }
        }
    }

    Ok(())
}
