use anyhow::{Context, Result, anyhow};
use cf::{
    ItemBasedRecommender, RecommendConfig, Recommender, ScoredItem, SimilarityCache,
    SimilarityMatrix, UserBasedRecommender, Weighting, similarity_matrix,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use evaluation::Evaluator;
use ratings::{ParseOptions, RatingStore, SplitConfig, UserId, parse_ratings, split_ratings};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// CfRecs - Collaborative Filtering Recommendation Engine
#[derive(Parser)]
#[command(name = "cf-recs")]
#[command(about = "Item recommendations via collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the delimited rating file (user, item, score[, timestamp])
    #[arg(short, long, default_value = "data/ml-1m/ratings.dat")]
    data: PathBuf,

    /// Field separator used in the rating file
    #[arg(long, default_value = "::")]
    separator: String,

    /// Skip the first line of the rating file (column header)
    #[arg(long)]
    has_header: bool,

    /// Test fold selector: a seeded draw in 0..=M equal to K marks a test record
    #[arg(long, default_value = "8")]
    split_m: u32,

    /// Selected test fold
    #[arg(long, default_value = "3")]
    split_k: u32,

    /// Seed for the train/test split
    #[arg(long, default_value = "47")]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get item recommendations for a user
    Recommend {
        /// User ID to recommend for
        #[arg(long)]
        user_id: UserId,

        /// Size of the similarity neighborhood
        #[arg(long, default_value = "8")]
        neighbors: usize,

        /// Number of items to return
        #[arg(long, default_value = "10")]
        results: usize,

        /// Use item-item similarity instead of user-user similarity
        #[arg(long)]
        item_based: bool,

        /// Disable the popularity penalty on the similarity weighting
        #[arg(long)]
        plain: bool,

        /// Optional JSON cache file for the similarity matrix
        #[arg(long)]
        cache: Option<PathBuf>,
    },

    /// Show a user's training profile
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// List the entities most similar to a user (or an item with --item-based)
    Similar {
        /// User or item ID to look up
        #[arg(long)]
        entity_id: u32,

        /// Number of neighbors to show
        #[arg(long, default_value = "10")]
        count: usize,

        /// Look up item-item similarity instead of user-user similarity
        #[arg(long)]
        item_based: bool,

        /// Disable the popularity penalty on the similarity weighting
        #[arg(long)]
        plain: bool,
    },

    /// Evaluate precision, recall, coverage and popularity on the test split
    Evaluate {
        /// Size of the similarity neighborhood
        #[arg(long, default_value = "8")]
        neighbors: usize,

        /// Number of items recommended per user
        #[arg(long, default_value = "10")]
        results: usize,

        /// Use item-item similarity instead of user-user similarity
        #[arg(long)]
        item_based: bool,

        /// Disable the popularity penalty on the similarity weighting
        #[arg(long)]
        plain: bool,

        /// Sweep a grid of neighborhood and result sizes instead of one run
        #[arg(long)]
        sweep: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load and split the rating data (this may take a moment)
    println!("Loading ratings from {}...", cli.data.display());
    let start = Instant::now();
    let options = ParseOptions {
        separator: cli.separator.clone(),
        has_header: cli.has_header,
    };
    let records = parse_ratings(&cli.data, &options)
        .with_context(|| format!("Failed to load rating file {}", cli.data.display()))?;
    let split = SplitConfig {
        m: cli.split_m,
        k: cli.split_k,
        seed: cli.seed,
    };
    let (train, test) = split_ratings(&records, split);
    let train = Arc::new(train);
    println!(
        "{} Loaded {} ratings ({} train / {} test) in {:?}",
        "✓".green(),
        records.len(),
        train.rating_count(),
        test.rating_count(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            neighbors,
            results,
            item_based,
            plain,
            cache,
        } => handle_recommend(train, user_id, neighbors, results, item_based, plain, cache)?,
        Commands::User { user_id } => handle_user(&train, &test, user_id)?,
        Commands::Similar {
            entity_id,
            count,
            item_based,
            plain,
        } => handle_similar(&train, entity_id, count, item_based, plain)?,
        Commands::Evaluate {
            neighbors,
            results,
            item_based,
            plain,
            sweep,
        } => handle_evaluate(train, &test, neighbors, results, item_based, plain, sweep)?,
    }

    Ok(())
}

/// Cache key: the store fingerprint combined with the matrix parameters, so
/// switching orientation or weighting never serves the wrong matrix
fn cache_key(store: &RatingStore, item_based: bool, weighting: Weighting) -> u64 {
    let mut hasher = DefaultHasher::new();
    store.fingerprint().hash(&mut hasher);
    item_based.hash(&mut hasher);
    matches!(weighting, Weighting::InverseLogFrequency).hash(&mut hasher);
    hasher.finish()
}

/// Build the similarity matrix for one orientation, through the cache when
/// one is configured
fn build_similarity(
    train: &RatingStore,
    item_based: bool,
    weighting: Weighting,
    cache: Option<PathBuf>,
) -> Result<SimilarityMatrix> {
    let start = Instant::now();

    let compute = || {
        if item_based {
            similarity_matrix(train.by_item(), weighting)
        } else {
            similarity_matrix(train.by_user(), weighting)
        }
    };

    let matrix = match cache {
        Some(path) => SimilarityCache::new(path)
            .load_or_compute(cache_key(train, item_based, weighting), compute)?,
        None => compute(),
    };

    println!(
        "{} Similarity matrix over {} entities ready in {:?}",
        "✓".green(),
        matrix.entity_count(),
        start.elapsed()
    );
    Ok(matrix)
}

/// Handle the 'recommend' command
fn handle_recommend(
    train: Arc<RatingStore>,
    user_id: UserId,
    neighbors: usize,
    results: usize,
    item_based: bool,
    plain: bool,
    cache: Option<PathBuf>,
) -> Result<()> {
    let config = RecommendConfig {
        neighbor_count: neighbors,
        result_count: results,
        popularity_penalty: !plain,
    };
    config.validate().map_err(|e| anyhow!(e))?;

    if train.user_ratings(user_id).is_none() {
        return Err(anyhow!("User {} not found in the training data", user_id));
    }

    let matrix = build_similarity(&train, item_based, config.weighting(), cache)?;

    let ranked = if item_based {
        ItemBasedRecommender::new(train, matrix).recommend(
            user_id,
            config.neighbor_count,
            config.result_count,
        )
    } else {
        UserBasedRecommender::new(train, matrix).recommend(
            user_id,
            config.neighbor_count,
            config.result_count,
        )
    };

    print_recommendations(user_id, &ranked);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(train: &RatingStore, test: &RatingStore, user_id: UserId) -> Result<()> {
    let profile = train
        .user_ratings(user_id)
        .ok_or_else(|| anyhow!("User {} not found in the training data", user_id))?;

    print!("{}", format!("User ID: {}\n", user_id).bold().blue());
    print!("{}Training ratings: {}\n", "• ".green(), profile.len());
    print!(
        "{}Test ratings: {}\n",
        "• ".green(),
        test.user_ratings(user_id).map_or(0, |items| items.len())
    );

    let avg_score = profile.values().map(|&s| s as f64).sum::<f64>() / profile.len() as f64;
    print!("{}Average score: {:.2}\n", "• ".cyan(), avg_score);

    // Top rated items
    let mut top_rated: Vec<_> = profile.iter().collect();
    top_rated.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    print!("Top rated items:\n");
    for (item_id, score) in top_rated.iter().take(5) {
        print!("  - item {} (score: {})\n", item_id, score);
    }

    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(
    train: &RatingStore,
    entity_id: u32,
    count: usize,
    item_based: bool,
    plain: bool,
) -> Result<()> {
    let weighting = if plain {
        Weighting::Uniform
    } else {
        Weighting::InverseLogFrequency
    };

    let matrix = build_similarity(train, item_based, weighting, None)?;
    let kind = if item_based { "item" } else { "user" };

    let neighbors = matrix.top_k(entity_id, count);
    if neighbors.is_empty() {
        println!("No neighbors found for {} {}", kind, entity_id);
        return Ok(());
    }

    println!(
        "{}",
        format!("Most similar {}s to {} {}:", kind, kind, entity_id)
            .bold()
            .blue()
    );
    for (rank, (neighbor, similarity)) in neighbors.iter().enumerate() {
        println!(
            "{}. {} {} - similarity {:.4}",
            (rank + 1).to_string().green(),
            kind,
            neighbor,
            similarity
        );
    }

    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(
    train: Arc<RatingStore>,
    test: &RatingStore,
    neighbors: usize,
    results: usize,
    item_based: bool,
    plain: bool,
    sweep: bool,
) -> Result<()> {
    let base = RecommendConfig {
        neighbor_count: neighbors,
        result_count: results,
        popularity_penalty: !plain,
    };
    base.validate().map_err(|e| anyhow!(e))?;

    let matrix = build_similarity(&train, item_based, base.weighting(), None)?;

    if item_based {
        let recommender = ItemBasedRecommender::new(train.clone(), matrix);
        run_evaluation(&recommender, &train, test, base, sweep)
    } else {
        let recommender = UserBasedRecommender::new(train.clone(), matrix);
        run_evaluation(&recommender, &train, test, base, sweep)
    }
}

fn run_evaluation<R: Recommender>(
    recommender: &R,
    train: &RatingStore,
    test: &RatingStore,
    base: RecommendConfig,
    sweep: bool,
) -> Result<()> {
    let evaluator = Evaluator::new(recommender, train, test);

    if !sweep {
        let start = Instant::now();
        let report = evaluator.evaluate(&base).map_err(|e| anyhow!(e))?;
        println!(
            "{} Evaluated {} users in {:?}",
            "✓".green(),
            report.users_evaluated,
            start.elapsed()
        );
        println!("{}", "Evaluation results:".bold().blue());
        println!("  Precision:  {}", format_metric(report.precision));
        println!("  Recall:     {}", format_metric(report.recall));
        println!("  Coverage:   {}", format_metric(report.coverage));
        println!("  Popularity: {}", format_metric(report.popularity));
        return Ok(());
    }

    // Grid sweep over neighborhood and result sizes
    println!("{}", "Evaluation sweep:".bold().blue());
    for neighbor_count in (5..=10).step_by(1) {
        for result_count in (10..=20).step_by(2) {
            let config = RecommendConfig {
                neighbor_count,
                result_count,
                ..base
            };
            let report = evaluator.evaluate(&config).map_err(|e| anyhow!(e))?;
            println!(
                "  K={:2} N={:2}  precision={}  recall={}",
                neighbor_count,
                result_count,
                format_metric(report.precision),
                format_metric(report.recall)
            );
        }
    }
    Ok(())
}

/// Render an optional metric, showing an undefined denominator explicitly
fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "undefined".yellow().to_string(),
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(user_id: UserId, ranked: &[ScoredItem]) {
    if ranked.is_empty() {
        println!("No recommendations for user {} (cold start?)", user_id);
        return;
    }

    print!(
        "{}",
        format!("Recommendations for user {}:\n", user_id).bold().blue()
    );
    for (rank, entry) in ranked.iter().enumerate() {
        println!(
            "{}. item {} - score {:.3}",
            (rank + 1).to_string().green(),
            entry.item_id,
            entry.score
        );
    }
}
