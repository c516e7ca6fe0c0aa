use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_watchlist::config::Config;

#[derive(Parser, Debug)]
#[command(name = "movie-watchlist")]
#[command(about = "Movie search proxy and watchlist", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "movie-watchlist.yaml")]
    config: String,

    /// Log at debug level.
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the proxy server (default).
    Serve,
    /// Search for movies through the proxy and print the results.
    Search {
        title: String,
        /// Number of result pages to show.
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
        /// Add these IMDb ids to the watchlist.
        #[arg(short, long)]
        add: Vec<String>,
    },
    /// Print the watchlist.
    Watchlist {
        /// Remove these IMDb ids first.
        #[arg(short, long)]
        remove: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "movie_watchlist=debug,tower_http=debug"
    } else {
        "movie_watchlist=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match Config::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    config.debug_logs = args.debug;

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => movie_watchlist::run(config).await.map_err(|e| e.to_string()),
        Command::Search { title, pages, add } => {
            movie_watchlist::commands::search(&config, &title, pages, &add)
                .await
                .map(|html| println!("{}", html))
                .map_err(|e| e.to_string())
        }
        Command::Watchlist { remove } => {
            println!("{}", movie_watchlist::commands::watchlist(&config, &remove));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
