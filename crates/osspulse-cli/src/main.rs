use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use osspulse_api::HnClient;
use osspulse_core::{
    feed, tags, CategoryFilter, Config, FilterState, ProjectStore, SortOrder, TagId, TagLogic,
};
use osspulse_store::SettingsStore;

#[derive(Parser)]
#[command(name = "osspulse")]
#[command(version, about = "Terminal browser for open-source projects on Hacker News", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Browse the feed interactively (the default)
    Browse,
    /// Print one page of the filtered feed
    List {
        /// Category filter: all, new or popular
        #[arg(long, default_value = "all")]
        category: String,
        /// Tag to filter on; repeat for multiple tags
        #[arg(long)]
        tag: Vec<String>,
        /// How multiple tags combine: or (any) / and (all)
        #[arg(long, default_value = "or")]
        logic: String,
        /// Substring to search titles for
        #[arg(long)]
        search: Option<String>,
        /// Sort order: latest, popular or comments
        #[arg(long, default_value = "latest")]
        sort: String,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show tag counts over the current feed
    Tags,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "osspulse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::List {
            category,
            tag,
            logic,
            search,
            sort,
            page,
        }) => {
            list_feed(&config, &category, &tag, &logic, search.as_deref(), &sort, page).await?;
        }
        Some(Commands::Tags) => {
            show_tags(&config).await?;
        }
        Some(Commands::Browse) | None => {
            let db_path = Config::settings_db_path().context("Failed to locate data directory")?;
            let settings =
                SettingsStore::open(db_path).context("Failed to open settings store")?;
            osspulse_tui::run_tui(config, settings).await?;
        }
    }

    Ok(())
}

async fn load_feed(config: &Config) -> anyhow::Result<Vec<osspulse_core::Project>> {
    let client = HnClient::with_base_url(config.api.base_url.clone());
    let projects = feed::load_projects(&client, config.feed.limit)
        .await
        .context("Failed to load the project feed")?;
    Ok(projects)
}

async fn list_feed(
    config: &Config,
    category: &str,
    tag_args: &[String],
    logic: &str,
    search: Option<&str>,
    sort: &str,
    page: usize,
) -> anyhow::Result<()> {
    let mut state = FilterState::default();
    state.category = CategoryFilter::parse(category);
    state.tag_logic = TagLogic::parse(logic);
    state.sort_order = SortOrder::parse(sort);
    state.current_page = page.max(1);
    if let Some(query) = search {
        state.set_search(query);
    }
    for raw in tag_args {
        match TagId::parse(raw) {
            Some(tag) => state.active_tags.push(tag),
            None => tracing::warn!("Ignoring unknown tag: {}", raw),
        }
    }

    let projects = load_feed(config).await?;
    let mut store =
        ProjectStore::with_state(state).with_page_size(config.feed.page_size);
    store.set_projects(projects, chrono::Utc::now().timestamp());

    let current = store.current_page();
    if current.items.is_empty() {
        println!("No projects match the given filters.");
        return Ok(());
    }

    println!("Page {} of {}\n", current.page, current.total_pages);
    for project in &current.items {
        let date = chrono::DateTime::from_timestamp(project.time, 0)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let tag_names: Vec<&str> = project
            .tags
            .iter()
            .map(|&t| osspulse_core::models::tag_definition(t).name)
            .collect();

        println!(
            "  {:>9}  ▲{:<4} 💬{:<4} {}  {}",
            project.id,
            project.score,
            project.comment_count(),
            date,
            project.title
        );
        if let Some(url) = &project.url {
            println!("             {}", url);
        }
        if !tag_names.is_empty() {
            println!("             [{}]", tag_names.join(", "));
        }
    }

    Ok(())
}

async fn show_tags(config: &Config) -> anyhow::Result<()> {
    let projects = load_feed(config).await?;
    let counts = tags::tag_counts(&projects);

    println!("Tag counts over {} projects:\n", projects.len());
    for def in tags::sorted_catalog(osspulse_core::TagSortMode::Count, &counts) {
        let count = counts.get(&def.id).copied().unwrap_or(0);
        println!("  {} {:<8} {}", def.icon, def.name, count);
    }

    Ok(())
}
