use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use lrc_engine::{CacheConfig, HttpTransport, QueryEngine};
use lrc_entity::{CompositeKey, EntityId, EntityKind};
use lrc_query::{
    favorites_request, popular_content_request, resource_request, similar_resources_request,
    user_list_items_request, user_lists_request, ListDefinition,
};
use lrc_select::{
    FavoritesSelector, MyListsSelector, PopularContentSelector, ResourceLookup, SimilarResourcesSelector,
    UserListItemsSelector,
};
use lrc_store::{shared, NormalizedStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn kind_and_id(name: &'static str) -> [Arg; 2] {
    [
        Arg::new("kind")
            .required(true)
            .value_parser(value_parser!(EntityKind))
            .help(format!("Resource kind ({name})")),
        Arg::new("id")
            .required(true)
            .value_parser(value_parser!(EntityId))
            .help("Resource id"),
    ]
}

fn cli() -> Command {
    Command::new("lrc")
        .version(lrc_engine::VERSION)
        .about("Learning resource cache client")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("TOML config file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Server origin, overrides the config file"),
        )
        .arg(
            Arg::new("user-id")
                .long("user-id")
                .global(true)
                .value_parser(value_parser!(EntityId))
                .help("Current user id, overrides the config file"),
        )
        .subcommand(Command::new("favorites").about("Fetch and print the favorites list"))
        .subcommand(
            Command::new("resource")
                .about("Fetch one resource")
                .args(kind_and_id("course, program, video, userlist, learningpath, podcast, podcastepisode")),
        )
        .subcommand(
            Command::new("list")
                .about("Fetch a named list")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .help("newCourses, upcomingCourses, featuredCourses, newVideos, allPodcasts or recentPodcastEpisodes"),
                )
                .arg(
                    Arg::new("pages")
                        .long("pages")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Pages to load for paginated lists"),
                ),
        )
        .subcommand(Command::new("my-lists").about("Fetch the current user's lists"))
        .subcommand(
            Command::new("items")
                .about("Fetch the items of one user list")
                .arg(
                    Arg::new("list-id")
                        .required(true)
                        .value_parser(value_parser!(EntityId))
                        .help("User list id"),
                ),
        )
        .subcommand(
            Command::new("similar")
                .about("Fetch resources similar to one resource")
                .args(kind_and_id("course, video, podcast, ...")),
        )
        .subcommand(Command::new("popular").about("Fetch popular content"))
}

fn load_config(matches: &ArgMatches) -> Result<CacheConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => CacheConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => CacheConfig::default(),
    };
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(user_id) = matches.get_one::<EntityId>("user-id") {
        config = config.with_current_user_id(user_id.clone());
    }
    config.validate()?;
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn composite_key(args: &ArgMatches) -> Result<CompositeKey> {
    let kind = args.get_one::<EntityKind>("kind").context("missing kind")?;
    let id = args.get_one::<EntityId>("id").context("missing id")?;
    Ok(CompositeKey::new(*kind, id.clone()))
}

async fn run(matches: &ArgMatches, config: &CacheConfig, engine: &QueryEngine) -> Result<()> {
    match matches.subcommand() {
        Some(("favorites", _)) => {
            engine.query(favorites_request()).await?;
            print_json(&*engine.select(&FavoritesSelector::new()))
        }
        Some(("resource", args)) => {
            let key = composite_key(args)?;
            engine.query(resource_request(key.kind, key.id.clone())).await?;

            let lookup = ResourceLookup::new(config.lookup_cache_capacity);
            match engine.read(|store| lookup.get_by_key(store, &key)) {
                Some(record) => print_json(&*record),
                None => bail!("{key} not found in the response"),
            }
        }
        Some(("list", args)) => {
            let name = args.get_one::<String>("name").context("missing list name")?;
            let pages = args.get_one::<usize>("pages").copied().unwrap_or(1);
            let list = ListDefinition::by_name(name)?;

            engine.query(list.query()).await?;
            for _ in 1..pages {
                let Some(next) = engine.read(|store| list.next_url(store)) else {
                    break;
                };
                engine.query(list.next_page_query(next)).await?;
            }
            print_json(&*engine.select(&list.selector()))
        }
        Some(("my-lists", _)) => {
            let Some(user_id) = config.current_user_id.clone() else {
                bail!("my-lists needs a user id (--user-id or current_user_id in the config)");
            };
            engine.query(user_lists_request()).await?;
            print_json(&*engine.select(&MyListsSelector::new(user_id)))
        }
        Some(("items", args)) => {
            let list_id = args.get_one::<EntityId>("list-id").context("missing list id")?;
            engine.query(user_list_items_request(list_id.clone())).await?;
            print_json(&*engine.select(&UserListItemsSelector::new(list_id.clone())))
        }
        Some(("similar", args)) => {
            let key = composite_key(args)?;
            engine.query(similar_resources_request(key.clone())).await?;
            print_json(&*engine.select(&SimilarResourcesSelector::new(key)))
        }
        Some(("popular", _)) => {
            engine.query(popular_content_request()).await?;
            print_json(&*engine.select(&PopularContentSelector::new()))
        }
        _ => bail!("unknown command"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    tracing::debug!("Using server {}", config.base_url);

    let transport = HttpTransport::from_config(&config)?;
    let engine = QueryEngine::with_status_capacity(
        shared(NormalizedStore::new()),
        Arc::new(transport),
        config.status_capacity,
    );

    run(&matches, &config, &engine).await
}
