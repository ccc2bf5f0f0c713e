use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, LevelFilter};
use structopt::StructOpt;

use boolidx::store::{self, LoadedIndex};
use boolidx::utils::time::print_time_elapsed;
use boolidx::{indexer, interchange, logging, retrieval, BoolConfig, CONFIG_FILE};
use boolidx_search::Searcher;

#[derive(StructOpt, Debug)]
#[structopt(name = "boolidx", about = "Compressed positional index and boolean retrieval")]
struct CliArgs {
    #[structopt(
        short,
        long = "config",
        parse(from_os_str),
        global = true,
        help = "Configuration file, boolidx.json in the working directory is used if present"
    )]
    config_file_path: Option<PathBuf>,
    #[structopt(long = "stop-words", parse(from_os_str), global = true, help = "Whitespace separated stop words")]
    stop_words_file_path: Option<PathBuf>,
    #[structopt(short, long, global = true)]
    verbose: bool,
    #[structopt(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[structopt(long, hidden = true, global = true)]
    perf: bool,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Builds the json index of a folder of .txt / .jsonl documents
    Index {
        #[structopt(parse(from_os_str))]
        corpus_folder_path: PathBuf,
        #[structopt(parse(from_os_str))]
        output_file_path: PathBuf,
    },
    /// Compresses a json index into a store folder
    Compress {
        #[structopt(parse(from_os_str))]
        index_file_path: PathBuf,
        #[structopt(parse(from_os_str))]
        store_folder_path: PathBuf,
    },
    /// Restores the json index from a store folder
    Decompress {
        #[structopt(parse(from_os_str))]
        store_folder_path: PathBuf,
        #[structopt(parse(from_os_str))]
        output_file_path: PathBuf,
    },
    /// Evaluates a json-lines query file, writing one `query_id doc rank score` line per match
    Search {
        #[structopt(parse(from_os_str))]
        store_folder_path: PathBuf,
        #[structopt(parse(from_os_str))]
        queries_file_path: PathBuf,
        #[structopt(parse(from_os_str))]
        output_file_path: PathBuf,
    },
    /// Evaluates a single expression, printing the matching documents
    Query {
        #[structopt(parse(from_os_str))]
        store_folder_path: PathBuf,
        expression: String,
    },
}

fn load_config(args: &CliArgs) -> Result<BoolConfig> {
    let default_config_path = Path::new(CONFIG_FILE);
    let config_file_path = match &args.config_file_path {
        Some(config_file_path) => Some(config_file_path.as_path()),
        None if default_config_path.is_file() => Some(default_config_path),
        None => None,
    };

    let mut config = BoolConfig::from_file(config_file_path).context("Failed to load the configuration")?;
    if let Some(stop_words_file_path) = &args.stop_words_file_path {
        config.set_stop_words_file(stop_words_file_path).context("Failed to load the stop words")?;
    }

    Ok(config)
}

fn get_level_override(args: &CliArgs) -> Option<LevelFilter> {
    if args.quiet {
        Some(LevelFilter::Error)
    } else if args.verbose || args.perf {
        Some(LevelFilter::Info)
    } else {
        None
    }
}

fn load_searcher(config: &BoolConfig, store_folder_path: &Path) -> Result<Searcher> {
    let loaded: LoadedIndex = store::load(store_folder_path)
        .with_context(|| format!("Failed to load the index at {}", store_folder_path.display()))?;
    let index = loaded.to_search_index();
    info!("Searching {} terms over {} documents", index.num_terms(), index.num_docs());
    Ok(Searcher::new(index, config.resolve_tokenizer()?))
}

fn main() -> Result<()> {
    let args: CliArgs = CliArgs::from_args();

    let config = load_config(&args)?;
    logging::init_logging(&config.log_config, get_level_override(&args))?;

    let now = if args.perf { Some(Instant::now()) } else { None };

    match &args.command {
        Command::Index { corpus_folder_path, output_file_path } => {
            let postings = indexer::index_folder(&config, corpus_folder_path, args.perf)
                .with_context(|| format!("Failed to index {}", corpus_folder_path.display()))?;
            interchange::write_index(&postings, output_file_path)?;
            info!("Indexed {} terms into {}", postings.len(), output_file_path.display());
        }
        Command::Compress { index_file_path, store_folder_path } => {
            let postings = interchange::read_index(index_file_path)?;
            print_time_elapsed(&now, "Index read");
            store::save(&postings, store_folder_path)
                .with_context(|| format!("Failed to save the index to {}", store_folder_path.display()))?;
        }
        Command::Decompress { store_folder_path, output_file_path } => {
            let loaded = store::load(store_folder_path)
                .with_context(|| format!("Failed to load the index at {}", store_folder_path.display()))?;
            print_time_elapsed(&now, "Index loaded");
            interchange::write_index(&loaded.postings, output_file_path)?;
        }
        Command::Search { store_folder_path, queries_file_path, output_file_path } => {
            let searcher = load_searcher(&config, store_folder_path)?;
            print_time_elapsed(&now, "Index loaded");
            retrieval::retrieve(
                &searcher,
                queries_file_path,
                output_file_path,
                config.search_config.num_threads,
                config.search_config.score,
            )?;
        }
        Command::Query { store_folder_path, expression } => {
            let searcher = load_searcher(&config, store_folder_path)?;
            let tree = searcher.parse_query(expression).with_context(|| format!("Invalid query \"{}\"", expression))?;
            info!("Parsed as {}", tree);

            let index = searcher.get_index();
            for doc_id in tree.evaluate(index, index.universe()) {
                if let Some(doc_name) = index.get_doc_name(doc_id) {
                    println!("{}", doc_name);
                }
            }
        }
    }

    print_time_elapsed(&now, "Total");
    Ok(())
}
