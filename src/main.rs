use clap::{Parser, Subcommand};
use helpsearch::kernel::search::{IndexedPages, Locale, SearchIndex};
use helpsearch::kernel::services::adapters::{
    ensure_settings_file, load_settings, SearchRequest, SearchService,
};
use helpsearch::kernel::services::ports::{SearchMessage, SearchSettings};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Arc;

mod logging;

#[derive(Debug, Parser)]
#[command(name = "helpsearch", version, about = "Query a help-set full-text search index")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a query against an index file
    Query {
        /// Index XML file (falls back to `index_path` from settings)
        #[arg(short, long)]
        index: Option<PathBuf>,
        /// Query text
        text: String,
        #[arg(short, long, overrides_with = "no_case_sensitive")]
        case_sensitive: bool,
        /// Ignore case even if settings enable case-sensitive search
        #[arg(long, overrides_with = "case_sensitive")]
        no_case_sensitive: bool,
        /// Match whole words only
        #[arg(short, long, overrides_with = "no_exact")]
        exact: bool,
        /// Match substrings even if settings enable exact search
        #[arg(long, overrides_with = "exact")]
        no_exact: bool,
        #[arg(short, long)]
        locale: Option<String>,
    },
    /// Load an index and report whether it is valid
    Check { index: PathBuf },
    /// Print index statistics
    Stats { index: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logging = logging::init(cli.verbose);
    if let Some(dir) = logging.as_ref().and_then(|guard| guard.log_dir()) {
        tracing::debug!(log_dir = %dir.display(), "writing log file");
    }
    if let Err(e) = ensure_settings_file() {
        tracing::error!(error = %e, "ensure_settings_file failed");
    }
    let settings = load_settings().unwrap_or_default();

    let ok = match cli.command {
        Command::Query {
            index,
            text,
            case_sensitive,
            no_case_sensitive,
            exact,
            no_exact,
            locale,
        } => {
            let Some(index_path) = index.or_else(|| settings.index_path.clone()) else {
                tracing::error!("no index file given and none configured");
                return ExitCode::FAILURE;
            };
            let request = build_request(
                text,
                switch(case_sensitive, no_case_sensitive),
                switch(exact, no_exact),
                locale,
                &settings,
            );
            run_query(&index_path, request, &settings)
        }
        Command::Check { index } => load(&index).is_some(),
        Command::Stats { index } => match load(&index) {
            Some(index) => {
                let stats = index.stats();
                println!("contexts: {}", stats.contexts);
                println!("entries:  {}", stats.items);
                println!("pages:    {}", stats.pages);
                true
            }
            None => false,
        },
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// `--flag` / `--no-flag` 对；都未给出时返回 None，沿用配置
fn switch(on: bool, off: bool) -> Option<bool> {
    if on {
        Some(true)
    } else if off {
        Some(false)
    } else {
        None
    }
}

fn build_request(
    text: String,
    case_sensitive: Option<bool>,
    exact: Option<bool>,
    locale: Option<String>,
    settings: &SearchSettings,
) -> SearchRequest {
    let locale = locale.unwrap_or_else(|| settings.locale.clone());
    SearchRequest::new(text)
        .case_sensitive(case_sensitive.unwrap_or(settings.case_sensitive))
        .exact(exact.unwrap_or(settings.exact))
        .locale(Locale::new(locale))
}

fn load(path: &Path) -> Option<SearchIndex> {
    match SearchIndex::load_path(path) {
        Ok(index) => Some(index),
        Err(error) => {
            tracing::error!(path = %path.display(), error = %error, "load index failed");
            None
        }
    }
}

fn run_query(path: &Path, request: SearchRequest, settings: &SearchSettings) -> bool {
    let Some(index) = load(path) else {
        return false;
    };
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(error = %error, "build runtime failed");
            return false;
        }
    };

    let index = Arc::new(index);
    let pages = Arc::new(IndexedPages::from_index(&index));
    let service = SearchService::new(runtime.handle().clone(), index.clone(), pages);
    let (tx, rx) = mpsc::sync_channel(64);
    let task = service.start(request, tx);

    for message in rx {
        if message.search_id() != task.id() {
            continue;
        }
        let done = message.is_final();
        let ok = match message {
            SearchMessage::Progress { percent, .. } => {
                tracing::debug!(percent, "scanning");
                true
            }
            SearchMessage::Complete {
                match_count,
                results,
                ..
            } => {
                println!("{} matches found", match_count);
                for result in results.iter().take(settings.max_results) {
                    let Some(highlighted) = result.highlight(&index) else {
                        continue;
                    };
                    println!(
                        "{}: {}",
                        result.page(),
                        highlighted.render(&settings.highlight_open, &settings.highlight_close)
                    );
                }
                true
            }
            SearchMessage::Cancelled { .. } => {
                tracing::warn!("search cancelled");
                false
            }
            SearchMessage::Failed { error, .. } => {
                tracing::error!(error = %error, "search failed");
                false
            }
        };
        if done {
            return ok;
        }
    }
    false
}

#[cfg(test)]
#[path = "../tests/unit/main.rs"]
mod tests;
