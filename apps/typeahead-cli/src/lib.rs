//! Shared setup and formatting for the `typeahead` binaries.

use anyhow::anyhow;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use typeahead_core::{load_catalog, CategoryStat, Config, RankedResult, ReadingTable, SearchOptions};
use typeahead_engine::{EngineStats, SearchEngine};

/// Log to stderr so stdout carries only results. `RUST_LOG` overrides `info`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build an engine from `[search]`, `[catalog] path` and the optional
/// `[phonetic] readings` table.
pub fn open_engine(config: &Config) -> anyhow::Result<SearchEngine> {
    let search = config.search()?;
    let catalog = config
        .path("catalog.path")?
        .ok_or_else(|| anyhow!("no catalog configured: set [catalog] path or TYPEAHEAD_CATALOG__PATH"))?;
    let items = load_catalog(&catalog)?;
    let readings = match config.path("phonetic.readings")? {
        Some(path) => ReadingTable::load(&path)?,
        None => ReadingTable::new(),
    };
    Ok(SearchEngine::new(items, search, readings))
}

#[derive(Debug, Default, PartialEq)]
pub struct QueryArgs {
    pub text: String,
    pub options: SearchOptions,
    pub with_stats: bool,
    pub json: bool,
}

/// Parse `<words...> [--category C] [--categories a,b] [--sub] [--stats] [--json]`.
pub fn parse_query_args(args: &[String]) -> anyhow::Result<QueryArgs> {
    let mut parsed = QueryArgs::default();
    let mut words = Vec::new();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--category" | "-c" => {
                let value = it.next().ok_or_else(|| anyhow!("{arg} needs a category name"))?;
                parsed.options.category = Some(value.clone());
            }
            "--categories" => {
                let value = it.next().ok_or_else(|| anyhow!("--categories needs a comma-separated list"))?;
                parsed.options.categories =
                    value.split(',').map(str::trim).filter(|c| !c.is_empty()).map(str::to_string).collect();
            }
            "--sub" => parsed.options.include_sub_categories = true,
            "--stats" => parsed.with_stats = true,
            "--json" => parsed.json = true,
            _ => words.push(arg.as_str()),
        }
    }
    parsed.text = words.join(" ");
    Ok(parsed)
}

pub fn print_results(results: &[RankedResult]) {
    if results.is_empty() {
        println!("  (no suggestions)");
        return;
    }
    for (i, r) in results.iter().enumerate() {
        println!(
            "  {}. {}  [{}]  {} raw={:.0} score={:.2}  id={}",
            i + 1,
            r.item.text,
            r.item.category,
            r.kind,
            r.raw_score,
            r.final_score,
            r.item.id
        );
    }
}

pub fn print_category_stats(stats: &[CategoryStat]) {
    println!("  by category:");
    for s in stats {
        println!("    {}: {}", s.category, s.count);
    }
}

pub fn print_engine_stats(stats: &EngineStats) {
    println!("Items: {}  Categories: {}", stats.total_items, stats.total_categories);
    println!(
        "Cache: {} entries, {} hits, {} misses  Classifications: {}",
        stats.cache_len, stats.cache_hits, stats.cache_misses, stats.classifications
    );
    for c in &stats.categories {
        println!("  {}: {}", c.category, c.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn words_and_flags() {
        let parsed = parse_query_args(&args(&["mac", "book", "--category", "Laptops", "--sub", "--stats"])).expect("parse");
        assert_eq!(parsed.text, "mac book");
        assert_eq!(parsed.options.category.as_deref(), Some("Laptops"));
        assert!(parsed.options.include_sub_categories);
        assert!(parsed.with_stats);
        assert!(!parsed.json);
    }

    #[test]
    fn category_list_is_split_and_trimmed() {
        let parsed = parse_query_args(&args(&["--categories", "Android, Phones,,", "pix"])).expect("parse");
        assert_eq!(parsed.options.categories, vec!["Android".to_string(), "Phones".to_string()]);
        assert_eq!(parsed.text, "pix");
    }

    #[test]
    fn dangling_flag_is_an_error() {
        assert!(parse_query_args(&args(&["pix", "--category"])).is_err());
    }
}
