use std::env;

use typeahead_cli::{init_tracing, open_engine, parse_query_args, print_category_stats, print_engine_stats, print_results, QueryArgs};
use typeahead_core::config::Config;
use typeahead_engine::SearchEngine;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <query|hot|stats> [text...] [--category C] [--categories a,b] [--sub] [--stats] [--json]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn run(engine: &mut SearchEngine, query: &QueryArgs) -> anyhow::Result<()> {
    if query.with_stats {
        let report = engine.search_with_category_stats(&query.text, &query.options);
        if query.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_results(&report.results);
            print_category_stats(&report.category_stats);
        }
    } else {
        let results = engine.search(&query.text, &query.options);
        if query.json {
            println!("{}", serde_json::to_string_pretty(&*results)?);
        } else {
            print_results(&results);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (cmd, args) = parse_args();
    let mut engine = open_engine(&config)?;
    match cmd.as_str() {
        "query" => {
            let query = parse_query_args(&args)?;
            if query.text.trim().is_empty() {
                eprintln!("Usage: typeahead query <text> [--category C] [--categories a,b] [--sub] [--stats] [--json]");
                std::process::exit(1);
            }
            run(&mut engine, &query)?;
        }
        "hot" => {
            let mut query = parse_query_args(&args)?;
            query.text.clear();
            run(&mut engine, &query)?;
        }
        "stats" => print_engine_stats(&engine.stats()),
        _ => { eprintln!("Unknown command: {}", cmd); std::process::exit(1); }
    }
    Ok(())
}
