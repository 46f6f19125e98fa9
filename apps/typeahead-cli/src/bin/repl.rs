use std::io::{self, Write};
use std::time::Instant;

use typeahead_cli::{init_tracing, open_engine, print_engine_stats, print_results};
use typeahead_core::config::Config;
use typeahead_core::SearchOptions;
use typeahead_engine::SearchEngine;

/// Interactive search-as-you-type loop: one query per line.
fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut engine = open_engine(&config)?;

    println!("Typeahead REPL");
    println!("==============");
    println!("Items: {}  Debounce hint: {} ms", engine.len(), engine.config().debounce_millis);
    println!();
    show_help();

    repl(&mut engine)
}

fn repl(engine: &mut SearchEngine) -> anyhow::Result<()> {
    let mut options = SearchOptions::default();
    loop {
        print!("typeahead> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ').map_or((input, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("/help" | "/h", _) => show_help(),
            ("/stats" | "/s", _) => print_engine_stats(&engine.stats()),
            ("/category" | "/c", "") => println!("Category filter: {}", options.category.as_deref().unwrap_or("off")),
            ("/category" | "/c", "off") => {
                options.category = None;
                println!("Category filter off");
            }
            ("/category" | "/c", name) => {
                options.category = Some(name.to_string());
                println!("Category filter: {}", name);
            }
            ("/sub", _) => {
                options.include_sub_categories = !options.include_sub_categories;
                println!("Sub-categories: {}", if options.include_sub_categories { "on" } else { "off" });
            }
            ("/hot", _) => print_results(&engine.search("", &options)),
            ("/clear", _) => {
                engine.clear_cache();
                println!("Cache cleared");
            }
            ("/quit" | "/q" | "quit" | "exit", _) => break,
            _ => {
                let started = Instant::now();
                let results = engine.search(input, &options);
                print_results(&results);
                println!("  ({} in {:.2?})", results.len(), started.elapsed());
            }
        }
        println!();
    }
    Ok(())
}

fn show_help() {
    println!("Commands:");
    println!("  /help, /h              Show this help");
    println!("  /stats, /s             Engine and cache statistics");
    println!("  /category <name>|off   Filter by category");
    println!("  /sub                   Toggle sub-category inclusion");
    println!("  /hot                   Most popular items for the current filter");
    println!("  /clear                 Drop cached results");
    println!("  /quit, /q              Exit");
    println!("  <text>                 Suggest completions");
    println!();
}
