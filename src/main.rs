use clap::{Parser, Subcommand};
use log::debug;
use std::io::Read;

use deslop::clipboard;
use deslop::config::{compile_rules, load_config};
use deslop::html::{replace_in_html, strip_tags};
use deslop::rules::Rule;
use deslop::text::apply_rules;

#[derive(Parser)]
#[command(name = "deslop", about = "Rewrite AI-flavored phrasing out of text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite plain text from an argument or stdin
    Text {
        /// Text to rewrite; reads stdin when omitted
        input: Option<String>,
        /// Copy the result to the clipboard instead of printing it
        #[arg(long)]
        copy: bool,
    },
    /// Rewrite the text of an HTML fragment, keeping allowed markup intact
    Html {
        /// HTML to rewrite; reads stdin when omitted
        input: Option<String>,
        /// Emit plain text with markup stripped
        #[arg(long)]
        plain: bool,
        /// Copy the result to the clipboard instead of printing it
        #[arg(long)]
        copy: bool,
    },
}

fn read_input(arg: Option<String>) -> String {
    match arg {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("Failed to read stdin: {e}");
                std::process::exit(1);
            }
            buffer
        }
    }
}

fn emit(output: &str, copy: bool) {
    if copy {
        if let Err(e) = clipboard::copy(output) {
            eprintln!("wl-copy failed: {e}");
            std::process::exit(1);
        }
    } else {
        println!("{output}");
    }
}

fn run_text(input: Option<String>, copy: bool, rules: &[Rule]) {
    let text = read_input(input);
    debug!("raw: {text}");
    let replaced = apply_rules(&text, rules);
    debug!("replaced: {replaced}");
    emit(&replaced, copy);
}

fn run_html(input: Option<String>, plain: bool, copy: bool, rules: &[Rule]) {
    let html = read_input(input);
    match replace_in_html(&html, rules) {
        Ok(replaced) => {
            debug!("replaced: {replaced}");
            let output = if plain { strip_tags(&replaced) } else { replaced };
            emit(&output, copy);
        }
        Err(e) => {
            eprintln!("Failed to process HTML: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = load_config();
    let rules = compile_rules(&config);

    match cli.command {
        Commands::Text { input, copy } => run_text(input, copy, &rules),
        Commands::Html { input, plain, copy } => run_html(input, plain, copy, &rules),
    }
}
