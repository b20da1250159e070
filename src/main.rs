#[macro_use]
extern crate clap;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::Context;
use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

use lispc::parser::parse;
use lispc::tok::tokenize;
use lispc::transform::transform;
use lispc::compile;

const SAMPLE_PROGRAM: &str = "(add 2 (subtract 4 2))";

fn main() {
    let matches = clap_app!(lispc =>
        (version: "0.1")
        (author: "ocamlmycaml")
        (about: "Compiles lisp-style calls into call-expression syntax")
        (@arg INPUT: "Source file to compile, `-` for stdin (default: a built-in sample)")
        (@subcommand tokenize =>
            (about: "Tokenize the input and print out the tokens")
        )
        (@subcommand parse =>
            (about: "Parse the input and print the source tree")
        )
        (@subcommand transform =>
            (about: "Transform the input and print the target tree")
        )
        (@subcommand compile =>
            (about: "Compile the input and print the generated code (default)")
        )
    )
    .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&matches) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let source = read_source(matches.value_of("INPUT"))?;

    match matches.subcommand_name() {
        Some("tokenize") => print_tokens(&source)?,
        Some("parse") => {
            let program = parse(&tokenize(&source)?)?;
            println!("{:#?}", program);
        }
        Some("transform") => {
            let target = transform(&parse(&tokenize(&source)?)?)?;
            println!("{:#?}", target);
        }
        _ => println!("{}", compile(&source)?),
    }

    Ok(())
}

fn print_tokens(source: &str) -> anyhow::Result<()> {
    let tokens = tokenize(source)?;

    let mut tabs = 0usize;
    for token_and_span in &tokens {
        // if we encounter a ), reduce tabs before printing
        if token_and_span.token.is_close_paren() {
            tabs = tabs.saturating_sub(1);
        }

        println!("{}{}", "\t".repeat(tabs), token_and_span);

        // if we encounter a (, increase tabs
        if token_and_span.token.is_open_paren() {
            tabs += 1;
        }
    }

    Ok(())
}

fn read_source(input: Option<&str>) -> anyhow::Result<String> {
    match input {
        None => Ok(String::from(SAMPLE_PROGRAM)),
        Some("-") => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("couldn't read stdin")?;
            Ok(source)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("couldn't open {}", path)),
    }
}
