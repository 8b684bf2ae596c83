use std::{env, fs::read_to_string, process::exit, time::Instant};

use log::info;
use tila::{
    display_error,
    lexer::lexer::tokenize,
    parser::{config::ParserConfig, parser::parse_with_config},
};

struct Options {
    file_path: String,
    show_tokens: bool,
    config: ParserConfig,
}

fn usage() -> ! {
    println!("Usage: tila <file.tila> [options]");
    println!();
    println!("Options:");
    println!("  --tokens          List the tokens before parsing");
    println!("  --indent <n>      Columns per indentation level (default: 2)");
    println!("  --max-depth <n>   Maximum expression nesting (default: 256)");
    exit(2);
}

fn numeric_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let idx = args.iter().position(|a| a == flag)?;
    match args.get(idx + 1).map(|value| value.parse()) {
        Some(Ok(value)) => Some(value),
        _ => {
            eprintln!("{} expects a number", flag);
            usage()
        }
    }
}

fn parse_args(args: &[String]) -> Options {
    let file_path = match args.get(1) {
        Some(path) if !path.starts_with("--") => path.clone(),
        _ => usage(),
    };

    let mut config = ParserConfig::default();
    if let Some(width) = numeric_flag(args, "--indent") {
        config = config.with_indent_width(width);
    }
    if let Some(depth) = numeric_flag(args, "--max-depth") {
        config = config.with_max_depth(depth);
    }

    Options {
        file_path,
        show_tokens: args.iter().any(|a| a == "--tokens"),
        config,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let file_name = options
        .file_path
        .rsplit('/')
        .next()
        .unwrap_or(&options.file_path);

    let source = match read_to_string(&options.file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", options.file_path, error);
            exit(1);
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &source, file_name);
            exit(1);
        }
    };

    info!("Tokenized in {:?}", start.elapsed());

    if options.show_tokens {
        for token in &tokens {
            println!("{}", token.describe(&source));
        }
    }

    let parse_start = Instant::now();
    let ast = match parse_with_config(&tokens, &source, options.config) {
        Ok(ast) => ast,
        Err(error) => {
            display_error(&error, &source, file_name);
            exit(1);
        }
    };

    info!("Parsed in {:?}", parse_start.elapsed());

    for node in &ast {
        println!("{}", node);
    }

    info!("Total time: {:?}", start.elapsed());
}
