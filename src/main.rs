use std::{
    fs::{read_to_string, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::exit,
    rc::Rc,
    time::Instant,
};

use clap::Parser;
use cminus::{
    analyzer::analyzer::Analyzer, ast::ast::SyntaxTree, display_error, errors::errors::Error,
    lexer::lexer::tokenize, parser::parser::parse, symtab::symtab::SymbolTable,
};
use log::{error, info};

/// Semantic analysis for C-minus programs.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Source file; `.c-` is assumed when no extension is given
    input: PathBuf,

    /// Write the listing to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn source_path(input: PathBuf) -> PathBuf {
    if input.extension().is_some() {
        input
    } else {
        input.with_extension("c-")
    }
}

fn front_end(source: &str, file_name: &str) -> Result<SyntaxTree, Error> {
    let start = Instant::now();
    let tokens = tokenize(source.to_string(), Some(file_name.to_string()))?;
    info!("tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let tree = parse(tokens, Rc::new(file_name.to_string()))?;
    info!("parsed {} nodes in {:?}", tree.len(), parse_start.elapsed());

    Ok(tree)
}

fn listing(output: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match output {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let path = source_path(cli.input);

    let source = match read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Unable to open {}: {}", path.display(), err);
            exit(1);
        }
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let tree = match front_end(&source, &file_name) {
        Ok(tree) => tree,
        Err(err) => {
            display_error(&err, &path, &source);
            exit(1);
        }
    };

    let out = match listing(cli.output.as_deref()) {
        Ok(out) => out,
        Err(err) => {
            eprintln!("Unable to create listing: {}", err);
            exit(1);
        }
    };

    let start = Instant::now();
    let mut analyzer: Analyzer<SymbolTable, Box<dyn Write>> = Analyzer::new(out);
    let succeeded = analyzer.analyze(&tree);
    info!("analyzed in {:?}", start.elapsed());

    let mut out = analyzer.into_output();
    if let Err(err) = out.flush() {
        error!("failed to flush listing: {}", err);
    }

    if !succeeded {
        exit(1);
    }
}
