//! jagen CLI - Generate Go bindings from javap output and Java sources

use clap::{ArgAction, Parser};
use jagen::{parse_type_mapping, Builder};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

/// Generate Go bindings for a Java class
///
/// Reads `javap -s` output from --in (or stdin) and optionally the class's
/// source from --src to recover parameter names.
#[derive(Parser, Debug)]
#[command(name = "jagen")]
#[command(version, about, long_about = None)]
struct Args {
    /// javap output file (default: stdin)
    #[arg(long = "in", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Java source file of the same class
    #[arg(long, value_name = "FILE")]
    src: Option<PathBuf>,

    /// Go package name of the generated file
    #[arg(long, default_value = jagen::generator::DEFAULT_PACKAGE, value_name = "NAME")]
    pkg: String,

    /// Java package prefix to strip from generated type names
    #[arg(long, value_name = "PREFIX")]
    trim: Option<String>,

    /// Space separated Java types; members using any of them are skipped
    #[arg(long, value_name = "TYPES")]
    deny: Option<String>,

    /// File listing abstract classes and interfaces, one per line
    #[arg(long = "abstract", value_name = "FILE")]
    abstract_classes: Option<PathBuf>,

    /// Extra value conversion in format "java.foo.Type=GoType" (can be specified multiple times)
    #[arg(long = "type-map", value_name = "MAPPING")]
    type_maps: Vec<String>,

    /// Print the Java classes the bindings depend on instead of the bindings
    #[arg(short, long)]
    deps: bool,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_module("jagen", level)
        .parse_default_env()
        .init();

    let mut builder = Builder::new().package_name(args.pkg);

    if let Some(input) = args.input {
        builder = builder.disassembly_file(input);
    } else {
        let mut text = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut text) {
            eprintln!("Error reading stdin: {}", e);
            process::exit(1);
        }
        builder = builder.disassembly_text(text);
    }

    if let Some(src) = args.src {
        builder = builder.source_file(src);
    }

    if let Some(trim) = args.trim {
        builder = builder.trim_prefix(trim);
    }

    if let Some(deny) = args.deny {
        builder = builder.denylist(deny);
    }

    if let Some(path) = args.abstract_classes {
        builder = builder.abstract_class_file(path);
    }

    for arg in &args.type_maps {
        match parse_type_mapping(arg) {
            Ok((java_type, go_type)) => builder = builder.type_mapping(java_type, go_type),
            Err(e) => {
                eprintln!("Error parsing --type-map: {}", e);
                process::exit(1);
            }
        }
    }

    let bindings = match builder.generate() {
        Ok(bindings) => bindings,
        Err(e) => {
            eprintln!("Error generating bindings: {}", e);
            process::exit(1);
        }
    };

    if args.deps {
        write_output(&bindings.dependencies(), args.output.as_ref());
    } else {
        write_output(bindings.code(), args.output.as_ref());
    }
}

fn write_output(content: &str, output_file: Option<&PathBuf>) {
    if let Some(output_path) = output_file {
        if let Err(e) = fs::write(output_path, content) {
            eprintln!("Error writing output file: {}", e);
            process::exit(1);
        }
        eprintln!("Bindings written to {}", output_path.display());
    } else {
        print!("{}", content);
    }
}
