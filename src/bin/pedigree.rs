//! This is the command line tool that loads a pedigree (PED, simple JSON or
//! the serialized form), lays it out and saves the result.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{Arg, ArgAction, Command};
use pedigree::core::base::VertexId;
use pedigree::core::error::{PedigreeError, Result};
use pedigree::core::options::LayoutOptions;
use pedigree::core::utils::save_to_file;
use pedigree::formats::internal::SerializedPedigree;
use pedigree::formats::json::{export_simple_json, import_simple_json, JsonPrivacy};
use pedigree::formats::ped::{export_ped, import_ped, PedIdSource, PedImportOptions};
use pedigree::topo::layout::PedigreeLayoutContext;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Ped,
    Json,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputKind {
    Serialized,
    Positions,
    Ped,
    SimpleJson,
}

struct CLIOptions {
    format: Option<InputFormat>,
    output_path: Option<String>,
    options_path: Option<String>,
    output: OutputKind,
    proband: Option<usize>,
}

impl CLIOptions {
    pub fn new() -> Self {
        Self {
            format: None,
            output_path: None,
            options_path: None,
            output: OutputKind::Serialized,
            proband: None,
        }
    }
}

fn parse_format(name: &str) -> Option<InputFormat> {
    match name {
        "ped" => Some(InputFormat::Ped),
        "json" => Some(InputFormat::Json),
        "internal" => Some(InputFormat::Internal),
        _ => None,
    }
}

/// Pick the input format by the file extension, and then by the first
/// character of the content.
fn detect_format(path: &str, contents: &str) -> InputFormat {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    let trimmed = contents.trim_start();
    match ext.as_deref() {
        Some("ped") | Some("pre") | Some("pro") => InputFormat::Ped,
        Some("json") if trimmed.starts_with('{') => InputFormat::Internal,
        Some("json") => InputFormat::Json,
        _ if trimmed.starts_with('[') => InputFormat::Json,
        _ if trimmed.starts_with('{') => InputFormat::Internal,
        _ => InputFormat::Ped,
    }
}

fn load(contents: &str, format: InputFormat, cli: &CLIOptions) -> Result<PedigreeLayoutContext> {
    let options = match &cli.options_path {
        Some(path) => LayoutOptions::from_json(&fs::read_to_string(path)?)?,
        None => LayoutOptions::default(),
    };

    let (graph, proband) = match format {
        InputFormat::Ped => {
            let imported = import_ped(contents, &PedImportOptions::default())?;
            (imported.graph, imported.proband)
        }
        InputFormat::Json => {
            let imported = import_simple_json(contents)?;
            (imported.graph, imported.proband)
        }
        InputFormat::Internal => {
            let mut data = SerializedPedigree::from_json(contents)?;
            if let Some(p) = cli.proband {
                data.proband = Some(VertexId::from(p));
                data.layout = None;
            }
            return PedigreeLayoutContext::load(&data, options);
        }
    };

    let proband = cli.proband.map(VertexId::from).or(proband);
    PedigreeLayoutContext::new(graph, proband, options)
}

fn render(ctx: &PedigreeLayoutContext, kind: OutputKind) -> Result<String> {
    match kind {
        OutputKind::Serialized => ctx.to_json(),
        OutputKind::Positions => {
            let positions: serde_json::Map<String, serde_json::Value> = ctx
                .positions()
                .into_iter()
                .map(|(v, p)| (v.to_string(), serde_json::json!({ "x": p.x, "y": p.y })))
                .collect();
            Ok(serde_json::to_string_pretty(&positions)?)
        }
        OutputKind::Ped => Ok(export_ped(ctx.graph(), "1", PedIdSource::External)),
        OutputKind::SimpleJson => {
            export_simple_json(ctx.graph(), ctx.proband(), JsonPrivacy::All)
        }
    }
}

fn run(input_path: &str, cli: &CLIOptions) -> Result<()> {
    let contents = fs::read_to_string(input_path)?;
    let format = cli
        .format
        .unwrap_or_else(|| detect_format(input_path, &contents));
    log::info!("Reading {} as {:?}", input_path, format);

    let ctx = load(&contents, format, cli)?;
    log::info!(
        "Laid out {} vertices with {} crossings",
        ctx.graph().num_vertices(),
        ctx.layout().num_crossings()
    );

    let content = render(&ctx, cli.output)?;
    match &cli.output_path {
        Some(path) => save_to_file(path, &content)?,
        None => println!("{}", content),
    }
    Ok(())
}

fn main() {
    let matches = Command::new("Pedigree")
        .version("1.x")
        .about("Lays out pedigree (family tree) graphs")
        .arg(
            Arg::new("d")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enables debug logging"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .value_parser(["ped", "json", "internal"])
                .help("Format of the input file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the output file (stdout if missing)"),
        )
        .arg(
            Arg::new("options")
                .long("options")
                .value_name("FILE")
                .help("JSON file with layout options"),
        )
        .arg(
            Arg::new("positions")
                .long("positions")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["export-ped", "export-json"])
                .help("Write a map from vertex id to coordinates"),
        )
        .arg(
            Arg::new("export-ped")
                .long("export-ped")
                .action(ArgAction::SetTrue)
                .conflicts_with("export-json")
                .help("Write the pedigree as a PED file"),
        )
        .arg(
            Arg::new("export-json")
                .long("export-json")
                .action(ArgAction::SetTrue)
                .help("Write the pedigree as a simple JSON person list"),
        )
        .arg(
            Arg::new("proband")
                .long("proband")
                .value_name("ID")
                .value_parser(clap::value_parser!(usize))
                .help("Vertex id of the proband"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1),
        )
        .get_matches();

    let mut logger = env_logger::builder();
    logger.format_timestamp(None);
    if matches.get_flag("d") {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut cli = CLIOptions::new();
    cli.format = matches
        .get_one::<String>("format")
        .and_then(|f| parse_format(f));
    cli.output_path = matches.get_one::<String>("output").cloned();
    cli.options_path = matches.get_one::<String>("options").cloned();
    cli.proband = matches.get_one::<usize>("proband").copied();
    if matches.get_flag("positions") {
        cli.output = OutputKind::Positions;
    } else if matches.get_flag("export-ped") {
        cli.output = OutputKind::Ped;
    } else if matches.get_flag("export-json") {
        cli.output = OutputKind::SimpleJson;
    }

    let input_path = match matches.get_one::<String>("INPUT") {
        Some(path) => path.clone(),
        None => return,
    };

    if let Err(err) = run(&input_path, &cli) {
        match err {
            PedigreeError::Import(msg) => log::error!("Could not import {}: {}", input_path, msg),
            err => log::error!("Error: {}", err),
        }
        std::process::exit(1);
    }
}
