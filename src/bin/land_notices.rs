//! Command-line front end for land-notices
//!
//! Reads a landholder spreadsheet, maps its columns to the notice fields and
//! writes the notices in the requested formats.
//!
//! # Usage
//!
//! ```bash
//! # Show the input headers
//! land-notices owners.csv --list-headers
//!
//! # Word and PDF notices for one village
//! land-notices owners.csv --format all --village Kondapur --date 2024-03-05 --time 10:30 \
//!     --map "Survey No=Sy.No" --map "Khata No=Khata" --font NotoSansTelugu-Regular.ttf
//!
//! # Preview fragment to stdout, context from JSON
//! land-notices owners.xlsx --format preview --context context.json
//! ```

use clap::{Parser, ValueEnum};
use land_notices::{
    FieldMapping, InputFormat, NoticeContext, NoticeError, RendererBuilder, Session,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// HTML preview fragment, written to stdout
    Preview,
    /// Printable HTML document
    Print,
    /// Word-compatible document (.doc)
    Word,
    /// Paginated PDF
    Pdf,
    /// Print, Word and PDF
    All,
}

/// Generate bilingual land survey notices from a landholder spreadsheet
#[derive(Parser, Debug)]
#[command(name = "land-notices")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file (.csv or .xlsx)
    input: PathBuf,

    /// Directory for the exported files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "all")]
    format: Format,

    /// Notice context as JSON (district, mandal, village, date, time, notification_number)
    #[arg(long)]
    context: Option<PathBuf>,

    /// Field mapping as JSON ({"Survey No": "header", ...})
    #[arg(long)]
    mapping: Option<PathBuf>,

    #[arg(long)]
    district: Option<String>,

    #[arg(long)]
    mandal: Option<String>,

    #[arg(long)]
    village: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Start time (HH:MM, 24-hour)
    #[arg(long)]
    time: Option<String>,

    /// Notification (RC) number
    #[arg(long)]
    notification: Option<String>,

    /// Map a field to an input header (FIELD=HEADER), repeatable
    #[arg(short, long = "map", value_parser = parse_field_pair)]
    maps: Vec<(String, String)>,

    /// TrueType/OpenType font with Telugu glyphs for the PDF
    #[arg(long)]
    font: Option<PathBuf>,

    /// Page margin in millimetres (PDF)
    #[arg(long, default_value = "15")]
    margin_mm: f32,

    /// Maximum input size in bytes
    #[arg(long)]
    max_input_bytes: Option<u64>,

    /// Print the input headers and exit
    #[arg(long)]
    list_headers: bool,
}

fn parse_field_pair(s: &str) -> Result<(String, String), String> {
    let (field, header) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=HEADER, got '{}'", s))?;
    Ok((field.trim().to_string(), header.trim().to_string()))
}

fn load_context(args: &Args) -> Result<NoticeContext, NoticeError> {
    let mut ctx: NoticeContext = match &args.context {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => NoticeContext::default(),
    };

    let overrides = [
        (&args.district, &mut ctx.district),
        (&args.mandal, &mut ctx.mandal),
        (&args.village, &mut ctx.village),
        (&args.date, &mut ctx.date),
        (&args.time, &mut ctx.time),
        (&args.notification, &mut ctx.notification_number),
    ];
    for (value, slot) in overrides {
        if let Some(value) = value {
            *slot = value.clone();
        }
    }
    Ok(ctx)
}

fn run(args: &Args) -> Result<ExitCode, NoticeError> {
    let mut builder = RendererBuilder::new().with_page_margin_mm(args.margin_mm);
    if let Some(font) = &args.font {
        builder = builder.with_font_path(font);
    }
    if let Some(limit) = args.max_input_bytes {
        builder = builder.with_max_input_bytes(limit);
    }
    let mut session = Session::new(builder.build()?);

    let bytes = std::fs::read(&args.input)?;
    if !session.load(&bytes, InputFormat::from_path(&args.input))? {
        eprintln!("Error: input must contain a header row and at least one data row");
        return Ok(ExitCode::FAILURE);
    }

    if args.list_headers {
        if let Some(table) = session.table() {
            for header in &table.headers {
                println!("{}", header);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(path) = &args.mapping {
        let mapping: FieldMapping = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        session.apply_mapping(mapping)?;
    }
    if let Some(mapper) = session.mapper_mut() {
        for (field, header) in &args.maps {
            mapper.set(field, header)?;
        }
        let guessed = mapper.auto_map();
        if guessed > 0 {
            log::info!("mapped {} fields by header name", guessed);
        }
    }

    session.set_context(load_context(args)?);
    session.submit_mapping()?;

    match args.format {
        Format::Preview => print!("{}", session.preview()?),
        Format::Print => {
            session.print()?.write_to_dir(&args.output_dir)?;
        }
        Format::Word => {
            session.export_word()?.write_to_dir(&args.output_dir)?;
        }
        Format::Pdf => {
            session.export_pdf()?.write_to_dir(&args.output_dir)?;
        }
        Format::All => {
            session.print()?.write_to_dir(&args.output_dir)?;
            session.export_word()?.write_to_dir(&args.output_dir)?;
            session.export_pdf()?.write_to_dir(&args.output_dir)?;
        }
    }

    for note in session.drain_notifications() {
        log::info!("{}: {}", note.title, note.description);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
