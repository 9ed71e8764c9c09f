use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use qrframe_renderer::{DesignConfig, ExportFormat, ExportOutput, Result, export, sanitize_filename};

#[derive(Parser, Debug)]
#[command(name = "qrframe")]
#[command(about = "Render styled, framed QR codes to SVG, PNG, JPEG, PDF or print HTML", long_about = None)]
struct Args {
    /// Content to encode (URL, text, ...)
    value: String,

    /// Design JSON file in the camelCase design format
    #[arg(short, long)]
    design: Option<PathBuf>,

    /// png, jpg, jpeg, svg, pdf or print
    #[arg(short, long, default_value = "png")]
    format: String,

    /// default, large, xl or a pixel count
    #[arg(short, long, default_value = "default")]
    size: String,

    /// Output filename stem; the extension follows the delivered format
    #[arg(short, long)]
    output: Option<String>,

    /// Directory to write into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Write the artifact to stdout instead of a file
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let design = match &args.design {
        Some(path) => DesignConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => DesignConfig::default(),
    };

    let output = export(
        &args.value,
        &design,
        &args.format,
        &args.size,
        args.output.as_deref(),
    )?;

    let (filename, bytes) = match &output {
        ExportOutput::File(artifact) => (artifact.filename.clone(), artifact.bytes.as_slice()),
        ExportOutput::Print(doc) => (
            sanitize_filename(args.output.as_deref(), ExportFormat::Print),
            doc.as_bytes(),
        ),
    };

    if args.stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(bytes)?;
        handle.flush()?;
    } else {
        let path = args.out_dir.join(&filename);
        std::fs::write(&path, bytes)?;
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}
