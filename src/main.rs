use anyhow::*;
use clap::Parser;
use std::result::Result::Ok;
use std::{fs, io, path::Path, sync::Arc};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod layout;
mod primitive;
mod scale;
mod svg;

use layout::{default_slide_rule, parse_scale_spec, ScaleSpec};
use svg::{Document, SvgCtx};

#[derive(Parser)]
#[command(version, about = "Render logarithmic slide-rule scales as SVG")]
struct Cli {
    /// Drawing width in millimetres
    #[arg(long, default_value = "250")]
    width: f64,

    /// Drawing height in millimetres
    #[arg(long, default_value = "50")]
    height: f64,

    /// Scale to draw, e.g. "log(A, 1, 220, 15, 8.3)" or "lin(L, 1, 220, 15, 40)".
    /// Repeatable; the default A/B/C slide rule is used when omitted
    #[arg(long = "scale")]
    scales: Vec<String>,

    /// Fractional digits of every number in the output
    #[arg(long, default_value = "6")]
    precision: usize,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Also rasterize the drawing to this PNG file
    #[arg(long)]
    png: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if !(cli.width > 0.0 && cli.height > 0.0) {
        bail!("--width and --height must be positive");
    }

    let specs = scale_specs(&cli)?;
    let doc = assemble(cli.width, cli.height, &specs);
    let ctx = SvgCtx {
        precision: cli.precision,
        ..SvgCtx::default()
    };

    let png = cli.png.as_deref().map(Path::new);
    write_outputs(&doc, &ctx, cli.output.as_deref(), png, &mut io::stdout().lock())
}

/// Writes the SVG to `output`, or to `stdout` when no file is given, plus the
/// optional PNG. Status lines go to `stdout` only when it does not carry the SVG.
fn write_outputs<W: io::Write>(
    doc: &Document,
    ctx: &SvgCtx,
    output: Option<&str>,
    png: Option<&Path>,
    stdout: &mut W,
) -> Result<()> {
    if let Some(output) = output {
        let mut file =
            fs::File::create(output).with_context(|| format!("failed to create {}", output))?;
        doc.render(ctx, &mut file)?;
        writeln!(stdout, "output: {}", output)?;
    } else {
        doc.render(ctx, stdout)?;
    }

    if let Some(png) = png {
        write_png(&doc.to_svg_string(ctx), png)?;
        info!(path = %png.display(), "wrote png preview");
        if output.is_some() {
            writeln!(stdout, "png: {}", png.display())?;
        }
    }

    Ok(())
}

fn scale_specs(cli: &Cli) -> Result<Vec<ScaleSpec>> {
    if cli.scales.is_empty() {
        debug!("no --scale given, using the default slide rule");
        return Ok(default_slide_rule(cli.width, cli.height));
    }
    cli.scales
        .iter()
        .map(|s| parse_scale_spec(s).with_context(|| format!("bad --scale {:?}", s)))
        .collect()
}

fn assemble(width: f64, height: f64, specs: &[ScaleSpec]) -> Document {
    let scales = specs.iter().map(ScaleSpec::build).collect();
    let doc = Document::new(width, height, scales);
    info!(width, height, scales = doc.scales().len(), "assembled document");
    doc
}

fn write_png(svg: &str, path: &Path) -> Result<()> {
    let mut fontdb = resvg::usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opt = resvg::usvg::Options {
        fontdb: Arc::new(fontdb),
        ..resvg::usvg::Options::default()
    };

    let tree = resvg::usvg::Tree::from_str(svg, &opt).context("failed to parse rendered svg")?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .context("drawing has no area to rasterize")?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );
    pixmap
        .save_png(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
