use clap::{Args, Parser, Subcommand};
use image::Rgba;
use image_edit::{CropRegion, FrameStyle, Point};
use photo_filter::FilterKind;
use std::{path::PathBuf, str::FromStr};

#[derive(Parser, Debug)]
#[command(name = "photo-editor", version, about = "Crop, filter, draw on and frame photos")]
pub struct Cli {
    /// Config file, defaults to the platform config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available color filters
    Filters,

    /// Edit a photo and save the result
    Apply(ApplyArgs),

    /// Write one thumbnail per color filter
    Previews(PreviewsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    pub input: PathBuf,
    pub output: PathBuf,

    /// Color filter, repeat to stack filters in order
    #[arg(short, long = "filter")]
    pub filters: Vec<FilterKind>,

    /// Crop region as x,y,width,height
    #[arg(long, value_parser = parse_region, conflicts_with = "square")]
    pub crop: Option<CropRegion>,

    /// Crop to the largest centered square
    #[arg(long)]
    pub square: bool,

    /// Brush stroke as "x,y;x,y;...", repeat for more strokes
    #[arg(long = "stroke")]
    pub strokes: Vec<StrokePath>,

    /// Brush color as RRGGBB
    #[arg(long, value_parser = parse_hex_color)]
    pub brush_color: Option<Rgba<u8>>,

    #[arg(long)]
    pub brush_size: Option<f32>,

    #[arg(long)]
    pub brush_opacity: Option<f32>,

    /// Make the backdrop transparent, keyed on the top-left pixel color
    #[arg(long)]
    pub remove_background: bool,

    /// RGB distance still treated as backdrop
    #[arg(long)]
    pub tolerance: Option<f32>,

    /// Frame style: solid, polaroid or double
    #[arg(long)]
    pub frame: Option<FrameStyle>,

    #[arg(long)]
    pub frame_border: Option<u32>,

    /// Frame color as RRGGBB
    #[arg(long, value_parser = parse_hex_color)]
    pub frame_color: Option<Rgba<u8>>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewsArgs {
    pub input: PathBuf,
    pub out_dir: PathBuf,

    /// Longest thumbnail edge in pixels
    #[arg(long)]
    pub edge: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath(pub Vec<Point>);

impl FromStr for StrokePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let points = s
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                let (x, y) = p
                    .split_once(',')
                    .ok_or_else(|| format!("expected x,y but got `{p}`"))?;
                let x = x.trim().parse::<f32>().map_err(|e| format!("{p}: {e}"))?;
                let y = y.trim().parse::<f32>().map_err(|e| format!("{p}: {e}"))?;
                Ok(Point::new(x, y))
            })
            .collect::<Result<Vec<_>, String>>()?;

        if points.is_empty() {
            return Err("stroke needs at least one point".to_string());
        }

        Ok(Self(points))
    }
}

pub fn parse_region(s: &str) -> Result<CropRegion, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<u32>().map_err(|e| format!("{v}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [x, y, width, height] => Ok(CropRegion::new(*x, *y, *width, *height)),
        _ => Err(format!("expected x,y,width,height but got `{s}`")),
    }
}

pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, String> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return Err(format!("expected RRGGBB or RRGGBBAA but got `{s}`"));
    }

    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .ok_or_else(|| format!("invalid color `{s}`"))
    };

    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
