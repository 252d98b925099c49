use crate::{
    cli::{ApplyArgs, PreviewsArgs, parse_hex_color},
    config::Config,
};
use anyhow::{Context, Result, bail};
use image::DynamicImage;
use image_edit::{
    BrushSettings, CropRegion, EditSession, FrameConfig, FrameStyle, ImageBuffer, KeyColorRemover,
};
use photo_filter::FilterKind;
use std::{fs, path::Path};

pub fn list_filters() -> Result<()> {
    for kind in FilterKind::all() {
        println!("{:<12} {}", kind.name(), kind.label());
    }
    Ok(())
}

pub fn apply(args: &ApplyArgs, config: &Config) -> Result<()> {
    let image = load_image(&args.input)?;
    log::info!(
        "loaded {} ({}x{})",
        args.input.display(),
        image.width(),
        image.height()
    );

    let mut session = EditSession::new(image);

    if args.remove_background {
        let tolerance = args.tolerance.unwrap_or(config.background.tolerance);
        let mut remover = KeyColorRemover::new().with_tolerance(tolerance);
        session.remove_background(&mut remover)?;
    }

    let (width, height) = session.processed().dimensions();
    let region = match args.crop {
        Some(region) => Some(region),
        None if args.square => Some(CropRegion::centered_square(width, height)),
        None => None,
    };
    if let Some(region) = region {
        session.crop(region)?;
        log::info!(
            "cropped to {}x{} at ({}, {})",
            region.width,
            region.height,
            region.x,
            region.y
        );
    }

    for kind in filters(args, config)? {
        session.apply_filter(kind);
    }

    if !args.strokes.is_empty() {
        let brush = brush(args, config)?;
        let canvas = session.canvas_mut();
        canvas.set_brush(brush);
        for stroke in &args.strokes {
            canvas.add_path(stroke.0.iter().copied());
        }
        log::info!("drawing {} stroke(s)", canvas.strokes().len());
        session.commit_drawing();
    }

    if let Some(style) = frame_style(args, config)? {
        let framing = frame(style, args, config)?;
        session.frame(&framing)?;
    }

    save_image(session.processed(), &args.output)?;
    log::info!("saved {}", args.output.display());

    Ok(())
}

pub fn previews(args: &PreviewsArgs, config: &Config) -> Result<()> {
    let image = load_image(&args.input)?;
    let edge = args.edge.unwrap_or(config.preference.preview_edge);

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create {} failed", args.out_dir.display()))?;

    let session = EditSession::new(image);
    for (kind, preview) in session.filter_previews(edge)? {
        let path = args.out_dir.join(format!("{}.png", kind.name()));
        preview
            .save(&path)
            .with_context(|| format!("save {} failed", path.display()))?;
        log::debug!("wrote {}", path.display());
    }

    log::info!(
        "wrote {} previews to {}",
        FilterKind::all().len(),
        args.out_dir.display()
    );
    Ok(())
}

fn load_image(path: &Path) -> Result<ImageBuffer> {
    let image = image::open(path).with_context(|| format!("open {} failed", path.display()))?;
    Ok(image.into_rgba8())
}

fn save_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg"));

    // jpeg has no alpha channel
    let result = if is_jpeg {
        DynamicImage::ImageRgba8(image.clone()).into_rgb8().save(path)
    } else {
        image.save(path)
    };

    result.with_context(|| format!("save {} failed", path.display()))
}

fn filters(args: &ApplyArgs, config: &Config) -> Result<Vec<FilterKind>> {
    if !args.filters.is_empty() {
        return Ok(args.filters.clone());
    }

    let kind = config
        .preference
        .default_filter
        .parse::<FilterKind>()
        .with_context(|| "invalid default_filter in config")?;

    Ok(match kind {
        FilterKind::None => vec![],
        kind => vec![kind],
    })
}

fn brush(args: &ApplyArgs, config: &Config) -> Result<BrushSettings> {
    let color = match args.brush_color {
        Some(color) => color,
        None => parse_color(&config.brush.color, "brush.color")?,
    };

    Ok(BrushSettings::new()
        .with_color(color)
        .with_size(args.brush_size.unwrap_or(config.brush.size))
        .with_opacity(args.brush_opacity.unwrap_or(config.brush.opacity)))
}

fn frame_style(args: &ApplyArgs, config: &Config) -> Result<Option<FrameStyle>> {
    if args.frame.is_some() || !config.frame.enabled {
        return Ok(args.frame);
    }

    match config.frame.style.parse::<FrameStyle>() {
        Ok(style) => Ok(Some(style)),
        Err(e) => bail!("invalid frame.style in config: {e}"),
    }
}

fn frame(style: FrameStyle, args: &ApplyArgs, config: &Config) -> Result<FrameConfig> {
    let color = match args.frame_color {
        Some(color) => color,
        None => parse_color(&config.frame.color, "frame.color")?,
    };

    Ok(FrameConfig::new()
        .with_style(style)
        .with_border(args.frame_border.unwrap_or(config.frame.border))
        .with_color(color))
}

fn parse_color(value: &str, key: &str) -> Result<image::Rgba<u8>> {
    match parse_hex_color(value) {
        Ok(color) => Ok(color),
        Err(e) => bail!("invalid {key} in config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn apply_args(extra: &[&str]) -> ApplyArgs {
        let mut argv = vec!["photo-editor", "apply", "in.png", "out.png"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Apply(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_filters_fall_back_to_config() {
        let mut config = Config::default();
        config.preference.default_filter = "sepia".to_string();

        assert_eq!(
            filters(&apply_args(&[]), &config).unwrap(),
            vec![FilterKind::Sepia]
        );
        assert_eq!(
            filters(&apply_args(&["-f", "invert"]), &config).unwrap(),
            vec![FilterKind::Invert]
        );

        config.preference.default_filter = "none".to_string();
        assert!(filters(&apply_args(&[]), &config).unwrap().is_empty());

        config.preference.default_filter = "blur".to_string();
        assert!(filters(&apply_args(&[]), &config).is_err());
    }

    #[test]
    fn test_brush_flags_override_config() {
        let mut config = Config::default();
        config.brush.color = "FF0000".to_string();
        config.brush.size = 6.0;

        let settings = brush(&apply_args(&["--brush-opacity", "0.5"]), &config).unwrap();
        assert_eq!(settings.color, image::Rgba([255, 0, 0, 255]));
        assert_eq!(settings.size, 6.0);
        assert_eq!(settings.opacity, 0.5);

        let settings = brush(&apply_args(&["--brush-size", "500"]), &config).unwrap();
        assert_eq!(settings.size, 100.0);
    }

    #[test]
    fn test_frame_from_config() {
        let mut config = Config::default();
        config.frame.border = 3;

        let framing = frame(FrameStyle::Double, &apply_args(&[]), &config).unwrap();
        assert_eq!(framing.style, FrameStyle::Double);
        assert_eq!(framing.border, 3);
        assert_eq!(framing.color, image::Rgba([255, 255, 255, 255]));

        config.frame.color = "nope".to_string();
        assert!(frame(FrameStyle::Solid, &apply_args(&[]), &config).is_err());
    }

    #[test]
    fn test_frame_style_from_config() {
        let mut config = Config::default();
        config.frame.style = "polaroid".to_string();
        assert_eq!(frame_style(&apply_args(&[]), &config).unwrap(), None);

        config.frame.enabled = true;
        assert_eq!(
            frame_style(&apply_args(&[]), &config).unwrap(),
            Some(FrameStyle::Polaroid)
        );
        assert_eq!(
            frame_style(&apply_args(&["--frame", "double"]), &config).unwrap(),
            Some(FrameStyle::Double)
        );

        config.frame.style = "wavy".to_string();
        assert!(frame_style(&apply_args(&[]), &config).is_err());
        assert_eq!(
            frame_style(&apply_args(&["--frame", "solid"]), &config).unwrap(),
            Some(FrameStyle::Solid)
        );
    }
}
