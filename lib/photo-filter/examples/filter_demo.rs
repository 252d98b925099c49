/// Color filter demo
/// Applies every filter to a generated gradient and writes the results to tmp/
use image::{Rgba, RgbaImage};
use photo_filter::{FilterKind, apply};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img = RgbaImage::from_fn(800, 600, |x, y| {
        let r = (x * 255 / 800) as u8;
        let g = (y * 255 / 600) as u8;
        let b = ((x + y) * 255 / 1400) as u8;
        Rgba([r, g, b, 255])
    });

    for kind in FilterKind::all() {
        let filtered = apply(&img, *kind);
        let filename = format!("filter_{kind}.png");
        filtered.save(output_dir.join(&filename))?;
        println!("✓ {} -> tmp/{}", kind.label(), filename);
    }

    Ok(())
}
