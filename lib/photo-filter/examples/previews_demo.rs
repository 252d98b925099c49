/// Filter preview strip demo
/// Loads an image and writes one thumbnail per filter, as the filter picker shows them
use image::ImageReader;
use photo_filter::previews;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/test.png".to_string());
    let output_dir = Path::new("tmp/previews");
    std::fs::create_dir_all(output_dir)?;

    let img = ImageReader::open(&input)?.decode()?.to_rgba8();
    for (kind, thumb) in previews(&img, 160)? {
        thumb.save(output_dir.join(format!("{kind}.png")))?;
        println!("✓ {:<10} {}x{}", kind.label(), thumb.width(), thumb.height());
    }

    Ok(())
}
