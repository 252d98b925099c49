/// Edit session demo
/// Crops, filters, draws on and frames a generated photo, writing each step to tmp/
use image::{Rgba, RgbaImage};
use image_edit::{
    BrushSettings, CropRegion, EditSession, FilterKind, FrameConfig, FrameStyle, Point,
};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img = RgbaImage::from_fn(800, 600, |x, y| {
        Rgba([(x * 255 / 800) as u8, (y * 255 / 600) as u8, 128, 255])
    });
    let mut session = EditSession::new(img);

    session.crop(CropRegion::centered_square(800, 600))?;
    session.processed().save(output_dir.join("edit_1_crop.png"))?;

    session.apply_filter(FilterKind::Vintage);
    session.processed().save(output_dir.join("edit_2_vintage.png"))?;

    let canvas = session.canvas_mut();
    canvas.set_brush(
        BrushSettings::new()
            .with_color(BrushSettings::PALETTE[4])
            .with_size(12.0)
            .with_opacity(0.8),
    );
    canvas.add_path((0..60).map(|i| {
        let t = i as f32 / 59.0;
        Point::new(50.0 + t * 500.0, 300.0 + (t * 12.0).sin() * 80.0)
    }));
    session.commit_drawing();
    session.processed().save(output_dir.join("edit_3_brush.png"))?;

    session.frame(&FrameConfig::new().with_style(FrameStyle::Polaroid).with_border(30))?;
    session.processed().save(output_dir.join("edit_4_frame.png"))?;

    println!("✓ Edit steps written to tmp/edit_*.png");

    Ok(())
}
