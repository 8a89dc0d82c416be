//! Watermark Gallery
//!
//! Renders the four showcase watermarks over a generated photo and writes
//! each composite as a PNG.
//!
//! Run with:
//! `cargo run -p image_watermark --example gallery -- [output-dir]`
//!
//! Pass `--remote` to load `https://picsum.photos/400/300` instead of the
//! generated image.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use image::{Rgba, RgbaImage};
use image_watermark::{
    ImageWatermark, ImageWatermarkProps, LoadState, Position, RasterSurface, Style,
    WatermarkConfig, WatermarkHost,
};
use tracing_subscriber::EnvFilter;

fn showcase() -> Vec<(&'static str, WatermarkConfig, Style)> {
    vec![
        (
            "basic",
            WatermarkConfig::new("© 2024 My Company")
                .position(Position::BottomRight)
                .opacity(0.7)
                .font_size(16.0)
                .color("white"),
            Style::new(),
        ),
        (
            "rotated",
            WatermarkConfig::new("CONFIDENTIAL")
                .position(Position::Center)
                .opacity(0.3)
                .font_size(32.0)
                .color("red")
                .rotation(-45.0)
                .font_family("Arial Black, sans-serif"),
            Style::new(),
        ),
        (
            "top-left",
            WatermarkConfig::new("DRAFT")
                .position(Position::TopLeft)
                .opacity(0.8)
                .font_size(20.0)
                .color("yellow")
                .offset(10.0, 10.0),
            Style::new(),
        ),
        (
            "custom",
            WatermarkConfig::new("PROPRIETARY")
                .position(Position::Center)
                .opacity(0.2)
                .font_size(48.0)
                .color("rgba(0, 0, 0, 0.3)")
                .rotation(30.0)
                .font_family("Impact, sans-serif"),
            Style::new().with("filter", "brightness(0.9) contrast(1.1)"),
        ),
    ]
}

/// A 400x300 sky-to-meadow gradient standing in for a photo
fn generated_photo() -> RgbaImage {
    RgbaImage::from_fn(400, 300, |x, y| {
        let t = y as f32 / 299.0;
        let shade = (x as f32 / 399.0 * 40.0) as u8;
        if t < 0.6 {
            Rgba([70 + shade, 130 + shade, 220, 255])
        } else {
            Rgba([60, 150 - shade, 70 + shade, 255])
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut remote = false;
    let mut out_dir = PathBuf::from("target/gallery");
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--remote" => remote = true,
            path => out_dir = PathBuf::from(path),
        }
    }
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let src = if remote {
        "https://picsum.photos/400/300".to_string()
    } else {
        let photo = out_dir.join("photo.png");
        generated_photo()
            .save(&photo)
            .with_context(|| format!("writing {}", photo.display()))?;
        photo.display().to_string()
    };

    for (name, watermark, canvas_style) in showcase() {
        let props = ImageWatermarkProps::new(src.clone(), watermark)
            .alt(format!("Sample image with {name} watermark"))
            .size(400, 300)
            .style(
                Style::new()
                    .with("border", "1px solid #ccc")
                    .with("borderRadius", "8px"),
            )
            .canvas_style(canvas_style);

        let component = ImageWatermark::new(props, RasterSurface::default())
            .on_load(move || tracing::info!(name, "loaded"))
            .on_error(|e| tracing::error!("{e}"));
        let mut host = WatermarkHost::new(component);
        host.mount();
        host.settle().await;

        let component = host.component();
        if component.state() != LoadState::Loaded {
            bail!(
                "{name}: {}",
                component
                    .error()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "image did not load".to_string())
            );
        }

        let path = out_dir.join(format!("{name}.png"));
        component
            .surface()
            .save_png(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(
            style = component.props().surface_style().to_css(),
            "wrote {}",
            path.display()
        );
    }

    Ok(())
}
