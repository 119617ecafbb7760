use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

const FRAME_COUNT: u32 = 24;
const SIZE: u32 = 160;
const SQUARE: u32 = 32;
const LABELS: [&str; 4] = ["Moving", "Bright", "Centered", "Edge"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Square position for frame `i`: a diagonal sweep across the canvas.
fn square_origin(i: u32) -> (u32, u32) {
    let travel = SIZE - SQUARE;
    let x = i * travel / (FRAME_COUNT - 1);
    let y = travel - x;
    (x, y)
}

fn render_frame(i: u32, brightness: u8) -> RgbImage {
    let (sx, sy) = square_origin(i);
    RgbImage::from_fn(SIZE, SIZE, |x, y| {
        let inside = (sx..sx + SQUARE).contains(&x) && (sy..sy + SQUARE).contains(&y);
        if inside {
            Rgb([brightness, brightness / 2, 40])
        } else {
            let shade = (x + y) as f32 / (2 * SIZE) as f32;
            Rgb([20, (60.0 + 80.0 * shade) as u8, (90.0 + 120.0 * shade) as u8])
        }
    })
}

fn write_frames(out: &Path, rng: &mut SimpleRng) -> Result<Vec<[u8; 4]>> {
    let mut flags = Vec::with_capacity(FRAME_COUNT as usize);
    let mut previous = square_origin(0);
    for i in 0..FRAME_COUNT {
        let bright = rng.chance(0.4);
        let brightness = if bright { 250 } else { 150 };
        let frame = render_frame(i, brightness);
        let path = out.join(format!("frame{i}.png"));
        frame
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;

        let origin = square_origin(i);
        let moving = origin != previous;
        previous = origin;
        let centre = SIZE / 2 - SQUARE / 2;
        let centered = origin.0.abs_diff(centre) < SQUARE / 2;
        let edge = origin.0 == 0 || origin.0 == SIZE - SQUARE;
        flags.push([moving as u8, bright as u8, centered as u8, edge as u8]);
    }
    Ok(flags)
}

fn write_annotations(out: &Path, flags: &[[u8; 4]]) -> Result<()> {
    let path = out.join("annotations.csv");
    let mut writer = csv::Writer::from_path(&path).context("creating annotations.csv")?;
    let mut header = vec!["Frame"];
    header.extend(LABELS);
    writer.write_record(&header)?;

    for (i, row) in flags.iter().enumerate() {
        let mut record = vec![format!("Frame{i}")];
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out = Path::new("sample_frames");
    std::fs::create_dir_all(out).context("creating sample_frames/")?;

    let mut rng = SimpleRng::new(42);
    let flags = write_frames(out, &mut rng)?;
    write_annotations(out, &flags)?;

    println!(
        "Wrote {FRAME_COUNT} frames ({SIZE}x{SIZE}) and annotations.csv to {}",
        out.display()
    );
    Ok(())
}
