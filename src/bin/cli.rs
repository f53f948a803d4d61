use anyhow::Context;
use shutterguard::testing::{motion_sample, sharp_frame, uniform_frame};
use shutterguard::{
    CaptureOutcome, CaptureSession, GateConfig, LatestFrame, PixelFrame, StaticPermissions,
    Timestamp,
};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shutterguard::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: shutterguard-cli <analyze|simulate> [args]");
        std::process::exit(1);
    }

    let command = &args[1];
    match command.as_str() {
        "analyze" => cmd_analyze(&args),
        "simulate" => cmd_simulate(&args).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(args: &[String]) -> anyhow::Result<GateConfig> {
    match flag_value(args, "--config") {
        Some(path) => Ok(GateConfig::load_from_file(path)?),
        None => Ok(GateConfig::load_or_default()),
    }
}

fn cmd_analyze(args: &[String]) -> anyhow::Result<()> {
    // analyze <image> [--config <path>] [--json]
    let Some(path) = args.get(2).filter(|a| !a.starts_with("--")) else {
        eprintln!("Usage: shutterguard-cli analyze <image> [--config <path>] [--json]");
        std::process::exit(1);
    };
    let config = load_config(args)?;

    let image = image::open(path)
        .with_context(|| format!("Failed to open image {}", path))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    let frame = PixelFrame::from_rgb(width, height, image.into_raw())?;

    let analyzer = config.frame_analyzer();
    let brightness = analyzer.brightness.analyze(&frame);
    let blur = analyzer.blur.analyze(&frame);
    let assessment = analyzer.assess(&frame, Timestamp::ZERO);

    if args.iter().any(|a| a == "--json") {
        let report = serde_json::json!({
            "width": width,
            "height": height,
            "brightness": brightness,
            "blur": blur,
            "sharpness": assessment.sharpness,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}x{}", width, height);
        println!(
            "dark: {} ({} of {} sampled pixels, {:.2}%)",
            brightness.is_dark,
            brightness.dark_count,
            brightness.sampled_count,
            brightness.dark_proportion * 100.0
        );
        println!(
            "blurred: {} (Laplacian variance {:.2})",
            blur.is_blurred, blur.variance
        );
        println!("live sharpness: {:?}", assessment.sharpness);
    }
    Ok(())
}

async fn cmd_simulate(args: &[String]) -> anyhow::Result<()> {
    // simulate [--shake-ms <n>] [--dark] [--config <path>] [--output <png>] [--json]
    let shake_ms: u64 = match flag_value(args, "--shake-ms") {
        Some(v) => v.parse().context("--shake-ms expects milliseconds")?,
        None => 800,
    };
    let dark = args.iter().any(|a| a == "--dark");
    let json = args.iter().any(|a| a == "--json");
    let config = load_config(args)?;

    let frames = LatestFrame::new();
    frames.publish(if dark {
        uniform_frame(640, 480, 20)
    } else {
        sharp_frame(640, 480)
    });

    let session = CaptureSession::start(config, frames, &StaticPermissions::granted())?;

    let feeder = session.clone();
    let sensor = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(16));
        loop {
            ticker.tick().await;
            let now = feeder.clock().now();
            let magnitude = if now < Timestamp::from_millis(shake_ms) {
                1.5
            } else {
                0.05
            };
            if feeder.push_motion(motion_sample(now, magnitude)).is_err() {
                break;
            }
        }
    });

    let outcome = session.capture().await;
    session.stop().await;
    sensor.await?;

    match outcome? {
        CaptureOutcome::Success(photo) => {
            let png = photo.to_png()?;
            if let Some(path) = flag_value(args, "--output") {
                std::fs::write(path, &png).with_context(|| format!("Failed to write {}", path))?;
            }
            if json {
                let report = serde_json::json!({
                    "outcome": "success",
                    "attempt_id": photo.attempt_id,
                    "captured_at_ms": photo.captured_at.as_millis() as u64,
                    "wall_clock": photo.wall_clock,
                    "width": photo.width(),
                    "height": photo.height(),
                    "png_bytes": png.len(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Captured {}x{} frame at {}ms ({} PNG bytes)",
                    photo.width(),
                    photo.height(),
                    photo.captured_at.as_millis(),
                    png.len()
                );
            }
        }
        CaptureOutcome::Timeout(reason) => {
            if json {
                let report = serde_json::json!({ "outcome": "timeout", "reason": reason });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Capture timed out: {}", reason);
            }
        }
    }

    Ok(())
}
