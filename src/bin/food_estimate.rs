use food_volume::config::{load_config, EstimateToolConfig, OutputConfig};
use food_volume::diagnostics::PipelineRun;
use food_volume::image::io::{load_rgb_image, save_depth_map, save_mask, write_json_file};
use food_volume::NutritionPipeline;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage:\n  food_estimate <config.json>\n  food_estimate <image> <food_type> [--json <out.json>] [--debug-dir <dir>]"
        .to_string()
}

fn parse_args(args: &[String]) -> Result<EstimateToolConfig, String> {
    match args {
        [config] => load_config(Path::new(config)),
        [input, food_type, rest @ ..] => {
            let mut output = OutputConfig::default();
            let mut it = rest.iter();
            while let Some(flag) = it.next() {
                let value = it
                    .next()
                    .ok_or_else(|| format!("Missing value for {flag}\n{}", usage()))?;
                match flag.as_str() {
                    "--json" => output.json_out = Some(PathBuf::from(value)),
                    "--debug-dir" => output.debug_dir = Some(PathBuf::from(value)),
                    other => return Err(format!("Unknown flag {other}\n{}", usage())),
                }
            }
            Ok(EstimateToolConfig {
                input: PathBuf::from(input),
                food_type: food_type.clone(),
                pipeline: Default::default(),
                foods: Default::default(),
                output,
            })
        }
        _ => Err(usage()),
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = parse_args(&args)?;

    let rgb = load_rgb_image(&config.input)?;
    let image = rgb.as_view();

    let foods = config.food_table()?;
    let pipeline = NutritionPipeline::with_food_table(config.pipeline.clone(), foods);
    let run = pipeline.process_with_diagnostics(&image, &config.food_type);

    if !config.output.quiet {
        print_text_summary(&run);
    }

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &run.report)?;
            println!("JSON report written to {}", path.display());
        }
        None if config.output.quiet => {
            let json = serde_json::to_string_pretty(&run.report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
        None => {}
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &run)?;
        println!("Debug artifacts written to {}", dir.display());
    }

    Ok(())
}

fn print_text_summary(run: &PipelineRun) {
    let report = &run.report;
    println!("Estimate for '{}'", report.input.food_type);
    println!("  input: {}x{}", report.input.width, report.input.height);
    if !report.input.known_food {
        println!("  note: unknown food label, generic priors used");
    }
    if let Some(seg) = &report.segmentation {
        println!(
            "  mask: {:?} coverage={:.3} pixels={}",
            seg.source, seg.coverage, seg.pixels
        );
    }
    if let Some(depth) = &report.depth {
        println!("  depth: {:?} mean={:.1}", depth.source, depth.mean_depth);
    }
    if let Some(vol) = &report.volume {
        println!(
            "  volume: {:.1} cm3 (raw {:.1}, area {:.1} cm2, height {:.2} cm)",
            vol.volume_cm3, vol.raw_volume_cm3, vol.planar_area_cm2, vol.depth_cm
        );
    }
    match &run.outcome {
        Ok(n) => {
            println!("  mass: {:.0} g", n.mass_g);
            println!("  calories: {:.0} kcal", n.calories);
            println!(
                "  protein/carbs/fat: {}/{}/{} g",
                n.protein_g, n.carbs_g, n.fat_g
            );
            println!("  health score: {}/10", n.health_score);
            println!("  confidence: {}%", n.confidence_score);
        }
        Err(err) => println!("  no estimate: {err}"),
    }
    println!("  total_ms: {:.3}", report.timings.total_ms);
    for stage in &report.timings.stages {
        println!("    {}: {:.3} ms", stage.label, stage.elapsed_ms);
    }
}

fn save_debug_artifacts(dir: &Path, run: &PipelineRun) -> Result<(), String> {
    if let Some(mask) = &run.mask {
        save_mask(mask, &dir.join("mask.png"))?;
    }
    if let Some(depth) = &run.depth {
        save_depth_map(depth, &dir.join("depth.png"))?;
    }
    write_json_file(&dir.join("report.json"), &run.report)
}
