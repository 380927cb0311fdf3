use std::fs;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use multiply::command::CommandHistory;
use multiply::config::MultiplyConfig;
use multiply::io;
use multiply::io::cli::Cli;
use multiply::io::export::export_scene;
use multiply::io::ext_repr::ExtScene;
use multiply::io::import::import_scene;
use multiply::io::output::MultiplyOutput;
use multiply::io::svg_export::scene_to_svg;
use multiply::notify::LogNotifier;
use multiply::placement::Multiplier;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config: MultiplyConfig = match &args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            MultiplyConfig::default()
        }
        Some(config_file) => io::read_json(config_file).context("incorrect config file format")?,
    };
    info!("[MAIN] Successfully parsed MultiplyConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?
        .to_string();
    fs::create_dir_all(&args.output_folder).with_context(|| {
        format!(
            "could not create output folder: {}",
            args.output_folder.display()
        )
    })?;

    let ext_scene: ExtScene = io::read_json(&args.input_file)?;
    let imported = import_scene(&ext_scene)?;
    let mut work_area = imported.work_area;
    if config.plate_capacity.is_some() {
        work_area.capacity = config.plate_capacity;
    }

    let count = args.count.unwrap_or(config.count);
    let min_offset = args.min_offset.unwrap_or(config.arrange.min_offset);

    let scene = Mutex::new(imported.scene);
    let history = Mutex::new(CommandHistory::default());
    let notifier = LogNotifier;
    let multiplier = Multiplier {
        scene: &scene,
        history: &history,
        work_area: work_area.clone(),
        config: config.arrange.clone(),
        notifier: &notifier,
    };
    let outcome = multiplier.multiply_and_place(&imported.selection, count, min_offset)?;

    let scene = scene
        .into_inner()
        .map_err(|_| anyhow::anyhow!("scene lock poisoned"))?;
    let mut ids = imported.ids;
    let exported = export_scene(&scene, &ext_scene.work_area, &mut ids);
    let added = outcome.added.iter().filter_map(|k| ids.get(k).copied()).collect();

    {
        let output = MultiplyOutput {
            scene: exported,
            added,
            n_unplaced: outcome.n_unplaced,
            config: config.clone(),
        };
        let output_path = args.output_folder.join(format!("mul_{input_stem}.json"));
        io::write_json(&output, &output_path)?;
    }

    {
        let svg_path = args.output_folder.join(format!("mul_{input_stem}.svg"));
        let svg = scene_to_svg(
            &scene,
            &work_area,
            &outcome.added,
            config.svg_draw_options,
            &input_stem,
        );
        io::write_svg(&svg, &svg_path)?;
    }

    Ok(())
}
