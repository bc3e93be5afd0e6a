use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use polypaint::fitness::psnr_from_rmse;
use polypaint::render::save_canvas;
use polypaint::settings::DEFAULT_SETTINGS_PATH;
use polypaint::{fit_population, random_population_with_sides, sort_by_fitness};
use polypaint::{Painting, PopulationStats, Settings, Target};

/// Seed and score a random polygon population against a target image.
#[derive(Debug, Parser)]
#[command(name = "polypaint", version, about)]
struct Args {
    /// image to approximate
    target: PathBuf,

    /// settings file (JSON); defaults are used if it doesn't exist
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// where to write the best painting
    #[arg(short, long, default_value = "best.png")]
    output: PathBuf,

    /// write the effective settings back to the settings file
    #[arg(long)]
    write_default_settings: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // configure Rayon's global thread pool once at startup so worker threads get nice names like "rayon-0".
    let _ = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("rayon-{i}"))
        .build_global();

    let args = Args::parse();

    let settings = Settings::load(&args.settings);
    settings.validate()?;
    if args.write_default_settings {
        settings
            .save(&args.settings)
            .with_context(|| format!("writing {}", args.settings.display()))?;
        log::info!("settings written to {}", args.settings.display());
    }

    let target = Arc::new(
        Target::load(&args.target).with_context(|| format!("loading {}", args.target.display()))?,
    );
    let mut rng = Pcg32::seed_from_u64(settings.seed);

    log::info!(
        "seeding {} paintings x {} polygons ({} sides)",
        settings.population_size,
        settings.genes,
        settings.sides
    );
    let mut population = random_population_with_sides(
        &mut rng,
        settings.population_size,
        settings.genes,
        settings.sides,
        &target,
    )?;

    fit_population(&mut population)?;
    sort_by_fitness(&mut population)?;
    if let Some(stats) = PopulationStats::from_population(&population)? {
        log::info!(
            "initial population: best {:.3} ({:.2} dB), mean {:.3}, worst {:.3}",
            stats.best,
            psnr_from_rmse(stats.best),
            stats.mean,
            stats.worst
        );
    }

    // one offspring from the two best, to show the operators in action
    if population.len() >= 2 {
        let ops = settings.to_mutate_config();
        let child = Painting::crossover(&mut rng, &population[0], &population[1], ops.crossover_ratio)?;
        let (mut child, outcome) =
            child.mutate(&mut rng, ops.recreation_chance, ops.mutation_chance, ops.ratio, &target)?;
        let fitness = child.evaluate()?.fitness().unwrap_or(f64::NAN);
        log::info!("offspring ({outcome:?}): {fitness:.3}");

        if child.try_cmp(&population[0])?.is_lt() {
            population[0] = child;
        }
    }

    let best = &population[0];
    save_canvas(best.canvas(), &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("best painting written to {}", args.output.display());
    for gene in best.genes.iter().take(3) {
        log::debug!("{gene}");
    }

    Ok(())
}
