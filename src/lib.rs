//! Approximate a raster image with a stack of colored polygons, evolved by a genetic algorithm.
//!
//! This crate holds the evolutionary building blocks: the polygon gene ([`Polygon`]),
//! the individual ([`Painting`]) with its crossover and mutation operators, the
//! fitness metric ([`fitness::rmse`]) and population helpers. The generational loop
//! (selection, replacement, termination) belongs to the caller.
//!
//! Every stochastic operation takes an explicit `&mut impl Rng`, so a seeded
//! `rand_pcg::Pcg32` makes a run reproducible.

pub mod dna;
pub mod error;
pub mod fitness;
pub mod mutation_config;
pub mod painting;
pub mod population;
pub mod render;
pub mod settings;
pub mod target;

pub use dna::Polygon;
pub use error::PaintError;
pub use mutation_config::MutateConfig;
pub use painting::{MutationOutcome, Painting};
pub use population::{
    fit_population, random_population, random_population_with_sides, sort_by_fitness, PopulationStats,
};
pub use settings::Settings;
pub use target::Target;
