//! population-level building blocks. no selection or replacement policy lives here.

use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;

use crate::error::PaintError;
use crate::painting::Painting;
use crate::target::Target;

/// `population_size` independent random paintings of `genes` triangles, all sharing `target`.
pub fn random_population<R: Rng + ?Sized>(
    rng: &mut R,
    population_size: usize,
    genes: usize,
    target: &Arc<Target>,
) -> Result<Vec<Painting>, PaintError> {
    random_population_with_sides(rng, population_size, genes, crate::painting::DEFAULT_SIDES, target)
}

/// same as `random_population` with `sides`-gons
pub fn random_population_with_sides<R: Rng + ?Sized>(
    rng: &mut R,
    population_size: usize,
    genes: usize,
    sides: usize,
    target: &Arc<Target>,
) -> Result<Vec<Painting>, PaintError> {
    profiling::scope!("random_population");
    (0..population_size)
        .map(|_| Painting::with_sides(rng, genes, sides, Arc::clone(target)))
        .collect()
}

/// evaluate every painting against its own target in parallel.
/// each task only touches its own canvas; the target is read-only.
pub fn fit_population(population: &mut [Painting]) -> Result<(), PaintError> {
    profiling::scope!("fit_population");
    population
        .par_iter_mut()
        .try_for_each(|p| p.evaluate().map(|_| ()))
}

/// ascending by fitness (best first). fails without reordering if anything is unevaluated.
pub fn sort_by_fitness(population: &mut [Painting]) -> Result<(), PaintError> {
    if population.iter().any(|p| p.fitness().is_none()) {
        return Err(PaintError::Unevaluated);
    }
    population.sort_by(|a, b| a.try_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(())
}

/// summary of an evaluated population
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationStats {
    pub size: usize,
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
}

impl PopulationStats {
    /// None for an empty population; Unevaluated if any painting lacks a fitness
    pub fn from_population(population: &[Painting]) -> Result<Option<Self>, PaintError> {
        let scores = population
            .iter()
            .map(|p| p.fitness().ok_or(PaintError::Unevaluated))
            .collect::<Result<Vec<f64>, _>>()?;
        if scores.is_empty() {
            return Ok(None);
        }

        let best = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let worst = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(Some(Self { size: scores.len(), best, worst, mean }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn target() -> Arc<Target> {
        let rgba: Vec<u8> = (0..16u32 * 12 * 4).map(|i| (i * 7 % 256) as u8 | 0x03).collect();
        Arc::new(Target::from_rgba8(16, 12, &rgba).unwrap())
    }

    #[test]
    fn test_random_population_shape() {
        let mut rng = Pcg32::seed_from_u64(1);
        let t = target();
        let pop = random_population(&mut rng, 6, 9, &t).unwrap();
        assert_eq!(pop.len(), 6);
        for p in &pop {
            assert_eq!(p.genes.len(), 9);
            assert!(p.genes.iter().all(|g| g.sides() == 3));
            assert!(Arc::ptr_eq(p.target(), &t));
            assert_eq!(p.fitness(), None);
        }
        // no shared gene storage between individuals
        assert_ne!(pop[0].genes[0].points.as_ptr(), pop[1].genes[0].points.as_ptr());
    }

    #[test]
    fn test_fit_matches_sequential() {
        let mut rng = Pcg32::seed_from_u64(2);
        let t = target();
        let mut pop = random_population_with_sides(&mut rng, 8, 5, 4, &t).unwrap();
        let mut expected = pop.clone();
        for p in &mut expected {
            p.evaluate().unwrap();
        }

        fit_population(&mut pop).unwrap();
        for (a, b) in pop.iter().zip(&expected) {
            assert_eq!(a.fitness(), b.fitness());
            assert_eq!(a.canvas().data(), b.canvas().data());
        }
    }

    #[test]
    fn test_sort_best_first() {
        let mut rng = Pcg32::seed_from_u64(3);
        let t = target();
        let mut pop = random_population(&mut rng, 10, 4, &t).unwrap();
        fit_population(&mut pop).unwrap();
        sort_by_fitness(&mut pop).unwrap();
        for w in pop.windows(2) {
            assert!(w[0].fitness().unwrap() <= w[1].fitness().unwrap());
        }

        let stats = PopulationStats::from_population(&pop).unwrap().unwrap();
        assert_eq!(stats.size, 10);
        assert_eq!(stats.best, pop[0].fitness().unwrap());
        assert_eq!(stats.worst, pop[9].fitness().unwrap());
        assert!(stats.best <= stats.mean && stats.mean <= stats.worst);
    }

    #[test]
    fn test_sort_rejects_unevaluated() {
        let mut rng = Pcg32::seed_from_u64(4);
        let t = target();
        let mut pop = random_population(&mut rng, 3, 2, &t).unwrap();
        pop[0].evaluate().unwrap();
        assert!(matches!(sort_by_fitness(&mut pop), Err(PaintError::Unevaluated)));
        assert!(matches!(PopulationStats::from_population(&pop), Err(PaintError::Unevaluated)));
    }

    #[test]
    fn test_empty_population_stats() {
        assert_eq!(PopulationStats::from_population(&[]).unwrap(), None);
    }
}
