use std::cmp::Ordering;
use std::sync::Arc;

use rand::Rng;
use tiny_skia::{Color, Pixmap};

use crate::dna::Polygon;
use crate::error::PaintError;
use crate::fitness::rmse;
use crate::render::blank_canvas;
use crate::target::Target;

/// vertex count of genes created by `Painting::new`
pub const DEFAULT_SIDES: usize = 3;

/// what `Painting::mutate` ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// the mutation_chance roll failed, painting returned as-is
    Skipped,
    /// every gene was perturbed in place
    Mutated,
    /// a recreation roll hit, painting replaced by a fresh random one
    Recreated,
}

/// one individual: an ordered stack of polygons, the canvas they render to, and its fitness.
/// genes are painted first to last, so later genes cover earlier ones.
#[derive(Clone, Debug)]
pub struct Painting {
    pub genes: Vec<Polygon>,
    canvas: Pixmap,
    target: Arc<Target>,
    fitness: Option<f64>, // None until fit()
}

impl Painting {
    /// random painting of `genes` triangles
    pub fn new<R: Rng + ?Sized>(rng: &mut R, genes: usize, target: Arc<Target>) -> Result<Self, PaintError> {
        Self::with_sides(rng, genes, DEFAULT_SIDES, target)
    }

    /// random painting of `genes` polygons with `sides` vertices each
    pub fn with_sides<R: Rng + ?Sized>(
        rng: &mut R,
        genes: usize,
        sides: usize,
        target: Arc<Target>,
    ) -> Result<Self, PaintError> {
        let genes = (0..genes)
            .map(|_| Polygon::random(rng, sides, &target))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_genes(genes, target)
    }

    /// wrap an existing gene sequence; canvas blank, fitness unset
    pub fn from_genes(genes: Vec<Polygon>, target: Arc<Target>) -> Result<Self, PaintError> {
        let canvas = blank_canvas(target.width(), target.height())?;
        Ok(Self { genes, canvas, target, fitness: None })
    }

    #[inline]
    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    #[inline]
    pub fn target(&self) -> &Arc<Target> {
        &self.target
    }

    /// Some(rmse) once `fit` has run, None before that and after a mutation
    #[inline]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// draw every gene, filled, in order on top of whatever the canvas already holds.
    pub fn paint(&mut self) -> Result<(), PaintError> {
        profiling::scope!("Painting::paint");
        for gene in &self.genes {
            gene.draw(&mut self.canvas, true)?;
        }
        Ok(())
    }

    /// clear the canvas, repaint from scratch and score it against `reference`.
    /// always a full re-render, never incremental. `reference` must have the canvas's dimensions;
    /// otherwise nothing is touched and ShapeMismatch is returned.
    pub fn fit(&mut self, reference: &Target) -> Result<&mut Self, PaintError> {
        profiling::scope!("Painting::fit");
        let expected = self.canvas.data().len();
        if self.canvas.width() != reference.width() || self.canvas.height() != reference.height() {
            return Err(PaintError::ShapeMismatch { expected, actual: reference.rgba().len() });
        }

        self.canvas.fill(Color::TRANSPARENT);
        self.paint()?;

        self.fitness = Some(rmse(reference.rgba(), self.canvas.data())?);
        Ok(self)
    }

    /// `fit` against the painting's own target
    pub fn evaluate(&mut self) -> Result<&mut Self, PaintError> {
        let target = Arc::clone(&self.target);
        self.fit(&target)
    }

    /// ordering by fitness, lower first. errors if either side was never evaluated.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, PaintError> {
        match (self.fitness, other.fitness) {
            (Some(a), Some(b)) => Ok(a.total_cmp(&b)),
            _ => Err(PaintError::Unevaluated),
        }
    }

    /// child made of deep copies of parent genes, sampled WITH replacement:
    /// round(ratio * n) from daddy, then the remaining n - round(ratio * n) from mommy, n = daddy's gene count.
    /// a parent gene can show up several times or not at all. the child shares daddy's target and is unevaluated.
    pub fn crossover<R: Rng + ?Sized>(
        rng: &mut R,
        daddy: &Painting,
        mommy: &Painting,
        ratio: f64,
    ) -> Result<Painting, PaintError> {
        profiling::scope!("Painting::crossover");
        let size = daddy.genes.len();
        let from_daddy = ((ratio.clamp(0.0, 1.0) * size as f64).round() as usize).min(size);

        let mut genes = Vec::with_capacity(size);
        sample_with_replacement(rng, &daddy.genes, from_daddy, &mut genes)?;
        sample_with_replacement(rng, &mommy.genes, size - from_daddy, &mut genes)?;

        Painting::from_genes(genes, Arc::clone(&daddy.target))
    }

    /// roll once against `mutation_chance`; on a miss return self untouched.
    /// otherwise walk the genes: a roll <= `recreation_chance` throws the whole painting away
    /// (including genes already mutated in this call) and returns a fresh random one of the same size,
    /// whose polygons take the vertex count of the gene that triggered the recreation;
    /// any other roll mutates that gene with `ratio`. at most one recreation per call.
    pub fn mutate<R: Rng + ?Sized>(
        mut self,
        rng: &mut R,
        recreation_chance: f64,
        mutation_chance: f64,
        ratio: f32,
        target: &Arc<Target>,
    ) -> Result<(Painting, MutationOutcome), PaintError> {
        profiling::scope!("Painting::mutate");
        if rng.random::<f64>() > mutation_chance {
            log::trace!("mutation skipped");
            return Ok((self, MutationOutcome::Skipped));
        }

        let size = self.genes.len();
        for i in 0..size {
            if rng.random::<f64>() <= recreation_chance {
                log::trace!("recreating painting of {size} genes at gene {i}");
                let sides = self.genes[i].sides();
                let fresh = Painting::with_sides(rng, size, sides, Arc::clone(target))?;
                return Ok((fresh, MutationOutcome::Recreated));
            }
            self.genes[i].mutate(rng, ratio, target);
        }

        self.fitness = None;
        Ok((self, MutationOutcome::Mutated))
    }
}

fn sample_with_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[Polygon],
    k: usize,
    out: &mut Vec<Polygon>,
) -> Result<(), PaintError> {
    if k == 0 {
        return Ok(());
    }
    if pool.is_empty() {
        return Err(PaintError::EmptyParent);
    }
    out.extend((0..k).map(|_| pool[rng.random_range(0..pool.len())].clone()));
    Ok(())
}

// equal only when both are evaluated and score the same
impl PartialEq for Painting {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.fitness, other.fitness), (Some(a), Some(b)) if a == b)
    }
}

// unevaluated paintings are incomparable: every operator returns false. use try_cmp to get the error.
impl PartialOrd for Painting {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.fitness, other.fitness) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => {
                log::warn!("comparing paintings before fit was called");
                None
            }
        }
    }
}
