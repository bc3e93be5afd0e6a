/// genetic operator parameters, handed to crossover/mutation by the outer driver.
/// built from `Settings::to_mutate_config`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MutateConfig {
    // mutation
    pub recreation_chance: f64, // per-gene chance that the whole painting is thrown away and regenerated
    pub mutation_chance: f64,   // chance that a mutate call does anything at all
    pub ratio: f32,             // relative perturbation size, v -> U[v - ratio*v, v + ratio*v]

    // crossover
    pub crossover_ratio: f64, // share of the child's genes drawn from the first parent
}

impl Default for MutateConfig {
    fn default() -> Self {
        Self {
            recreation_chance: 0.01,
            mutation_chance: 0.5,
            ratio: 0.1,
            crossover_ratio: 0.5,
        }
    }
}
