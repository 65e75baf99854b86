use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use seedfill_core::{ModelRegistry, ModelSpec, build_dependency_report};

use crate::errors::SeedError;
use crate::model::{CountDefault, ModelReport, SeedConfig, SeedOptions, SeedPlan, SeedReport};
use crate::row::{ForeignKeyMap, build_row};
use crate::store::{DataStore, StoreError};

/// Outcome of one generation attempt for a model.
enum Outcome {
    Seeded(u64),
    /// A belongs-to target currently has no records; retry on a later sweep.
    Blocked,
}

/// Entry point for seeding registered models from a plan.
#[derive(Debug, Clone)]
pub struct SeedEngine {
    options: SeedOptions,
}

impl SeedEngine {
    pub fn new(options: SeedOptions) -> Self {
        Self { options }
    }

    /// Populate every model in the plan, dependencies first.
    ///
    /// Models are processed in topological order of their belongs-to edges
    /// when that order exists. A model whose dependency has no rows yet is
    /// deferred to the next sweep; a plan that never clears (a cycle, or a
    /// target outside the plan that nobody populates) fails as
    /// [`SeedError::Stalled`] once `max_sweeps` passes are exhausted.
    pub fn run(
        &self,
        registry: &ModelRegistry,
        store: &mut dyn DataStore,
        plan: &SeedPlan,
    ) -> Result<SeedReport, SeedError> {
        validate_plan(registry, plan, &self.options)?;

        let mut rng = match self.options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };

        let configured: BTreeSet<String> = plan.keys().cloned().collect();
        let dependency_report = build_dependency_report(registry, &configured);

        let order: Vec<String> = match &dependency_report.topo_order {
            Some(order) => order.clone(),
            None => {
                warn!(
                    cycle = ?dependency_report.cycle,
                    "belongs-to cycle among configured models; falling back to sweep retries"
                );
                configured.iter().cloned().collect()
            }
        };

        info!(
            models = configured.len(),
            edges = dependency_report.summary.edges,
            seed = self.options.seed,
            "seeding started"
        );

        let mut pending = configured;
        let mut report = SeedReport::default();

        for sweep in 1..=self.options.max_sweeps {
            for model in &order {
                if !pending.contains(model) {
                    continue;
                }
                let spec = registry
                    .get(model)
                    .ok_or_else(|| SeedError::UnknownModel(model.clone()))?;
                let config = plan.get(model).cloned().unwrap_or_default();

                match self.populate(spec, &config, registry, store, &mut rng)? {
                    Outcome::Seeded(rows_inserted) => {
                        pending.remove(model);
                        info!(model = %model, rows = rows_inserted, sweep, "model seeded");
                        report.rows_total += rows_inserted;
                        report.models.push(ModelReport {
                            model: model.clone(),
                            rows_inserted,
                            sweep,
                        });
                    }
                    Outcome::Blocked => {
                        debug!(model = %model, sweep, "model deferred; a dependency has no rows");
                    }
                }
            }

            if pending.is_empty() {
                report.sweeps = sweep;
                break;
            }
        }

        if !pending.is_empty() {
            let pending: Vec<String> = pending.into_iter().collect();
            warn!(pending = ?pending, "seeding stalled");
            return Err(SeedError::Stalled {
                sweeps: self.options.max_sweeps,
                pending,
            });
        }

        info!(
            rows = report.rows_total,
            sweeps = report.sweeps,
            "seeding completed"
        );
        Ok(report)
    }

    /// Attempt to fully populate one model.
    ///
    /// A store rejection is fatal on the first offending row; the error
    /// carries the model, the attempted values, and the validation detail.
    fn populate(
        &self,
        spec: &ModelSpec,
        config: &SeedConfig,
        registry: &ModelRegistry,
        store: &mut dyn DataStore,
        rng: &mut impl Rng,
    ) -> Result<Outcome, SeedError> {
        let Some(foreign_keys) = resolve_foreign_keys(spec, registry, store)? else {
            return Ok(Outcome::Blocked);
        };

        let count = match config.count {
            Some(count) => count,
            None => self.options.default_count.draw(rng),
        };

        for _ in 0..count {
            let row = build_row(spec, &foreign_keys, &config.empty_fields, rng);
            match store.insert(&spec.name, row.clone()) {
                Ok(_) => {}
                Err(StoreError::Rejected { errors }) => {
                    return Err(SeedError::Rejected {
                        model: spec.name.clone(),
                        row,
                        errors,
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(Outcome::Seeded(count))
    }
}

/// Resolve foreign-key candidates for a model, or signal it is blocked.
///
/// Each belongs-to target is queried live: a target with zero records blocks
/// the whole model immediately, otherwise its current primary keys become the
/// candidates for the relationship's local field.
fn resolve_foreign_keys(
    spec: &ModelSpec,
    registry: &ModelRegistry,
    store: &dyn DataStore,
) -> Result<Option<ForeignKeyMap>, SeedError> {
    let mut foreign_keys = ForeignKeyMap::new();

    for rel in spec.belongs_to() {
        if !registry.contains(&rel.target_model) {
            return Err(SeedError::UnknownModel(rel.target_model.clone()));
        }
        if store.count(&rel.target_model)? == 0 {
            return Ok(None);
        }
        foreign_keys.insert(rel.local_field.clone(), store.primary_keys(&rel.target_model)?);
    }

    Ok(Some(foreign_keys))
}

fn validate_plan(
    registry: &ModelRegistry,
    plan: &SeedPlan,
    options: &SeedOptions,
) -> Result<(), SeedError> {
    if let CountDefault::Uniform { min, max } = options.default_count
        && min > max
    {
        return Err(SeedError::InvalidPlan(format!(
            "default count range is inverted ({min} > {max})"
        )));
    }

    for (model, config) in plan {
        let spec = registry
            .get(model)
            .ok_or_else(|| SeedError::UnknownModel(model.clone()))?;
        for field in &config.empty_fields {
            if !spec.has_field(field) {
                return Err(SeedError::InvalidPlan(format!(
                    "model '{model}' has no field '{field}' to leave empty"
                )));
            }
        }
    }

    Ok(())
}
