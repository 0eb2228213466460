//! Removes the script output of entries that only exist for their
//! by-products.
//!
//! A stylesheet-only entry still gets a small script file (and maybe its
//! source map) from the bundler. [`Pruner`] drops those files from the
//! asset table and from the entry's file lists, before the manifest is
//! written. The number of files removed per entry is checked against
//! [`RemovalBounds`]: anything else means the bundler's output changed
//! shape, and the pass is aborted rather than half-pruned.

use crate::core::models::{Compilation, PruneConfig, PruneReport, PrunedGroup, RemovalBounds};
use crate::utils::{Logger, Result, ShearsError};
use regex::Regex;
use std::collections::HashSet;

/// Drop a trailing `?query` from an output filename
pub fn strip_query(filename: &str) -> &str {
    filename.split('?').next().unwrap_or(filename)
}

#[derive(Debug, Clone)]
pub struct Pruner {
    targets: Vec<String>,
    bounds: RemovalBounds,
    code_pattern: Regex,
}

/// Files selected for removal in one group
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedGroup {
    name: String,
    code_files: Vec<String>,
    map_files: Vec<String>,
}

impl PlannedGroup {
    fn removed(&self) -> Vec<String> {
        self.code_files.iter().chain(self.map_files.iter()).cloned().collect()
    }
}

/// Removals for every target, checked and ready to apply
#[derive(Debug, Clone)]
pub struct PrunePlan {
    groups: Vec<PlannedGroup>,
}

impl Pruner {
    pub fn new(config: &PruneConfig) -> Result<Self> {
        if config.bounds.min > config.bounds.max {
            return Err(ShearsError::config(format!(
                "removal bounds are empty: min {} > max {}",
                config.bounds.min, config.bounds.max
            )));
        }

        let code_pattern = Regex::new(&config.code_pattern)?;

        let mut seen = HashSet::new();
        let targets = config
            .targets
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect();

        Ok(Self {
            targets,
            bounds: config.bounds,
            code_pattern,
        })
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn is_code_file(&self, filename: &str) -> bool {
        self.code_pattern.is_match(filename)
    }

    /// Select the files to remove without touching the compilation.
    ///
    /// Fails on the first target that is missing from the build or whose
    /// removal count falls outside the bounds.
    pub fn plan(&self, compilation: &Compilation) -> Result<PrunePlan> {
        let mut groups = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            let group = compilation
                .group(target)
                .ok_or_else(|| ShearsError::MissingGroup(target.clone()))?;

            let code_files: Vec<String> = group
                .files
                .iter()
                .filter(|f| self.is_code_file(f))
                .cloned()
                .collect();

            // Maps are usually auxiliary files, but some bundlers list them with the code
            let map_files: Vec<String> = group
                .files
                .iter()
                .chain(group.auxiliary_files.iter())
                .filter(|f| !code_files.contains(f) && code_files.iter().any(|code| is_map_of(f, code)))
                .cloned()
                .collect();

            let planned = PlannedGroup {
                name: group.name.clone(),
                code_files,
                map_files,
            };

            let count = planned.code_files.len() + planned.map_files.len();
            if !self.bounds.contains(count) {
                return Err(ShearsError::Prune {
                    group: planned.name.clone(),
                    matched: planned.removed(),
                    min: self.bounds.min,
                    max: self.bounds.max,
                });
            }

            groups.push(planned);
        }

        Ok(PrunePlan { groups })
    }

    /// Plan and apply in one step. On error the compilation is unchanged.
    pub fn prune(&self, compilation: &mut Compilation) -> Result<PruneReport> {
        let plan = self.plan(compilation)?;
        Ok(plan.apply(compilation))
    }
}

impl PrunePlan {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn apply(self, compilation: &mut Compilation) -> PruneReport {
        let mut report = PruneReport::default();

        for planned in self.groups {
            if let Some(group) = compilation.group_mut(&planned.name) {
                group
                    .files
                    .retain(|f| !planned.code_files.contains(f) && !planned.map_files.contains(f));
                group.auxiliary_files.retain(|f| !planned.map_files.contains(f));
            }

            let removed = planned.removed();
            for filename in &removed {
                let dropped = compilation
                    .assets
                    .remove(filename)
                    .or_else(|| compilation.assets.remove(strip_query(filename)));

                if dropped.is_some() {
                    Logger::removed_file(filename);
                } else {
                    Logger::debug(&format!(
                        "{} was listed by entry {} but is not in the asset table",
                        filename, planned.name
                    ));
                }
            }

            Logger::pruned_group(&planned.name, &removed);
            report.groups.push(PrunedGroup {
                name: planned.name,
                removed,
            });
        }

        report
    }
}

fn is_map_of(candidate: &str, code_file: &str) -> bool {
    candidate
        .strip_suffix(".map")
        .map(|base| base == code_file || base == strip_query(code_file))
        .unwrap_or(false)
}

/// Prune `compilation` according to `config`
pub fn prune(compilation: &mut Compilation, config: &PruneConfig) -> Result<PruneReport> {
    Pruner::new(config)?.prune(compilation)
}
