//! Sample sets returned by solvers.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use rapq_cqm::{Binary, ConstrainedQuadraticModel, CqmResult, Sample};

use crate::job::Job;
use serde::{Deserialize, Serialize};

/// One candidate assignment with its evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// The assignment.
    pub sample: Sample,
    /// Objective value.
    pub energy: f64,
    /// How many times the solver returned this assignment.
    pub num_occurrences: u32,
    /// Whether every constraint is satisfied.
    pub is_feasible: bool,
    /// Per-constraint satisfaction, keyed by constraint label.
    #[serde(default)]
    pub is_satisfied: BTreeMap<String, bool>,
}

impl SampleRecord {
    /// Evaluate a sample against a model.
    pub fn evaluate(
        cqm: &ConstrainedQuadraticModel,
        sample: Sample,
        num_occurrences: u32,
    ) -> CqmResult<Self> {
        let energy = cqm.energy(&sample)?;
        let mut is_satisfied = BTreeMap::new();
        for c in cqm.constraints() {
            is_satisfied.insert(c.label.clone(), c.is_satisfied(&sample)?);
        }
        let is_feasible = is_satisfied.values().all(|s| *s);
        Ok(Self {
            sample,
            energy,
            num_occurrences,
            is_feasible,
            is_satisfied,
        })
    }

    /// Ordering used by [`SampleSet::sort`]: feasible first, then energy.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .is_feasible
            .cmp(&self.is_feasible)
            .then_with(|| self.energy.total_cmp(&other.energy))
    }
}

/// A solver's answer: candidate assignments plus solver metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    /// Problem label the set answers.
    pub label: String,
    /// Variable order used for display.
    #[serde(default)]
    pub variables: Vec<Binary>,
    /// Candidate records.
    pub records: Vec<SampleRecord>,
    /// Solver-reported metadata (timings, problem id, ...).
    #[serde(default)]
    pub info: serde_json::Map<String, serde_json::Value>,
}

impl SampleSet {
    /// Create an empty sample set for a model.
    pub fn new(label: impl Into<String>, cqm: &ConstrainedQuadraticModel) -> Self {
        Self {
            label: label.into(),
            variables: cqm.variables().to_vec(),
            records: Vec::new(),
            info: serde_json::Map::new(),
        }
    }

    /// Evaluate raw samples against the model and collect them.
    ///
    /// Identical samples are merged and their occurrences summed. The
    /// result is sorted with [`SampleSet::sort`].
    pub fn from_samples<I>(
        label: impl Into<String>,
        cqm: &ConstrainedQuadraticModel,
        samples: I,
    ) -> CqmResult<Self>
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut set = Self::new(label, cqm);
        for sample in samples {
            if let Some(existing) = set.records.iter_mut().find(|r| r.sample == sample) {
                existing.num_occurrences += 1;
                continue;
            }
            set.records.push(SampleRecord::evaluate(cqm, sample, 1)?);
        }
        set.sort();
        Ok(set)
    }

    /// Attach a metadata entry.
    pub fn with_info(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.info.insert(key.into(), value);
        self
    }

    /// Attach the metadata of the job that produced this set.
    pub fn with_job(mut self, job: &Job) -> Self {
        self.info.extend(job.info());
        self
    }

    /// Append a record.
    pub fn push(&mut self, record: SampleRecord) {
        self.records.push(record);
    }

    /// Sort records: feasible first, then ascending energy.
    pub fn sort(&mut self) {
        self.records.sort_by(SampleRecord::rank);
    }

    /// Number of distinct records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total occurrences across all records.
    pub fn total_occurrences(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.num_occurrences)).sum()
    }

    /// Feasible records in stored order.
    pub fn feasible(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter().filter(|r| r.is_feasible)
    }

    /// Lowest-energy feasible record.
    pub fn best_feasible(&self) -> Option<&SampleRecord> {
        self.feasible().min_by(|a, b| a.energy.total_cmp(&b.energy))
    }

    /// Render only the first `limit` records.
    ///
    /// The footer still counts the whole set.
    pub fn display_head(&self, limit: usize) -> Head<'_> {
        Head { set: self, limit }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, limit: usize) -> fmt::Result {
        let header: Vec<&str> = self.variables.iter().map(Binary::label).collect();
        writeln!(
            f,
            "  {} {:>12} {:>8} {:>8}",
            header.join(" "),
            "energy",
            "num_oc.",
            "is_fea."
        )?;
        for (i, record) in self.records.iter().take(limit).enumerate() {
            let bits: Vec<String> = self
                .variables
                .iter()
                .map(|v| {
                    let width = v.label().len();
                    let value = record
                        .sample
                        .get(v.label())
                        .map_or_else(|| "-".to_string(), |b| b.to_string());
                    format!("{value:>width$}")
                })
                .collect();
            writeln!(
                f,
                "{i} {} {:>12.6} {:>8} {:>8}",
                bits.join(" "),
                record.energy,
                record.num_occurrences,
                record.is_feasible
            )?;
        }
        write!(
            f,
            "['BINARY', {} rows, {} samples, {} variables]",
            self.records.len(),
            self.total_occurrences(),
            self.variables.len()
        )
    }
}

impl fmt::Display for SampleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, usize::MAX)
    }
}

/// Leading records of a sample set, see [`SampleSet::display_head`].
pub struct Head<'a> {
    set: &'a SampleSet,
    limit: usize,
}

impl fmt::Display for Head<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.set.render(f, self.limit)
    }
}
