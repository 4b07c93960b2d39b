//! Route planner: greedy nearest-neighbor tour over complaint locations.
//!
//! Starting from the worker's position, repeatedly visit the closest complaint
//! not yet visited. This is a heuristic, not an optimal tour. Each step scans
//! every remaining stop, so planning `n` complaints costs O(n²) distance
//! evaluations; batches are small manual selections, so that is acceptable.

use std::collections::HashSet;
use std::str::FromStr;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::haversine::Haversine;
use crate::model::{Complaint, ComplaintId, Location};
use crate::traits::{ComplaintStore, DistanceMetric};

/// What to do with requested ids that are not in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Drop them from the route and report them in [`PlannedRoute::skipped`].
    #[default]
    Lenient,
    /// Fail the whole request with `NotFound`.
    Strict,
}

impl FromStr for MissingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(Error::invalid(format!(
                "unknown missing-id policy {other:?}, expected lenient or strict"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub missing: MissingPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRoute {
    /// Complaints in visiting order.
    pub stops: Vec<Complaint>,
    /// Distance of each leg; `legs_km[i]` ends at `stops[i]`.
    pub legs_km: Vec<f64>,
    pub total_distance_km: f64,
    /// Requested ids that did not resolve to a complaint.
    pub skipped: Vec<ComplaintId>,
}

impl PlannedRoute {
    pub fn ids(&self) -> Vec<ComplaintId> {
        self.stops.iter().map(|complaint| complaint.id).collect()
    }
}

/// Visiting order over `locations` as indices, with the length of each leg.
///
/// Ties go to the candidate that appears first in `locations`.
pub fn greedy_order<M: DistanceMetric>(
    start: Location,
    locations: &[Location],
    metric: &M,
) -> Vec<(usize, f64)> {
    let mut remaining: Vec<usize> = (0..locations.len()).collect();
    let mut order = Vec::with_capacity(locations.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut best_slot = 0;
        let mut best_km = metric.distance_km(current, locations[remaining[0]]);

        for (slot, &candidate) in remaining.iter().enumerate().skip(1) {
            let km = metric.distance_km(current, locations[candidate]);
            if km < best_km {
                best_slot = slot;
                best_km = km;
            }
        }

        // `remove` keeps the rest in input order so later ties stay stable.
        let chosen = remaining.remove(best_slot);
        current = locations[chosen];
        order.push((chosen, best_km));
    }

    order
}

pub struct RoutePlanner<S, M = Haversine> {
    store: S,
    metric: M,
    options: PlanOptions,
}

impl<S: ComplaintStore> RoutePlanner<S> {
    pub fn new(store: S) -> Self {
        Self::with_metric(store, Haversine, PlanOptions::default())
    }

    pub fn with_options(store: S, options: PlanOptions) -> Self {
        Self::with_metric(store, Haversine, options)
    }
}

impl<S, M> RoutePlanner<S, M>
where
    S: ComplaintStore,
    M: DistanceMetric,
{
    pub fn with_metric(store: S, metric: M, options: PlanOptions) -> Self {
        Self {
            store,
            metric,
            options,
        }
    }

    /// Order the complaints behind `ids` for a worker starting at `start`.
    ///
    /// Never mutates the store. Duplicate ids are visited once.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a bad start point (checked before any lookup),
    /// `NotFound` for an unknown id under [`MissingPolicy::Strict`], and any
    /// store failure.
    pub fn plan(&self, start: Location, ids: &[ComplaintId]) -> Result<PlannedRoute> {
        start.validate()?;

        let (complaints, skipped) = self.resolve(ids)?;
        let locations: Vec<Location> = complaints.iter().map(|c| c.location).collect();
        let order = greedy_order(start, &locations, &self.metric);

        let mut slots: Vec<Option<Complaint>> = complaints.into_iter().map(Some).collect();
        let mut stops = Vec::with_capacity(order.len());
        let mut legs_km = Vec::with_capacity(order.len());
        for (index, km) in order {
            if let Some(complaint) = slots[index].take() {
                stops.push(complaint);
                legs_km.push(km);
            }
        }
        let total_distance_km: f64 = legs_km.iter().sum();

        info!(
            requested = ids.len(),
            stops = stops.len(),
            skipped = skipped.len(),
            total_distance_km,
            "route planned"
        );

        Ok(PlannedRoute {
            stops,
            legs_km,
            total_distance_km,
            skipped,
        })
    }

    /// Look up every distinct id, keeping request order.
    fn resolve(&self, ids: &[ComplaintId]) -> Result<(Vec<Complaint>, Vec<ComplaintId>)> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<ComplaintId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        // Only the store crosses threads; the metric need not be `Sync`.
        let store = &self.store;
        let lookups: Vec<Result<Option<Complaint>>> =
            unique.par_iter().map(|id| store.get(id)).collect();

        let mut resolved = Vec::with_capacity(unique.len());
        let mut skipped = Vec::new();
        for (id, lookup) in unique.into_iter().zip(lookups) {
            match lookup? {
                Some(complaint) => resolved.push(complaint),
                None if self.options.missing == MissingPolicy::Strict => {
                    return Err(Error::NotFound(id.to_string()));
                }
                None => {
                    debug!(%id, "route id not found, skipping");
                    skipped.push(id);
                }
            }
        }

        Ok((resolved, skipped))
    }
}
