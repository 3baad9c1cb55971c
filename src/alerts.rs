//! # Alert Selector
//!
//! Decides which weather alerts reach the alerts panel. Upstream feeds often carry
//! the same event several times (one entry per issuing office or per update), so
//! alerts are grouped by a configurable [`DedupPredicate`] and only the most urgent
//! entry of each group survives. Survivors keep their input order; the panel shows
//! at most [`MAX_SHOWN`] of them and silently drops the rest.

use crate::config::AlertsConfig;
use crate::model::AlertRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use thiserror::Error;

/// Alerts drawn by the panel.
pub const MAX_SHOWN: usize = 2;

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("alert scratch buffer allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
}

/// Decides whether two alerts describe the same event.
pub trait DedupPredicate {
    fn same(&self, a: &AlertRecord, b: &AlertRecord) -> bool;
}

impl<F> DedupPredicate for F
where
    F: Fn(&AlertRecord, &AlertRecord) -> bool,
{
    fn same(&self, a: &AlertRecord, b: &AlertRecord) -> bool {
        self(a, b)
    }
}

/// Built-in grouping rules selectable from the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupStrategy {
    /// Same event name, ignoring case and surrounding whitespace
    Event,
    /// Same first category tag; alerts without a category fall back to the event name
    Category,
}

fn first_category(alert: &AlertRecord) -> Option<&str> {
    alert
        .category
        .split(&[',', ';'][..])
        .map(str::trim)
        .find(|tag| !tag.is_empty())
}

impl DedupPredicate for DedupStrategy {
    fn same(&self, a: &AlertRecord, b: &AlertRecord) -> bool {
        let same_event = || a.event.trim().eq_ignore_ascii_case(b.event.trim());
        match self {
            DedupStrategy::Event => same_event(),
            DedupStrategy::Category => match (first_category(a), first_category(b)) {
                (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
                _ => same_event(),
            },
        }
    }
}

/// Filter, group and rank alerts.
pub struct AlertSelector<'a, P> {
    predicate: P,
    urgency_terms: &'a [String],
    ignore_terms: &'a [String],
}

impl<'a> AlertSelector<'a, DedupStrategy> {
    pub fn from_config(config: &'a AlertsConfig) -> Self {
        Self::new(config.dedup, &config.urgency_terms, &config.ignore_terms)
    }
}

impl<'a, P: DedupPredicate> AlertSelector<'a, P> {
    pub fn new(predicate: P, urgency_terms: &'a [String], ignore_terms: &'a [String]) -> Self {
        Self {
            predicate,
            urgency_terms,
            ignore_terms,
        }
    }

    /// Rank of an alert: index of the last urgency term its event mentions.
    pub fn urgency(&self, alert: &AlertRecord) -> Option<usize> {
        let event = alert.event.to_lowercase();
        self.urgency_terms
            .iter()
            .rposition(|term| !term.is_empty() && event.contains(&term.to_lowercase()))
    }

    fn ignored(&self, alert: &AlertRecord) -> bool {
        let event = alert.event.to_lowercase();
        self.ignore_terms
            .iter()
            .any(|term| !term.is_empty() && event.contains(&term.to_lowercase()))
    }

    /// Surviving alerts in input order.
    ///
    /// Fails only if the scratch buffer cannot be allocated.
    pub fn select<'r>(&self, alerts: &'r [AlertRecord]) -> Result<Vec<&'r AlertRecord>, SelectError> {
        let mut groups: Vec<(usize, &AlertRecord)> = Vec::new();
        groups.try_reserve(alerts.len())?;

        for (index, alert) in alerts.iter().enumerate() {
            if self.ignored(alert) {
                debug!("Ignoring alert {:?}", alert.event);
                continue;
            }
            match groups
                .iter_mut()
                .find(|(_, kept)| self.predicate.same(kept, alert))
            {
                Some(slot) if self.urgency(alert) > self.urgency(slot.1) => *slot = (index, alert),
                Some(_) => debug!("Dropping duplicate alert {:?}", alert.event),
                None => groups.push((index, alert)),
            }
        }

        groups.sort_by_key(|&(index, _)| index);
        let mut selected = Vec::new();
        selected.try_reserve(groups.len())?;
        selected.extend(groups.into_iter().map(|(_, alert)| alert));
        Ok(selected)
    }
}
