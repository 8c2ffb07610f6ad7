//! Approval-status and treatment-site distributions.
//!
//! Groups keep the order in which their key first appears: canonical
//! templates first, then protocol phases.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{Catalog, CatalogTemplate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApprovalStatistic {
    pub approval_status: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SiteStatistic {
    pub site: String,
    pub count: u32,
}

impl Catalog {
    /// Count templates of kind `T` per approval status, optionally folding
    /// in every protocol phase stamped with its protocol's preview.
    pub fn approval_statistics<T: CatalogTemplate>(&self, include_phases: bool) -> Vec<ApprovalStatistic> {
        let phases = if include_phases {
            self.phase_templates::<T>(false)
        } else {
            Vec::new()
        };
        let keys = self
            .templates::<T>()
            .iter()
            .chain(&phases)
            .map(|t| t.preview().approval_status.as_str());
        tally(keys)
            .into_iter()
            .map(|(approval_status, count)| ApprovalStatistic {
                approval_status,
                count,
            })
            .collect()
    }

    /// Count templates of kind `T` per treatment site.
    ///
    /// `approved_only` filters the canonical list and restricts phase
    /// expansion to approved protocols.
    pub fn site_statistics<T: CatalogTemplate>(
        &self,
        approved_only: bool,
        include_phases: bool,
    ) -> Vec<SiteStatistic> {
        let phases = if include_phases {
            self.phase_templates::<T>(approved_only)
        } else {
            Vec::new()
        };
        let keys = self
            .templates::<T>()
            .iter()
            .filter(|t| !approved_only || t.preview().is_approved())
            .chain(&phases)
            .map(|t| t.preview().treatment_site.as_str());
        tally(keys)
            .into_iter()
            .map(|(site, count)| SiteStatistic { site, count })
            .collect()
    }
}

fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, u32)> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts
}
