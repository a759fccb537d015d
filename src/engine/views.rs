use chrono::{DateTime, NaiveDate, Utc};

use crate::engine::dispatcher::DispatchEngine;
use crate::store::job::Job;
use crate::store::service_order::ServiceOrder;

/// Unassigned jobs grouped under their parent service order.
#[derive(Debug, Clone)]
pub struct ServiceOrderGroup {
    pub order: ServiceOrder,
    pub jobs: Vec<Job>,
}

impl DispatchEngine {
    /// Jobs on a technician's lane for one day, sorted by start time.
    pub async fn assigned_jobs(&self, technician_id: &str, date: NaiveDate) -> Vec<Job> {
        self.job_table()
            .read()
            .await
            .jobs_for_technician_and_day(technician_id, date)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Scheduled jobs overlapping `[start, end)` on a technician's lane.
    pub async fn overlapping_jobs(
        &self,
        technician_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Job> {
        self.job_table()
            .read()
            .await
            .overlapping_jobs(technician_id, start, end)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The unassigned pool grouped by service order. Empty groups are
    /// dropped. With a search term, a group survives when the order id or
    /// title matches (keeping all its jobs), or shrinks to the jobs whose
    /// title matches.
    pub async fn unassigned_by_service_order(&self, search: Option<&str>) -> Vec<ServiceOrderGroup> {
        let unassigned = self.unassigned_jobs().await;
        let term = search.map(|s| s.to_lowercase()).filter(|s| !s.is_empty());

        self.service_orders()
            .iter()
            .filter_map(|order| {
                let jobs: Vec<Job> = unassigned
                    .iter()
                    .filter(|j| j.service_order_id == order.id)
                    .cloned()
                    .collect();
                let jobs = match &term {
                    None => jobs,
                    Some(term) => {
                        let order_matches = order.id.to_lowercase().contains(term)
                            || order.title.to_lowercase().contains(term);
                        if order_matches {
                            jobs
                        } else {
                            jobs.into_iter()
                                .filter(|j| j.title.to_lowercase().contains(term))
                                .collect()
                        }
                    }
                };
                if jobs.is_empty() {
                    None
                } else {
                    Some(ServiceOrderGroup {
                        order: order.clone(),
                        jobs,
                    })
                }
            })
            .collect()
    }
}
