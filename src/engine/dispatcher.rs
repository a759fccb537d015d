use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::config::EngineConfig;
use crate::error::{DispatchError, Result};
use crate::store::job::Job;
use crate::store::job_store::{JobStore, ResizeOutcome};
use crate::store::service_order::ServiceOrder;
use crate::store::technician::{Technician, TechnicianMeta};

/// Central dispatch state: the owned job table plus the technician and
/// service-order directories.
///
/// All four schedule mutations go through the async operations below, which
/// model a network round-trip and serialize per job id so two
/// near-simultaneous operations on the same job cannot interleave.
pub struct DispatchEngine {
    config: EngineConfig,
    jobs: Arc<RwLock<JobStore>>,
    technicians: Arc<RwLock<HashMap<String, Technician>>>,
    orders: Vec<ServiceOrder>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DispatchEngine {
    pub fn new(config: EngineConfig) -> Self {
        let min_duration = config.min_duration_min;
        Self {
            config,
            jobs: Arc::new(RwLock::new(JobStore::with_min_duration(min_duration))),
            technicians: Arc::new(RwLock::new(HashMap::new())),
            orders: Vec::new(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_dataset(
        config: EngineConfig,
        jobs: Vec<Job>,
        technicians: Vec<Technician>,
        orders: Vec<ServiceOrder>,
    ) -> Self {
        let mut store = JobStore::with_min_duration(config.min_duration_min);
        for job in jobs {
            store.add_job(job);
        }
        let technicians = technicians
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        Self {
            config,
            jobs: Arc::new(RwLock::new(store)),
            technicians: Arc::new(RwLock::new(technicians)),
            orders,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The per-job in-flight guard. Guards are created lazily and kept for
    /// the job's lifetime (jobs are never deleted by this core).
    async fn job_guard(&self, job_id: &str) -> Arc<Mutex<()>> {
        let mut guards = self.in_flight.lock().await;
        guards
            .entry(job_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn simulate_roundtrip(&self) {
        if self.config.simulated_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.simulated_latency_ms)).await;
        }
    }

    /// Bind a job to a technician and time range.
    pub async fn assign_job(
        &self,
        job_id: &str,
        technician_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        let guard = self.job_guard(job_id).await;
        let _in_flight = guard.lock().await;
        self.simulate_roundtrip().await;

        if !self.technicians.read().await.contains_key(technician_id) {
            return Err(DispatchError::TechnicianNotFound(
                technician_id.to_string(),
            ));
        }
        self.jobs
            .write()
            .await
            .assign(job_id, technician_id, start, end)?;
        tracing::info!(job_id, technician_id, %start, %end, "Job assigned");
        Ok(())
    }

    /// Protect an assignment from further drag/resize. Returns `false` when
    /// the job was already locked.
    pub async fn lock_job(&self, job_id: &str) -> Result<bool> {
        let guard = self.job_guard(job_id).await;
        let _in_flight = guard.lock().await;
        self.simulate_roundtrip().await;

        let locked = self.jobs.write().await.lock(job_id)?;
        if locked {
            tracing::info!(job_id, "Job locked");
        }
        Ok(locked)
    }

    /// Recompute a job's scheduled end. Locked jobs report `IgnoredLocked`
    /// instead of failing.
    pub async fn resize_job(&self, job_id: &str, new_end: DateTime<Utc>) -> Result<ResizeOutcome> {
        let guard = self.job_guard(job_id).await;
        let _in_flight = guard.lock().await;
        self.simulate_roundtrip().await;

        let outcome = self.jobs.write().await.resize(job_id, new_end)?;
        match outcome {
            ResizeOutcome::Resized => {
                tracing::info!(job_id, %new_end, "Job resized");
            }
            ResizeOutcome::IgnoredLocked => {
                tracing::warn!(job_id, "Resize ignored, job is locked");
            }
        }
        Ok(outcome)
    }

    /// Return a job to the unassigned pool. Permitted from any state.
    pub async fn unassign_job(&self, job_id: &str) -> Result<()> {
        let guard = self.job_guard(job_id).await;
        let _in_flight = guard.lock().await;
        self.simulate_roundtrip().await;

        self.jobs.write().await.unassign(job_id)?;
        tracing::info!(job_id, "Job unassigned");
        Ok(())
    }

    pub async fn job(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().await.get_job(job_id).cloned()
    }

    pub async fn unassigned_jobs(&self) -> Vec<Job> {
        self.jobs
            .read()
            .await
            .unassigned_jobs()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn all_jobs(&self) -> Vec<Job> {
        self.jobs
            .read()
            .await
            .all_jobs()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn service_orders(&self) -> &[ServiceOrder] {
        &self.orders
    }

    pub async fn technicians(&self) -> Vec<Technician> {
        let mut techs: Vec<Technician> = self.technicians.read().await.values().cloned().collect();
        techs.sort_by(|a, b| a.id.cmp(&b.id));
        techs
    }

    pub async fn technician(&self, technician_id: &str) -> Option<Technician> {
        self.technicians.read().await.get(technician_id).cloned()
    }

    pub async fn technician_meta(&self, technician_id: &str) -> Result<TechnicianMeta> {
        self.technicians
            .read()
            .await
            .get(technician_id)
            .map(|t| t.meta.clone())
            .ok_or_else(|| DispatchError::TechnicianNotFound(technician_id.to_string()))
    }

    pub async fn set_technician_meta(
        &self,
        technician_id: &str,
        meta: TechnicianMeta,
    ) -> Result<()> {
        let mut techs = self.technicians.write().await;
        let tech = techs
            .get_mut(technician_id)
            .ok_or_else(|| DispatchError::TechnicianNotFound(technician_id.to_string()))?;
        tech.meta = meta;
        tracing::info!(technician_id, "Technician metadata updated");
        Ok(())
    }

    pub(crate) fn job_table(&self) -> &Arc<RwLock<JobStore>> {
        &self.jobs
    }
}
