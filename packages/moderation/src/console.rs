//! The moderation console: criteria, aggregated list and workflow in one place.
//!
//! Every aggregation pass takes a generation number when it starts. A pass
//! only commits if no newer pass has started since; otherwise its results
//! are dropped, so a slow old pass can never overwrite a fresh list.
//!
//! State sits behind a `std::sync::Mutex` that is never held across an
//! await. Network calls run with the lock released.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::ModerationConfig;
use crate::error::{ModerationError, Result};
use crate::pipeline::{aggregate, apply_query};
use crate::traits::{bounded, DetailSource, RequestSource, StatusUpdater};
use crate::types::{
    DateRange, QueryCriteria, RequestStatus, SortDirection, SortKey, StatusCounts, StatusFilter,
    ViewRecord,
};
use crate::workflow::{
    ActionPrompt, SubmitDecision, WorkflowController, WorkflowSession, WorkflowState,
};

/// How one aggregation pass ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// Results replaced the aggregated list.
    Committed { generation: u64, count: usize },
    /// The list call failed; the list was cleared and the error recorded.
    Failed {
        generation: u64,
        error: ModerationError,
    },
    /// A newer pass started first; results were dropped.
    Superseded { generation: u64 },
}

impl PassOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            PassOutcome::Committed { generation, .. }
            | PassOutcome::Failed { generation, .. }
            | PassOutcome::Superseded { generation } => *generation,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, PassOutcome::Committed { .. })
    }
}

/// How a submit attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent and the session is still open.
    Invalid { reason: String },
    /// The update was accepted and the list was refetched.
    Applied { refresh: PassOutcome },
    /// The update was refused or never confirmed; no refetch happened.
    Failed { error: ModerationError },
}

struct ConsoleState {
    criteria: QueryCriteria,
    records: Vec<ViewRecord>,
    displayed: Vec<ViewRecord>,
    loading: bool,
    error: Option<ModerationError>,
    workflow: WorkflowController,
    generation: u64,
}

impl ConsoleState {
    fn recompute(&mut self) {
        self.displayed = apply_query(&self.records, &self.criteria);
    }
}

pub struct ModerationConsole {
    requests: Arc<dyn RequestSource>,
    details: Arc<dyn DetailSource>,
    updater: Arc<dyn StatusUpdater>,
    config: ModerationConfig,
    state: Mutex<ConsoleState>,
}

impl ModerationConsole {
    /// Console over one backend that serves all three roles.
    pub fn new<S>(api: Arc<S>, config: ModerationConfig) -> Self
    where
        S: RequestSource + DetailSource + StatusUpdater + 'static,
    {
        Self::from_parts(api.clone(), api.clone(), api, config)
    }

    pub fn from_parts(
        requests: Arc<dyn RequestSource>,
        details: Arc<dyn DetailSource>,
        updater: Arc<dyn StatusUpdater>,
        config: ModerationConfig,
    ) -> Self {
        let workflow = WorkflowController::new(config.comment_policy);
        Self {
            requests,
            details,
            updater,
            config,
            state: Mutex::new(ConsoleState {
                criteria: QueryCriteria::default(),
                records: Vec::new(),
                displayed: Vec::new(),
                loading: false,
                error: None,
                workflow,
                generation: 0,
            }),
        }
    }

    /// Start from non-default criteria. Nothing is fetched until a pass runs.
    pub fn with_criteria(self, criteria: QueryCriteria) -> Self {
        {
            let mut state = self.lock();
            state.criteria = criteria;
            state.recompute();
        }
        self
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The list as the reviewer sees it: searched and sorted.
    pub fn displayed(&self) -> Vec<ViewRecord> {
        self.lock().displayed.clone()
    }

    /// The full aggregated list of the last committed pass.
    pub fn records(&self) -> Vec<ViewRecord> {
        self.lock().records.clone()
    }

    pub fn record(&self, request_id: &str) -> Option<ViewRecord> {
        self.lock()
            .records
            .iter()
            .find(|r| r.request_id == request_id)
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<ModerationError> {
        self.lock().error.clone()
    }

    pub fn criteria(&self) -> QueryCriteria {
        self.lock().criteria.clone()
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::from_records(&self.lock().records)
    }

    pub fn workflow_state(&self) -> WorkflowState {
        self.lock().workflow.state().clone()
    }

    pub fn session(&self) -> Option<WorkflowSession> {
        self.lock().workflow.session().cloned()
    }

    pub fn prompt(&self, target: RequestStatus) -> ActionPrompt {
        self.lock().workflow.prompt(target)
    }

    // =========================================================================
    // Aggregation passes
    // =========================================================================

    /// Re-run the current criteria.
    pub async fn refresh(&self) -> PassOutcome {
        self.run_pass().await
    }

    async fn run_pass(&self) -> PassOutcome {
        let (generation, query) = {
            let mut state = self.lock();
            state.generation += 1;
            state.loading = true;
            state.error = None;
            (state.generation, state.criteria.server_query())
        };

        info!(generation, ?query, "Starting aggregation pass");

        let listed = bounded(self.config.list_timeout, self.requests.list_requests(&query)).await;

        let requests = match listed {
            Ok(requests) => requests,
            Err(source) => {
                let mut state = self.lock();
                if state.generation != generation {
                    warn!(generation, error = %source, "Discarding failed pass, a newer one is running");
                    return PassOutcome::Superseded { generation };
                }

                let error = ModerationError::ListFetch(source);
                warn!(generation, error = %error, "Aggregation pass failed");
                state.records.clear();
                state.displayed.clear();
                state.loading = false;
                state.error = Some(error.clone());
                return PassOutcome::Failed { generation, error };
            }
        };

        debug!(generation, count = requests.len(), "Listed requests, fetching details");

        let records = aggregate(self.details.as_ref(), requests, self.config.detail_timeout).await;

        let mut state = self.lock();
        if state.generation != generation {
            warn!(
                generation,
                latest = state.generation,
                "Discarding stale aggregation pass"
            );
            return PassOutcome::Superseded { generation };
        }

        let count = records.len();
        state.records = records;
        state.recompute();
        state.loading = false;

        info!(generation, count, displayed = state.displayed.len(), "Aggregation pass committed");
        PassOutcome::Committed { generation, count }
    }

    // =========================================================================
    // Criteria
    // =========================================================================

    /// Change the criteria. Runs a new pass when the server-side part changed;
    /// otherwise only the displayed list is recomputed and `None` is returned.
    pub async fn update_criteria<F>(&self, change: F) -> Option<PassOutcome>
    where
        F: FnOnce(&mut QueryCriteria) + Send,
    {
        let refetch = {
            let mut state = self.lock();
            let before = state.criteria.server_query();
            change(&mut state.criteria);
            let refetch = state.criteria.server_query() != before;
            if !refetch {
                state.recompute();
            }
            refetch
        };

        if refetch {
            Some(self.run_pass().await)
        } else {
            None
        }
    }

    pub async fn set_status_filter(&self, filter: StatusFilter) -> Option<PassOutcome> {
        self.update_criteria(|criteria| criteria.status_filter = filter)
            .await
    }

    /// Search is evaluated locally and never triggers a fetch.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let mut state = self.lock();
        state.criteria.search_term = term.into();
        state.recompute();
    }

    pub async fn set_created_range(&self, range: DateRange) -> Option<PassOutcome> {
        self.update_criteria(|criteria| criteria.created_range = range)
            .await
    }

    pub async fn clear_created_range(&self) -> Option<PassOutcome> {
        self.set_created_range(DateRange::default()).await
    }

    pub async fn set_sort(&self, key: SortKey, direction: SortDirection) -> Option<PassOutcome> {
        self.update_criteria(|criteria| {
            criteria.sort_key = key;
            criteria.sort_direction = direction;
        })
        .await
    }

    pub async fn toggle_sort(&self, key: SortKey) -> Option<PassOutcome> {
        self.update_criteria(|criteria| criteria.toggle_sort(key))
            .await
    }

    // =========================================================================
    // Workflow
    // =========================================================================

    pub fn begin_moderation(
        &self,
        request_id: impl Into<String>,
        target: RequestStatus,
    ) -> Result<WorkflowSession> {
        let mut state = self.lock();
        let session = state.workflow.begin(request_id, target)?.clone();
        debug!(request_id = %session.request_id, status = %target, "Opened moderation session");
        Ok(session)
    }

    pub fn set_comment(&self, comment: impl Into<String>) -> Result<()> {
        self.lock().workflow.set_comment(comment)?;
        Ok(())
    }

    pub fn cancel_moderation(&self) -> Result<()> {
        let session = self.lock().workflow.cancel()?;
        debug!(request_id = %session.request_id, "Cancelled moderation session");
        Ok(())
    }

    /// Validate and send the open session. A successful update is followed
    /// by a full refetch; a failed one leaves the list as it was.
    pub async fn submit_moderation(&self) -> Result<SubmitOutcome> {
        let decision = self.lock().workflow.submit()?;

        let submission = match decision {
            SubmitDecision::Invalid(reason) => {
                debug!(reason = %reason, "Moderation submit rejected locally");
                return Ok(SubmitOutcome::Invalid { reason });
            }
            SubmitDecision::Send(submission) => submission,
        };

        info!(
            request_id = %submission.request_id,
            status = %submission.update.status,
            "Submitting status update"
        );

        let sent = bounded(
            self.config.update_timeout,
            self.updater
                .update_status(&submission.request_id, &submission.update),
        )
        .await;

        let failure = {
            let mut state = self.lock();
            if let Err(e) = state.workflow.complete() {
                warn!(error = %e, "Workflow was not submitting when the update settled");
            }

            match sent {
                Ok(()) => None,
                Err(source) => {
                    let error = ModerationError::StatusUpdate {
                        request_id: submission.request_id.clone(),
                        source,
                    };
                    warn!(error = %error, "Status update failed");
                    state.error = Some(error.clone());
                    Some(error)
                }
            }
        };

        if let Some(error) = failure {
            return Ok(SubmitOutcome::Failed { error });
        }

        info!(request_id = %submission.request_id, "Status update applied, refetching");
        let refresh = self.run_pass().await;
        Ok(SubmitOutcome::Applied { refresh })
    }
}
