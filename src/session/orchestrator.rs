use std::sync::mpsc;

use crate::{
    album::{
        compositor::{Album, AlbumCompositor},
        key::SlotId,
    },
    assets::encoded::EncodedImage,
    foundation::error::{AlbumError, AlbumResult},
    service::{RestyleRequest, StyleService, catalog::StyleCatalog, catalog::StyleSpec},
    session::state::{SessionEvent, SessionState},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Worker threads for restyle calls; `None` lets rayon pick.
    pub threads: Option<usize>,
}

/// Fans restyle requests out over a dedicated pool and folds the results into a
/// [`SessionState`].
///
/// Every slot is an independent task. A failing slot never cancels its siblings, and all
/// state transitions happen on the calling thread in arrival order.
pub struct Orchestrator<S> {
    service: S,
    catalog: StyleCatalog,
    pool: rayon::ThreadPool,
}

struct Job<'a> {
    slot: SlotId,
    attempt: u64,
    style: &'a StyleSpec,
}

impl<S: StyleService> Orchestrator<S> {
    pub fn new(service: S, catalog: StyleCatalog, config: OrchestratorConfig) -> AlbumResult<Self> {
        catalog.validate()?;
        let pool = build_thread_pool(config.threads)?;
        Ok(Self {
            service,
            catalog,
            pool,
        })
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Request every slot of the catalog and wait until all of them settled.
    ///
    /// `observer` sees the freshly started state and then every intermediate state.
    #[tracing::instrument(
        skip_all,
        fields(service = self.service.name(), slots = self.catalog.slot_count())
    )]
    pub fn generate_all<F>(
        &self,
        state: &SessionState,
        portrait: &EncodedImage,
        mut observer: F,
    ) -> SessionState
    where
        F: FnMut(&SessionState),
    {
        let started = state.apply(SessionEvent::GenerationStarted {
            styles: self.catalog.names(),
            variations: self.catalog.variations,
        });
        observer(&started);

        let jobs = self.jobs_for(&started, self.catalog.slot_ids());
        self.run_jobs(started, portrait, jobs, &mut observer)
    }

    /// Re-request a single slot; every other slot is left as it is.
    #[tracing::instrument(skip_all, fields(slot = %slot))]
    pub fn regenerate<F>(
        &self,
        state: &SessionState,
        slot: &SlotId,
        portrait: &EncodedImage,
        mut observer: F,
    ) -> AlbumResult<SessionState>
    where
        F: FnMut(&SessionState),
    {
        if state.slot(slot).is_none() || self.catalog.get(&slot.style).is_none() {
            return Err(AlbumError::validation(format!("unknown slot '{slot}'")));
        }
        let reset = state.apply(SessionEvent::ResetRequested { slot: slot.clone() });
        observer(&reset);

        let jobs = self.jobs_for(&reset, [slot.clone()]);
        Ok(self.run_jobs(reset, portrait, jobs, &mut observer))
    }

    /// Re-request every slot currently in error, in parallel.
    pub fn regenerate_failed<F>(
        &self,
        state: &SessionState,
        portrait: &EncodedImage,
        mut observer: F,
    ) -> SessionState
    where
        F: FnMut(&SessionState),
    {
        let failed: Vec<SlotId> = state
            .slots()
            .filter(|s| s.status.is_error() && self.catalog.get(&s.id.style).is_some())
            .map(|s| s.id.clone())
            .collect();
        if failed.is_empty() {
            return state.clone();
        }
        tracing::info!(count = failed.len(), "regenerating failed slots");

        let mut reset = state.clone();
        for slot in &failed {
            reset = reset.apply(SessionEvent::ResetRequested { slot: slot.clone() });
        }
        observer(&reset);

        let jobs = self.jobs_for(&reset, failed);
        self.run_jobs(reset, portrait, jobs, &mut observer)
    }

    /// Compose the album, refusing while any slot is pending or failed.
    pub fn compose_album(
        &self,
        state: &SessionState,
        compositor: &AlbumCompositor,
    ) -> AlbumResult<Album> {
        let input = state.album_input()?;
        compositor.compose(&input)
    }

    fn jobs_for(
        &self,
        state: &SessionState,
        slots: impl IntoIterator<Item = SlotId>,
    ) -> Vec<Job<'_>> {
        slots
            .into_iter()
            .filter_map(|slot| {
                let attempt = state.slot(&slot)?.attempt;
                let style = self.catalog.get(&slot.style)?;
                Some(Job {
                    slot,
                    attempt,
                    style,
                })
            })
            .collect()
    }

    fn run_jobs<F>(
        &self,
        mut state: SessionState,
        portrait: &EncodedImage,
        jobs: Vec<Job<'_>>,
        observer: &mut F,
    ) -> SessionState
    where
        F: FnMut(&SessionState),
    {
        if jobs.is_empty() {
            return state;
        }
        let (tx, rx) = mpsc::channel::<SessionEvent>();
        let service = &self.service;

        self.pool.in_place_scope(|scope| {
            for job in jobs {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let request = RestyleRequest {
                        portrait,
                        style: job.style,
                        variation: job.slot.variation,
                    };
                    let outcome = service.restyle(&request).map_err(|e| e.to_string());
                    // The receiver outlives the scope.
                    let _ = tx.send(SessionEvent::SlotSettled {
                        slot: job.slot,
                        attempt: job.attempt,
                        outcome,
                    });
                });
            }
            drop(tx);

            for event in rx {
                if let SessionEvent::SlotSettled { slot, outcome, .. } = &event {
                    match outcome {
                        Ok(img) => tracing::info!(slot = %slot, bytes = img.len(), "slot done"),
                        Err(msg) => tracing::warn!(slot = %slot, error = %msg, "slot failed"),
                    }
                }
                state = state.apply(event);
                observer(&state);
            }
        });

        let progress = state.progress();
        tracing::info!(
            done = progress.done,
            failed = progress.failed,
            pending = progress.pending,
            "generation settled"
        );
        state
    }
}

fn build_thread_pool(threads: Option<usize>) -> AlbumResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(AlbumError::validation(
            "orchestrator 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("restyle-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| AlbumError::service(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/orchestrator.rs"]
mod tests;
