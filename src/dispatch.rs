// File: src/dispatch.rs
//! Runs transliteration calls off the UI thread.
//!
//! The UI loop submits the requests a session hands out and later drains
//! completions, feeding each back through `WordSuggestionSession::complete`.
//! The worker never sees the session. There is no retry: a failed call is
//! reported once and that is final for the request.
//!
//! Dropping the dispatcher does not wait for a call in flight. The worker is
//! given a short grace period and is otherwise left to finish on its own;
//! its result has nowhere to go by then.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::backend::Transliterator;
use crate::core::types::{RequestToken, TransliterationRequest};
use crate::error::{Error, Result};

/// A finished call, ready for the session.
#[derive(Debug)]
pub struct CompletedRequest {
    pub token: RequestToken,
    pub word: String,
    pub result: Result<Vec<String>>,
}

const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

pub struct Dispatcher {
    jobs: Option<Sender<TransliterationRequest>>,
    completions: Receiver<CompletedRequest>,
    worker: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    /// Disconnects when the worker loop returns.
    stopped: Receiver<()>,
}

impl Dispatcher {
    pub fn spawn(backend: Box<dyn Transliterator>) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<TransliterationRequest>();
        let (done_tx, done_rx) = mpsc::channel::<CompletedRequest>();
        let (stopped_tx, stopped_rx) = mpsc::channel::<()>();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let worker = thread::Builder::new()
            .name("akshar-dispatch".into())
            .spawn(move || {
                worker_loop(backend, job_rx, done_tx, &worker_stop);
                drop(stopped_tx);
            })?;
        Ok(Self {
            jobs: Some(job_tx),
            completions: done_rx,
            worker: Some(worker),
            stop,
            stopped: stopped_rx,
        })
    }

    pub fn submit(&self, request: TransliterationRequest) -> Result<()> {
        tracing::debug!(token = %request.token, word = %request.word, "dispatch");
        self.jobs
            .as_ref()
            .ok_or(Error::DispatcherClosed)?
            .send(request)
            .map_err(|_| Error::DispatcherClosed)
    }

    /// A completion if one is ready, without blocking.
    pub fn try_recv(&self) -> Option<CompletedRequest> {
        match self.completions.try_recv() {
            Ok(done) => Some(done),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for a completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<CompletedRequest> {
        match self.completions.recv_timeout(timeout) {
            Ok(done) => Some(done),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // queued jobs are skipped; closing the channel wakes an idle worker
        self.stop.store(true, Ordering::Relaxed);
        self.jobs.take();
        if let Err(RecvTimeoutError::Timeout) = self.stopped.recv_timeout(SHUTDOWN_GRACE) {
            tracing::debug!("dispatch worker still busy, detaching");
            return;
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("dispatch worker panicked");
            }
        }
    }
}

fn worker_loop(
    backend: Box<dyn Transliterator>,
    jobs: Receiver<TransliterationRequest>,
    completions: Sender<CompletedRequest>,
    stop: &AtomicBool,
) {
    for request in jobs {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let result = backend.transliterate(&request.word);
        match &result {
            Ok(suggestions) => tracing::debug!(
                token = %request.token,
                word = %request.word,
                count = suggestions.len(),
                "transliterated"
            ),
            Err(err) => tracing::warn!(
                token = %request.token,
                word = %request.word,
                error = %err,
                "transliteration call failed"
            ),
        }
        let done = CompletedRequest {
            token: request.token,
            word: request.word,
            result,
        };
        if completions.send(done).is_err() {
            break;
        }
    }
    tracing::debug!("dispatch worker stopped");
}
