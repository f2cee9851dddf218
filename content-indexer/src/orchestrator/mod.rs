//! Orchestrator module for the content indexer.
//!
//! Connects to the search engine in the background and starts consuming once
//! a client is available.
//!
//! Two tasks are spawned by [`Orchestrator::start`]:
//!
//! 1. The connection task retries `ClientConnector::connect` until it
//!    succeeds, then hands the client over through a oneshot channel.
//! 2. The consume task waits for that client, installs it in the
//!    `IndexingService` and runs the consumer until it is stopped.

use std::sync::Arc;
use std::time::Duration;

use content_indexer_repository::{ClientConnector, IndexingService, SearchClient};
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::consumer::{MessageConsumer, MessageProcessor};
use crate::errors::IngestError;

/// Default delay between connection attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(60);

enum State {
    Idle,
    Running {
        connection: JoinHandle<()>,
        consume: JoinHandle<()>,
    },
    Stopped,
}

/// Coordinates the search engine connection and the consumer lifecycle.
pub struct Orchestrator {
    connector: Arc<dyn ClientConnector>,
    consumer: Arc<dyn MessageConsumer>,
    processor: Arc<dyn MessageProcessor>,
    indexing_service: Arc<IndexingService>,
    retry_interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    state: Mutex<State>,
}

impl Orchestrator {
    pub fn new(
        connector: Arc<dyn ClientConnector>,
        consumer: Arc<dyn MessageConsumer>,
        processor: Arc<dyn MessageProcessor>,
        indexing_service: Arc<IndexingService>,
    ) -> Self {
        Self::with_retry_interval(
            connector,
            consumer,
            processor,
            indexing_service,
            DEFAULT_RETRY_INTERVAL,
        )
    }

    pub fn with_retry_interval(
        connector: Arc<dyn ClientConnector>,
        consumer: Arc<dyn MessageConsumer>,
        processor: Arc<dyn MessageProcessor>,
        indexing_service: Arc<IndexingService>,
        retry_interval: Duration,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            connector,
            consumer,
            processor,
            indexing_service,
            retry_interval,
            shutdown_tx,
            state: Mutex::new(State::Idle),
        }
    }

    pub fn indexing_service(&self) -> &Arc<IndexingService> {
        &self.indexing_service
    }

    /// Spawn the connection and consume tasks. Returns immediately.
    ///
    /// An orchestrator runs once; a second call is rejected, also after `stop`.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), IngestError> {
        let mut state = self.state.lock().await;
        if !matches!(*state, State::Idle) {
            return Err(IngestError::AlreadyStarted);
        }

        info!(
            retry_interval_secs = self.retry_interval.as_secs(),
            "Starting content indexer orchestrator"
        );

        let (client_tx, client_rx) = oneshot::channel::<Arc<dyn SearchClient>>();

        let connection = tokio::spawn(Self::connect_loop(
            self.connector.clone(),
            client_tx,
            self.retry_interval,
            self.shutdown_tx.subscribe(),
        ));

        let consume = tokio::spawn(Self::consume(
            client_rx,
            self.indexing_service.clone(),
            self.consumer.clone(),
            self.processor.clone(),
            self.shutdown_tx.subscribe(),
        ));

        *state = State::Running {
            connection,
            consume,
        };
        Ok(())
    }

    /// Stop consuming and wait for the consume task to exit.
    ///
    /// Idempotent and safe to call before `start`.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        self.shutdown_tx.send_replace(true);
        self.consumer.stop();

        let previous = {
            let mut state = self.state.lock().await;
            std::mem::replace(&mut *state, State::Stopped)
        };

        match previous {
            State::Running {
                connection,
                consume,
            } => {
                connection.abort();
                if let Err(e) = consume.await {
                    if !e.is_cancelled() {
                        error!(error = %e, "Consume task failed");
                    }
                }
                info!("Orchestrator stopped");
            }
            State::Idle => info!("Orchestrator stopped before start"),
            State::Stopped => {}
        }
    }

    /// Retry until a client is available, then hand it over once.
    async fn connect_loop(
        connector: Arc<dyn ClientConnector>,
        client_tx: oneshot::Sender<Arc<dyn SearchClient>>,
        retry_interval: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        loop {
            if *shutdown_rx.borrow_and_update() {
                return;
            }

            match connector.connect().await {
                Ok(client) => {
                    info!("Connected to the search engine");
                    if client_tx.send(client).is_err() {
                        warn!("Consume task is gone, dropping search client");
                    }
                    return;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        retry_interval_secs = retry_interval.as_secs(),
                        "Could not connect to the search engine"
                    );
                    tokio::select! {
                        _ = sleep(retry_interval) => {}
                        _ = shutdown_rx.changed() => return,
                    }
                }
            }
        }
    }

    async fn consume(
        client_rx: oneshot::Receiver<Arc<dyn SearchClient>>,
        indexing_service: Arc<IndexingService>,
        consumer: Arc<dyn MessageConsumer>,
        processor: Arc<dyn MessageProcessor>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let client = tokio::select! {
            result = client_rx => match result {
                Ok(client) => client,
                Err(_) => return,
            },
            _ = shutdown_rx.changed() => return,
        };

        indexing_service.set_client(client).await;

        if *shutdown_rx.borrow() {
            return;
        }

        info!("Starting message consumer");
        if let Err(e) = consumer.start(processor).await {
            error!(error = %e, "Message consumer failed");
        }
    }
}
