use crate::presenter::SwapPresenter;
use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Drives the quote countdown, one presenter tick per period
pub struct QuoteRefreshService {
    presenter: Arc<dyn SwapPresenter>,
    period: Duration,
    stop_tx: Option<mpsc::Sender<()>>,
}

impl QuoteRefreshService {
    pub fn new(presenter: Arc<dyn SwapPresenter>, period: Duration) -> Self {
        Self {
            presenter,
            period,
            stop_tx: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    // Start the background ticker
    pub async fn start(&mut self) -> Result<()> {
        if self.stop_tx.is_some() {
            warn!("Quote refresh service is already running");
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let presenter = self.presenter.clone();
        let period = self.period;

        tokio::spawn(async move {
            // First tick one full period after start
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                select! {
                    _ = interval.tick() => {
                        // A tick may wait on a quote request; the countdown keeps going meanwhile
                        let presenter = presenter.clone();
                        tokio::spawn(async move {
                            presenter.tick().await;
                        });
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping quote refresh service");
                        break;
                    }
                }
            }
            debug!("Quote refresh loop finished");
        });

        info!("Quote refresh service started ({:?} per tick)", self.period);
        Ok(())
    }

    // Stop the background ticker
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
            info!("Quote refresh service stop signal sent");
        }
    }
}
