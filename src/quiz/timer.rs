use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, interval_at},
};
use tracing::{debug, error, warn};

use crate::quiz::{
    attempt::{AttemptEvent, Dispatcher},
    session::{SubmitTrigger, Tick},
};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Countdown for one session generation. Ticks once per second, submits when
/// the clock reaches zero and then stops. Aborted on drop.
pub struct CountdownTimer {
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    pub fn start(dispatcher: Dispatcher, generation: u64) -> Self {
        let handle = tokio::spawn(run(dispatcher, generation));
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(dispatcher: Dispatcher, generation: u64) {
    match dispatcher.with_session(|s| s.take_expiry(generation)) {
        Ok(true) => return expire(&dispatcher).await,
        Ok(false) => {}
        Err(e) => {
            error!("Countdown could not read the session: {}", e);
            return;
        }
    }

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    loop {
        interval.tick().await;

        match dispatcher.with_session(|s| s.tick(generation)) {
            Ok(Tick::Running(remaining)) => dispatcher.emit(AttemptEvent::Tick(remaining)),
            Ok(Tick::Expired) => {
                dispatcher.emit(AttemptEvent::Tick(0));
                return expire(&dispatcher).await;
            }
            Ok(Tick::Stopped) => {
                debug!("Countdown for generation {} stopped", generation);
                return;
            }
            Err(e) => {
                error!("Countdown could not read the session: {}", e);
                return;
            }
        }
    }
}

async fn expire(dispatcher: &Dispatcher) {
    dispatcher.emit(AttemptEvent::Expired);
    if let Err(e) = dispatcher.dispatch(SubmitTrigger::Timeout).await {
        warn!("Automatic submit did not complete: {}", e);
    }
}
