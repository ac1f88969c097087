use std::time::Duration;

use crossterm::event::{KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    /// Time to pull a fresh snapshot of everyone's ballots
    Refresh,
}

/// Merges terminal key presses with the UI tick and the ballot refresh timer.
/// Background tasks stop when the handler is dropped.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tasks: Vec<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, refresh_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tasks = vec![
            spawn_key_reader(tx.clone()),
            spawn_timers(tx, tick_rate, refresh_interval),
        ];
        EventHandler { rx, tasks }
    }

    pub async fn next(&mut self) -> Event {
        self.rx.recv().await.unwrap_or(Event::Tick)
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn spawn_key_reader(tx: UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = crossterm::event::EventStream::new();
        while let Some(event) = reader.next().await {
            match event {
                // Press only; Windows also reports releases
                Ok(crossterm::event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(Event::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    })
}

/// The first refresh fires one full interval after start; the initial load
/// is fetched by the caller. Refreshes missed while the process was
/// suspended collapse into one.
fn spawn_timers(
    tx: UnboundedSender<Event>,
    tick_rate: Duration,
    refresh_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = Instant::now();
        let mut tick = interval_at(start + tick_rate, tick_rate);
        let mut refresh = interval_at(start + refresh_interval, refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let event = tokio::select! {
                _ = tick.tick() => Event::Tick,
                _ = refresh.tick() => Event::Refresh,
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    })
}
