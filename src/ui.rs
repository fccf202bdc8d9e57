use std::sync::Arc;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::event_bus::{Event, EventBus};

/// Spinner shown while questions are being generated.
pub struct UIHandler {
    headless: bool,
    spinner: Option<ProgressBar>,
    listener: Option<JoinHandle<()>>,
}

impl UIHandler {
    pub fn new(headless: bool) -> Self {
        Self {
            headless,
            spinner: None,
            listener: None,
        }
    }

    pub fn start(&mut self, bus: &Arc<EventBus>) {
        if self.headless {
            return;
        }
        info!("Starting UI");

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Generating interview questions... Please wait.");

        let receiver = bus.subscribe();
        let bar = spinner.clone();
        self.listener = Some(tokio::spawn(follow_events(receiver, move |message| {
            bar.set_message(message)
        })));
        self.spinner = Some(spinner);
    }

    /// Stop the spinner, leaving a one-line status behind.
    pub fn finish(&mut self, success: bool) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
        if let Some(spinner) = self.spinner.take() {
            if success {
                spinner.finish_with_message(format!("{}", "Interview questions generated!".bright_green()));
            } else {
                spinner.finish_and_clear();
            }
        }
    }
}

/// Feed status lines from bus events to `on_status` until the bus closes.
/// Events missed while lagging are skipped.
async fn follow_events(mut receiver: broadcast::Receiver<Event>, mut on_status: impl FnMut(String)) {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                if let Some(message) = status_message(&event) {
                    on_status(message);
                }
            }
            Err(RecvError::Lagged(skipped)) => debug!("Spinner skipped {} events", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}

fn status_message(event: &Event) -> Option<String> {
    match event {
        Event::APICallStarted { provider, model } => {
            Some(format!("Waiting for {} ({})...", provider, model))
        }
        Event::APICallCompleted { tokens, .. } => {
            Some(format!("Response received (~{} tokens), parsing...", tokens))
        }
        Event::ArtifactCreated { path, .. } => Some(format!("Saved {}", path)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        let started = Event::APICallStarted {
            provider: "Gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
        };
        assert_eq!(
            status_message(&started).unwrap(),
            "Waiting for Gemini (gemini-2.5-flash)..."
        );
        assert!(status_message(&Event::ConfigLoaded { path: None }).is_none());
    }

    #[tokio::test]
    async fn test_listener_survives_lag() {
        let bus = EventBus::new(2);
        let receiver = bus.subscribe();
        for i in 0..5 {
            bus.emit(Event::APICallCompleted {
                provider: "Gemini".to_string(),
                tokens: i,
            })
            .await
            .unwrap();
        }
        drop(bus);

        let mut seen = Vec::new();
        follow_events(receiver, |message| seen.push(message)).await;
        assert_eq!(
            seen,
            vec![
                "Response received (~3 tokens), parsing...".to_string(),
                "Response received (~4 tokens), parsing...".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_headless_start_is_silent() {
        let bus = Arc::new(EventBus::new(4));
        let mut ui = UIHandler::new(true);
        ui.start(&bus);
        assert!(ui.spinner.is_none());
        ui.finish(true);
    }
}
