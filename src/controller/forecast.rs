//! Interaction loop pairing the sensor, the screen and the engine.

use std::time::Duration;

use super::{Button, ButtonEvent, Controller, ControllerEvent, EventSource, Screen, ScreenView};
use crate::engine::{Engine, EngineError};
use crate::sensor::Sensor;
use crate::weather::{Label, PredictionRanking};

const EVENT_PAUSE: Duration = Duration::from_millis(100);

/// Shows the engine's best guess and feeds confirmations back as
/// corrections.
///
/// Each loop iteration samples the sensor and requests a prediction; a
/// `None` reply keeps the previously shown ranking, since the engine only
/// publishes on its own schedule. `Down` cycles through the ranked guesses,
/// `Up` confirms the shown one and turns it into a training correction.
pub struct ForecastController<S, E, D> {
    engine: Engine,
    sensor: S,
    events: E,
    screen: D,
    ranking: Option<PredictionRanking>,
    position: usize,
    current: Option<Label>,
    running: bool,
}

impl<S: Sensor, E: EventSource, D: Screen> ForecastController<S, E, D> {
    /// Wire a controller to an already spawned engine.
    pub fn new(engine: Engine, sensor: S, events: E, screen: D) -> Self {
        Self {
            engine,
            sensor,
            events,
            screen,
            ranking: None,
            position: 0,
            current: None,
            running: false,
        }
    }

    /// The label currently shown to the user, if any.
    pub fn current(&self) -> Option<Label> {
        self.current
    }

    /// Stop the engine and wait for the worker to exit.
    pub fn shutdown(mut self) -> Result<(), EngineError> {
        self.engine.request_stop();
        self.engine.wait_for_exit()
    }

    fn refresh_prediction(&mut self) {
        let vector = match self.sensor.sample() {
            Ok(vector) => vector,
            Err(err) => {
                tracing::warn!("Skipping cycle, sensor read failed: {err}");
                return;
            }
        };
        match self.engine.request_prediction(vector) {
            Ok(Some(ranking)) => {
                self.ranking = Some(ranking);
                self.position = 0;
                self.current = Some(ranking.first());
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("Stopping interaction loop: {err}");
                self.running = false;
            }
        }
        self.show_current();
    }

    fn show_current(&mut self) {
        match self.current {
            Some(label) => self.screen.show(ScreenView::Forecast(label)),
            None => self.screen.show(ScreenView::Blank),
        }
    }
}

impl<S: Sensor, E: EventSource, D: Screen> Controller for ForecastController<S, E, D> {
    fn on_button_pressed(&mut self, event: &ButtonEvent) {
        let Some(ranking) = self.ranking else {
            // Nothing shown yet, nothing to confirm or cycle.
            return;
        };
        match event.button {
            Button::Down => {
                self.position = (self.position + 1) % ranking.labels().len();
                self.current = ranking.get(self.position);
                self.screen.show(ScreenView::Wrong);
            }
            Button::Up => {
                if let Some(label) = self.current {
                    tracing::debug!(%label, "Forecast confirmed");
                    self.engine.correction(label);
                }
                self.screen.show(ScreenView::Correct);
            }
        }
    }

    fn on_button_released(&mut self, _event: &ButtonEvent) {
        self.show_current();
    }

    fn reset(&mut self) {
        self.engine.request_stop();
        self.screen.show(ScreenView::Blank);
    }

    fn run(&mut self) {
        self.running = true;
        while self.running {
            self.refresh_prediction();
            match self.events.poll() {
                Some(ControllerEvent::Button(event)) => {
                    if event.pressed {
                        self.on_button_pressed(&event);
                    } else {
                        self.on_button_released(&event);
                    }
                }
                Some(ControllerEvent::Quit) => self.running = false,
                None => {}
            }
            if self.running {
                std::thread::sleep(EVENT_PAUSE);
            }
        }
    }
}
