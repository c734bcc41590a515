//! Interaction layer contract between a physical frontend and the engine.
//!
//! The joystick, the LED matrix and the keyboard are all thin I/O details;
//! what the engine cares about is the capability set below. Concrete
//! variants implement [`Controller`] rather than inheriting from a partial
//! base.

mod console;
mod forecast;

pub use console::{ConsoleScreen, StdinEvents};
pub use forecast::ForecastController;

use crate::weather::Label;

/// Physical buttons the interaction loop reacts to.
///
/// `Up` confirms the currently shown forecast; `Down` rejects it and cycles
/// to the next ranked guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
}

/// One press or release of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: Button,
    pub pressed: bool,
}

/// Everything an event source can hand the interaction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A button changed state.
    Button(ButtonEvent),
    /// The user asked to leave the interaction loop.
    Quit,
}

/// Non-blocking event feed (joystick, keyboard, or a scripted test feed).
pub trait EventSource {
    /// Next pending event, if any.
    fn poll(&mut self) -> Option<ControllerEvent>;
}

/// What the frontend is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenView {
    /// Nothing on screen.
    Blank,
    /// The current best guess.
    Forecast(Label),
    /// Acknowledgement that the shown forecast was confirmed.
    Correct,
    /// Acknowledgement that the shown forecast was rejected.
    Wrong,
}

/// Output surface (LED matrix stand-in).
pub trait Screen {
    /// Replace whatever is currently shown.
    fn show(&mut self, view: ScreenView);
}

/// Capability set every interaction controller must provide.
pub trait Controller {
    /// React to a button press.
    fn on_button_pressed(&mut self, event: &ButtonEvent);
    /// React to a button release.
    fn on_button_released(&mut self, event: &ButtonEvent);
    /// Tear down: stop collaborators and clear the screen.
    fn reset(&mut self);
    /// Drive the interaction loop until told to quit.
    fn run(&mut self);
}
