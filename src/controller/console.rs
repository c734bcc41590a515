//! Console stand-ins for the joystick and the LED matrix.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;

use super::{Button, ButtonEvent, ControllerEvent, EventSource, Screen, ScreenView};

/// Keyboard-driven event source: `y` confirms, `n` rejects, `q` quits.
pub struct StdinEvents {
    line_rx: Receiver<String>,
    pending: VecDeque<ControllerEvent>,
}

impl StdinEvents {
    /// Start a reader thread over stdin.
    ///
    /// The thread ends with the process; it holds no resources beyond the
    /// stdin lock.
    pub fn spawn() -> Self {
        let (line_tx, line_rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self {
            line_rx,
            pending: VecDeque::new(),
        }
    }

    fn push_button(&mut self, button: Button) {
        // A keystroke stands in for a full press/release pair.
        self.pending.push_back(ControllerEvent::Button(ButtonEvent {
            button,
            pressed: true,
        }));
        self.pending.push_back(ControllerEvent::Button(ButtonEvent {
            button,
            pressed: false,
        }));
    }
}

impl EventSource for StdinEvents {
    fn poll(&mut self) -> Option<ControllerEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match self.line_rx.try_recv() {
            Ok(line) => match line.trim() {
                "y" | "yes" => {
                    self.push_button(Button::Up);
                    self.pending.pop_front()
                }
                "n" | "no" => {
                    self.push_button(Button::Down);
                    self.pending.pop_front()
                }
                "q" | "quit" => Some(ControllerEvent::Quit),
                "" => None,
                other => {
                    tracing::debug!("Ignoring console input {other:?}");
                    None
                }
            },
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(ControllerEvent::Quit),
        }
    }
}

/// Prints the forecast instead of lighting an LED matrix.
#[derive(Debug, Default)]
pub struct ConsoleScreen {
    last: Option<ScreenView>,
}

impl ConsoleScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen for ConsoleScreen {
    fn show(&mut self, view: ScreenView) {
        // Redrawing the same view every cycle would flood the console.
        if self.last == Some(view) {
            return;
        }
        self.last = Some(view);
        match view {
            ScreenView::Blank => {}
            ScreenView::Forecast(label) => println!("forecast: {label}"),
            ScreenView::Correct => println!("confirmed"),
            ScreenView::Wrong => println!("next guess"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_screen_skips_repeated_views() {
        let mut screen = ConsoleScreen::new();
        screen.show(ScreenView::Blank);
        assert_eq!(screen.last, Some(ScreenView::Blank));
        screen.show(ScreenView::Correct);
        assert_eq!(screen.last, Some(ScreenView::Correct));
    }
}
