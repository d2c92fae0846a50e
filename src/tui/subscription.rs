use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;

/// Subscriptions represent inputs that an app wants to receive.
/// They are registered via the subscriptions() function and refreshed after every update.
pub enum Subscription<Msg> {
    /// Subscribe to a specific keyboard key
    Keyboard {
        key: KeyCode,
        modifiers: KeyModifiers,
        msg: Msg,
        description: String,
    },

    /// Receive every key press that no keyboard subscription claimed (text input)
    KeyInput(Box<dyn Fn(KeyEvent) -> Option<Msg> + Send>),

    /// Receive raw mouse events
    Mouse(Box<dyn Fn(MouseEvent) -> Option<Msg> + Send>),

    /// Subscribe to periodic timer events. The `id` keeps the schedule across refreshes.
    Timer {
        id: &'static str,
        interval: Duration,
        msg: Msg,
    },

    /// Sent once per rendered frame
    Frame(Msg),
}

impl<Msg> Subscription<Msg> {
    /// Helper to create a keyboard subscription
    pub fn keyboard(key: KeyCode, description: impl Into<String>, msg: Msg) -> Self {
        Subscription::Keyboard {
            key,
            modifiers: KeyModifiers::NONE,
            msg,
            description: description.into(),
        }
    }

    /// Keyboard subscription that requires Ctrl
    pub fn ctrl(key: KeyCode, description: impl Into<String>, msg: Msg) -> Self {
        Subscription::Keyboard {
            key,
            modifiers: KeyModifiers::CONTROL,
            msg,
            description: description.into(),
        }
    }

    pub fn key_input<F>(handler: F) -> Self
    where
        F: Fn(KeyEvent) -> Option<Msg> + Send + 'static,
    {
        Subscription::KeyInput(Box::new(handler))
    }

    pub fn mouse<F>(handler: F) -> Self
    where
        F: Fn(MouseEvent) -> Option<Msg> + Send + 'static,
    {
        Subscription::Mouse(Box::new(handler))
    }

    /// Helper to create a timer subscription
    pub fn timer(id: &'static str, interval: Duration, msg: Msg) -> Self {
        Subscription::Timer { id, interval, msg }
    }

    pub fn frame(msg: Msg) -> Self {
        Subscription::Frame(msg)
    }
}
