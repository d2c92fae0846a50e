use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};
use ratatui::Frame;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::tui::{App, Command, Subscription, Theme};

type KeyHandler<Msg> = Box<dyn Fn(KeyEvent) -> Option<Msg> + Send>;
type MouseHandler<Msg> = Box<dyn Fn(MouseEvent) -> Option<Msg> + Send>;

/// The runtime manages app lifecycle, event routing, and command execution
pub struct Runtime<A: App> {
    /// Current app state
    state: A::State,

    theme: Theme,

    /// Keyboard subscriptions
    key_subscriptions: HashMap<(KeyCode, KeyModifiers), A::Msg>,

    /// Catch-all key handler for text input
    key_input: Option<KeyHandler<A::Msg>>,

    mouse_handlers: Vec<MouseHandler<A::Msg>>,

    /// Timer subscriptions: (id, interval, msg)
    timers: Vec<(&'static str, Duration, A::Msg)>,

    /// Last tick per timer id, kept across subscription refreshes
    timer_ticks: HashMap<&'static str, Instant>,

    frame_msgs: Vec<A::Msg>,

    /// Results of spawned async commands
    async_tx: mpsc::UnboundedSender<A::Msg>,
    async_rx: mpsc::UnboundedReceiver<A::Msg>,

    quit: bool,
}

impl<A: App> Runtime<A> {
    pub fn new(params: A::InitParams) -> Self {
        let (state, init_command) = A::init(params);
        let (async_tx, async_rx) = mpsc::unbounded_channel();

        let mut runtime = Self {
            state,
            theme: Theme::default(),
            key_subscriptions: HashMap::new(),
            key_input: None,
            mouse_handlers: Vec::new(),
            timers: Vec::new(),
            timer_ticks: HashMap::new(),
            frame_msgs: Vec::new(),
            async_tx,
            async_rx,
            quit: false,
        };

        runtime.update_subscriptions();
        runtime.execute_command(init_command);
        runtime
    }

    pub fn get_state(&self) -> &A::State {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Dispatch a message as if it came from an input
    pub fn dispatch(&mut self, msg: A::Msg) -> bool {
        let command = A::update(&mut self.state, msg);
        let keep_running = self.execute_command(command);
        self.update_subscriptions();
        keep_running
    }

    /// Handle a keyboard event. Returns false when the app asked to quit.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        if key_event.kind != KeyEventKind::Press {
            return Ok(true);
        }

        // Shift is implied by the character itself
        let modifiers = if matches!(key_event.code, KeyCode::Char(_)) {
            key_event.modifiers.difference(KeyModifiers::SHIFT)
        } else {
            key_event.modifiers
        };

        if let Some(msg) = self.key_subscriptions.get(&(key_event.code, modifiers)).cloned() {
            return Ok(self.dispatch(msg));
        }

        if let Some(msg) = self.key_input.as_ref().and_then(|handler| handler(key_event)) {
            return Ok(self.dispatch(msg));
        }

        Ok(true)
    }

    /// Handle a mouse event
    pub fn handle_mouse(&mut self, mouse_event: MouseEvent) -> Result<bool> {
        let messages: Vec<A::Msg> = self
            .mouse_handlers
            .iter()
            .filter_map(|handler| handler(mouse_event))
            .collect();

        for msg in messages {
            if !self.dispatch(msg) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Poll timer and per-frame subscriptions and fire those that are ready
    pub fn poll_timers(&mut self) -> Result<bool> {
        let now = Instant::now();
        let mut messages = self.frame_msgs.clone();

        for (id, interval, msg) in &self.timers {
            let last_tick = self.timer_ticks.entry(*id).or_insert(now);
            if now.duration_since(*last_tick) >= *interval {
                messages.push(msg.clone());
                *last_tick = now;
            }
        }

        for msg in messages {
            if !self.dispatch(msg) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Deliver results of finished async commands
    pub fn poll_async(&mut self) -> Result<bool> {
        while let Ok(msg) = self.async_rx.try_recv() {
            if !self.dispatch(msg) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Update subscriptions based on current state
    fn update_subscriptions(&mut self) {
        self.key_subscriptions.clear();
        self.key_input = None;
        self.mouse_handlers.clear();
        self.timers.clear();
        self.frame_msgs.clear();

        for sub in A::subscriptions(&self.state) {
            match sub {
                Subscription::Keyboard { key, modifiers, msg, .. } => {
                    self.key_subscriptions.insert((key, modifiers), msg);
                }
                Subscription::KeyInput(handler) => self.key_input = Some(handler),
                Subscription::Mouse(handler) => self.mouse_handlers.push(handler),
                Subscription::Timer { id, interval, msg } => self.timers.push((id, interval, msg)),
                Subscription::Frame(msg) => self.frame_msgs.push(msg),
            }
        }

        let active: Vec<&'static str> = self.timers.iter().map(|(id, _, _)| *id).collect();
        self.timer_ticks.retain(|id, _| active.contains(id));
    }

    /// Execute a command. Returns false on quit.
    fn execute_command(&mut self, command: Command<A::Msg>) -> bool {
        match command {
            Command::None => true,

            Command::Batch(commands) => {
                for cmd in commands {
                    if !self.execute_command(cmd) {
                        return false;
                    }
                }
                true
            }

            Command::Quit => {
                self.quit = true;
                false
            }

            Command::Perform(future) => {
                let tx = self.async_tx.clone();
                tokio::spawn(async move {
                    let msg = future.await;
                    // Receiver is gone once the TUI has exited
                    let _ = tx.send(msg);
                });
                true
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        A::view(frame, &mut self.state, &self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    struct Counter;

    #[derive(Clone)]
    enum Msg {
        Increment,
        Add(u32),
        Typed(char),
        Quit,
    }

    #[derive(Default)]
    struct State {
        count: u32,
        typed: String,
    }

    impl App for Counter {
        type State = State;
        type Msg = Msg;
        type InitParams = ();

        fn init(_params: ()) -> (State, Command<Msg>) {
            (State::default(), Command::None)
        }

        fn update(state: &mut State, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Increment => state.count += 1,
                Msg::Add(n) => state.count += n,
                Msg::Typed(c) => state.typed.push(c),
                Msg::Quit => return Command::Quit,
            }
            Command::None
        }

        fn view(_frame: &mut Frame, _state: &mut State, _theme: &Theme) {}

        fn subscriptions(_state: &State) -> Vec<Subscription<Msg>> {
            vec![
                Subscription::keyboard(KeyCode::Char('K'), "Increment", Msg::Increment),
                Subscription::keyboard(KeyCode::Char('q'), "Quit", Msg::Quit),
                Subscription::key_input(|key| match key.code {
                    KeyCode::Char(c) => Some(Msg::Typed(c)),
                    _ => None,
                }),
            ]
        }

        fn title() -> &'static str {
            "Counter"
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[tokio::test]
    async fn shifted_characters_match_their_subscription() {
        let mut runtime = Runtime::<Counter>::new(());
        assert!(runtime.handle_key(press(KeyCode::Char('K'), KeyModifiers::SHIFT)).unwrap());
        assert_eq!(runtime.get_state().count, 1);
    }

    #[tokio::test]
    async fn unclaimed_keys_reach_the_input_handler() {
        let mut runtime = Runtime::<Counter>::new(());
        runtime.handle_key(press(KeyCode::Char('z'), KeyModifiers::NONE)).unwrap();
        assert_eq!(runtime.get_state().typed, "z");
        assert_eq!(runtime.get_state().count, 0);
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut runtime = Runtime::<Counter>::new(());
        assert!(!runtime.handle_key(press(KeyCode::Char('q'), KeyModifiers::NONE)).unwrap());
        assert!(runtime.should_quit());
    }

    #[tokio::test]
    async fn perform_results_arrive_as_messages() {
        let mut runtime = Runtime::<Counter>::new(());
        runtime.execute_command(Command::perform(async { 5u32 }, Msg::Add));

        for _ in 0..50 {
            runtime.poll_async().unwrap();
            if runtime.get_state().count == 5 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(runtime.get_state().count, 5);
    }
}
