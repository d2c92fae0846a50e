//! Queue panel app

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use log::{debug, info};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::sync::Arc;
use std::time::Instant;

use super::commands::{load_history, load_queue, move_task, run_action};
use super::grid::TaskGrid;
use super::models::{Prompt, RefreshAfter, SortOrder, Tab, TaskAction, Toast};
use super::views;
use crate::api::{
    HistoryFilter, HistoryResponse, QueueStatusResponse, ResponseStatus, SchedulerClient, Task,
};
use crate::config::UiConfig;
use crate::reorder::{ReorderEngine, RowGrid, plan_step, row_at_pixel};
use crate::tui::{App, Command, Subscription, Theme};

pub struct QueueApp;

pub struct QueueAppParams {
    pub client: Arc<SchedulerClient>,
    pub ui: UiConfig,
}

#[derive(Clone)]
pub enum Msg {
    // Data
    Refresh,
    QueueLoaded(Result<QueueStatusResponse, String>),
    HistoryLoaded(Result<HistoryResponse, String>),
    ActionFinished(ResponseStatus, RefreshAfter),
    Frame,

    // Navigation
    SwitchTab,
    SelectPrevious,
    SelectNext,
    PreviousPage,
    NextPage,

    // Pointer
    PointerDown { column: u16, row: u16 },
    PointerDrag { column: u16, row: u16 },
    PointerUp,
    Escape,

    // Actions on the selected task
    StepSelected(isize),
    Activate,
    DeleteSelected,
    ToggleBookmark,
    StartRename,

    // Queue-wide actions
    TogglePause,
    RequeueFailed,
    StartClear,
    CycleHistoryFilter,
    StartSearch,

    // Prompt line
    InputChar(char),
    InputBackspace,
    InputSubmit,
    InputCancel,
    ConfirmYes,
    ConfirmNo,

    Quit,
}

pub struct State {
    pub client: Arc<SchedulerClient>,
    pub ui: UiConfig,

    pub tab: Tab,
    pub pending: TaskGrid,
    pub history: TaskGrid,
    pub history_filter: HistoryFilter,
    pub engine: ReorderEngine,

    // Header
    pub paused: bool,
    pub current_task_id: Option<String>,
    pub total_pending: usize,
    pub history_total: usize,
    pub last_error: Option<String>,

    // Interaction
    pub selected: Option<String>,
    /// Row the left button went down on, the drag candidate
    pub pressed: Option<String>,
    pub pointer_inside: bool,
    /// Table body recorded by the last render
    pub body: Rect,
    pub prompt: Option<Prompt>,
    pub input: String,
    pub toasts: Vec<Toast>,

    /// Queue snapshot that arrived mid-drag
    deferred_queue: Option<Vec<Task>>,
    queue_loading: bool,
    history_loading: bool,
}

impl State {
    pub fn new(client: Arc<SchedulerClient>, ui: UiConfig) -> Self {
        let prompt_lines = ui.effective_row_height() - 1;
        Self {
            client,
            engine: ReorderEngine::new(ui.drag_config()),
            pending: TaskGrid::new(SortOrder::Queue, prompt_lines),
            history: TaskGrid::new(SortOrder::History, prompt_lines),
            ui,
            tab: Tab::Pending,
            history_filter: HistoryFilter::All,
            paused: false,
            current_task_id: None,
            total_pending: 0,
            history_total: 0,
            last_error: None,
            selected: None,
            pressed: None,
            pointer_inside: false,
            body: Rect::default(),
            prompt: None,
            input: String::new(),
            toasts: Vec::new(),
            deferred_queue: None,
            queue_loading: false,
            history_loading: false,
        }
    }

    pub fn grid(&self) -> &TaskGrid {
        match self.tab {
            Tab::Pending => &self.pending,
            Tab::History => &self.history,
        }
    }

    pub fn grid_mut(&mut self) -> &mut TaskGrid {
        match self.tab {
            Tab::Pending => &mut self.pending,
            Tab::History => &mut self.history,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.as_deref().and_then(|id| self.grid().task(id))
    }

    /// Body-relative line center for a screen position inside the table body
    pub fn pixel_at(&self, column: u16, row: u16) -> Option<f64> {
        let body = self.body;
        let inside = column >= body.x
            && column < body.x + body.width
            && row >= body.y
            && row < body.y + body.height;
        inside.then(|| f64::from(row - body.y) + 0.5)
    }

    fn notify(&mut self, status: &ResponseStatus) {
        let toast = Toast::from_status(status, Instant::now(), self.ui.toast_duration());
        self.toasts.push(toast);
        // Oldest first, at most a handful on screen
        if self.toasts.len() > 4 {
            self.toasts.remove(0);
        }
    }

    /// Keep the selection on a visible row after the rows changed
    fn fix_selection(&mut self) {
        let still_there = self
            .selected
            .as_deref()
            .is_some_and(|id| self.grid().display_index(id).is_some());
        if !still_there {
            let first = self.grid().page_rows().next().map(|(_, row)| row.id.clone());
            self.selected = first;
        }
    }

    fn apply_queue(&mut self, tasks: Vec<Task>) {
        self.pending.set_tasks(tasks);
        if self.tab == Tab::Pending {
            self.fix_selection();
        }
    }

    fn apply_deferred(&mut self) {
        if let Some(tasks) = self.deferred_queue.take() {
            debug!("Applying queue snapshot deferred during drag");
            self.apply_queue(tasks);
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.grid().displayed_row_count();
        if count == 0 {
            return;
        }
        let current = self
            .selected
            .as_deref()
            .and_then(|id| self.grid().display_index(id));
        let next = match current {
            Some(index) => index.saturating_add_signed(delta).min(count - 1),
            None => 0,
        };
        if let Some(row) = self.grid().displayed_row_at(next) {
            self.selected = Some(row.id.clone());
        }
        self.grid_mut().reveal(next);
    }

    fn finish_drag(&mut self) {
        self.pressed = None;
        self.pointer_inside = false;
        self.apply_deferred();
    }
}

fn refresh(state: &mut State) -> Command<Msg> {
    let mut commands = Vec::new();
    if !state.queue_loading {
        state.queue_loading = true;
        commands.push(load_queue(&state.client));
    }
    if state.tab == Tab::History && !state.history_loading {
        state.history_loading = true;
        commands.push(load_history(&state.client, state.history_filter));
    }
    Command::batch(commands)
}

fn action(state: &State, action: TaskAction) -> Command<Msg> {
    info!("Requested: {}", action.describe());
    run_action(&state.client, action)
}

impl App for QueueApp {
    type State = State;
    type Msg = Msg;
    type InitParams = QueueAppParams;

    fn init(params: QueueAppParams) -> (State, Command<Msg>) {
        let mut state = State::new(params.client, params.ui);
        let command = refresh(&mut state);
        (state, command)
    }

    fn update(state: &mut State, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Refresh => refresh(state),

            Msg::QueueLoaded(result) => {
                state.queue_loading = false;
                match result {
                    Ok(response) => {
                        state.last_error = None;
                        state.paused = response.paused;
                        state.current_task_id = response.current_task_id;
                        state.total_pending = response.total_pending_tasks;
                        if state.engine.is_dragging() {
                            state.deferred_queue = Some(response.pending_tasks);
                        } else {
                            state.apply_queue(response.pending_tasks);
                        }
                    }
                    Err(message) => {
                        if state.last_error.is_none() {
                            state.notify(&ResponseStatus::failure(message.clone()));
                        }
                        state.last_error = Some(message);
                    }
                }
                Command::None
            }

            Msg::HistoryLoaded(result) => {
                state.history_loading = false;
                match result {
                    Ok(response) => {
                        state.history_total = response.total;
                        state.history.set_tasks(response.tasks);
                        if state.tab == Tab::History {
                            state.fix_selection();
                        }
                    }
                    Err(message) => {
                        if state.last_error.is_none() {
                            state.notify(&ResponseStatus::failure(message.clone()));
                        }
                        state.last_error = Some(message);
                    }
                }
                Command::None
            }

            Msg::ActionFinished(status, after) => {
                state.notify(&status);
                match after {
                    RefreshAfter::Now => refresh(state),
                    RefreshAfter::Settle => Command::delayed(after.delay(), Msg::Refresh),
                }
            }

            Msg::Frame => {
                let now = Instant::now();
                if state.tab == Tab::Pending && state.engine.poll_timer(&mut state.pending, now) {
                    debug!("Page advanced during drag to page {}", state.pending.current_page() + 1);
                }
                state.toasts.retain(|toast| toast.expires_at > now);
                Command::None
            }

            Msg::SwitchTab => {
                state.engine.cancel();
                state.finish_drag();
                state.tab = state.tab.toggle();
                state.selected = None;
                state.fix_selection();
                refresh(state)
            }

            Msg::SelectPrevious => {
                state.move_selection(-1);
                Command::None
            }

            Msg::SelectNext => {
                state.move_selection(1);
                Command::None
            }

            Msg::PreviousPage => {
                state.grid_mut().go_to_previous_page();
                state.selected = None;
                state.fix_selection();
                Command::None
            }

            Msg::NextPage => {
                state.grid_mut().go_to_next_page();
                state.selected = None;
                state.fix_selection();
                Command::None
            }

            Msg::PointerDown { column, row } => {
                let Some(pixel) = state.pixel_at(column, row) else {
                    return Command::None;
                };
                let Some(id) = row_at_pixel(state.grid(), pixel).map(|r| r.id.clone()) else {
                    return Command::None;
                };
                state.selected = Some(id.clone());
                if state.tab == Tab::Pending {
                    state.pressed = Some(id);
                    state.pointer_inside = true;
                }
                Command::None
            }

            Msg::PointerDrag { column, row } => {
                let Some(dragged) = state.pressed.clone() else {
                    return Command::None;
                };
                if state.tab != Tab::Pending {
                    return Command::None;
                }

                let now = Instant::now();
                match state.pixel_at(column, row) {
                    Some(pixel) => {
                        if state.engine.is_dragging() && state.pointer_inside {
                            state.engine.drag_move(&state.pending, pixel, now);
                        } else {
                            state.engine.drag_enter(&state.pending, &dragged, pixel, now);
                        }
                        state.pointer_inside = true;
                    }
                    None => {
                        if state.engine.is_dragging() && state.pointer_inside {
                            state.engine.drag_leave();
                        }
                        state.pointer_inside = false;
                    }
                }
                Command::None
            }

            Msg::PointerUp => {
                let Some(dragged) = state.pressed.clone() else {
                    return Command::None;
                };
                if !state.engine.is_dragging() {
                    state.finish_drag();
                    return Command::None;
                }

                let request = state.engine.drag_end(&state.pending, &dragged);
                state.finish_drag();
                match request {
                    Some(request) => {
                        state.selected = Some(request.task_id.clone());
                        move_task(&state.client, request)
                    }
                    None => Command::None,
                }
            }

            Msg::Escape => {
                if state.engine.is_dragging() || state.pressed.is_some() {
                    state.engine.cancel();
                    state.finish_drag();
                } else if !state.grid().query().is_empty() {
                    state.grid_mut().set_query("");
                    state.fix_selection();
                }
                Command::None
            }

            Msg::StepSelected(steps) => {
                if state.tab != Tab::Pending || state.engine.is_dragging() {
                    return Command::None;
                }
                let Some(id) = state.selected.clone() else {
                    return Command::None;
                };
                match plan_step(&state.pending, &id, steps) {
                    Some(request) => move_task(&state.client, request),
                    None => Command::None,
                }
            }

            Msg::Activate => {
                let Some(id) = state.selected.clone() else {
                    return Command::None;
                };
                match state.tab {
                    Tab::Pending => action(state, TaskAction::Run(id)),
                    Tab::History => action(state, TaskAction::Requeue(id)),
                }
            }

            Msg::DeleteSelected => match state.selected.clone() {
                Some(id) => action(state, TaskAction::Delete(id)),
                None => Command::None,
            },

            Msg::ToggleBookmark => {
                if state.tab != Tab::History {
                    return Command::None;
                }
                let Some(task) = state.selected_task() else {
                    return Command::None;
                };
                let request = TaskAction::Bookmark {
                    task_id: task.id.clone(),
                    bookmarked: !task.is_bookmarked(),
                };
                action(state, request)
            }

            Msg::StartRename => {
                let Some(task) = state.selected_task() else {
                    return Command::None;
                };
                let (task_id, name) = (task.id.clone(), task.name.clone().unwrap_or_default());
                state.prompt = Some(Prompt::Rename { task_id });
                state.input = name;
                Command::None
            }

            Msg::TogglePause => {
                let request = if state.paused {
                    TaskAction::Resume
                } else {
                    TaskAction::Pause
                };
                action(state, request)
            }

            Msg::RequeueFailed => action(state, TaskAction::RequeueFailed),

            Msg::StartClear => {
                state.prompt = Some(Prompt::ConfirmClear(state.tab));
                Command::None
            }

            Msg::CycleHistoryFilter => {
                if state.tab != Tab::History {
                    return Command::None;
                }
                state.history_filter = state.history_filter.next();
                state.history_loading = true;
                load_history(&state.client, state.history_filter)
            }

            Msg::StartSearch => {
                state.input = state.grid().query().to_string();
                state.prompt = Some(Prompt::Search);
                Command::None
            }

            Msg::InputChar(c) => {
                state.input.push(c);
                if state.prompt == Some(Prompt::Search) {
                    let query = state.input.clone();
                    state.grid_mut().set_query(&query);
                    state.fix_selection();
                }
                Command::None
            }

            Msg::InputBackspace => {
                state.input.pop();
                if state.prompt == Some(Prompt::Search) {
                    let query = state.input.clone();
                    state.grid_mut().set_query(&query);
                    state.fix_selection();
                }
                Command::None
            }

            Msg::InputSubmit => {
                let input = std::mem::take(&mut state.input);
                match state.prompt.take() {
                    Some(Prompt::Rename { task_id }) if !input.trim().is_empty() => action(
                        state,
                        TaskAction::Rename {
                            task_id,
                            name: input.trim().to_string(),
                        },
                    ),
                    _ => Command::None,
                }
            }

            Msg::InputCancel => {
                state.input.clear();
                if state.prompt.take() == Some(Prompt::Search) {
                    state.grid_mut().set_query("");
                    state.fix_selection();
                }
                Command::None
            }

            Msg::ConfirmYes => match state.prompt.take() {
                Some(Prompt::ConfirmClear(Tab::Pending)) => action(state, TaskAction::ClearQueue),
                Some(Prompt::ConfirmClear(Tab::History)) => action(state, TaskAction::ClearHistory),
                _ => Command::None,
            },

            Msg::ConfirmNo => {
                state.prompt = None;
                Command::None
            }

            Msg::Quit => Command::Quit,
        }
    }

    fn view(frame: &mut Frame, state: &mut State, theme: &Theme) {
        views::render(frame, state, theme);
    }

    fn subscriptions(state: &State) -> Vec<Subscription<Msg>> {
        let mut subs = vec![
            Subscription::ctrl(KeyCode::Char('c'), "Quit", Msg::Quit),
            Subscription::frame(Msg::Frame),
            Subscription::timer("refresh", state.ui.refresh_interval(), Msg::Refresh),
        ];

        match &state.prompt {
            Some(Prompt::Search) | Some(Prompt::Rename { .. }) => {
                subs.push(Subscription::keyboard(KeyCode::Esc, "Cancel", Msg::InputCancel));
                subs.push(Subscription::keyboard(KeyCode::Enter, "Apply", Msg::InputSubmit));
                subs.push(Subscription::keyboard(KeyCode::Backspace, "Delete", Msg::InputBackspace));
                subs.push(Subscription::key_input(|key| match key.code {
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Msg::InputChar(c))
                    }
                    _ => None,
                }));
            }
            Some(Prompt::ConfirmClear(_)) => {
                subs.push(Subscription::keyboard(KeyCode::Char('y'), "Yes", Msg::ConfirmYes));
                subs.push(Subscription::keyboard(KeyCode::Char('n'), "No", Msg::ConfirmNo));
                subs.push(Subscription::keyboard(KeyCode::Esc, "No", Msg::ConfirmNo));
            }
            None => {
                subs.extend([
                    Subscription::keyboard(KeyCode::Tab, "Switch tab", Msg::SwitchTab),
                    Subscription::keyboard(KeyCode::Up, "Up", Msg::SelectPrevious),
                    Subscription::keyboard(KeyCode::Down, "Down", Msg::SelectNext),
                    Subscription::keyboard(KeyCode::Char('k'), "Up", Msg::SelectPrevious),
                    Subscription::keyboard(KeyCode::Char('j'), "Down", Msg::SelectNext),
                    Subscription::keyboard(KeyCode::PageUp, "Prev page", Msg::PreviousPage),
                    Subscription::keyboard(KeyCode::PageDown, "Next page", Msg::NextPage),
                    Subscription::keyboard(KeyCode::Left, "Prev page", Msg::PreviousPage),
                    Subscription::keyboard(KeyCode::Right, "Next page", Msg::NextPage),
                    Subscription::keyboard(KeyCode::Enter, state.tab_action_label(), Msg::Activate),
                    Subscription::keyboard(KeyCode::Char('x'), "Delete", Msg::DeleteSelected),
                    Subscription::keyboard(KeyCode::Char('p'), state.pause_label(), Msg::TogglePause),
                    Subscription::keyboard(KeyCode::Char('r'), "Refresh", Msg::Refresh),
                    Subscription::keyboard(KeyCode::Char('n'), "Rename", Msg::StartRename),
                    Subscription::keyboard(KeyCode::Char('/'), "Search", Msg::StartSearch),
                    Subscription::keyboard(KeyCode::Char('R'), "Requeue failed", Msg::RequeueFailed),
                    Subscription::keyboard(KeyCode::Char('C'), "Clear", Msg::StartClear),
                    Subscription::keyboard(KeyCode::Esc, "Cancel", Msg::Escape),
                    Subscription::keyboard(KeyCode::Char('q'), "Quit", Msg::Quit),
                ]);

                match state.tab {
                    Tab::Pending => {
                        subs.push(Subscription::keyboard(KeyCode::Char('K'), "Move up", Msg::StepSelected(-1)));
                        subs.push(Subscription::keyboard(KeyCode::Char('J'), "Move down", Msg::StepSelected(1)));
                    }
                    Tab::History => {
                        subs.push(Subscription::keyboard(KeyCode::Char('b'), "Bookmark", Msg::ToggleBookmark));
                        subs.push(Subscription::keyboard(KeyCode::Char('f'), "Filter", Msg::CycleHistoryFilter));
                    }
                }

                subs.push(Subscription::mouse(|event| match event.kind {
                    MouseEventKind::Down(MouseButton::Left) => Some(Msg::PointerDown {
                        column: event.column,
                        row: event.row,
                    }),
                    MouseEventKind::Drag(MouseButton::Left) => Some(Msg::PointerDrag {
                        column: event.column,
                        row: event.row,
                    }),
                    MouseEventKind::Up(MouseButton::Left) => Some(Msg::PointerUp),
                    MouseEventKind::ScrollUp => Some(Msg::SelectPrevious),
                    MouseEventKind::ScrollDown => Some(Msg::SelectNext),
                    _ => None,
                }));
            }
        }

        subs
    }

    fn title() -> &'static str {
        "Agent Scheduler"
    }

    fn status(state: &State, theme: &Theme) -> Option<Line<'static>> {
        let mut spans = vec![Span::styled(
            format!(" {} ", Self::title()),
            Style::default().fg(theme.base).bg(theme.mauve),
        )];

        if state.paused {
            spans.push(Span::styled("  ⏸ Paused", theme.warning_style()));
        } else {
            spans.push(Span::styled("  ▶ Running", theme.success_style()));
        }

        let current = state.current_task_id.as_deref().map_or_else(
            || "idle".to_string(),
            |id| {
                state
                    .pending
                    .task(id)
                    .map(|task| task.display_name().to_string())
                    .unwrap_or_else(|| id.to_string())
            },
        );
        spans.push(Span::styled(format!("  Current: {}", current), Style::default().fg(theme.text)));
        spans.push(Span::styled(
            format!("  Pending: {}", state.total_pending),
            Style::default().fg(theme.blue),
        ));

        if let Some(error) = &state.last_error {
            spans.push(Span::styled(format!("  {}", error), theme.error_style()));
        }

        Some(Line::from(spans))
    }
}

impl State {
    fn tab_action_label(&self) -> &'static str {
        match self.tab {
            Tab::Pending => "Run",
            Tab::History => "Requeue",
        }
    }

    fn pause_label(&self) -> &'static str {
        if self.paused { "Resume" } else { "Pause" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TaskStatus;
    use crate::config::ServerConfig;
    use serde_json::{Map, Value};

    fn task(id: &str, priority: i64) -> Task {
        let mut params = Map::new();
        params.insert("prompt".into(), Value::String(format!("prompt {}", id)));
        Task {
            id: id.into(),
            api_task_id: None,
            name: None,
            task_type: "txt2img".into(),
            status: TaskStatus::Pending,
            params,
            priority: Some(priority),
            result: None,
            bookmarked: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn loaded(ids: &[&str]) -> Msg {
        Msg::QueueLoaded(Ok(QueueStatusResponse {
            current_task_id: None,
            pending_tasks: ids
                .iter()
                .enumerate()
                .map(|(i, id)| task(id, i as i64))
                .collect(),
            total_pending_tasks: ids.len(),
            paused: false,
        }))
    }

    fn state() -> State {
        let client = SchedulerClient::new(&ServerConfig::default()).unwrap();
        let mut state = State::new(Arc::new(client), UiConfig::default());
        // Rows are two lines tall, body starts on screen line 2
        state.body = Rect::new(0, 2, 80, 20);
        state
    }

    #[test]
    fn loading_the_queue_selects_the_first_row() {
        let mut state = state();
        QueueApp::update(&mut state, loaded(&["a", "b", "c"]));
        assert_eq!(state.selected.as_deref(), Some("a"));
        assert_eq!(state.total_pending, 3);
    }

    #[tokio::test]
    async fn dragging_below_the_last_row_requests_a_move() {
        let mut state = state();
        QueueApp::update(&mut state, loaded(&["a", "b", "c"]));

        // Row a spans screen lines 2-3, c spans 6-7
        QueueApp::update(&mut state, Msg::PointerDown { column: 5, row: 2 });
        assert_eq!(state.pressed.as_deref(), Some("a"));

        QueueApp::update(&mut state, Msg::PointerDrag { column: 5, row: 7 });
        let highlight = state.engine.highlight().unwrap();
        assert_eq!(highlight.row_id, "c");

        let command = QueueApp::update(&mut state, Msg::PointerUp);
        assert!(matches!(command, Command::Perform(_)));
        assert!(!state.engine.is_dragging());
        assert!(state.pressed.is_none());
    }

    #[test]
    fn leaving_the_body_then_releasing_moves_nothing() {
        let mut state = state();
        QueueApp::update(&mut state, loaded(&["a", "b", "c"]));

        QueueApp::update(&mut state, Msg::PointerDown { column: 5, row: 2 });
        QueueApp::update(&mut state, Msg::PointerDrag { column: 5, row: 6 });
        QueueApp::update(&mut state, Msg::PointerDrag { column: 5, row: 0 });
        assert!(state.engine.is_dragging());
        assert!(state.engine.highlight().is_none());

        let command = QueueApp::update(&mut state, Msg::PointerUp);
        assert!(command.is_none());
        assert!(!state.engine.is_dragging());
    }

    #[test]
    fn refresh_during_drag_is_deferred_until_drop() {
        let mut state = state();
        QueueApp::update(&mut state, loaded(&["a", "b"]));
        QueueApp::update(&mut state, Msg::PointerDown { column: 5, row: 2 });
        QueueApp::update(&mut state, Msg::PointerDrag { column: 5, row: 4 });

        QueueApp::update(&mut state, loaded(&["z", "a", "b"]));
        assert_eq!(state.pending.displayed_row_count(), 2);

        QueueApp::update(&mut state, Msg::Escape);
        assert!(!state.engine.is_dragging());
        assert_eq!(state.pending.displayed_row_count(), 3);
    }

    #[test]
    fn clicking_without_dragging_only_selects() {
        let mut state = state();
        QueueApp::update(&mut state, loaded(&["a", "b"]));
        QueueApp::update(&mut state, Msg::PointerDown { column: 5, row: 4 });
        let command = QueueApp::update(&mut state, Msg::PointerUp);
        assert!(command.is_none());
        assert_eq!(state.selected.as_deref(), Some("b"));
    }

    #[test]
    fn clear_requires_confirmation() {
        let mut state = state();
        assert!(QueueApp::update(&mut state, Msg::StartClear).is_none());
        assert_eq!(state.prompt, Some(Prompt::ConfirmClear(Tab::Pending)));
        QueueApp::update(&mut state, Msg::ConfirmNo);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn search_filters_the_current_tab() {
        let mut state = state();
        QueueApp::update(&mut state, loaded(&["alpha", "beta"]));
        QueueApp::update(&mut state, Msg::StartSearch);
        for c in "beta".chars() {
            QueueApp::update(&mut state, Msg::InputChar(c));
        }
        assert_eq!(state.pending.displayed_row_count(), 1);
        assert_eq!(state.selected.as_deref(), Some("beta"));

        QueueApp::update(&mut state, Msg::InputCancel);
        assert_eq!(state.pending.displayed_row_count(), 2);
    }
}
