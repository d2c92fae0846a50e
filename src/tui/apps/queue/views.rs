//! Rendering for the queue panel

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app::{QueueApp, State};
use super::models::{Prompt, Tab, status_symbol};
use crate::api::Task;
use crate::reorder::{HighlightPosition, PageDirection, RowGrid};
use crate::tui::{App, Theme};

/// Gutter holding the drop marker, plus the prompt indent
const GUTTER: u16 = 2;
const PROMPT_INDENT: &str = "  ";

pub fn render(frame: &mut Frame, state: &mut State, theme: &Theme) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if let Some(status) = QueueApp::status(state, theme) {
        frame.render_widget(Paragraph::new(status), header);
    }

    render_table(frame, state, theme, body);
    render_footer(frame, state, theme, footer);
    render_toasts(frame, state, theme);
}

fn tab_title(state: &State, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for tab in [Tab::Pending, Tab::History] {
        let count = match tab {
            Tab::Pending => state.total_pending,
            Tab::History => state.history_total,
        };
        let style = if tab == state.tab {
            Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD)
        } else {
            theme.muted_style()
        };
        spans.push(Span::styled(format!(" {} ({}) ", tab.label(), count), style));
    }
    if state.tab == Tab::History {
        spans.push(Span::styled(
            format!("[{}] ", state.history_filter.as_str()),
            Style::default().fg(theme.teal),
        ));
    }
    Line::from(spans)
}

fn render_table(frame: &mut Frame, state: &mut State, theme: &Theme, area: Rect) {
    let grid = state.grid();
    let page_label = format!(" Page {}/{} ", grid.current_page() + 1, grid.total_pages());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay))
        .title(tab_title(state, theme))
        .title_bottom(Line::from(page_label).alignment(Alignment::Right));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Geometry the next mouse event is mapped against
    state.body = inner;
    let row_height = usize::from(state.ui.effective_row_height());
    let page_size = match state.ui.page_size {
        0 => (usize::from(inner.height) / row_height).max(1),
        configured => configured,
    };
    let wrap_width = usize::from(inner.width.saturating_sub(GUTTER)).saturating_sub(PROMPT_INDENT.len());
    let grid = state.grid_mut();
    grid.set_wrap_width(wrap_width);
    grid.set_page_size(page_size);

    let state = &*state;
    let grid = state.grid();
    if grid.displayed_row_count() == 0 {
        let message = match (state.tab, grid.query().is_empty()) {
            (_, false) => "No tasks match the search",
            (Tab::Pending, true) => "No pending tasks",
            (Tab::History, true) => "No tasks in history",
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(theme.muted_style())
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let page_top = grid.page_top();
    let highlight = state.engine.highlight();
    let dragged = state.engine.dragged_id();

    for (index, row) in grid.page_rows() {
        let offset = (row.top - page_top) as u16;
        if offset >= inner.height {
            break;
        }
        let Some(task) = grid.task_at(index) else {
            continue;
        };

        let height = (row.height as u16).min(inner.height - offset);
        let rect = Rect::new(inner.x, inner.y + offset, inner.width, height);

        let marker = highlight
            .filter(|h| h.row_id == row.id)
            .map(|h| h.position);
        let is_current = state.current_task_id.as_deref() == Some(task.id.as_str());

        let mut style = Style::default().fg(theme.text);
        if state.selected.as_deref() == Some(task.id.as_str()) {
            style = style.patch(theme.selected_style());
        }
        if dragged == Some(task.id.as_str()) {
            style = style.patch(theme.dragged_style());
        }

        let lines = row_lines(state, task, is_current, marker, theme);
        frame.render_widget(Paragraph::new(lines).style(style), rect);
    }
}

fn row_lines(
    state: &State,
    task: &Task,
    is_current: bool,
    marker: Option<HighlightPosition>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let prompt_lines = state.grid().prompt_lines(task);
    let line_count = 1 + prompt_lines.len().max(1);

    let gutter = |line: usize| -> Span<'static> {
        match marker {
            Some(HighlightPosition::Above) if line == 0 => Span::styled("▲ ", theme.drop_marker_style()),
            Some(HighlightPosition::Below) if line + 1 == line_count => {
                Span::styled("▼ ", theme.drop_marker_style())
            }
            Some(_) => Span::styled("│ ", theme.drop_marker_style()),
            None => Span::raw("  "),
        }
    };

    let status_style = match (is_current, task.status) {
        (true, _) => theme.success_style(),
        (_, crate::api::TaskStatus::Failed) => theme.error_style(),
        (_, crate::api::TaskStatus::Interrupted) => theme.warning_style(),
        _ => Style::default().fg(theme.blue),
    };

    let mut title = vec![
        gutter(0),
        Span::styled(format!("{} ", status_symbol(task.status, is_current)), status_style),
    ];
    if task.is_bookmarked() {
        title.push(Span::styled("★ ", Style::default().fg(theme.yellow)));
    }
    title.push(Span::styled(
        task.display_name().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    title.push(Span::styled(format!("  {}", details(task)), theme.muted_style()));

    let mut lines = vec![Line::from(title)];
    if prompt_lines.is_empty() {
        lines.push(Line::from(vec![gutter(1), Span::styled("(no prompt)", theme.muted_style())]));
    }
    for (i, text) in prompt_lines.into_iter().enumerate() {
        lines.push(Line::from(vec![
            gutter(i + 1),
            Span::raw(PROMPT_INDENT),
            Span::styled(text, Style::default().fg(theme.subtext)),
        ]));
    }
    lines
}

/// Secondary facts on the title line
fn details(task: &Task) -> String {
    let mut parts = vec![task.task_type.clone()];
    if let Some(checkpoint) = task.checkpoint() {
        parts.push(checkpoint.to_string());
    }
    if let Some(sampler) = task.sampler() {
        parts.push(sampler.to_string());
    }
    if let Some(steps) = task.steps() {
        parts.push(format!("{} steps", steps));
    }
    if let Some(created) = task.created_at {
        parts.push(created.with_timezone(&Local).format("%m-%d %H:%M").to_string());
    }
    parts.join(" · ")
}

fn render_footer(frame: &mut Frame, state: &State, theme: &Theme, area: Rect) {
    let line = match &state.prompt {
        Some(Prompt::Search) => Line::from(vec![
            Span::styled("/", Style::default().fg(theme.mauve)),
            Span::raw(state.input.clone()),
            Span::styled("▏", Style::default().fg(theme.mauve)),
        ]),
        Some(Prompt::Rename { .. }) => Line::from(vec![
            Span::styled("Rename: ", Style::default().fg(theme.mauve)),
            Span::raw(state.input.clone()),
            Span::styled("▏", Style::default().fg(theme.mauve)),
        ]),
        Some(Prompt::ConfirmClear(tab)) => {
            let what = match tab {
                Tab::Pending => "Clear all pending tasks?",
                Tab::History => "Clear the whole history?",
            };
            Line::from(vec![
                Span::styled(what, theme.warning_style()),
                Span::styled("  (y/n)", theme.muted_style()),
            ])
        }
        None if state.engine.is_dragging() => {
            let hint = match state.engine.armed_direction() {
                Some(PageDirection::Previous) => "Hold to turn to the previous page".to_string(),
                Some(PageDirection::Next) => "Hold to turn to the next page".to_string(),
                None => "Release to drop, Esc to cancel".to_string(),
            };
            Line::from(Span::styled(hint, Style::default().fg(theme.mauve)))
        }
        None => {
            let hints = match state.tab {
                Tab::Pending => "Tab history · drag/K/J move · ⏎ run · x delete · p pause · / search · C clear · q quit",
                Tab::History => "Tab pending · ⏎ requeue · b bookmark · f filter · R requeue failed · x delete · C clear · q quit",
            };
            Line::from(Span::styled(hints, theme.muted_style()))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_toasts(frame: &mut Frame, state: &State, theme: &Theme) {
    let area = frame.area();
    for (i, toast) in state.toasts.iter().rev().enumerate() {
        let width = (toast.message.chars().count() as u16 + 4).min(area.width.saturating_sub(2)).max(10);
        let y = area.y + 1 + i as u16;
        if y >= area.bottom().saturating_sub(1) {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, 1);
        let style = if toast.success {
            Style::default().fg(theme.base).bg(theme.green)
        } else {
            Style::default().fg(theme.base).bg(theme.red)
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(format!(" {} ", toast.message)).style(style),
            rect,
        );
    }
}
