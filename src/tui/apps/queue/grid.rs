//! Paginated task table backing the drag engine

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::cmp::Reverse;

use super::models::SortOrder;
use crate::api::Task;
use crate::reorder::{PageWindow, RowGrid, RowNode};

/// Filtered, sorted and paged view over the tasks of one tab.
///
/// Row geometry is in terminal lines: one title line plus up to
/// `max_prompt_lines` wrapped prompt lines. Tops accumulate over the whole
/// filtered list, so a page's first row rarely sits at zero.
#[derive(Debug, Clone)]
pub struct TaskGrid {
    tasks: Vec<Task>,
    sort: SortOrder,
    query: String,
    rows: Vec<RowNode>,
    /// Index into `tasks` for each displayed row
    row_tasks: Vec<usize>,
    wrap_width: usize,
    max_prompt_lines: u16,
    page_size: usize,
    current_page: usize,
}

impl TaskGrid {
    pub fn new(sort: SortOrder, max_prompt_lines: u16) -> Self {
        Self {
            tasks: Vec::new(),
            sort,
            query: String::new(),
            rows: Vec::new(),
            row_tasks: Vec::new(),
            wrap_width: 80,
            max_prompt_lines: max_prompt_lines.max(1),
            page_size: 10,
            current_page: 0,
        }
    }

    /// Replace the tasks, keeping the current page where possible
    pub fn set_tasks(&mut self, mut tasks: Vec<Task>) {
        match self.sort {
            SortOrder::Queue => tasks.sort_by_key(Task::priority_key),
            SortOrder::History => {
                tasks.sort_by_key(|task| (Reverse(task.is_bookmarked()), Reverse(task.priority_key())))
            }
        }
        self.tasks = tasks;
        self.rebuild();
    }

    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.current_page = 0;
            self.rebuild();
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_wrap_width(&mut self, width: usize) {
        let width = width.max(8);
        if self.wrap_width != width {
            self.wrap_width = width;
            self.rebuild();
        }
    }

    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if self.page_size != page_size {
            // Keep the first visible row on screen
            let first = self.page_size * self.current_page;
            self.page_size = page_size;
            self.current_page = first / page_size;
            self.clamp_page();
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Task behind a displayed row
    pub fn task_at(&self, display_index: usize) -> Option<&Task> {
        self.row_tasks
            .get(display_index)
            .and_then(|index| self.tasks.get(*index))
    }

    pub fn display_index(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Rows of the current page with their display index
    pub fn page_rows(&self) -> impl Iterator<Item = (usize, &RowNode)> {
        let range = PageWindow::of(self)
            .map(|window| window.first_row_index..window.last_row_index + 1)
            .unwrap_or(0..0);
        range.filter_map(move |index| self.rows.get(index).map(|row| (index, row)))
    }

    /// Absolute top of the current page, for turning rows into screen lines
    pub fn page_top(&self) -> f64 {
        PageWindow::of(self)
            .and_then(|window| window.row_top(self))
            .unwrap_or(0.0)
    }

    /// Show the page containing a displayed row
    pub fn reveal(&mut self, display_index: usize) {
        self.current_page = display_index / self.page_size;
        self.clamp_page();
    }

    /// Prompt text wrapped to the row width, capped to the row's prompt lines
    pub fn prompt_lines(&self, task: &Task) -> Vec<String> {
        wrap(task.prompt(), self.wrap_width, self.max_prompt_lines as usize)
    }

    fn rebuild(&mut self) {
        let matcher = SkimMatcherV2::default();
        let query = self.query.trim();

        self.rows.clear();
        self.row_tasks.clear();

        let mut top = 0.0;
        for (index, task) in self.tasks.iter().enumerate() {
            if !query.is_empty() && matcher.fuzzy_match(&search_text(task), query).is_none() {
                continue;
            }

            let prompt_lines = wrap(task.prompt(), self.wrap_width, self.max_prompt_lines as usize)
                .len()
                .max(1);
            let height = 1.0 + prompt_lines as f64;
            let order = match self.sort {
                SortOrder::Queue => task.priority_key(),
                SortOrder::History => self.rows.len() as i64,
            };

            self.rows.push(RowNode::new(task.id.clone(), order, top, height));
            self.row_tasks.push(index);
            top += height;
        }

        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        self.current_page = self.current_page.min(self.total_pages() - 1);
    }
}

fn search_text(task: &Task) -> String {
    format!(
        "{} {} {} {}",
        task.display_name(),
        task.id,
        task.prompt(),
        task.checkpoint().unwrap_or("")
    )
}

/// Greedy word wrap on character counts, ellipsizing the last kept line
fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    let truncated = lines.len() > max_lines;
    lines.truncate(max_lines);
    for line in lines.iter_mut() {
        if line.chars().count() > width {
            *line = line.chars().take(width.saturating_sub(1)).collect::<String>() + "…";
        }
    }
    if truncated {
        if let Some(last) = lines.last_mut() {
            let keep = width.saturating_sub(1).min(last.chars().count());
            *last = last.chars().take(keep).collect::<String>() + "…";
        }
    }
    lines
}

impl RowGrid for TaskGrid {
    fn displayed_row_count(&self) -> usize {
        self.rows.len()
    }

    fn displayed_row_at(&self, index: usize) -> Option<&RowNode> {
        self.rows.get(index)
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn current_page(&self) -> usize {
        self.current_page
    }

    fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    fn go_to_previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1);
    }

    fn go_to_next_page(&mut self) {
        if self.current_page + 1 < self.total_pages() {
            self.current_page += 1;
        }
    }

    fn for_each_row_in_display_order(&self, visitor: &mut dyn FnMut(usize, &RowNode)) {
        for (index, row) in self.rows.iter().enumerate() {
            visitor(index, row);
        }
    }

    fn for_each_row_in_full_order(&self, visitor: &mut dyn FnMut(&str, i64)) {
        for (index, task) in self.tasks.iter().enumerate() {
            let order = match self.sort {
                SortOrder::Queue => task.priority_key(),
                SortOrder::History => index as i64,
            };
            visitor(&task.id, order);
        }
    }
}
