use crate::app::{project, App, Mode, Screen, Session};
use crate::board::BoardProjection;
use crate::components::*;
use crate::filter_dialog::FilterDialog;
use crate::gate::CredentialGate;
use crate::keybindings::{BindingScope, KeybindingRegistry};
use crate::prompt::Prompt;
use crate::router::RouteError;
use crate::theme::*;
use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use todoboard_domain::{KanbanColumn, Task};

/// Marker shown on cards that link out to the task service.
pub const OPEN_LINK_MARKER: &str = "↗";

pub fn render(app: &mut App, frame: &mut Frame) {
    let today = app.today();
    let scope = app.binding_scope();
    let (screen, banner) = app.parts_mut();

    match screen {
        Screen::Gate(gate) => render_gate(gate, frame),
        Screen::Board(session) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(frame.area());

            render_page(session, frame, chunks[0], today);
            render_footer(session, scope, frame, chunks[1]);

            match &session.mode {
                Mode::Normal => {}
                Mode::Prompt(prompt) => render_prompt(prompt, frame),
                Mode::Filter(dialog) => render_filter_popup(session, dialog, frame),
                Mode::Help => render_help_popup(session.view_scope(), frame),
            }
        }
    }

    if let Some(banner) = banner {
        let area = frame.area();
        banner.render(frame, area);
    }
}

fn render_gate(gate: &CredentialGate, frame: &mut Frame) {
    let hint = match gate.error() {
        Some(error) => (error, error_text()),
        None => ("Enter to save, Esc to quit", label_text()),
    };
    render_input_popup(
        frame,
        "Todoist API Key",
        "Paste your Todoist API token:",
        gate.input().as_str(),
        gate.input().cursor_column(),
        Some(hint),
    );
}

fn render_page(session: &mut Session, frame: &mut Frame, area: Rect, today: NaiveDate) {
    if let Some(error) = session.route_error() {
        render_error_view(&error, frame, area);
        return;
    }

    let tasks = session.query.tasks_state();
    if tasks.is_initial_load() {
        let loading = Paragraph::new("Loading...")
            .style(label_text())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, area);
        return;
    }
    if let Some(message) = tasks.error() {
        let lines = vec![
            Line::from(Span::styled("Error", error_text())),
            Line::from(""),
            Line::from(Span::styled(message.to_string(), normal_text())),
            Line::from(""),
            Line::from(Span::styled("Press r to retry", label_text())),
        ];
        let widget = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(widget, area);
        return;
    }

    if session.router.current().is_kanban() {
        render_kanban(session, frame, area, today);
    } else {
        render_task_list(session, frame, area, today);
    }
}

fn render_kanban(session: &mut Session, frame: &mut Frame, area: Rect, today: NaiveDate) {
    let projection = project(&session.query, &session.view, &session.filters, today);

    let title = match session.view.parent_id().and_then(|id| session.query.task(id)) {
        Some(parent) => format!(" {} ", parent.content),
        None => " Tasks ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focused_border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    let column_constraints =
        [Constraint::Ratio(1, KanbanColumn::COUNT as u32); KanbanColumn::COUNT];
    let header_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(column_constraints)
        .split(rows[0]);
    let body_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(column_constraints)
        .split(rows[1]);

    for column in KanbanColumn::ALL {
        let count = projection.columns[column.index()].len();
        let header = Paragraph::new(format!("{} ({})", column.title(), count))
            .style(column_header(column))
            .alignment(Alignment::Center);
        frame.render_widget(header, header_areas[column.index()]);
    }

    session.view.registry_mut().layout(&projection.columns);
    session.view.set_viewport(rows[1].height as usize);
    session.view.registry_mut().clear_hits();

    let offset = session.view.scroll().offset();
    let selected = session.view.selected_task_id().map(str::to_string);
    for column in KanbanColumn::ALL {
        let column_area = body_areas[column.index()];
        for task in &projection.columns[column.index()] {
            let Some(span) = session.view.registry().span(&task.id) else {
                continue;
            };
            // Cards cut off by the viewport edge are not drawn.
            if !session.view.scroll().is_visible(span) {
                continue;
            }
            let card_area = Rect {
                x: column_area.x,
                y: column_area.y + (span.top - offset) as u16,
                width: column_area.width,
                height: span.height as u16,
            };
            let is_selected = selected.as_deref() == Some(task.id.as_str());
            render_card(task, &projection, is_selected, today, frame, card_area);
            session
                .view
                .registry_mut()
                .record_hit(card_area, task.id.clone());
        }
    }
}

fn render_card(
    task: &Task,
    projection: &BoardProjection<'_>,
    selected: bool,
    today: NaiveDate,
    frame: &mut Frame,
    area: Rect,
) {
    let border = if selected {
        focused_border()
    } else {
        unfocused_border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(selected_item(selected));

    let content_style = if projection.has_subtasks(&task.id) {
        link_text()
    } else {
        normal_text()
    };
    let mut title = vec![Span::styled(task.content.clone(), content_style)];
    if !task.url.is_empty() {
        title.push(Span::styled(format!(" {OPEN_LINK_MARKER}"), highlight_text()));
    }

    let project = projection.project_name(&task.project_id).unwrap_or("");
    let mut lines = vec![
        Line::from(title),
        Line::from(Span::styled(project.to_string(), label_text())),
    ];
    if let Some(due) = &task.due {
        lines.push(Line::from(Span::styled(
            due.string.clone(),
            due_style(due.date, today),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_task_list(session: &mut Session, frame: &mut Frame, area: Rect, today: NaiveDate) {
    let projection = project(&session.query, &session.view, &session.filters, today);

    let block = Block::default()
        .title(format!(" Task List ({}) ", projection.visible.len()))
        .borders(Borders::ALL)
        .border_style(focused_border());

    // Border and header row.
    let body_rows = area.height.saturating_sub(3) as usize;
    session
        .list_scroll
        .set_viewport(body_rows, projection.visible.len());
    let offset = session.list_scroll.offset();

    let rows: Vec<Row> = projection
        .visible
        .iter()
        .skip(offset)
        .take(session.list_scroll.viewport())
        .map(|task| {
            let due = task
                .due
                .as_ref()
                .map(|due| Span::styled(due.string.clone(), due_style(due.date, today)))
                .unwrap_or_else(|| Span::raw(""));
            // Parents link into their subtask board.
            let content_style = if projection.has_subtasks(&task.id) {
                link_text()
            } else {
                normal_text()
            };
            let selected = session.list_selected.as_deref() == Some(task.id.as_str());
            Row::new(vec![
                Cell::from(task.content.clone()).style(content_style),
                Cell::from(
                    projection
                        .project_name(&task.project_id)
                        .unwrap_or("")
                        .to_string(),
                )
                .style(label_text()),
                Cell::from(due),
            ])
            .style(selected_item(selected))
        })
        .collect();

    let header = Row::new(vec!["Content", "Project", "Due"]).style(bold_highlight());
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn render_error_view(error: &RouteError, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Oops!", error_text())),
        Line::from(""),
        Line::from(Span::styled(
            "Sorry, an unexpected error has occurred.",
            normal_text(),
        )),
        Line::from(Span::styled(
            error.to_string(),
            label_text().add_modifier(Modifier::ITALIC),
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_footer(session: &Session, scope: BindingScope, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(session.router.current().path(), bold_highlight())];

    if let Some(query) = session.view.search().query() {
        let status = match session.view.search().match_index() {
            Some(index) => format!("  /{} [{}]", query.as_str(), index + 1),
            None => format!("  /{}", query.as_str()),
        };
        spans.push(Span::styled(status, highlight_text()));
    }
    if session.filters.is_active() {
        let projects = if session.filters.projects.is_all() {
            "all projects".to_string()
        } else {
            format!("{} projects", session.filters.projects.len())
        };
        spans.push(Span::styled(
            format!("  [{} · {}]", session.filters.due.label(), projects),
            highlight_text(),
        ));
    }
    if session.query.is_fetching() {
        spans.push(Span::styled("  syncing…", label_text()));
    }
    if let Some(pending) = session.pending_chord() {
        spans.push(Span::styled(format!("  {pending}-"), highlight_text()));
    }

    let provider = KeybindingRegistry::get_provider(scope);
    let context = provider.get_context();
    let hints = context
        .footer_hints()
        .iter()
        .map(|(key, hint)| format!("{key}: {hint}"))
        .collect::<Vec<_>>()
        .join(" | ");
    spans.push(Span::styled(format!("  {hints}"), label_text()));

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_prompt(prompt: &Prompt, frame: &mut Frame) {
    let kind = prompt.kind();
    render_input_popup(
        frame,
        kind.title(),
        kind.label(),
        prompt.input().as_str(),
        prompt.input().cursor_column(),
        Some(("Enter to confirm, Esc to cancel", label_text())),
    );
}

fn render_filter_popup(session: &Session, dialog: &FilterDialog, frame: &mut Frame) {
    let inner = render_popup_with_block(frame, "Filters", 50, 60);

    let row_style = |row: usize| {
        if row == dialog.cursor() {
            selected_item(true)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("Due: ", label_text()),
        Span::styled(session.filters.due.label(), bold_highlight()),
    ])
    .style(row_style(0))];
    lines.push(Line::from(""));

    let all = session.filters.projects.is_all();
    for (index, project) in session.query.projects().iter().enumerate() {
        let mark = if session.filters.projects.contains(&project.id) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(
            Line::from(vec![
                Span::styled(format!("{mark} "), highlight_text()),
                Span::styled(project.name.clone(), normal_text()),
            ])
            .style(row_style(index + 1)),
        );
    }
    if all {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No project selected: showing all",
            label_text(),
        )));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0)])
        .split(inner);
    frame.render_widget(Paragraph::new(lines), chunks[0]);
}

fn render_help_popup(scope: BindingScope, frame: &mut Frame) {
    let inner = render_popup_with_block(frame, "Help - Keybindings for Current Context", 80, 80);
    let context = KeybindingRegistry::get_provider(scope).get_context();

    let mut lines = vec![
        Line::from(Span::styled(
            context.name.clone(),
            bold_highlight().fg(crate::theme::colors::FOCUSED_BORDER),
        )),
        Line::from(""),
    ];
    for binding in &context.bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", binding.key), highlight_text()),
            Span::raw(" "),
            Span::styled(binding.description.clone(), normal_text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press ESC or ? to close help",
        label_text(),
    )));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0)])
        .split(inner);
    frame.render_widget(Paragraph::new(lines), chunks[0]);
}
