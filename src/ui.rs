use std::error::Error;
use std::io;
use std::path::Path;
use std::time::{Duration as StdDuration, Instant};

use chrono::Local;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use crossterm::{ExecutableCommand, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::{error, info};

use crate::domain::{Activity, format_date, format_hours, parse_hours};
use crate::editing::{EditMode, EditOutcome, HoursDirection, RowEditor};
use crate::planner::{Answer, RESET_PROMPT, WeekPlanner};
use crate::stats::{ProgressTier, WeekSummary, activity_progress};
use crate::storage::save_planner;

const FOCUSED_PANEL_BORDER_COLOR: Color = Color::Yellow;
const INACTIVE_PANEL_BORDER_COLOR: Color = Color::DarkGray;
const HIGHLIGHT_BACKGROUND_COLOR: Color = Color::Rgb(42, 45, 52);
const ORANGE: Color = Color::Indexed(208);
const BAR_WIDTH: usize = 20;
const SOLE_WEEK_NOTICE: &str = "You cannot delete the only week. At least one week must remain.";

pub fn run_dashboard(planner: &mut WeekPlanner, planner_path: &Path) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let result = run_event_loop(&mut terminal, planner, planner_path);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	result
}

fn run_event_loop(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	planner: &mut WeekPlanner,
	planner_path: &Path,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::default();
	info!(path = %planner_path.display(), "dashboard opened");

	loop {
		if planner.poll_autosave(Instant::now()) {
			app.status = persist_message(planner_path, planner, "Saved");
		}

		app.clamp_selection(planner);
		terminal.draw(|frame| draw_dashboard(frame, &app, planner))?;

		if event::poll(StdDuration::from_millis(250))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				let should_quit = handle_key(&mut app, key.code, planner, planner_path);
				if should_quit {
					break;
				}
			}
		}
	}

	planner.save();
	persist(planner_path, planner)?;
	info!("dashboard closed");
	Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, planner: &mut WeekPlanner, planner_path: &Path) -> bool {
	match &app.mode {
		InputMode::Notice(_) => {
			app.mode = InputMode::Normal;
			false
		}
		InputMode::Prompt(_) => handle_prompt_key(app, code, planner),
		InputMode::Select(_) => handle_select_key(app, code, planner, planner_path),
		InputMode::Normal if app.editor.is_open() => handle_editor_key(app, code, planner),
		InputMode::Normal => handle_normal_key(app, code, planner, planner_path),
	}
}

fn draw_dashboard(frame: &mut Frame, app: &App, planner: &WeekPlanner) {
	let summary = planner.summary();
	let warning_height = if summary.is_over_allocated() { 3 } else { 0 };

	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Length(4),
			Constraint::Min(10),
			Constraint::Length(warning_height),
			Constraint::Length(5),
		])
		.split(frame.area());

	let body = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
		.split(layout[1]);

	let right = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(6), Constraint::Min(5)])
		.split(body[1]);

	render_week_header(frame, layout[0], planner);
	render_activities_panel(frame, body[0], app, planner);
	render_summary_panel(frame, right[0], &summary);
	render_history_panel(frame, right[1], app, planner);
	if summary.is_over_allocated() {
		render_warning(frame, layout[2], &summary);
	}
	render_footer(frame, layout[3], app);

	match &app.mode {
		InputMode::Select(select) => render_select_popup(frame, select),
		InputMode::Notice(message) => render_notice_popup(frame, message),
		InputMode::Normal | InputMode::Prompt(_) => {}
	}
}

fn render_week_header(frame: &mut Frame, area: Rect, planner: &WeekPlanner) {
	let week = planner.current_week();
	let arrow_style = |enabled: bool| {
		if enabled {
			Style::default().add_modifier(Modifier::BOLD)
		} else {
			Style::default().fg(Color::DarkGray)
		}
	};

	let mut title = vec![
		Span::styled("< ", arrow_style(planner.can_go_previous())),
		Span::styled(
			format!("Week {} of {}", planner.cursor() + 1, planner.weeks().len()),
			Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
		),
		Span::styled(" >", arrow_style(true)),
		Span::raw(format!("  {}  {}", week.date_range_label(), week.id)),
	];
	let (week_start, week_end) = week.local_bounds();
	let now = Local::now();
	if week_start <= now && now <= week_end {
		title.push(Span::styled("  (this week)", Style::default().fg(Color::Cyan)));
	}
	if week.is_completed() {
		title.push(Span::styled(
			"  ✓ Completed",
			Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
		));
	}

	let save_state = if planner.autosave_pending() {
		Span::styled(
			format!("unsaved changes, auto-save after {} ms", planner.autosave_delay().as_millis()),
			Style::default().fg(Color::Yellow),
		)
	} else {
		Span::styled("all changes saved", Style::default().fg(Color::DarkGray))
	};

	let header = Paragraph::new(vec![Line::from(title), Line::from(save_state)])
		.block(Block::default().borders(Borders::ALL).title("Weekly Planner"));
	frame.render_widget(header, area);
}

fn render_activities_panel(frame: &mut Frame, area: Rect, app: &App, planner: &WeekPlanner) {
	let activities = planner.live_activities();
	let name_width = activities
		.iter()
		.map(|activity| activity.name.chars().count())
		.max()
		.unwrap_or(0)
		.clamp(8, 24);

	let mut items = activities
		.iter()
		.map(|activity| {
			ListItem::new(render_activity_line(
				activity,
				app.editor.mode_for(activity.id),
				name_width,
			))
		})
		.collect::<Vec<_>>();
	if items.is_empty() {
		items.push(ListItem::new("(no activities yet, press 'a' to add one)"));
	}

	let mut state = ListState::default();
	if !activities.is_empty() {
		state.select(Some(app.activity_index.min(activities.len() - 1)));
	}

	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(format!("Activities ({})", activities.len()))
				.border_style(border_style(app.focus == FocusPane::Activities)),
		)
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_activity_line(activity: &Activity, mode: &EditMode, name_width: usize) -> Line<'static> {
	let percent = activity_progress(activity);
	let tier = ProgressTier::for_percent(percent);
	let name: String = activity.name.chars().take(name_width).collect();

	let mut spans = vec![
		Span::raw(format!("{name:<name_width$} ")),
		Span::styled(progress_bar(percent, BAR_WIDTH), Style::default().fg(tier_color(tier))),
		Span::raw(format!(
			" {:>3.0}% {}/{}h",
			percent,
			format_hours(activity.completed_hours),
			format_hours(activity.target_hours)
		)),
	];

	let editor = match mode {
		EditMode::NotEditing => None,
		EditMode::EditingTarget(text) => Some(format!("target: {text}_")),
		EditMode::EditingProgress(text) => Some(format!("completed: {text}_")),
		EditMode::AddingHours(text) => Some(format!("+/- hours: {text}_")),
	};
	if let Some(editor) = editor {
		spans.push(Span::styled(
			format!("  [{editor}]"),
			Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
		));
	}

	Line::from(spans)
}

fn render_summary_panel(frame: &mut Frame, area: Rect, summary: &WeekSummary) {
	let remaining_style = if summary.remaining >= 0.0 {
		Style::default().fg(Color::Green)
	} else {
		Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
	};

	let lines = vec![
		Line::from(vec![
			Span::raw("Planned    "),
			Span::styled(format!("{}h", format_hours(summary.planned)), Style::default().fg(Color::LightBlue)),
		]),
		Line::from(vec![
			Span::raw("Completed  "),
			Span::styled(format!("{}h", format_hours(summary.completed)), Style::default().fg(Color::Green)),
		]),
		Line::from(vec![
			Span::raw("Progress   "),
			Span::styled(format!("{:.1}%", summary.percent), Style::default().fg(tier_color(summary.tier()))),
		]),
		Line::from(vec![
			Span::raw("Available  "),
			Span::styled(format!("{}h", format_hours(summary.remaining)), remaining_style),
		]),
	];

	let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("This Week"));
	frame.render_widget(panel, area);
}

fn render_history_panel(frame: &mut Frame, area: Rect, app: &App, planner: &WeekPlanner) {
	let items = planner
		.history()
		.into_iter()
		.map(|row| {
			let marker = if row.index == planner.cursor() { "*" } else { " " };
			let done = if row.completed { " ✓" } else { "" };
			ListItem::new(Line::from(vec![
				Span::raw(format!("{marker}Week {:<3} {} ", row.index + 1, format_date(row.start_date))),
				Span::styled(
					progress_bar(row.percent, BAR_WIDTH / 2),
					Style::default().fg(tier_color(row.tier)),
				),
				Span::raw(format!(" {:>3.0}%{done}", row.percent)),
			]))
		})
		.collect::<Vec<_>>();

	let mut state = ListState::default();
	state.select(Some(app.history_index.min(planner.weeks().len().saturating_sub(1))));

	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title("Week History")
				.border_style(border_style(app.focus == FocusPane::History)),
		)
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_warning(frame: &mut Frame, area: Rect, summary: &WeekSummary) {
	let warning = Paragraph::new(Line::from(Span::styled(
		format!(
			"Warning: you planned {}h more than the 168 hours a week holds.",
			format_hours(summary.remaining.abs())
		),
		Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
	)))
	.block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
	frame.render_widget(warning, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
	let footer_lines = match &app.mode {
		InputMode::Normal if app.editor.is_open() => vec![
			Line::from("type hours (digits and '.') | Backspace delete"),
			Line::from("Enter/+ apply (add while adding hours) | - subtract | Esc cancel"),
			Line::from(app.status.clone()),
		],
		InputMode::Normal | InputMode::Notice(_) => vec![
			Line::from("Tab pane | j/k move | h/l previous/next week | Enter open week (history) | q quit"),
			Line::from(
				"a add | x remove | t target | p completed | + log hours | s save | r reset | n new week | d delete week",
			),
			Line::from(app.status.clone()),
		],
		InputMode::Prompt(prompt) => vec![
			Line::from(prompt.title.clone()),
			Line::from(format!("> {}", prompt.input)),
			Line::from(format!("Enter submit | Esc cancel | {}", app.status)),
		],
		InputMode::Select(select) => vec![
			Line::from(select.title.clone()),
			Line::from(format!(
				"Selected: {}",
				select
					.selected_option()
					.map(|option| option.label.as_str())
					.unwrap_or("(none)")
			)),
			Line::from("j/k or arrows move | Enter choose | Esc cancel"),
		],
	};

	let footer = Paragraph::new(footer_lines).block(Block::default().borders(Borders::ALL).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn render_select_popup(frame: &mut Frame, select: &SelectState) {
	let area = centered_rect(50, 30, frame.area());
	frame.render_widget(Clear, area);

	let items = select
		.options
		.iter()
		.map(|option| ListItem::new(option.label.clone()).style(option.style))
		.collect::<Vec<_>>();

	let list = List::new(items)
		.block(Block::default().borders(Borders::ALL).title(select.title.clone()))
		.highlight_symbol(">> ")
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR));

	let mut state = ListState::default();
	if !select.options.is_empty() {
		state.select(Some(select.selected.min(select.options.len() - 1)));
	}
	frame.render_stateful_widget(list, area, &mut state);
}

fn render_notice_popup(frame: &mut Frame, message: &str) {
	let area = centered_rect(50, 25, frame.area());
	frame.render_widget(Clear, area);
	let notice = Paragraph::new(vec![
		Line::from(message.to_string()),
		Line::from(""),
		Line::from(Span::styled("press any key", Style::default().fg(Color::DarkGray))),
	])
	.wrap(Wrap { trim: true })
	.block(Block::default().borders(Borders::ALL).title("Notice"));
	frame.render_widget(notice, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let popup_layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(popup_layout[1])[1]
}

fn handle_normal_key(app: &mut App, code: KeyCode, planner: &mut WeekPlanner, planner_path: &Path) -> bool {
	match code {
		KeyCode::Char('q') | KeyCode::Esc => true,
		KeyCode::Tab | KeyCode::BackTab => {
			app.focus = app.focus.toggle();
			if app.focus == FocusPane::History {
				app.history_index = planner.cursor();
			}
			false
		}
		KeyCode::Up | KeyCode::Char('k') => {
			app.move_selection(-1, planner);
			false
		}
		KeyCode::Down | KeyCode::Char('j') => {
			app.move_selection(1, planner);
			false
		}
		KeyCode::Left | KeyCode::Char('h') => {
			app.status = if planner.go_to_previous() {
				persist_message(planner_path, planner, "Previous week")
			} else {
				"Already at the first week".to_string()
			};
			app.after_week_change(planner);
			false
		}
		KeyCode::Right | KeyCode::Char('l') => {
			let label = if planner.go_to_next() {
				"Created a new week from this week's activities"
			} else {
				"Next week"
			};
			app.status = persist_message(planner_path, planner, label);
			app.after_week_change(planner);
			false
		}
		KeyCode::Enter => {
			if app.focus == FocusPane::History {
				app.status = match planner.select_week(app.history_index) {
					Ok(()) => persist_message(planner_path, planner, "Opened week"),
					Err(err) => format!("error: {err}"),
				};
				app.after_week_change(planner);
			}
			false
		}
		KeyCode::Char('n') => {
			planner.create_new_week();
			app.status = persist_message(planner_path, planner, "Created a new week");
			app.after_week_change(planner);
			false
		}
		KeyCode::Char('s') => {
			planner.save();
			app.status = persist_message(planner_path, planner, "Saved");
			false
		}
		KeyCode::Char('a') => {
			app.mode = InputMode::Prompt(PromptState::new("Activity name", PromptKind::AddActivityName));
			false
		}
		KeyCode::Char('x') => {
			match app.selected_activity_id(planner) {
				Some(id) => {
					let name = planner.activity(id).map(|activity| activity.name.clone()).unwrap_or_default();
					planner.remove_activity(id);
					app.status = format!("Removed {name}");
				}
				None => app.status = "Select an activity first".to_string(),
			}
			false
		}
		KeyCode::Char('t') | KeyCode::Char('p') | KeyCode::Char('+') => {
			let Some(id) = app.selected_activity_id(planner) else {
				app.status = "Select an activity first".to_string();
				return false;
			};
			match code {
				KeyCode::Char('t') => app.editor.begin_target(planner, id),
				KeyCode::Char('p') => app.editor.begin_progress(planner, id),
				_ => app.editor.begin_adding_hours(planner, id),
			};
			false
		}
		KeyCode::Char('r') => {
			app.mode = InputMode::Select(build_confirm_select(RESET_PROMPT, SelectKind::ResetConfirm, "Reset"));
			false
		}
		KeyCode::Char('d') => {
			let index = if app.focus == FocusPane::History {
				app.history_index
			} else {
				planner.cursor()
			};
			match planner.delete_prompt(index) {
				Ok(prompt) => {
					app.mode = InputMode::Select(build_confirm_select(
						prompt,
						SelectKind::DeleteWeekConfirm { index },
						"Delete",
					));
				}
				Err(_) if !planner.can_delete() => app.mode = InputMode::Notice(SOLE_WEEK_NOTICE.to_string()),
				Err(err) => app.status = format!("error: {err}"),
			}
			false
		}
		_ => false,
	}
}

fn handle_editor_key(app: &mut App, code: KeyCode, planner: &mut WeekPlanner) -> bool {
	let adding = app
		.selected_activity_id(planner)
		.map(|id| matches!(app.editor.mode_for(id), EditMode::AddingHours(_)))
		.unwrap_or(false);

	let outcome = match code {
		KeyCode::Esc => {
			app.editor.cancel();
			app.status = "Edit cancelled".to_string();
			return false;
		}
		KeyCode::Backspace => {
			app.editor.pop();
			return false;
		}
		KeyCode::Enter | KeyCode::Char('+') => app.editor.commit(planner, HoursDirection::Add),
		KeyCode::Char('-') if adding => app.editor.commit(planner, HoursDirection::Subtract),
		KeyCode::Char(value) => {
			app.editor.push(value);
			return false;
		}
		_ => return false,
	};

	app.status = match outcome {
		EditOutcome::Applied(message) => message,
		EditOutcome::Rejected(message) => format!("Not applied: {message}"),
		EditOutcome::Idle => String::new(),
	};
	false
}

fn handle_prompt_key(app: &mut App, code: KeyCode, planner: &mut WeekPlanner) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Input cancelled".to_string();
		}
		KeyCode::Backspace => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.pop();
			}
		}
		KeyCode::Char(value) => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.push(value);
			}
		}
		KeyCode::Enter => {
			let prompt = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Prompt(prompt) => prompt,
				other => {
					app.mode = other;
					return false;
				}
			};

			match submit_prompt(prompt.clone(), planner) {
				Ok(PromptOutcome::NextPrompt(next_prompt)) => app.mode = InputMode::Prompt(next_prompt),
				Ok(PromptOutcome::Done(message)) => {
					app.mode = InputMode::Normal;
					app.activity_index = planner.live_activities().len().saturating_sub(1);
					app.status = message;
				}
				Err(err) => {
					app.mode = InputMode::Prompt(prompt);
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}

	false
}

fn handle_select_key(app: &mut App, code: KeyCode, planner: &mut WeekPlanner, planner_path: &Path) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Cancelled".to_string();
		}
		KeyCode::Up | KeyCode::Char('k') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(-1);
			}
		}
		KeyCode::Down | KeyCode::Char('j') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(1);
			}
		}
		KeyCode::Enter => {
			let select = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Select(select) => select,
				other => {
					app.mode = other;
					return false;
				}
			};
			let answer = select.answer();

			app.status = match select.kind {
				SelectKind::ResetConfirm => {
					if planner.reset_current_week(answer) {
						"Week progress reset".to_string()
					} else {
						"Reset cancelled".to_string()
					}
				}
				SelectKind::DeleteWeekConfirm { index } => {
					if answer == Answer::No {
						"Delete cancelled".to_string()
					} else {
						match planner.delete_week(index) {
							Ok(()) => persist_message(planner_path, planner, &format!("Deleted week {}", index + 1)),
							Err(err) => format!("error: {err}"),
						}
					}
				}
			};
			app.after_week_change(planner);
		}
		_ => {}
	}

	false
}

fn submit_prompt(prompt: PromptState, planner: &mut WeekPlanner) -> Result<PromptOutcome, String> {
	match prompt.kind {
		PromptKind::AddActivityName => {
			let name = required_text(&prompt.input, "activity name")?;
			Ok(PromptOutcome::NextPrompt(PromptState::new(
				format!("Weekly target hours for {name}"),
				PromptKind::AddActivityTarget { name },
			)))
		}
		PromptKind::AddActivityTarget { name } => {
			let hours = parse_hours(&prompt.input)
				.filter(|hours| *hours >= 0.0)
				.ok_or_else(|| "target must be a non-negative number".to_string())?;
			planner
				.add_activity(&name, hours)
				.map(|id| PromptOutcome::Done(format!("Added {name} (#{id}, {}h)", format_hours(hours))))
				.ok_or_else(|| "activity was not accepted".to_string())
		}
	}
}

fn build_confirm_select(title: impl Into<String>, kind: SelectKind, confirm_label: &str) -> SelectState {
	let options = vec![
		SelectOption::new(
			confirm_label,
			Answer::Yes,
			Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
		),
		SelectOption::new("Cancel", Answer::No, Style::default()),
	];

	let mut select = SelectState::new(title, kind, options);
	select.selected = 1;
	select
}

fn persist(path: &Path, planner: &WeekPlanner) -> Result<(), String> {
	save_planner(path, planner).map_err(|err| {
		error!(%err, "failed to write planner file");
		err.to_string()
	})
}

fn persist_message(path: &Path, planner: &WeekPlanner, done: &str) -> String {
	match persist(path, planner) {
		Ok(()) => done.to_string(),
		Err(err) => format!("{done} (warning: not written to disk: {err})"),
	}
}

fn required_text(input: &str, field_name: &str) -> Result<String, String> {
	let value = input.trim();
	if value.is_empty() {
		Err(format!("{field_name} is required"))
	} else {
		Ok(value.to_string())
	}
}

fn progress_bar(percent: f64, width: usize) -> String {
	let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
	format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn tier_color(tier: ProgressTier) -> Color {
	match tier {
		ProgressTier::Complete => Color::Green,
		ProgressTier::High => Color::Blue,
		ProgressTier::Medium => Color::Yellow,
		ProgressTier::Low => ORANGE,
		ProgressTier::Minimal => Color::Red,
	}
}

fn border_style(focused: bool) -> Style {
	if focused {
		Style::default()
			.fg(FOCUSED_PANEL_BORDER_COLOR)
			.add_modifier(Modifier::BOLD)
	} else {
		Style::default().fg(INACTIVE_PANEL_BORDER_COLOR)
	}
}

#[derive(Debug, Clone)]
enum PromptOutcome {
	NextPrompt(PromptState),
	Done(String),
}

#[derive(Debug, Clone)]
struct PromptState {
	title: String,
	input: String,
	kind: PromptKind,
}

impl PromptState {
	fn new(title: impl Into<String>, kind: PromptKind) -> Self {
		Self {
			title: title.into(),
			input: String::new(),
			kind,
		}
	}
}

#[derive(Debug, Clone)]
enum PromptKind {
	AddActivityName,
	AddActivityTarget { name: String },
}

#[derive(Debug, Clone)]
struct SelectState {
	title: String,
	options: Vec<SelectOption>,
	selected: usize,
	kind: SelectKind,
}

impl SelectState {
	fn new(title: impl Into<String>, kind: SelectKind, options: Vec<SelectOption>) -> Self {
		Self {
			title: title.into(),
			options,
			selected: 0,
			kind,
		}
	}

	fn move_selection(&mut self, delta: i32) {
		if self.options.is_empty() {
			self.selected = 0;
			return;
		}

		if delta > 0 {
			self.selected = (self.selected + delta as usize).min(self.options.len() - 1);
		} else {
			self.selected = self.selected.saturating_sub(delta.unsigned_abs() as usize);
		}
	}

	fn selected_option(&self) -> Option<&SelectOption> {
		self.options.get(self.selected)
	}

	fn answer(&self) -> Answer {
		self.selected_option().map(|option| option.value).unwrap_or(Answer::No)
	}
}

#[derive(Debug, Clone)]
struct SelectOption {
	label: String,
	value: Answer,
	style: Style,
}

impl SelectOption {
	fn new(label: impl Into<String>, value: Answer, style: Style) -> Self {
		Self {
			label: label.into(),
			value,
			style,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectKind {
	ResetConfirm,
	DeleteWeekConfirm { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusPane {
	Activities,
	History,
}

impl FocusPane {
	fn toggle(self) -> Self {
		match self {
			FocusPane::Activities => FocusPane::History,
			FocusPane::History => FocusPane::Activities,
		}
	}
}

#[derive(Debug, Clone)]
enum InputMode {
	Normal,
	Prompt(PromptState),
	Select(SelectState),
	Notice(String),
}

#[derive(Debug, Clone)]
struct App {
	focus: FocusPane,
	activity_index: usize,
	history_index: usize,
	editor: RowEditor,
	mode: InputMode,
	status: String,
}

impl Default for App {
	fn default() -> Self {
		Self {
			focus: FocusPane::Activities,
			activity_index: 0,
			history_index: 0,
			editor: RowEditor::default(),
			mode: InputMode::Normal,
			status: "Ready".to_string(),
		}
	}
}

impl App {
	fn clamp_selection(&mut self, planner: &WeekPlanner) {
		self.activity_index = self
			.activity_index
			.min(planner.live_activities().len().saturating_sub(1));
		self.history_index = self.history_index.min(planner.weeks().len().saturating_sub(1));
	}

	fn move_selection(&mut self, delta: i32, planner: &WeekPlanner) {
		let (index, len) = match self.focus {
			FocusPane::Activities => (&mut self.activity_index, planner.live_activities().len()),
			FocusPane::History => (&mut self.history_index, planner.weeks().len()),
		};
		if len == 0 {
			*index = 0;
			return;
		}

		if delta > 0 {
			*index = (*index + delta as usize).min(len - 1);
		} else {
			*index = index.saturating_sub(delta.unsigned_abs() as usize);
		}
	}

	fn selected_activity_id(&self, planner: &WeekPlanner) -> Option<u32> {
		planner
			.live_activities()
			.get(self.activity_index)
			.map(|activity| activity.id)
	}

	fn after_week_change(&mut self, planner: &WeekPlanner) {
		self.editor.cancel();
		self.activity_index = 0;
		if self.focus == FocusPane::Activities {
			self.history_index = planner.cursor();
		}
		self.clamp_selection(planner);
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;
	use std::time::Duration;

	use chrono::NaiveDate;
	use crossterm::event::KeyCode;

	use super::{App, InputMode, handle_key, progress_bar, tier_color};
	use crate::domain::TemplateEntry;
	use crate::planner::WeekPlanner;
	use crate::stats::ProgressTier;

	fn planner() -> WeekPlanner {
		WeekPlanner::new(
			NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
			&[TemplateEntry::new("Read", 4.0)],
			Duration::from_millis(1000),
		)
	}

	fn temp_file(name: &str) -> PathBuf {
		std::env::temp_dir().join(format!("{}_{}", name, std::process::id()))
	}

	fn press(app: &mut App, planner: &mut WeekPlanner, path: &PathBuf, keys: &[KeyCode]) {
		for key in keys {
			handle_key(app, *key, planner, path);
		}
	}

	#[test]
	fn deleting_the_only_week_shows_a_notice() {
		let mut planner = planner();
		let mut app = App::default();
		let path = temp_file("weekplan_ui_sole.weekplan");

		press(&mut app, &mut planner, &path, &[KeyCode::Char('d')]);
		assert!(matches!(app.mode, InputMode::Notice(_)));
		press(&mut app, &mut planner, &path, &[KeyCode::Char('z')]);
		assert!(matches!(app.mode, InputMode::Normal));
		assert_eq!(planner.weeks().len(), 1);
	}

	#[test]
	fn delete_confirmation_defaults_to_cancel() {
		let mut planner = planner();
		let mut app = App::default();
		let path = temp_file("weekplan_ui_delete.weekplan");

		press(&mut app, &mut planner, &path, &[KeyCode::Char('l'), KeyCode::Char('d'), KeyCode::Enter]);
		assert_eq!(planner.weeks().len(), 2);

		press(&mut app, &mut planner, &path, &[KeyCode::Char('d'), KeyCode::Up, KeyCode::Enter]);
		let _ = std::fs::remove_file(&path);
		assert_eq!(planner.weeks().len(), 1);
		assert_eq!(planner.cursor(), 0);
	}

	#[test]
	fn adding_an_activity_through_prompts() {
		let mut planner = planner();
		let mut app = App::default();
		let path = temp_file("weekplan_ui_add.weekplan");

		let mut keys = vec![KeyCode::Char('a')];
		keys.extend("Gym".chars().map(KeyCode::Char));
		keys.push(KeyCode::Enter);
		keys.extend("2.5".chars().map(KeyCode::Char));
		keys.push(KeyCode::Enter);
		press(&mut app, &mut planner, &path, &keys);

		assert!(matches!(app.mode, InputMode::Normal));
		let added = planner.activity(2).expect("activity added");
		assert_eq!(added.name, "Gym");
		assert_eq!(added.target_hours, 2.5);
		assert_eq!(app.activity_index, 1);
	}

	#[test]
	fn logging_hours_through_the_row_editor() {
		let mut planner = planner();
		let mut app = App::default();
		let path = temp_file("weekplan_ui_log.weekplan");

		press(
			&mut app,
			&mut planner,
			&path,
			&[KeyCode::Char('+'), KeyCode::Char('3'), KeyCode::Enter],
		);
		assert_eq!(planner.activity(1).unwrap().completed_hours, 3.0);

		press(
			&mut app,
			&mut planner,
			&path,
			&[KeyCode::Char('+'), KeyCode::Char('1'), KeyCode::Char('-')],
		);
		assert_eq!(planner.activity(1).unwrap().completed_hours, 2.0);
		assert!(!app.editor.is_open());
	}

	#[test]
	fn reset_requires_confirmation() {
		let mut planner = planner();
		let mut app = App::default();
		let path = temp_file("weekplan_ui_reset.weekplan");
		planner.add_completed_hours(1, 2.0);

		press(&mut app, &mut planner, &path, &[KeyCode::Char('r'), KeyCode::Esc]);
		assert_eq!(planner.activity(1).unwrap().completed_hours, 2.0);

		press(&mut app, &mut planner, &path, &[KeyCode::Char('r'), KeyCode::Up, KeyCode::Enter]);
		assert_eq!(planner.activity(1).unwrap().completed_hours, 0.0);
	}

	#[test]
	fn bars_and_colors_follow_tiers() {
		assert_eq!(progress_bar(0.0, 20).chars().filter(|c| *c == '█').count(), 0);
		assert_eq!(progress_bar(50.0, 20).chars().filter(|c| *c == '█').count(), 10);
		assert_eq!(progress_bar(250.0, 20).chars().filter(|c| *c == '█').count(), 20);
		assert_ne!(tier_color(ProgressTier::Complete), tier_color(ProgressTier::Minimal));
	}
}
