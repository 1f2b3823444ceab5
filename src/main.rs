mod autosave;
mod config;
mod domain;
mod editing;
mod logging;
mod paths;
mod planner;
mod stats;
mod storage;
mod ui;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::{Config, load_config_with_fallback};
use crate::domain::{Activity, format_hours};
use crate::planner::{Answer, RESET_PROMPT, WeekPlanner};
use crate::stats::{WeekSummary, activity_progress};
use crate::storage::{load_planner, save_planner};
use crate::ui::run_dashboard;

#[derive(Debug, Parser)]
#[command(name = "weekplan", about = "Weekly activity planner for the terminal")]
struct Cli {
	#[arg(long)]
	planner: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Init,
	Dashboard,
	Weeks,
	Summary {
		/// 1-based week number; defaults to the current week.
		#[arg(long)]
		week: Option<usize>,
	},
	AddActivity {
		#[arg(long)]
		name: String,
		#[arg(long)]
		target: f64,
	},
	RemoveActivity {
		#[arg(long)]
		activity: u32,
	},
	Target {
		#[arg(long)]
		activity: u32,
		#[arg(long)]
		hours: f64,
	},
	Log {
		#[arg(long)]
		activity: u32,
		#[arg(long)]
		hours: f64,
		#[arg(long)]
		subtract: bool,
	},
	Progress {
		#[arg(long)]
		activity: u32,
		#[arg(long)]
		hours: f64,
	},
	NextWeek,
	PreviousWeek,
	NewWeek,
	Select {
		#[arg(long)]
		week: usize,
	},
	DeleteWeek {
		#[arg(long)]
		week: usize,
		#[arg(long)]
		yes: bool,
	},
	Reset {
		#[arg(long)]
		yes: bool,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	if let Err(err) = logging::init(&paths::log_path()) {
		eprintln!("warning: logging disabled: {err}");
	}

	let loaded = load_config_with_fallback(&paths::config_path());
	if let Some(err) = &loaded.error {
		eprintln!("warning: {err}; using default settings");
	}
	let config = loaded.config;

	let planner_path = paths::resolve_planner_path(cli.planner);
	let mut planner = open_planner(&planner_path, &config)?;

	match cli.command.unwrap_or(Command::Dashboard) {
		Command::Init => {
			save_planner(&planner_path, &planner)?;
			println!("initialized planner at {}", planner_path.display());
		}
		Command::Dashboard => {
			run_dashboard(&mut planner, &planner_path)?;
		}
		Command::Weeks => {
			print_weeks(&planner);
		}
		Command::Summary { week } => {
			print_summary(&planner, week)?;
		}
		Command::AddActivity { name, target } => {
			let id = planner
				.add_activity(&name, target)
				.ok_or("activity needs a name and a non-negative target")?;
			commit(&mut planner, &planner_path)?;
			println!("added activity {id}: {}", name.trim());
		}
		Command::RemoveActivity { activity } => {
			if !planner.remove_activity(activity) {
				return Err(format!("activity not found: {activity}").into());
			}
			commit(&mut planner, &planner_path)?;
			println!("removed activity {activity}");
		}
		Command::Target { activity, hours } => {
			if !planner.set_target_hours(activity, hours) {
				return Err(format!("could not set target of activity {activity} to {hours}").into());
			}
			commit(&mut planner, &planner_path)?;
			println!("target of activity {activity} is now {}h", format_hours(hours));
		}
		Command::Log {
			activity,
			hours,
			subtract,
		} => {
			let applied = if subtract {
				planner.subtract_completed_hours(activity, hours)
			} else {
				planner.add_completed_hours(activity, hours)
			};
			if !applied {
				return Err(format!("could not log {hours}h on activity {activity}").into());
			}
			commit(&mut planner, &planner_path)?;
			print_activity_line(planner.activity(activity));
		}
		Command::Progress { activity, hours } => {
			if !planner.set_completed_hours(activity, hours) {
				return Err(format!("could not set completed hours of activity {activity}").into());
			}
			commit(&mut planner, &planner_path)?;
			print_activity_line(planner.activity(activity));
		}
		Command::NextWeek => {
			let created = planner.go_to_next();
			save_planner(&planner_path, &planner)?;
			println!(
				"{} {}",
				if created { "created" } else { "moved to" },
				week_heading(&planner)
			);
		}
		Command::PreviousWeek => {
			if !planner.go_to_previous() {
				println!("already at the first week");
				return Ok(());
			}
			save_planner(&planner_path, &planner)?;
			println!("moved to {}", week_heading(&planner));
		}
		Command::NewWeek => {
			planner.create_new_week();
			save_planner(&planner_path, &planner)?;
			println!("created {}", week_heading(&planner));
		}
		Command::Select { week } => {
			planner.select_week(week_index(week)?)?;
			save_planner(&planner_path, &planner)?;
			println!("moved to {}", week_heading(&planner));
		}
		Command::DeleteWeek { week, yes } => {
			let index = week_index(week)?;
			let prompt = planner.delete_prompt(index)?;
			if !yes && ask(&prompt)? == Answer::No {
				println!("delete cancelled");
				return Ok(());
			}
			planner.delete_week(index)?;
			save_planner(&planner_path, &planner)?;
			println!("deleted week {week}; now at {}", week_heading(&planner));
		}
		Command::Reset { yes } => {
			let answer = if yes { Answer::Yes } else { ask(RESET_PROMPT)? };
			if !planner.reset_current_week(answer) {
				println!("reset cancelled");
				return Ok(());
			}
			commit(&mut planner, &planner_path)?;
			println!("reset {}", week_heading(&planner));
		}
	}

	Ok(())
}

fn open_planner(path: &std::path::Path, config: &Config) -> Result<WeekPlanner, Box<dyn Error>> {
	if let Some(planner) = load_planner(path, config.autosave_delay())? {
		return Ok(planner);
	}

	Ok(WeekPlanner::new(
		Local::now().date_naive(),
		&config.default_template(),
		config.autosave_delay(),
	))
}

fn commit(planner: &mut WeekPlanner, path: &std::path::Path) -> Result<(), Box<dyn Error>> {
	planner.save();
	save_planner(path, planner)?;
	Ok(())
}

fn week_index(week: usize) -> Result<usize, Box<dyn Error>> {
	week.checked_sub(1)
		.ok_or_else(|| "week numbers start at 1".into())
}

fn ask(prompt: &str) -> Result<Answer, Box<dyn Error>> {
	print!("{prompt} [y/N] ");
	io::stdout().flush()?;
	let mut line = String::new();
	io::stdin().lock().read_line(&mut line)?;
	let answer = match line.trim().to_ascii_lowercase().as_str() {
		"y" | "yes" => Answer::Yes,
		_ => Answer::No,
	};
	if answer == Answer::No {
		warn!(prompt, "confirmation declined");
	}
	Ok(answer)
}

fn week_heading(planner: &WeekPlanner) -> String {
	let week = planner.current_week();
	format!(
		"week {} of {} ({}, {})",
		planner.cursor() + 1,
		planner.weeks().len(),
		week.id,
		week.date_range_label()
	)
}

fn print_weeks(planner: &WeekPlanner) {
	for row in planner.history() {
		let week = &planner.weeks()[row.index];
		println!(
			"{}{:>2}. {} | {} | {:>5.1}%{}",
			if row.index == planner.cursor() { "*" } else { " " },
			row.index + 1,
			week.id,
			week.date_range_label(),
			row.percent,
			if row.completed { " | completed" } else { "" }
		);
	}
}

fn print_summary(planner: &WeekPlanner, week: Option<usize>) -> Result<(), Box<dyn Error>> {
	let index = match week {
		Some(week) => week_index(week)?,
		None => planner.cursor(),
	};
	let Some(stored) = planner.weeks().get(index) else {
		return Err(format!("week {} does not exist ({} weeks)", index + 1, planner.weeks().len()).into());
	};
	let activities = if index == planner.cursor() {
		planner.live_activities()
	} else {
		stored.activities.as_slice()
	};

	println!(
		"week {} of {} | {} | {}",
		index + 1,
		planner.weeks().len(),
		stored.id,
		stored.date_range_label()
	);
	if activities.is_empty() {
		println!("no activities yet");
	}
	for activity in activities {
		print_activity_line(Some(activity));
	}

	let summary = WeekSummary::of(activities);
	println!(
		"\nplanned {}h | completed {}h | progress {:.1}% | available {}h",
		format_hours(summary.planned),
		format_hours(summary.completed),
		summary.percent,
		format_hours(summary.remaining)
	);
	if summary.is_over_allocated() {
		println!(
			"warning: {}h more than a week holds are planned",
			format_hours(summary.remaining.abs())
		);
	}

	Ok(())
}

fn print_activity_line(activity: Option<&Activity>) {
	let Some(activity) = activity else {
		return;
	};
	println!(
		"{:>3} | {} | {}/{}h | {:.0}%",
		activity.id,
		activity.name,
		format_hours(activity.completed_hours),
		format_hours(activity.target_hours),
		activity_progress(activity)
	);
}
