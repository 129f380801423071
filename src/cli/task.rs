//! tau task command implementations.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::author;
use crate::cli::GlobalOptions;
use crate::clock::Clock;
use crate::config::{self, Config};
use crate::due;
use crate::editor;
use crate::error::{Error, Result};
use crate::month::month_key;
use crate::output::{emit_success, HumanOutput, OutputOptions, Table};
use crate::rank::Rank;
use crate::service::TaskService;
use crate::task::{NewTask, TaskAction, TaskRecord};

pub struct AddOptions {
    pub assign: Option<String>,
    pub project: Option<String>,
    pub due: Option<String>,
    pub rank: Option<String>,
    pub title: Option<String>,
    pub desc: Option<String>,
}

pub struct ShowOptions {
    pub id: u32,
}

pub struct TransitionOptions {
    pub id: u32,
    pub action: TaskAction,
}

pub struct CommentOptions {
    pub id: u32,
    pub comment: Option<String>,
}

pub struct DoctorOptions {
    pub repair: bool,
}

#[derive(Serialize)]
struct TaskListOutput {
    month: String,
    total: usize,
    tasks: Vec<TaskRecord>,
}

#[derive(Serialize)]
struct TaskShowOutput {
    state: TaskAction,
    #[serde(flatten)]
    task: TaskRecord,
}

#[derive(Serialize)]
struct TransitionOutput {
    id: u32,
    reference_id: String,
    state: TaskAction,
    changed: bool,
}

struct TaskContext {
    service: TaskService,
    config: Config,
    now: DateTime<Utc>,
    today: NaiveDate,
}

pub fn run_add(options: AddOptions, global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;

    // Reject a bad due date or rank before prompting for anything.
    due::resolve(options.due.as_deref(), ctx.today)?;
    let rank = options
        .rank
        .as_deref()
        .map(str::parse::<Rank>)
        .transpose()?;

    let title = match options.title {
        Some(title) => title,
        None => prompt_line("Title: ")?,
    };
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(Error::InvalidArgument("task title cannot be empty".to_string()));
    }

    let description = match options.desc {
        Some(desc) => desc,
        None => editor::read_from_editor(
            ctx.config.settings.editor.as_deref(),
            editor::DESCRIPTION_TEMPLATE,
        )?,
    };

    let task = ctx.service.create(
        NewTask {
            title,
            description,
            assignee: non_empty(options.assign),
            project: non_empty(options.project),
            due: options.due,
            rank,
        },
        ctx.now,
        ctx.today,
    )?;

    let mut human = HumanOutput::new(format!("Task {} created: {}", task.short_id, task.title));
    push_task_summary(&mut human, &task);

    emit_success(output_options(global), "add", &task, Some(&human))
}

pub fn run_list(global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;
    let tasks = ctx.service.list_open(ctx.now)?;
    let month = month_key(ctx.now);

    let mut table = Table::new(["ID", "Title", "Project", "Assigned", "Due", "Rank"]);
    for task in &tasks {
        table.push_row([
            task.short_id.to_string(),
            task.title.clone(),
            task.project.clone().unwrap_or_default(),
            task.assignee.clone().unwrap_or_default(),
            format_due(task.due),
            task.rank.as_ref().map(ToString::to_string).unwrap_or_default(),
        ]);
    }

    let mut human = HumanOutput::new(format!("Open tasks ({month}): {}", tasks.len()));
    human.set_table(table);
    if tasks.is_empty() {
        human.push_next_step("tau add --title \"...\"");
    }

    let output = TaskListOutput {
        month,
        total: tasks.len(),
        tasks,
    };
    emit_success(output_options(global), "list", &output, Some(&human))
}

pub fn run_show(options: ShowOptions, global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;
    let task = ctx.service.find_by_short_id(options.id, ctx.now)?;

    let mut human = HumanOutput::new(format!("Task {}: {}", task.short_id, task.title));
    push_task_summary(&mut human, &task);
    human.push_summary("reference", task.reference_id.clone());
    human.push_summary("created", task.created_at.to_rfc3339());
    human.push_section("Description", task.description.lines().map(str::to_string));
    human.push_section(
        "Events",
        task.events
            .iter()
            .map(|event| format!("[{}] {}", event.timestamp.to_rfc3339(), event.action)),
    );
    human.push_section(
        "Comments",
        task.comments.iter().map(|comment| {
            format!(
                "[{}] {}: {}",
                comment.timestamp.to_rfc3339(),
                comment.author,
                comment.content
            )
        }),
    );

    let output = TaskShowOutput {
        state: task.current_state(),
        task,
    };
    emit_success(output_options(global), "show", &output, Some(&human))
}

pub fn run_transition(options: TransitionOptions, global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;
    let transition = ctx.service.set_state(options.id, options.action, ctx.now)?;

    let mut human = HumanOutput::new(format!(
        "Task {} {}: {}",
        options.id,
        past_tense(options.action),
        transition.task.title
    ));
    if !transition.changed {
        human.push_warning(format!("task {} was already {}", options.id, options.action));
    }
    if options.action == TaskAction::Stop {
        human.push_summary("id released", options.id.to_string());
    }

    let output = TransitionOutput {
        id: options.id,
        reference_id: transition.task.reference_id.clone(),
        state: transition.task.current_state(),
        changed: transition.changed,
    };
    let command = options.action.as_str();
    emit_success(output_options(global), command, &output, Some(&human))
}

pub fn run_comment(options: CommentOptions, global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;
    // Resolve the id first so a typo does not cost an editor session.
    ctx.service.find_by_short_id(options.id, ctx.now)?;

    let content = match options.comment {
        Some(comment) => comment,
        None => editor::read_from_editor(
            ctx.config.settings.editor.as_deref(),
            editor::COMMENT_TEMPLATE,
        )?,
    };
    if content.trim().is_empty() {
        return Err(Error::InvalidArgument("comment is empty; nothing recorded".to_string()));
    }

    let author = author::resolve_author(global.author.as_deref(), &ctx.config);
    let task = ctx.service.add_comment(options.id, &content, &author, ctx.now)?;

    let mut human = HumanOutput::new(format!("Comment added to task {}: {}", task.short_id, task.title));
    human.push_summary("author", author);
    human.push_summary("comments", task.comments.len().to_string());

    emit_success(output_options(global), "comment", &task, Some(&human))
}

pub fn run_doctor(options: DoctorOptions, global: &GlobalOptions) -> Result<()> {
    let ctx = load_context(global)?;
    let report = ctx.service.reconcile(options.repair)?;

    let header = if report.is_clean() {
        "Store is consistent".to_string()
    } else if options.repair {
        "Store repaired".to_string()
    } else {
        "Store has problems".to_string()
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("tasks", report.tasks_scanned.to_string());
    human.push_summary("months", report.months_scanned.to_string());
    human.push_section(
        "Orphaned tasks",
        report
            .orphans
            .iter()
            .map(|orphan| format!("{} (created in {})", orphan.reference_id, orphan.month)),
    );
    human.push_section(
        "Dangling bucket entries",
        report
            .dangling
            .iter()
            .map(|member| format!("{} in {}", member.reference_id, member.month)),
    );
    for reference_id in &report.unreadable {
        human.push_warning(format!("task {reference_id} is unreadable and was left alone"));
    }
    if !options.repair && !(report.orphans.is_empty() && report.dangling.is_empty()) {
        human.push_next_step("tau doctor --repair");
    }

    emit_success(output_options(global), "doctor", &report, Some(&human))
}

fn load_context(global: &GlobalOptions) -> Result<TaskContext> {
    let root = config::resolve_root(global.config_path.as_deref())?;
    let config = Config::load_from_root(&root);
    let service = TaskService::open(&root, &config)?;
    let clock = Clock::from_override(global.now.as_deref())?;
    let now = clock.now();
    let today = clock.today();
    tracing::debug!(root = %root.display(), %now, %today, "task context loaded");

    Ok(TaskContext {
        service,
        config,
        now,
        today,
    })
}

fn output_options(global: &GlobalOptions) -> OutputOptions {
    OutputOptions {
        json: global.json,
        quiet: global.quiet,
    }
}

fn push_task_summary(human: &mut HumanOutput, task: &TaskRecord) {
    human.push_summary("state", task.current_state().to_string());
    if let Some(project) = &task.project {
        human.push_summary("project", project.clone());
    }
    if let Some(assignee) = &task.assignee {
        human.push_summary("assigned", assignee.clone());
    }
    if task.due.is_some() {
        human.push_summary("due", format_due(task.due));
    }
    if let Some(rank) = &task.rank {
        human.push_summary("rank", rank.to_string());
    }
}

fn format_due(due: Option<NaiveDate>) -> String {
    due.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn past_tense(action: TaskAction) -> &'static str {
    match action {
        TaskAction::Open => "reopened",
        TaskAction::Start => "started",
        TaskAction::Pause => "paused",
        TaskAction::Stop => "stopped",
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn prompt_line(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
