//! Resource command handlers, shared by every entity subcommand.

use std::path::Path;

use tabled::{Table, Tabled, settings::Style};

use rxdesk_core::form::{FieldKind, Requirement};
use rxdesk_core::navigation::{RowOutcome, active_menu_path, perform};
use rxdesk_core::transfer::{download_export, export_visible, import_file};
use rxdesk_core::{
    Backend, Entity, FilePart, FormController, ListController, ListMode, ListQuery,
    MutationOutcome, Notice, RecordId, ResourceClient, Route, RowAction,
};

use crate::cli::{ExportArgs, FormArgs, GlobalOpts, ListArgs, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, TerminalGate};

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    entity: Entity,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match args.command {
        ResourceCommand::List(view) => list(backend, entity, &view, global).await,
        ResourceCommand::Get { id } => get(backend, entity, &RecordId::from(id), global).await,
        ResourceCommand::Create(form) => create(backend, entity, &form, global).await,
        ResourceCommand::Edit { id, form } => {
            edit(backend, entity, RecordId::from(id), &form, global).await
        }
        ResourceCommand::Delete { id, view } => {
            row_action(backend, entity, RecordId::from(id), RowAction::Delete, &view, global).await
        }
        ResourceCommand::Status { id, status, view } => {
            let action = RowAction::ChangeStatus(status);
            row_action(backend, entity, RecordId::from(id), action, &view, global).await
        }
        ResourceCommand::Export(args) => export(backend, entity, &args, global).await,
        ResourceCommand::Import { file } => import(backend, entity, &file, global).await,
        ResourceCommand::Fields => {
            fields(entity, global);
            Ok(())
        }
    };
    result.map_err(|e| e.with_command(util::command_name(entity)))
}

// ── List views ──────────────────────────────────────────────────────

/// Load the page described by `--filter`/`--page`.
async fn open_view(
    backend: &Backend,
    entity: Entity,
    view: &ListArgs,
    global: &GlobalOpts,
) -> Result<ListController<ResourceClient>, CliError> {
    let list = backend.list(entity)?;
    let filter = util::parse_filters(entity, &view.filter)?;

    let spinner = util::spinner(format!("Loading {}", entity.title()), global.quiet);
    // Server-mode lists fetch as part of applying the filter.
    let loaded = async {
        list.apply_filter(filter).await?;
        if list.snapshot().mode == ListMode::Client {
            list.load().await?;
        }
        Ok::<_, CliError>(())
    }
    .await;
    spinner.finish_and_clear();
    loaded?;

    if let Some(page) = view.page {
        if !list.change_page(page).await? {
            let notice = Notice::info(format!(
                "Page {page} is out of range (1-{}); showing page 1",
                list.page_count().max(1)
            ));
            output::print_notice(&notice, global.quiet, output::should_color(global.color));
        }
    }
    Ok(list)
}

async fn list(
    backend: &Backend,
    entity: Entity,
    view: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let list = open_view(backend, entity, view, global).await?;
    let rows = list.visible();
    let out = output::render_list(global.output, entity.columns(), &rows)?;
    output::print_output(&out, global.quiet);

    if global.output == crate::cli::OutputFormat::Table {
        let state = list.snapshot();
        let footer = Notice::info(format!(
            "{} · page {} of {} · {} record(s)",
            active_menu_path(&Route::List(entity)),
            state.page,
            state.page_count().max(1),
            state.filtered_total()
        ));
        output::print_notice(&footer, global.quiet, output::should_color(global.color));
    }
    Ok(())
}

async fn get(
    backend: &Backend,
    entity: Entity,
    id: &RecordId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = backend.client(entity)?;
    let route = Route::View {
        entity,
        id: id.clone(),
    };
    tracing::debug!(%route, "viewing record");
    let record = client.get_by_id(id).await.map_err(rxdesk_core::CoreError::from)?;
    let out = output::render_single(global.output, entity.columns(), &record)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Row actions ─────────────────────────────────────────────────────

async fn row_action(
    backend: &Backend,
    entity: Entity,
    id: RecordId,
    action: RowAction,
    view: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let list = open_view(backend, entity, view, global).await?;
    let gate = TerminalGate {
        assume_yes: global.yes,
    };
    let deleting = matches!(action, RowAction::Delete);
    let verb = if deleting { "deleted" } else { "updated" };

    let notice = match perform(&list, id.clone(), action, &gate).await? {
        RowOutcome::Mutated(MutationOutcome::Applied) => {
            Notice::done(entity.spec().entity, verb)
        }
        RowOutcome::Mutated(MutationOutcome::Cancelled) => Notice::info("Cancelled"),
        RowOutcome::Navigate(route) => Notice::info(format!("Open {route}")),
    };
    output::print_notice(&notice, global.quiet, output::should_color(global.color));

    if !deleting {
        if let Some(row) = list.snapshot().records.iter().find(|r| r.id() == &id) {
            let out = output::render_single(global.output, entity.columns(), row)?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}

// ── Forms ───────────────────────────────────────────────────────────

fn fill(form: &mut FormController<ResourceClient>, args: &FormArgs) -> Result<(), CliError> {
    for (field, raw) in &args.set {
        form.set_input(field, raw)?;
    }
    for (field, path) in &args.file {
        let file = FilePart::from_path(field.as_str(), Path::new(path))?;
        form.attach(field, file)?;
    }
    Ok(())
}

async fn create(
    backend: &Backend,
    entity: Entity,
    args: &FormArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut form = backend.create_form(entity)?;
    fill(&mut form, args)?;
    submit(form, "created", global).await
}

async fn edit(
    backend: &Backend,
    entity: Entity,
    id: RecordId,
    args: &FormArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.set.is_empty() && args.file.is_empty() {
        return Err(CliError::Validation {
            field: "edit".into(),
            reason: "nothing to change; pass --set FIELD=VALUE or --file FIELD=PATH".into(),
        });
    }
    let mut form = backend.edit_form(entity, id)?;
    let spinner = util::spinner(format!("Loading {}", entity.spec().entity), global.quiet);
    let loaded = form.load().await;
    spinner.finish_and_clear();
    loaded?;

    fill(&mut form, args)?;
    submit(form, "saved", global).await
}

async fn submit(
    mut form: FormController<ResourceClient>,
    verb: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entity = form.entity();
    let spinner = util::spinner("Saving", global.quiet);
    let submitted = form.submit().await;
    spinner.finish_and_clear();
    let submitted = submitted?;

    tracing::debug!(route = %submitted.return_to, "form submitted");
    output::print_notice(
        &Notice::done(entity.spec().entity, verb),
        global.quiet,
        output::should_color(global.color),
    );
    let out = output::render_single(global.output, entity.columns(), &submitted.record)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Export / import ─────────────────────────────────────────────────

async fn export(
    backend: &Backend,
    entity: Entity,
    args: &ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    std::fs::create_dir_all(&args.dir)?;
    let exported = if args.server {
        let client = backend.client(entity)?;
        let query = ListQuery::with_filters(util::parse_filters(entity, &args.view.filter)?.to_params());
        let spinner = util::spinner(format!("Downloading {}", entity.title()), global.quiet);
        let result = download_export(&client, &query, &args.dir).await;
        spinner.finish_and_clear();
        result?
    } else {
        let list = open_view(backend, entity, &args.view, global).await?;
        export_visible(&list, &args.dir)?
    };

    let message = match exported.rows {
        Some(rows) => format!("Exported {rows} row(s) to {}", exported.path.display()),
        None => format!("Saved {}", exported.path.display()),
    };
    output::print_notice(
        &Notice::success(message),
        global.quiet,
        output::should_color(global.color),
    );
    Ok(())
}

async fn import(
    backend: &Backend,
    entity: Entity,
    file: &Path,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let list = backend.list(entity)?;
    let spinner = util::spinner(format!("Uploading {}", file.display()), global.quiet);
    let result = import_file(&list, file).await;
    spinner.finish_and_clear();
    let summary = result?;

    let mut message = format!(
        "Imported {}: {} created, {} updated, {} failed",
        entity.title(),
        summary.created,
        summary.updated,
        summary.failed
    );
    if let Some(extra) = &summary.message {
        message.push_str(&format!(" ({extra})"));
    }
    output::print_notice(
        &Notice::success(message),
        global.quiet,
        output::should_color(global.color),
    );
    Ok(())
}

// ── Form description ────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Default")]
    default: &'static str,
}

fn describe_kind(kind: FieldKind) -> String {
    match kind {
        FieldKind::Text { max_len } => format!("text (max {max_len})"),
        FieldKind::Email => "email".into(),
        FieldKind::Phone => "phone".into(),
        FieldKind::Number { min, max } => match (min, max) {
            (Some(lo), Some(hi)) => format!("number {lo}..{hi}"),
            (Some(lo), None) => format!("number >= {lo}"),
            (None, Some(hi)) => format!("number <= {hi}"),
            (None, None) => "number".into(),
        },
        FieldKind::Integer { min: Some(lo) } => format!("integer >= {lo}"),
        FieldKind::Integer { min: None } => "integer".into(),
        FieldKind::Choice(choices) => choices.join(" | "),
        FieldKind::MultiSelect => "list (comma-separated)".into(),
        FieldKind::Date => "date (YYYY-MM-DD)".into(),
        FieldKind::Flag => "yes/no".into(),
        FieldKind::File => "file (--file)".into(),
    }
}

fn describe_requirement(requirement: Requirement) -> String {
    match requirement {
        Requirement::Optional => String::new(),
        Requirement::Always => "yes".into(),
        Requirement::When { field, any_of } => format!("when {field} is {}", any_of.join("/")),
    }
}

fn fields(entity: Entity, global: &GlobalOpts) {
    let rows: Vec<FieldRow> = entity
        .form()
        .fields
        .iter()
        .map(|f| FieldRow {
            name: f.name,
            label: f.label,
            kind: describe_kind(f.kind),
            required: describe_requirement(f.requirement),
            default: f.default.unwrap_or(""),
        })
        .collect();
    let out = Table::new(rows).with(Style::rounded()).to_string();
    output::print_output(&out, global.quiet);
}
