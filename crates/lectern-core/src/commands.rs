use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::api::{self, ApiClient};
use crate::calendar::parse_date_arg;
use crate::cli::{Command, RegisterArgs};
use crate::config::Config;
use crate::lecture::User;
use crate::projection::project;
use crate::render::Renderer;
use crate::state::{Action, GroupSelection, LectureBatch, ViewState};
use crate::store::{Session, StateStore};
use crate::view::{Direction, ViewMode};

#[instrument(skip(store, cfg, renderer, command, today))]
pub fn dispatch(
    store: &StateStore,
    cfg: &Config,
    renderer: &mut Renderer,
    command: Command,
    today: NaiveDate,
) -> anyhow::Result<()> {
    debug!(command = ?command, "dispatching command");

    match command {
        Command::Login { username, password } => {
            cmd_login(store, cfg, &username, &password, today)
        }
        Command::Register(args) => cmd_register(store, cfg, &args, today),
        Command::Logout => cmd_logout(store),
        Command::Whoami => cmd_whoami(store, cfg, renderer),
        Command::Groups => cmd_groups(cfg, renderer),
        Command::Day { date } => {
            cmd_set_view(store, cfg, renderer, ViewMode::Day, date.as_deref(), today)
        }
        Command::Week { date } => {
            cmd_set_view(store, cfg, renderer, ViewMode::Week, date.as_deref(), today)
        }
        Command::Month { date } => {
            cmd_set_view(store, cfg, renderer, ViewMode::Month, date.as_deref(), today)
        }
        Command::Show => cmd_show(store, cfg, renderer, today),
        Command::Next => cmd_navigate(store, cfg, renderer, Direction::Next, today),
        Command::Prev => cmd_navigate(store, cfg, renderer, Direction::Previous, today),
        Command::Goto { date } => cmd_goto(store, cfg, renderer, &date, today),
        Command::Group { selector, clear } => {
            cmd_group(store, cfg, renderer, selector.as_deref(), clear, today)
        }
    }
}

#[instrument(skip(store, cfg, password, today))]
fn cmd_login(
    store: &StateStore,
    cfg: &Config,
    username: &str,
    password: &str,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command login");

    let client = ApiClient::new(&cfg.api, None)?;
    let token = client.login(username, password)?;
    store.save_session(&Session {
        token: token.clone(),
        username: username.to_string(),
    })?;

    let client = ApiClient::new(&cfg.api, Some(token))?;
    let user = client.current_user()?;
    adopt_user_group(store, &user, today)?;

    println!(
        "Logged in as {} {} ({}).",
        user.first_name, user.last_name, user.group.name
    );
    Ok(())
}

#[instrument(skip(store, cfg, args, today))]
fn cmd_register(
    store: &StateStore,
    cfg: &Config,
    args: &RegisterArgs,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command register");

    let client = ApiClient::new(&cfg.api, None)?;
    let token = client.register(
        &args.username,
        &args.password,
        &args.first_name,
        &args.last_name,
        args.group_id,
    )?;
    store.save_session(&Session {
        token: token.clone(),
        username: args.username.clone(),
    })?;

    let client = ApiClient::new(&cfg.api, Some(token))?;
    let user = client.current_user()?;
    adopt_user_group(store, &user, today)?;

    println!(
        "Registered {} {} ({}).",
        user.first_name, user.last_name, user.group.name
    );
    Ok(())
}

#[instrument(skip(store))]
fn cmd_logout(store: &StateStore) -> anyhow::Result<()> {
    info!("command logout");

    let Some(session) = store.load_session()? else {
        println!("Not logged in.");
        return Ok(());
    };

    store.clear_session()?;
    println!("Logged out {}.", session.username);
    Ok(())
}

#[instrument(skip(store, cfg, renderer))]
fn cmd_whoami(store: &StateStore, cfg: &Config, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command whoami");

    let Some(session) = store.load_session()? else {
        println!("Not logged in.");
        return Ok(());
    };

    let client = ApiClient::new(&cfg.api, Some(session.token))?;
    let user = client
        .current_user()
        .map_err(|err| expire_session_on_unauthorized(store, err))?;
    renderer.print_user(&user)
}

#[instrument(skip(cfg, renderer))]
fn cmd_groups(cfg: &Config, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command groups");

    let client = ApiClient::new(&cfg.api, None)?;
    let groups = client.groups()?;
    if groups.is_empty() {
        println!("No groups available.");
        return Ok(());
    }

    renderer.print_groups(&groups)
}

#[instrument(skip(store, cfg, renderer, date_arg, today))]
fn cmd_set_view(
    store: &StateStore,
    cfg: &Config,
    renderer: &mut Renderer,
    view: ViewMode,
    date_arg: Option<&str>,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!(view = view.as_key(), "command view");

    let mut state = load_or_default(store, today)?;
    if let Some(raw) = date_arg {
        let date = parse_date_arg(raw, today)?;
        state = state.apply(Action::JumpToDate(date));
    }
    let state = state.apply(Action::SetViewMode(view));
    render_state(store, cfg, renderer, state, today)
}

#[instrument(skip(store, cfg, renderer, today))]
fn cmd_show(
    store: &StateStore,
    cfg: &Config,
    renderer: &mut Renderer,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command show");

    let state = load_or_default(store, today)?;
    render_state(store, cfg, renderer, state, today)
}

#[instrument(skip(store, cfg, renderer, direction, today))]
fn cmd_navigate(
    store: &StateStore,
    cfg: &Config,
    renderer: &mut Renderer,
    direction: Direction,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!(direction = ?direction, "command navigate");

    let state = load_or_default(store, today)?.apply(Action::Navigate(direction));
    render_state(store, cfg, renderer, state, today)
}

#[instrument(skip(store, cfg, renderer, raw_date, today))]
fn cmd_goto(
    store: &StateStore,
    cfg: &Config,
    renderer: &mut Renderer,
    raw_date: &str,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command goto");

    let date = parse_date_arg(raw_date, today)?;
    let state = load_or_default(store, today)?.apply(Action::JumpToDate(date));
    render_state(store, cfg, renderer, state, today)
}

#[instrument(skip(store, cfg, renderer, selector, today))]
fn cmd_group(
    store: &StateStore,
    cfg: &Config,
    renderer: &mut Renderer,
    selector: Option<&str>,
    clear: bool,
    today: NaiveDate,
) -> anyhow::Result<()> {
    info!("command group");

    let state = load_or_default(store, today)?;

    if clear {
        let state = state.apply(Action::SelectGroup(None));
        render_state(store, cfg, renderer, state, today)?;
        println!("Group filter cleared.");
        return Ok(());
    }

    let Some(selector) = selector else {
        match state.group {
            Some(ref group) => println!("Active group: {} (id {}).", group.name, group.id),
            None => println!("No group filter set."),
        }
        return Ok(());
    };

    let client = ApiClient::new(&cfg.api, None)?;
    let selection = resolve_group_selection(&client, selector)?;
    let label = format!("{} (id {})", selection.name, selection.id);

    let state = state.apply(Action::SelectGroup(Some(selection)));
    render_state(store, cfg, renderer, state, today)?;
    println!("Group set: {label}.");
    Ok(())
}

fn load_or_default(store: &StateStore, today: NaiveDate) -> anyhow::Result<ViewState> {
    Ok(store
        .load_view_state()?
        .unwrap_or_else(|| ViewState::initial(today)))
}

#[instrument(skip(store, cfg, renderer, state, today))]
fn render_state(
    store: &StateStore,
    cfg: &Config,
    renderer: &mut Renderer,
    state: ViewState,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let session = store.load_session()?;
    let client = ApiClient::new(&cfg.api, session.map(|session| session.token))?;

    let batch = fetch_batch(&client, &state)
        .map_err(|err| expire_session_on_unauthorized(store, err))?;

    if !state.accepts(&batch) {
        warn!(
            range = ?batch.range,
            group = ?batch.group_id,
            "dropping lecture batch for a different request"
        );
        return Ok(());
    }

    let projection = project(state.view, &batch.lectures, state.anchor, today);
    renderer.print_projection(&projection, today)?;
    store.save_view_state(&state)?;
    Ok(())
}

fn fetch_batch(client: &ApiClient, state: &ViewState) -> anyhow::Result<LectureBatch> {
    let range = state.range();
    let group_id = state.group_id();

    let lectures = match state.view {
        ViewMode::Day => client.lectures_for_date(group_id, state.anchor)?,
        ViewMode::Week | ViewMode::Month => client.lectures_for_range(group_id, range)?,
    };

    Ok(LectureBatch {
        range,
        group_id,
        lectures,
    })
}

fn resolve_group_selection(client: &ApiClient, selector: &str) -> anyhow::Result<GroupSelection> {
    if let Ok(id) = selector.parse::<i64>() {
        let group = client.group(id)?;
        return Ok(GroupSelection {
            id: group.id,
            name: group.name,
        });
    }

    let wanted = selector.to_ascii_lowercase();
    client
        .groups()?
        .into_iter()
        .find(|group| group.name.to_ascii_lowercase() == wanted)
        .map(|group| GroupSelection {
            id: group.id,
            name: group.name,
        })
        .ok_or_else(|| anyhow!("no group named `{selector}`"))
}

fn adopt_user_group(store: &StateStore, user: &User, today: NaiveDate) -> anyhow::Result<()> {
    let selection = GroupSelection {
        id: user.group.id,
        name: user.group.name.clone(),
    };
    let state = load_or_default(store, today)?.apply(Action::SelectGroup(Some(selection)));
    store.save_view_state(&state)
}

fn expire_session_on_unauthorized(store: &StateStore, err: anyhow::Error) -> anyhow::Error {
    if !api::is_unauthorized(&err) {
        return err;
    }

    if let Err(clear_err) = store.clear_session() {
        warn!(error = %clear_err, "failed clearing expired session");
    }
    err.context("session expired; run `lectern login` again")
}
