use clap::Parser;
use serde_json::json;
use std::{future::Future, time::Duration};

use crate::{
    auth::{keyring::OsSessionStore, local::LocalIdentityProvider},
    cli::{
        display::{
            UiOptions, configure_terminal, done, error as error_msg, is_terminal, pending,
            print_header, short_id, success, system, warning,
        },
        parser::{Cli, Commands},
        prompts, runtime_config, table,
    },
    core::{
        errors::{ItemListError, ItemListResult},
        models::Item,
    },
    storage::{app::AppStore, r#trait::DocumentStore},
    view::{
        auth_gate::{AuthGate, View},
        item_list::ItemListView,
        login_form::LoginMode,
    },
};

type Gate = AuthGate<LocalIdentityProvider<AppStore, OsSessionStore>, AppStore>;

async fn app_store(cli: &Cli) -> ItemListResult<AppStore> {
    let store = AppStore::connect(&cli.backend, &cli.database_url).await?;
    store.init().await?;
    Ok(store)
}

fn ui_options(cli: &Cli) -> UiOptions {
    UiOptions {
        json: cli.json,
        quiet: cli.quiet,
        color: !cli.no_color,
    }
}

fn remote_timeout(cli: &Cli) -> Option<Duration> {
    (cli.remote_timeout_secs > 0).then(|| Duration::from_secs(cli.remote_timeout_secs))
}

fn map_user_error(err: &ItemListError) -> String {
    if err.is_identity_rejection() {
        return err.to_string();
    }
    let message = match err {
        ItemListError::NotSignedIn => "Not signed in. Run sign-in first.",
        ItemListError::NotFound => "Item not found.",
        ItemListError::Timeout(_) => "The remote service did not answer in time.",
        ItemListError::UnsupportedBackend(_) => "Unsupported backend configuration.",
        ItemListError::Config(message) if message == "operation cancelled" => {
            "Operation cancelled."
        }
        ItemListError::Config(message) if message == "ambiguous item id prefix" => {
            "Ambiguous ID. Use a longer ID prefix."
        }
        ItemListError::Config(_) => "Invalid configuration or input.",
        ItemListError::KeyringLocked => "Secure keyring is locked. Unlock your keyring and retry.",
        ItemListError::KeyringUnavailable => "Secure keyring unavailable. Unlock keyring and retry.",
        ItemListError::Crypto => "Password hashing failed.",
        ItemListError::Serialization => "Data format error.",
        _ => "Storage operation failed.",
    };
    message.to_owned()
}

async fn with_spinner<T>(message: &str, options: UiOptions, fut: impl Future<Output = T>) -> T {
    let spinner = pending(message, options);
    let output = fut.await;
    done(spinner);
    output
}

pub async fn run() -> ItemListResult<()> {
    let mut cli = Cli::parse();
    let args = std::env::args().collect::<Vec<_>>();
    let backend_explicit = runtime_config::cli_flag_present(&args, "--backend");
    let database_url_explicit = runtime_config::cli_flag_present(&args, "--database-url");
    let collection_explicit = runtime_config::cli_flag_present(&args, "--collection");

    if (!backend_explicit || !database_url_explicit || !collection_explicit)
        && let Some(saved_config) = runtime_config::load()?
    {
        if !backend_explicit {
            cli.backend = saved_config.backend;
        }
        if !database_url_explicit {
            cli.database_url = saved_config.database_url;
        }
        if !collection_explicit {
            cli.collection = saved_config.collection;
        }
    }

    let options = ui_options(&cli);
    configure_terminal(options.color);

    if let Commands::Config = cli.command {
        return report_result(run_config(&cli, options), options);
    }

    let result = async {
        let mut gate = build_gate(&cli).await?;
        let result = dispatch(&mut gate, &cli, options).await;
        gate.teardown();
        result
    }
    .await;

    report_result(result, options)
}

fn report_result(result: ItemListResult<()>, options: UiOptions) -> ItemListResult<()> {
    if let Err(err) = &result {
        error_msg(&map_user_error(err), options);
    }
    result
}

async fn build_gate(cli: &Cli) -> ItemListResult<Gate> {
    let store = app_store(cli).await?;
    let timeout = remote_timeout(cli);
    let sessions = OsSessionStore::new(&cli.database_url);
    let identity = LocalIdentityProvider::new(store.clone(), sessions);
    let items = ItemListView::new(store, cli.collection.clone()).with_timeout(timeout);

    let mut gate = AuthGate::new(identity, items).with_timeout(timeout);
    gate.sync_identity().await;
    Ok(gate)
}

async fn dispatch(gate: &mut Gate, cli: &Cli, options: UiOptions) -> ItemListResult<()> {
    match &cli.command {
        Commands::SignUp { email } => run_sign_up(gate, cli, options, email).await,
        Commands::SignIn { email } => run_sign_in(gate, options, email).await,
        Commands::SignOut => run_sign_out(gate, options).await,
        Commands::Whoami => run_whoami(gate, options),
        Commands::List => run_list(gate, options),
        Commands::Add { name } => run_add(gate, options, name).await,
        Commands::Edit { id, name } => run_edit(gate, options, id, name.as_deref()).await,
        Commands::Delete { id, yes } => run_delete(gate, options, id, *yes).await,
        Commands::Interactive => run_interactive(gate, options).await,
        Commands::Config => run_config(cli, options),
    }
}

async fn submit_credentials(
    gate: &mut Gate,
    options: UiOptions,
    mode: LoginMode,
    email: &str,
) -> ItemListResult<()> {
    print_header(mode.title(), gate.session(), options);
    let password = prompts::secure_password_prompt("Password: ")?;

    let form = gate.login_form_mut();
    form.set_mode(mode);
    form.set_email(email);
    form.set_password(password);

    let pending_message = match mode {
        LoginMode::SignIn => "Signing in...",
        LoginMode::SignUp => "Creating account...",
    };
    let identity = with_spinner(pending_message, options, gate.submit_login()).await?;
    success(&format!("Signed in as {}.", identity.email), options);
    Ok(())
}

async fn run_sign_up(
    gate: &mut Gate,
    cli: &Cli,
    options: UiOptions,
    email: &str,
) -> ItemListResult<()> {
    submit_credentials(gate, options, LoginMode::SignUp, email).await?;
    system(&format!("Storage: {}", backend_display(&cli.backend)), options);

    runtime_config::save(&runtime_config::RuntimeConfig {
        backend: cli.backend.clone(),
        database_url: cli.database_url.clone(),
        collection: cli.collection.clone(),
    })?;
    Ok(())
}

async fn run_sign_in(gate: &mut Gate, options: UiOptions, email: &str) -> ItemListResult<()> {
    submit_credentials(gate, options, LoginMode::SignIn, email).await
}

async fn run_sign_out(gate: &mut Gate, options: UiOptions) -> ItemListResult<()> {
    print_header("Sign Out", gate.session(), options);
    if !gate.session().is_signed_in() {
        warning("Already signed out.", options);
        return Ok(());
    }
    with_spinner("Signing out...", options, gate.logout()).await?;
    success("Signed out.", options);
    Ok(())
}

fn run_whoami(gate: &Gate, options: UiOptions) -> ItemListResult<()> {
    if options.json {
        let value = json!({ "email": gate.session().email() });
        println!("{value}");
        return Ok(());
    }
    match gate.session().email() {
        Some(email) => system(&format!("Signed in as {email}"), options),
        None => system("Signed out", options),
    }
    Ok(())
}

fn run_list(gate: &Gate, options: UiOptions) -> ItemListResult<()> {
    let list = gate.item_list()?;
    print_header("Items", gate.session(), options);
    print_items(list.items(), options)
}

fn print_items(items: &[Item], options: UiOptions) -> ItemListResult<()> {
    if options.json {
        println!(
            "{}",
            serde_json::to_string(items).map_err(|_| ItemListError::Serialization)?
        );
        return Ok(());
    }
    if !options.quiet {
        table::print_item_table(items);
    }
    Ok(())
}

async fn run_add(gate: &mut Gate, options: UiOptions, name: &str) -> ItemListResult<()> {
    let list = gate.item_list_mut()?;
    list.set_new_item_input(name);
    let created = with_spinner("Saving...", options, list.submit_new_item()).await?;
    if let Some(item) = created {
        success("Item added.", options);
        system(&format!("ID: {}", short_id(&item.id)), options);
    }
    Ok(())
}

async fn run_edit(
    gate: &mut Gate,
    options: UiOptions,
    id: &str,
    name: Option<&str>,
) -> ItemListResult<()> {
    let list = gate.item_list_mut()?;
    let resolved_id = list.resolve_id(id)?;
    if !list.begin_edit(&resolved_id) {
        return Err(ItemListError::NotFound);
    }
    let current = list.draft().map(|draft| draft.name.clone()).unwrap_or_default();

    let new_name = match name {
        Some(name) => name.to_owned(),
        None => prompts::input_with_default("Name", &current)?,
    };
    list.set_draft_name(new_name);

    let saved = with_spinner("Saving...", options, list.save_edit()).await?;
    if saved {
        success("Item updated.", options);
    } else {
        list.cancel_edit();
        system("Nothing changed.", options);
    }
    Ok(())
}

async fn run_delete(gate: &mut Gate, options: UiOptions, id: &str, yes: bool) -> ItemListResult<()> {
    let list = gate.item_list_mut()?;
    let resolved_id = list.resolve_id(id)?;
    let name = list
        .find(&resolved_id)
        .map(|item| item.name.clone())
        .unwrap_or_default();

    if !yes
        && (!is_terminal() || !prompts::confirmation_prompt(&format!("Delete \"{name}\"?"), false)?)
    {
        return Err(ItemListError::Config("operation cancelled".to_owned()));
    }

    with_spinner("Deleting...", options, list.delete(&resolved_id)).await?;
    success("Item deleted.", options);
    Ok(())
}

async fn run_interactive(gate: &mut Gate, options: UiOptions) -> ItemListResult<()> {
    if !is_terminal() {
        return Err(ItemListError::Config(
            "interactive mode needs a terminal".to_owned(),
        ));
    }

    loop {
        gate.sync_identity().await;
        let keep_going = match gate.view() {
            View::Login => interactive_login(gate, options).await?,
            View::ItemList => interactive_items(gate, options).await?,
        };
        if !keep_going {
            return Ok(());
        }
    }
}

async fn interactive_login(gate: &mut Gate, options: UiOptions) -> ItemListResult<bool> {
    let mode = gate.login_form().mode();
    print_header(mode.title(), gate.session(), options);
    if let Some(message) = gate.login_form().error() {
        error_msg(message, options);
    }

    let choice = prompts::select(
        "Action",
        &[mode.title(), mode.toggle_hint(), "Quit"],
    )?;
    match choice {
        0 => {
            let email = prompts::input_with_default("Email", gate.login_form().email())?;
            let password = prompts::secure_password_prompt("Password: ")?;
            let form = gate.login_form_mut();
            form.set_email(email);
            form.set_password(password);
            if let Ok(identity) =
                with_spinner("Submitting...", options, gate.submit_login()).await
            {
                success(&format!("Signed in as {}.", identity.email), options);
            }
            Ok(true)
        }
        1 => {
            gate.login_form_mut().toggle_mode();
            Ok(true)
        }
        _ => Ok(false),
    }
}

async fn interactive_items(gate: &mut Gate, options: UiOptions) -> ItemListResult<bool> {
    print_header("Items", gate.session(), options);
    print_items(gate.item_list()?.items(), options)?;

    let choice = prompts::select(
        "Action",
        &["Add item", "Edit item", "Delete item", "Reload", "Sign out", "Quit"],
    )?;
    let outcome = match choice {
        0 => {
            let name = prompts::input("Name")?;
            let list = gate.item_list_mut()?;
            list.set_new_item_input(name);
            list.submit_new_item().await.map(|_| ())
        }
        1 => interactive_edit(gate).await,
        2 => interactive_delete(gate).await,
        3 => gate.item_list_mut()?.load().await,
        4 => gate.logout().await,
        _ => return Ok(false),
    };

    if let Err(err) = outcome {
        error_msg(&map_user_error(&err), options);
    }
    Ok(true)
}

fn pick_item(gate: &Gate, prompt: &str) -> ItemListResult<Option<String>> {
    let items = gate.item_list()?.items();
    if items.is_empty() {
        return Ok(None);
    }
    let labels = items
        .iter()
        .map(|item| format!("{}  {}", short_id(&item.id), item.name))
        .collect::<Vec<_>>();
    let index = prompts::select(prompt, &labels)?;
    Ok(items.get(index).map(|item| item.id.clone()))
}

async fn interactive_edit(gate: &mut Gate) -> ItemListResult<()> {
    let Some(id) = pick_item(gate, "Edit which item?")? else {
        return Ok(());
    };
    let list = gate.item_list_mut()?;
    if !list.begin_edit(&id) {
        return Ok(());
    }
    let current = list.draft().map(|draft| draft.name.clone()).unwrap_or_default();
    let name = prompts::input_with_default("Name", &current)?;
    list.set_draft_name(name);
    if !list.save_edit().await? {
        list.cancel_edit();
    }
    Ok(())
}

async fn interactive_delete(gate: &mut Gate) -> ItemListResult<()> {
    let Some(id) = pick_item(gate, "Delete which item?")? else {
        return Ok(());
    };
    if !prompts::confirmation_prompt("Delete this item?", false)? {
        return Ok(());
    }
    gate.item_list_mut()?.delete(&id).await
}

fn run_config(cli: &Cli, options: UiOptions) -> ItemListResult<()> {
    if options.json {
        let value = json!({
            "backend": cli.backend,
            "database_url": cli.database_url,
            "collection": cli.collection,
            "json": cli.json,
            "quiet": cli.quiet,
            "no_color": cli.no_color,
            "remote_timeout_secs": cli.remote_timeout_secs,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).map_err(|_| ItemListError::Serialization)?
        );
        return Ok(());
    }

    system(
        &format!("Backend: {}", backend_display(&cli.backend)),
        options,
    );
    system(&format!("Database URL: {}", cli.database_url), options);
    system(&format!("Collection: {}", cli.collection), options);
    system(&format!("JSON mode: {}", cli.json), options);
    system(&format!("Quiet mode: {}", cli.quiet), options);
    system(&format!("Color disabled: {}", cli.no_color), options);
    system(
        &format!("Remote timeout (sec): {}", cli.remote_timeout_secs),
        options,
    );
    Ok(())
}

fn backend_display(backend: &str) -> &'static str {
    match backend {
        "sqlite" => "SQLite (local)",
        "postgres" => "PostgreSQL",
        "mongo" => "MongoDB",
        _ => "Unsupported",
    }
}
