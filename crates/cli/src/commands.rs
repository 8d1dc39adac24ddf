//! Subcommand implementations.

use std::path::Path;

use anyhow::{bail, Context};
use wizplat_client::ApiClient;
use wizplat_core::models::run::WizardRun;
use wizplat_core::models::template::TemplateFilters;
use wizplat_core::models::wizard::WizardFilters;
use wizplat_core::navigation::{navigation_for, Role};
use wizplat_core::types::EntityId;
use wizplat_player::{
    AdvanceOutcome, NavigationContext, RunController, RunStore, SaveOutcome, SavePrompt,
};

use crate::answers::{apply_answers, load_answers};

/// Page size used for the stored-runs listing.
const STORED_PAGE_SIZE: u32 = 100;

pub async fn list_wizards(client: &ApiClient) -> anyhow::Result<()> {
    let wizards = client.list_wizards(&WizardFilters::default()).await?;
    if wizards.is_empty() {
        println!("No wizards available.");
    }
    for wizard in wizards {
        let status = if wizard.is_published { "published" } else { "draft" };
        println!("{}  {:<40} {:>9}  {} sessions", wizard.id, wizard.name, status, wizard.total_sessions);
    }
    Ok(())
}

pub async fn list_runs(client: &ApiClient, stored: bool, favorites: bool) -> anyhow::Result<()> {
    let runs = match (stored, favorites) {
        (_, true) => client.favorite_runs().await?,
        (true, false) => client.stored_runs(0, STORED_PAGE_SIZE).await?,
        (false, false) => client.list_all_runs().await?,
    };
    if runs.is_empty() {
        println!("No runs found.");
    }
    for run in &runs {
        print_run(run);
    }
    Ok(())
}

fn print_run(run: &WizardRun) {
    println!(
        "{}  {:<30} {:<12} {:>5.1}%{}{}",
        run.id,
        run.run_name.as_deref().unwrap_or("(unnamed)"),
        run.status.as_str(),
        run.progress_percentage,
        if run.is_stored { "  stored" } else { "" },
        if run.is_favorite { "  *" } else { "" },
    );
}

pub async fn show_stats(client: &ApiClient) -> anyhow::Result<()> {
    let stats = client.run_stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub async fn list_templates(client: &ApiClient) -> anyhow::Result<()> {
    let page = client.list_templates(&TemplateFilters::default()).await?;
    for template in &page.templates {
        println!(
            "{}  {:<40} {}",
            template.id,
            template.template_name,
            template.category.as_deref().unwrap_or("-"),
        );
    }
    println!("{} of {} templates", page.templates.len(), page.total);
    Ok(())
}

pub async fn show_navigation(client: &ApiClient) -> anyhow::Result<()> {
    let user = client.current_user().await?;
    let role = Role::from_name(&user.role.name);
    println!("{} ({})", user.username, role.as_str());
    for item in navigation_for(role) {
        println!("  {:<20} {}", item.label, item.path);
    }
    Ok(())
}

pub async fn delete_run(client: &ApiClient, run_id: EntityId) -> anyhow::Result<()> {
    client.delete_run(run_id).await?;
    println!("Deleted run {run_id}");
    Ok(())
}

/// Start a new run of `wizard_id`, answer it from a file and decide the save.
pub async fn play(
    client: &ApiClient,
    wizard_id: EntityId,
    answers: &Path,
    name: Option<&str>,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let answers = load_answers(answers)?;
    let mut player =
        RunController::open(client.clone(), wizard_id, NavigationContext::new_run()).await?;
    let applied = apply_answers(&mut player, answers)?;
    tracing::info!(run_id = ?player.run_id(), answers = applied, "Playing wizard");

    let outcome = match drive_to_end(&mut player).await? {
        SavePrompt::NameNewRun => match name {
            Some(name) => player.save_new(name, description).await?,
            None => player.decline_save()?,
        },
        SavePrompt::EditChoice => bail!("A new run unexpectedly reopened a stored run"),
    };
    print_outcome(&outcome);
    Ok(())
}

/// Reopen a run, apply the answers on top of the stored ones and save.
///
/// A stored run is updated in place unless `save_as_new` names a copy. An
/// unsaved run is stored under `save_as_new` when given.
pub async fn resume(
    client: &ApiClient,
    run_id: EntityId,
    answers: &Path,
    save_as_new: Option<&str>,
) -> anyhow::Result<()> {
    let answers = load_answers(answers)?;
    let detail = client
        .get_run(run_id)
        .await
        .with_context(|| format!("Failed to load run {run_id}"))?;
    let mut player = RunController::open(
        client.clone(),
        detail.run.wizard_id,
        NavigationContext::resume(run_id),
    )
    .await?;
    apply_answers(&mut player, answers)?;

    let outcome = match (drive_to_end(&mut player).await?, save_as_new) {
        (SavePrompt::EditChoice, Some(name)) => player.save_as_new(name, None).await?,
        (SavePrompt::EditChoice, None) => player.update_in_place().await?,
        (SavePrompt::NameNewRun, Some(name)) => player.save_new(name, None).await?,
        (SavePrompt::NameNewRun, None) => player.decline_save()?,
    };
    print_outcome(&outcome);
    Ok(())
}

/// Advance until the end-of-wizard prompt. Skippable steps that fail
/// validation are skipped; any other invalid step aborts.
async fn drive_to_end<S: RunStore>(player: &mut RunController<S>) -> anyhow::Result<SavePrompt> {
    loop {
        let outcome = match player.advance().await? {
            AdvanceOutcome::Invalid(_) if player.current_step().is_skippable => {
                player.skip().await?
            }
            other => other,
        };

        match outcome {
            AdvanceOutcome::Moved { step_index } => {
                tracing::debug!(step_index, "Advanced");
            }
            AdvanceOutcome::AwaitingDecision(prompt) => return Ok(prompt),
            AdvanceOutcome::Invalid(errors) => {
                let step = player.current_step();
                let mut details: Vec<String> = step
                    .option_sets
                    .iter()
                    .filter_map(|os| errors.get(&os.id).map(|msg| format!("{}: {msg}", os.name)))
                    .collect();
                details.sort();
                bail!(
                    "Step \"{}\" is incomplete: {}",
                    step.name,
                    details.join("; ")
                );
            }
            AdvanceOutcome::EndOfWizard => bail!("Reached the end of a read-only run"),
        }
    }
}

fn print_outcome(outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Saved { run_id } => println!("Saved run {run_id}"),
        SaveOutcome::LeftUnsaved => println!("Run completed and left unsaved"),
        SaveOutcome::Discarded => println!("Changes discarded"),
        SaveOutcome::Updated { run_id } => println!("Updated run {run_id}"),
        SaveOutcome::SavedAsNew { run_id } => println!("Saved as new run {run_id}"),
    }
}
