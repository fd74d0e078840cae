//! Console front-end for the mini CRM core.
//!
//! # Responsibility
//! - Parse command-line options into coordinator calls.
//! - Render leads and opportunities as plain text tables.
//!
//! Every run seeds a fresh in-memory store; `--rng-seed` keeps ids stable
//! between runs so `show`, `update` and `convert` can target them.

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use log::error;
use minicrm_core::format::{format_currency, format_relative_date, format_score, format_source};
use minicrm_core::{
    init_logging_with, Coordinator, InMemoryLeadRepository, Lead, LeadFilters, LeadFiltersPatch,
    LeadPatch, LeadService, LeadSource, LeadStatus, LogOptions, MemoryPreferenceStore,
    Opportunity, OpportunityPatch, OpportunityStage, PreferenceStore, Preferences, SortDirection,
    SortField, SortOptionsPatch, SqlitePreferenceStore,
};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "minicrm", version, about = "Browse, edit and convert sales leads")]
struct Cli {
    /// Number of synthetic leads to seed.
    #[arg(long, default_value_t = 100)]
    seed_count: usize,

    /// RNG seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    rng_seed: u64,

    /// SQLite file used to remember filters and sort options.
    #[arg(long)]
    prefs_db: Option<String>,

    #[arg(long, default_value_t = minicrm_core::default_log_level().to_string())]
    log_level: String,

    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search, filter and sort leads.
    List(ListArgs),
    /// Show one lead.
    Show { id: String },
    /// Edit fields of one lead.
    Update(UpdateArgs),
    /// Convert a lead into an opportunity.
    Convert(ConvertArgs),
    /// List opportunities.
    Opportunities,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive text matched against name, company and email.
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<LeadStatus>,
    #[arg(long, value_parser = parse_source)]
    source: Option<LeadSource>,
    /// Drop persisted filters before searching.
    #[arg(long)]
    clear_filters: bool,
    #[arg(long, value_parser = parse_field)]
    sort: Option<SortField>,
    #[arg(long, value_parser = parse_direction)]
    direction: Option<SortDirection>,
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    score: Option<i32>,
    #[arg(long, value_parser = parse_status)]
    status: Option<LeadStatus>,
    #[arg(long, value_parser = parse_source)]
    source: Option<LeadSource>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    account_name: Option<String>,
    #[arg(long, value_parser = parse_stage)]
    stage: Option<OpportunityStage>,
    #[arg(long)]
    amount: Option<f64>,
}

fn parse_status(value: &str) -> Result<LeadStatus, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_source(value: &str) -> Result<LeadSource, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_stage(value: &str) -> Result<OpportunityStage, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_field(value: &str) -> Result<SortField, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_direction(value: &str) -> Result<SortDirection, String> {
    value.parse().map_err(|err| format!("{err}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let options = LogOptions {
            echo_warnings: true,
        };
        if let Err(err) = init_logging_with(&cli.log_level, log_dir, options) {
            eprintln!("logging disabled: {err}");
        }
    }

    let service = Arc::new(LeadService::new(InMemoryLeadRepository::seeded(
        cli.seed_count,
        cli.rng_seed,
    )));

    let outcome = match cli.prefs_db.as_deref() {
        Some(path) => match SqlitePreferenceStore::open(path) {
            Ok(store) => run(Coordinator::new(service, Preferences::new(store)), cli.command).await,
            Err(err) => Err(format!("cannot open preference database `{path}`: {err}")),
        },
        None => {
            let prefs = Preferences::new(MemoryPreferenceStore::new());
            run(Coordinator::new(service, prefs), cli.command).await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_command module=cli status=error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run<P: PreferenceStore>(
    coordinator: Coordinator<InMemoryLeadRepository, P>,
    command: Command,
) -> Result<(), String> {
    coordinator.load_initial_data().await;
    if let Some(message) = coordinator.error() {
        return Err(message);
    }

    match command {
        Command::List(args) => list(&coordinator, args).await,
        Command::Show { id } => {
            let lead = find_lead(&coordinator, &id)?;
            print_lead_detail(&lead);
            Ok(())
        }
        Command::Update(args) => {
            let updates = LeadPatch {
                name: args.name,
                company: args.company,
                email: args.email,
                source: args.source,
                score: args.score,
                status: args.status,
                ..LeadPatch::default()
            };
            let lead = coordinator
                .update_lead(&args.id, updates)
                .await
                .map_err(|err| err.to_string())?;
            print_lead_detail(&lead);
            Ok(())
        }
        Command::Convert(args) => {
            let lead = find_lead(&coordinator, &args.id)?;
            if lead.is_converted() {
                return Err(format!("lead {} is already converted", lead.id));
            }
            let data = OpportunityPatch {
                name: args.name,
                account_name: args.account_name,
                stage: args.stage,
                amount: args.amount,
                ..OpportunityPatch::default()
            };
            let opportunity = coordinator
                .convert_to_opportunity(&args.id, data)
                .await
                .map_err(|err| err.to_string())?;
            print_opportunities(&[opportunity]);
            Ok(())
        }
        Command::Opportunities => {
            print_opportunities(&coordinator.opportunities());
            Ok(())
        }
    }
}

async fn list<P: PreferenceStore>(
    coordinator: &Coordinator<InMemoryLeadRepository, P>,
    args: ListArgs,
) -> Result<(), String> {
    if args.clear_filters {
        coordinator.set_filters(LeadFiltersPatch {
            status: Some(None),
            source: Some(None),
        });
    }
    if args.status.is_some() || args.source.is_some() {
        coordinator.set_filters(LeadFiltersPatch {
            status: args.status.map(Some),
            source: args.source.map(Some),
        });
    }
    if args.sort.is_some() || args.direction.is_some() {
        coordinator.set_sort_options(SortOptionsPatch {
            field: args.sort,
            direction: args.direction,
        });
    }
    if let Some(query) = args.query {
        coordinator.set_search_query(query);
    }

    coordinator.refresh_search().await;
    let state = coordinator.snapshot();
    if let Some(message) = state.error {
        return Err(message);
    }

    print_filters(&state.search_query, &state.filters);
    println!(
        "sorted by {} {} | {} match(es)",
        state.sort_options.field,
        state.sort_options.direction.as_str(),
        state.leads.len()
    );
    print_leads(state.leads.iter().take(args.limit));
    Ok(())
}

fn find_lead<P: PreferenceStore>(
    coordinator: &Coordinator<InMemoryLeadRepository, P>,
    id: &str,
) -> Result<Lead, String> {
    coordinator
        .leads()
        .into_iter()
        .find(|lead| lead.id == id)
        .ok_or_else(|| format!("Lead not found: {id}"))
}

fn print_filters(query: &str, filters: &LeadFilters) {
    println!(
        "query=\"{}\" status={} source={}",
        query,
        filters.status.map_or("all", |status| status.as_str()),
        filters.source.map_or("all", |source| source.as_str())
    );
}

fn print_leads<'a>(leads: impl Iterator<Item = &'a Lead>) {
    println!(
        "{:<36}  {:<20}  {:<18}  {:>7}  {:<11}  {:<14}",
        "ID", "NAME", "COMPANY", "SCORE", "STATUS", "SOURCE"
    );
    for lead in leads {
        println!(
            "{:<36}  {:<20}  {:<18}  {:>7}  {:<11}  {:<14}",
            lead.id,
            lead.name,
            lead.company,
            format_score(lead.score),
            lead.status.as_str(),
            format_source(lead.source.as_str())
        );
    }
}

fn print_lead_detail(lead: &Lead) {
    let now = Utc::now();
    println!("id:       {}", lead.id);
    println!("name:     {}", lead.name);
    println!("company:  {}", lead.company);
    println!("email:    {}", lead.email);
    println!("source:   {}", format_source(lead.source.as_str()));
    println!("score:    {}", format_score(lead.score));
    println!("status:   {}", lead.status);
    println!("created:  {}", format_relative_date(lead.created_at, now));
    println!("updated:  {}", format_relative_date(lead.updated_at, now));
}

fn print_opportunities(opportunities: &[Opportunity]) {
    println!(
        "{:<40}  {:<20}  {:<18}  {:<13}  {:>12}",
        "ID", "NAME", "ACCOUNT", "STAGE", "AMOUNT"
    );
    for opportunity in opportunities {
        println!(
            "{:<40}  {:<20}  {:<18}  {:<13}  {:>12}",
            opportunity.id,
            opportunity.name,
            opportunity.account_name,
            opportunity.stage.as_str(),
            format_currency(opportunity.amount)
        );
    }
}
