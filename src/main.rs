use clap::Parser;
use lead_machine::adapters::webhook::{Destination, ForwardOutcome};
use lead_machine::app::handlers;
use lead_machine::config::{Command, DashboardArgs, EnrichArgs, ForwardArgs, SearchArgs};
use lead_machine::core::dashboard::DashboardSummary;
use lead_machine::core::translator::{build_search_url, extract_raw_params};
use lead_machine::domain::model::cell_text;
use lead_machine::utils::error::ErrorSeverity;
use lead_machine::utils::{logger, validation::Validate};
use lead_machine::{
    ApolloClient, Cli, DashboardClient, FetchOutcome, LeadConfig, LeadError, LeadSession,
    LeadTable, LocalStorage, Result, WebhookForwarder,
};
use std::num::NonZeroU32;

const PREVIEW_ROWS: usize = 5;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting lead-machine CLI");
    if cli.verbose {
        tracing::debug!("Command: {:?}", cli.command);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn load_config(cli: &Cli) -> Result<LeadConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path.display());
            LeadConfig::from_file(path)?
        }
        None => LeadConfig::default(),
    };

    if let Some(key) = &cli.api_key {
        config.apollo.api_key = Some(key.clone());
    }
    if let Some(path) = &cli.output_path {
        config.export.output_path = path.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let mut session = LeadSession::new();

    match cli.command {
        Command::Search(args) => search(&config, &mut session, args).await,
        Command::Enrich(args) => enrich(&config, &mut session, args).await,
        Command::Upload(args) => {
            let storage = LocalStorage::new(".".to_string());
            let forwarder = WebhookForwarder::new(config.webhooks.clone());
            let path = args.file.to_string_lossy();
            let outcome = handlers::upload_file(
                &storage,
                &forwarder,
                &path,
                args.intention.as_deref(),
            )
            .await?;
            report_outcome(Destination::Upload, &outcome);
            Ok(())
        }
        Command::Dashboard(args) => dashboard(&config, &args).await,
        Command::Translate(args) => {
            let raw = extract_raw_params(&args.url)?;
            let params = lead_machine::translate(
                &raw,
                non_zero("page", args.pagination.page)?,
                non_zero("per_page", args.pagination.per_page)?,
            );
            for (key, values) in params.iter() {
                println!("{} = {}", key, values.join(", "));
            }
            println!();
            println!("{}", build_search_url(&config.apollo.search_endpoint, &params)?);
            Ok(())
        }
    }
}

fn non_zero(field: &str, value: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(value).ok_or_else(|| LeadError::validation(format!("{} must be at least 1", field)))
}

async fn search(config: &LeadConfig, session: &mut LeadSession, args: SearchArgs) -> Result<()> {
    let request = args.to_request();

    if args.dry_run {
        let params = request.api_params()?;
        let url = build_search_url(&config.apollo.search_endpoint, &params)?;
        println!("POST {}", url);
        return Ok(());
    }

    let client = ApolloClient::from_config(config)?;
    let outcome = handlers::fetch_search(session, client, &request).await?;
    if !report_fetch(session, outcome) {
        return Ok(());
    }

    finish(config, session, &args.forward, args.send).await
}

async fn enrich(config: &LeadConfig, session: &mut LeadSession, args: EnrichArgs) -> Result<()> {
    let client = ApolloClient::from_config(config)?;
    let request = args.to_request(&config.webhooks.campaign);
    let outcome = handlers::fetch_enrichment(session, client, request).await?;
    if !report_fetch(session, outcome) {
        return Ok(());
    }

    let send = args.add_to_campaign.then_some(Destination::Campaign);
    finish(config, session, &args.forward, send).await
}

/// Prints the fetch result. Returns whether the session now holds a table.
fn report_fetch(session: &LeadSession, outcome: FetchOutcome) -> bool {
    match outcome {
        FetchOutcome::Fetched { rows, columns } => {
            println!("✅ Retrieved {} leads ({} columns)", rows, columns);
            if let Some(table) = session.table() {
                print_preview(table, PREVIEW_ROWS);
            }
            true
        }
        FetchOutcome::Empty => {
            println!("⚠ No people found for this query.");
            false
        }
    }
}

/// Export and forwarding steps shared by search and enrich.
async fn finish(
    config: &LeadConfig,
    session: &mut LeadSession,
    forward: &ForwardArgs,
    send: Option<Destination>,
) -> Result<()> {
    if !forward.no_export {
        let storage = LocalStorage::new(config.export.output_path.clone());
        let path = handlers::export_csv(session, &storage, forward.file_name.as_deref()).await?;
        println!("📁 CSV saved to: {}", path);
    }

    if let Some(destination) = send {
        if let Some(intention) = &forward.intention {
            session.set_intention(intention.clone());
        }
        let forwarder = WebhookForwarder::new(config.webhooks.clone());
        let outcome = handlers::send_table(session, &forwarder, destination).await?;
        report_outcome(destination, &outcome);
    }

    Ok(())
}

fn report_outcome(destination: Destination, outcome: &ForwardOutcome) {
    if outcome.success {
        println!("✅ Sent to {}!", destination.label());
        if !outcome.message.trim().is_empty() {
            println!("{}", outcome.message);
        }
    } else {
        eprintln!("❌ {} webhook failed: {}", destination.label(), outcome.message);
    }
}

async fn dashboard(config: &LeadConfig, args: &DashboardArgs) -> Result<()> {
    let client = DashboardClient::new(config.dashboard.full_list_endpoint.clone());
    let summary = handlers::load_dashboard(&client, &args.to_filter()).await?;
    print_dashboard(&summary, args.rows);
    Ok(())
}

fn print_dashboard(summary: &DashboardSummary, rows: usize) {
    println!("📊 Lead Dashboard");
    println!("Total leads:    {}", summary.total);
    println!("Filtered leads: {}", summary.filtered.len());
    println!("Replied:        {}", summary.replied);

    print_counts("By mode", &summary.mode_counts);
    print_counts("By status", &summary.status_counts);
    if let Some(activity) = &summary.email_activity {
        print_counts("Emails per hour (UTC)", activity);
    }

    println!();
    print_preview(&summary.filtered, rows);
}

fn print_counts(title: &str, counts: &[(String, usize)]) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for (value, count) in counts {
        println!("  {:<24} {}", value, count);
    }
}

fn print_preview(table: &LeadTable, limit: usize) {
    if table.columns().is_empty() {
        return;
    }
    println!("{}", table.columns().join(" | "));
    for row in table.rows().iter().take(limit) {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        println!("{}", cells.join(" | "));
    }
    if table.len() > limit {
        println!("... {} more rows", table.len() - limit);
    }
}
