pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::args::*;

#[cfg(feature = "cli")]
mod args {
    use crate::adapters::webhook::Destination;
    use crate::app::pipelines::{MatchRequest, SearchRequest};
    use crate::core::dashboard::DashboardFilter;
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    #[command(name = "lead-machine", version)]
    #[command(about = "Bulk lead processor: Apollo search URL in, normalized CSV out")]
    pub struct Cli {
        /// Path to TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        #[arg(long, global = true, env = "APOLLO_API_KEY", hide_env_values = true)]
        pub api_key: Option<String>,

        /// Override export.output_path from config
        #[arg(long, global = true)]
        pub output_path: Option<String>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Subcommand)]
    pub enum Command {
        /// Fetch leads for a pasted people-search URL
        Search(SearchArgs),
        /// Enrich a single person via people match
        Enrich(EnrichArgs),
        /// Upload any file to the generic webhook
        Upload(UploadArgs),
        /// Show lead dashboard metrics
        Dashboard(DashboardArgs),
        /// Print the API parameters a search URL translates to
        Translate(TranslateArgs),
    }

    #[derive(Debug, Args)]
    pub struct PaginationArgs {
        /// Page to fetch
        #[arg(long, default_value_t = 1)]
        pub page: u32,

        /// Results per page
        #[arg(long, default_value_t = 100)]
        pub per_page: u32,
    }

    #[derive(Debug, Args)]
    pub struct ForwardArgs {
        /// Skip writing the CSV file
        #[arg(long)]
        pub no_export: bool,

        /// CSV file name under the output path
        #[arg(long)]
        pub file_name: Option<String>,

        /// Intention sent along with the upload
        #[arg(long)]
        pub intention: Option<String>,
    }

    #[derive(Debug, Args)]
    pub struct SearchArgs {
        /// People search URL copied from the browser
        #[arg(long)]
        pub url: Option<String>,

        #[command(flatten)]
        pub pagination: PaginationArgs,

        /// Show the request that would be sent, without sending it
        #[arg(long)]
        pub dry_run: bool,

        /// Forward the CSV to a webhook after fetching
        #[arg(long, value_enum)]
        pub send: Option<Destination>,

        #[command(flatten)]
        pub forward: ForwardArgs,
    }

    impl SearchArgs {
        pub fn to_request(&self) -> SearchRequest {
            SearchRequest {
                ui_url: self.url.clone(),
                page: self.pagination.page,
                per_page: self.pagination.per_page,
            }
        }
    }

    #[derive(Debug, Args)]
    pub struct EnrichArgs {
        #[arg(long)]
        pub linkedin_url: Option<String>,
        #[arg(long)]
        pub first_name: Option<String>,
        #[arg(long)]
        pub last_name: Option<String>,
        /// Full name
        #[arg(long)]
        pub name: Option<String>,
        #[arg(long)]
        pub email: Option<String>,
        #[arg(long)]
        pub hashed_email: Option<String>,
        #[arg(long)]
        pub organization_name: Option<String>,
        #[arg(long)]
        pub domain: Option<String>,
        /// Apollo person ID
        #[arg(long = "person-id")]
        pub person_id: Option<String>,

        /// Do not reveal personal emails
        #[arg(long)]
        pub no_personal_emails: bool,

        /// Reveal phone numbers (delivered asynchronously to --webhook-url)
        #[arg(long)]
        pub reveal_phone_number: bool,

        /// Phone delivery webhook; defaults to the campaign webhook
        #[arg(long)]
        pub webhook_url: Option<String>,

        /// Add the enriched lead to the campaign after fetching
        #[arg(long)]
        pub add_to_campaign: bool,

        #[command(flatten)]
        pub forward: ForwardArgs,
    }

    impl EnrichArgs {
        pub fn to_request(&self, default_webhook: &str) -> MatchRequest {
            let webhook_url = if self.reveal_phone_number {
                Some(
                    self.webhook_url
                        .clone()
                        .unwrap_or_else(|| default_webhook.to_string()),
                )
            } else {
                self.webhook_url.clone()
            };

            MatchRequest {
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
                name: self.name.clone(),
                email: self.email.clone(),
                hashed_email: self.hashed_email.clone(),
                organization_name: self.organization_name.clone(),
                domain: self.domain.clone(),
                id: self.person_id.clone(),
                linkedin_url: self.linkedin_url.clone(),
                reveal_personal_emails: !self.no_personal_emails,
                reveal_phone_number: self.reveal_phone_number,
                webhook_url,
            }
        }
    }

    #[derive(Debug, Args)]
    pub struct UploadArgs {
        /// File to upload (any type)
        pub file: PathBuf,

        #[arg(long)]
        pub intention: Option<String>,
    }

    #[derive(Debug, Args)]
    pub struct DashboardArgs {
        /// Keep only these modes (repeatable)
        #[arg(long = "mode")]
        pub modes: Vec<String>,

        /// Keep only these statuses (repeatable)
        #[arg(long = "status")]
        pub statuses: Vec<String>,

        /// Print up to this many filtered rows
        #[arg(long, default_value_t = 20)]
        pub rows: usize,
    }

    impl DashboardArgs {
        pub fn to_filter(&self) -> DashboardFilter {
            DashboardFilter {
                modes: (!self.modes.is_empty()).then(|| self.modes.clone()),
                statuses: (!self.statuses.is_empty()).then(|| self.statuses.clone()),
            }
        }
    }

    #[derive(Debug, Args)]
    pub struct TranslateArgs {
        /// People search URL copied from the browser
        pub url: String,

        #[command(flatten)]
        pub pagination: PaginationArgs,
    }

}
