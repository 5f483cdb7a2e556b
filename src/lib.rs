pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{apollo::ApolloClient, dashboard::DashboardClient, webhook::WebhookForwarder};
pub use config::{cli::LocalStorage, toml_config::LeadConfig};
pub use core::{
    etl::{FetchOutcome, LeadEngine},
    normalizer::{normalize, FixedSchema, NormalizeMode},
    session::{LeadSession, TableKind},
    translator::translate,
};
pub use domain::model::{LeadRecord, LeadTable, ParameterSet};
pub use utils::error::{LeadError, Result};

#[cfg(feature = "cli")]
pub use config::Cli;
