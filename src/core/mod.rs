pub mod dashboard;
pub mod etl;
pub mod normalizer;
pub mod session;
pub mod translator;

pub use crate::domain::model::{ApiParameterSet, LeadRecord, LeadTable, ParameterSet, RawParameterSet};
pub use crate::domain::ports::{ConfigProvider, LeadSource, Storage};
pub use crate::utils::error::Result;
