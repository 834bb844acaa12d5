pub mod leads;
pub mod settings;

pub use leads::{LeadNew, LeadsRepo, ScanPage};
pub use settings::SettingsRepo;
