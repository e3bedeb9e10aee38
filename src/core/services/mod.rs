pub mod aggregation;
pub mod goal_service;
pub mod month_service;
pub mod report_service;
pub mod settings_service;
pub mod transfer_service;

pub use goal_service::{GoalCalculator, GoalInput, GoalSummary, ServiceYear};
pub use month_service::{net_ministry_time, service_year_progress, MonthLedger};
pub use report_service::{Report, ReportService};
pub use settings_service::SettingsService;
pub use transfer_service::TransferService;
