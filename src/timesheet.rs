//! Timesheet cleaning job.
//!
//! Reads raw time entries from CSV, drops entries without a clock-in or
//! clock-out, normalizes the device, computes the worked duration and
//! converts the amount to USD. The cleaned entries are written back as CSV
//! together with a small JSON report.
//!
//! ```csv
//! user_id,organization_id,time_in,time_out,device,currency,amount
//! u1,org1,2024-01-15 09:00:00,2024-01-15 10:30:00,desktop,MYR,100
//! ```
//!
//! The job shares no state with ticket triage.

mod cleaner;
mod device;
mod entry;

pub use cleaner::{
    CleaningConfig, CleaningOutcome, CleaningReport, DEFAULT_CLEAN_OUTPUT, DEFAULT_REPORT_OUTPUT,
    TimesheetCleaner, write_entries, write_report,
};
pub use device::Device;
pub use entry::{CleanEntry, RawEntry, parse_timestamp};
