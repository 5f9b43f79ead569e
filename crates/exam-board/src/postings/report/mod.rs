mod builder;
mod stats;
pub mod views;

pub use builder::{application_period, ViewModelBuilder};
pub use views::{
    GroupView, Presentation, RecordView, ScheduleEntry, ScheduleKind, TestStage, ViewItems,
    ViewMode, ViewModel, ViewParams, ViewStats,
};

#[cfg(test)]
pub(crate) use builder::record_view;
