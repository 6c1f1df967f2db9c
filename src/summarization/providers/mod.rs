pub mod analyze_meeting;

pub use analyze_meeting::AnalyzeMeetingProvider;
