pub mod services;

pub use services::{ColorExtractionService, RankingMode, RankingService};
