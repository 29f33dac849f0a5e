pub mod color_extraction_service;
pub mod ranking_service;

pub use color_extraction_service::{ColorExtractionService, CANVAS_SIZE};
pub use ranking_service::{RankRequest, RankingMode, RankingService};
