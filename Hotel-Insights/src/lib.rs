//! # Hotel Insights
//!
//! Console front end for the hotel review service. Browses hotels and
//! reviews, submits reviews, classifies text, and generates AI review
//! summaries one hotel at a time through [`summary_queue`].

pub mod app;
pub mod cli;
pub mod logging;
pub mod render;
pub mod summarizer;

pub use app::{select_hotels, summarize_all, HotelController};
pub use summarizer::{enrich_error, work_set, HotelSummarizer, NO_REVIEWS};
