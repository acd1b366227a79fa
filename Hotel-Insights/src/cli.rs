use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use review_service_client::{ClientConfig, HotelId, SummaryOptions};
use summary_queue::RunnerConfig;

/// Hotel Insights - hotel reviews with AI summaries
#[derive(Parser, Debug)]
#[command(name = "hotel-insights")]
#[command(about = "Browse hotel reviews and generate AI review summaries", long_about = None)]
pub struct Cli {
    /// Base URL of the review service
    #[arg(long, env = "HOTEL_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "HOTEL_API_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List hotels with their overall sentiment
    Hotels {
        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Show a hotel with all of its reviews
    Hotel { id: HotelId },

    /// Classify the sentiment of arbitrary text
    Analyze { text: String },

    /// Submit a review for a hotel
    Review {
        hotel_id: HotelId,
        name: String,
        text: String,
    },

    /// Summarize one hotel's reviews right away
    Summarize {
        id: HotelId,

        #[command(flatten)]
        lengths: LengthArgs,
    },

    /// Summarize every hotel with reviews, one at a time
    SummarizeAll {
        /// Only these hotels (comma separated)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<HotelId>,

        /// Pause between two summary requests, in milliseconds
        #[arg(long, env = "SUMMARY_DELAY_MS", default_value_t = 1000)]
        delay_ms: u64,

        /// Give up on a single summary after this many seconds
        #[arg(long, default_value_t = 60)]
        call_timeout_secs: u64,

        #[command(flatten)]
        lengths: LengthArgs,
    },
}

#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthArgs {
    /// Upper bound on summary length
    #[arg(long, default_value_t = 100)]
    pub max_length: u32,

    /// Lower bound on summary length
    #[arg(long, default_value_t = 20)]
    pub min_length: u32,
}

impl From<LengthArgs> for SummaryOptions {
    fn from(args: LengthArgs) -> Self {
        SummaryOptions {
            max_length: args.max_length,
            min_length: args.min_length,
        }
    }
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::with_base_url(self.api_url.clone())
            .timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Runner settings for a batch run.
pub fn runner_config(delay_ms: u64, call_timeout_secs: u64) -> RunnerConfig {
    RunnerConfig::builder()
        .with_dispatch_delay(Duration::from_millis(delay_ms))
        .with_call_timeout(Duration::from_secs(call_timeout_secs))
        .build()
}
