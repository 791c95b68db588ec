use std::io::{self, Write};

use crate::crawler::strangerthings::QuoteFetcher;

pub mod config;
pub mod crawler;
pub mod logging;
pub mod quote;
pub mod report;
pub mod util;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let mut out = io::stdout();

    let quotes = QuoteFetcher::from_settings().visit(&mut out).await;
    logging::info_file_async(format!("Fetched {} quotes", quotes.len()));

    if let Err(why) = report::print_quotes(&quotes, &mut out).and_then(|_| out.flush()) {
        logging::error_console(format!("Failed to print quotes because {:?}", why));
    }

    // 背景線程不會等待，結束前把日誌寫完
    util::http::flush_log();
    logging::flush();
}
