use anyhow::Result;
use indicatif::MultiProgress;
use std::path::PathBuf;
use std::sync::Arc;
use tweet_topk::{set_global_multiprogress, DailyTopAuthor, Strategy, TopK, TweetETL, DEFAULT_SOURCE};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TWEETS_PATH").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));

    set_global_multiprogress(Arc::new(MultiProgress::new()));
    let base = TweetETL::new().source(&path).progress(true);

    let profile = base.profile()?;
    println!("Profile: {}", serde_json::to_string_pretty(&profile)?);

    let mut runs: Vec<(Vec<DailyTopAuthor>, TopK, TopK)> = Vec::new();
    for strategy in [Strategy::Time, Strategy::Memory] {
        let etl = base.clone().strategy(strategy);
        let dates = etl.top_dates()?;
        let emojis = etl.top_emojis()?;
        let mentions = etl.top_mentions()?;

        println!("\n== {strategy:?} strategy ==");
        println!("Top dates:");
        for row in &dates {
            println!("  {}  {:>7}  {} ({})", row.day, row.day_count, row.author, row.author_count);
        }
        println!("Top emojis:");
        for (emoji, n) in &emojis {
            println!("  {emoji}  {n}");
        }
        println!("Top mentions:");
        for (handle, n) in &mentions {
            println!("  {handle}  {n}");
        }
        runs.push((dates, emojis, mentions));
    }

    if runs.windows(2).any(|w| w[0] != w[1]) {
        tracing::warn!("time and memory strategies disagree on {}", path.display());
    }
    Ok(())
}
