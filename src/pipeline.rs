use crate::api::Transport;
use crate::collectors::{Collector, FollowerCollector, ReplyCollector, RetweetCollector};
use crate::config::GiveawayConfig;
use crate::error::Result;
use crate::fetcher::Paginator;
use crate::model::{format_api_time, AccountRef, EngagementEvent, WinnerRecord};
use crate::reconcile::{qualified, reconcile};
use crate::report;
use crate::selector::{Qualified, Selector};
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub enum Outcome {
    Winner {
        winner: Box<WinnerRecord>,
        qualified: usize,
    },
    NoQualifiedEntries,
}

/// A giveaway whose host account has been resolved and is ready to draw.
pub struct Giveaway {
    config: GiveawayConfig,
    host: AccountRef,
    paginator: Paginator,
}

impl Giveaway {
    pub async fn prepare(config: GiveawayConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let host = crate::resolver::resolve_account(
            transport.as_ref(),
            &config.api.base_url,
            &config.host,
        )
        .await?;
        tracing::debug!(handle = %config.host, id = %host.id, "resolved host account");

        let paginator = Paginator::new(
            transport,
            config.api.base_url.clone(),
            config.api.page_delay,
        );

        Ok(Self {
            config,
            host,
            paginator,
        })
    }

    pub fn host(&self) -> &AccountRef {
        &self.host
    }

    pub fn config(&self) -> &GiveawayConfig {
        &self.config
    }

    /// Collect all three signals, reconcile them and draw a winner.
    pub async fn pick_winner(&self) -> Result<Outcome> {
        let retweets = self
            .run(&RetweetCollector::new(
                self.config.host.clone(),
                self.config.post_id.clone(),
                self.config.window,
            ))
            .await?;
        let replies = self
            .run(&ReplyCollector::new(
                self.config.post_id.clone(),
                self.config.hashtag.clone(),
            ))
            .await?;
        let follows = self
            .run(&FollowerCollector::new(self.host.id.clone()))
            .await?;

        let users = reconcile(&retweets, &replies, &follows);
        let entrants = qualified(&users);
        tracing::info!(
            accounts = users.len(),
            qualified = entrants.len(),
            "reconciled engagement"
        );

        if self.config.output.csv {
            report::save_qualified_csv(&self.config.output.csv_filename, &entrants)?;
        }

        let Some(entrants) = Qualified::new(entrants) else {
            return Ok(Outcome::NoQualifiedEntries);
        };
        let count = entrants.entries().len();

        let record = Selector::new(self.config.api.shuffle_iterations).select(entrants);
        let winner = WinnerRecord::from_record(record)?;

        Ok(Outcome::Winner {
            winner: Box::new(winner),
            qualified: count,
        })
    }

    async fn run(&self, collector: &dyn Collector) -> Result<Vec<EngagementEvent>> {
        tracing::info!("Retrieving {}", collector.label());
        let events = collector.collect(&self.paginator).await?;
        tracing::info!(count = events.len(), "Found {} {}.", events.len(), collector.label());
        Ok(events)
    }
}

impl fmt::Display for Giveaway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 35;
        let config = &self.config;
        let rows = [
            ("Username:", config.host.to_string()),
            ("UserID:", self.host.id.to_string()),
            ("Giveaway Hashtag:", config.hashtag.to_string()),
            ("Giveaway Tweet URL:", config.post_url.clone()),
            ("Giveaway Tweet ID:", config.post_id.to_string()),
            ("Giveaway Start Date:", format_api_time(config.window.start())),
            ("Giveaway End Date:", format_api_time(config.window.end())),
            ("Output Qualified List:", config.output.csv.to_string()),
        ];

        for (label, value) in rows {
            writeln!(f, "     {:<WIDTH$}{}", label, value)?;
        }
        if config.output.csv {
            writeln!(
                f,
                "     {:<WIDTH$}{}",
                "Qualified List Filename:",
                config.output.csv_filename.display()
            )?;
        }
        Ok(())
    }
}
