//! One-shot CLI for the Search Console provider: `list-sites` and
//! `search-analytics`, printing JSON to stdout.

use std::env;
use std::io;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use searchlens::config;
use searchlens::models::{AnalyticsQuery, DateRange, Site, SiteList};
use searchlens::services::gsc::client::parse_wire_date;
use searchlens::services::gsc::{AnalyticsProvider, GscClient, PaginatedAnalyticsFetcher};

const USAGE: &str = "Usage:\n  gsc list-sites\n  gsc search-analytics --site-url <url> --start-date <YYYY-MM-DD> --end-date <YYYY-MM-DD> \
[--dimensions query,page] [--type web] [--aggregation-type auto] [--row-limit 1000] [--fetch-all]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let command = match args.next() {
        Some(command) => command,
        None => bail!("{USAGE}"),
    };

    let app_config = config::load_or_default()?;
    let credentials = app_config.google.credentials_file()?;
    let client = GscClient::new(&credentials)?;

    match command.as_str() {
        "list-sites" => {
            let sites = client.list_sites()?;
            print_json(&SiteList::new(sites))
        }
        "search-analytics" => {
            let parsed = QueryArgs::parse(args, app_config.fetch.row_limit)?;
            let fetcher = PaginatedAnalyticsFetcher::new();
            let result = fetcher.fetch(&client, &parsed.query, parsed.fetch_all)?;
            print_json(&result)
        }
        other => bail!("Unknown command `{other}`.\n{USAGE}"),
    }
}

struct QueryArgs {
    query: AnalyticsQuery,
    fetch_all: bool,
}

impl QueryArgs {
    fn parse(mut args: impl Iterator<Item = String>, default_row_limit: usize) -> Result<Self> {
        let mut site_url = None;
        let mut start_date = None;
        let mut end_date = None;
        let mut dimensions = Vec::new();
        let mut search_type = None;
        let mut aggregation_type = None;
        let mut row_limit = default_row_limit;
        let mut fetch_all = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--site-url" => site_url = Some(required(&mut args, "--site-url")?),
                "--start-date" => {
                    start_date = Some(parse_wire_date(&required(&mut args, "--start-date")?)?)
                }
                "--end-date" => {
                    end_date = Some(parse_wire_date(&required(&mut args, "--end-date")?)?)
                }
                "--dimensions" => {
                    dimensions.clear();
                    for entry in required(&mut args, "--dimensions")?.split(',') {
                        let entry = entry.trim();
                        if !entry.is_empty() && !dimensions.iter().any(|d| d == entry) {
                            dimensions.push(entry.to_string());
                        }
                    }
                }
                "--type" => search_type = Some(required(&mut args, "--type")?.parse()?),
                "--aggregation-type" => {
                    aggregation_type = Some(required(&mut args, "--aggregation-type")?.parse()?)
                }
                "--row-limit" => {
                    row_limit = required(&mut args, "--row-limit")?
                        .parse()
                        .context("--row-limit must be a positive integer")?;
                    if row_limit == 0 {
                        bail!("--row-limit must be a positive integer");
                    }
                }
                "--fetch-all" => fetch_all = true,
                other => bail!("Unknown flag `{other}`.\n{USAGE}"),
            }
        }

        let site_url = site_url.context("--site-url is required")?;
        let start = start_date.context("--start-date is required")?;
        let end = end_date.context("--end-date is required")?;
        if start > end {
            bail!("--start-date must not be after --end-date");
        }

        Ok(Self {
            query: AnalyticsQuery {
                site: Site::new(site_url, ""),
                range: DateRange::new(start, end),
                dimensions,
                search_type,
                aggregation_type,
                row_limit,
            },
            fetch_all,
        })
    }
}

fn required(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("Missing value for {flag}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
