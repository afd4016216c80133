//! Command execution.

use crate::cli::{BatchArgs, ExtractArgs, ExtractFileArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::fetch;
use crate::output::Formatter;
use newshound_domain::normalize_source;
use newshound_domain::traits::ProfileStore;
use newshound_extractor::{Page, Resolution, Resolver};
use newshound_llm::OpenAiGenerator;
use newshound_store::SqliteStore;
use newshound_validator::{FieldValidator, KeywordOverlap};
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Fetch a URL and resolve it.
pub fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    extract_url(&args.url, args.no_direct, config, api_key, formatter)
}

/// Resolve every URL listed in a file, pausing between requests.
///
/// A failed URL is reported and counted but does not stop the batch.
pub fn execute_batch(
    args: BatchArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let listing = fs::read_to_string(&args.path)?;
    let urls = batch_urls(&listing);
    if urls.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "no URLs found in '{}'",
            args.path.display()
        )));
    }

    let delay = Duration::from_secs(args.delay_secs);
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for (i, url) in urls.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }
        println!("[{}/{}] {url}", i + 1, urls.len());
        match extract_url(url, args.no_direct, config, api_key, formatter) {
            Ok(()) => succeeded += 1,
            Err(e) => {
                failed += 1;
                println!("{}", formatter.error(&format!("{url}: {e}")));
            }
        }
    }

    println!(
        "{}",
        formatter.success(&format!(
            "batch finished: {succeeded} succeeded, {failed} failed"
        ))
    );
    Ok(())
}

/// URLs from a batch listing: trimmed lines, minus blanks and `#` comments.
fn batch_urls(listing: &str) -> Vec<&str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

fn extract_url(
    url: &str,
    no_direct: bool,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let source = source_of(url)?;
    let html = fetch::fetch(url)?;
    let resolution = resolve_html(&html, &source, url, no_direct, config, api_key)?;
    report(&resolution, config, formatter)
}

/// Resolve a saved HTML file.
pub fn execute_extract_file(
    args: ExtractFileArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let source = source_of(&args.url)?;
    let html = fs::read_to_string(&args.path)?;
    let resolution = resolve_html(&html, &source, &args.url, args.no_direct, config, api_key)?;
    report(&resolution, config, formatter)
}

fn report(resolution: &Resolution, config: &Config, formatter: &Formatter) -> Result<()> {
    print!("{}", formatter.format_resolution(resolution));
    let all_time = open_store(config)?.generation_calls()?;
    println!(
        "generation calls: {} this run, {all_time} all time",
        resolution.generation_calls
    );
    Ok(())
}

/// Show the learned profile for a source.
pub fn execute_show(source: &str, config: &Config, formatter: &Formatter) -> Result<()> {
    // Accept either a bare source or a full article URL.
    let source = normalize_source(source).unwrap_or_else(|| source.trim().to_lowercase());
    let store = open_store(config)?;
    match store.lookup(&source)? {
        Some(profile) => print!("{}", formatter.format_profile(&profile)),
        None => println!("{}", formatter.warning(&format!("source '{source}' has not been seen"))),
    }
    Ok(())
}

/// Show persisted pipeline statistics.
pub fn execute_stats(config: &Config, formatter: &Formatter) -> Result<()> {
    let database = config.database_path()?;
    let store = open_store(config)?;
    let calls = store.generation_calls()?;
    print!("{}", formatter.format_stats(calls, &database));
    Ok(())
}

fn source_of(url: &str) -> Result<String> {
    normalize_source(url)
        .ok_or_else(|| CliError::InvalidInput(format!("cannot derive a source from '{url}'")))
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(SqliteStore::open(path)?)
}

fn resolve_html(
    html: &str,
    source: &str,
    url: &str,
    no_direct: bool,
    config: &Config,
    api_key: Option<&str>,
) -> Result<Resolution> {
    let mut resolver_config = config.resolver.clone();
    if no_direct {
        resolver_config.direct_fallback = false;
    }

    let key = config.api_key(api_key)?;
    let generator = OpenAiGenerator::new(&config.llm.endpoint, key, &config.llm.model)?;
    let store = Arc::new(Mutex::new(open_store(config)?));

    let resolver = Resolver::new(
        generator,
        store,
        FieldValidator::new(config.validation.clone()),
        KeywordOverlap::new(),
        resolver_config,
    )?;

    let page = Page::parse(html);
    Ok(resolver.resolve(&page, source, url)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_listing_skips_blanks_and_comments() {
        let listing = "https://a.example/1\n\n# queued for later\n  https://b.example/2  \n";
        assert_eq!(
            batch_urls(listing),
            vec!["https://a.example/1", "https://b.example/2"]
        );
    }

    #[test]
    fn batch_listing_of_only_comments_is_empty() {
        assert!(batch_urls("# nothing yet\n\n").is_empty());
    }
}
