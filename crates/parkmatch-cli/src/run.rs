//! Command handlers: load inputs, run the matcher, write results.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use parkmatch_core::{
    AppConfig, LocationRecord, MatchCriteria, MatchedLocation, Provider, ProvidersFile,
};
use parkmatch_matcher::LocationMatcher;
use parkmatch_providers::{build_connectors, collect_locations, HttpOptions, SearchParams};

use crate::MatchingArgs;

pub(crate) struct SearchRequest<'a> {
    pub airport: &'a str,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub providers: Option<&'a Path>,
    pub only: &'a [Provider],
    pub records: Option<&'a Path>,
}

/// Cluster records read from `input`.
///
/// # Errors
///
/// Returns an error if the criteria or input cannot be loaded, or an output
/// file cannot be written.
pub(crate) fn run_match(
    config: &AppConfig,
    input: &Path,
    args: &MatchingArgs,
) -> anyhow::Result<()> {
    let criteria = resolve_criteria(config, args)?;
    let records = read_records(input)?;
    tracing::info!(path = %input.display(), records = records.len(), "loaded location records");

    let matches = match_records(records, &criteria, args.sort_input);
    emit(&matches, &criteria, args)
}

/// Search every enabled provider, then cluster what came back.
///
/// # Errors
///
/// Returns an error on an invalid search window, unreadable configuration,
/// when every provider fails, or when an output file cannot be written.
/// Individual provider failures are logged and skipped.
pub(crate) async fn run_search(
    config: &AppConfig,
    search: &SearchRequest<'_>,
    args: &MatchingArgs,
) -> anyhow::Result<()> {
    let criteria = resolve_criteria(config, args)?;
    let params = SearchParams::new(search.airport, search.start, search.end)?;

    let providers_path = search.providers.unwrap_or(config.providers_path.as_path());
    let mut providers = parkmatch_core::load_providers(providers_path)?;
    restrict_providers(&mut providers, search.only);
    let connectors = build_connectors(&providers, &HttpOptions::from(config))?;
    if connectors.is_empty() {
        anyhow::bail!(
            "no enabled providers in {}",
            providers_path.display()
        );
    }

    let collected =
        collect_locations(&connectors, &params, config.max_concurrent_providers).await;

    for outcome in &collected.outcomes {
        match &outcome.error {
            None => eprintln!("  \u{2713} {:<30} {:>4} listings", outcome.provider, outcome.records),
            Some(err) => eprintln!("  \u{2717} {:<30} {err}", outcome.provider),
        }
    }
    if collected.failed() == connectors.len() {
        anyhow::bail!("all {} providers failed for {}", connectors.len(), params.airport_code);
    }

    if let Some(path) = search.records {
        write_json(path, &collected.records)?;
    }

    let matches = match_records(collected.records, &criteria, args.sort_input);
    emit(&matches, &criteria, args)
}

/// Keep only the providers named with `--provider`; an empty filter keeps all.
pub(crate) fn restrict_providers(file: &mut ProvidersFile, only: &[Provider]) {
    if !only.is_empty() {
        file.providers.retain(|p| only.contains(&p.provider));
    }
}

/// Criteria from `--criteria`, else `PARKMATCH_CRITERIA_PATH`, else defaults,
/// with `--ignore-price` applied last.
pub(crate) fn resolve_criteria(
    config: &AppConfig,
    args: &MatchingArgs,
) -> anyhow::Result<MatchCriteria> {
    let path = args.criteria.as_deref().or(config.criteria_path.as_deref());
    let mut criteria = match path {
        Some(p) => parkmatch_core::load_criteria(p)?,
        None => MatchCriteria::default(),
    };
    if args.ignore_price {
        criteria.consider_price_in_matching = false;
    }
    Ok(criteria)
}

pub(crate) fn match_records(
    mut records: Vec<LocationRecord>,
    criteria: &MatchCriteria,
    sort_input: bool,
) -> Vec<MatchedLocation> {
    if sort_input {
        records.sort_by(|a, b| {
            a.provider
                .cmp(&b.provider)
                .then_with(|| a.provider_id.cmp(&b.provider_id))
        });
    }
    LocationMatcher::new(criteria.clone()).find_matches(&records)
}

fn read_records(path: &Path) -> anyhow::Result<Vec<LocationRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of location records", path.display()))
}

fn emit(
    matches: &[MatchedLocation],
    criteria: &MatchCriteria,
    args: &MatchingArgs,
) -> anyhow::Result<()> {
    if let Some(path) = &args.output {
        write_json(path, matches)?;
    }

    let report = parkmatch_matcher::generate_matching_report(matches, criteria);
    match &args.report {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote matching report");
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote json output");
    Ok(())
}
