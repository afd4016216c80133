//! The resolution controller.
//!
//! Drives one page from raw HTML to a committed article record:
//!
//! 1. Look up the source profile; a new source gets an initial selector
//!    proposal from the generation client.
//! 2. Probe each field's cached selectors oldest-first and keep the first
//!    one that still produces plausible output on this page.
//! 3. Extract and validate all five fields; on failure, request targeted
//!    corrections for the failed fields only, up to the retry bound.
//! 4. With retries exhausted, optionally ask the generation client for
//!    the remaining field values directly.
//! 5. Commit: re-judge every field on its final value, persist the
//!    selectors that earned their keep, and upsert the article record.
//!
//! Generation-client failures degrade to empty proposals so one flaky
//! call never aborts a run; only store and configuration errors do.

use crate::config::ResolverConfig;
use crate::datetime;
use crate::error::ResolveError;
use crate::fields;
use crate::page::Page;
use newshound_domain::traits::{KeywordOracle, ProfileStore, SelectorGenerator};
use newshound_domain::{ArticleRecord, Field, FieldSet, SelectorHistory, SourceProfile};
use newshound_validator::FieldValidator;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Phases of one resolution run, in the order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Lookup,
    GenerateInitial,
    TryCached,
    Validate,
    Correct,
    FallbackDirect,
    Commit,
}

/// Working state for the attempt in flight. Discarded when the run ends;
/// everything durable goes through the store at commit.
#[derive(Debug, Default)]
struct Attempt {
    selectors: FieldSet<String>,
    values: FieldSet<String>,
    failed: Vec<Field>,
    feedback: BTreeMap<Field, String>,
    retries: u32,
    direct: BTreeSet<Field>,
    calls: u32,
}

/// The outcome of one resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The committed article record.
    pub record: ArticleRecord,
    /// Fields whose final value passed validation.
    pub validated: BTreeSet<Field>,
    /// Fields whose final value still fails validation.
    pub unvalidated: BTreeSet<Field>,
    /// Fields filled by direct extraction rather than a selector.
    pub direct_fields: BTreeSet<Field>,
    /// Correction rounds spent.
    pub retries_spent: u32,
    /// Generation-client calls made during this run.
    pub generation_calls: u32,
}

/// Orchestrates selector resolution for one source against a profile
/// store, a selector generator, and the field validator.
pub struct Resolver<G, S, K> {
    generator: Arc<G>,
    store: Arc<Mutex<S>>,
    validator: FieldValidator,
    oracle: K,
    config: ResolverConfig,
}

impl<G, S, K> Resolver<G, S, K>
where
    G: SelectorGenerator,
    G::Error: Display,
    S: ProfileStore,
    S::Error: Display,
    K: KeywordOracle,
{
    /// Create a resolver. Fails if the configuration is invalid.
    pub fn new(
        generator: G,
        store: Arc<Mutex<S>>,
        validator: FieldValidator,
        oracle: K,
        config: ResolverConfig,
    ) -> Result<Self, ResolveError> {
        config.validate().map_err(ResolveError::Config)?;
        Ok(Self {
            generator: Arc::new(generator),
            store,
            validator,
            oracle,
            config,
        })
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Resolve one page for `source`, committing the outcome.
    pub fn resolve(&self, page: &Page, source: &str, url: &str) -> Result<Resolution, ResolveError> {
        let cleaned = clamp_chars(page.cleaned_html(), self.config.max_html_chars);
        let mut attempt = Attempt::default();
        let mut profile: Option<SourceProfile> = None;
        let mut phase = Phase::Lookup;

        loop {
            debug!(source, ?phase, "resolution phase");
            phase = match phase {
                Phase::Lookup => {
                    profile = self.with_store(|s| s.lookup(source))?;
                    if profile.is_some() {
                        Phase::TryCached
                    } else {
                        info!(source, "unseen source, generating initial selectors");
                        Phase::GenerateInitial
                    }
                }

                Phase::GenerateInitial => {
                    attempt.selectors = self.generate_initial(&mut attempt, cleaned)?;
                    // Persist the profile before validation so a crashed run
                    // still leaves the source known.
                    self.with_store(|s| s.create(source, &attempt.selectors))?;
                    Phase::Validate
                }

                Phase::TryCached => {
                    let Some(profile) = profile.as_ref() else {
                        phase = Phase::GenerateInitial;
                        continue;
                    };
                    let mut unresolved = Vec::new();
                    for field in Field::ALL {
                        match self.probe_cached(page, field, profile.selectors.get(field)) {
                            Some(expression) => attempt.selectors.set(field, expression),
                            None => unresolved.push(field),
                        }
                    }
                    if !unresolved.is_empty() {
                        info!(source, stale = ?unresolved, "cached selectors went stale");
                        let feedback: BTreeMap<Field, String> = unresolved
                            .iter()
                            .map(|&f| (f, format!("no working selector found for {f}")))
                            .collect();
                        let proposal = self.request_corrections(
                            &mut attempt,
                            &unresolved,
                            &feedback,
                            cleaned,
                        )?;
                        for (field, expression) in proposal {
                            // Never overwrite a selector that just proved itself.
                            if unresolved.contains(&field) && !expression.trim().is_empty() {
                                attempt.selectors.set(field, expression);
                            }
                        }
                    }
                    Phase::Validate
                }

                Phase::Validate => {
                    attempt.values = self.extract_all(page, &attempt.selectors);
                    let report = self.validator.validate(&attempt.values, &self.oracle);
                    attempt.failed = report.failed_fields();
                    attempt.feedback = report.feedback().clone();
                    if attempt.failed.is_empty() {
                        Phase::Commit
                    } else if attempt.retries < self.config.max_retries {
                        Phase::Correct
                    } else {
                        Phase::FallbackDirect
                    }
                }

                Phase::Correct => {
                    attempt.retries += 1;
                    info!(
                        source,
                        retry = attempt.retries,
                        failed = ?attempt.failed,
                        "requesting selector corrections"
                    );
                    let failed = attempt.failed.clone();
                    let feedback = attempt.feedback.clone();
                    let proposal =
                        self.request_corrections(&mut attempt, &failed, &feedback, cleaned)?;
                    for (field, expression) in proposal {
                        if !expression.trim().is_empty() {
                            attempt.selectors.set(field, expression);
                        }
                    }
                    Phase::Validate
                }

                Phase::FallbackDirect => {
                    if self.config.direct_fallback && !attempt.failed.is_empty() {
                        info!(source, failed = ?attempt.failed, "falling back to direct extraction");
                        let failed = attempt.failed.clone();
                        let feedback = attempt.feedback.clone();
                        let extracted =
                            self.request_direct(&mut attempt, &failed, &feedback, cleaned)?;
                        for (field, value) in extracted {
                            if failed.contains(&field) && !value.trim().is_empty() {
                                attempt.values.set(field, value);
                                attempt.direct.insert(field);
                            }
                        }
                    }
                    Phase::Commit
                }

                Phase::Commit => {
                    return self.commit(source, url, attempt);
                }
            };
        }
    }

    /// Re-judge the final values, persist what earned its keep, and build
    /// the resolution summary.
    fn commit(&self, source: &str, url: &str, attempt: Attempt) -> Result<Resolution, ResolveError> {
        let final_report = self.validator.validate(&attempt.values, &self.oracle);

        let mut validated = BTreeSet::new();
        let mut unvalidated = BTreeSet::new();
        let mut earned: BTreeMap<Field, String> = BTreeMap::new();
        for field in Field::ALL {
            if final_report.failed(field) {
                unvalidated.insert(field);
                continue;
            }
            validated.insert(field);
            // Directly-extracted values prove nothing about a selector.
            if attempt.direct.contains(&field) {
                continue;
            }
            let expression = attempt.selectors.get(field);
            if !expression.trim().is_empty() {
                earned.insert(field, expression.clone());
            }
        }

        if !earned.is_empty() {
            self.with_store(|s| s.record_validated(source, &earned, attempt.retries))?;
        } else {
            debug!(source, "no validated selectors to record");
        }

        let record = ArticleRecord::from_values(source, url, &attempt.values);
        self.with_store(|s| s.upsert_article(&record))?;

        info!(
            source,
            url,
            validated = validated.len(),
            retries = attempt.retries,
            calls = attempt.calls,
            "resolution committed"
        );
        Ok(Resolution {
            record,
            validated,
            unvalidated,
            direct_fields: attempt.direct,
            retries_spent: attempt.retries,
            generation_calls: attempt.calls,
        })
    }

    /// Probe one field's history oldest-first for a selector that still
    /// works on this page.
    fn probe_cached(
        &self,
        page: &Page,
        field: Field,
        history: &SelectorHistory,
    ) -> Option<String> {
        for candidate in history.iter() {
            let usable = match field {
                Field::Date => !datetime::normalize(page, candidate).date.trim().is_empty(),
                Field::Time => !datetime::normalize(page, candidate).time.trim().is_empty(),
                _ => {
                    let text = fields::extract_text(page, candidate);
                    self.validator.check(field, &text).is_none()
                }
            };
            if usable {
                return Some(candidate.to_string());
            }
        }
        None
    }

    /// Extract all five fields with the current working selectors.
    fn extract_all(&self, page: &Page, selectors: &FieldSet<String>) -> FieldSet<String> {
        let mut values: FieldSet<String> = FieldSet::default();
        values.author = fields::extract_text(page, &selectors.author);
        values.title = fields::extract_text(page, &selectors.title);
        values.content = fields::extract_text(page, &selectors.content);
        let (date, time) = datetime::extract_pair(page, &selectors.date, &selectors.time);
        values.date = date;
        values.time = time;
        values
    }

    fn generate_initial(
        &self,
        attempt: &mut Attempt,
        cleaned: &str,
    ) -> Result<FieldSet<String>, ResolveError> {
        self.count_call(attempt)?;
        match self.generator.propose_initial(cleaned) {
            Ok(proposal) => Ok(proposal),
            Err(e) => {
                warn!(error = %e, "initial selector generation failed");
                Ok(FieldSet::default())
            }
        }
    }

    fn request_corrections(
        &self,
        attempt: &mut Attempt,
        failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        cleaned: &str,
    ) -> Result<BTreeMap<Field, String>, ResolveError> {
        self.count_call(attempt)?;
        match self
            .generator
            .propose_corrections(failed, feedback, &attempt.selectors, cleaned)
        {
            Ok(proposal) => Ok(proposal),
            Err(e) => {
                warn!(error = %e, "selector correction failed");
                Ok(BTreeMap::new())
            }
        }
    }

    fn request_direct(
        &self,
        attempt: &mut Attempt,
        failed: &[Field],
        feedback: &BTreeMap<Field, String>,
        cleaned: &str,
    ) -> Result<BTreeMap<Field, String>, ResolveError> {
        self.count_call(attempt)?;
        match self.generator.extract_direct(failed, feedback, cleaned) {
            Ok(extracted) => Ok(extracted),
            Err(e) => {
                warn!(error = %e, "direct extraction failed");
                Ok(BTreeMap::new())
            }
        }
    }

    /// Count one generation call, both in the run summary and in the
    /// persisted counter. Counted before the call is attempted, so failed
    /// calls still cost.
    fn count_call(&self, attempt: &mut Attempt) -> Result<(), ResolveError> {
        attempt.calls += 1;
        self.with_store(|s| s.count_generation_call())?;
        Ok(())
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut S) -> Result<T, S::Error>,
    ) -> Result<T, ResolveError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| ResolveError::Store("store lock poisoned".to_string()))?;
        f(&mut store).map_err(|e| ResolveError::Store(e.to_string()))
    }
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn clamp_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_char_boundaries() {
        assert_eq!(clamp_chars("abcdef", 3), "abc");
        assert_eq!(clamp_chars("abc", 10), "abc");
        assert_eq!(clamp_chars("ééé", 2), "éé");
    }
}
