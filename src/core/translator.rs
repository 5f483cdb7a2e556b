//! Search-UI URL → people-search API parameters.

use crate::domain::model::{ApiParameterSet, RawParameterSet};
use crate::utils::error::Result;
use std::num::NonZeroU32;
use url::{form_urlencoded, ParseError, Url};

/// Literal that separates the UI route from its query string inside the fragment.
pub const PEOPLE_ROUTE_MARKER: &str = "/people?";

/// Known UI keys and their API names. Keys not listed fall back to
/// [`camel_to_snake`].
pub static KEY_MAPPING: &[(&str, &str)] = &[
    ("personTitles[]", "person_titles[]"),
    ("personLocations[]", "person_locations[]"),
    ("personSeniorities[]", "person_seniorities[]"),
    ("includeSimilarTitles", "include_similar_titles"),
    ("q_keywords", "q_keywords"),
    ("organizationLocations[]", "organization_locations[]"),
    ("q_organization_domains_list[]", "q_organization_domains_list[]"),
    ("contactEmailStatus[]", "contact_email_status[]"),
    ("organizationNumEmployeesRanges[]", "organization_num_employees_ranges[]"),
    ("revenueRange[min]", "revenue_range[min]"),
    ("revenueRange[max]", "revenue_range[max]"),
    ("currentlyUsingAllOfTechnologyUids[]", "currently_using_all_of_technology_uids[]"),
    ("currentlyUsingAnyOfTechnologyUids[]", "currently_using_any_of_technology_uids[]"),
    ("currentlyNotUsingAnyOfTechnologyUids[]", "currently_not_using_any_of_technology_uids[]"),
    ("q_organization_job_titles[]", "q_organization_job_titles[]"),
    ("organizationJobLocations[]", "organization_job_locations[]"),
    ("organizationNumJobsRange[min]", "organization_num_jobs_range[min]"),
    ("organizationNumJobsRange[max]", "organization_num_jobs_range[max]"),
    ("organizationJobPostedAtRange[min]", "organization_job_posted_at_range[min]"),
    ("organizationJobPostedAtRange[max]", "organization_job_posted_at_range[max]"),
    ("page", "page"),
    ("perPage", "per_page"),
];

pub const PAGE_KEY: &str = "page";
pub const PER_PAGE_KEY: &str = "per_page";

pub fn mapped_key(raw_key: &str) -> Option<&'static str> {
    KEY_MAPPING
        .iter()
        .find(|(ui, _)| *ui == raw_key)
        .map(|(_, api)| *api)
}

/// Inserts `_` before every ASCII uppercase letter and lowercases it.
/// Brackets, digits and existing underscores are left untouched.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn api_key_for(raw_key: &str) -> String {
    match mapped_key(raw_key) {
        Some(api) => api.to_string(),
        None => camel_to_snake(raw_key),
    }
}

/// Maps UI parameters to API parameters and pins pagination.
///
/// Unknown keys are never rejected, only transliterated. Values pass through
/// untouched and in order. If two raw keys land on the same API key, the later
/// one wins. `page` and `per_page` always come from the arguments.
pub fn translate(raw: &RawParameterSet, page: NonZeroU32, per_page: NonZeroU32) -> ApiParameterSet {
    let mut api = ApiParameterSet::new();

    for (key, values) in raw.iter() {
        let api_key = api_key_for(key);
        if api_key != key {
            tracing::trace!("Mapped parameter {} -> {}", key, api_key);
        }
        api.set(&api_key, values.to_vec());
    }

    api.set(PAGE_KEY, vec![page.to_string()]);
    api.set(PER_PAGE_KEY, vec![per_page.to_string()]);
    api
}

/// Parses an `application/x-www-form-urlencoded` query string, keeping
/// repeated keys. Pairs with an empty value are dropped.
pub fn parse_query(query: &str) -> RawParameterSet {
    let mut params = RawParameterSet::new();
    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        if value.is_empty() {
            continue;
        }
        params.push(&key, value.into_owned());
    }
    params
}

/// Query string embedded in the UI URL's fragment.
///
/// Everything after the last [`PEOPLE_ROUTE_MARKER`] is used; without the
/// marker the whole fragment is taken as a best-effort query string. A URL
/// pasted without its scheme is split on the first `#` instead of parsed.
pub fn fragment_query(ui_url: &str) -> Result<String> {
    let ui_url = ui_url.trim();
    let fragment = match Url::parse(ui_url) {
        Ok(url) => url.fragment().unwrap_or_default().to_string(),
        Err(ParseError::RelativeUrlWithoutBase) => {
            tracing::debug!("URL has no scheme, reading the fragment after '#'");
            ui_url
                .split_once('#')
                .map(|(_, fragment)| fragment.to_string())
                .unwrap_or_default()
        }
        Err(e) => return Err(e.into()),
    };
    let fragment = fragment.as_str();

    let query = match fragment.rsplit_once(PEOPLE_ROUTE_MARKER) {
        Some((_, query)) => query,
        None => {
            tracing::warn!(
                "⚠️ No '{}' marker found in URL fragment, using the whole fragment",
                PEOPLE_ROUTE_MARKER
            );
            fragment
        }
    };

    Ok(query.to_string())
}

pub fn extract_raw_params(ui_url: &str) -> Result<RawParameterSet> {
    let query = fragment_query(ui_url)?;
    Ok(parse_query(&query))
}

/// Endpoint with the API parameters appended as its query string.
pub fn build_search_url(endpoint: &str, params: &ApiParameterSet) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    {
        let mut query = url.query_pairs_mut();
        for (key, value) in params.pairs() {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}
