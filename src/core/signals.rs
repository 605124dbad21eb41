use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::models::{Profile, Role, ScoringWeights};

/// How closely two free-text locations agree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocationTier {
    /// Nothing in common, or one side has no location
    Unrelated,
    /// Same trailing country/region token
    SameRegion,
    /// Same full location string
    Exact,
}

/// Role complementarity (0 or `role_complementary`)
///
/// Any two distinct roles out of founder, developer and investor complement
/// each other; two profiles with the same role do not.
#[inline]
pub fn role_complementarity(seeker: Role, candidate: Role, weights: &ScoringWeights) -> u32 {
    if seeker == candidate {
        0
    } else {
        weights.role_complementary
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Country/region token of a location: the text after the last comma, or the
/// whole string when there is no comma
fn region_token(location: &str) -> &str {
    location.rsplit(',').next().unwrap_or(location).trim()
}

/// Classify two locations by case-insensitive full match, then by region token
pub fn location_tier(a: &str, b: &str) -> LocationTier {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || b.is_empty() {
        return LocationTier::Unrelated;
    }
    if a == b {
        return LocationTier::Exact;
    }

    let (region_a, region_b) = (region_token(&a), region_token(&b));
    if !region_a.is_empty() && region_a == region_b {
        LocationTier::SameRegion
    } else {
        LocationTier::Unrelated
    }
}

/// Location proximity contribution for an already classified pair
#[inline]
pub fn location_proximity(tier: LocationTier, weights: &ScoringWeights) -> u32 {
    match tier {
        LocationTier::Exact => weights.location_exact,
        LocationTier::SameRegion => weights.location_region,
        LocationTier::Unrelated => 0,
    }
}

/// Items present in both lists, compared trimmed and case-insensitively
///
/// Returned in the order they first appear in `left`, without duplicates.
pub fn shared_items(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<String> = right
        .iter()
        .map(|item| normalize(item))
        .filter(|item| !item.is_empty())
        .collect();

    let mut seen = HashSet::new();
    left.iter()
        .map(|item| normalize(item))
        .filter(|item| right.contains(item) && seen.insert(item.clone()))
        .collect()
}

#[inline]
fn capped(count: usize, per_item: u32, cap: u32) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count.saturating_mul(per_item).min(cap)
}

/// Interest overlap: points per shared interest, capped
pub fn interest_overlap(seeker: &Profile, candidate: &Profile, weights: &ScoringWeights) -> u32 {
    let shared = shared_items(&seeker.interests, &candidate.interests).len();
    capped(shared, weights.interest_per_shared, weights.interest_cap)
}

/// Skill overlap: points per shared skill, capped
pub fn skill_overlap(seeker: &Profile, candidate: &Profile, weights: &ScoringWeights) -> u32 {
    let shared = shared_items(&seeker.skills, &candidate.skills).len();
    capped(shared, weights.skill_per_shared, weights.skill_cap)
}

/// Experience alignment: exact level match, differing levels, or nothing when
/// either side is missing
pub fn experience_alignment(
    seeker: &Profile,
    candidate: &Profile,
    weights: &ScoringWeights,
) -> u32 {
    fn level(profile: &Profile) -> Option<&str> {
        profile.experience.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    match (level(seeker), level(candidate)) {
        (Some(a), Some(b)) if a == b => weights.experience_same,
        (Some(_), Some(_)) => weights.experience_different,
        _ => 0,
    }
}

/// Investor fit for a founder/investor pair
///
/// Shared domains between the investor's interested domains and the founder's
/// interests score per domain up to the cap, plus a bonus when the investor
/// has a fully specified budget. Any other pairing scores 0.
pub fn investor_fit(seeker: &Profile, candidate: &Profile, weights: &ScoringWeights) -> u32 {
    let (investor, founder) = match (seeker.role(), candidate.role()) {
        (Role::Investor, Role::Founder) => (seeker, candidate),
        (Role::Founder, Role::Investor) => (candidate, seeker),
        _ => return 0,
    };
    let Some(preferences) = investor.investor_profile() else {
        return 0;
    };

    let shared = shared_items(&preferences.interested_domains, &founder.interests).len();
    let domain_points = capped(
        shared,
        weights.investor_domain_per_shared,
        weights.investor_domain_cap,
    );
    let budget_points = match preferences.budget {
        Some(budget) if budget.is_fully_specified() => weights.investor_budget_bonus,
        _ => 0,
    };

    domain_points + budget_points
}

/// Parse a date of birth in any of the formats profiles are stored with
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD.MM.YYYY`, RFC 3339 timestamps and
/// naive `YYYY-MM-DDTHH:MM:SS` timestamps.
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// Whole years between `date_of_birth` and `as_of`; `None` for future dates
pub fn age_in_years(date_of_birth: NaiveDate, as_of: NaiveDate) -> Option<u32> {
    let mut years = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Age proximity: both ages known and within 5 or 10 years of each other
pub fn age_proximity(
    seeker: &Profile,
    candidate: &Profile,
    as_of: NaiveDate,
    weights: &ScoringWeights,
) -> u32 {
    let age = |p: &Profile| {
        p.date_of_birth
            .as_deref()
            .and_then(parse_date_of_birth)
            .and_then(|dob| age_in_years(dob, as_of))
    };

    match (age(seeker), age(candidate)) {
        (Some(a), Some(b)) => match a.abs_diff(b) {
            0..=5 => weights.age_within_5_years,
            6..=10 => weights.age_within_10_years,
            _ => 0,
        },
        _ => 0,
    }
}

/// Activity level: the candidate's count scaled against the busiest candidate
/// in the pool, never dividing by less than `activity_min_denominator`
pub fn activity_level(count: u32, pool_max: u32, weights: &ScoringWeights) -> u32 {
    let denominator = pool_max.max(weights.activity_min_denominator).max(1);
    let scaled = f64::from(count) / f64::from(denominator) * f64::from(weights.activity_max);
    (scaled.round() as u32).min(weights.activity_max)
}
