// Integration tests for Founder Match

use chrono::NaiveDate;
use founder_match::core::Matcher;
use founder_match::models::{
    ActivityCounts, Budget, InvestorProfile, Profile, RelaxationPolicy, RoleProfile, ScoringWeights,
};
use std::collections::HashSet;

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn matcher() -> Matcher {
    Matcher::with_default_weights().with_reference_date(reference_date())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn create_test_profile(id: &str, role: RoleProfile, location: &str, skills: &[&str]) -> Profile {
    let mut profile = Profile::new(id, role);
    profile.location = location.to_string();
    profile.skills = strings(skills);
    profile
}

fn investor(id: &str, location: &str, domains: &[&str]) -> Profile {
    create_test_profile(
        id,
        RoleProfile::Investor {
            investor_profile: InvestorProfile {
                interested_domains: strings(domains),
                budget: Some(Budget { min: Some(50_000.0), max: Some(500_000.0) }),
            },
        },
        location,
        &[],
    )
}

/// Deterministic mixed pool across roles, cities and skill sets
fn mixed_pool(size: usize) -> Vec<Profile> {
    const LOCATIONS: &[&str] = &["Austin, USA", "Denver, USA", "Berlin, Germany", "Lagos, Nigeria"];
    const SKILLS: &[&str] = &["go", "aws", "rust", "react", "python"];

    (0..size)
        .map(|i| {
            let role = match i % 3 {
                0 => RoleProfile::Developer,
                1 => RoleProfile::Founder,
                _ => RoleProfile::Investor {
                    investor_profile: InvestorProfile {
                        interested_domains: strings(&["fintech"]),
                        budget: None,
                    },
                },
            };
            let skills: Vec<&str> = SKILLS.iter().copied().take(i % 4).collect();
            let mut profile =
                create_test_profile(&format!("c{}", i), role, LOCATIONS[i % LOCATIONS.len()], &skills);
            profile.interests = strings(&["fintech", "climate"][..i % 3]);
            profile.experience = Some(if i % 2 == 0 { "senior" } else { "mid" }.to_string());
            profile.date_of_birth = Some(format!("{}-03-15", 1980 + (i % 20)));
            profile
        })
        .collect()
}

fn seeker() -> Profile {
    let mut seeker = create_test_profile("seeker", RoleProfile::Founder, "Austin, USA", &["go", "aws"]);
    seeker.interests = strings(&["fintech"]);
    seeker.experience = Some("senior".to_string());
    seeker.date_of_birth = Some("1990-03-15".to_string());
    seeker
}

fn activity_for(pool: &[Profile]) -> ActivityCounts {
    pool.iter()
        .enumerate()
        .filter(|(i, _)| i % 4 != 0)
        .map(|(i, p)| (p.id.clone(), (i % 7) as u32))
        .collect()
}

#[test]
fn test_developer_next_door_outranks_remote_investor() {
    let seeker = create_test_profile("s", RoleProfile::Founder, "Austin, USA", &["Go", "AWS"]);
    let pool = vec![
        create_test_profile("dev", RoleProfile::Developer, "Austin, USA", &["Go", "Rust"]),
        investor("inv", "Berlin, Germany", &["biotech"]),
    ];

    let result = matcher()
        .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
        .unwrap();

    let dev_score = matcher().score_pair(&seeker, &pool[0], &ActivityCounts::new());
    let inv_score = matcher().score_pair(&seeker, &pool[1], &ActivityCounts::new());
    assert_eq!(dev_score.compatibility_score, 18 + 10 + 4);
    // Role plus the budget bonus; no domain overlap and no shared location
    assert_eq!(inv_score.compatibility_score, 18 + 2);

    // The developer only clears the open pass threshold of 30
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].candidate_id, "dev");
    assert_eq!(result.matches[0].compatibility_score, 32);
    assert_eq!(result.near_matches.len(), 1);
    assert_eq!(result.near_matches[0].candidate_id, "inv");
    assert_eq!(
        result.near_matches[0].missing_signals,
        vec!["different location", "different country"]
    );
    assert_eq!(result.passes_run, 3);
}

#[test]
fn test_empty_pool_returns_empty_lists() {
    let result = matcher()
        .find_matches(&seeker(), &[], &ActivityCounts::new(), 5)
        .unwrap();

    assert!(result.matches.is_empty());
    assert!(result.near_matches.is_empty());
}

#[test]
fn test_all_foreign_weak_candidates_become_near_matches() {
    let seeker = create_test_profile("s", RoleProfile::Founder, "Austin, USA", &["go", "aws"]);
    let pool: Vec<Profile> = (0..20)
        .map(|i| {
            let skills: &[&str] = match i % 3 {
                0 => &[],
                1 => &["go"],
                _ => &["go", "aws"],
            };
            create_test_profile(
                &format!("c{}", i),
                RoleProfile::Developer,
                &format!("City {}, Country {}", i, i),
                skills,
            )
        })
        .collect();

    let result = matcher()
        .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
        .unwrap();

    assert!(result.matches.is_empty());
    assert_eq!(result.near_matches.len(), 5);

    let ids: Vec<&str> = result.near_matches.iter().map(|n| n.candidate_id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c5", "c8", "c11", "c14"]);
    for near in &result.near_matches {
        assert_eq!(near.proximity_score, 26);
        assert_eq!(near.missing_signals, vec!["different location", "different country"]);
    }
}

#[test]
fn test_identical_scores_keep_pool_order() {
    let seeker = seeker();
    let mut zeta = create_test_profile("zeta", RoleProfile::Developer, "Austin, USA", &["go", "aws"]);
    zeta.interests = strings(&["fintech"]);
    zeta.experience = Some("senior".to_string());
    zeta.date_of_birth = Some("1992-01-01".to_string());
    let mut alpha = zeta.clone();
    alpha.id = "alpha".to_string();

    let result = matcher()
        .find_matches(&seeker, &[zeta, alpha], &ActivityCounts::new(), 2)
        .unwrap();

    let ids: Vec<&str> = result.matches.iter().map(|m| m.candidate_id.as_str()).collect();
    assert_eq!(ids, vec!["zeta", "alpha"]);
    assert_eq!(result.matches[0].compatibility_score, result.matches[1].compatibility_score);
    // 18 role + 10 location + 8 skills + 3 interests + 8 experience + 5 age
    assert_eq!(result.matches[0].compatibility_score, 52);
    // Both qualify in the exact-location pass, which already fills top_k
    assert_eq!(result.passes_run, 1);
}

#[test]
fn test_missing_activity_entry_scores_zero_activity() {
    let seeker = seeker();
    let active = create_test_profile("active", RoleProfile::Developer, "Austin, USA", &["go"]);
    let mut quiet = active.clone();
    quiet.id = "quiet".to_string();

    let mut activity = ActivityCounts::new();
    activity.insert("active".to_string(), 6);

    let result = matcher()
        .find_matches(&seeker, &[active, quiet], &activity, 5)
        .unwrap();

    let score_of = |id: &str| {
        result
            .matches
            .iter()
            .find(|m| m.candidate_id == id)
            .map(|m| m.compatibility_score)
            .unwrap()
    };
    assert_eq!(score_of("active") - score_of("quiet"), 10);
}

#[test]
fn test_results_are_deterministic() {
    let pool = mixed_pool(40);
    let activity = activity_for(&pool);
    let seeker = seeker();

    let first = matcher().find_matches(&seeker, &pool, &activity, 5).unwrap();
    for _ in 0..5 {
        let again = matcher().find_matches(&seeker, &pool, &activity, 5).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_output_invariants_across_pool_sizes() {
    let seeker = seeker();

    for size in [0, 1, 3, 7, 12, 25, 60] {
        let mut pool = mixed_pool(size);
        // The profile store may hand the seeker back; it must never be matched
        pool.push(seeker.clone());
        let activity = activity_for(&pool);

        for top_k in [1, 3, 5, 10] {
            let result = matcher().find_matches(&seeker, &pool, &activity, top_k).unwrap();

            assert!(result.matches.len() <= top_k);
            assert!(result.near_matches.len() <= top_k);

            let matched: HashSet<&str> =
                result.matches.iter().map(|m| m.candidate_id.as_str()).collect();
            let near: HashSet<&str> =
                result.near_matches.iter().map(|n| n.candidate_id.as_str()).collect();
            assert!(matched.is_disjoint(&near), "id in both lists for size {}", size);
            assert!(!matched.contains("seeker"));
            assert!(!near.contains("seeker"));
            assert_eq!(matched.len(), result.matches.len());
            assert_eq!(near.len(), result.near_matches.len());

            for m in &result.matches {
                assert!(m.compatibility_score <= 100);
            }
            for pair in result.matches.windows(2) {
                assert!(pair[0].compatibility_score >= pair[1].compatibility_score);
            }
            for pair in result.near_matches.windows(2) {
                assert!(pair[0].proximity_score >= pair[1].proximity_score);
            }
        }
    }
}

#[test]
fn test_exact_pass_results_are_subset_of_full_relaxation() {
    let seeker = seeker();
    let pool = mixed_pool(30);
    let activity = activity_for(&pool);

    let exact_only = Matcher::new(
        ScoringWeights::default(),
        RelaxationPolicy {
            max_passes: 1,
            ..RelaxationPolicy::default()
        },
    )
    .unwrap()
    .with_reference_date(reference_date());

    for top_k in [1, 2, 3, 5, 8, 30] {
        let strict = exact_only.find_matches(&seeker, &pool, &activity, top_k).unwrap();
        let relaxed = matcher().find_matches(&seeker, &pool, &activity, top_k).unwrap();

        assert!(strict.passes_run <= 1);
        let strict_ids: HashSet<&str> =
            strict.matches.iter().map(|m| m.candidate_id.as_str()).collect();
        let relaxed_ids: HashSet<&str> =
            relaxed.matches.iter().map(|m| m.candidate_id.as_str()).collect();
        assert!(strict_ids.is_subset(&relaxed_ids), "top_k {}", top_k);
        assert!(relaxed_ids.len() >= strict_ids.len());
    }
}

#[test]
fn test_stronger_regional_matches_do_not_displace_local_ones() {
    let mut seeker = create_test_profile(
        "s",
        RoleProfile::Founder,
        "Austin, USA",
        &["go", "aws", "rust", "sql", "react"],
    );
    seeker.interests = strings(&["fintech"]);
    seeker.experience = Some("senior".to_string());
    seeker.date_of_birth = Some("1990-03-15".to_string());

    let build = |id: &str, location: &str, skills: &[&str], interests: &[&str]| {
        let mut profile = create_test_profile(id, RoleProfile::Developer, location, skills);
        profile.interests = strings(interests);
        profile.experience = Some("senior".to_string());
        profile.date_of_birth = Some("1992-01-01".to_string());
        profile
    };
    let mut pool: Vec<Profile> = (0..3)
        .map(|i| {
            build(
                &format!("region{}", i),
                "Denver, USA",
                &["go", "aws", "rust", "sql", "react"],
                &["fintech"],
            )
        })
        .collect();
    pool.extend((0..3).map(|i| build(&format!("exact{}", i), "Austin, USA", &["go", "aws", "rust"], &[])));

    let exact_only = Matcher::new(
        ScoringWeights::default(),
        RelaxationPolicy {
            max_passes: 1,
            ..RelaxationPolicy::default()
        },
    )
    .unwrap()
    .with_reference_date(reference_date());

    let strict = exact_only
        .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
        .unwrap();
    let relaxed = matcher()
        .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
        .unwrap();

    let ids = |outcome: &founder_match::core::MatchOutcome| -> Vec<String> {
        outcome.matches.iter().map(|m| m.candidate_id.clone()).collect()
    };
    // 18 role + 10 location + 12 skills + 8 experience + 5 age
    assert_eq!(strict.matches[0].compatibility_score, 53);
    assert_eq!(ids(&strict), vec!["exact0", "exact1", "exact2"]);

    // 18 role + 6 region + 20 skills + 3 interests + 8 experience + 5 age
    assert_eq!(relaxed.matches[0].compatibility_score, 60);
    assert_eq!(relaxed.passes_run, 2);
    assert_eq!(
        ids(&relaxed),
        vec!["region0", "region1", "exact0", "exact1", "exact2"]
    );
    assert_eq!(relaxed.near_matches.len(), 1);
    assert_eq!(relaxed.near_matches[0].candidate_id, "region2");
}

#[test]
fn test_near_match_keeps_single_best_entry_per_candidate() {
    let seeker = create_test_profile("s", RoleProfile::Founder, "Austin, USA", &[]);
    // Same country but too weak for every pass: rejected three times
    let pool = vec![create_test_profile("weak", RoleProfile::Developer, "Denver, USA", &[])];

    let result = matcher()
        .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
        .unwrap();

    assert_eq!(result.near_matches.len(), 1);
    assert_eq!(result.near_matches[0].proximity_score, 24);
    assert_eq!(result.near_matches[0].missing_signals, vec!["different location"]);
}

#[test]
fn test_founder_investor_domain_fit() {
    let mut seeker = create_test_profile("s", RoleProfile::Founder, "Berlin, Germany", &[]);
    seeker.interests = strings(&["Fintech", "Climate", "Health"]);
    let pool = vec![investor("inv", "Berlin, Germany", &["fintech", "climate", "health"])];

    let result = matcher()
        .find_matches(&seeker, &pool, &ActivityCounts::new(), 5)
        .unwrap();

    // 18 role + 10 location + 6 capped domains + 2 budget
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].compatibility_score, 36);
    assert_eq!(
        result.matches[0].justification,
        "Strong fit thanks to complementary roles and the same location."
    );
}

#[test]
fn test_zero_top_k_is_rejected() {
    let result = matcher().find_matches(&seeker(), &mixed_pool(3), &ActivityCounts::new(), 0);
    assert!(result.is_err());
}
