use crate::core::categorizer::{SkillTaxonomy, OTHER_CATEGORY};
use crate::models::{MatchDetail, MatchResult, UserSkillProfile};

pub const DIRECT_MATCH_POINTS: u32 = 10;
pub const REVERSE_MATCH_POINTS: u32 = 10;
pub const CATEGORY_MATCH_POINTS: u32 = 3;
pub const LOCATION_BONUS_POINTS: u32 = 5;

/// Score how well two members could trade skills
///
/// Scoring passes, in order:
/// 1. direct    +10 per (a offers, b wants) pair whose names overlap
/// 2. reverse   +10 per (b offers, a wants) pair whose names overlap
/// 3. category  +3 per (a offers, b wants) pair in the same non-Other
///    category, on top of any direct match for that pair
/// 4. location  +5 once when both cities are present and identical
///
/// Names overlap when either lower-cased name contains the other. Every
/// overlapping pair counts, duplicates included. City comparison is
/// case-sensitive.
pub fn calculate_skill_match_score(
    a: &UserSkillProfile,
    b: &UserSkillProfile,
    taxonomy: &SkillTaxonomy,
) -> MatchResult {
    let a_offered = normalize_skills(&a.skills_offered);
    let b_wanted = normalize_skills(&b.skills_wanted);
    let b_offered = normalize_skills(&b.skills_offered);
    let a_wanted = normalize_skills(&a.skills_wanted);

    let mut result = MatchResult::default();

    // Pass 1: a can teach b
    for teach in &a_offered {
        for want in &b_wanted {
            if skills_overlap(teach, want) {
                result.push(MatchDetail::DirectMatch {
                    teacher_skill: teach.clone(),
                    learner_want: want.clone(),
                    points: DIRECT_MATCH_POINTS,
                });
            }
        }
    }

    // Pass 2: b can teach a
    for teach in &b_offered {
        for want in &a_wanted {
            if skills_overlap(teach, want) {
                result.push(MatchDetail::ReverseMatch {
                    teacher_skill: teach.clone(),
                    learner_want: want.clone(),
                    points: REVERSE_MATCH_POINTS,
                });
            }
        }
    }

    // Pass 3: same category, rescans the pass 1 cross product
    let offered_categories: Vec<&str> = a_offered
        .iter()
        .map(|s| taxonomy.categorize_lowercase(s))
        .collect();
    let wanted_categories: Vec<&str> = b_wanted
        .iter()
        .map(|s| taxonomy.categorize_lowercase(s))
        .collect();

    for category_a in &offered_categories {
        for category_b in &wanted_categories {
            if category_a == category_b && *category_a != OTHER_CATEGORY {
                result.push(MatchDetail::CategoryMatch {
                    category: (*category_a).to_string(),
                    points: CATEGORY_MATCH_POINTS,
                });
            }
        }
    }

    // Pass 4: same city
    if let (Some(city_a), Some(city_b)) = (a.city(), b.city()) {
        if !city_a.is_empty() && city_a == city_b {
            result.push(MatchDetail::LocationBonus {
                city: city_a.to_string(),
                points: LOCATION_BONUS_POINTS,
            });
        }
    }

    result
}

/// Either name contains the other
#[inline]
pub fn skills_overlap(x: &str, y: &str) -> bool {
    x.contains(y) || y.contains(x)
}

/// Lower-case a skill list, dropping blank entries
///
/// A blank name would be a substring of every other skill.
fn normalize_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(a: &UserSkillProfile, b: &UserSkillProfile) -> MatchResult {
        calculate_skill_match_score(a, b, &SkillTaxonomy::standard())
    }

    #[test]
    fn test_direct_and_reverse_with_location() {
        let a = UserSkillProfile::new("a")
            .offering(["JavaScript", "React"])
            .wanting(["Python"])
            .in_city("Denver");
        let b = UserSkillProfile::new("b")
            .offering(["Python", "Django"])
            .wanting(["JavaScript"])
            .in_city("Denver");

        let result = score(&a, &b);

        assert_eq!(
            result.details,
            vec![
                MatchDetail::DirectMatch {
                    teacher_skill: "javascript".to_string(),
                    learner_want: "javascript".to_string(),
                    points: 10,
                },
                MatchDetail::ReverseMatch {
                    teacher_skill: "python".to_string(),
                    learner_want: "python".to_string(),
                    points: 10,
                },
                MatchDetail::LocationBonus { city: "Denver".to_string(), points: 5 },
            ]
        );
        assert_eq!(result.score, 25);
    }

    #[test]
    fn test_substring_overlap_both_directions() {
        assert!(skills_overlap("react native", "react"));
        assert!(skills_overlap("react", "react native"));
        assert!(!skills_overlap("java programming", "c++ programming"));
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let a = UserSkillProfile::new("a").offering(["guitar", "guitar"]);
        let b = UserSkillProfile::new("b").wanting(["Guitar"]);

        let result = score(&a, &b);
        assert_eq!(result.details.iter().filter(|d| d.is_direct()).count(), 2);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn test_category_layers_on_direct_match() {
        let a = UserSkillProfile::new("a").offering(["Yoga"]);
        let b = UserSkillProfile::new("b").wanting(["yoga"]);

        let result = score(&a, &b);
        assert_eq!(result.score, DIRECT_MATCH_POINTS + CATEGORY_MATCH_POINTS);
        assert!(matches!(
            result.details[1],
            MatchDetail::CategoryMatch { ref category, points: 3 } if category == "Health & Fitness"
        ));
    }

    #[test]
    fn test_category_only() {
        let a = UserSkillProfile::new("a")
            .offering(["Java Programming"])
            .wanting(["Cooking"])
            .in_city("Boulder");
        let b = UserSkillProfile::new("b")
            .offering(["Baking"])
            .wanting(["C++ Programming"])
            .in_city("Denver");

        let result = score(&a, &b);
        assert_eq!(
            result.details,
            vec![MatchDetail::CategoryMatch { category: "Technical".to_string(), points: 3 }]
        );
        assert_eq!(result.score, 3);
    }

    #[test]
    fn test_city_comparison_is_case_sensitive() {
        // Every other comparison ignores case; cities do not.
        let a = UserSkillProfile::new("a").in_city("Denver");
        let b = UserSkillProfile::new("b").in_city("denver");
        assert_eq!(score(&a, &b).score, 0);

        let b = UserSkillProfile::new("b").in_city("Denver");
        assert_eq!(score(&a, &b).score, LOCATION_BONUS_POINTS);
    }

    #[test]
    fn test_missing_or_blank_city_gives_no_bonus() {
        let a = UserSkillProfile::new("a");
        let b = UserSkillProfile::new("b");
        assert_eq!(score(&a, &b).score, 0);

        let a = UserSkillProfile::new("a").in_city("");
        let b = UserSkillProfile::new("b").in_city("");
        assert_eq!(score(&a, &b).score, 0);
    }

    #[test]
    fn test_blank_skills_contribute_nothing() {
        let a = UserSkillProfile::new("a").offering(["", "  ", "Rust"]);
        let b = UserSkillProfile::new("b").wanting(["python", ""]);

        assert_eq!(score(&a, &b).score, 0);
    }

    #[test]
    fn test_inputs_untouched() {
        let a = UserSkillProfile::new("a").offering(["JavaScript"]);
        let b = UserSkillProfile::new("b").wanting(["JAVASCRIPT"]);
        let (a_before, b_before) = (a.clone(), b.clone());

        let _ = score(&a, &b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }
}
