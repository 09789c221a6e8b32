use std::collections::{HashMap, HashSet};

use crate::core::categorizer::SkillTaxonomy;
use crate::models::{
    ParticipantRole, SkillDetails, SkillFilter, SkillParticipant, SkillSuggestion, SkillSummary,
    UserSkillProfile,
};

/// Queries shorter than this get no suggestions
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Count how many members offer and want each skill
///
/// Skills are keyed case-insensitively; the first spelling seen becomes the
/// display name. Output follows first-seen order.
pub fn summarize_skills(users: &[UserSkillProfile], taxonomy: &SkillTaxonomy) -> Vec<SkillSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summaries: Vec<SkillSummary> = Vec::new();

    for user in users {
        for skill in &user.skills_offered {
            let slot = summary_slot(&mut index, &mut summaries, skill, taxonomy);
            summaries[slot].offered_by += 1;
        }
        for skill in &user.skills_wanted {
            let slot = summary_slot(&mut index, &mut summaries, skill, taxonomy);
            summaries[slot].wanted_by += 1;
        }
    }

    summaries
}

fn summary_slot(
    index: &mut HashMap<String, usize>,
    summaries: &mut Vec<SkillSummary>,
    skill: &str,
    taxonomy: &SkillTaxonomy,
) -> usize {
    *index.entry(skill.to_lowercase()).or_insert_with(|| {
        summaries.push(SkillSummary {
            name: skill.to_string(),
            offered_by: 0,
            wanted_by: 0,
            category: taxonomy.categorize(skill).to_string(),
        });
        summaries.len() - 1
    })
}

/// Skill catalog, filtered and sorted by total mentions (most first)
pub fn list_skills(
    users: &[UserSkillProfile],
    taxonomy: &SkillTaxonomy,
    filter: &SkillFilter,
) -> Vec<SkillSummary> {
    let search = filter.search.as_ref().map(|s| s.to_lowercase());

    let mut skills: Vec<SkillSummary> = summarize_skills(users, taxonomy)
        .into_iter()
        .filter(|s| filter.category.as_ref().map_or(true, |c| &s.category == c))
        .filter(|s| {
            search
                .as_ref()
                .map_or(true, |term| s.name.to_lowercase().contains(term.as_str()))
        })
        .filter(|s| !filter.popular || (s.offered_by > 0 && s.wanted_by > 0))
        .collect();

    skills.sort_by(|a, b| b.mentions().cmp(&a.mentions()));
    skills
}

/// Members who teach or want a skill
///
/// A member counts as a teacher when any offered skill contains the query
/// (case-insensitively), and as a learner likewise for wanted skills.
pub fn skill_details(
    users: &[UserSkillProfile],
    skill: &str,
    taxonomy: &SkillTaxonomy,
) -> SkillDetails {
    let needle = skill.to_lowercase();
    let mentions = |skills: &[String]| skills.iter().any(|s| s.to_lowercase().contains(&needle));

    let mut teachers = Vec::new();
    let mut learners = Vec::new();

    for user in users {
        if mentions(&user.skills_offered) {
            teachers.push(SkillParticipant::new(user.clone(), ParticipantRole::Teacher));
        }
        if mentions(&user.skills_wanted) {
            learners.push(SkillParticipant::new(user.clone(), ParticipantRole::Learner));
        }
    }

    SkillDetails {
        skill: skill.to_string(),
        category: taxonomy.categorize(skill).to_string(),
        total_teachers: teachers.len(),
        total_learners: learners.len(),
        teachers,
        learners,
    }
}

/// Autocomplete over every skill name in the community
///
/// Names are de-duplicated by exact spelling in first-seen order.
pub fn suggest_skills(
    users: &[UserSkillProfile],
    query: &str,
    limit: usize,
    taxonomy: &SkillTaxonomy,
) -> Vec<SkillSuggestion> {
    if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
        return Vec::new();
    }

    let term = query.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();

    users
        .iter()
        .flat_map(|u| u.skills_offered.iter().chain(u.skills_wanted.iter()))
        .map(String::as_str)
        .filter(|skill| seen.insert(*skill))
        .filter(|skill| skill.to_lowercase().contains(&term))
        .take(limit)
        .map(|skill| SkillSuggestion {
            name: skill.to_string(),
            category: taxonomy.categorize(skill).to_string(),
        })
        .collect()
}
