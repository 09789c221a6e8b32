use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fields stripped from every user record before it leaves the service
pub const REDACTED_FIELDS: [&str; 2] = ["email", "lastLoginAt"];

/// Member skill profile as stored in the user-record store
///
/// Only the skill lists and the city take part in matching. Every other
/// stored field is kept in `extra` so results can echo the record back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkillProfile {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_skills")]
    pub skills_offered: Vec<String>,
    #[serde(default, deserialize_with = "lenient_skills")]
    pub skills_wanted: Vec<String>,
    #[serde(default, deserialize_with = "lenient_location", skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserSkillProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn offering<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills_offered = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn wanting<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills_wanted = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_city(mut self, city: impl Into<String>) -> Self {
        self.location = Some(Location {
            city: Some(city.into()),
            extra: Map::new(),
        });
        self
    }

    /// City the member lives in, if the record has one
    pub fn city(&self) -> Option<&str> {
        self.location.as_ref().and_then(|l| l.city.as_deref())
    }

    /// Copy of the record without contact and login data
    pub fn redacted(&self) -> Self {
        let mut profile = self.clone();
        for field in REDACTED_FIELDS {
            profile.extra.remove(field);
        }
        profile
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient_city", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept whatever shape a skill list ended up in
///
/// Firebase stores sparse arrays as objects keyed by index, older clients
/// wrote a bare string, and some records carry `null`. Entries that are not
/// strings are dropped.
fn lenient_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    let skills = match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(string_entry).collect(),
        Some(Value::Object(map)) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| {
                let a_idx = a.parse::<u64>().unwrap_or(u64::MAX);
                let b_idx = b.parse::<u64>().unwrap_or(u64::MAX);
                a_idx.cmp(&b_idx).then_with(|| a.cmp(b))
            });
            entries.into_iter().map(|(_, v)| v).filter_map(string_entry).collect()
        }
        Some(Value::String(skill)) => vec![skill],
        _ => Vec::new(),
    };

    Ok(skills)
}

/// Stored ids are overridden by the record key, so any shape is accepted
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => id,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    Ok(id)
}

/// A location that is not an object counts as no location
fn lenient_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    let location = match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    };
    Ok(location)
}

fn lenient_city<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(string_entry))
}

fn string_entry(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// One reason two profiles scored points against each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum MatchDetail {
    /// Profile A can teach something profile B wants
    DirectMatch {
        teacher_skill: String,
        learner_want: String,
        points: u32,
    },
    /// Profile B can teach something profile A wants
    ReverseMatch {
        teacher_skill: String,
        learner_want: String,
        points: u32,
    },
    CategoryMatch { category: String, points: u32 },
    LocationBonus { city: String, points: u32 },
}

impl MatchDetail {
    pub fn points(&self) -> u32 {
        match self {
            MatchDetail::DirectMatch { points, .. }
            | MatchDetail::ReverseMatch { points, .. }
            | MatchDetail::CategoryMatch { points, .. }
            | MatchDetail::LocationBonus { points, .. } => *points,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, MatchDetail::DirectMatch { .. })
    }

    pub fn is_reverse(&self) -> bool {
        matches!(self, MatchDetail::ReverseMatch { .. })
    }
}

/// Score of one profile pair plus the reasons behind it, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32,
    pub details: Vec<MatchDetail>,
}

impl MatchResult {
    /// Record a reason; the score always equals the sum of detail points
    pub fn push(&mut self, detail: MatchDetail) {
        self.score += detail.points();
        self.details.push(detail);
    }

    pub fn has_direct_match(&self) -> bool {
        self.details.iter().any(MatchDetail::is_direct)
    }

    pub fn has_reverse_match(&self) -> bool {
        self.details.iter().any(MatchDetail::is_reverse)
    }

    /// Both members can teach each other something
    pub fn is_mutual_exchange(&self) -> bool {
        self.has_direct_match() && self.has_reverse_match()
    }
}

/// Candidate ranked against a target member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    pub user: UserSkillProfile,
    pub match_score: u32,
    pub match_details: Vec<MatchDetail>,
}

/// Two members who can teach each other
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePair {
    pub user_a: UserSkillProfile,
    pub user_b: UserSkillProfile,
    pub exchange_score: u32,
    pub exchange_details: Vec<MatchDetail>,
    pub mutual_exchange: bool,
}

/// Community-wide usage of one skill name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub name: String,
    pub offered_by: u32,
    pub wanted_by: u32,
    pub category: String,
}

impl SkillSummary {
    pub fn mentions(&self) -> u32 {
        self.offered_by + self.wanted_by
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Teacher,
    Learner,
}

/// Member listed on a skill's detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillParticipant {
    #[serde(flatten)]
    pub user: UserSkillProfile,
    #[serde(rename = "type")]
    pub role: ParticipantRole,
}

impl SkillParticipant {
    /// The role replaces any `type` field the stored record carries
    pub fn new(mut user: UserSkillProfile, role: ParticipantRole) -> Self {
        user.extra.remove("type");
        Self { user, role }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDetails {
    pub skill: String,
    pub category: String,
    pub teachers: Vec<SkillParticipant>,
    pub learners: Vec<SkillParticipant>,
    pub total_teachers: usize,
    pub total_learners: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSuggestion {
    pub name: String,
    pub category: String,
}

/// Optional narrowing of the skill catalog
#[derive(Debug, Clone, Default)]
pub struct SkillFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub popular: bool,
}
