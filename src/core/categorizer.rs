use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category returned when no keyword matches
pub const OTHER_CATEGORY: &str = "Other";

/// Physical risk attached to teaching a skill category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Extreme => "extreme",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown risk level: {0}")]
pub struct UnknownRiskLevel(pub String);

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "extreme" => Ok(RiskLevel::Extreme),
            _ => Err(UnknownRiskLevel(s.to_string())),
        }
    }
}

/// One entry of the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub name: String,
    pub risk_level: RiskLevel,
    pub icon: String,
    pub description: String,
    pub keywords: Vec<String>,
}

type CategoryRow = (&'static str, RiskLevel, &'static str, &'static str, &'static [&'static str]);

// Declaration order decides which category wins when keywords overlap,
// so the narrow categories sit above the broad ones.
const STANDARD_CATEGORIES: &[CategoryRow] = &[
    (
        "Martial Arts",
        RiskLevel::High,
        "🥋",
        "Combat and martial arts training with significant injury risk",
        &[
            "martial-arts", "martial arts", "karate", "judo", "taekwondo", "boxing",
            "kickboxing", "mma", "self-defense", "jiu-jitsu", "kung fu",
        ],
    ),
    (
        "Electrical",
        RiskLevel::High,
        "",
        "Electrical work with high risk of shock or electrocution",
        &[
            "electrical", "electrician", "wiring", "electronics", "circuit", "voltage",
            "power systems",
        ],
    ),
    (
        "Woodworking",
        RiskLevel::High,
        "",
        "Woodworking and carpentry with high risk from power tools and sharp instruments",
        &[
            "woodworking", "wood working", "furniture making", "cabinetry", "joinery",
            "sawing", "power tools", "carpentry",
        ],
    ),
    (
        "Health & Fitness",
        RiskLevel::Medium,
        "",
        "Health and fitness activities with moderate physical exertion risk",
        &[
            "fitness training", "fitness", "yoga", "meditation", "nutrition", "cooking",
            "exercise", "health", "wellness", "personal training", "strength training",
        ],
    ),
    (
        "Creative",
        RiskLevel::Low,
        "",
        "Artistic and creative skills with minimal physical risk",
        &[
            "graphic design", "design", "music", "photography", "writing", "painting",
            "drawing", "pottery", "craft", "creative", "art",
        ],
    ),
    (
        "Technical",
        RiskLevel::Low,
        "",
        "Technology and software skills with minimal physical risk",
        &[
            "programming", "coding", "web development", "software", "computer", "tech",
            "development", "data", "ai", "machine learning",
        ],
    ),
    (
        "Language",
        RiskLevel::Low,
        "",
        "Language learning and communication skills with minimal risk",
        &[
            "english", "spanish", "french", "german", "chinese", "japanese", "language",
            "translation",
        ],
    ),
    (
        "Business",
        RiskLevel::Low,
        "",
        "Business and professional skills with minimal risk",
        &[
            "marketing", "sales", "finance", "accounting", "management", "business",
            "entrepreneurship",
        ],
    ),
    (
        "Practical",
        RiskLevel::Medium,
        "",
        "Practical and maintenance skills with moderate risk",
        &["repair", "maintenance", "plumbing", "gardening", "cleaning", "organizing"],
    ),
    (
        "Academic",
        RiskLevel::Low,
        "",
        "Academic subjects and tutoring with minimal risk",
        &[
            "math", "science", "physics", "chemistry", "biology", "history", "geography",
            "tutoring", "teaching",
        ],
    ),
];

/// Ordered skill taxonomy
///
/// Maps free-text skill names to a category by keyword containment. The
/// first category (in declaration order) with a keyword contained in the
/// lower-cased skill wins; nothing matching yields [`OTHER_CATEGORY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTaxonomy {
    categories: Vec<SkillCategory>,
}

impl SkillTaxonomy {
    /// Build a taxonomy from categories in priority order
    pub fn new(categories: Vec<SkillCategory>) -> Self {
        let categories = categories
            .into_iter()
            .map(|mut c| {
                c.keywords = c
                    .keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                c
            })
            .collect();

        Self { categories }
    }

    /// The marketplace's built-in table
    pub fn standard() -> Self {
        let categories = STANDARD_CATEGORIES
            .iter()
            .map(|(name, risk_level, icon, description, keywords)| SkillCategory {
                name: (*name).to_string(),
                risk_level: *risk_level,
                icon: (*icon).to_string(),
                description: (*description).to_string(),
                keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            })
            .collect();

        Self::new(categories)
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    /// Category name for a free-text skill
    pub fn categorize(&self, skill: &str) -> &str {
        if skill.is_empty() {
            return OTHER_CATEGORY;
        }
        self.categorize_lowercase(&skill.to_lowercase())
    }

    /// Same as [`categorize`](Self::categorize) for input already lower-cased
    pub fn categorize_lowercase(&self, skill_lower: &str) -> &str {
        if skill_lower.is_empty() {
            return OTHER_CATEGORY;
        }

        self.categories
            .iter()
            .find(|c| c.keywords.iter().any(|k| skill_lower.contains(k.as_str())))
            .map(|c| c.name.as_str())
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Risk of teaching a skill; unknown skills count as low risk
    pub fn risk_level(&self, skill: &str) -> RiskLevel {
        let category = self.categorize(skill);
        self.metadata(category)
            .map(|c| c.risk_level)
            .unwrap_or(RiskLevel::Low)
    }

    pub fn metadata(&self, category: &str) -> Option<&SkillCategory> {
        self.categories.iter().find(|c| c.name == category)
    }

    /// All category names followed by `Other`
    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| c.name.clone())
            .chain(std::iter::once(OTHER_CATEGORY.to_string()))
            .collect()
    }

    pub fn categories_by_risk(&self, level: RiskLevel) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| c.risk_level == level)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn requires_liability_waiver(&self, skill: &str) -> bool {
        matches!(self.risk_level(skill), RiskLevel::High | RiskLevel::Extreme)
    }

    /// High-risk categories, then extreme ones
    pub fn high_risk_categories(&self) -> Vec<&str> {
        let mut names = self.categories_by_risk(RiskLevel::High);
        names.extend(self.categories_by_risk(RiskLevel::Extreme));
        names
    }
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}
