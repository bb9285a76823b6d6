/// Checks that what the detection service saw plausibly belongs in the chosen room.
///
/// Three sub-scores are combined: objects (weight 0.5), the design
/// description's style and color wording (0.3) and, when the user wrote
/// notes, whether the description picks up their themes (0.2).
use super::stages::normalize_object_name;
use crate::pipeline::services::templates::RoomType;
use crate::pipeline::types::{EnhancementInput, RelevanceSummary};
use tracing::debug;

const OBJECT_BASE_SCORE: f64 = 100.0;
const FORBIDDEN_OBJECT_PENALTY: f64 = 30.0;
const EXPECTED_OBJECT_BONUS: f64 = 5.0;

const STYLE_BASE_SCORE: f64 = 80.0;
const STYLE_WORD_BONUS: f64 = 5.0;
const COLOR_WORD_BONUS: f64 = 3.0;
const INAPPROPRIATE_STYLE_PENALTY: f64 = 20.0;

const NOTES_BASE_SCORE: f64 = 85.0;
const ADDRESSED_THEME_BONUS: f64 = 5.0;
const UNADDRESSED_NOTES_PENALTY: f64 = 15.0;

const OBJECT_WEIGHT: f64 = 0.5;
const STYLE_WEIGHT: f64 = 0.3;
const NOTES_WEIGHT: f64 = 0.2;

/// Below this score the summary also asks for more specific notes
const SPECIFIC_NOTES_SCORE: f64 = 80.0;
const MAX_LISTED_ISSUES: usize = 3;

/// Improvement themes and the note keywords that raise them, in report order
const NOTE_THEMES: [(&str, &[&str]); 8] = [
    ("lighting", &["light", "bright", "dark", "lamp", "illuminate"]),
    ("color", &["color", "paint", "wall", "bright", "dark"]),
    ("furniture", &["furniture", "chair", "table", "sofa", "bed"]),
    ("space", &["space", "room", "area", "layout", "organize"]),
    ("storage", &["storage", "organize", "clutter", "shelf", "cabinet"]),
    ("comfort", &["comfort", "cozy", "relax", "comfortable"]),
    ("modern", &["modern", "contemporary", "update", "new"]),
    ("traditional", &["traditional", "classic", "vintage", "antique"]),
];

/// What belongs, and what does not, in one kind of room
#[derive(Debug, Clone, Copy)]
struct RelevanceRules {
    expected_objects: &'static [&'static str],
    forbidden_objects: &'static [&'static str],
    style_words: &'static [&'static str],
    color_words: &'static [&'static str],
    inappropriate_styles: &'static [&'static str],
    advice: Option<&'static str>,
}

impl RelevanceRules {
    const NONE: Self = Self {
        expected_objects: &[],
        forbidden_objects: &[],
        style_words: &[],
        color_words: &[],
        inappropriate_styles: &[],
        advice: None,
    };

    fn for_room(room: RoomType) -> Self {
        match room {
            RoomType::Bedroom => Self {
                expected_objects: &["bed", "nightstand", "dresser", "wardrobe", "lamp", "pillow", "blanket"],
                forbidden_objects: &["refrigerator", "oven", "dishwasher", "toilet", "bathtub", "shower"],
                style_words: &["cozy", "restful", "intimate", "personal"],
                color_words: &["calming", "soft", "neutral", "warm"],
                inappropriate_styles: &["industrial", "clinical", "sterile", "commercial"],
                advice: Some("Focus on creating a restful, private space with appropriate bedroom furniture and calming colors."),
            },
            RoomType::LivingRoom => Self {
                expected_objects: &["sofa", "couch", "chair", "coffee table", "tv", "entertainment center"],
                forbidden_objects: &["bed", "toilet", "bathtub", "shower", "stove", "oven", "refrigerator"],
                style_words: &["social", "entertaining", "comfortable", "spacious"],
                color_words: &["welcoming", "social", "comfortable", "inviting"],
                inappropriate_styles: &["clinical", "sterile", "laboratory"],
                advice: Some("Emphasize social areas, comfortable seating, and entertainment spaces."),
            },
            RoomType::Kitchen => Self {
                expected_objects: &["stove", "refrigerator", "sink", "counter", "cabinet", "microwave"],
                forbidden_objects: &["bed", "toilet", "bathtub", "shower"],
                style_words: &["functional", "efficient", "clean", "organized"],
                color_words: &["clean", "bright", "functional", "hygienic"],
                inappropriate_styles: &["bedroom", "intimate", "romantic"],
                advice: Some("Highlight functional cooking areas, storage solutions, and food preparation spaces."),
            },
            RoomType::DiningRoom => Self {
                expected_objects: &["dining table", "chairs", "chandelier", "sideboard", "cabinet"],
                forbidden_objects: &["bed", "toilet", "bathtub", "shower", "stove", "oven"],
                style_words: &["formal", "elegant", "dining", "entertaining"],
                color_words: &["elegant", "formal", "inviting", "sophisticated"],
                inappropriate_styles: &["casual", "messy", "cluttered"],
                advice: Some("Focus on dining furniture, elegant lighting, and spaces for entertaining."),
            },
            RoomType::Other => Self::NONE,
        }
    }
}

/// Either name contains the other; `dining_table` is compared as `dining table`.
fn matches_any(object: &str, candidates: &[&str]) -> bool {
    let object = object.replace('_', " ");
    candidates
        .iter()
        .any(|candidate| object.contains(candidate) || candidate.contains(object.as_str()))
}

fn count_words(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|word| text.contains(*word)).count()
}

struct SubScore {
    score: f64,
    details: Vec<String>,
    issues: Vec<String>,
}

impl SubScore {
    fn new(base: f64) -> Self {
        Self {
            score: base,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn clamped(mut self) -> Self {
        self.score = self.score.clamp(0.0, 100.0);
        self
    }
}

fn score_objects(objects: &[String], rules: &RelevanceRules) -> SubScore {
    let mut sub = SubScore::new(OBJECT_BASE_SCORE);

    let forbidden: Vec<&str> = objects
        .iter()
        .filter(|o| matches_any(o, rules.forbidden_objects))
        .map(String::as_str)
        .collect();
    if !forbidden.is_empty() {
        sub.issues
            .push(format!("Inappropriate objects detected: {}", forbidden.join(", ")));
        sub.score -= forbidden.len() as f64 * FORBIDDEN_OBJECT_PENALTY;
    }

    let expected: Vec<&str> = objects
        .iter()
        .filter(|o| matches_any(o, rules.expected_objects))
        .map(String::as_str)
        .collect();
    if !expected.is_empty() {
        sub.score += expected.len() as f64 * EXPECTED_OBJECT_BONUS;
        sub.details
            .push(format!("Appropriate objects found: {}", expected.join(", ")));
    }

    sub.clamped()
}

fn score_description(description: &str, rules: &RelevanceRules) -> SubScore {
    let mut sub = SubScore::new(STYLE_BASE_SCORE);

    let style_matches = count_words(description, rules.style_words);
    if style_matches > 0 {
        sub.score += style_matches as f64 * STYLE_WORD_BONUS;
        sub.details.push(format!(
            "Appropriate style elements detected: {} matches",
            style_matches
        ));
    }

    let color_matches = count_words(description, rules.color_words);
    if color_matches > 0 {
        sub.score += color_matches as f64 * COLOR_WORD_BONUS;
        sub.details.push(format!(
            "Appropriate color themes detected: {} matches",
            color_matches
        ));
    }

    for word in rules.inappropriate_styles {
        if description.contains(word) {
            sub.issues
                .push(format!("Inappropriate style element: {}", word));
            sub.score -= INAPPROPRIATE_STYLE_PENALTY;
        }
    }

    sub.clamped()
}

fn note_themes(notes: &str) -> Vec<&'static str> {
    NOTE_THEMES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| notes.contains(k)))
        .map(|(theme, _)| *theme)
        .collect()
}

fn score_notes(description: &str, notes: &str) -> SubScore {
    let mut sub = SubScore::new(NOTES_BASE_SCORE);
    let themes = note_themes(notes);
    let addressed = themes.iter().filter(|t| description.contains(*t)).count();

    if addressed > 0 {
        sub.score += addressed as f64 * ADDRESSED_THEME_BONUS;
        sub.details.push(format!(
            "User improvement themes addressed: {} out of {}",
            addressed,
            themes.len()
        ));
    } else if !themes.is_empty() {
        sub.issues.push(
            "Detected design doesn't address the specific improvement requests in the notes"
                .to_string(),
        );
        sub.score -= UNADDRESSED_NOTES_PENALTY;
    }

    sub.clamped()
}

/// Scores the enhancement against the resolved room type.
pub fn assess_relevance(
    room: RoomType,
    enhancement: &EnhancementInput,
    user_notes: &str,
    threshold: f64,
) -> RelevanceSummary {
    let rules = RelevanceRules::for_room(room);

    let mut objects: Vec<String> = Vec::new();
    for name in &enhancement.detected_object_names {
        let name = normalize_object_name(name);
        if !name.is_empty() && !objects.contains(&name) {
            objects.push(name);
        }
    }
    let description = enhancement.design_description.to_lowercase();
    let notes = user_notes.trim().to_lowercase();

    let mut weighted = vec![
        (score_objects(&objects, &rules), OBJECT_WEIGHT),
        (score_description(&description, &rules), STYLE_WEIGHT),
    ];
    if !notes.is_empty() {
        weighted.push((score_notes(&description, &notes), NOTES_WEIGHT));
    }

    let total_weight: f64 = weighted.iter().map(|(_, w)| w).sum();
    let relevance_score =
        (weighted.iter().map(|(sub, w)| sub.score * w).sum::<f64>() / total_weight).round();

    let (details, warnings): (Vec<String>, Vec<String>) = weighted.into_iter().fold(
        (Vec::new(), Vec::new()),
        |(mut details, mut warnings), (sub, _)| {
            details.extend(sub.details);
            warnings.extend(sub.issues);
            (details, warnings)
        },
    );

    let is_relevant = relevance_score >= threshold;
    let mut recommendations = Vec::new();
    if !is_relevant {
        recommendations.push(format!(
            "The detected contents don't appear to fit a {}. Consider a photo that shows the room's main furniture.",
            room
        ));
    }
    if !warnings.is_empty() {
        let listed: Vec<&str> = warnings
            .iter()
            .take(MAX_LISTED_ISSUES)
            .map(String::as_str)
            .collect();
        recommendations.push(format!("Address the following issues: {}", listed.join("; ")));
    }
    if relevance_score < SPECIFIC_NOTES_SCORE {
        recommendations.push(
            "Consider providing more specific improvement notes to get better targeted suggestions."
                .to_string(),
        );
    }
    if let Some(advice) = rules.advice {
        recommendations.push(advice.to_string());
    }

    debug!(
        "Relevance for {}: score {} over {} objects, {} warnings",
        room,
        relevance_score,
        objects.len(),
        warnings.len()
    );

    RelevanceSummary {
        is_relevant,
        relevance_score,
        details,
        validation_warnings: warnings,
        recommendations,
    }
}
