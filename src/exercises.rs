use std::sync::OnceLock;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Eye,
    Stretch,
    Breathing,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Eye, Category::Stretch, Category::Breathing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Eye => "eye",
            Category::Stretch => "stretch",
            Category::Breathing => "breathing",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        match value {
            "eye" => Some(Category::Eye),
            "stretch" => Some(Category::Stretch),
            "breathing" => Some(Category::Breathing),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Eye => "Eye Care",
            Category::Stretch => "Stretching",
            Category::Breathing => "Breathing",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStep {
    pub text: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub duration_secs: u32,
    pub description: &'static str,
    pub image: &'static str,
    pub steps: Vec<ExerciseStep>,
}

/// The built-in guided exercise catalog: four exercises per category.
pub fn catalog() -> &'static [Exercise] {
    static CATALOG: OnceLock<Vec<Exercise>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

pub fn find_by_id(id: &str) -> Option<&'static Exercise> {
    catalog().iter().find(|exercise| exercise.id == id)
}

/// Uniform random pick among exercises whose category is enabled. `None`
/// when no enabled category has exercises.
pub fn pick_random(enabled: &[Category]) -> Option<&'static Exercise> {
    let pool: Vec<&Exercise> = catalog()
        .iter()
        .filter(|exercise| enabled.contains(&exercise.category))
        .collect();
    pool.choose(&mut rand::thread_rng()).copied()
}

fn step(text: &'static str, image: &'static str) -> ExerciseStep {
    ExerciseStep { text, image }
}

fn build_catalog() -> Vec<Exercise> {
    vec![
        Exercise {
            id: "eye-1",
            name: "20-20-20 Rule",
            category: Category::Eye,
            duration_secs: 20,
            description: "Look at something 20 feet away for 20 seconds",
            image: "assets/images/eye/eye-1.jpg",
            steps: vec![
                step("Find an object 20 feet away", "assets/images/eye/eye-1-step-1.jpg"),
                step("Focus on it for 20 seconds", "assets/images/eye/eye-1-step-2.jpg"),
                step("Blink naturally", "assets/images/eye/eye-1-step-3.jpg"),
            ],
        },
        Exercise {
            id: "eye-2",
            name: "Eye Rolling",
            category: Category::Eye,
            duration_secs: 30,
            description: "Gentle circular eye movements",
            image: "assets/images/eye/eye-2.jpg",
            steps: vec![
                step("Close your eyes", "assets/images/eye/eye-2-step-1.jpg"),
                step("Roll eyes clockwise 5 times", "assets/images/eye/eye-2-step-2.jpg"),
                step("Roll eyes counter-clockwise 5 times", "assets/images/eye/eye-2-step-3.jpg"),
            ],
        },
        Exercise {
            id: "eye-3",
            name: "Palming",
            category: Category::Eye,
            duration_secs: 60,
            description: "Rest your eyes in darkness",
            image: "assets/images/eye/eye-3.jpg",
            steps: vec![
                step("Rub palms together to warm them", "assets/images/eye/eye-3-step-1.jpg"),
                step("Cup palms over closed eyes", "assets/images/eye/eye-3-step-2.jpg"),
                step("Relax and breathe deeply", "assets/images/eye/eye-3-step-3.jpg"),
            ],
        },
        Exercise {
            id: "eye-4",
            name: "Focus Shifting",
            category: Category::Eye,
            duration_secs: 45,
            description: "Alternate between near and far focus",
            image: "assets/images/eye/eye-4.jpg",
            steps: vec![
                step("Hold thumb 10 inches away", "assets/images/eye/eye-4-step-1.jpg"),
                step("Focus on thumb for 5 seconds", "assets/images/eye/eye-4-step-2.jpg"),
                step("Focus on distant object for 5 seconds", "assets/images/eye/eye-4-step-3.jpg"),
                step("Repeat 5 times", "assets/images/eye/eye-4-step-4.jpg"),
            ],
        },
        Exercise {
            id: "stretch-1",
            name: "Neck Rolls",
            category: Category::Stretch,
            duration_secs: 45,
            description: "Gentle neck stretches to release tension",
            image: "assets/images/stretch/stretch-1.jpg",
            steps: vec![
                step("Drop chin to chest", "assets/images/stretch/stretch-1-step-1.jpg"),
                step("Roll head to right shoulder", "assets/images/stretch/stretch-1-step-2.jpg"),
                step("Roll back and to left", "assets/images/stretch/stretch-1-step-3.jpg"),
                step("Complete 3 circles each direction", "assets/images/stretch/stretch-1-step-4.jpg"),
            ],
        },
        Exercise {
            id: "stretch-2",
            name: "Shoulder Shrugs",
            category: Category::Stretch,
            duration_secs: 30,
            description: "Release shoulder tension",
            image: "assets/images/stretch/stretch-2.jpg",
            steps: vec![
                step("Raise shoulders to ears", "assets/images/stretch/stretch-2-step-1.jpg"),
                step("Hold for 3 seconds", "assets/images/stretch/stretch-2-step-2.jpg"),
                step("Release and relax", "assets/images/stretch/stretch-2-step-3.jpg"),
                step("Repeat 5 times", "assets/images/stretch/stretch-2-step-4.jpg"),
            ],
        },
        Exercise {
            id: "stretch-3",
            name: "Wrist Circles",
            category: Category::Stretch,
            duration_secs: 30,
            description: "Loosen up your wrists",
            image: "assets/images/stretch/stretch-3.jpg",
            steps: vec![
                step("Extend arms forward", "assets/images/stretch/stretch-3-step-1.jpg"),
                step("Make fists", "assets/images/stretch/stretch-3-step-2.jpg"),
                step("Rotate wrists 10 times each direction", "assets/images/stretch/stretch-3-step-3.jpg"),
            ],
        },
        Exercise {
            id: "stretch-4",
            name: "Seated Spinal Twist",
            category: Category::Stretch,
            duration_secs: 60,
            description: "Gentle spine rotation",
            image: "assets/images/stretch/stretch-4.jpg",
            steps: vec![
                step("Sit up straight", "assets/images/stretch/stretch-4-step-1.jpg"),
                step("Place right hand on left knee", "assets/images/stretch/stretch-4-step-2.jpg"),
                step("Twist torso left, look over shoulder", "assets/images/stretch/stretch-4-step-3.jpg"),
                step("Hold 15 seconds, switch sides", "assets/images/stretch/stretch-4-step-4.jpg"),
            ],
        },
        Exercise {
            id: "breath-1",
            name: "Box Breathing",
            category: Category::Breathing,
            duration_secs: 60,
            description: "4-4-4-4 breathing pattern for calm",
            image: "assets/images/breath/breath-1.jpg",
            steps: vec![
                step("Inhale for 4 counts", "assets/images/breath/breath-1-step-1.jpg"),
                step("Hold for 4 counts", "assets/images/breath/breath-1-step-2.jpg"),
                step("Exhale for 4 counts", "assets/images/breath/breath-1-step-3.jpg"),
                step("Hold for 4 counts", "assets/images/breath/breath-1-step-4.jpg"),
                step("Repeat 3 times", "assets/images/breath/breath-1-step-5.jpg"),
            ],
        },
        Exercise {
            id: "breath-2",
            name: "4-7-8 Technique",
            category: Category::Breathing,
            duration_secs: 45,
            description: "Calming breath for stress relief",
            image: "assets/images/breath/breath-2.jpg",
            steps: vec![
                step("Inhale through nose for 4 counts", "assets/images/breath/breath-2-step-1.jpg"),
                step("Hold breath for 7 counts", "assets/images/breath/breath-2-step-2.jpg"),
                step("Exhale through mouth for 8 counts", "assets/images/breath/breath-2-step-3.jpg"),
            ],
        },
        Exercise {
            id: "breath-3",
            name: "Deep Belly Breathing",
            category: Category::Breathing,
            duration_secs: 60,
            description: "Diaphragmatic breathing",
            image: "assets/images/breath/breath-3.jpg",
            steps: vec![
                step("Place hand on belly", "assets/images/breath/breath-3-step-1.jpg"),
                step("Inhale deeply, feel belly rise", "assets/images/breath/breath-3-step-2.jpg"),
                step("Exhale slowly, feel belly fall", "assets/images/breath/breath-3-step-3.jpg"),
                step("Repeat 5 times", "assets/images/breath/breath-3-step-4.jpg"),
            ],
        },
        Exercise {
            id: "breath-4",
            name: "Energizing Breath",
            category: Category::Breathing,
            duration_secs: 30,
            description: "Quick breathing to boost energy",
            image: "assets/images/breath/breath-4.jpg",
            steps: vec![
                step("Take 3 quick, sharp inhales through nose", "assets/images/breath/breath-4-step-1.jpg"),
                step("One long exhale through mouth", "assets/images/breath/breath-4-step-2.jpg"),
                step("Repeat 5 times", "assets/images/breath/breath-4-step-3.jpg"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_exercises_per_category() {
        for category in Category::ALL {
            let count = catalog()
                .iter()
                .filter(|exercise| exercise.category == category)
                .count();
            assert_eq!(count, 4, "category {category:?}");
        }
    }

    #[test]
    fn every_exercise_has_steps_and_a_positive_duration() {
        for exercise in catalog() {
            assert!(!exercise.steps.is_empty(), "{}", exercise.id);
            assert!(exercise.duration_secs > 0, "{}", exercise.id);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = catalog().iter().map(|exercise| exercise.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn find_by_id_round_trips() {
        let exercise = find_by_id("breath-1").unwrap();
        assert_eq!(exercise.name, "Box Breathing");
        assert!(find_by_id("nope").is_none());
    }

    #[test]
    fn pick_random_respects_enabled_categories() {
        for _ in 0..50 {
            let exercise = pick_random(&[Category::Eye]).unwrap();
            assert_eq!(exercise.category, Category::Eye);
        }
        assert!(pick_random(&[]).is_none());
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Eye).unwrap(), "\"eye\"");
        let parsed: Category = serde_json::from_str("\"breathing\"").unwrap();
        assert_eq!(parsed, Category::Breathing);
    }
}
