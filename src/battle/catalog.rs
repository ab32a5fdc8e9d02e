//! Data catalog: classes, skills, and the campaign's chapters and stages
//!
//! Loaded from three TOML files (`classes.toml`, `skills.toml`,
//! `campaign.toml`). The shipped set is embedded at compile time.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::battle::formulas::Formulas;
use crate::battle::skills::Skill;
use crate::battle::stage::Stage;
use crate::battle::units::{EquipmentBonus, StatBlock, StatGrowth, Unit};
use crate::core::error::{Result, TacticsError};
use crate::core::types::TeamId;

const BUILTIN_CLASSES: &str = include_str!("../../data/classes.toml");
const BUILTIN_SKILLS: &str = include_str!("../../data/skills.toml");
const BUILTIN_CAMPAIGN: &str = include_str!("../../data/campaign.toml");

/// A spawnable unit archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitClass {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// Level-1 attributes
    #[serde(default)]
    pub base: StatBlock,
    /// Added per level past 1
    #[serde(default)]
    pub growth: StatGrowth,
    #[serde(default)]
    pub equipment: EquipmentBonus,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

#[derive(Debug, Default, Deserialize)]
struct ClassFile {
    #[serde(default)]
    classes: Vec<UnitClass>,
}

#[derive(Debug, Default, Deserialize)]
struct SkillFile {
    #[serde(default)]
    skills: Vec<Skill>,
}

#[derive(Debug, Default, Deserialize)]
struct CampaignFile {
    #[serde(default)]
    chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: AHashMap<String, UnitClass>,
    skills: AHashMap<String, Skill>,
    chapters: BTreeMap<u32, Chapter>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped data set
    pub fn builtin() -> Result<Self> {
        Self::from_toml_strs(BUILTIN_CLASSES, BUILTIN_SKILLS, BUILTIN_CAMPAIGN)
    }

    pub fn from_toml_strs(classes: &str, skills: &str, campaign: &str) -> Result<Self> {
        let classes: ClassFile = toml::from_str(classes)?;
        let skills: SkillFile = toml::from_str(skills)?;
        let campaign: CampaignFile = toml::from_str(campaign)?;

        let mut catalog = Self::new();
        for skill in skills.skills {
            catalog.insert_skill(skill);
        }
        for class in classes.classes {
            catalog.insert_class(class);
        }
        for chapter in campaign.chapters {
            catalog.insert_chapter(chapter);
        }
        Ok(catalog)
    }

    /// Load `classes.toml`, `skills.toml`, and `campaign.toml` from `dir`
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let classes = fs::read_to_string(dir.join("classes.toml"))?;
        let skills = fs::read_to_string(dir.join("skills.toml"))?;
        let campaign = fs::read_to_string(dir.join("campaign.toml"))?;
        Self::from_toml_strs(&classes, &skills, &campaign)
    }

    /// Class keys are case-insensitive; stored uppercase
    pub fn insert_class(&mut self, mut class: UnitClass) {
        class.key = class.key.to_ascii_uppercase();
        self.classes.insert(class.key.clone(), class);
    }

    pub fn insert_skill(&mut self, skill: Skill) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn insert_chapter(&mut self, chapter: Chapter) {
        self.chapters.insert(chapter.number, chapter);
    }

    /// Add or replace one stage, creating the chapter if needed
    pub fn insert_stage(&mut self, chapter: u32, stage: Stage) {
        let entry = self.chapters.entry(chapter).or_insert_with(|| Chapter {
            number: chapter,
            name: String::new(),
            stages: Vec::new(),
        });
        entry.stages.retain(|s| s.number != stage.number);
        entry.stages.push(stage);
    }

    pub fn class(&self, key: &str) -> Option<&UnitClass> {
        self.classes.get(&key.to_ascii_uppercase())
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.get(id)
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.get(&number)
    }

    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.values()
    }

    pub fn stage(&self, chapter: u32, stage: u32) -> Option<&Stage> {
        self.chapters
            .get(&chapter)
            .and_then(|c| c.stages.iter().find(|s| s.number == stage))
    }

    /// Build a full-HP unit of `class_key` at `level`. Unknown skill ids are
    /// left out with a warning. The id is assigned by the battle system.
    pub fn spawn_unit(&self, class_key: &str, level: i32, team: TeamId, formulas: &dyn Formulas) -> Result<Unit> {
        let class = self
            .class(class_key)
            .ok_or_else(|| TacticsError::UnknownClass(class_key.to_string()))?;

        let skills = class
            .skills
            .iter()
            .filter_map(|id| {
                let skill = self.skill(id).cloned();
                if skill.is_none() {
                    warn!(class = %class.key, skill = %id, "Unknown skill id, leaving it out");
                }
                skill
            })
            .collect();

        let stats = StatBlock::at_level(&class.base, &class.growth, level);
        let name = if class.name.is_empty() { &class.key } else { &class.name };
        let mut unit = Unit::new(name, &class.key, stats).with_skills(skills).on_team(team);
        unit.icon = class.icon.clone();
        unit.equipment = class.equipment;
        unit.refresh_resources(formulas);
        Ok(unit)
    }
}
