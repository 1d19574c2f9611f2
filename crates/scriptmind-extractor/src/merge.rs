//! Merge per-chunk records into one record per category

use scriptmind_domain::{Category, EpisodicRecord, ExtractionRecord, ProceduralRecord, Scene, SemanticRecord};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Merge records of one category, in chunk order
///
/// String lists are concatenated keeping only the first occurrence of each
/// value. Scenes are concatenated as they are. Character traits are merged
/// per character the same way as string lists. Records of another category
/// are skipped.
pub fn merge_records<'a, I>(category: Category, records: I) -> ExtractionRecord
where
    I: IntoIterator<Item = &'a ExtractionRecord>,
{
    let mut merger = Merger::new(category);
    for record in records {
        merger.push(record);
    }
    merger.finish()
}

/// Ordered list that drops repeated values
#[derive(Default)]
struct UniqueList {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl UniqueList {
    fn extend<'a>(&mut self, values: impl IntoIterator<Item = &'a String>) {
        for value in values {
            if self.seen.insert(value.clone()) {
                self.items.push(value.clone());
            }
        }
    }
}

enum Merger {
    Semantic {
        facts: UniqueList,
        concepts: UniqueList,
        character_traits: BTreeMap<String, UniqueList>,
        world_building: UniqueList,
    },
    Episodic {
        events: UniqueList,
        scenes: Vec<Scene>,
        timeline: UniqueList,
        turning_points: UniqueList,
    },
    Procedural {
        skills: UniqueList,
        processes: UniqueList,
        behaviors: UniqueList,
        rules: UniqueList,
    },
}

impl Merger {
    fn new(category: Category) -> Self {
        match category {
            Category::Semantic => Merger::Semantic {
                facts: UniqueList::default(),
                concepts: UniqueList::default(),
                character_traits: BTreeMap::new(),
                world_building: UniqueList::default(),
            },
            Category::Episodic => Merger::Episodic {
                events: UniqueList::default(),
                scenes: Vec::new(),
                timeline: UniqueList::default(),
                turning_points: UniqueList::default(),
            },
            Category::Procedural => Merger::Procedural {
                skills: UniqueList::default(),
                processes: UniqueList::default(),
                behaviors: UniqueList::default(),
                rules: UniqueList::default(),
            },
        }
    }

    fn category(&self) -> Category {
        match self {
            Merger::Semantic { .. } => Category::Semantic,
            Merger::Episodic { .. } => Category::Episodic,
            Merger::Procedural { .. } => Category::Procedural,
        }
    }

    fn push(&mut self, record: &ExtractionRecord) {
        match (self, record) {
            (
                Merger::Semantic {
                    facts,
                    concepts,
                    character_traits,
                    world_building,
                },
                ExtractionRecord::Semantic(r),
            ) => {
                facts.extend(&r.facts);
                concepts.extend(&r.concepts);
                world_building.extend(&r.world_building);
                for (character, traits) in &r.character_traits {
                    character_traits.entry(character.clone()).or_default().extend(traits);
                }
            }
            (
                Merger::Episodic {
                    events,
                    scenes,
                    timeline,
                    turning_points,
                },
                ExtractionRecord::Episodic(r),
            ) => {
                events.extend(&r.events);
                scenes.extend(r.scenes.iter().cloned());
                timeline.extend(&r.timeline);
                turning_points.extend(&r.turning_points);
            }
            (
                Merger::Procedural {
                    skills,
                    processes,
                    behaviors,
                    rules,
                },
                ExtractionRecord::Procedural(r),
            ) => {
                skills.extend(&r.skills);
                processes.extend(&r.processes);
                behaviors.extend(&r.behaviors);
                rules.extend(&r.rules);
            }
            (merger, other) => {
                warn!(
                    expected = %merger.category(),
                    found = %other.category(),
                    "Skipping record of another category during merge"
                );
            }
        }
    }

    fn finish(self) -> ExtractionRecord {
        match self {
            Merger::Semantic {
                facts,
                concepts,
                character_traits,
                world_building,
            } => ExtractionRecord::Semantic(SemanticRecord {
                facts: facts.items,
                concepts: concepts.items,
                character_traits: character_traits
                    .into_iter()
                    .map(|(character, traits)| (character, traits.items))
                    .collect(),
                world_building: world_building.items,
            }),
            Merger::Episodic {
                events,
                scenes,
                timeline,
                turning_points,
            } => ExtractionRecord::Episodic(EpisodicRecord {
                events: events.items,
                scenes,
                timeline: timeline.items,
                turning_points: turning_points.items,
            }),
            Merger::Procedural {
                skills,
                processes,
                behaviors,
                rules,
            } => ExtractionRecord::Procedural(ProceduralRecord {
                skills: skills.items,
                processes: processes.items,
                behaviors: behaviors.items,
                rules: rules.items,
            }),
        }
    }
}
