//! Integration tests for the extraction pipeline

#[cfg(test)]
mod tests {
    use crate::{ExtractorConfig, ExtractorError, Pipeline};
    use scriptmind_domain::{Category, MemorySet};
    use scriptmind_llm::MockProvider;
    use std::time::Duration;

    fn script(len: usize) -> String {
        "x".repeat(len)
    }

    #[tokio::test]
    async fn test_full_extraction_flow() {
        let provider = MockProvider::new(r#"{"facts": ["f1"]}"#);
        let pipeline = Pipeline::new(provider.clone(), ExtractorConfig::default()).unwrap();

        let outcome = pipeline.run_detailed(&script(15_000)).await.unwrap();

        assert_eq!(outcome.metadata.chunk_count, 3);
        assert_eq!(provider.call_count(), 9);
        assert_eq!(outcome.memories.semantic.facts, vec!["f1"]);
        assert!(outcome.memories.episodic.events.is_empty());
        assert!(outcome.memories.procedural.skills.is_empty());
    }

    #[tokio::test]
    async fn test_always_failing_service_is_contained() {
        let pipeline = Pipeline::new(MockProvider::failing("HTTP 503"), ExtractorConfig::default()).unwrap();

        let outcome = pipeline.run_detailed(&script(15_000)).await.unwrap();

        let expected = vec!["extraction completed with errors: 3 of 3 chunks failed".to_string()];
        assert_eq!(outcome.memories.semantic.facts, expected);
        assert_eq!(outcome.memories.episodic.events, expected);
        assert_eq!(outcome.memories.procedural.skills, expected);
        assert!(outcome.memories.semantic.concepts.is_empty());
        for category in Category::ALL {
            assert_eq!(outcome.metadata.failed_chunks[&category], 3);
        }
    }

    #[tokio::test]
    async fn test_unparsable_responses_are_contained() {
        let pipeline = Pipeline::new(MockProvider::new("Sorry, no JSON today."), ExtractorConfig::default()).unwrap();
        let memories = pipeline.run("INT. LAB - NIGHT").await.unwrap();
        assert_eq!(
            memories.episodic.events,
            vec!["extraction completed with errors: 1 of 1 chunks failed"]
        );
    }

    #[tokio::test]
    async fn test_every_category_is_present() {
        let pipeline = Pipeline::new(MockProvider::new("{}"), ExtractorConfig::default()).unwrap();
        let memories = pipeline.run("FADE IN:").await.unwrap();

        assert_eq!(memories, MemorySet::default());
        let value = serde_json::to_value(&memories).unwrap();
        for category in Category::ALL {
            let record = &value[category.as_str()];
            for field in category.fields() {
                assert!(record.get(*field).is_some(), "{}.{} missing", category, field);
            }
        }
    }

    #[tokio::test]
    async fn test_per_category_responses() {
        let provider = MockProvider::default();
        provider.add_response(
            "SEMANTIC",
            "```json\n{\"facts\": [\"Neo is The One\"], \"character_traits\": {\"Neo\": [\"doubtful\"]}}\n```",
        );
        provider.add_response(
            "EPISODIC",
            "Here you go: {\"events\": [\"Neo takes the red pill\"], \"scenes\": [{\"location\": \"Nebuchadnezzar\", \"characters\": [\"Neo\", \"Morpheus\"], \"summary\": \"Neo wakes\", \"scene_number\": 4}]}",
        );
        provider.add_response("PROCEDURAL", "{'skills': ['kung fu']}");

        let pipeline = Pipeline::new(provider, ExtractorConfig::default()).unwrap();
        let memories = pipeline.run("INT. NEBUCHADNEZZAR - DAY").await.unwrap();

        assert_eq!(memories.semantic.facts, vec!["Neo is The One"]);
        assert_eq!(memories.semantic.character_traits["Neo"], vec!["doubtful"]);
        assert_eq!(memories.episodic.events, vec!["Neo takes the red pill"]);
        assert_eq!(memories.episodic.scenes[0].characters, vec!["Neo", "Morpheus"]);
        assert!(memories.episodic.scenes[0].extra.contains_key("scene_number"));
        assert_eq!(memories.procedural.skills, vec!["kung fu"]);
    }

    #[tokio::test]
    async fn test_slow_service_times_out_per_chunk() {
        let provider = MockProvider::new(r#"{"facts": ["late"]}"#).with_delay(Duration::from_secs(5));
        let config = ExtractorConfig {
            extraction_timeout_secs: 1,
            max_concurrency: 3,
            ..ExtractorConfig::default()
        };
        let pipeline = Pipeline::new(provider, config).unwrap();

        let outcome = pipeline.run_detailed("EXT. STREET - NIGHT").await.unwrap();
        assert_eq!(outcome.metadata.total_failures(), 3);
        assert_eq!(
            outcome.memories.semantic.facts,
            vec!["extraction completed with errors: 1 of 1 chunks failed"]
        );
    }

    #[tokio::test]
    async fn test_empty_document() {
        let pipeline = Pipeline::new(MockProvider::new("{}"), ExtractorConfig::default()).unwrap();
        assert!(matches!(pipeline.run("").await, Err(ExtractorError::EmptyDocument)));
    }
}
