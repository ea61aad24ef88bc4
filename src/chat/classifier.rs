use crate::llm::models::{ChunkDelta, StreamUnit};

fn first_delta(unit: &StreamUnit) -> Option<&ChunkDelta> {
    unit.choices.first()?.delta.as_ref()
}

/// Text carried by `choices[0].delta.content`, if any.
pub fn text_fragment(unit: &StreamUnit) -> Option<&str> {
    first_delta(unit)?
        .content
        .as_deref()
        .filter(|s| !s.is_empty())
}

/// Arguments carried by `choices[0].delta.tool_calls[0].function.arguments`, if any.
pub fn function_fragment(unit: &StreamUnit) -> Option<&str> {
    first_delta(unit)?
        .tool_calls
        .as_ref()?
        .first()?
        .function
        .as_ref()?
        .arguments
        .as_deref()
        .filter(|s| !s.is_empty())
}

/// Both fragments of a unit, extracted independently.
pub fn classify(unit: &StreamUnit) -> (Option<&str>, Option<&str>) {
    (text_fragment(unit), function_fragment(unit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::models::{ChunkChoice, FunctionDelta, ToolCallDelta};

    fn unit_with(delta: Option<ChunkDelta>) -> StreamUnit {
        StreamUnit {
            choices: vec![ChunkChoice {
                delta,
                finish_reason: None,
            }],
        }
    }

    #[test]
    fn test_text_unit() {
        assert_eq!(classify(&StreamUnit::text("Hel")), (Some("Hel"), None));
    }

    #[test]
    fn test_function_unit() {
        assert_eq!(
            classify(&StreamUnit::function_arguments("{\"a\":")),
            (None, Some("{\"a\":"))
        );
    }

    #[test]
    fn test_missing_levels_are_absent() {
        assert_eq!(classify(&StreamUnit::default()), (None, None));
        assert_eq!(classify(&unit_with(None)), (None, None));
        assert_eq!(classify(&unit_with(Some(ChunkDelta::default()))), (None, None));

        let no_calls = unit_with(Some(ChunkDelta {
            content: None,
            tool_calls: Some(vec![]),
        }));
        assert_eq!(function_fragment(&no_calls), None);

        let no_function = unit_with(Some(ChunkDelta {
            content: None,
            tool_calls: Some(vec![ToolCallDelta { function: None }]),
        }));
        assert_eq!(function_fragment(&no_function), None);

        let name_only = unit_with(Some(ChunkDelta {
            content: None,
            tool_calls: Some(vec![ToolCallDelta {
                function: Some(FunctionDelta {
                    name: Some("say".to_string()),
                    arguments: None,
                }),
            }]),
        }));
        assert_eq!(function_fragment(&name_only), None);
    }

    #[test]
    fn test_empty_fragments_are_absent() {
        assert_eq!(classify(&StreamUnit::text("")), (None, None));
        assert_eq!(classify(&StreamUnit::function_arguments("")), (None, None));
    }

    #[test]
    fn test_only_first_choice_and_call_are_read() {
        let mut choices = vec![ChunkChoice::default()];
        choices.extend(StreamUnit::text("ignored").choices);
        let unit = StreamUnit { choices };
        assert_eq!(text_fragment(&unit), None);
    }

    #[test]
    fn test_both_fragments_extracted_independently() {
        let unit = unit_with(Some(ChunkDelta {
            content: Some("Hi".to_string()),
            tool_calls: StreamUnit::function_arguments("{}").choices[0]
                .delta
                .as_ref()
                .and_then(|d| d.tool_calls.clone()),
        }));
        assert_eq!(classify(&unit), (Some("Hi"), Some("{}")));
    }
}
