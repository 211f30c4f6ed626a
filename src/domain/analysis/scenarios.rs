//! Scenario templates: keyword routing for supported analysis types.
//!
//! Each template names an analysis type, the query keywords that select it,
//! and the tools an analysis of that type typically needs. Classification
//! is a keyword scan; queries matching nothing are "general".

use once_cell::sync::Lazy;

/// One supported analysis scenario.
#[derive(Debug, Clone)]
pub struct ScenarioTemplate {
    /// Stable key ("rental_housing", ...).
    pub key: &'static str,
    /// Query keywords that select this scenario.
    pub keywords: &'static [&'static str],
    /// Tools an analysis of this type typically needs.
    pub recommended_tools: &'static [&'static str],
}

/// The supported scenarios, in matching priority order.
pub static SCENARIOS: Lazy<Vec<ScenarioTemplate>> = Lazy::new(|| {
    vec![
        ScenarioTemplate {
            key: "rental_housing",
            keywords: &["租房", "找房", "住房", "房子", "租赁", "rental", "apartment", "housing"],
            recommended_tools: &[
                "maps_geo",
                "maps_around_search",
                "maps_direction_transit_integrated",
            ],
        },
        ScenarioTemplate {
            key: "travel_planning",
            keywords: &["旅游", "旅行", "攻略", "景点", "行程", "trip", "travel", "itinerary"],
            recommended_tools: &["maps_text_search", "maps_around_search"],
        },
        ScenarioTemplate {
            key: "route_planning",
            keywords: &["路线", "导航", "出行方式", "交通", "到达", "route", "directions", "transit"],
            recommended_tools: &[
                "maps_geo",
                "maps_direction_walking",
                "maps_direction_transit_integrated",
            ],
        },
        ScenarioTemplate {
            key: "accommodation",
            keywords: &["酒店", "住宿", "客栈", "民宿", "hotel", "hostel", "accommodation"],
            recommended_tools: &["maps_text_search", "maps_around_search"],
        },
        ScenarioTemplate {
            key: "poi_search",
            keywords: &["附近", "周边", "推荐", "nearby", "around", "search", "find"],
            recommended_tools: &["maps_around_search", "maps_text_search"],
        },
    ]
});

/// Example queries surfaced through the capabilities endpoint.
pub static EXAMPLE_QUERIES: &[&str] = &[
    "我在北京海淀区和朝阳区都有工作，想找一个通勤方便的房子",
    "帮我规划成都3天2夜旅游攻略",
    "从上海到杭州怎么走最快",
    "我附近有什么好吃的餐厅",
    "深圳南山区有什么好酒店",
];

/// Matches a query against the scenario keyword lists.
pub fn classify(query: &str) -> Option<&'static ScenarioTemplate> {
    let lowered = query.to_lowercase();
    SCENARIOS
        .iter()
        .find(|scenario| scenario.keywords.iter().any(|kw| lowered.contains(kw)))
}

/// Analysis type for a query, falling back to "general".
pub fn classify_analysis_type(query: &str) -> &'static str {
    classify(query).map(|s| s.key).unwrap_or("general")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_keywords_match() {
        assert_eq!(classify_analysis_type("我想租房，预算5000"), "rental_housing");
        assert_eq!(classify_analysis_type("帮我规划旅游行程"), "travel_planning");
        assert_eq!(classify_analysis_type("到机场的路线"), "route_planning");
    }

    #[test]
    fn english_keywords_match_case_insensitively() {
        assert_eq!(classify_analysis_type("Find an Apartment near work"), "rental_housing");
        assert_eq!(classify_analysis_type("plan a TRIP to Chengdu"), "travel_planning");
        assert_eq!(classify_analysis_type("good hotel in Shenzhen"), "accommodation");
    }

    #[test]
    fn unmatched_query_is_general() {
        assert_eq!(classify_analysis_type("what is the weather like"), "general");
    }

    #[test]
    fn earlier_scenarios_win_on_overlap() {
        // "租房" (rental) and "附近" (nearby) both match; rental is listed first.
        assert_eq!(classify_analysis_type("附近租房"), "rental_housing");
    }

    #[test]
    fn every_scenario_has_keywords_and_tools() {
        for scenario in SCENARIOS.iter() {
            assert!(!scenario.keywords.is_empty());
            assert!(!scenario.recommended_tools.is_empty());
        }
    }
}
