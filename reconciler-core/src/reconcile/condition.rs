//! Qualitative condition labels and advisory texts derived from the
//! merged fields.

use std::collections::BTreeMap;

use crate::report::RecommendationCategory;

// Keyword sets match both free-text wording and the categorical tokens
// the primary source emits ("Mist", "Rain", "Snow").
const FOG_KEYWORDS: [&str; 3] = ["fog", "mist", "haze"];
const RAIN_KEYWORDS: [&str; 3] = ["rain", "drizzle", "shower"];
const SNOW_KEYWORDS: [&str; 3] = ["snow", "blizzard", "sleet"];

fn mentions_any(description: &str, keywords: &[&str]) -> bool {
    let lower = description.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// Derive the overall-condition label from the merged temperature, wind
/// and description.
pub fn classify(
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    description: Option<&str>,
) -> String {
    let Some(temp) = temperature else {
        return "insufficient data".to_string();
    };

    let wind = wind_speed.unwrap_or(0.0);
    let description = description.unwrap_or("");

    let mut parts = vec![temperature_bucket(temp)];

    if wind > 10.0 {
        parts.push("windy");
    } else if wind > 5.0 {
        parts.push("with wind");
    }

    if mentions_any(description, &FOG_KEYWORDS) {
        parts.push("foggy");
    }
    if mentions_any(description, &RAIN_KEYWORDS) {
        parts.push("rainy");
    }
    if mentions_any(description, &SNOW_KEYWORDS) {
        parts.push("snowy");
    }

    if parts.is_empty() { "normal conditions".to_string() } else { parts.join(", ") }
}

fn temperature_bucket(temp: f64) -> &'static str {
    if temp < -30.0 {
        "extremely cold"
    } else if temp < -20.0 {
        "very cold"
    } else if temp < -10.0 {
        "cold"
    } else if temp < 0.0 {
        "frosty"
    } else if temp < 10.0 {
        "chilly"
    } else if temp < 20.0 {
        "warm"
    } else if temp < 30.0 {
        "hot"
    } else {
        "extremely hot"
    }
}

/// Derive advisory texts from the merged fields. Produces nothing when
/// the merged temperature is unknown.
pub fn recommend(
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    description: Option<&str>,
    geomagnetic_index: Option<i64>,
) -> BTreeMap<RecommendationCategory, String> {
    let mut recommendations = BTreeMap::new();

    let Some(temp) = temperature else {
        return recommendations;
    };

    recommendations.insert(RecommendationCategory::Clothing, clothing_advice(temp).to_string());
    recommendations.insert(RecommendationCategory::Activities, activity_advice(temp).to_string());

    if wind_speed.unwrap_or(0.0) > 10.0 {
        recommendations
            .insert(RecommendationCategory::WindWarning, "Be careful in open areas".to_string());
    }

    if description.is_some_and(|d| mentions_any(d, &RAIN_KEYWORDS)) {
        recommendations
            .insert(RecommendationCategory::Umbrella, "Taking an umbrella is recommended".to_string());
    }

    if geomagnetic_index.is_some_and(|index| index > 4) {
        recommendations.insert(
            RecommendationCategory::HealthWarning,
            "Geomagnetic storm - pay attention to how you feel".to_string(),
        );
    }

    recommendations
}

fn clothing_advice(temp: f64) -> &'static str {
    if temp < -20.0 {
        "Heavy winter clothing, thermal underwear, hat, scarf, mittens"
    } else if temp < -10.0 {
        "Warm winter coat, hat, gloves"
    } else if temp < 0.0 {
        "Winter jacket, hat"
    } else if temp < 10.0 {
        "Mid-season jacket, sweater"
    } else if temp < 20.0 {
        "Light jacket or windbreaker"
    } else {
        "Light clothing"
    }
}

fn activity_advice(temp: f64) -> &'static str {
    if temp < -15.0 {
        "Stay indoors, limit time outside"
    } else if temp < -5.0 {
        "Short walks, winter sports"
    } else if temp < 15.0 {
        "Walks, outdoor activities"
    } else {
        "Perfect for walks and time in nature"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_temperature_is_insufficient_data() {
        assert_eq!(classify(None, Some(12.0), Some("rain")), "insufficient data");
    }

    #[test]
    fn temperature_bucket_boundaries() {
        let cases = [
            (-35.0, "extremely cold"),
            (-30.0, "very cold"),
            (-20.0, "cold"),
            (-10.0, "frosty"),
            (-0.1, "frosty"),
            (0.0, "chilly"),
            (10.0, "warm"),
            (20.0, "hot"),
            (30.0, "extremely hot"),
        ];

        for (temp, expected) in cases {
            assert_eq!(classify(Some(temp), None, None), expected, "temp {temp}");
        }
    }

    #[test]
    fn wind_qualifiers() {
        assert_eq!(classify(Some(15.0), Some(12.0), None), "warm, windy");
        assert_eq!(classify(Some(15.0), Some(7.0), None), "warm, with wind");
        assert_eq!(classify(Some(15.0), Some(5.0), None), "warm");
        assert_eq!(classify(Some(15.0), None, None), "warm");
    }

    #[test]
    fn phenomena_keywords_are_case_insensitive() {
        assert_eq!(classify(Some(15.0), None, Some("Rain showers")), "warm, rainy");
        assert_eq!(classify(Some(-5.0), None, Some("Heavy SNOW")), "frosty, snowy");
        assert_eq!(classify(Some(5.0), None, Some("Mist")), "chilly, foggy");
    }

    #[test]
    fn qualifiers_stack_in_fixed_order() {
        let label = classify(Some(2.0), Some(11.0), Some("mist then rain turning to snow"));
        assert_eq!(label, "chilly, windy, foggy, rainy, snowy");
    }

    #[test]
    fn no_temperature_means_no_recommendations() {
        let recommendations = recommend(None, Some(20.0), Some("rain"), Some(9));
        assert!(recommendations.is_empty());
    }

    #[test]
    fn mandatory_categories_follow_temperature_ladders() {
        let recommendations = recommend(Some(-25.0), None, None, None);

        assert_eq!(
            recommendations.get(&RecommendationCategory::Clothing).map(String::as_str),
            Some("Heavy winter clothing, thermal underwear, hat, scarf, mittens")
        );
        assert_eq!(
            recommendations.get(&RecommendationCategory::Activities).map(String::as_str),
            Some("Stay indoors, limit time outside")
        );
        assert_eq!(recommendations.len(), 2);
    }

    #[test]
    fn conditional_categories_trigger_on_their_fields() {
        let recommendations =
            recommend(Some(18.0), Some(11.0), Some("light rain"), Some(5));

        assert!(recommendations.contains_key(&RecommendationCategory::WindWarning));
        assert!(recommendations.contains_key(&RecommendationCategory::Umbrella));
        assert!(recommendations.contains_key(&RecommendationCategory::HealthWarning));
        assert_eq!(recommendations.len(), 5);
    }

    #[test]
    fn quiet_geomagnetic_index_stays_silent() {
        let recommendations = recommend(Some(18.0), None, None, Some(4));
        assert!(!recommendations.contains_key(&RecommendationCategory::HealthWarning));
    }

    #[test]
    fn categories_iterate_in_display_order() {
        let recommendations = recommend(Some(18.0), Some(11.0), Some("rain"), Some(6));

        let order: Vec<RecommendationCategory> = recommendations.keys().copied().collect();
        assert_eq!(
            order,
            vec![
                RecommendationCategory::Clothing,
                RecommendationCategory::Activities,
                RecommendationCategory::WindWarning,
                RecommendationCategory::Umbrella,
                RecommendationCategory::HealthWarning,
            ]
        );
    }
}
