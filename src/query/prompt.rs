//! Instruction prompt for question-to-query translation.
//!
//! The translator sends one instruction block enumerating the metric
//! vocabulary, the task vocabulary with trigger phrases, the closed
//! team-name dictionary, and filter-extraction rules as condition→effect
//! pairs. Downstream behavior is contractually tested against the policy
//! spelled out here, so edits to the rules are breaking changes.

/// Metric vocabulary, matching the serde names of [`super::types::Metric`].
pub const METRIC_GUIDE: &[(&str, &str)] = &[
    ("ppg", "points per game"),
    ("rpg", "total rebounds per game"),
    ("apg", "assists per game"),
    ("spg", "steals per game"),
    ("bpg", "blocks per game"),
    ("topg", "turnovers per game"),
    ("mpg", "minutes played per game"),
    ("fg_pct", "field goal percentage"),
    ("three_pct", "three point percentage"),
    ("ft_pct", "free throw percentage"),
    ("efg_pct", "effective field goal percentage"),
    ("ts_pct", "true shooting percentage"),
    ("fgm", "field goals made per game"),
    ("fga", "field goals attempted per game"),
    ("three_pm", "three pointers made per game"),
    ("three_pa", "three pointers attempted per game"),
    ("ftm", "free throws made per game"),
    ("fta", "free throws attempted per game"),
    ("oreb", "offensive rebounds per game"),
    ("dreb", "defensive rebounds per game"),
    ("plus_minus", "average plus-minus"),
    ("gp", "games played"),
    ("age", "player age"),
    ("salary", "annual salary in dollars"),
    ("double_doubles", "double-doubles recorded"),
    ("triple_doubles", "triple-doubles recorded"),
    ("all", "the full stat line; use when no single stat is asked for"),
];

/// Every franchise with city and nickname aliases, mapped to its
/// abbreviation. The model must only ever emit abbreviations.
pub const TEAM_DICTIONARY: &[(&str, &str, &str)] = &[
    ("ATL", "Atlanta Hawks", "Atlanta, Hawks"),
    ("BOS", "Boston Celtics", "Boston, Celtics"),
    ("BKN", "Brooklyn Nets", "Brooklyn, Nets"),
    ("CHA", "Charlotte Hornets", "Charlotte, Hornets"),
    ("CHI", "Chicago Bulls", "Chicago, Bulls"),
    ("CLE", "Cleveland Cavaliers", "Cleveland, Cavaliers, Cavs"),
    ("DAL", "Dallas Mavericks", "Dallas, Mavericks, Mavs"),
    ("DEN", "Denver Nuggets", "Denver, Nuggets"),
    ("DET", "Detroit Pistons", "Detroit, Pistons"),
    ("GSW", "Golden State Warriors", "Golden State, Warriors, Dubs"),
    ("HOU", "Houston Rockets", "Houston, Rockets"),
    ("IND", "Indiana Pacers", "Indiana, Pacers"),
    ("LAC", "Los Angeles Clippers", "Clippers"),
    ("LAL", "Los Angeles Lakers", "Lakers"),
    ("MEM", "Memphis Grizzlies", "Memphis, Grizzlies"),
    ("MIA", "Miami Heat", "Miami, Heat"),
    ("MIL", "Milwaukee Bucks", "Milwaukee, Bucks"),
    ("MIN", "Minnesota Timberwolves", "Minnesota, Timberwolves, Wolves"),
    ("NOP", "New Orleans Pelicans", "New Orleans, Pelicans, Pels"),
    ("NYK", "New York Knicks", "New York, Knicks"),
    ("OKC", "Oklahoma City Thunder", "Oklahoma City, Thunder"),
    ("ORL", "Orlando Magic", "Orlando, Magic"),
    ("PHI", "Philadelphia 76ers", "Philadelphia, 76ers, Sixers"),
    ("PHX", "Phoenix Suns", "Phoenix, Suns"),
    ("POR", "Portland Trail Blazers", "Portland, Trail Blazers, Blazers"),
    ("SAC", "Sacramento Kings", "Sacramento, Kings"),
    ("SAS", "San Antonio Spurs", "San Antonio, Spurs"),
    ("TOR", "Toronto Raptors", "Toronto, Raptors"),
    ("UTA", "Utah Jazz", "Utah, Jazz"),
    ("WAS", "Washington Wizards", "Washington, Wizards"),
];

/// Words that flip the sort order to ascending. Anything else keeps the
/// descending default.
pub const ASCENDING_TRIGGERS: &[&str] =
    &["least", "lowest", "worst", "fewest", "bottom", "minimum"];

/// Build the full translation prompt for a question.
pub fn translation_prompt(question: &str, current_season: i32) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You translate basketball statistics questions into a structured JSON query. \
         Respond with a single JSON object and nothing else.\n\n",
    );

    prompt.push_str("## Metrics\n\n");
    for (name, definition) in METRIC_GUIDE {
        prompt.push_str(&format!("- `{name}`: {definition}\n"));
    }

    prompt.push_str("\n## Tasks\n\n");
    prompt.push_str(
        "Pick exactly one task. Check the rules in this order and stop at the first match:\n\
         1. `team` - the question is about a team's record, standing, seed, or the best/worst team. \
         Example: \"which team has the best record\" -> {\"task\": \"team\", \"season\": SEASON}\n\
         2. `historical_comparison` - asks which past players someone is similar to or compares to. \
         Example: \"which players from history is Anthony Edwards most similar to\" -> \
         {\"task\": \"historical_comparison\", \"metric\": \"all\", \"season\": SEASON, \
         \"filters\": {\"players\": [\"Anthony Edwards\"]}}\n\
         3. `compare` - explicitly compares two or more named players (\"compare\", \"versus\", \
         \"vs\", \"who is better, X or Y\"). \
         Example: \"compare Jayson Tatum and Luka Doncic\" -> {\"task\": \"compare\", \
         \"metric\": \"all\", \"season\": SEASON, \"filters\": {\"players\": [\"Jayson Tatum\", \"Luka Doncic\"]}}\n\
         4. `leaders` - \"top\", \"best\", \"leaders\", \"who leads the league\" phrasing. \
         Example: \"who leads the league in assists\" -> {\"task\": \"leaders\", \"metric\": \"apg\", \"season\": SEASON}\n\
         5. `rank` - any other ranking over players (\"who averages the most ...\").\n\
         6. `lookup` - a single named player's numbers (\"what is Stephen Curry averaging\").\n\
         7. `solo` - a profile of what kind of player someone is (\"what kind of player is Josh Giddey\").\n",
    );

    prompt.push_str("\n## Teams\n\n");
    prompt.push_str(
        "Set `team` only when the question names a franchise. Always emit the abbreviation:\n",
    );
    for (abbrev, name, aliases) in TEAM_DICTIONARY {
        prompt.push_str(&format!("- {name} ({aliases}) -> {abbrev}\n"));
    }

    prompt.push_str("\n## Filters\n\n");
    prompt.push_str(&format!(
        "Apply each rule whose condition holds:\n\
         - mentions \"rookies\" or \"rookie\" -> filters.draft_year_range = {{\"gte\": {season}, \"lte\": {season}}}\n\
         - mentions a draft class (\"drafted in 2020\") -> filters.draft_year_range with that year\n\
         - names specific players -> filters.players with their full names\n\
         - \"at least N games\" or \"played N games\" -> filters.min_games = N\n\
         - names a college (\"played at Duke\") -> filters.colleges = [\"Duke\"]\n\
         - names a country or says \"international\" -> filters.countries\n\
         - age phrasing (\"under 25\") -> filters.age_range = {{\"lte\": 25}}; (\"over 30\") -> {{\"gte\": 30}}\n\
         - minutes phrasing (\"playing 30+ minutes\") -> filters.minutes_range = {{\"gte\": 30}}\n\
         - salary phrasing: amounts in millions are scaled by 1000000. \
         \"players making more than 50 million\" -> filters.salary_range = {{\"gte\": 50000000}}\n\
         - positions: guards/backcourt -> \"guards\"; forwards/wings -> \"forwards\"; centers/big men -> \"centers\"\n\
         - clutch phrasing (\"in the clutch\", \"crunch time\", \"late and close\") -> clutch = true\n\
         - filtering by one metric while ranking by another: the ranking metric goes in `metric`, \
         the threshold metric goes in filters.filter_by_metric with filters.min_metric_value. \
         \"players averaging over 20 points, ranked by field goal percentage\" -> \
         {{\"metric\": \"fg_pct\", \"filters\": {{\"filter_by_metric\": \"ppg\", \"min_metric_value\": 20}}}}. \
         Omit filter_by_metric when the two metrics are the same.\n\
         - \"youngest\"/\"oldest players who ...\" -> filters.order_by_age = true\n\
         - \"top N\"/\"first N\" -> limit = N\n\
         - historical comparisons: \"top 3 comparisons\" -> historical_comparison_count = 3; \
         \"all comparisons\" -> historical_comparison_count = \"all\"\n",
        season = current_season
    ));

    prompt.push_str("\n## Sort order\n\n");
    prompt.push_str(
        "`order_direction` defaults to \"desc\". Never override it unless the question contains \
         an ascending trigger word: ",
    );
    prompt.push_str(&ASCENDING_TRIGGERS.join(", "));
    prompt.push_str(
        ".\n\
         - \"who is averaging the least amount of points\" -> {\"order_direction\": \"asc\"}\n\
         - \"who has the lowest turnovers\" -> {\"order_direction\": \"asc\"}\n\
         - \"who scores the most points\" -> omit order_direction (descending)\n\
         - \"best three point shooters\" -> omit order_direction (descending)\n",
    );

    prompt.push_str(&format!(
        "\n## Season\n\n\
         If the question names no season, or says \"this year\"/\"this season\", use {current_season}. \
         An explicit year names that season.\n",
    ));

    prompt.push_str(&format!("\n## Question\n\n{question}\n"));

    prompt
}

/// Narrow yes/no gate for the question classifier.
pub fn classification_prompt(question: &str) -> String {
    format!(
        "You screen questions for a basketball statistics service. Answer with exactly one word.\n\
         Answer YES if the question asks about player or team statistics, rankings, standings, \
         comparisons, salaries, or similar data.\n\
         Answer NO if the question is informational or off-topic, like \"what is the NBA\" or \
         \"how do you play basketball\".\n\n\
         Question: {question}\n\nAnswer:"
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::Metric;

    #[test]
    fn test_prompt_covers_every_metric() {
        let prompt = translation_prompt("who scores the most", 2025);
        for (name, _) in METRIC_GUIDE {
            assert!(prompt.contains(name), "metric `{name}` missing from prompt");
        }
    }

    #[test]
    fn test_metric_guide_matches_enum_names() {
        for (name, _) in METRIC_GUIDE {
            let parsed: Result<Metric, _> = serde_json::from_value(serde_json::json!(name));
            assert!(parsed.is_ok(), "guide name `{name}` is not a valid metric");
        }
    }

    #[test]
    fn test_prompt_covers_every_franchise() {
        let prompt = translation_prompt("which team is best", 2025);
        assert_eq!(TEAM_DICTIONARY.len(), 30);
        for (abbrev, name, _) in TEAM_DICTIONARY {
            assert!(prompt.contains(abbrev));
            assert!(prompt.contains(name));
        }
    }

    #[test]
    fn test_prompt_lists_ascending_triggers() {
        let prompt = translation_prompt("who scores the least", 2025);
        for trigger in ASCENDING_TRIGGERS {
            assert!(prompt.contains(trigger));
        }
        assert!(prompt.contains("defaults to \"desc\""));
    }

    #[test]
    fn test_prompt_scales_salary_to_dollars() {
        let prompt = translation_prompt("players making more than 50 million", 2025);
        assert!(prompt.contains("50000000"));
    }

    #[test]
    fn test_prompt_embeds_question_and_season() {
        let prompt = translation_prompt("top scoring rookies this year", 2024);
        assert!(prompt.contains("top scoring rookies this year"));
        assert!(prompt.contains("2024"));
    }

    #[test]
    fn test_classification_prompt_is_yes_no() {
        let prompt = classification_prompt("what is the NBA");
        assert!(prompt.contains("YES"));
        assert!(prompt.contains("NO"));
        assert!(prompt.contains("what is the NBA"));
    }
}
