use std::collections::BTreeMap;

use regex::{Captures, Regex};
use serde_json::{json, Value as JsonValue};

use super::{Planner, PlanningError};
use crate::types::{Method, Plan, Step};
use crate::validate::{validate_plan, PlanLimits};

/// A verb-phrase trigger plus the step chain it expands to.
///
/// `$name` capture groups from the trigger are substituted into every
/// string field of the blueprint steps, so a recipe can lift entities
/// (a city, a repo, a message) out of the goal text.
pub struct Recipe {
    pub name: String,
    trigger: Regex,
    steps: Vec<Step>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, trigger: Regex, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            trigger,
            steps,
        }
    }
}

/// Deterministic planner: an ordered catalog of recipes, first match wins.
/// Most specific recipes (full chains) are registered before their
/// single-step prefixes.
pub struct RulePlanner {
    recipes: Vec<Recipe>,
    limits: PlanLimits,
}

impl RulePlanner {
    pub fn new(limits: PlanLimits) -> Self {
        Self {
            recipes: Vec::new(),
            limits,
        }
    }

    pub fn with_default_catalog(limits: PlanLimits) -> Self {
        let mut planner = Self::new(limits);
        for recipe in default_recipes() {
            planner.register(recipe);
        }
        planner
    }

    pub fn register(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }
}

impl Planner for RulePlanner {
    fn plan(&self, goal: &str) -> Result<Plan, PlanningError> {
        let goal = goal.trim();
        for recipe in &self.recipes {
            if let Some(caps) = recipe.trigger.captures(goal) {
                let steps = recipe.steps.iter().map(|s| instantiate(s, &caps)).collect();
                let plan = Plan::new(steps);
                validate_plan(&plan, &self.limits)?;
                return Ok(plan);
            }
        }
        Err(PlanningError::UnrecognizedGoal(goal.to_string()))
    }
}

fn instantiate(blueprint: &Step, caps: &Captures<'_>) -> Step {
    Step {
        id: blueprint.id,
        description: blueprint.description.as_deref().map(|d| expand(d, caps)),
        method: blueprint.method,
        url: expand(&blueprint.url, caps),
        query: expand_map(&blueprint.query, caps),
        headers: expand_map(&blueprint.headers, caps),
        body: blueprint.body.as_ref().map(|b| expand_value(b, caps)),
        extract: blueprint.extract.clone(),
    }
}

fn expand(template: &str, caps: &Captures<'_>) -> String {
    let mut out = String::new();
    caps.expand(template, &mut out);
    out
}

fn expand_map(map: &BTreeMap<String, String>, caps: &Captures<'_>) -> BTreeMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.clone(), expand(v, caps)))
        .collect()
}

fn expand_value(value: &JsonValue, caps: &Captures<'_>) -> JsonValue {
    match value {
        JsonValue::String(s) => JsonValue::String(expand(s, caps)),
        JsonValue::Array(arr) => JsonValue::Array(arr.iter().map(|v| expand_value(v, caps)).collect()),
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), expand_value(v, caps)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// The built-in catalog, covering the collaborator APIs the service grew
/// up against: OpenWeather, Notion, GitHub, Telegram.
pub fn default_recipes() -> Vec<Recipe> {
    let mut recipes = Vec::new();

    recipes.push(Recipe::new(
        "weather-to-notion",
        Regex::new(
            r"(?i)(?:get|fetch|check)\s+(?:the\s+)?(?:current\s+)?weather\s+(?:in|for)\s+(?P<city>[A-Za-z][A-Za-z .'-]*?)\s+and\s+(?:save|add|log|record)\s+(?:it\s+)?(?:to|in|into)\s+(?:my\s+)?notion",
        )
        .expect("valid regex"),
        vec![weather_step("${city}"), notion_weather_step()],
    ));

    recipes.push(Recipe::new(
        "weather",
        Regex::new(
            r"(?i)(?:get|fetch|check|what(?:'s| is))\s+(?:the\s+)?(?:current\s+)?weather\s+(?:in|for)\s+(?P<city>[A-Za-z][A-Za-z .'-]*)",
        )
        .expect("valid regex"),
        vec![weather_step("${city}")],
    ));

    recipes.push(Recipe::new(
        "github-stars",
        Regex::new(
            r"(?i)(?:get|fetch|check|count)\s+(?:the\s+)?(?:github\s+)?stars?\s+(?:for|of|on)\s+(?P<owner>[A-Za-z0-9_.-]+)/(?P<repo>[A-Za-z0-9_.-]+)",
        )
        .expect("valid regex"),
        vec![github_stars_step()],
    ));

    recipes.push(Recipe::new(
        "telegram-message",
        Regex::new(
            r#"(?i)send\s+(?:a\s+)?telegram\s+message\s+(?:saying\s+|that\s+says\s+)?["']?(?P<text>.+?)["']?\s*$"#,
        )
        .expect("valid regex"),
        vec![telegram_step()],
    ));

    recipes
}

fn weather_step(city: &str) -> Step {
    let mut step = Step::new(0, Method::Get, "https://api.openweathermap.org/data/2.5/weather");
    step.description = Some(format!("Fetch current weather for {city}"));
    step.query.insert("q".to_string(), city.to_string());
    step.query.insert("units".to_string(), "metric".to_string());
    step.query
        .insert("appid".to_string(), "{{env.OPENWEATHER_API_KEY}}".to_string());
    step.extract
        .insert("temperature".to_string(), "main.temp".to_string());
    step.extract
        .insert("conditions".to_string(), "weather.0.description".to_string());
    step
}

fn notion_weather_step() -> Step {
    let mut step = Step::new(1, Method::Post, "https://api.notion.com/v1/pages");
    step.description = Some("Save the weather reading to the Notion database".to_string());
    step.headers.insert(
        "Authorization".to_string(),
        "Bearer {{env.NOTION_TOKEN}}".to_string(),
    );
    step.headers
        .insert("Notion-Version".to_string(), "2022-06-28".to_string());
    step.body = Some(json!({
        "parent": { "database_id": "{{env.NOTION_DATABASE_ID}}" },
        "properties": {
            "Name": {
                "title": [{ "text": { "content": "${city} weather - {{now}}" } }]
            },
            "Temperature": { "number": "{{step0.temperature}}" },
            "Conditions": {
                "rich_text": [{ "text": { "content": "{{step0.conditions}}" } }]
            }
        }
    }));
    step.extract.insert("page_id".to_string(), "id".to_string());
    step
}

fn github_stars_step() -> Step {
    let mut step = Step::new(
        0,
        Method::Get,
        "https://api.github.com/repos/${owner}/${repo}",
    );
    step.description = Some("Fetch repository metadata for ${owner}/${repo}".to_string());
    step.headers
        .insert("User-Agent".to_string(), "goalflow".to_string());
    step.extract
        .insert("stars".to_string(), "stargazers_count".to_string());
    step.extract
        .insert("forks".to_string(), "forks_count".to_string());
    step
}

fn telegram_step() -> Step {
    let mut step = Step::new(
        0,
        Method::Post,
        "https://api.telegram.org/bot{{env.TELEGRAM_BOT_TOKEN}}/sendMessage",
    );
    step.description = Some("Send a Telegram message".to_string());
    step.body = Some(json!({
        "chat_id": "{{env.TELEGRAM_CHAT_ID}}",
        "text": "${text}"
    }));
    step.extract
        .insert("message_id".to_string(), "result.message_id".to_string());
    step
}
